use serde::{Deserialize, Serialize};

/// How a probe asks the server about a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    /// `HEAD` request
    Head,
    /// `GET` request whose body is never read
    Get,
}

/// Rule deciding whether a probe response means the document exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistenceCheck {
    /// HTTP 200 is enough
    StatusOk,
    /// HTTP 200 and a `Content-Type` mentioning `application/pdf`
    StatusOkPdf,
}

impl ExistenceCheck {
    pub fn accepts(&self, response: &ProbeResponse) -> bool {
        match self {
            ExistenceCheck::StatusOk => response.status_code == 200,
            ExistenceCheck::StatusOkPdf => {
                response.status_code == 200
                    && response
                        .content_type
                        .as_deref()
                        .map(|ct| ct.contains("application/pdf"))
                        .unwrap_or(false)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResponse {
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
}

impl ProbeResponse {
    pub fn new(url: String, status_code: u16) -> Self {
        Self {
            url,
            status_code,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }
}
