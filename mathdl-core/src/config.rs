// Instance configuration: what to enumerate, how to probe, where to archive

use crate::archive::ArchiveSpec;
use crate::catalog::{Candidate, Catalog, CategoryTable, ContestSeries, Month, TournamentSchedule};
use crate::error::{CoreError, Result};
use mathdl_fetch::{ExistenceCheck, ProbeMethod};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const AIME_BASE_URL: &str = "https://artofproblemsolving.com/community/contest/download/c3416";
pub const AMC12_BASE_URL: &str =
    "https://artofproblemsolving.com/community/contest/download/c3415_amc_12";
pub const HMMT_BASE_URL: &str = "https://hmmt-archive.s3.amazonaws.com/tournaments";

pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbePolicy {
    pub method: ProbeMethod,
    pub check: ExistenceCheck,
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,
}

impl ProbePolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_probe_timeout() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECS
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

/// One pipeline: a catalog plus the policies used to probe, fetch, archive and report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub name: String,
    pub catalog: Catalog,
    pub probe: ProbePolicy,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    pub archive: ArchiveSpec,
    pub missing_log: String,
    /// Download failures are only printed unless this is set.
    #[serde(default)]
    pub failed_log: Option<String>,
}

impl InstanceConfig {
    /// AIME and AMC 12 papers from the AoPS contest collection.
    pub fn aops() -> Self {
        Self {
            name: "aops".to_string(),
            catalog: Catalog::Series {
                series: vec![
                    ContestSeries {
                        label: "AIME".to_string(),
                        base_url: AIME_BASE_URL.to_string(),
                        years: 1983..=2025,
                        directory: "AIME".to_string(),
                        file_prefix: "aime".to_string(),
                    },
                    ContestSeries {
                        label: "AMC 12".to_string(),
                        base_url: AMC12_BASE_URL.to_string(),
                        years: 2000..=2025,
                        directory: "AMC12".to_string(),
                        file_prefix: "amc".to_string(),
                    },
                ],
            },
            // AoPS answers missing papers with an HTML page, so the content type matters
            probe: ProbePolicy {
                method: ProbeMethod::Get,
                check: ExistenceCheck::StatusOkPdf,
                timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            },
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            archive: ArchiveSpec {
                file_name: "Contests.zip".to_string(),
                scan_dir: None,
                extension: Some("pdf".to_string()),
            },
            missing_log: "missing_files.log".to_string(),
            failed_log: None,
        }
    }

    /// HMMT tournament papers from the public S3 archive.
    pub fn hmmt() -> Self {
        Self {
            name: "hmmt".to_string(),
            catalog: Catalog::Tournament(TournamentSchedule {
                base_url: HMMT_BASE_URL.to_string(),
                root: "HMMT".to_string(),
                years: 2008..=2025,
                months: vec![Month::Feb, Month::Nov],
                doc_types: vec!["problems".to_string(), "solutions".to_string()],
                rules: CategoryTable::hmmt(),
            }),
            probe: ProbePolicy {
                method: ProbeMethod::Head,
                check: ExistenceCheck::StatusOk,
                timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            },
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            archive: ArchiveSpec {
                file_name: "HMMT.zip".to_string(),
                scan_dir: Some("HMMT".to_string()),
                extension: None,
            },
            missing_log: "hmmt_missing_files.log".to_string(),
            failed_log: None,
        }
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.catalog.candidates()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigError("instance name is empty".to_string()));
        }
        if self.probe.timeout_secs == 0 || self.fetch_timeout_secs == 0 {
            return Err(CoreError::ConfigError(format!(
                "instance '{}': timeouts must be at least one second",
                self.name
            )));
        }
        if self.archive.file_name.trim().is_empty() || self.missing_log.trim().is_empty() {
            return Err(CoreError::ConfigError(format!(
                "instance '{}': archive and missing log names are required",
                self.name
            )));
        }

        let base_urls: Vec<&str> = match &self.catalog {
            Catalog::Series { series } => series.iter().map(|s| s.base_url.as_str()).collect(),
            Catalog::Tournament(schedule) => vec![schedule.base_url.as_str()],
        };
        if let Some(bad) = base_urls
            .iter()
            .find(|url| !(url.starts_with("http://") || url.starts_with("https://")))
        {
            return Err(CoreError::ConfigError(format!(
                "instance '{}': base URL '{}' must be http(s)",
                self.name, bad
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub instances: Vec<InstanceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instances: vec![InstanceConfig::aops(), InstanceConfig::hmmt()],
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.instances.is_empty() {
            return Err(CoreError::ConfigError("no instances configured".to_string()));
        }

        let mut names = HashSet::new();
        for instance in &self.instances {
            instance.validate()?;
            if !names.insert(instance.name.as_str()) {
                return Err(CoreError::ConfigError(format!(
                    "duplicate instance name '{}'",
                    instance.name
                )));
            }
        }

        Ok(())
    }

    /// Instances named in `names`, in configuration order. An empty list selects all.
    pub fn select(&self, names: &[String]) -> Result<Vec<&InstanceConfig>> {
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.instances.iter().any(|i| &i.name == *name))
        {
            return Err(CoreError::ConfigError(format!("unknown instance '{}'", unknown)));
        }

        Ok(self
            .instances
            .iter()
            .filter(|i| names.is_empty() || names.contains(&i.name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.instances.len(), 2);
    }

    #[test]
    fn test_instances_keep_distinct_policies() {
        let aops = InstanceConfig::aops();
        let hmmt = InstanceConfig::hmmt();

        assert_eq!(aops.probe.method, ProbeMethod::Get);
        assert_eq!(aops.probe.check, ExistenceCheck::StatusOkPdf);
        assert_eq!(hmmt.probe.method, ProbeMethod::Head);
        assert_eq!(hmmt.probe.check, ExistenceCheck::StatusOk);
        assert_eq!(aops.probe.timeout(), Duration::from_secs(5));
        assert_eq!(hmmt.fetch_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_json_round_trip_preserves_config() {
        let config = Config::default();
        let json = config.to_json_pretty().unwrap();
        let parsed = Config::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let config = Config {
            instances: vec![InstanceConfig::hmmt(), InstanceConfig::hmmt()],
        };
        assert!(matches!(config.validate(), Err(CoreError::ConfigError(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut instance = InstanceConfig::aops();
        instance.probe.timeout_secs = 0;
        let config = Config {
            instances: vec![instance],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_select_by_name() {
        let config = Config::default();

        let all = config.select(&[]).unwrap();
        assert_eq!(all.len(), 2);

        let hmmt = config.select(&["hmmt".to_string()]).unwrap();
        assert_eq!(hmmt.len(), 1);
        assert_eq!(hmmt[0].name, "hmmt");

        assert!(config.select(&["usamo".to_string()]).is_err());
    }
}
