pub mod error;
pub mod result;
pub mod transport;

pub use error::FetchError;
pub use result::{ExistenceCheck, ProbeMethod, ProbeResponse};
pub use transport::{ReqwestTransport, Transport};
