//! Client layer: multipart document upload and catalog reads against the analysis backend.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{AnalysisClient, ClientError, UploadOutcome};
