//! SDK errors
//!
//! None of these reach the host page from a flow; flows log them and stop.

use fos_push_net::NetError;
use fos_push_store::StoreError;

use crate::platform::PlatformError;

/// Push SDK error
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("API error: {0}")]
    Api(#[from] NetError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Malformed data: {0}")]
    Decode(String),
}
