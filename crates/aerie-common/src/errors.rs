use std::path::PathBuf;

/// Errors crossing the host/content bridge boundary.
///
/// Stale events and suppressed navigations are deliberately not represented
/// here: both are log-only recovery paths, never surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("engine error: {0}")]
    Engine(String),

    #[error("bootstrap asset missing: {0}")]
    BootstrapAssetMissing(PathBuf),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("command handler error: {0}")]
    Handler(String),
}
