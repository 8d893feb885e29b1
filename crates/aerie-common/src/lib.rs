pub mod errors;
pub mod id;

pub use errors::BridgeError;
pub use id::SurfaceId;

pub type Result<T> = std::result::Result<T, BridgeError>;
