pub mod errors;
pub mod secret;

pub use errors::RefreshSecretError;
pub use secret::digest;
pub use secret::RefreshSecret;
