pub mod keyring;
pub mod redact;

pub use redact::redact;
