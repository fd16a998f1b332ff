use crate::domain::error::{AppError, Result};
use keyring::Entry;

/// Looks up credentials stored in the OS keychain under one service name
pub struct KeyringManager {
    service: String,
}

impl KeyringManager {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn get_secret(&self, key: &str) -> Result<String> {
        let entry = Entry::new(&self.service, key)
            .map_err(|e| AppError::SecurityError(format!("Failed to create entry: {}", e)))?;

        entry
            .get_password()
            .map_err(|e| AppError::SecurityError(format!("Failed to get password: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_is_security_error() {
        let manager = KeyringManager::new("employee-digest-test-absent");
        let err = manager.get_secret("openai").unwrap_err();
        assert!(matches!(err, AppError::SecurityError(_)));
    }

    // Needs a running OS credential store (Keychain, Credential Manager or
    // Secret Service); run with `cargo test -- --ignored` on a desktop.
    #[test]
    #[ignore]
    fn test_reads_secret_stored_in_os_keychain() {
        let service = "employee-digest-test-roundtrip";
        let entry = Entry::new(service, "openai").unwrap();
        entry.set_password("stored-secret").unwrap();

        let secret = KeyringManager::new(service).get_secret("openai");
        let _ = entry.delete_credential();

        assert_eq!(secret.unwrap(), "stored-secret");
    }
}
