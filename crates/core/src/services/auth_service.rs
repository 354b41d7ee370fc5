use log::warn;

use crate::providers::traits::CredentialSource;

/// Verifies username/password pairs against a credential backend.
///
/// The outcome is a single boolean: a wrong password, an unknown user,
/// and a backend failure all come back as `false`, so callers cannot
/// probe which accounts exist. Backend failures are logged.
pub struct AuthService {
    source: Box<dyn CredentialSource>,
}

impl AuthService {
    pub fn new(source: Box<dyn CredentialSource>) -> Self {
        Self { source }
    }

    /// True only when both fields match the credential backend exactly.
    pub async fn authenticate(&self, username: &str, password: &str) -> bool {
        match self.source.verify(username, password).await {
            Ok(verified) => verified,
            Err(e) => {
                warn!("credential check via {} failed: {e}", self.source.name());
                false
            }
        }
    }
}
