use secrecy::{ExposeSecret, SecretString};
use std::env;

#[derive(Clone, Debug)]
pub struct Credentials {
    // AWS_ACCESS_KEY_ID
    key: String,
    // AWS_SECRET_ACCESS_KEY
    secret: SecretString,
}

impl Credentials {
    /// Passed keys take priority, empty keys fall back to `AWS_ACCESS_KEY_ID`
    /// and `AWS_SECRET_ACCESS_KEY`
    #[must_use]
    pub fn new(access: &str, secret: &SecretString) -> Self {
        let key = if access.is_empty() {
            env::var("AWS_ACCESS_KEY_ID").unwrap_or_default()
        } else {
            access.to_string()
        };

        let secret = if secret.expose_secret().is_empty() {
            SecretString::new(
                env::var("AWS_SECRET_ACCESS_KEY")
                    .unwrap_or_default()
                    .into(),
            )
        } else {
            secret.clone()
        };

        Self { key, secret }
    }

    /// Get a reference to the access key ID.
    #[must_use]
    pub fn aws_access_key_id(&self) -> &str {
        &self.key
    }

    /// Get a reference to the secret access key.
    #[must_use]
    pub fn aws_secret_access_key(&self) -> &SecretString {
        &self.secret
    }
}
