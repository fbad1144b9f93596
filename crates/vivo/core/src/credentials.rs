//! Application credentials.

/// Credentials issued by the vivo developer console.
///
/// The secret is only reachable through [`Credentials::expose_secret`], which the
/// signer uses to build authentication digests.
#[derive(Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Application ID.
    #[serde(default)]
    pub app_id: String,
    /// Application key.
    #[serde(default)]
    pub app_key: String,
    #[serde(default)]
    app_secret: String,
}

impl Credentials {
    /// Create credentials from their three parts.
    pub fn new(
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            app_secret: app_secret.into(),
        }
    }

    /// Access the raw application secret.
    pub fn expose_secret(&self) -> &str {
        &self.app_secret
    }

    /// Replace the application secret.
    pub fn set_secret(&mut self, app_secret: impl Into<String>) {
        self.app_secret = app_secret.into();
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_key", &self.app_key)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("1001", "key", "super-secret");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("1001"));
        assert!(!rendered.contains("super-secret"));
    }
}
