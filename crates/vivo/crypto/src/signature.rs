//! Auth request signing.

use vivo_core::{AuthRequest, Credentials};

/// Compute the auth signature.
///
/// The gateway expects `md5(appId + appKey + timestamp + appSecret)` as lowercase hex.
pub fn sign(credentials: &Credentials, timestamp_millis: i64) -> String {
    let input = format!(
        "{}{}{}{}",
        credentials.app_id,
        credentials.app_key,
        timestamp_millis,
        credentials.expose_secret()
    );
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Builds signed auth requests. Owns the credentials so the secret stays here.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
}

impl Signer {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn app_id(&self) -> &str {
        &self.credentials.app_id
    }

    /// Signed auth request for the given timestamp.
    pub fn auth_request(&self, timestamp_millis: i64) -> AuthRequest {
        AuthRequest {
            app_id: self.credentials.app_id.clone(),
            app_key: self.credentials.app_key.clone(),
            sign: sign(&self.credentials, timestamp_millis),
            timestamp: timestamp_millis,
        }
    }

    /// Signed auth request stamped with the current time.
    pub fn auth_request_now(&self) -> AuthRequest {
        self.auth_request(chrono::Utc::now().timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_matches_md5_vector() {
        // RFC 1321 test suite: md5 of "1234567890" repeated 8 times.
        let creds = Credentials::new("", "", "1234567890".repeat(7));
        assert_eq!(
            sign(&creds, 1234567890),
            "57edf4a22be3c955ac49da2e2107b67a"
        );
    }

    #[test]
    fn test_sign_concatenation_order() {
        let creds = Credentials::new("1001", "app-key", "app-secret");
        let expected = format!("{:x}", md5::compute("1001app-key1700000000000app-secret"));
        assert_eq!(sign(&creds, 1_700_000_000_000), expected);

        let swapped = Credentials::new("app-key", "1001", "app-secret");
        assert_ne!(sign(&swapped, 1_700_000_000_000), expected);
    }

    #[test]
    fn test_auth_request_fields() {
        let signer = Signer::new(Credentials::new("1001", "app-key", "app-secret"));
        let req = signer.auth_request(42);

        assert_eq!(req.app_id, "1001");
        assert_eq!(req.app_key, "app-key");
        assert_eq!(req.timestamp, 42);
        assert_eq!(req.sign.len(), 32);
        assert!(req.sign.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
