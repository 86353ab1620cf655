/// Configuration for Clerk session token verification.
///
/// Environment variables:
/// - CLERK_ISSUER: Clerk frontend API URL, e.g. "https://clerk.example.com".
///   When unset every authenticated endpoint rejects the caller.
#[derive(Debug, Clone)]
pub struct ClerkConfig {
    pub issuer: Option<String>,
}

impl ClerkConfig {
    pub fn from_env() -> Self {
        let issuer = std::env::var("CLERK_ISSUER")
            .ok()
            .map(|i| i.trim().trim_end_matches('/').to_string())
            .filter(|i| !i.is_empty());
        Self { issuer }
    }

    /// JSON Web Key Set published by the Clerk instance.
    pub fn jwks_url(&self) -> Option<String> {
        self.issuer
            .as_ref()
            .map(|issuer| format!("{}/.well-known/jwks.json", issuer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_jwks_url_from_issuer() {
        let config = ClerkConfig {
            issuer: Some("https://clerk.example.com".to_string()),
        };

        assert_eq!(
            config.jwks_url().as_deref(),
            Some("https://clerk.example.com/.well-known/jwks.json")
        );
    }

    #[test]
    fn should_have_no_jwks_url_without_issuer() {
        let config = ClerkConfig { issuer: None };
        assert!(config.jwks_url().is_none());
    }
}
