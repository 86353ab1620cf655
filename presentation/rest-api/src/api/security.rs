use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation, decode, decode_header};
use once_cell::sync::Lazy;
use poem::Request;
use poem_openapi::SecurityScheme;
use serde::Deserialize;

use crate::config::clerk_config::ClerkConfig;

const CACHE_TTL: Duration = Duration::from_secs(3600);
const JWKS_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: Option<String>,
    kty: String,
    n: Option<String>,
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ClerkClaims {
    sub: String,
    iss: String,
    exp: u64,
    sid: Option<String>,
    azp: Option<String>,
}

struct CachedKeys {
    jwks_url: String,
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

static KEYS_CACHE: Lazy<RwLock<Option<CachedKeys>>> = Lazy::new(|| RwLock::new(None));

/// Held while the key set is fetched so concurrent cold-cache requests share one fetch.
static REFRESH_LOCK: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

static JWKS_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(JWKS_TIMEOUT)
        .build()
        .unwrap_or_default()
});

fn decoding_keys_from(set: JwkSet) -> Result<HashMap<String, DecodingKey>, String> {
    let mut keys = HashMap::new();
    for jwk in set.keys {
        let (Some(kid), Some(n), Some(e)) = (jwk.kid, jwk.n, jwk.e) else {
            continue;
        };
        if jwk.kty != "RSA" {
            continue;
        }
        let key = DecodingKey::from_rsa_components(&n, &e)
            .map_err(|err| format!("auth.jwk_decode_failed: {err}"))?;
        keys.insert(kid, key);
    }
    Ok(keys)
}

async fn fetch_clerk_keys(jwks_url: &str) -> Result<HashMap<String, DecodingKey>, String> {
    let set: JwkSet = JWKS_CLIENT
        .get(jwks_url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| format!("auth.jwks_fetch_failed: {e}"))?
        .json()
        .await
        .map_err(|e| format!("auth.jwks_parse_failed: {e}"))?;

    decoding_keys_from(set)
}

fn cached_keys_are_fresh(jwks_url: &str) -> Result<bool, String> {
    let cache = KEYS_CACHE
        .read()
        .map_err(|e| format!("auth.cache_read_failed: {e}"))?;
    Ok(cache.as_ref().is_some_and(|cached| {
        cached.jwks_url == jwks_url && cached.fetched_at.elapsed() < CACHE_TTL
    }))
}

async fn refresh_decoding_keys(jwks_url: &str) -> Result<(), String> {
    if cached_keys_are_fresh(jwks_url)? {
        return Ok(());
    }

    let _guard = REFRESH_LOCK.lock().await;
    // Another request may have refreshed the keys while this one waited.
    if cached_keys_are_fresh(jwks_url)? {
        return Ok(());
    }

    let keys = fetch_clerk_keys(jwks_url).await?;

    let mut cache = KEYS_CACHE
        .write()
        .map_err(|e| format!("auth.cache_write_failed: {e}"))?;
    *cache = Some(CachedKeys {
        jwks_url: jwks_url.to_string(),
        keys,
        fetched_at: Instant::now(),
    });

    Ok(())
}

/// Verifies a Clerk session token against the cached keys and returns its subject.
fn extract_user_id_from_token(token: &str, issuer: &str) -> Result<String, String> {
    let header: Header =
        decode_header(token).map_err(|e| format!("auth.invalid_token_header: {e}"))?;

    let kid = header.kid.ok_or("auth.missing_kid")?;

    let cache = KEYS_CACHE
        .read()
        .map_err(|e| format!("auth.cache_read_failed: {e}"))?;
    let cached = cache.as_ref().ok_or("auth.keys_not_loaded")?;

    let decoding_key = cached.keys.get(&kid).ok_or("auth.unknown_kid")?;

    verify_clerk_token(token, decoding_key, issuer)
}

fn verify_clerk_token(token: &str, key: &DecodingKey, issuer: &str) -> Result<String, String> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[issuer]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    // Clerk session tokens carry no audience.
    validation.validate_aud = false;

    let token_data = decode::<ClerkClaims>(token, key, &validation)
        .map_err(|e| format!("auth.token_validation_failed: {e}"))?;

    Ok(token_data.claims.sub)
}

/// Clerk session token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", bearer_format = "JWT", checker = "clerk_bearer_checker")]
#[allow(dead_code)]
pub struct ClerkBearer(pub String);

async fn clerk_bearer_checker(
    _req: &Request,
    bearer: poem_openapi::auth::Bearer,
) -> Option<String> {
    let config = ClerkConfig::from_env();
    let (Some(issuer), Some(jwks_url)) = (config.issuer.as_deref(), config.jwks_url()) else {
        tracing::error!("CLERK_ISSUER is not set; rejecting authenticated request");
        return None;
    };

    if let Err(e) = refresh_decoding_keys(&jwks_url).await {
        tracing::error!("Failed to fetch Clerk signing keys: {e}");
        return None;
    }

    match extract_user_id_from_token(&bearer.token, issuer) {
        Ok(user_id) => Some(user_id),
        Err(e) => {
            tracing::warn!("Clerk auth failed: {e}");
            None
        }
    }
}
