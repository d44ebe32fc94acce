use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims carried by the shared bearer token. `exp` is required and
/// checked; `id_usuario` travels when the issuer bound the token to a
/// user and is surfaced to handlers that want the caller identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_usuario: Option<String>,
    pub exp: i64,
}

/// HS256 verifier over the shared `JWT_SECRET`. The secret is optional
/// at startup; verification without one is a server fault, reported as
/// such instead of rejecting the caller.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: Option<DecodingKey>,
}

impl JwtVerifier {
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            decoding_key: secret.map(|s| DecodingKey::from_secret(s.as_bytes())),
        }
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
        let decoding_key = self
            .decoding_key
            .as_ref()
            .ok_or(AppError::MissingJwtSecret)?;

        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<TokenClaims>(token, decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized("Token inválido o expirado".to_string()))?;

        Ok(data.claims)
    }
}
