use crate::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct CaseConfig {
    pub server: ServerConfig,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub uploads: UploadsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

/// The signing secret may legitimately be absent: guarded requests then
/// fail with the legacy "Servidor sin JWT_SECRET configurado" response
/// instead of the process refusing to boot.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadsConfig {
    pub root: String,
}

impl CaseConfig {
    pub fn load() -> Result<Self, AppError> {
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(CaseConfig {
            server: ServerConfig {
                port: get_env("PORT", Some("8080"), is_prod)?
                    .parse()
                    .map_err(|e| AppError::Config(format!("PORT must be a number: {}", e)))?,
            },
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("case_management"), is_prod)?,
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            },
            uploads: UploadsConfig {
                root: get_env("UPLOADS_DIR", Some("uploads"), is_prod)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::Config(format!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::Config(format!("{} is required but not set", key)))
            }
        }
    }
}
