#![allow(dead_code)]

use case_service::config::CaseConfig;
use case_service::services::MongoDb;
use case_service::startup::Application;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

pub const TEST_SECRET: &str = "clave-secreta-de-prueba";
pub const TEST_USER_ID: &str = "64f1a2b3c4d5e6f7a8b9c0d1";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
    pub uploads_path: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("case_test_{}", Uuid::new_v4());
        let uploads_path = format!("target/test-uploads-{}", Uuid::new_v4());

        let mut config = CaseConfig::load().expect("Failed to load configuration");
        config.server.port = 0; // Random port for testing
        config.mongodb.database = db_name.clone();
        config.uploads.root = uploads_path.clone();
        config.jwt.secret = Some(TEST_SECRET.to_string());

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to answer before handing it to the test
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
            uploads_path,
            api_client: client,
        }
    }

    /// Bearer token accepted by the guard, tied to the fixture user.
    pub fn token(&self) -> String {
        sign_token(TEST_SECRET, Some(TEST_USER_ID), 3600)
    }

    pub fn token_for(&self, id_usuario: &str) -> String {
        sign_token(TEST_SECRET, Some(id_usuario), 3600)
    }

    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
        let _ = tokio::fs::remove_dir_all(&self.uploads_path).await;
    }
}

pub fn sign_token(secret: &str, id_usuario: Option<&str>, ttl_secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + ttl_secs;
    let claims = match id_usuario {
        Some(id) => json!({ "id_usuario": id, "exp": exp }),
        None => json!({ "exp": exp }),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign test token")
}
