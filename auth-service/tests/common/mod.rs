use std::sync::Arc;

use auth::Authenticator;
use auth::JwtHandler;
use auth_service::domain::session::service::TokenService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryCredentialStore;
use serde_json::json;

pub const ACCESS_SECRET: &[u8] = b"test-access-secret-for-jwt-signing-32-bytes";
pub const REFRESH_SECRET: &[u8] = b"test-refresh-secret-for-jwt-signing-32-bytes";

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub access_jwt: JwtHandler,
}

/// Token pair as returned in the `data` field of signup/signin/refresh
#[derive(Debug, Clone)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryCredentialStore::new());
        let authenticator = Arc::new(Authenticator::new(ACCESS_SECRET, REFRESH_SECRET));
        let token_service = Arc::new(TokenService::new(store, Arc::clone(&authenticator)));

        let router = create_router(token_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            access_jwt: JwtHandler::new(ACCESS_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// POST credentials to signup or signin
    pub async fn post_credentials(&self, path: &str, email: &str, password: &str) -> reqwest::Response {
        self.post(path)
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Sign up and return the issued tokens, panicking on failure
    pub async fn signup(&self, email: &str, password: &str) -> Tokens {
        let response = self.post_credentials("/api/auth/signup", email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        Self::tokens_from(response).await
    }

    pub async fn tokens_from(response: reqwest::Response) -> Tokens {
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");

        Tokens {
            access_token: body["data"]["access_token"]
                .as_str()
                .expect("Missing access_token")
                .to_string(),
            refresh_token: body["data"]["refresh_token"]
                .as_str()
                .expect("Missing refresh_token")
                .to_string(),
        }
    }
}
