//! Shared harness: a router over a temp-dir SQLite database, bearer tokens
//! for named users, and a wallet that signs SIWE messages.

use std::net::SocketAddr;

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    Router,
};
use chrono::{SecondsFormat, Utc};
use copass::{
    auth::jwt::{issue_token, JwtConfig},
    config::AppConfig,
    db::{init_pool, run_migrations},
    routes::create_router,
    state::AppState,
};
use http_body_util::BodyExt;
use k256::ecdsa::SigningKey;
use serde_json::{json, Value};
use sha3::{Digest, Keccak256};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    jwt: JwtConfig,
    _root: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let root = TempDir::new().expect("temp dir");
        let database_url = format!(
            "sqlite://{}",
            root.path().join("api.sqlite").to_string_lossy()
        );
        let jwt = JwtConfig {
            secret: "integration-test-secret".into(),
            token_ttl_mins: 15,
        };
        let config = AppConfig {
            database_url,
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            default_page_size: 20,
            max_page_size: 100,
            jwt: jwt.clone(),
        };
        let db = init_pool(&config.database_url).await.expect("pool");
        run_migrations(&db).await.expect("migrations");
        Self {
            router: create_router(AppState::new(config, db)),
            jwt,
            _root: root,
        }
    }

    /// Session token for `user`, as if they had signed in.
    pub fn token_for(&self, user: &str) -> String {
        issue_token(user, &format!("0x{user}"), &self.jwt).expect("token")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let token = user.map(|user| self.token_for(user));
        call(self.router.clone(), method, uri, token.as_deref(), body).await
    }

    pub async fn post_trip(&self, owner: &str, location: &str, start: &str, end: &str) -> Value {
        let (status, trip) = self
            .send(
                Method::POST,
                "/trips",
                Some(owner),
                Some(trip_body(location, start, end)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{trip}");
        trip
    }
}

pub fn trip_body(location: &str, start: &str, end: &str) -> Value {
    json!({
        "location": location,
        "purpose": "Conference",
        "date_range": { "start": start, "end": end },
    })
}

/// One request against `router` with an optional raw bearer token.
pub async fn call(
    router: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes)))
    };
    (status, json)
}

pub fn page_ids(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["trip"]["id"].as_str().unwrap().to_string())
        .collect()
}

/// secp256k1 key that signs EIP-4361 messages the way a browser wallet does.
pub struct TestWallet {
    key: SigningKey,
    /// EIP-55 checksummed address.
    pub address: String,
}

impl TestWallet {
    pub fn from_seed(seed: u8) -> Self {
        let key = SigningKey::from_slice(&[seed; 32]).expect("valid secret key");
        let point = key.verifying_key().to_encoded_point(false);
        let hash = Keccak256::digest(&point.as_bytes()[1..]);
        let address = checksum_address(&hash[12..]);
        Self { key, address }
    }

    pub fn siwe_message(&self) -> String {
        let issued_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        format!(
            "copass.example wants you to sign in with your Ethereum account:\n\
             {}\n\n\
             Sign in to Copass.\n\n\
             URI: https://copass.example/login\n\
             Version: 1\n\
             Chain ID: 1\n\
             Nonce: 8f3kq2ma9x\n\
             Issued At: {issued_at}",
            self.address
        )
    }

    /// EIP-191 personal signature, hex encoded with a `0x` prefix.
    pub fn sign(&self, message: &str) -> String {
        let prefixed = format!("\x19Ethereum Signed Message:\n{}{message}", message.len());
        let digest = Keccak256::digest(prefixed.as_bytes());
        let (signature, recovery) = self
            .key
            .sign_prehash_recoverable(&digest)
            .expect("signing");
        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery.to_byte() + 27);
        format!("0x{}", hex::encode(bytes))
    }
}

fn checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());
    let mixed: String = lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect();
    format!("0x{mixed}")
}
