//! Basic-auth gate for every route. Single-tenant: one user/password pair
//! from the server config, compared in constant time.

use crate::config::Config;
use crate::routes::AppState;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::sync::Arc;

pub async fn require_basic_auth(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if authorized(header, &state.config) {
        next.run(request).await
    } else {
        unauthorized()
    }
}

fn authorized(header: Option<&str>, config: &Config) -> bool {
    let Some(value) = header else {
        return false;
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = BASE64.decode(encoded.trim()) else {
        return false;
    };
    let Ok(credentials) = String::from_utf8(decoded) else {
        return false;
    };
    let Some((user, password)) = credentials.split_once(':') else {
        return false;
    };

    // Bitwise `&` so both comparisons always run.
    constant_time_eq(user, &config.auth_user) & constant_time_eq(password, &config.auth_password)
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();
    if a_bytes.len() != b_bytes.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for i in 0..a_bytes.len() {
        diff |= a_bytes[i] ^ b_bytes[i];
    }
    diff == 0
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"task_master\"")],
        Json(serde_json::json!({ "error": "unauthorized" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::authorized;
    use crate::config::Config;

    fn config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            auth_user: "task_master".to_string(),
            auth_password: "MasterOfTasks".to_string(),
        }
    }

    #[test]
    fn accepts_matching_credentials() {
        // base64("task_master:MasterOfTasks")
        let header = "Basic dGFza19tYXN0ZXI6TWFzdGVyT2ZUYXNrcw==";
        assert!(authorized(Some(header), &config()));
    }

    #[test]
    fn rejects_wrong_password() {
        // base64("task_master:wrong")
        let header = "Basic dGFza19tYXN0ZXI6d3Jvbmc=";
        assert!(!authorized(Some(header), &config()));
    }

    #[test]
    fn rejects_missing_header_and_wrong_scheme() {
        assert!(!authorized(None, &config()));
        assert!(!authorized(Some("Bearer something"), &config()));
        assert!(!authorized(Some("Basic not-base64!!"), &config()));
    }
}
