//! Shared harness for the HTTP tests: an in-memory database, a seeded admin
//! and a router driven through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use shramic_cms::config::Config;
use shramic_cms::db::{create_test_pool, migrations, SqlitePool};
use shramic_cms::services::seed_defaults;
use shramic_cms::web::{build_router, AppState};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub pool: SqlitePool,
    pub config: Config,
    cookie: Option<String>,
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.session.secret_key = Some("integration-test-secret".to_string());
    config.seed.admin_username = ADMIN_USERNAME.to_string();
    config.seed.admin_password = Some(ADMIN_PASSWORD.to_string());
    config
}

impl TestApp {
    pub async fn new() -> Self {
        let config = test_config();
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        seed_defaults(&pool, &config.seed)
            .await
            .expect("Failed to seed defaults");

        let state = AppState::build(pool.clone(), &config).expect("Failed to build state");
        let router = build_router(state.clone());

        Self {
            router,
            state,
            pool,
            config,
            cookie: None,
        }
    }

    /// Fresh app with an authenticated session cookie
    pub async fn logged_in() -> Self {
        let mut app = Self::new().await;
        let reply = app
            .post_form(
                "/admin/login",
                &[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)],
            )
            .await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER);
        assert_eq!(reply.location.as_deref(), Some("/admin/dashboard"));
        app
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub fn set_cookie(&mut self, cookie: impl Into<String>) {
        self.cookie = Some(cookie.into());
    }

    pub async fn get(&mut self, uri: &str) -> Reply {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Reply {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> Reply {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let value = set_cookie.to_str().unwrap();
            let pair = value.split(';').next().unwrap().to_string();
            self.cookie = Some(pair);
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        Reply {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
