//! Helpers for simulating upstream services in unit tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use reqwest::Client;

use crate::config::HttpConfig;

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn test_http_config() -> HttpConfig {
    HttpConfig {
        timeout_seconds: 2,
        ..HttpConfig::default()
    }
}

pub fn test_client() -> Client {
    crate::http::build_client(&test_http_config()).unwrap()
}

/// Shared request counter for mock handlers
#[derive(Clone, Default)]
pub struct HitCounter(Arc<AtomicUsize>);

impl HitCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
