#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use quadro_core::{Config, Container, Quadro};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quadro_core=debug".into()),
        )
        .try_init();
}

pub fn isolated_config(data_dir: &Path) -> Config {
    Config {
        api_url: None,
        api_token: None,
        guest: true,
        data_dir: data_dir.to_path_buf(),
        request_timeout: Duration::from_secs(1),
    }
}

/// Remote-mode config pointing at a loopback port nothing listens on, so
/// every remote attempt fails fast and exercises the mirror fallback.
pub fn unreachable_remote_config(data_dir: &Path) -> Config {
    Config {
        api_url: Some("http://127.0.0.1:9".to_string()),
        api_token: Some("test-token".to_string()),
        guest: false,
        data_dir: data_dir.to_path_buf(),
        request_timeout: Duration::from_secs(1),
    }
}

pub fn isolated_quadro(data_dir: &Path) -> Quadro {
    init_tracing();
    Quadro::new(&isolated_config(data_dir)).expect("isolated session should start")
}

/// Sibling positions must be strictly increasing in display order.
pub fn assert_strictly_ordered(rows: &[Container]) {
    let positions: Vec<i64> = rows.iter().map(|c| c.position).collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "sibling positions not strictly increasing: {:?}",
        positions
    );
}

pub fn names(rows: &[Container]) -> Vec<&str> {
    rows.iter().map(|c| c.name.as_str()).collect()
}
