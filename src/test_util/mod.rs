use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

pub mod mock;

/// Installs a test subscriber once; `TEST_LOG` sets the filter.
pub fn trace_init() {
    let filter = std::env::var("TEST_LOG").unwrap_or_else(|_| "off".to_owned());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// Binds a listener on a free loopback port.
pub async fn bind_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}
