use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};

/// Demo application server configuration
#[derive(Debug, Deserialize)]
pub struct DemoServerConfig {
    /// Listen address (default: 127.0.0.1:8000).
    /// nginx proxies `/` to this address, so it stays on loopback unless the
    /// proxy template is changed too.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8000))
}

impl Default for DemoServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}
