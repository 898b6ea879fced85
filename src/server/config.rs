//! Server configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

use crate::hub::HubConfig;
use crate::store::StoreConfig;

/// Port used when neither `PORT` nor an explicit address is given
pub const DEFAULT_PORT: u16 = 8000;

/// Command-line bind address that is neither `IP`, `IP:PORT` nor `localhost[:PORT]`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bind address '{0}', expected IP:PORT, IP or localhost[:PORT]")]
pub struct InvalidBindAddr(pub String);

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Poll store settings
    pub store: StoreConfig,

    /// Fan-out settings
    pub hub: HubConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            store: StoreConfig::default(),
            hub: HubConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Default config with the port taken from `PORT`, if set and valid
    pub fn from_env() -> Self {
        Self::default().port_from(std::env::var("PORT").ok().as_deref())
    }

    fn port_from(mut self, value: Option<&str>) -> Self {
        match value.map(str::parse::<u16>) {
            Some(Ok(port)) => self.bind_addr.set_port(port),
            Some(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    default = self.bind_addr.port(),
                    "Ignoring invalid PORT"
                );
            }
            None => {}
        }
        self
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the bind address from a command-line argument
    ///
    /// A bare host keeps the currently configured port.
    pub fn bind_arg(self, arg: &str) -> Result<Self, InvalidBindAddr> {
        let port = self.bind_addr.port();
        let addr = match arg.strip_prefix("localhost") {
            Some("") => SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port),
            Some(rest) => rest
                .strip_prefix(':')
                .and_then(|p| p.parse::<u16>().ok())
                .map(|p| SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), p))
                .ok_or_else(|| InvalidBindAddr(arg.to_string()))?,
            None => match arg.parse::<SocketAddr>() {
                Ok(addr) => addr,
                Err(_) => arg
                    .parse::<IpAddr>()
                    .map(|ip| SocketAddr::new(ip, port))
                    .map_err(|_| InvalidBindAddr(arg.to_string()))?,
            },
        };
        Ok(self.bind(addr))
    }

    /// Set the poll store configuration
    pub fn store_config(mut self, config: StoreConfig) -> Self {
        self.store = config;
        self
    }

    /// Set the hub configuration
    pub fn hub_config(mut self, config: HubConfig) -> Self {
        self.hub = config;
        self
    }

    /// Set maximum concurrent subscribers
    pub fn max_subscribers(mut self, max: usize) -> Self {
        self.hub.max_subscribers = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregationMode;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), 8000);
        assert!(config.bind_addr.ip().is_unspecified());
        assert_eq!(config.hub.max_subscribers, 0);
    }

    #[test]
    fn test_port_from_value() {
        let config = ServerConfig::default().port_from(Some("9100"));
        assert_eq!(config.bind_addr.port(), 9100);

        let config = ServerConfig::default().port_from(Some("not-a-port"));
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);

        let config = ServerConfig::default().port_from(None);
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:8081".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr, addr);
    }

    #[test]
    fn test_bind_arg() {
        let config = ServerConfig::default().bind_arg("localhost").unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());

        let config = ServerConfig::default().bind_arg("localhost:8001").unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8001".parse::<SocketAddr>().unwrap());

        let config = ServerConfig::default().bind_arg("0.0.0.0:8080").unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());

        // Bare IP keeps the port picked up from PORT
        let config = ServerConfig::default()
            .port_from(Some("9100"))
            .bind_arg("10.0.0.5")
            .unwrap();
        assert_eq!(config.bind_addr, "10.0.0.5:9100".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_bind_arg_rejects_garbage() {
        for arg in ["example.com", "localhost:", "localhost:http", "localhostx", "1.2.3.4:99999"] {
            let err = ServerConfig::default().bind_arg(arg).unwrap_err();
            assert_eq!(err, InvalidBindAddr(arg.to_string()));
        }
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let config = ServerConfig::default()
            .bind(addr)
            .store_config(StoreConfig::default().aggregation(AggregationMode::Incremental))
            .hub_config(HubConfig::default().subscriber_queue_capacity(8))
            .max_subscribers(50);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.store.aggregation, AggregationMode::Incremental);
        assert_eq!(config.hub.subscriber_queue_capacity, 8);
        assert_eq!(config.hub.max_subscribers, 50);
    }
}
