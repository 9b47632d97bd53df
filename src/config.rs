//! Declarative construction of a [`Router`] from a plain, `serde`-deserializable
//! description — an interface list and a route list — instead of hand-written
//! `add_interface`/`add_route` calls. [`Router::from_toml_str`] loads that
//! description straight from a TOML document, for a host process that keeps
//! its topology in a config file.
//!
//! Unlike the datapath, building a router from configuration is not hot and
//! its failures are observable: a bad config should fail loudly at startup
//! rather than silently misroute traffic later.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::iface::NetworkInterface;
use crate::proto::{Address, MacAddr};
use crate::router::Router;

/// One interface's identity: its MAC and its IPv4 address.
#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceConfig {
    pub mac: [u8; 6],
    pub ip: Address,
}

impl InterfaceConfig {
    fn build(&self) -> NetworkInterface {
        NetworkInterface::new(MacAddr(self.mac), self.ip)
    }
}

/// One routing table entry, referencing an interface by its position in the
/// enclosing [`RouterConfig::interfaces`] list.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteSpec {
    pub route_prefix: Address,
    pub prefix_length: u8,
    #[serde(default)]
    pub next_hop: Option<Address>,
    pub interface_num: usize,
}

/// A complete router description: interfaces in the order they should be
/// added, then routes in the order they should be added.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RouterConfig {
    pub interfaces: Vec<InterfaceConfig>,
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

impl Router {
    /// Build a router from `config`, validating every route before any
    /// interface or route is added.
    pub fn from_config(config: RouterConfig) -> Result<Self, ConfigError> {
        for route in &config.routes {
            if route.prefix_length > 32 {
                return Err(ConfigError::InvalidPrefixLength(route.prefix_length));
            }
            if route.interface_num >= config.interfaces.len() {
                return Err(ConfigError::UnknownInterface(route.interface_num));
            }
        }

        let mut router = Router::new();
        for iface_conf in &config.interfaces {
            router.add_interface(iface_conf.build());
        }
        for route in &config.routes {
            router.add_route(
                route.route_prefix,
                route.prefix_length,
                route.next_hop,
                route.interface_num,
            );
        }
        Ok(router)
    }

    /// Parse `s` as a TOML-encoded [`RouterConfig`] and build a router from
    /// it, so a host process can load its topology from a config file
    /// instead of constructing `RouterConfig` in code.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig =
            toml::from_str(s).map_err(|err| ConfigError::Toml(err.to_string()))?;
        Self::from_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> RouterConfig {
        RouterConfig {
            interfaces: vec![
                InterfaceConfig { mac: [0, 0, 0, 0, 0, 1], ip: Address::new(10, 0, 0, 1) },
                InterfaceConfig { mac: [0, 0, 0, 0, 0, 2], ip: Address::new(10, 1, 0, 1) },
            ],
            routes: vec![
                RouteSpec { route_prefix: Address::new(10, 0, 0, 0), prefix_length: 8, next_hop: None, interface_num: 0 },
                RouteSpec {
                    route_prefix: Address::new(10, 1, 0, 0),
                    prefix_length: 16,
                    next_hop: Some(Address::new(10, 0, 0, 7)),
                    interface_num: 1,
                },
            ],
        }
    }

    #[test]
    fn builds_router_matching_config_in_order() {
        let router = Router::from_config(sample_config()).unwrap();
        assert_eq!(router.interface_count(), 2);
        assert_eq!(router.interface(0).unwrap().ip(), Address::new(10, 0, 0, 1));
        assert_eq!(router.interface(1).unwrap().ip(), Address::new(10, 1, 0, 1));
    }

    #[test]
    fn rejects_unknown_interface() {
        let mut config = sample_config();
        config.routes.push(RouteSpec {
            route_prefix: Address::new(0, 0, 0, 0),
            prefix_length: 0,
            next_hop: None,
            interface_num: 5,
        });
        let err = Router::from_config(config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownInterface(5)));
    }

    #[test]
    fn rejects_invalid_prefix_length() {
        let mut config = sample_config();
        config.routes.push(RouteSpec {
            route_prefix: Address::new(0, 0, 0, 0),
            prefix_length: 33,
            next_hop: None,
            interface_num: 0,
        });
        let err = Router::from_config(config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrefixLength(33)));
    }

    #[test]
    fn from_toml_str_builds_matching_router() {
        let toml = r#"
            [[interfaces]]
            mac = [0, 0, 0, 0, 0, 1]
            ip = "10.0.0.1"

            [[interfaces]]
            mac = [0, 0, 0, 0, 0, 2]
            ip = "10.1.0.1"

            [[routes]]
            route_prefix = "10.0.0.0"
            prefix_length = 8
            interface_num = 0

            [[routes]]
            route_prefix = "10.1.0.0"
            prefix_length = 16
            next_hop = "10.0.0.7"
            interface_num = 1
        "#;

        let router = Router::from_toml_str(toml).unwrap();
        assert_eq!(router.interface_count(), 2);
        assert_eq!(router.interface(0).unwrap().ip(), Address::new(10, 0, 0, 1));
        assert_eq!(router.interface(1).unwrap().ip(), Address::new(10, 1, 0, 1));
    }

    #[test]
    fn from_toml_str_rejects_malformed_toml() {
        let err = Router::from_toml_str("not valid [ toml").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn from_toml_str_still_validates_routes() {
        let toml = r#"
            [[interfaces]]
            mac = [0, 0, 0, 0, 0, 1]
            ip = "10.0.0.1"

            [[routes]]
            route_prefix = "10.0.0.0"
            prefix_length = 8
            interface_num = 9
        "#;

        let err = Router::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownInterface(9)));
    }
}
