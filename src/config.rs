//! Process configuration from environment variables.
//!
//! | Variable           | Default        | Meaning                                |
//! |--------------------|----------------|----------------------------------------|
//! | `ROUTING_ADDR`     | `0.0.0.0:7860` | listen address                         |
//! | `ROUTING_NETWORK`  | unset          | JSON network file, overrides the demo  |
//! | `ROUTING_DATASET`  | `default`      | demo network name                      |
//! | `ROUTING_STRATEGY` | `auto`         | `auto`, `exhaustive` or `dp`           |

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::demo_data::generate_by_name;
use crate::domain::Network;
use crate::dto::NetworkDto;
use crate::error::{ConfigError, NetworkError};
use crate::solver::SolverConfig;

const DEFAULT_ADDR: &str = "0.0.0.0:7860";
const DEFAULT_DATASET: &str = "default";

/// Where the served network comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkSource {
    /// A built-in demo topology.
    Dataset(String),
    /// A JSON file in the [`NetworkDto`] layout.
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub network: NetworkSource,
    pub solver: SolverConfig,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a
    /// variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("ROUTING_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(raw_addr.clone()))?;

        let network = match lookup("ROUTING_NETWORK").filter(|p| !p.is_empty()) {
            Some(path) => NetworkSource::File(PathBuf::from(path)),
            None => NetworkSource::Dataset(
                lookup("ROUTING_DATASET").unwrap_or_else(|| DEFAULT_DATASET.to_string()),
            ),
        };

        let mut solver = SolverConfig::default();
        if let Some(strategy) = lookup("ROUTING_STRATEGY") {
            solver.strategy = strategy.parse()?;
        }

        Ok(Self { addr, network, solver })
    }

    /// Builds the network named by [`AppConfig::network`].
    pub fn load_network(&self) -> Result<Network, ConfigError> {
        match &self.network {
            NetworkSource::Dataset(name) => {
                generate_by_name(name).ok_or_else(|| ConfigError::UnknownDataset(name.clone()))
            }
            NetworkSource::File(path) => Ok(load_network_file(path)?),
        }
    }
}

/// Reads and validates a JSON network file.
pub fn load_network_file(path: &Path) -> Result<Network, NetworkError> {
    let text = fs::read_to_string(path)?;
    let dto: NetworkDto = serde_json::from_str(&text)?;
    let network = dto.to_domain()?;
    info!(
        path = %path.display(),
        warehouses = network.warehouse_count(),
        "Loaded network file"
    );
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("warehouse-routing-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr, "0.0.0.0:7860".parse::<SocketAddr>().unwrap());
        assert_eq!(config.network, NetworkSource::Dataset("default".into()));
        assert_eq!(config.solver, SolverConfig::default());
        assert_eq!(config.load_network().unwrap().warehouse_count(), 3);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ROUTING_ADDR", "127.0.0.1:9000"),
            ("ROUTING_DATASET", "regional"),
            ("ROUTING_STRATEGY", "dp"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.solver.strategy, crate::solver::Strategy::SubsetDp);
        assert_eq!(config.load_network().unwrap().delivery_name(), "STORE");
    }

    #[test]
    fn test_network_file_wins_over_dataset() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ROUTING_NETWORK", "/srv/network.json"),
            ("ROUTING_DATASET", "regional"),
        ]))
        .unwrap();
        assert_eq!(config.network, NetworkSource::File("/srv/network.json".into()));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("ROUTING_ADDR", "localhost")])),
            Err(ConfigError::InvalidAddr(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("ROUTING_STRATEGY", "greedy")])),
            Err(ConfigError::UnknownStrategy(_))
        ));
        let config = AppConfig::from_lookup(lookup(&[("ROUTING_DATASET", "atlantis")])).unwrap();
        assert!(matches!(config.load_network(), Err(ConfigError::UnknownDataset(_))));
    }

    #[test]
    fn test_load_network_file() {
        let path = temp_file(
            "ok.json",
            r#"{
                "warehouses": ["N", "S"],
                "delivery_location": "HQ",
                "stock": {"N": ["bolts"], "S": ["nuts"]},
                "costs": [
                    {"from": "N", "to": "HQ", "cost": 10},
                    {"from": "S", "to": "N", "cost": 4}
                ],
                "weight_per_unit": 2.0,
                "missing_edge": {"policy": "reject"}
            }"#,
        );
        let network = load_network_file(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(network.warehouses(), &["N", "S"]);
        assert_eq!(network.weight_per_unit(), 2.0);
        assert_eq!(network.missing_edge(), crate::domain::MissingEdge::Reject);
    }

    #[test]
    fn test_load_network_file_errors() {
        let missing = std::env::temp_dir().join("warehouse-routing-does-not-exist.json");
        assert!(matches!(load_network_file(&missing), Err(NetworkError::Io(_))));

        let path = temp_file("bad.json", "{\"warehouses\": 3}");
        let result = load_network_file(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(NetworkError::Parse(_))));

        let path = temp_file("invalid.json", r#"{"warehouses": [], "delivery_location": "HQ"}"#);
        let config = AppConfig {
            addr: DEFAULT_ADDR.parse().unwrap(),
            network: NetworkSource::File(path.clone()),
            solver: SolverConfig::default(),
        };
        let result = config.load_network();
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Network(NetworkError::NoWarehouses))));
    }
}
