//! Error types for network configuration and quoting.

use thiserror::Error;

/// A network description that cannot be turned into a [`Network`](crate::domain::Network).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("network has no warehouses")]
    NoWarehouses,

    #[error("warehouse {0:?} is listed more than once")]
    DuplicateWarehouse(String),

    #[error("delivery location {0:?} collides with a warehouse id")]
    DeliveryIsWarehouse(String),

    #[error("unknown warehouse {0:?} in stock table")]
    UnknownStockWarehouse(String),

    #[error("unknown location {0:?} in cost table")]
    UnknownCostLocation(String),

    #[error("cost entry {from:?} -> {to:?} is a self loop")]
    SelfLoop { from: String, to: String },

    #[error("cost entry {from:?} -> {to:?} must be positive and finite, got {cost}")]
    InvalidCost { from: String, to: String, cost: f64 },

    #[error("weight per unit must be positive and finite, got {0}")]
    InvalidWeight(f64),

    #[error("missing-edge penalty must be positive and finite, got {0}")]
    InvalidPenalty(f64),

    #[error("failed to read network file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed network file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A quote request the solver refuses to run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("{needed} warehouses to visit exceeds the search limit of {limit}")]
    SearchTooLarge { needed: usize, limit: usize },
}

/// Bad process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown strategy {0:?}, expected auto, exhaustive or dp")]
    UnknownStrategy(String),

    #[error("unknown demo dataset {0:?}")]
    UnknownDataset(String),

    #[error("invalid listen address {0:?}")]
    InvalidAddr(String),

    #[error(transparent)]
    Network(#[from] NetworkError),
}
