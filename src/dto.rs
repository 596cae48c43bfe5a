//! DTOs for REST API requests/responses and network files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{MissingEdge, Network, Order, DEFAULT_WEIGHT_PER_UNIT};
use crate::error::NetworkError;
use crate::solver::{Optimizer, Quote};

/// Order body: product id to positive quantity, e.g. `{"A": 1, "C": 2}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OrderDto(pub BTreeMap<String, u32>);

impl OrderDto {
    /// Converts to the domain order, refusing zero quantities.
    pub fn to_domain(&self) -> Result<Order, String> {
        if let Some((product, _)) = self.0.iter().find(|(_, &q)| q == 0) {
            return Err(format!("quantity for product {product:?} must be positive"));
        }
        Ok(self.0.iter().map(|(p, &q)| (p.clone(), q)).collect())
    }
}

/// Quote response in the shape the order service has always returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuoteDto {
    /// Cheapest total cost, `null` when no route exists.
    pub minimum_cost: Option<f64>,
    /// Route as `[origin, destination]` pairs, `null` when no route exists.
    pub best_path: Option<Vec<[String; 2]>>,
}

impl QuoteDto {
    pub fn from_quote(optimizer: &Optimizer, quote: &Quote) -> Self {
        Self {
            minimum_cost: quote.minimum_cost,
            best_path: quote.best_route.as_ref().map(|route| {
                optimizer
                    .route_names(route)
                    .into_iter()
                    .map(|(from, to)| [from.to_string(), to.to_string()])
                    .collect()
            }),
        }
    }
}

/// One directed cost table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostEntryDto {
    pub from: String,
    pub to: String,
    pub cost: f64,
}

/// Missing-edge policy: `{"policy": "penalty", "cost": 999}` or
/// `{"policy": "reject"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MissingEdgeDto {
    Penalty { cost: f64 },
    Reject,
}

impl Default for MissingEdgeDto {
    fn default() -> Self {
        MissingEdge::default().into()
    }
}

impl From<MissingEdge> for MissingEdgeDto {
    fn from(policy: MissingEdge) -> Self {
        match policy {
            MissingEdge::Penalty(cost) => MissingEdgeDto::Penalty { cost },
            MissingEdge::Reject => MissingEdgeDto::Reject,
        }
    }
}

impl From<MissingEdgeDto> for MissingEdge {
    fn from(policy: MissingEdgeDto) -> Self {
        match policy {
            MissingEdgeDto::Penalty { cost } => MissingEdge::Penalty(cost),
            MissingEdgeDto::Reject => MissingEdge::Reject,
        }
    }
}

fn default_weight_per_unit() -> f64 {
    DEFAULT_WEIGHT_PER_UNIT
}

/// Full network description, used for `GET /network`, demo data and network
/// files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NetworkDto {
    /// Warehouse ids in enumeration order.
    pub warehouses: Vec<String>,
    /// Delivery location id.
    pub delivery_location: String,
    /// Products carried per warehouse.
    #[serde(default)]
    pub stock: BTreeMap<String, Vec<String>>,
    /// Directed per-trip costs.
    #[serde(default)]
    pub costs: Vec<CostEntryDto>,
    /// Kilograms per ordered unit.
    #[serde(default = "default_weight_per_unit")]
    pub weight_per_unit: f64,
    #[serde(default)]
    pub missing_edge: MissingEdgeDto,
}

impl NetworkDto {
    /// Converts domain network to DTO.
    pub fn from_network(network: &Network) -> Self {
        let stock = network
            .all_warehouses()
            .map(|w| {
                let products = network
                    .stock()
                    .carried(w)
                    .map(|set| set.iter().cloned().collect())
                    .unwrap_or_default();
                (network.location_name(w).to_string(), products)
            })
            .collect();

        let costs = network
            .costs()
            .entries()
            .map(|(from, to, cost)| CostEntryDto {
                from: network.location_name(from).to_string(),
                to: network.location_name(to).to_string(),
                cost,
            })
            .collect();

        Self {
            warehouses: network.warehouses().to_vec(),
            delivery_location: network.delivery_name().to_string(),
            stock,
            costs,
            weight_per_unit: network.weight_per_unit(),
            missing_edge: network.missing_edge().into(),
        }
    }

    /// Converts DTO to a validated domain network.
    pub fn to_domain(&self) -> Result<Network, NetworkError> {
        let mut builder = Network::builder(self.warehouses.iter().cloned(), self.delivery_location.clone())
            .with_weight_per_unit(self.weight_per_unit)
            .with_missing_edge(self.missing_edge.into());
        for (warehouse, products) in &self.stock {
            builder = builder.with_stock(warehouse.clone(), products.iter().cloned());
        }
        for entry in &self.costs {
            builder = builder.with_cost(entry.from.clone(), entry.to.clone(), entry.cost);
        }
        builder.build()
    }
}
