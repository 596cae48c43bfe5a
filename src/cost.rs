//! Route cost evaluation.
//!
//! A route costs the sum of its per-trip costs, each multiplied by the whole
//! shipment weight. Weight is a flat multiplier, not a per-edge load.

use crate::domain::{Edge, MissingEdge, Network, Route};

/// Result of looking an edge up in the cost table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeCost {
    Known(f64),
    Missing,
}

/// Looks an edge up without applying the missing-edge policy.
pub fn edge_cost(network: &Network, edge: Edge) -> EdgeCost {
    match network.costs().get(edge.from, edge.to) {
        Some(cost) => EdgeCost::Known(cost),
        None => EdgeCost::Missing,
    }
}

/// Per-trip cost actually charged for an edge: the table entry, or the
/// network's penalty when it has none. `None` if the network rejects missing
/// edges.
#[inline]
pub fn trip_cost(network: &Network, edge: Edge) -> Option<f64> {
    match (edge_cost(network, edge), network.missing_edge()) {
        (EdgeCost::Known(cost), _) => Some(cost),
        (EdgeCost::Missing, MissingEdge::Penalty(penalty)) => Some(penalty),
        (EdgeCost::Missing, MissingEdge::Reject) => None,
    }
}

/// Total cost of a route at the given shipment weight, `None` if the route is
/// not eligible under the network's missing-edge policy.
///
/// # Examples
///
/// ```
/// use warehouse_routing::cost::route_cost;
/// use warehouse_routing::domain::{Network, Route};
///
/// let network = Network::builder(["C1", "C2"], "L1")
///     .with_symmetric_cost("C1", "C2", 15.0)
///     .with_symmetric_cost("C1", "L1", 20.0)
///     .build()
///     .unwrap();
///
/// // C2 -> C1 -> L1
/// let route = Route::from_stops(&[1, 0], network.delivery());
/// assert_eq!(route_cost(&network, &route, 1.0), Some(35.0));
/// assert_eq!(route_cost(&network, &route, 2.5), Some(87.5));
///
/// // C2 -> L1 is not in the table: the default penalty applies.
/// let direct = Route::from_stops(&[1], network.delivery());
/// assert_eq!(route_cost(&network, &direct, 1.0), Some(999.0));
/// ```
pub fn route_cost(network: &Network, route: &Route, weight: f64) -> Option<f64> {
    route
        .edges()
        .iter()
        .try_fold(0.0, |total, &edge| Some(total + trip_cost(network, edge)? * weight))
}

/// Route cost at unit weight.
pub fn unit_cost(network: &Network, route: &Route) -> Option<f64> {
    route_cost(network, route, 1.0)
}

/// Edges of a route that the cost table has no entry for.
pub fn missing_edges(network: &Network, route: &Route) -> Vec<Edge> {
    route
        .edges()
        .iter()
        .copied()
        .filter(|&edge| edge_cost(network, edge) == EdgeCost::Missing)
        .collect()
}
