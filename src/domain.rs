//! Domain model for multi-warehouse order routing.
//!
//! # Overview
//!
//! - An [`Order`] maps products to requested quantities
//! - A [`Network`] holds the warehouse list, the delivery location, the stock
//!   table, the per-trip [`CostTable`] and the weight conversion
//! - A [`Route`] is a directed [`Edge`] sequence that picks up at warehouses
//!   and finishes at the delivery location
//!
//! # Design
//!
//! Locations are addressed by [`LocationIdx`]: warehouses take `0..n` in the
//! order they were listed, the delivery location takes `n`. Names only appear
//! at the edges of the system (builder input, DTO output).

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;
use crate::stock::StockIndex;

/// Index of a warehouse or of the delivery location within a [`Network`].
pub type LocationIdx = usize;

/// Default kilograms per ordered unit.
pub const DEFAULT_WEIGHT_PER_UNIT: f64 = 0.5;

/// Default per-trip cost charged for an edge missing from the cost table.
pub const DEFAULT_MISSING_EDGE_PENALTY: f64 = 999.0;

/// A customer order: product id to quantity.
///
/// Products are kept sorted so iteration never depends on insertion order.
///
/// # Examples
///
/// ```
/// use warehouse_routing::domain::Order;
///
/// let order = Order::new().with_item("A", 2).with_item("C", 1);
/// assert_eq!(order.total_quantity(), 3);
/// assert_eq!(order.products().collect::<Vec<_>>(), vec!["A", "C"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Order {
    items: BTreeMap<String, u32>,
}

impl Order {
    /// Creates an empty order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of `product`, replacing any previous quantity.
    pub fn with_item(mut self, product: impl Into<String>, quantity: u32) -> Self {
        self.items.insert(product.into(), quantity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Ordered product ids.
    pub fn products(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// `(product, quantity)` pairs in product order.
    pub fn items(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(p, q)| (p.as_str(), *q))
    }

    /// Sum of all quantities, including products nobody stocks.
    pub fn total_quantity(&self) -> u64 {
        self.items.values().map(|&q| u64::from(q)).sum()
    }
}

impl<P: Into<String>> FromIterator<(P, u32)> for Order {
    fn from_iter<I: IntoIterator<Item = (P, u32)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|(p, q)| (p.into(), q)).collect(),
        }
    }
}

/// A directed trip between two locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: LocationIdx,
    pub to: LocationIdx,
}

impl Edge {
    pub fn new(from: LocationIdx, to: LocationIdx) -> Self {
        Self { from, to }
    }
}

/// A pickup route: consecutive warehouse hops followed by one edge into the
/// delivery location.
///
/// # Examples
///
/// ```
/// use warehouse_routing::domain::{Edge, Route};
///
/// // Warehouses 1 then 0, delivery location at index 3.
/// let route = Route::from_stops(&[1, 0], 3);
/// assert_eq!(route.edges(), &[Edge::new(1, 0), Edge::new(0, 3)]);
/// assert_eq!(route.stops().collect::<Vec<_>>(), vec![1, 0]);
///
/// let direct = Route::from_stops(&[2], 3);
/// assert_eq!(direct.edges(), &[Edge::new(2, 3)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    edges: Vec<Edge>,
}

impl Route {
    /// Builds the edge sequence for visiting `stops` in order and then
    /// delivering. `stops` must not be empty.
    pub fn from_stops(stops: &[LocationIdx], delivery: LocationIdx) -> Self {
        debug_assert!(!stops.is_empty(), "a route needs at least one pickup");
        let mut edges: Vec<Edge> = stops.windows(2).map(|w| Edge::new(w[0], w[1])).collect();
        if let Some(&last) = stops.last() {
            edges.push(Edge::new(last, delivery));
        }
        Self { edges }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The warehouses visited, in order (the delivery location excluded).
    pub fn stops(&self) -> impl Iterator<Item = LocationIdx> + '_ {
        self.edges.iter().map(|e| e.from)
    }

    pub fn start(&self) -> Option<LocationIdx> {
        self.edges.first().map(|e| e.from)
    }
}

/// What the cost evaluator does with an edge absent from the cost table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MissingEdge {
    /// Charge this per-trip cost instead.
    Penalty(f64),
    /// Routes using the edge are not eligible.
    Reject,
}

impl Default for MissingEdge {
    fn default() -> Self {
        MissingEdge::Penalty(DEFAULT_MISSING_EDGE_PENALTY)
    }
}

/// Per-trip costs between every pair of locations, stored as a flat matrix.
///
/// Entries are directional; `(a, b)` says nothing about `(b, a)`.
#[derive(Clone, Debug)]
pub struct CostTable {
    size: usize,
    costs: Vec<Option<f64>>,
}

impl CostTable {
    fn new(size: usize) -> Self {
        Self {
            size,
            costs: vec![None; size * size],
        }
    }

    fn set(&mut self, from: LocationIdx, to: LocationIdx, cost: f64) {
        self.costs[from * self.size + to] = Some(cost);
    }

    /// Looks up the trip cost, `None` if the table has no entry.
    #[inline]
    pub fn get(&self, from: LocationIdx, to: LocationIdx) -> Option<f64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.costs[from * self.size + to]
    }

    /// All present entries in `(from, to)` row-major order.
    pub fn entries(&self) -> impl Iterator<Item = (LocationIdx, LocationIdx, f64)> + '_ {
        self.costs.iter().enumerate().filter_map(move |(i, c)| {
            c.map(|cost| (i / self.size, i % self.size, cost))
        })
    }
}

/// The static topology every quote is computed against.
///
/// Built through [`Network::builder`], immutable afterwards.
///
/// # Examples
///
/// ```
/// use warehouse_routing::domain::{Network, Order};
///
/// let network = Network::builder(["C1", "C2"], "L1")
///     .with_stock("C1", ["A", "B"])
///     .with_stock("C2", ["C"])
///     .with_symmetric_cost("C1", "L1", 20.0)
///     .with_symmetric_cost("C2", "L1", 30.0)
///     .with_symmetric_cost("C1", "C2", 15.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(network.warehouse_count(), 2);
/// assert_eq!(network.delivery(), 2);
/// assert_eq!(network.location_name(2), "L1");
/// assert_eq!(network.costs().get(0, 2), Some(20.0));
/// assert_eq!(network.total_weight(&Order::new().with_item("A", 3)), 1.5);
/// ```
#[derive(Clone, Debug)]
pub struct Network {
    warehouses: Vec<String>,
    delivery_name: String,
    stock: StockIndex,
    costs: CostTable,
    weight_per_unit: f64,
    missing_edge: MissingEdge,
}

impl Network {
    /// Starts a network description from the warehouse list (in enumeration
    /// order) and the delivery location id.
    pub fn builder<I, S>(warehouses: I, delivery: impl Into<String>) -> NetworkBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NetworkBuilder {
            warehouses: warehouses.into_iter().map(Into::into).collect(),
            delivery: delivery.into(),
            stock: Vec::new(),
            costs: Vec::new(),
            weight_per_unit: DEFAULT_WEIGHT_PER_UNIT,
            missing_edge: MissingEdge::default(),
        }
    }

    pub fn warehouses(&self) -> &[String] {
        &self.warehouses
    }

    pub fn warehouse_count(&self) -> usize {
        self.warehouses.len()
    }

    /// Warehouse indices in enumeration order.
    pub fn all_warehouses(&self) -> Range<LocationIdx> {
        0..self.warehouses.len()
    }

    /// Index of the delivery location.
    pub fn delivery(&self) -> LocationIdx {
        self.warehouses.len()
    }

    pub fn delivery_name(&self) -> &str {
        &self.delivery_name
    }

    /// Name of a warehouse or of the delivery location.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is past the delivery location.
    pub fn location_name(&self, idx: LocationIdx) -> &str {
        if idx == self.delivery() {
            &self.delivery_name
        } else {
            &self.warehouses[idx]
        }
    }

    /// Resolves a location name to its index.
    pub fn location_idx(&self, name: &str) -> Option<LocationIdx> {
        if name == self.delivery_name {
            return Some(self.delivery());
        }
        self.warehouses.iter().position(|w| w == name)
    }

    pub fn stock(&self) -> &StockIndex {
        &self.stock
    }

    pub fn costs(&self) -> &CostTable {
        &self.costs
    }

    pub fn weight_per_unit(&self) -> f64 {
        self.weight_per_unit
    }

    pub fn missing_edge(&self) -> MissingEdge {
        self.missing_edge
    }

    /// Shipment weight of an order: every unit counts, stocked or not.
    pub fn total_weight(&self, order: &Order) -> f64 {
        order.total_quantity() as f64 * self.weight_per_unit
    }

    /// `(origin, destination)` names of an edge.
    pub fn edge_names(&self, edge: Edge) -> (&str, &str) {
        (self.location_name(edge.from), self.location_name(edge.to))
    }
}

/// Collects a network description and validates it in [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct NetworkBuilder {
    warehouses: Vec<String>,
    delivery: String,
    stock: Vec<(String, Vec<String>)>,
    costs: Vec<(String, String, f64)>,
    weight_per_unit: f64,
    missing_edge: MissingEdge,
}

impl NetworkBuilder {
    /// Declares products carried by a warehouse. Repeated calls accumulate.
    pub fn with_stock<I, S>(mut self, warehouse: impl Into<String>, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stock.push((
            warehouse.into(),
            products.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Sets the cost of the directed trip `from -> to`.
    pub fn with_cost(mut self, from: impl Into<String>, to: impl Into<String>, cost: f64) -> Self {
        self.costs.push((from.into(), to.into(), cost));
        self
    }

    /// Sets both `a -> b` and `b -> a` to the same cost.
    pub fn with_symmetric_cost(self, a: impl Into<String>, b: impl Into<String>, cost: f64) -> Self {
        let (a, b) = (a.into(), b.into());
        self.with_cost(a.clone(), b.clone(), cost).with_cost(b, a, cost)
    }

    pub fn with_weight_per_unit(mut self, weight: f64) -> Self {
        self.weight_per_unit = weight;
        self
    }

    pub fn with_missing_edge(mut self, policy: MissingEdge) -> Self {
        self.missing_edge = policy;
        self
    }

    /// Validates the description and freezes it into a [`Network`].
    pub fn build(self) -> Result<Network, NetworkError> {
        if self.warehouses.is_empty() {
            return Err(NetworkError::NoWarehouses);
        }

        let mut index: HashMap<&str, LocationIdx> = HashMap::with_capacity(self.warehouses.len() + 1);
        for (idx, name) in self.warehouses.iter().enumerate() {
            if index.insert(name.as_str(), idx).is_some() {
                return Err(NetworkError::DuplicateWarehouse(name.clone()));
            }
        }
        if index.contains_key(self.delivery.as_str()) {
            return Err(NetworkError::DeliveryIsWarehouse(self.delivery));
        }
        let delivery = self.warehouses.len();

        if !(self.weight_per_unit.is_finite() && self.weight_per_unit > 0.0) {
            return Err(NetworkError::InvalidWeight(self.weight_per_unit));
        }
        if let MissingEdge::Penalty(p) = self.missing_edge {
            if !(p.is_finite() && p > 0.0) {
                return Err(NetworkError::InvalidPenalty(p));
            }
        }

        let mut carried: Vec<Vec<String>> = vec![Vec::new(); self.warehouses.len()];
        for (warehouse, products) in self.stock {
            let idx = *index
                .get(warehouse.as_str())
                .ok_or_else(|| NetworkError::UnknownStockWarehouse(warehouse.clone()))?;
            carried[idx].extend(products);
        }
        let stock = StockIndex::new(carried);

        let resolve = |name: &str| -> Result<LocationIdx, NetworkError> {
            if name == self.delivery {
                Ok(delivery)
            } else {
                index
                    .get(name)
                    .copied()
                    .ok_or_else(|| NetworkError::UnknownCostLocation(name.to_string()))
            }
        };

        let mut costs = CostTable::new(delivery + 1);
        for (from, to, cost) in &self.costs {
            let (i, j) = (resolve(from)?, resolve(to)?);
            if i == j {
                return Err(NetworkError::SelfLoop {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
            if !(cost.is_finite() && *cost > 0.0) {
                return Err(NetworkError::InvalidCost {
                    from: from.clone(),
                    to: to.clone(),
                    cost: *cost,
                });
            }
            costs.set(i, j, *cost);
        }

        Ok(Network {
            warehouses: self.warehouses,
            delivery_name: self.delivery,
            stock,
            costs,
            weight_per_unit: self.weight_per_unit,
            missing_edge: self.missing_edge,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_warehouses() -> NetworkBuilder {
        Network::builder(["C1", "C2"], "L1")
            .with_stock("C1", ["A"])
            .with_stock("C2", ["B"])
            .with_symmetric_cost("C1", "L1", 20.0)
    }

    #[test]
    fn test_order_ignores_insertion_order() {
        let a = Order::new().with_item("B", 1).with_item("A", 2);
        let b: Order = [("A", 2), ("B", 1)].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.products().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_order_deserializes_from_plain_object() {
        let order: Order = serde_json::from_str(r#"{"A": 1, "C": 4}"#).unwrap();
        assert_eq!(order.len(), 2);
        assert_eq!(order.total_quantity(), 5);
    }

    #[test]
    fn test_cost_table_is_directional() {
        let network = two_warehouses().with_cost("C1", "C2", 15.0).build().unwrap();
        assert_eq!(network.costs().get(0, 1), Some(15.0));
        assert_eq!(network.costs().get(1, 0), None);
        assert_eq!(network.costs().get(2, 0), Some(20.0));
        assert_eq!(network.costs().get(7, 0), None);
    }

    #[test]
    fn test_location_lookup() {
        let network = two_warehouses().build().unwrap();
        assert_eq!(network.location_idx("C2"), Some(1));
        assert_eq!(network.location_idx("L1"), Some(2));
        assert_eq!(network.location_idx("nowhere"), None);
        assert_eq!(network.edge_names(Edge::new(1, 2)), ("C2", "L1"));
    }

    #[test]
    fn test_rejects_empty_warehouse_list() {
        let err = Network::builder(Vec::<String>::new(), "L1").build().unwrap_err();
        assert!(matches!(err, NetworkError::NoWarehouses));
    }

    #[test]
    fn test_rejects_duplicate_and_colliding_ids() {
        let err = Network::builder(["C1", "C1"], "L1").build().unwrap_err();
        assert!(matches!(err, NetworkError::DuplicateWarehouse(ref w) if w == "C1"));

        let err = Network::builder(["C1", "L1"], "L1").build().unwrap_err();
        assert!(matches!(err, NetworkError::DeliveryIsWarehouse(_)));
    }

    #[test]
    fn test_rejects_bad_cost_entries() {
        let err = two_warehouses().with_cost("C1", "X9", 3.0).build().unwrap_err();
        assert!(matches!(err, NetworkError::UnknownCostLocation(ref l) if l == "X9"));

        let err = two_warehouses().with_cost("C1", "C1", 3.0).build().unwrap_err();
        assert!(matches!(err, NetworkError::SelfLoop { .. }));

        let err = two_warehouses().with_cost("C1", "C2", 0.0).build().unwrap_err();
        assert!(matches!(err, NetworkError::InvalidCost { .. }));

        let err = two_warehouses().with_cost("C1", "C2", f64::NAN).build().unwrap_err();
        assert!(matches!(err, NetworkError::InvalidCost { .. }));
    }

    #[test]
    fn test_rejects_bad_scalars() {
        let err = two_warehouses().with_weight_per_unit(0.0).build().unwrap_err();
        assert!(matches!(err, NetworkError::InvalidWeight(_)));

        let err = two_warehouses()
            .with_missing_edge(MissingEdge::Penalty(-1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, NetworkError::InvalidPenalty(_)));

        let err = two_warehouses().with_stock("C9", ["A"]).build().unwrap_err();
        assert!(matches!(err, NetworkError::UnknownStockWarehouse(_)));
    }

    #[test]
    fn test_weight_counts_every_unit() {
        let network = two_warehouses().with_weight_per_unit(2.0).build().unwrap();
        let order = Order::new().with_item("A", 1).with_item("Z", 4);
        assert_eq!(network.total_weight(&order), 10.0);
    }
}
