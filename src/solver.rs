//! Order quoting: the search for the cheapest pickup route.
//!
//! Two strategies share one contract (start at a needed warehouse, visit every
//! needed warehouse once, end at the delivery location, first start in
//! warehouse order wins ties):
//!
//! - **Exhaustive**: score every route from [`enumerate_routes`], `(k-1)!` per
//!   start.
//! - **Subset DP**: Held-Karp over subsets of the needed set, `O(2^k * k^2)`
//!   for all starts at once. Same minimum cost; among equally cheap routes
//!   from the winning start it may pick a different visiting order.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::cost::{missing_edges, route_cost, trip_cost, unit_cost};
use crate::domain::{Edge, LocationIdx, Network, Order, Route};
use crate::error::{ConfigError, QuoteError};
use crate::paths::{enumerate_routes, routes_per_start};

/// Default cap on routes scored per start: 8!, i.e. nine needed warehouses.
const DEFAULT_MAX_PERMUTATIONS: usize = 40_320;

/// Default cap on needed warehouses for the subset DP (2^16 * 16 table cells).
const DEFAULT_MAX_DP_WAREHOUSES: usize = 16;

/// Hard ceiling on needed warehouses for the subset DP, whatever the config
/// says: the table holds 2^k * k cells.
const MAX_DP_WAREHOUSES: usize = 20;

/// Marks an unreached DP cell, or a cell without predecessor.
const UNSET: u8 = u8::MAX;

/// Search strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Exhaustive while within the permutation cap, subset DP beyond it.
    #[default]
    Auto,
    Exhaustive,
    SubsetDp,
}

impl Strategy {
    /// Returns the strategy name used in configuration and logs.
    ///
    /// ```
    /// use warehouse_routing::solver::Strategy;
    ///
    /// assert_eq!(Strategy::SubsetDp.as_str(), "subset_dp");
    /// assert_eq!("dp".parse::<Strategy>().unwrap(), Strategy::SubsetDp);
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Auto => "auto",
            Strategy::Exhaustive => "exhaustive",
            Strategy::SubsetDp => "subset_dp",
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Strategy::Auto),
            "exhaustive" | "brute-force" | "brute_force" => Ok(Strategy::Exhaustive),
            "dp" | "subset_dp" | "subset-dp" | "held-karp" => Ok(Strategy::SubsetDp),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Solver configuration with search bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// Most routes the exhaustive search may score per start.
    pub max_permutations: usize,
    /// Most needed warehouses the subset DP accepts, clamped to 20.
    pub max_dp_warehouses: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Auto,
            max_permutations: DEFAULT_MAX_PERMUTATIONS,
            max_dp_warehouses: DEFAULT_MAX_DP_WAREHOUSES,
        }
    }
}

impl SolverConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Largest needed set the exhaustive search accepts under
    /// `max_permutations`.
    ///
    /// ```
    /// use warehouse_routing::solver::SolverConfig;
    ///
    /// assert_eq!(SolverConfig::default().exhaustive_limit(), 9);
    /// ```
    pub fn exhaustive_limit(&self) -> usize {
        (1..)
            .take_while(|&k| routes_per_start(k).is_some_and(|n| n <= self.max_permutations))
            .last()
            .unwrap_or(0)
    }

    /// Picks the concrete strategy for `needed` warehouses, or refuses.
    fn plan(&self, needed: usize) -> Result<Strategy, QuoteError> {
        let exhaustive = self.exhaustive_limit();
        let dp = self.max_dp_warehouses.min(MAX_DP_WAREHOUSES);
        let chosen = match self.strategy {
            Strategy::Exhaustive if needed <= exhaustive => Strategy::Exhaustive,
            Strategy::Exhaustive => {
                return Err(QuoteError::SearchTooLarge { needed, limit: exhaustive });
            }
            Strategy::SubsetDp if needed <= dp => Strategy::SubsetDp,
            Strategy::SubsetDp => return Err(QuoteError::SearchTooLarge { needed, limit: dp }),
            Strategy::Auto if needed <= exhaustive => Strategy::Exhaustive,
            Strategy::Auto if needed <= dp => Strategy::SubsetDp,
            Strategy::Auto => {
                return Err(QuoteError::SearchTooLarge {
                    needed,
                    limit: exhaustive.max(dp),
                });
            }
        };
        Ok(chosen)
    }
}

/// Outcome of quoting one order.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Cost of the best route, `None` when no route is eligible.
    pub minimum_cost: Option<f64>,
    pub best_route: Option<Route>,
    /// Warehouses the order forced a visit to.
    pub needed: BTreeSet<LocationIdx>,
    /// Shipment weight the route was scored with.
    pub weight: f64,
    /// Strategy that produced the quote.
    pub strategy: Strategy,
    /// Complete routes scored.
    pub candidates: usize,
}

impl Quote {
    pub fn has_route(&self) -> bool {
        self.best_route.is_some()
    }
}

/// Quotes orders against a fixed network.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use warehouse_routing::demo_data::generate_default;
/// use warehouse_routing::domain::Order;
/// use warehouse_routing::solver::{Optimizer, SolverConfig};
///
/// let optimizer = Optimizer::new(Arc::new(generate_default()), SolverConfig::default());
/// let quote = optimizer.quote(&Order::new().with_item("A", 1).with_item("C", 1)).unwrap();
///
/// assert_eq!(quote.minimum_cost, Some(35.0));
/// let names = optimizer.route_names(quote.best_route.as_ref().unwrap());
/// assert_eq!(names, vec![("C2", "C1"), ("C1", "L1")]);
/// ```
#[derive(Debug, Clone)]
pub struct Optimizer {
    network: Arc<Network>,
    config: SolverConfig,
}

impl Optimizer {
    pub fn new(network: Arc<Network>, config: SolverConfig) -> Self {
        Self { network, config }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn config(&self) -> SolverConfig {
        self.config
    }

    /// Finds the cheapest route for an order.
    pub fn quote(&self, order: &Order) -> Result<Quote, QuoteError> {
        solve(&self.network, order, &self.config)
    }

    /// `(origin, destination)` names of every edge of a route.
    pub fn route_names<'a>(&'a self, route: &Route) -> Vec<(&'a str, &'a str)> {
        route.edges().iter().map(|&e| self.network.edge_names(e)).collect()
    }
}

/// Finds the cheapest route for `order` on `network`.
pub fn solve(network: &Network, order: &Order, config: &SolverConfig) -> Result<Quote, QuoteError> {
    let started = Instant::now();
    let needed = network.stock().needed_warehouses(order);
    let weight = network.total_weight(order);

    // An empty needed set has one direct route per start; nothing to search.
    let strategy = if needed.is_empty() {
        Strategy::Exhaustive
    } else {
        config.plan(needed.len())?
    };

    let search = match strategy {
        Strategy::SubsetDp => subset_dp(network, &needed, weight),
        _ => exhaustive(network, &needed, weight),
    };

    info!(
        products = order.len(),
        needed = needed.len(),
        weight,
        strategy = strategy.as_str(),
        candidates = search.candidates,
        cost = ?search.best.as_ref().map(|(c, _)| *c),
        elapsed_us = started.elapsed().as_micros() as u64,
        "Quote computed"
    );
    if let Some((_, route)) = &search.best {
        debug!(
            unit_cost = ?unit_cost(network, route),
            missing_edges = missing_edges(network, route).len(),
            "Best route"
        );
    }

    let (minimum_cost, best_route) = search.best.map(|(c, r)| (Some(c), Some(r))).unwrap_or((None, None));
    Ok(Quote {
        minimum_cost,
        best_route,
        needed,
        weight,
        strategy,
        candidates: search.candidates,
    })
}

/// Best route found by one search, plus how many routes it scored.
#[derive(Default)]
struct Search {
    best: Option<(f64, Route)>,
    candidates: usize,
}

impl Search {
    /// Keeps `route` if it is strictly cheaper than the current best.
    fn offer(&mut self, network: &Network, route: Route, weight: f64) {
        self.candidates += 1;
        let Some(cost) = route_cost(network, &route, weight) else {
            return;
        };
        if self.best.as_ref().map_or(true, |(best, _)| cost < *best) {
            self.best = Some((cost, route));
        }
    }
}

/// Scores every enumerated route from every start in warehouse order.
fn exhaustive(network: &Network, needed: &BTreeSet<LocationIdx>, weight: f64) -> Search {
    let mut search = Search::default();
    for start in network.all_warehouses() {
        for route in enumerate_routes(start, needed, network.delivery()) {
            search.offer(network, route, weight);
        }
        debug!(start = network.location_name(start), candidates = search.candidates, "Start explored");
    }
    search
}

/// Held-Karp over subsets of the needed set.
///
/// `cell(mask, j)` holds the cheapest prefix that starts at some needed
/// warehouse, visits exactly the warehouses in `mask` and stops at `j`,
/// together with the start it came from. Prefix costs add `trip * weight`
/// front to back, the order [`route_cost`] uses, so the minimum matches the
/// exhaustive score bit for bit. Equal costs keep the lower start.
fn subset_dp(network: &Network, needed: &BTreeSet<LocationIdx>, weight: f64) -> Search {
    let nodes: Vec<LocationIdx> = needed.iter().copied().collect();
    let k = nodes.len();
    debug_assert!(k > 0 && k <= MAX_DP_WAREHOUSES);

    let delivery = network.delivery();
    let step = |from: LocationIdx, to: LocationIdx| {
        trip_cost(network, Edge::new(from, to)).map(|cost| cost * weight)
    };
    let better = |cost: f64, origin: u8, best: f64, best_origin: u8| {
        cost < best || (cost == best && origin < best_origin)
    };

    let full = (1usize << k) - 1;
    let cells = (full + 1) * k;
    let mut cost = vec![f64::INFINITY; cells];
    let mut origin = vec![UNSET; cells];
    let mut prev = vec![UNSET; cells];

    for j in 0..k {
        cost[(1 << j) * k + j] = 0.0;
        origin[(1 << j) * k + j] = j as u8;
    }

    for mask in 1..=full {
        if mask.count_ones() < 2 {
            continue;
        }
        for j in (0..k).filter(|&j| mask & (1 << j) != 0) {
            let rest = mask ^ (1 << j);
            let cell = mask * k + j;
            for i in (0..k).filter(|&i| rest & (1 << i) != 0) {
                let from = rest * k + i;
                if origin[from] == UNSET {
                    continue;
                }
                let Some(trip) = step(nodes[i], nodes[j]) else {
                    continue;
                };
                let candidate = cost[from] + trip;
                if better(candidate, origin[from], cost[cell], origin[cell]) {
                    cost[cell] = candidate;
                    origin[cell] = origin[from];
                    prev[cell] = i as u8;
                }
            }
        }
    }

    let mut search = Search::default();
    let mut closing: Option<(f64, u8, usize)> = None;
    for j in 0..k {
        let cell = full * k + j;
        if origin[cell] == UNSET {
            continue;
        }
        let Some(trip) = step(nodes[j], delivery) else {
            continue;
        };
        search.candidates += 1;
        let total = cost[cell] + trip;
        if closing.map_or(true, |(best, o, _)| better(total, origin[cell], best, o)) {
            closing = Some((total, origin[cell], j));
        }
    }

    if let Some((total, _, last)) = closing {
        let mut stops = Vec::with_capacity(k);
        let (mut mask, mut at) = (full, last);
        loop {
            stops.push(nodes[at]);
            let via = prev[mask * k + at];
            if via == UNSET {
                break;
            }
            mask ^= 1 << at;
            at = via as usize;
        }
        stops.reverse();
        debug_assert_eq!(stops.len(), k);
        let route = Route::from_stops(&stops, delivery);
        debug_assert_eq!(route_cost(network, &route, weight), Some(total));
        search.best = Some((total, route));
    }
    search
}
