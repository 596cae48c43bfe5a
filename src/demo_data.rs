//! Demo topologies.
//!
//! - `default`: three warehouses (C1, C2, C3) delivering to L1, the network
//!   the quote service runs with when nothing else is configured
//! - `regional`: six warehouses around a city store with an incomplete,
//!   asymmetric cost table
//!
//! [`generate_random`] builds seeded random topologies for tests and the
//! benchmark.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{MissingEdge, Network, Order};
use crate::error::NetworkError;

/// Names accepted by [`generate_by_name`].
const DATASETS: [&str; 2] = ["default", "regional"];

/// Stock of the default network.
const DEFAULT_STOCK: &[(&str, &[&str])] = &[
    ("C1", &["A", "B", "D", "E"]),
    ("C2", &["C", "F", "G"]),
    ("C3", &["H", "I"]),
];

/// Per-trip costs of the default network, listed once per unordered pair.
const DEFAULT_COSTS: &[(&str, &str, f64)] = &[
    ("C1", "L1", 20.0),
    ("C2", "L1", 30.0),
    ("C3", "L1", 40.0),
    ("C1", "C2", 15.0),
    ("C1", "C3", 25.0),
    ("C2", "C3", 35.0),
];

const REGIONAL_WAREHOUSES: [&str; 6] = ["HARBOR", "AIRPORT", "MILL", "RAILYARD", "OUTLET", "DEPOT"];

const REGIONAL_STOCK: &[(&str, &[&str])] = &[
    ("HARBOR", &["fish", "salt", "rope"]),
    ("AIRPORT", &["parcels", "medicine"]),
    ("MILL", &["flour", "bran", "salt"]),
    ("RAILYARD", &["coal", "steel", "rope"]),
    ("OUTLET", &["shoes", "coats"]),
    ("DEPOT", &["parcels", "batteries", "coats"]),
];

/// Directed costs; uphill legs to AIRPORT cost more than the way back and
/// OUTLET has no direct link to HARBOR or RAILYARD.
const REGIONAL_COSTS: &[(&str, &str, f64)] = &[
    ("HARBOR", "AIRPORT", 42.0),
    ("AIRPORT", "HARBOR", 36.0),
    ("HARBOR", "MILL", 18.0),
    ("MILL", "HARBOR", 18.0),
    ("HARBOR", "RAILYARD", 12.0),
    ("RAILYARD", "HARBOR", 12.0),
    ("HARBOR", "DEPOT", 27.0),
    ("DEPOT", "HARBOR", 27.0),
    ("AIRPORT", "MILL", 30.0),
    ("MILL", "AIRPORT", 34.0),
    ("AIRPORT", "RAILYARD", 25.0),
    ("RAILYARD", "AIRPORT", 29.0),
    ("AIRPORT", "OUTLET", 16.0),
    ("OUTLET", "AIRPORT", 20.0),
    ("AIRPORT", "DEPOT", 11.0),
    ("DEPOT", "AIRPORT", 14.0),
    ("MILL", "RAILYARD", 9.0),
    ("RAILYARD", "MILL", 9.0),
    ("MILL", "OUTLET", 22.0),
    ("OUTLET", "MILL", 22.0),
    ("MILL", "DEPOT", 26.0),
    ("DEPOT", "MILL", 26.0),
    ("RAILYARD", "DEPOT", 19.0),
    ("DEPOT", "RAILYARD", 19.0),
    ("OUTLET", "DEPOT", 13.0),
    ("DEPOT", "OUTLET", 13.0),
    ("HARBOR", "STORE", 31.0),
    ("STORE", "HARBOR", 31.0),
    ("AIRPORT", "STORE", 24.0),
    ("STORE", "AIRPORT", 28.0),
    ("MILL", "STORE", 17.0),
    ("STORE", "MILL", 17.0),
    ("RAILYARD", "STORE", 21.0),
    ("STORE", "RAILYARD", 21.0),
    ("OUTLET", "STORE", 8.0),
    ("STORE", "OUTLET", 8.0),
    ("DEPOT", "STORE", 15.0),
    ("STORE", "DEPOT", 15.0),
];

/// Returns the list of available demo dataset names.
pub fn available_datasets() -> &'static [&'static str] {
    &DATASETS
}

/// Builds a demo network by name.
///
/// # Examples
///
/// ```
/// use warehouse_routing::demo_data::generate_by_name;
///
/// assert!(generate_by_name("default").is_some());
/// assert!(generate_by_name("REGIONAL").is_some());
/// assert!(generate_by_name("atlantis").is_none());
/// ```
pub fn generate_by_name(name: &str) -> Option<Network> {
    match name.to_lowercase().as_str() {
        "default" => Some(generate_default()),
        "regional" => Some(generate_regional()),
        _ => None,
    }
}

/// The three-warehouse network: C1, C2, C3 delivering to L1 at 0.5 kg/unit.
pub fn generate_default() -> Network {
    let mut builder = Network::builder(["C1", "C2", "C3"], "L1").with_weight_per_unit(0.5);
    for (warehouse, products) in DEFAULT_STOCK {
        builder = builder.with_stock(*warehouse, products.iter().copied());
    }
    for (a, b, cost) in DEFAULT_COSTS {
        builder = builder.with_symmetric_cost(*a, *b, *cost);
    }
    builder.build().expect("default network is valid")
}

/// Six warehouses delivering to STORE at 1.25 kg/unit. Missing links fall
/// back to a 250 per-trip penalty.
pub fn generate_regional() -> Network {
    let mut builder = Network::builder(REGIONAL_WAREHOUSES, "STORE")
        .with_weight_per_unit(1.25)
        .with_missing_edge(MissingEdge::Penalty(250.0));
    for (warehouse, products) in REGIONAL_STOCK {
        builder = builder.with_stock(*warehouse, products.iter().copied());
    }
    for (from, to, cost) in REGIONAL_COSTS {
        builder = builder.with_cost(*from, *to, *cost);
    }
    builder.build().expect("regional network is valid")
}

/// Random topology with `warehouses` warehouses named `W0..`, products
/// `P0..P{products-1}` and delivery location `DEST`.
///
/// Every product is stocked by at least one warehouse. Every directed pair
/// gets a cost in `5..=60`.
///
/// # Examples
///
/// ```
/// use warehouse_routing::demo_data::generate_random;
///
/// let network = generate_random(7, 5, 12).unwrap();
/// assert_eq!(network.warehouse_count(), 5);
/// assert_eq!(network.stock().products().len(), 12);
/// ```
pub fn generate_random(seed: u64, warehouses: usize, products: usize) -> Result<Network, NetworkError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let names: Vec<String> = (0..warehouses).map(|i| format!("W{i}")).collect();

    let mut carried: Vec<Vec<String>> = vec![Vec::new(); warehouses];
    if warehouses > 0 {
        for p in 0..products {
            let product = format!("P{p}");
            carried[p % warehouses].push(product.clone());
            for stock in carried.iter_mut() {
                if rng.gen_bool(0.2) {
                    stock.push(product.clone());
                }
            }
        }
    }

    let mut builder = Network::builder(names.iter().cloned(), "DEST")
        .with_weight_per_unit(rng.gen_range(1..=4) as f64 * 0.25);
    for (name, stock) in names.iter().zip(carried) {
        builder = builder.with_stock(name.clone(), stock);
    }

    let locations: Vec<&str> = names.iter().map(String::as_str).chain(["DEST"]).collect();
    for from in &locations {
        for to in &locations {
            if from != to {
                builder = builder.with_cost(*from, *to, rng.gen_range(5..=60) as f64);
            }
        }
    }

    builder.build()
}

/// Random order of up to `max_lines` products from `P0..P{products-1}`, each
/// with a quantity in `1..=5`.
pub fn random_order(rng: &mut StdRng, products: usize, max_lines: usize) -> Order {
    if products == 0 {
        return Order::new();
    }
    let lines = rng.gen_range(0..=max_lines);
    (0..lines)
        .map(|_| (format!("P{}", rng.gen_range(0..products)), rng.gen_range(1..=5u32)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_network_shape() {
        let network = generate_default();
        assert_eq!(network.warehouses(), &["C1", "C2", "C3"]);
        assert_eq!(network.delivery_name(), "L1");
        assert_eq!(network.weight_per_unit(), 0.5);
        assert_eq!(network.stock().sources("A"), &[0]);
        assert_eq!(network.stock().sources("G"), &[1]);
        assert_eq!(network.stock().sources("I"), &[2]);
        assert_eq!(network.stock().products().len(), 9);
        assert_eq!(network.costs().entries().count(), 12);
        assert_eq!(network.costs().get(1, 2), Some(35.0));
        assert_eq!(network.costs().get(2, 1), Some(35.0));
    }

    #[test]
    fn test_regional_network_has_gaps() {
        let network = generate_regional();
        let outlet = network.location_idx("OUTLET").unwrap();
        let harbor = network.location_idx("HARBOR").unwrap();
        assert_eq!(network.costs().get(outlet, harbor), None);
        assert_eq!(network.missing_edge(), MissingEdge::Penalty(250.0));
        assert_eq!(network.stock().sources("salt").len(), 2);
    }

    #[test]
    fn test_random_network_is_reproducible() {
        let a = generate_random(42, 6, 20).unwrap();
        let b = generate_random(42, 6, 20).unwrap();
        let ea: Vec<_> = a.costs().entries().collect();
        let eb: Vec<_> = b.costs().entries().collect();
        assert_eq!(ea, eb);
        assert_eq!(ea.len(), 7 * 6);
        for p in 0..20 {
            assert!(!a.stock().sources(&format!("P{p}")).is_empty());
        }
    }

    #[test]
    fn test_random_network_without_warehouses_fails() {
        assert!(matches!(
            generate_random(1, 0, 3),
            Err(NetworkError::NoWarehouses)
        ));
    }

    #[test]
    fn test_random_order_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let order = random_order(&mut rng, 10, 4);
            assert!(order.len() <= 4);
            assert!(order.items().all(|(_, q)| (1..=5).contains(&q)));
        }
        assert!(random_order(&mut rng, 0, 4).is_empty());
    }
}
