//! Stock index and warehouse resolution.
//!
//! The stock table is given per warehouse; quoting needs the inverse, so the
//! index keeps both directions.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{LocationIdx, Order};

/// Which warehouses carry which products.
#[derive(Clone, Debug, Default)]
pub struct StockIndex {
    carried: Vec<BTreeSet<String>>,
    sources: HashMap<String, Vec<LocationIdx>>,
}

impl StockIndex {
    /// Builds the index from one product list per warehouse, indexed like
    /// the network's warehouse list.
    pub fn new(carried: Vec<Vec<String>>) -> Self {
        let carried: Vec<BTreeSet<String>> = carried
            .into_iter()
            .map(|products| products.into_iter().collect())
            .collect();

        let mut sources: HashMap<String, Vec<LocationIdx>> = HashMap::new();
        for (warehouse, products) in carried.iter().enumerate() {
            for product in products {
                sources.entry(product.clone()).or_default().push(warehouse);
            }
        }

        Self { carried, sources }
    }

    /// Warehouses stocking `product`, in enumeration order. Empty if nobody
    /// stocks it.
    ///
    /// # Examples
    ///
    /// ```
    /// use warehouse_routing::stock::StockIndex;
    ///
    /// let index = StockIndex::new(vec![
    ///     vec!["A".into(), "B".into()],
    ///     vec!["B".into()],
    /// ]);
    /// assert_eq!(index.sources("B"), &[0, 1]);
    /// assert!(index.sources("Z").is_empty());
    /// ```
    pub fn sources(&self, product: &str) -> &[LocationIdx] {
        self.sources.get(product).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Products carried by a warehouse.
    pub fn carried(&self, warehouse: LocationIdx) -> Option<&BTreeSet<String>> {
        self.carried.get(warehouse)
    }

    /// Every product stocked somewhere, sorted.
    pub fn products(&self) -> BTreeSet<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    /// The warehouses an order forces a visit to: every warehouse stocking
    /// any ordered product. Unstocked products add nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use warehouse_routing::domain::Order;
    /// use warehouse_routing::stock::StockIndex;
    ///
    /// let index = StockIndex::new(vec![
    ///     vec!["A".into()],
    ///     vec!["C".into()],
    ///     vec!["H".into()],
    /// ]);
    /// let order = Order::new().with_item("A", 1).with_item("C", 1).with_item("Z", 9);
    /// let needed: Vec<_> = index.needed_warehouses(&order).into_iter().collect();
    /// assert_eq!(needed, vec![0, 1]);
    /// ```
    pub fn needed_warehouses(&self, order: &Order) -> BTreeSet<LocationIdx> {
        order
            .products()
            .flat_map(|product| self.sources(product).iter().copied())
            .collect()
    }
}
