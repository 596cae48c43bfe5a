//! Warehouse Routing
//!
//! Quotes customer orders against a fixed warehouse network: finds the
//! warehouses an order needs, searches every visiting order that ends at the
//! delivery location and returns the cheapest route, priced as per-trip cost
//! times shipment weight.
//!
//! # Domain Model
//!
//! - [`Order`](domain::Order): products and quantities
//! - [`Network`](domain::Network): warehouses, stock, directed cost table
//! - [`Route`](domain::Route): pickup edges ending at the delivery location
//! - [`Quote`](solver::Quote): cheapest cost and route for one order
//!
//! # Search
//!
//! - **Exhaustive**: every visiting order from every start
//! - **Subset DP**: Held-Karp over the needed warehouses, for larger orders

pub mod api;
pub mod config;
pub mod console;
pub mod cost;
pub mod demo_data;
pub mod domain;
pub mod dto;
pub mod error;
pub mod paths;
pub mod solver;
pub mod stock;
