//! Exhaustive search vs subset DP on seeded random networks.
//!
//! Usage: `bench [seed] [orders-per-size]`

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use warehouse_routing::console::{self, BenchSummary};
use warehouse_routing::demo_data::{generate_random, random_order};
use warehouse_routing::domain::Order;
use warehouse_routing::error::{NetworkError, QuoteError};
use warehouse_routing::solver::{Optimizer, Quote, SolverConfig, Strategy};

const WAREHOUSE_SIZES: [usize; 6] = [3, 4, 5, 6, 7, 8];
const PRODUCTS_PER_WAREHOUSE: usize = 3;

fn main() -> Result<(), NetworkError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("warehouse_routing=warn".parse().unwrap())
                .add_directive("bench=info".parse().unwrap()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let per_size: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(200);

    console::print_banner();
    info!(seed, per_size, "Benchmark started");

    let started = Instant::now();
    let mut summary = BenchSummary::default();

    for (i, &warehouses) in WAREHOUSE_SIZES.iter().enumerate() {
        let products = warehouses * PRODUCTS_PER_WAREHOUSE;
        let network = Arc::new(generate_random(seed + i as u64, warehouses, products)?);

        let mut rng = StdRng::seed_from_u64(seed ^ warehouses as u64);
        let orders: Vec<Order> = (0..per_size)
            .map(|_| random_order(&mut rng, products, warehouses * 2))
            .collect();

        let brute = Optimizer::new(network.clone(), SolverConfig::default().with_strategy(Strategy::Exhaustive));
        let dp = Optimizer::new(network, SolverConfig::default().with_strategy(Strategy::SubsetDp));

        let (brute_quotes, brute_time) = run(&brute, &orders);
        let (dp_quotes, dp_time) = run(&dp, &orders);

        let mut mismatches = 0;
        for (order, (a, b)) in orders.iter().zip(brute_quotes.iter().zip(&dp_quotes)) {
            match (a, b) {
                (Ok(a), Ok(b)) => {
                    summary.candidates += (a.candidates + b.candidates) as u64;
                    if a.minimum_cost != b.minimum_cost {
                        mismatches += 1;
                        warn!(?order, exhaustive = ?a.minimum_cost, dp = ?b.minimum_cost, "Strategies disagree");
                    }
                }
                (a, b) => {
                    mismatches += 1;
                    warn!(?order, exhaustive = ?a.as_ref().err(), dp = ?b.as_ref().err(), "Quote refused");
                }
            }
        }

        console::print_bench_row(warehouses, orders.len(), brute_time, dp_time, mismatches);
        summary.orders += orders.len();
        summary.mismatches += mismatches;
    }

    summary.elapsed = started.elapsed();
    console::print_bench_summary(&summary);
    Ok(())
}

/// Quotes every order in parallel; returns the quotes in order and the wall
/// time.
fn run(optimizer: &Optimizer, orders: &[Order]) -> (Vec<Result<Quote, QuoteError>>, Duration) {
    let started = Instant::now();
    let quotes = orders.par_iter().map(|order| optimizer.quote(order)).collect();
    (quotes, started.elapsed())
}
