//! Colorful console output for startup and benchmark runs.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::{MissingEdge, Network};
use crate::solver::SolverConfig;

/// Inner width of the summary box.
const BOX_WIDTH: usize = 58;

/// ASCII art banner for service startup.
pub fn print_banner() {
    let banner = r#"
 __      __                 _
 \ \    / /_ _ _ _ ___ ___ | |_  ___ _  _ ___ ___
  \ \/\/ / _` | '_/ -_)   \| ' \/ _ \ || (_-</ -_)
   \_/\_/\__,_|_| \___|_||_|_||_\___/\_,_/__/\___|
"#;
    println!("{}", banner.cyan().bold());
    println!(
        "  {} {}\n",
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black(),
        "Warehouse Routing".bright_cyan()
    );
}

/// Prints the served network and solver bounds.
pub fn print_network(network: &Network, config: &SolverConfig) {
    let policy = match network.missing_edge() {
        MissingEdge::Penalty(cost) => format!("penalty {cost}"),
        MissingEdge::Reject => "reject".to_string(),
    };
    println!(
        "{} {} {} Network: warehouses ({}), products ({}), cost entries ({}), delivery ({}), missing edges ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Network]".bright_cyan(),
        network.warehouse_count().to_formatted_string(&Locale::en).bright_yellow(),
        network.stock().products().len().to_formatted_string(&Locale::en).bright_yellow(),
        network.costs().entries().count().to_formatted_string(&Locale::en).bright_yellow(),
        network.delivery_name().white().bold(),
        policy.white()
    );
    println!(
        "{} {} {} Solver: strategy ({}), exhaustive up to ({}) warehouses, subset DP up to ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Solver]".bright_cyan(),
        config.strategy.as_str().bright_magenta(),
        config.exhaustive_limit().to_string().yellow(),
        config.max_dp_warehouses.to_string().yellow()
    );
}

/// Prints the listen address.
pub fn print_listening(addr: SocketAddr) {
    println!(
        "{} {} {} Listening on {} (Swagger UI at {})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Server]".bright_cyan(),
        format!("http://{addr}").bright_white().bold(),
        "/q/swagger-ui".bright_black()
    );
}

/// Prints one benchmark row.
pub fn print_bench_row(warehouses: usize, orders: usize, exhaustive: Duration, dp: Duration, mismatches: usize) {
    let status = if mismatches == 0 {
        "agree".bright_green().to_string()
    } else {
        format!("{mismatches} mismatches").bright_red().bold().to_string()
    };
    println!(
        "    {} {:>2} warehouses │ {:>6} orders │ exhaustive {} │ subset DP {} │ {}",
        "→".bright_blue(),
        warehouses,
        orders.to_formatted_string(&Locale::en).white(),
        format!("{:>8}", format_duration(exhaustive)).yellow(),
        format!("{:>8}", format_duration(dp)).yellow(),
        status
    );
}

/// Totals of a benchmark run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BenchSummary {
    pub orders: usize,
    pub candidates: u64,
    pub mismatches: usize,
    pub elapsed: Duration,
}

/// Prints the benchmark summary box.
pub fn print_bench_summary(summary: &BenchSummary) {
    let border = "═".repeat(BOX_WIDTH);
    println!();
    println!("{}", format!("╔{border}╗").bright_cyan());

    let (status_text, ok) = if summary.mismatches == 0 {
        ("✓ STRATEGIES AGREE ON EVERY ORDER", true)
    } else {
        ("✗ STRATEGIES DISAGREE", false)
    };
    let status_colored = if ok {
        status_text.bright_green().bold().to_string()
    } else {
        status_text.bright_red().bold().to_string()
    };
    let padding = BOX_WIDTH.saturating_sub(status_text.chars().count());
    println!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(padding / 2),
        status_colored,
        " ".repeat(padding - padding / 2),
        "║".bright_cyan()
    );
    println!("{}", format!("╠{border}╣").bright_cyan());

    let rows = [
        ("Orders:", summary.orders.to_formatted_string(&Locale::en)),
        ("Routes scored:", summary.candidates.to_formatted_string(&Locale::en)),
        ("Mismatches:", summary.mismatches.to_formatted_string(&Locale::en)),
        ("Wall time:", format!("{:.2}s", summary.elapsed.as_secs_f64())),
    ];
    for (label, value) in rows {
        println!("{}  {:<18}{:>36}  {}", "║".bright_cyan(), label, value, "║".bright_cyan());
    }

    println!("{}", format!("╚{border}╝").bright_cyan());
    println!();
}

/// Formats a duration nicely.
fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

/// Returns a timestamp string.
fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| format!("{}.{:03}", d.as_secs(), d.subsec_millis()))
        .unwrap_or_else(|_| "0.000".to_string())
}
