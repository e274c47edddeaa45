//! # Checkout Demo
//!
//! Prints checkout totals for the reference scenarios, or for a cart
//! scanned from the command line against a pricing file.
//!
//! ## Usage
//! ```bash
//! # Reference scenarios A, B, C with the built-in pricing
//! cargo run -p checkout-demo
//!
//! # Price a custom cart against a config file
//! cargo run -p checkout-demo -- --config apps/checkout-demo/pricing.toml --scan A:3 --scan D
//!
//! # Charge items no promotion covers at unit price
//! PROMO_UNCOVERED_ITEMS=charge_unit_price cargo run -p checkout-demo
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Parse arguments
//! 3. Load pricing config (file or built-in) and apply env overrides
//! 4. Scan, calculate, print

use std::path::PathBuf;
use std::{env, fs};

use anyhow::{bail, Context, Result};
use promo_core::{PricingConfig, ProductId, TotalBreakdown};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Built-in pricing used when no `--config` is given.
const REFERENCE_PRICING: &str = include_str!("../pricing.toml");

/// Log filter when `RUST_LOG` is unset. The target is the crate name,
/// `promo_core`, not the package name.
const DEFAULT_LOG_FILTER: &str = "info,promo_core=debug";

/// Env var overriding `[pricing] uncovered_items`.
const UNCOVERED_ITEMS_ENV: &str = "PROMO_UNCOVERED_ITEMS";

/// Reference scenarios: (name, scans).
const SCENARIOS: &[(&str, &[(&str, u32)])] = &[
    ("Scenario A", &[("A", 1), ("B", 1), ("C", 1)]),
    ("Scenario B", &[("A", 5), ("B", 5), ("C", 1)]),
    ("Scenario C", &[("A", 3), ("B", 5), ("D", 1)]),
];

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    scans: Vec<(ProductId, u32)>,
    help: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let args = parse_args(env::args().skip(1))?;
    if args.help {
        print_help();
        return Ok(());
    }

    let config = load_config(args.config.as_ref())?;
    let catalog = config.catalog()?;

    if args.scans.is_empty() {
        for (name, scans) in SCENARIOS {
            let mut checkout = config.checkout();
            for &(id, qty) in scans.iter() {
                checkout.scan(id, qty)?;
            }
            let total = checkout
                .calculate_total(&catalog)
                .with_context(|| format!("pricing {name}"))?;
            println!("{name} Total: {total}");
        }
        return Ok(());
    }

    let mut checkout = config.checkout();
    for (id, qty) in args.scans {
        checkout
            .scan(id.clone(), qty)
            .with_context(|| format!("scanning {id} x {qty}"))?;
    }
    let breakdown = checkout.calculate_breakdown(&catalog)?;
    print_breakdown(&breakdown);

    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout carries only totals.
///
/// ## Log Levels
/// - Default: `info`, with per-promotion `debug` amounts from promo-core
/// - `RUST_LOG=warn` - missing catalog entries only
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    let mut raw = raw.into_iter();

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = raw.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--scan" | "-s" => {
                let item = raw.next().context("--scan needs ID[:QTY]")?;
                args.scans.push(parse_scan(&item)?);
            }
            "--help" | "-h" => args.help = true,
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(args)
}

/// Parses `ID` or `ID:QTY`.
fn parse_scan(item: &str) -> Result<(ProductId, u32)> {
    let (id, qty) = match item.split_once(':') {
        Some((id, qty)) => {
            let qty = qty
                .trim()
                .parse()
                .with_context(|| format!("invalid quantity in '{item}'"))?;
            (id, qty)
        }
        None => (item, 1),
    };

    Ok((ProductId::parse(id)?, qty))
}

fn load_config(path: Option<&PathBuf>) -> Result<PricingConfig> {
    let mut config = match path {
        Some(path) => {
            info!(?path, "Loading pricing config from file");
            let contents = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            PricingConfig::from_toml_str(&contents)?
        }
        None => {
            debug!("Using built-in reference pricing");
            PricingConfig::from_toml_str(REFERENCE_PRICING)?
        }
    };

    if let Ok(raw) = env::var(UNCOVERED_ITEMS_ENV) {
        config.override_uncovered_items(&raw)?;
    }

    Ok(config)
}

fn print_breakdown(breakdown: &TotalBreakdown) {
    for line in &breakdown.promotions {
        println!("  {:<28} {:>10}", line.description, line.amount.to_string());
    }
    for line in &breakdown.uncovered {
        let label = format!("{} x {} (unit price)", line.quantity, line.product_id);
        println!("  {:<28} {:>10}", label, line.amount.to_string());
    }
    println!("  {:<28} {:>10}", "Total", breakdown.total.to_string());
}

fn print_help() {
    println!("Checkout Demo");
    println!();
    println!("Usage: checkout-demo [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>    Pricing config (default: built-in reference pricing)");
    println!("  -s, --scan <ID[:QTY]>  Scan an item, repeatable (default: run scenarios A-C)");
    println!("  -h, --help             Show this help message");
    println!();
    println!("Environment:");
    println!("  {UNCOVERED_ITEMS_ENV}  ignore | charge_unit_price");
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use promo_core::Money;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_scan() {
        let (id, qty) = parse_scan("A:3").unwrap();
        assert_eq!(id.as_str(), "A");
        assert_eq!(qty, 3);

        let (id, qty) = parse_scan("D").unwrap();
        assert_eq!(id.as_str(), "D");
        assert_eq!(qty, 1);

        assert!(parse_scan("A:x").is_err());
        assert!(parse_scan(":2").is_err());
    }

    #[test]
    fn test_parse_args() {
        let args = parse_args(strings(&["-c", "p.toml", "--scan", "A:2", "-s", "B"])).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("p.toml")));
        assert_eq!(args.scans.len(), 2);
        assert!(!args.help);

        assert!(parse_args(strings(&["--bogus"])).is_err());
        assert!(parse_args(strings(&["--config"])).is_err());
        assert!(parse_args(strings(&["-h"])).unwrap().help);
    }

    #[test]
    fn test_default_log_filter() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(DEFAULT_LOG_FILTER.starts_with("info,"));
        assert!(DEFAULT_LOG_FILTER.contains("promo_core=debug"));
    }

    #[test]
    fn test_built_in_pricing_parses() {
        let config = PricingConfig::from_toml_str(REFERENCE_PRICING).unwrap();
        let catalog = config.catalog().unwrap();

        let mut checkout = config.checkout();
        for &(id, qty) in SCENARIOS[1].1 {
            checkout.scan(id, qty).unwrap();
        }
        assert_eq!(checkout.calculate_total(&catalog).unwrap(), Money::from_major(350));
    }
}
