//! CLI command implementations

pub mod check_pair;
pub mod extract;
pub mod keygen;

use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::nky::{Field, NkyContainer};

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins over `verbose` when set.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "nky_tools=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second init (tests, embedding) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Print every container field as hex; only called in verbose mode
pub fn print_fields(container: &NkyContainer) {
    println!("{}", "Container fields:".cyan().bold());
    for field in Field::ALL {
        let range = container.range(field);
        println!(
            "  {} [{}..{}) ({} bytes) => {}",
            field.name().yellow(),
            range.start,
            range.end,
            range.len(),
            hex::encode(container.field(field))
        );
    }
    println!();
}

pub fn rule() -> String {
    "─".repeat(60).dimmed().to_string()
}
