use anyhow::{Context, Result};

use arb_cards::config::Config;
use arb_cards::feed_source::source_for_root;
use arb_cards::loader::{LoadState, SystemClock};
use arb_cards::logging::init_logging;
use arb_cards::page_build::{build_page, write_page};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    let mut config = Config::from_env();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    config.apply_args(&args);

    let source = source_for_root(&config.feed_root, config.timeout_secs)?;
    tracing::info!(feeds = %source.describe(), leagues = config.leagues.len(), "building page");

    let (page, reports) = build_page(&config, source.as_ref(), &SystemClock);
    write_page(&config.output, &page)
        .with_context(|| format!("unable to write {}", config.output.display()))?;

    println!("Page written: {}", config.output.display());
    for report in &reports {
        match report.state {
            LoadState::Rendered => {
                if report.sections > 0 {
                    println!(
                        "{}: {} cards in {} sections",
                        report.feed, report.cards, report.sections
                    );
                } else {
                    println!("{}: {} cards", report.feed, report.cards);
                }
            }
            _ => println!(
                "{}: failed ({})",
                report.feed,
                report.error.as_deref().unwrap_or("unknown error")
            ),
        }
        if !report.issues.is_empty() {
            println!(" skipped records: {}", report.issues.len());
            for issue in report.issues.iter().take(8) {
                println!("  - {issue}");
            }
        }
    }

    Ok(())
}
