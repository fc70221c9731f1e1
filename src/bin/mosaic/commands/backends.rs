//! `mosaic backends` command

use anyhow::Result;

use super::Global;
use mosaic::builder::BackendRegistry;

pub fn execute(_global: &Global) -> Result<()> {
    let registry = BackendRegistry::new();

    for summary in registry.summaries() {
        let categories = if summary.categories.is_empty() {
            "-".to_string()
        } else {
            summary.categories.join(", ")
        };
        println!(
            "{:<10} {:<9} {:<20} {}",
            summary.name,
            summary.kind,
            summary.extensions.join(" "),
            categories
        );
    }
    Ok(())
}
