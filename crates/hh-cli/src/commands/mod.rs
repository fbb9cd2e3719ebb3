pub mod check;
pub mod list;
pub mod show;
pub mod simulate;

use std::path::Path;

use colored::Colorize;
use hh_factory::{FactoryConfig, LoadReport, ObjectFactory};
use tracing::debug;

/// Load every definition under `dir`. Skipped files are reported on stderr
/// and returned alongside the factory.
fn load_factory(dir: &Path, strict: bool) -> Result<(ObjectFactory, LoadReport), String> {
    let mut factory =
        ObjectFactory::new().with_config(FactoryConfig::default().with_strict(strict));
    let report = factory.load_root(dir).map_err(|e| e.to_string())?;

    for skipped in &report.skipped {
        eprintln!(
            "  {} {}: {}",
            "skipped".yellow().bold(),
            skipped.path.display(),
            skipped.reason
        );
    }
    if factory.is_empty() {
        return Err(format!("no definitions found in {}", dir.display()));
    }
    debug!(dir = %dir.display(), definitions = factory.len(), "factory ready");
    Ok((factory, report))
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}
