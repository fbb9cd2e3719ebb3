use std::path::Path;

use colored::Colorize;
use hh_factory::FactoryError;

use super::plural;

pub fn run(dir: &Path, strict: bool) -> Result<(), String> {
    let (factory, report) = super::load_factory(dir, strict)?;

    let failures = match factory.validate_objects() {
        Ok(_) => Vec::new(),
        Err(FactoryError::Validation(failures)) => failures,
        Err(e) => return Err(e.to_string()),
    };

    for failure in &failures {
        eprintln!("  {} {}: {}", "FAIL".red().bold(), failure.id, failure.error);
    }

    let problems = failures.len() + report.skipped.len();
    if problems > 0 {
        return Err(format!("{} found", plural(problems, "problem")));
    }

    let locations = factory.definitions().filter(|d| factory.is_location(d)).count();
    println!("  All checks passed.");
    println!(
        "  {}, {}",
        plural(factory.len(), "definition"),
        plural(locations, "location")
    );
    Ok(())
}
