use std::path::Path;

use colored::Colorize;
use hh_core::{Capacity, LiveObject};

pub fn run(dir: &Path, id: &str, strict: bool) -> Result<(), String> {
    let (factory, _) = super::load_factory(dir, strict)?;

    let definition = factory
        .definition(id)
        .ok_or_else(|| format!("unknown object: \"{id}\""))?;

    if factory.is_location(definition) {
        let location = factory.create_location(id).map_err(|e| e.to_string())?;
        let kind = if location.start {
            "start location"
        } else {
            "location"
        };
        println!("  {} [{}]", location.name.bold(), kind.dimmed());
        println!();
        for line in location.describe().iter().skip(1) {
            println!("  {line}");
        }
        for exit in &location.exits {
            let door = exit
                .door
                .as_deref()
                .map(|d| format!(" (through {d})"))
                .unwrap_or_default();
            println!("  {:<10} -> {}{door}", exit.direction.name(), exit.destination);
        }
        return Ok(());
    }

    let object = factory.create_object(id).map_err(|e| e.to_string())?;
    print_object(&object);
    Ok(())
}

fn print_object(object: &LiveObject) {
    println!("  {} [{}]", object.name.bold(), object.class().to_string().dimmed());
    if !object.aliases.is_empty() {
        println!("  aliases:    {}", object.aliases.join(", "));
    }
    let d = object.dimensions;
    println!("  size:       {} x {} x {} m", d.height, d.width, d.depth);
    if object.is_holder() && !object.contents().is_empty() {
        println!(
            "  weight:     {:.2} kg ({:.2} kg with contents)",
            object.weight,
            object.total_weight()
        );
    } else {
        println!("  weight:     {:.2} kg", object.weight);
    }
    let bounded = object
        .container()
        .filter(|c| c.capacity != Capacity::unbounded());
    if let Some(container) = bounded {
        println!(
            "  capacity:   {} items, {:.2} kg",
            container.capacity.items, container.capacity.weight_kg
        );
    }
    println!();

    for line in object.describe() {
        println!("  {line}");
    }
    let examine = object.examine_text();
    if examine != object.describe() {
        println!();
        for line in examine {
            println!("  {}", line.italic());
        }
    }
}
