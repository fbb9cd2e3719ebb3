use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use hh_simulation::{SimConfig, SimEventKind, Simulation};

pub fn run(
    dir: &Path,
    ticks: u64,
    seed: u64,
    tick_seconds: f64,
    fight: Option<&str>,
    strict: bool,
) -> Result<(), String> {
    let (factory, _) = super::load_factory(dir, strict)?;

    let config = SimConfig::default()
        .with_seed(seed)
        .with_tick_seconds(tick_seconds)
        .with_max_events(1000);
    let mut sim = Simulation::from_factory(&factory, config).map_err(|e| e.to_string())?;

    if let Some(pair) = fight {
        engage(&mut sim, pair)?;
    }

    let feed = sim.subscribe();
    sim.run(ticks)
        .map_err(|e| format!("simulation error: {e}"))?;

    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({ticks} ticks, seed={seed}, {tick_seconds}s/tick)").dimmed()
    );
    println!();

    let mut any = false;
    for event in feed.try_iter() {
        any = true;
        let tick_label = format!("[tick {:>3}]", event.tick).dimmed();
        println!("  {tick_label} {}", colorize_event(&event.kind, &event.description));
    }
    if !any {
        println!("  {}", "(no events)".dimmed());
    }
    println!();

    print_characters(&sim);
    Ok(())
}

/// Make the two characters named in `pair` ("a,b") fight each other.
fn engage(sim: &mut Simulation, pair: &str) -> Result<(), String> {
    let (a, b) = pair
        .split_once(',')
        .ok_or_else(|| format!("--fight expects two IDs separated by a comma, got \"{pair}\""))?;
    let (a, b) = (a.trim(), b.trim());

    let find = |id: &str| {
        sim.world()
            .find_by_id(id)
            .map(|(location, instance)| (location.to_string(), instance))
            .ok_or_else(|| format!("no \"{id}\" anywhere in the world"))
    };
    let (location_a, instance_a) = find(a)?;
    let (location_b, instance_b) = find(b)?;
    if location_a != location_b {
        return Err(format!(
            "\"{a}\" is in {location_a} but \"{b}\" is in {location_b}"
        ));
    }

    sim.engage(&location_a, instance_a, instance_b)
        .map_err(|e| e.to_string())
}

fn print_characters(sim: &Simulation) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Character", "Location", "HP", "Status"]);

    let mut count = 0;
    for location in sim.world().locations() {
        for object in location.characters() {
            let Some(character) = object.as_character() else {
                continue;
            };
            count += 1;
            let status = if character.is_fighting() {
                "fighting".red().to_string()
            } else {
                "idle".to_string()
            };
            table.add_row(vec![
                object.name.clone(),
                location.name.clone(),
                format!("{}/{}", character.hp, character.max_hp),
                status,
            ]);
        }
    }

    if count == 0 {
        println!("  No characters left standing.");
        return;
    }
    println!("  {}", "Characters".bold().underline());
    println!();
    println!("{table}");
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::Died { .. } => description.red().bold(),
        SimEventKind::AttackHit { .. } => description.yellow(),
        SimEventKind::AttackMissed { .. } => description.dimmed(),
        SimEventKind::Dropped { .. } => description.cyan(),
        SimEventKind::Disengaged { .. } => description.green(),
        SimEventKind::Moved { .. } | SimEventKind::DoorUnlocked { .. } => description.blue(),
        SimEventKind::Custom { .. } => description.normal(),
    }
}
