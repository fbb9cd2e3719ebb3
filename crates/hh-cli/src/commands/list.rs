use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use super::plural;

pub fn run(dir: &Path, object_type: Option<&str>, strict: bool) -> Result<(), String> {
    let (factory, _) = super::load_factory(dir, strict)?;

    let results: Vec<_> = factory
        .definitions()
        .filter(|d| object_type.is_none_or(|t| d.object_type.eq_ignore_ascii_case(t)))
        .collect();

    if results.is_empty() {
        println!("  No definitions found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Type", "Name", "File"]);

    for definition in &results {
        let file = definition
            .source
            .strip_prefix(dir)
            .unwrap_or(&definition.source)
            .display()
            .to_string();
        table.add_row(vec![
            definition.id.as_str(),
            definition.object_type.as_str(),
            definition.name.as_str(),
            file.as_str(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {}", plural(results.len(), "definition"));

    Ok(())
}
