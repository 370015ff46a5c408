use super::{display_pointer, json_pretty, load_schema, EXIT_SUCCESS};
use formkeys_core::{bracket_mapping, SchemaShape};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Bracket renames licensed by one object node of the schema.
#[derive(Debug, Serialize)]
struct MappingReport {
    pointer: String,
    renames: BTreeMap<String, String>,
}

pub fn run(schema_path: &Path, pointer: Option<&str>, json: bool) -> Result<u8, String> {
    let schema = load_schema(schema_path, pointer)?;

    let reports: Vec<MappingReport> = schema
        .iter()
        .filter_map(|node| {
            let properties = node.declared_properties()?;
            let renames: BTreeMap<String, String> = bracket_mapping(&properties)
                .into_iter()
                .map(|(base, bracketed)| (base.to_owned(), bracketed.to_owned()))
                .collect();
            (!renames.is_empty()).then(|| MappingReport {
                pointer: node.pointer().to_owned(),
                renames,
            })
        })
        .collect();

    if json {
        println!("{}", json_pretty(&reports)?);
        return Ok(EXIT_SUCCESS);
    }

    if reports.is_empty() {
        println!("no bracket-suffixed properties declared");
        return Ok(EXIT_SUCCESS);
    }
    for report in &reports {
        println!("{}", display_pointer(&report.pointer));
        for (base, bracketed) in &report.renames {
            println!("  {base} -> {bracketed}");
        }
    }
    Ok(EXIT_SUCCESS)
}
