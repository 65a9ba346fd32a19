use jobscout_core::{AppConfig, LocationTable};

/// Prints the location table in use.
///
/// # Errors
///
/// Returns an error if a configured locations file cannot be read or is invalid.
pub(crate) fn run_locations(config: &AppConfig) -> anyhow::Result<()> {
    let table = LocationTable::from_optional_path(config.locations_path.as_deref())?;

    match &config.locations_path {
        Some(path) => println!("locations from {}", path.display()),
        None => println!("built-in locations"),
    }
    println!("{:<20}{:<14}FACETS", "NAME", "GEO ID");
    for entry in table.entries() {
        let facets: Vec<String> = entry.facets.iter().map(u64::to_string).collect();
        println!("{:<20}{:<14}{}", entry.name, entry.geo_id, facets.join(","));
    }

    Ok(())
}
