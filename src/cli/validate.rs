//! Config validation command implementation.

use super::CliError;
use std::fs;
use std::path::PathBuf;
use tankgrid::Config;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or is rejected.
pub(crate) fn execute(config: PathBuf) -> Result<(), CliError> {
    println!("Validating: {}", config.display());
    println!();

    let text = fs::read_to_string(&config)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", config.display())))?;
    print_check("Readable", true);

    let parsed: Result<Config, _> = serde_json::from_str(&text);
    print_check("JSON matches the config schema", parsed.is_ok());
    let parsed = parsed.map_err(|e| CliError::new(format!("Failed to parse {}: {e}", config.display())))?;

    let checked = parsed.validate();
    print_check("Values are playable", checked.is_ok());
    checked?;

    println!();
    println!("Summary:");
    println!("  Map:        {}x{}", parsed.map_width, parsed.map_height);
    println!("  Enemies:    {} (limit {})", parsed.enemies, parsed.enemy_limit);
    println!(
        "  Obstacles:  {} solid, {} breakable clusters",
        parsed.solid_clusters, parsed.dirt_clusters
    );
    println!("  FPS:        {}", parsed.fps);
    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
