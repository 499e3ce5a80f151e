use serde::Serialize;

/// Pretty-print JSON to stdout.
pub fn print_json(value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{}", s);
    Ok(())
}
