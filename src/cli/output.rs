//! Result rendering

use std::io::Write;

use iniq_core::Value;

use crate::config::OutputFormat;

/// Render results: one line per value for text, a single JSON array for json.
pub fn render(results: &[Value], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(results.iter().map(|value| format!("{}\n", value)).collect()),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string(results)?)),
    }
}

pub fn write_results<W: Write>(
    writer: &mut W,
    results: &[Value],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let rendered = render(results, format)?;
    writer.write_all(rendered.as_bytes())?;
    writer.flush()?;
    Ok(())
}
