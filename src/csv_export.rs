// 📄 CSV Export - Flat JSON rows to a CSV string
// Header is the first-seen union of row keys; string cells are quoted,
// numbers and booleans stay bare, missing cells stay blank.

use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use serde_json::{Map, Value};

/// Serialize flat JSON rows into a CSV string.
///
/// The header row is the union of every row's keys in first-seen order;
/// rows missing a key leave that cell blank. Empty input yields an empty
/// string, and the output carries no trailing newline.
pub fn convert_json_to_csv(rows: &[Map<String, Value>]) -> Result<String> {
    if rows.is_empty() {
        return Ok(String::new());
    }

    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.iter().any(|header| header == key) {
                headers.push(key.clone());
            }
        }
    }

    // Cells are rendered up front (the export contract quotes strings and
    // nothing else), so the writer itself must never add quoting.
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());

    writer
        .write_record(&headers)
        .context("Failed to write CSV header")?;

    for row in rows {
        let record: Vec<String> = headers.iter().map(|key| render_cell(row.get(key))).collect();
        writer
            .write_record(&record)
            .context("Failed to write CSV record")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("Failed to take CSV buffer: {}", err.error()))?;
    let csv = String::from_utf8(bytes).context("CSV output was not valid UTF-8")?;

    Ok(csv.trim_end_matches('\n').to_string())
}

/// Render one cell. Strings get double quotes, numbers and booleans their
/// bare text, null and missing keys nothing; anything nested falls back to
/// its JSON text.
fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => format!("\"{}\"", text),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(nested) => nested.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
