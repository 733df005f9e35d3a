use serde_json::{Map, Value};

use crate::error::{Error, Result};

use super::unit::{AdminLevel, AdminUnit, BoundingBox};

/// Parse a boundary-service body (`{"data": [...]}`) into units of `level`.
///
/// A missing or null `data` key yields an empty list. Anything else that
/// does not carry the expected per-row fields is a malformed response.
pub fn parse_units(level: AdminLevel, body: &[u8]) -> Result<Vec<AdminUnit>> {
    let what = level.plural();
    let value: Value = serde_json::from_slice(body).map_err(|e| Error::malformed(what, e))?;

    let object = value.as_object()
        .ok_or_else(|| Error::malformed(what, "expected a JSON object at the top level"))?;

    let rows = match object.get("data") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(rows)) => rows,
        Some(_) => return Err(Error::malformed(what, "`data` is not an array")),
    };

    rows.iter().enumerate()
        .map(|(idx, row)| {
            let row = row.as_object()
                .ok_or_else(|| Error::malformed(what, format!("row {idx} is not an object")))?;
            parse_row(level, row).map_err(|msg| Error::malformed(what, format!("row {idx}: {msg}")))
        })
        .collect()
}

fn parse_row(level: AdminLevel, row: &Map<String, Value>) -> std::result::Result<AdminUnit, String> {
    let (code_key, name_key) = level.field_keys();

    // Codes come back as strings but may be bare numbers; keep leading zeros when they are strings.
    let code = match row.get(code_key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(format!("missing `{code_key}`")),
    };
    let name = row.get(name_key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing `{name_key}`"))?
        .to_string();

    let bbox = BoundingBox {
        xmin: coord(row, "xmin")?,
        xmax: coord(row, "xmax")?,
        ymin: coord(row, "ymin")?,
        ymax: coord(row, "ymax")?,
    };

    Ok(AdminUnit { level, code, name, bbox })
}

/// Extent fields are numeric, though some deployments serialize them as strings.
fn coord(row: &Map<String, Value>, key: &str) -> std::result::Result<f64, String> {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| format!("`{key}` is not finite")),
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| format!("`{key}` is not a number")),
        _ => Err(format!("missing `{key}`")),
    }
}
