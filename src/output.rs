use crate::parser::RequestItems;
use crate::types::{DataValue, FileContent};

/// Serialize parsed [`RequestItems`] to a JSON string.
///
/// When `pretty` is `true` the output is indented for readability.
/// Repeated keys within a collection appear repeatedly, in input order.
pub fn format_json(items: &RequestItems, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(items).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    } else {
        serde_json::to_string(items).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Render parsed [`RequestItems`] in a human-readable debug format.
pub fn format_debug(items: &RequestItems) -> String {
    let mut out = String::with_capacity(256);

    out.push_str("=== Request Items ===\n");

    out.push_str(&format!("\n--- Headers ({}) ---\n", items.headers.len()));
    for (key, value) in items.headers.iter() {
        match value {
            Some(v) => out.push_str(&format!("  {key}: {v}\n")),
            None => out.push_str(&format!("  {key}: <empty>\n")),
        }
    }

    out.push_str(&format!("\n--- Params ({}) ---\n", items.params.len()));
    for (key, value) in items.params.iter() {
        out.push_str(&format!("  {key}={value}\n"));
    }

    out.push_str(&format!("\n--- Data ({}) ---\n", items.data.len()));
    for (key, value) in items.data.iter() {
        match value {
            DataValue::Text(s) => out.push_str(&format!("  {key}: {s}\n")),
            DataValue::Json(v) => out.push_str(&format!("  {key}: {v}\n")),
        }
    }

    out.push_str(&format!("\n--- Files ({}) ---\n", items.files.len()));
    for (key, upload) in items.files.iter() {
        let mode = match &upload.content {
            FileContent::Buffered(bytes) => format!("{} bytes buffered", bytes.len()),
            FileContent::Streaming(_) => "streaming".to_string(),
        };
        out.push_str(&format!(
            "  {key}: {} ({}; {mode})\n",
            upload.filename, upload.content_type
        ));
    }

    out.push_str("=====================\n");
    out
}
