//! JSON decoding with error context.
//!
//! The analytics API leans on loosely-shaped arrays, so a bare serde error
//! ("invalid type: null, expected a string") is rarely enough to find the
//! offending field. Decode through `serde_path_to_error` and attach the path
//! plus a snippet of the offending line.

use anyhow::Result;

/// Decode `body`, annotating failures with the serde path and a caret-marked
/// snippet around the error location.
pub fn decode_with_context<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    match serde_path_to_error::deserialize(deserializer) {
        Ok(value) => Ok(value),
        Err(err) => {
            let inner = err.inner();
            let (line, column) = (inner.line(), inner.column());
            let path = err.path().to_string();

            let message = inner.to_string();
            let location_suffix = format!(" at line {line} column {column}");
            let message = message
                .strip_suffix(&location_suffix)
                .unwrap_or(&message)
                .to_string();

            let mut out = String::new();
            if !path.is_empty() && path != "." {
                out.push_str(&format!("at path '{path}': "));
            }
            out.push_str(&format!(
                "{message} (line {line} col {column})\n{}",
                snippet(body, line, column)
            ));
            Err(anyhow::anyhow!(out))
        }
    }
}

/// A short slice of the failing line with a caret under the error column.
fn snippet(body: &str, line: usize, column: usize) -> String {
    const CONTEXT: usize = 24;

    let target = body.lines().nth(line.saturating_sub(1)).unwrap_or("");
    if target.is_empty() {
        return "(empty line)".to_string();
    }

    // column is 1-based
    let error_idx = column.saturating_sub(1).min(target.len());
    let start = error_idx.saturating_sub(CONTEXT / 2);
    let end = (error_idx + CONTEXT / 2).min(target.len());

    let caret = " ".repeat(error_idx - start) + "^";
    format!("...{}...\n   {caret}", &target[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde::Deserialize;

    #[test]
    fn decode_error_names_the_path() {
        #[derive(Debug, Deserialize)]
        struct Upload {
            #[allow(dead_code)]
            success: bool,
        }

        let result: Result<Upload> = decode_with_context(r#"{"success": "yes"}"#);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("success"));
        assert!(message.contains("^"));
    }

    #[test]
    fn decode_error_in_nested_day_map() {
        // Shaped like the occupancy-counts payload with a count that upstream
        // accidentally emitted as a string.
        let body = r#"{"M": {"09:00:00": 4, "10:00:00": "5"}}"#;
        let result: Result<IndexMap<String, IndexMap<String, u32>>> = decode_with_context(body);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("M.10:00:00"), "got: {message}");
    }

    #[test]
    fn valid_payload_passes_through() {
        let value: IndexMap<String, u32> = decode_with_context(r#"{"CENG": 3}"#).unwrap();
        assert_eq!(value.get("CENG"), Some(&3));
    }
}
