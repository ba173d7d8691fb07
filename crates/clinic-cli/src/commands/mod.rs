pub mod patient;
pub mod user;

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use uuid::Uuid;

/// Reads a JSON document from `file`, or from stdin when no file is given.
pub(crate) fn read_body(file: &Option<String>) -> Result<serde_json::Value> {
    let content = match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Invalid JSON")
}

/// A string that is not a UUID cannot name any stored record, so it is
/// reported as not found rather than as malformed.
pub(crate) fn lookup_id(raw: &str) -> Option<Uuid> {
    clinic_core::parse_id(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_body_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "Ada"}}"#).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let body = read_body(&Some(path)).unwrap();
        assert_eq!(body["name"], "Ada");
    }

    #[test]
    fn test_read_body_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let err = read_body(&Some(path)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON");
    }

    #[test]
    fn test_lookup_id() {
        let id = Uuid::new_v4();
        assert_eq!(lookup_id(&id.to_string()), Some(id));
        assert_eq!(lookup_id("42"), None);
    }
}
