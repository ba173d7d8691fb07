// Record identifiers are random v4 UUIDs assigned by the store.
use uuid::Uuid;

use crate::error::{CoreError, Result};

pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

/// Parses a caller-supplied id.
pub fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| CoreError::invalid_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn test_parse_id() {
        let id = generate_id();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_id(&format!(" {id} ")).unwrap(), id);
        assert!(matches!(parse_id("42"), Err(CoreError::InvalidId(_))));
    }
}
