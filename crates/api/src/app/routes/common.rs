use std::str::FromStr;

use supplyhub_core::DomainError;

use crate::app::errors::ApiError;

/// Recorded when a path id and the payload id disagree.
pub const IDS_NOT_EQUAL: &str = "The informed ids are not equal!";

/// Parse a path segment into a typed id, answering `400` on failure.
pub fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse()
        .map_err(|e: DomainError| ApiError::Validation(vec![e.to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplyhub_core::ProductId;

    #[test]
    fn malformed_id_is_a_validation_error() {
        assert!(matches!(parse_id::<ProductId>("nope"), Err(ApiError::Validation(_))));
    }

    #[test]
    fn uuid_parses() {
        let id = ProductId::new();
        assert_eq!(parse_id::<ProductId>(&id.to_string()).unwrap(), id);
    }
}
