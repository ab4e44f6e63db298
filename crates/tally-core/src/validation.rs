//! # Validation Module
//!
//! Input validation utilities for Tally.
//!
//! Validation runs at the API boundary before any storage operation;
//! the database schema (NOT NULL, CHECK, foreign keys) backs it up.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationError;
use crate::{MAX_CATEGORY_LEN, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most [`MAX_NAME_LEN`] characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a category label.
///
/// ## Rules
/// - May be empty (uncategorized products are allowed)
/// - Must be at most [`MAX_CATEGORY_LEN`] characters
pub fn validate_category(category: &str) -> ValidationResult<()> {
    if category.len() > MAX_CATEGORY_LEN {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: MAX_CATEGORY_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price_cents".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates the initial stock level on product creation.
///
/// ## Rules
/// - Must be non-negative (>= 0)
///
/// Later stock mutations carry no such bound; only creation does.
pub fn validate_initial_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Date-Bound Parsing
// =============================================================================

/// Parses an inclusive lower date bound.
///
/// Accepts an RFC 3339 date-time (`2024-01-01T09:30:00Z`) or a bare date
/// (`2024-01-01`). A bare date expands to the start of that day, so the
/// bound stays inclusive.
pub fn parse_start_bound(field: &str, value: &str) -> ValidationResult<DateTime<Utc>> {
    parse_bound(field, value, BoundKind::Start)
}

/// Parses an inclusive upper date bound.
///
/// A bare date expands to the end of that day (23:59:59.999999), so sales
/// recorded at any time on the end date are inside the bound.
pub fn parse_end_bound(field: &str, value: &str) -> ValidationResult<DateTime<Utc>> {
    parse_bound(field, value, BoundKind::End)
}

enum BoundKind {
    Start,
    End,
}

fn parse_bound(field: &str, value: &str, kind: BoundKind) -> ValidationResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = match kind {
            BoundKind::Start => date.and_hms_opt(0, 0, 0),
            BoundKind::End => date.and_hms_micro_opt(23, 59, 59, 999_999),
        };
        // Both constructors are infallible for these fixed clock values
        return Ok(time.expect("valid time of day").and_utc());
    }

    Err(ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected an ISO-8601 date or date-time".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("iPhone 14").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("Electronics").is_ok());
        assert!(validate_category("").is_ok());
        assert!(validate_category(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(99999).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(500).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_initial_stock() {
        assert!(validate_initial_stock(0).is_ok());
        assert!(validate_initial_stock(50).is_ok());
        assert!(validate_initial_stock(-1).is_err());
    }

    #[test]
    fn test_parse_bare_date_bounds() {
        let start = parse_start_bound("start_date", "2024-01-01").unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let end = parse_end_bound("end_date", "2024-01-01").unwrap();
        assert_eq!(end.hour(), 23);
        assert_eq!(end.minute(), 59);
        assert_eq!(end.second(), 59);
        // A sale at noon on the end date is inside the bound.
        let noon = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert!(noon <= end && noon >= start);
    }

    #[test]
    fn test_parse_rfc3339_bound() {
        let dt = parse_start_bound("start_date", "2024-06-15T08:30:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_invalid_bound() {
        let err = parse_end_bound("end_date", "last tuesday").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "end_date"));
    }
}
