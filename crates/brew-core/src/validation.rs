//! # Validation Module
//!
//! Input validation rules, applied before business logic runs.
//!
//! Defense in depth: the surfaces do their own cosmetic checks, this module
//! is the authoritative layer, and the database schema backs it up with NOT
//! NULL / CHECK / UNIQUE constraints.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

fn too_long(field: &str, max: usize) -> ValidationError {
    ValidationError::TooLong {
        field: field.to_string(),
        max,
    }
}

/// Validates the customer display name given at checkout.
///
/// Must be non-empty after trimming; at most 120 characters.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(required("customer_name"));
    }
    if name.chars().count() > 120 {
        return Err(too_long("customer_name", 120));
    }

    Ok(())
}

/// Validates optional free-text order notes (at most 500 characters).
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.chars().count() > 500 {
        return Err(too_long("notes", 500));
    }
    Ok(())
}

/// Validates a menu item name: non-empty, at most 200 characters.
pub fn validate_menu_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(required("name"));
    }
    if name.chars().count() > 200 {
        return Err(too_long("name", 200));
    }

    Ok(())
}

/// Validates a menu category: non-empty, at most 100 characters.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(required("category"));
    }
    if category.chars().count() > 100 {
        return Err(too_long("category", 100));
    }

    Ok(())
}

/// Validates a price in cents: never negative.
pub fn validate_price_cents(price_cents: i64) -> ValidationResult<()> {
    if price_cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price_cents".to_string(),
        });
    }
    Ok(())
}

/// Validates a table number: strictly positive.
pub fn validate_table_number(table_number: i64) -> ValidationResult<()> {
    if table_number <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "table_number".to_string(),
        });
    }
    Ok(())
}

/// Validates a seat count: strictly positive.
pub fn validate_seats(seats: i64) -> ValidationResult<()> {
    if seats <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "seats".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_name_rules() {
        assert!(validate_customer_name("Alex").is_ok());
        assert!(validate_customer_name("  Alex  ").is_ok());
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"x".repeat(121)).is_err());
    }

    #[test]
    fn menu_item_rules() {
        assert!(validate_menu_item_name("Latte").is_ok());
        assert!(validate_menu_item_name(" ").is_err());
        assert!(validate_category("Coffee").is_ok());
        assert!(validate_category("").is_err());
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(450).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn table_rules() {
        assert!(validate_table_number(4).is_ok());
        assert!(validate_table_number(0).is_err());
        assert!(validate_table_number(-3).is_err());
        assert!(validate_seats(2).is_ok());
        assert!(validate_seats(0).is_err());
    }

    #[test]
    fn notes_length() {
        assert!(validate_notes("extra hot, oat milk").is_ok());
        assert!(validate_notes(&"n".repeat(501)).is_err());
    }
}
