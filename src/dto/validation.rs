//! Validation of user input before it becomes a form field.

use validator::ValidationError;

/// Most words a team can guess in one 30 Seconds turn.
pub const MAX_CORRECT_WORDS: u8 = 5;

/// Validates a typed estimate. Both `12.5` and the Dutch `12,5` are accepted.
///
/// # Examples
///
/// ```ignore
/// validate_decimal("12,5") // Ok
/// validate_decimal("1e3")  // Ok
/// validate_decimal("twaalf") // Err - not a number
/// ```
pub fn validate_decimal(text: &str) -> Result<(), ValidationError> {
    parse_decimal(text).map(|_| ()).ok_or_else(|| {
        let mut err = ValidationError::new("decimal_format");
        err.message = Some(format!("`{}` is not a finite number", text.trim()).into());
        err
    })
}

/// Parse a decimal using either `.` or `,` as separator; rejects NaN and infinities.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let value: f64 = text.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

/// Validates the number of words guessed in a turn.
pub fn validate_correct_count(correct: u8) -> Result<(), ValidationError> {
    if correct > MAX_CORRECT_WORDS {
        let mut err = ValidationError::new("correct_count_range");
        err.message = Some(
            format!("at most {MAX_CORRECT_WORDS} words can be guessed (got {correct})").into(),
        );
        return Err(err);
    }
    Ok(())
}
