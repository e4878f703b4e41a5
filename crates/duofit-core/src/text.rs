//! Conversions between second counts and the "MM:SS" text users type and see.

use crate::error::ValidationError;

/// Parse `"MM:SS"` or bare seconds into whole seconds.
///
/// Blank input is 0 and an empty field counts as 0 (`"5:"` is five
/// minutes). Seconds above 59 are accepted and simply added.
pub fn parse_time(input: &str) -> Result<u32, ValidationError> {
    let text = input.trim();
    if text.is_empty() {
        return Ok(0);
    }
    let invalid = || ValidationError::InvalidTime {
        input: input.to_string(),
    };

    let parts: Vec<&str> = text.split(':').collect();
    match parts.as_slice() {
        [secs] => parse_field(secs).ok_or_else(invalid),
        [mins, secs] => {
            let mins = parse_field(mins).ok_or_else(invalid)?;
            let secs = parse_field(secs).ok_or_else(invalid)?;
            mins.checked_mul(60)
                .and_then(|m| m.checked_add(secs))
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

fn parse_field(field: &str) -> Option<u32> {
    if field.is_empty() {
        return Some(0);
    }
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Render seconds as `MM:SS`, rounding partial seconds up so a
/// countdown shows `00:01` until it actually reaches zero.
pub fn format_seconds(secs: f64) -> String {
    let whole = if secs.is_finite() && secs > 0.0 {
        secs.ceil() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
