//! Input validation shared by the engine and its front-ends.
//!
//! Front-ends run these checks at the prompt so they can re-ask; the engine
//! runs them again before writing so a bad value never reaches the store.

use chrono::NaiveDate;

use crate::{EngineError, ResultEngine};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Checks the `local@domain.tld` shape: word characters, dots and dashes on
/// both sides, and a top-level label made of word characters only.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let allowed = |c: char| is_word_char(c) || c == '.' || c == '-';
    if local.is_empty() || !local.chars().all(allowed) || !domain.chars().all(allowed) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && tld.chars().all(is_word_char),
        None => false,
    }
}

/// Normalizes and validates an email address.
pub fn normalize_email(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if !is_valid_email(trimmed) {
        return Err(EngineError::InvalidInput(format!(
            "invalid email address: {trimmed}"
        )));
    }
    Ok(trimmed.to_string())
}

/// Parses a `YYYY-MM-DD` date, rejecting other layouts and impossible days.
pub fn parse_date(value: &str) -> ResultEngine<NaiveDate> {
    let trimmed = value.trim();
    let invalid = || EngineError::InvalidInput(format!("invalid date (use YYYY-MM-DD): {trimmed}"));

    let bytes = trimmed.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}
