//! Internal helpers for draft validation.
//!
//! These utilities are **not** part of the public API. They centralize the
//! field checks so every element of a trip is validated the same way.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub(crate) const TITLE_MAX_CHARS: usize = 100;

/// Largest accepted amount, cost or budget: 10^13 minor units.
pub(crate) const MAX_AMOUNT_MINOR: i64 = 10_000_000_000_000;

/// Trim `value` and reject it when empty.
pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidField(format!("{label} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn normalize_title(value: &str) -> ResultEngine<String> {
    let title = normalize_required(value, "title")?;
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(EngineError::InvalidField(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(title)
}

/// Amounts live in `0..=MAX_AMOUNT_MINOR`.
pub(crate) fn ensure_amount(amount_minor: i64, label: &str) -> ResultEngine<i64> {
    if amount_minor < 0 {
        return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
    }
    if amount_minor > MAX_AMOUNT_MINOR {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be <= {MAX_AMOUNT_MINOR}"
        )));
    }
    Ok(amount_minor)
}

/// Accept `HH:MM` (24h) and return it zero padded.
pub(crate) fn normalize_time_of_day(value: Option<&str>, label: &str) -> ResultEngine<Option<String>> {
    let Some(raw) = normalize_optional_text(value) else {
        return Ok(None);
    };
    let time = NaiveTime::parse_from_str(&raw, "%H:%M")
        .map_err(|_| EngineError::InvalidField(format!("{label} must use the HH:MM format")))?;
    Ok(Some(time.format("%H:%M").to_string()))
}

pub(crate) fn ensure_date_order(
    start: NaiveDate,
    end: NaiveDate,
    start_label: &str,
    end_label: &str,
) -> ResultEngine<()> {
    if end < start {
        return Err(EngineError::InvalidField(format!(
            "{end_label} must not be before {start_label}"
        )));
    }
    Ok(())
}

/// Trip logos are inline images: `data:image/<type>;base64,<payload>`.
pub(crate) fn normalize_logo(value: Option<&str>) -> ResultEngine<Option<String>> {
    let Some(logo) = normalize_optional_text(value) else {
        return Ok(None);
    };
    let invalid = || EngineError::InvalidField("logo must be a base64 image data URL".to_string());
    let rest = logo.strip_prefix("data:image/").ok_or_else(invalid)?;
    let (media, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;
    if media.is_empty() || payload.is_empty() {
        return Err(invalid());
    }
    STANDARD.decode(payload).map_err(|_| invalid())?;
    Ok(Some(logo))
}

pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(EngineError::InvalidField("email is not valid".to_string()));
    }
    Ok(email)
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::KeyNotFound(format!("{label} not exists")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles() {
        assert_eq!(normalize_title("  Lisbon  ").unwrap(), "Lisbon");
        assert_eq!(
            normalize_title("   "),
            Err(EngineError::InvalidField("title is required".to_string()))
        );
        assert!(normalize_title(&"a".repeat(100)).is_ok());
        assert!(normalize_title(&"a".repeat(101)).is_err());
    }

    #[test]
    fn amounts() {
        assert_eq!(ensure_amount(0, "amount").unwrap(), 0);
        assert_eq!(
            ensure_amount(MAX_AMOUNT_MINOR, "amount").unwrap(),
            MAX_AMOUNT_MINOR
        );
        assert_eq!(
            ensure_amount(-1, "cost"),
            Err(EngineError::InvalidAmount("cost must be >= 0".to_string()))
        );
        assert!(ensure_amount(MAX_AMOUNT_MINOR + 1, "budget").is_err());
        assert!(ensure_amount(i64::MAX, "budget").is_err());
    }

    #[test]
    fn times_of_day() {
        assert_eq!(
            normalize_time_of_day(Some("9:05"), "departure_time").unwrap(),
            Some("09:05".to_string())
        );
        assert_eq!(normalize_time_of_day(Some(" "), "x").unwrap(), None);
        assert!(normalize_time_of_day(Some("24:00"), "x").is_err());
        assert!(normalize_time_of_day(Some("noon"), "x").is_err());
    }

    #[test]
    fn logos() {
        assert_eq!(
            normalize_logo(Some("data:image/png;base64,aGVsbG8=")).unwrap(),
            Some("data:image/png;base64,aGVsbG8=".to_string())
        );
        assert_eq!(normalize_logo(None).unwrap(), None);
        assert!(normalize_logo(Some("https://example.com/logo.png")).is_err());
        assert!(normalize_logo(Some("data:image/png;base64,@@@")).is_err());
        assert!(normalize_logo(Some("data:text/plain;base64,aGVsbG8=")).is_err());
    }

    #[test]
    fn emails() {
        assert_eq!(
            normalize_email(" Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
        assert!(normalize_email("ada").is_err());
        assert!(normalize_email("ada@localhost").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("a da@example.com").is_err());
    }

    #[test]
    fn date_order() {
        let a = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2026, 5, 3).unwrap();
        assert!(ensure_date_order(a, b, "arrival_date", "departure_date").is_ok());
        assert!(ensure_date_order(a, a, "arrival_date", "departure_date").is_ok());
        assert_eq!(
            ensure_date_order(b, a, "arrival_date", "departure_date"),
            Err(EngineError::InvalidField(
                "departure_date must not be before arrival_date".to_string()
            ))
        );
    }
}
