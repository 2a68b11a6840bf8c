// ── Form validation rules ──
//
// Pure predicates shared by the booking flow gates and the CLI prompts.
// Anything date-relative takes `today` as an argument so callers own
// the clock.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern compiles")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?(\d{1,3}[\s.-]?)?(\(\d{1,4}\)[\s.-]?)?\d[\d\s.-]*$")
        .expect("phone pattern compiles")
});

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;
const MIN_CARD_DIGITS: usize = 16;

// ── Field errors ─────────────────────────────────────────────────────

/// Validation failures keyed by field, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(IndexMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. The first message recorded for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn extend(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.add(field, message);
        }
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

// ── Predicates ───────────────────────────────────────────────────────

pub fn validate_required(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn validate_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

pub fn validate_phone(value: &str) -> bool {
    let value = value.trim();
    let digits = value.chars().filter(char::is_ascii_digit).count();
    PHONE_RE.is_match(value) && (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

/// Today or later.
pub fn validate_future_date(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}

// ── Card details ─────────────────────────────────────────────────────

/// Card number with whitespace removed.
pub fn card_digits(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn check_card_number(value: &str) -> Result<(), &'static str> {
    let digits = card_digits(value);
    if digits.is_empty() {
        Err("Card number is required")
    } else if digits.len() < MIN_CARD_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        Err("Please enter a valid card number")
    } else {
        Ok(())
    }
}

/// `MM/YY`, not before the month containing `today`.
pub fn check_expiry(value: &str, today: NaiveDate) -> Result<(), &'static str> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Expiry date is required");
    }
    let Some((mm, yy)) = value.split_once('/') else {
        return Err("Invalid expiry date");
    };
    let (Ok(month), Ok(year)) = (mm.trim().parse::<u32>(), yy.trim().parse::<i32>()) else {
        return Err("Invalid expiry date");
    };
    if !(1..=12).contains(&month) || !(0..100).contains(&year) || yy.trim().len() != 2 {
        return Err("Invalid expiry date");
    }
    let year = 2000 + year;
    if (year, month) < (today.year(), today.month()) {
        return Err("Card has expired");
    }
    Ok(())
}

pub fn check_cvv(value: &str) -> Result<(), &'static str> {
    let value = value.trim();
    if value.is_empty() {
        Err("CVV is required")
    } else if !(3..=4).contains(&value.len()) || !value.bytes().all(|b| b.is_ascii_digit()) {
        Err("CVV must be 3-4 digits")
    } else {
        Ok(())
    }
}

/// Digits grouped in fours: `4111 1111 1111 1111`.
pub fn format_card_number(value: &str) -> String {
    let digits: Vec<char> = value.chars().filter(char::is_ascii_digit).take(19).collect();
    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalise loose expiry input (`1229`, `12/29`, `12 / 29`) to `MM/YY`.
pub fn format_expiry(value: &str) -> String {
    let digits: String = value.chars().filter(char::is_ascii_digit).take(4).collect();
    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn emails() {
        assert!(validate_email("ama@example.com"));
        assert!(validate_email("first.last+tag@mail.example.co.uk"));
        assert!(!validate_email(""));
        assert!(!validate_email("plainaddress"));
        assert!(!validate_email("user@domain"));
        assert!(!validate_email("user@domain..com"));
        assert!(!validate_email("user@.com"));
        assert!(!validate_email("us er@example.com"));
    }

    #[test]
    fn phones() {
        assert!(validate_phone("+1 (555) 123-4567"));
        assert!(validate_phone("+44 20 1234 5678"));
        assert!(validate_phone("0123456789"));
        assert!(validate_phone("(123) 456-7890"));
        assert!(!validate_phone("123"));
        assert!(!validate_phone("abc"));
        assert!(!validate_phone("123-abc-4567"));
    }

    #[test]
    fn required_ignores_whitespace() {
        assert!(validate_required("0"));
        assert!(validate_required("  text  "));
        assert!(!validate_required("   "));
    }

    #[test]
    fn future_dates_include_today() {
        let today = date(2024, 6, 1);
        assert!(validate_future_date(today, today));
        assert!(!validate_future_date(date(2024, 5, 31), today));
    }

    #[test]
    fn card_number_rules() {
        assert_eq!(check_card_number(""), Err("Card number is required"));
        assert_eq!(check_card_number("4111 1111 1111"), Err("Please enter a valid card number"));
        assert_eq!(check_card_number("4111-1111-1111-1111"), Err("Please enter a valid card number"));
        assert_eq!(check_card_number("4111 1111 1111 1111"), Ok(()));
    }

    #[test]
    fn expiry_rules() {
        let today = date(2024, 6, 15);
        assert_eq!(check_expiry("06/24", today), Ok(()));
        assert_eq!(check_expiry("12/30", today), Ok(()));
        assert_eq!(check_expiry("05/24", today), Err("Card has expired"));
        assert_eq!(check_expiry("13/25", today), Err("Invalid expiry date"));
        assert_eq!(check_expiry("0625", today), Err("Invalid expiry date"));
        assert_eq!(check_expiry("", today), Err("Expiry date is required"));
    }

    #[test]
    fn cvv_rules() {
        assert_eq!(check_cvv("123"), Ok(()));
        assert_eq!(check_cvv("1234"), Ok(()));
        assert_eq!(check_cvv("12"), Err("CVV must be 3-4 digits"));
        assert_eq!(check_cvv("12a"), Err("CVV must be 3-4 digits"));
    }

    #[test]
    fn formatting_helpers() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("4111-1111 11"), "4111 1111 11");
        assert_eq!(format_expiry("1229"), "12/29");
        assert_eq!(format_expiry("12 / 29"), "12/29");
        assert_eq!(format_expiry("1"), "1");
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("email", "Email is required");
        errors.add("email", "Please enter a valid email address");
        errors.add("phone", "Phone number is required");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(
            errors.to_string(),
            "email: Email is required; phone: Phone number is required"
        );
    }
}
