//! Client-side field validation.
//!
//! Each input type lists its rules in order through [`Rules`]; every failing
//! rule contributes one [`FieldError`], so callers see all problems at once.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::{FieldError, ValidationErrors};

/// `YYYY-MM-DD HH:MM`, e.g. `2020-09-17 16:51`
pub const SHIPPING_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
/// `YYYYMMDD`, e.g. `20200102`
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d{2}\d{11}$").expect("phone pattern is valid"));
static SHIPPING_DATE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}$").expect("shipping date pattern is valid")
});
static COMPACT_DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("compact date pattern is valid"));

/// Implemented by every request type the client sends.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Ordered list of field rules collecting failures.
#[derive(Debug, Default)]
pub struct Rules {
    errors: Vec<FieldError>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when `value` is empty.
    pub fn required(self, field: &'static str, value: &str, message: &str) -> Self {
        self.check(field, !value.is_empty(), message)
    }

    /// Applies `rule` only when `value` is present and non-empty.
    pub fn when_present<F>(
        self,
        field: &'static str,
        value: Option<&str>,
        rule: F,
        message: &str,
    ) -> Self
    where
        F: Fn(&str) -> bool,
    {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => {
                let ok = rule(v);
                self.check(field, ok, message)
            }
            None => self,
        }
    }

    fn check(mut self, field: &'static str, ok: bool, message: &str) -> Self {
        if !ok {
            self.errors.push(FieldError {
                field,
                message: message.to_string(),
            });
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::new(self.errors))
        }
    }
}

pub fn is_email(value: &str) -> bool {
    validator::validate_email(value)
}

/// `+` followed by a two-digit dialing code and an eleven-digit number.
pub fn is_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

pub fn is_shipping_date(value: &str) -> bool {
    SHIPPING_DATE_SHAPE.is_match(value)
        && NaiveDateTime::parse_from_str(value, SHIPPING_DATE_FORMAT).is_ok()
}

pub fn is_compact_date(value: &str) -> bool {
    COMPACT_DATE_SHAPE.is_match(value)
        && NaiveDate::parse_from_str(value, COMPACT_DATE_FORMAT).is_ok()
}
