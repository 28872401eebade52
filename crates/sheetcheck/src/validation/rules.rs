//! Cell rules: the built-in registry and the `Rule` trait for custom checks.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SheetError;
use crate::input::Cell;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Outcome of evaluating one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub message: Cow<'static, str>,
}

impl Verdict {
    /// A passing verdict.
    pub fn pass(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    /// A failing verdict.
    pub fn fail(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// A rule that could not reach a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RuleFault(pub String);

impl RuleFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A check applied to single cells.
///
/// Rules must be stateless: one instance may be shared by any number of
/// validation runs at once.
///
/// A rule that cannot reach a verdict must return [`RuleFault`]. The engine
/// records the fault against that cell and carries on with the rest of the
/// sheet. Panics are not caught: a panicking rule aborts the whole run.
pub trait Rule: Send + Sync {
    /// Evaluate one cell. Return `Err` rather than panicking on bad input.
    fn evaluate(&self, value: &Cell) -> Result<Verdict, RuleFault>;

    /// Name shown in listings and debug output.
    fn name(&self) -> &str {
        "custom"
    }
}

/// The fixed set of built-in rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuiltinRule {
    /// 12-digit Aadhaar number starting with 2-9.
    Aadhaar,
    /// 10-digit Indian mobile number starting with 6-9.
    Phone,
    /// 6-digit Indian postal code.
    PinCode,
    /// `local@domain.tld` shaped address.
    Email,
    /// Present and not blank.
    Required,
    /// A finite number.
    Numeric,
}

impl BuiltinRule {
    /// Every built-in rule, in registry order.
    pub const ALL: [BuiltinRule; 6] = [
        BuiltinRule::Aadhaar,
        BuiltinRule::Phone,
        BuiltinRule::PinCode,
        BuiltinRule::Email,
        BuiltinRule::Required,
        BuiltinRule::Numeric,
    ];

    /// Registry name.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinRule::Aadhaar => "aadhaar",
            BuiltinRule::Phone => "phone",
            BuiltinRule::PinCode => "pinCode",
            BuiltinRule::Email => "email",
            BuiltinRule::Required => "required",
            BuiltinRule::Numeric => "numeric",
        }
    }

    /// Short description of what the rule accepts.
    pub fn description(&self) -> &'static str {
        match self {
            BuiltinRule::Aadhaar => "12 digits, first digit 2-9 (spaces ignored)",
            BuiltinRule::Phone => "10 digits, first digit 6-9 (spaces ignored)",
            BuiltinRule::PinCode => "exactly 6 digits (spaces ignored)",
            BuiltinRule::Email => "name@domain.tld with no whitespace",
            BuiltinRule::Required => "any non-blank value",
            BuiltinRule::Numeric => "a finite number",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            BuiltinRule::Aadhaar => "Valid Aadhaar",
            BuiltinRule::Phone => "Valid phone number",
            BuiltinRule::PinCode => "Valid PIN code",
            BuiltinRule::Email => "Valid email",
            BuiltinRule::Required => "Field is required",
            BuiltinRule::Numeric => "Valid number",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            BuiltinRule::Aadhaar => "Invalid Aadhaar number (12 digits, starts with 2-9)",
            BuiltinRule::Phone => "Invalid Indian phone number (10 digits, starts with 6-9)",
            BuiltinRule::PinCode => "Invalid PIN code (6 digits)",
            BuiltinRule::Email => "Invalid email format",
            BuiltinRule::Required => "Field cannot be empty",
            BuiltinRule::Numeric => "Value must be numeric",
        }
    }

    /// Find a rule by registry name.
    pub fn lookup(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Apply the rule, returning only pass/fail.
    pub fn check(&self, value: &Cell) -> bool {
        match self {
            BuiltinRule::Aadhaar => is_digit_run(&compact(value), 12, '2'..='9'),
            BuiltinRule::Phone => is_digit_run(&compact(value), 10, '6'..='9'),
            BuiltinRule::PinCode => is_digit_run(&compact(value), 6, '0'..='9'),
            BuiltinRule::Email => EMAIL_PATTERN.is_match(value.to_text().trim()),
            BuiltinRule::Required => !value.is_absent() && !value.to_text().trim().is_empty(),
            BuiltinRule::Numeric => is_finite_number(value),
        }
    }

    /// Apply the rule, attaching its fixed message.
    pub fn verdict(&self, value: &Cell) -> Verdict {
        if self.check(value) {
            Verdict::pass(self.success_message())
        } else {
            Verdict::fail(self.failure_message())
        }
    }
}

impl Rule for BuiltinRule {
    fn evaluate(&self, value: &Cell) -> Result<Verdict, RuleFault> {
        Ok(self.verdict(value))
    }

    fn name(&self) -> &str {
        BuiltinRule::name(self)
    }
}

impl FromStr for BuiltinRule {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aadhaar" => Ok(BuiltinRule::Aadhaar),
            "phone" => Ok(BuiltinRule::Phone),
            "pincode" | "pin_code" | "pin-code" => Ok(BuiltinRule::PinCode),
            "email" => Ok(BuiltinRule::Email),
            "required" => Ok(BuiltinRule::Required),
            "numeric" => Ok(BuiltinRule::Numeric),
            _ => Err(SheetError::UnknownRule(s.to_string())),
        }
    }
}

impl fmt::Display for BuiltinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A rule backed by a closure.
pub struct FnRule<F> {
    name: String,
    check: F,
}

impl<F> Rule for FnRule<F>
where
    F: Fn(&Cell) -> Result<Verdict, RuleFault> + Send + Sync,
{
    fn evaluate(&self, value: &Cell) -> Result<Verdict, RuleFault> {
        (self.check)(value)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap a closure as a named rule.
pub fn rule_fn<F>(name: impl Into<String>, check: F) -> FnRule<F>
where
    F: Fn(&Cell) -> Result<Verdict, RuleFault> + Send + Sync,
{
    FnRule {
        name: name.into(),
        check,
    }
}

/// Cell text with every whitespace character removed.
fn compact(value: &Cell) -> String {
    value.to_text().chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_digit_run(s: &str, len: usize, leading: std::ops::RangeInclusive<char>) -> bool {
    s.len() == len
        && s.chars().all(|c| c.is_ascii_digit())
        && s.chars().next().is_some_and(|c| leading.contains(&c))
}

fn is_finite_number(value: &Cell) -> bool {
    match value {
        Cell::Number(n) => n.is_finite(),
        Cell::Empty => false,
        Cell::Text(s) => {
            let s = s.trim();
            !s.is_empty() && parse_number(s).is_some_and(f64::is_finite)
        }
    }
}

/// Parse decimal, exponent, and `0x`/`0o`/`0b` integer literals.
fn parse_number(s: &str) -> Option<f64> {
    let radix = match s.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return s.parse::<f64>().ok(),
    };

    let digits = &s[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Some(
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * radix as f64 + d as f64),
    )
}
