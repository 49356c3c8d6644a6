//! Rule trait and built-in rules.

use std::fmt;

use regex::Regex;
use serde_json::Value;
use validator::ValidateEmail;

use crate::types::Record;

static NULL: Value = Value::Null;

/// What a rule sees while evaluating one field.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Field name under validation.
    pub attribute: &'a str,
    /// The field's value, null when the field is absent.
    pub value: &'a Value,
    /// The full input record, for rules that compare against sibling fields.
    pub record: &'a Record,
}

impl<'a> RuleContext<'a> {
    pub fn new(attribute: &'a str, record: &'a Record) -> Self {
        Self {
            attribute,
            value: record.get(attribute).unwrap_or(&NULL),
            record,
        }
    }

    /// Value of another field in the same record, null when absent.
    pub fn sibling(&self, field: &str) -> &'a Value {
        self.record.get(field).unwrap_or(&NULL)
    }
}

/// Why a rule rejected a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleFailure {
    /// Resolve `key` through the message catalog and substitute `params`.
    Template {
        key: String,
        params: Vec<(String, String)>,
    },
    /// Use this text as the message. `:attribute` is still substituted.
    Message(String),
}

impl RuleFailure {
    pub fn template(key: impl Into<String>) -> Self {
        RuleFailure::Template {
            key: key.into(),
            params: Vec::new(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        RuleFailure::Message(message.into())
    }

    /// Attach a `:name` placeholder value. No-op on literal messages.
    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        if let RuleFailure::Template { params, .. } = &mut self {
            params.push((name.into(), value.to_string()));
        }
        self
    }
}

/// A single predicate over one field's value.
///
/// Built-in and custom rules share this interface. Rules that are not
/// [`implicit`](Rule::implicit) are skipped when the value is absent, null
/// or `""` (see [`is_skippable`]).
pub trait Rule: Send + Sync + fmt::Debug {
    /// Rule name, also the fallback key for message overrides.
    fn name(&self) -> &str;

    /// Whether the rule runs even when the value is skippable.
    fn implicit(&self) -> bool {
        false
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<(), RuleFailure>;
}

/// A second-phase check over the whole record.
///
/// Runs only after every field rule has passed. Returns the failures to add,
/// each keyed by the field it should be reported under.
pub trait RecordRule: Send + Sync {
    fn check(&self, record: &Record) -> Vec<(String, RuleFailure)>;
}

impl<F> RecordRule for F
where
    F: Fn(&Record) -> Vec<(String, RuleFailure)> + Send + Sync,
{
    fn check(&self, record: &Record) -> Vec<(String, RuleFailure)> {
        self(record)
    }
}

/// Null, a blank string, or an empty list. What `required` rejects.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Null or exactly `""`. Non-implicit rules do not run on these values.
pub fn is_skippable(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// How a value is measured by size rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKind {
    String,
    Numeric,
    Array,
}

impl SizeKind {
    fn suffix(self) -> &'static str {
        match self {
            SizeKind::String => "string",
            SizeKind::Numeric => "numeric",
            SizeKind::Array => "array",
        }
    }
}

/// Size of a value: character count, numeric value, or element count.
/// Booleans and null have no size.
pub fn measure(value: &Value) -> Option<(SizeKind, f64)> {
    match value {
        Value::String(s) => Some((SizeKind::String, s.chars().count() as f64)),
        Value::Number(n) => n.as_f64().map(|v| (SizeKind::Numeric, v)),
        Value::Array(items) => Some((SizeKind::Array, items.len() as f64)),
        Value::Object(map) => Some((SizeKind::Array, map.len() as f64)),
        Value::Bool(_) | Value::Null => None,
    }
}

// ---------------------------------------------------------------------------
// Built-in rules
// ---------------------------------------------------------------------------

/// Value must be present and non-empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Rule for Required {
    fn name(&self) -> &str {
        "required"
    }

    fn implicit(&self) -> bool {
        true
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<(), RuleFailure> {
        if is_empty_value(ctx.value) {
            Err(RuleFailure::template("required"))
        } else {
            Ok(())
        }
    }
}

/// Value must be a syntactically valid email address.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Rule for Email {
    fn name(&self) -> &str {
        "email"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<(), RuleFailure> {
        match ctx.value.as_str() {
            Some(s) if s.validate_email() => Ok(()),
            _ => Err(RuleFailure::template("email")),
        }
    }
}

/// Size must be at least the bound.
#[derive(Debug, Clone, Copy)]
pub struct Min(pub u64);

impl Rule for Min {
    fn name(&self) -> &str {
        "min"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<(), RuleFailure> {
        let Some((kind, size)) = measure(ctx.value) else {
            return Ok(());
        };
        if size < self.0 as f64 {
            Err(RuleFailure::template(format!("min.{}", kind.suffix())).with_param("min", self.0))
        } else {
            Ok(())
        }
    }
}

/// Size must not exceed the bound.
#[derive(Debug, Clone, Copy)]
pub struct Max(pub u64);

impl Rule for Max {
    fn name(&self) -> &str {
        "max"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<(), RuleFailure> {
        let Some((kind, size)) = measure(ctx.value) else {
            return Ok(());
        };
        if size > self.0 as f64 {
            Err(RuleFailure::template(format!("max.{}", kind.suffix())).with_param("max", self.0))
        } else {
            Ok(())
        }
    }
}

/// Value must differ from another field's value. Passes when the other
/// field is absent.
#[derive(Debug, Clone)]
pub struct Different {
    other: String,
}

impl Different {
    pub fn new(other: impl Into<String>) -> Self {
        Self {
            other: other.into(),
        }
    }
}

impl Rule for Different {
    fn name(&self) -> &str {
        "different"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<(), RuleFailure> {
        let other = ctx.sibling(&self.other);
        if !other.is_null() && other == ctx.value {
            Err(RuleFailure::template("different").with_param("other", &self.other))
        } else {
            Ok(())
        }
    }
}

/// String value must match a pattern.
#[derive(Debug, Clone)]
pub struct Pattern(pub Regex);

impl Rule for Pattern {
    fn name(&self) -> &str {
        "regex"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<(), RuleFailure> {
        match ctx.value.as_str() {
            Some(s) if self.0.is_match(s) => Ok(()),
            _ => Err(RuleFailure::template("regex")),
        }
    }
}
