//! Custom rules: uppercase check, closure predicates, and the registration
//! check that keeps a password distinct from the username.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::rules::{is_empty_value, RecordRule, Rule, RuleContext, RuleFailure};
use crate::types::Record;

/// Value must equal its own uppercase form.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uppercase;

impl Rule for Uppercase {
    fn name(&self) -> &str {
        "uppercase"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<(), RuleFailure> {
        match ctx.value.as_str() {
            Some(s) if s.to_uppercase() != s => {
                Err(RuleFailure::message(":attribute must be UPPERCASE"))
            }
            _ => Ok(()),
        }
    }
}

type Predicate = dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync;

/// Inline predicate rule. Returning `Err(message)` fails the field with that
/// message.
#[derive(Clone)]
pub struct ClosureRule {
    name: String,
    predicate: Arc<Predicate>,
}

impl ClosureRule {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }
}

impl fmt::Debug for ClosureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Rule for ClosureRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<(), RuleFailure> {
        (self.predicate)(ctx.attribute, ctx.value).map_err(RuleFailure::Message)
    }
}

/// Record rule: the password must not be the same as the username.
///
/// Skipped when either field is empty; presence is the field rules' job.
#[derive(Debug, Clone)]
pub struct RegistrationRule {
    field: String,
    other: String,
}

impl RegistrationRule {
    pub fn new(field: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            other: other.into(),
        }
    }
}

impl Default for RegistrationRule {
    fn default() -> Self {
        Self::new("password", "username")
    }
}

impl RecordRule for RegistrationRule {
    fn check(&self, record: &Record) -> Vec<(String, RuleFailure)> {
        let (Some(value), Some(other)) = (record.get(&self.field), record.get(&self.other)) else {
            return Vec::new();
        };
        if is_empty_value(value) || is_empty_value(other) || value != other {
            return Vec::new();
        }
        vec![(
            self.field.clone(),
            RuleFailure::template("registration").with_param("other", &self.other),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn uppercase_rejects_lowercase() {
        let r = record(json!({ "code": "abc" }));
        let result = Uppercase.evaluate(&RuleContext::new("code", &r));
        assert_matches!(result, Err(RuleFailure::Message(m)) if m.contains("UPPERCASE"));
    }

    #[test]
    fn uppercase_accepts_uppercase_and_non_letters() {
        let r = record(json!({ "code": "ABC", "email": "TIAN@GMAIL.COM", "n": "123" }));
        assert!(Uppercase.evaluate(&RuleContext::new("code", &r)).is_ok());
        assert!(Uppercase.evaluate(&RuleContext::new("email", &r)).is_ok());
        assert!(Uppercase.evaluate(&RuleContext::new("n", &r)).is_ok());
    }

    #[test]
    fn closure_rule_reports_returned_message() {
        let rule = ClosureRule::new("no_spaces", |attribute, value| {
            match value.as_str() {
                Some(s) if s.contains(' ') => Err(format!("The field {attribute} must not contain spaces")),
                _ => Ok(()),
            }
        });
        let r = record(json!({ "username": "ti an" }));
        assert_eq!(
            rule.evaluate(&RuleContext::new("username", &r)),
            Err(RuleFailure::Message(
                "The field username must not contain spaces".to_string()
            ))
        );
        assert_eq!(rule.name(), "no_spaces");
    }

    #[test]
    fn registration_rule_flags_matching_password() {
        let r = record(json!({ "username": "a@b.com", "password": "a@b.com" }));
        let failures = RegistrationRule::default().check(&r);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "password");
    }

    #[test]
    fn registration_rule_ignores_distinct_or_missing_values() {
        let rule = RegistrationRule::default();
        assert!(rule
            .check(&record(json!({ "username": "a@b.com", "password": "rahasia" })))
            .is_empty());
        assert!(rule.check(&record(json!({ "password": "rahasia" }))).is_empty());
        assert!(rule
            .check(&record(json!({ "username": "", "password": "" })))
            .is_empty());
    }
}
