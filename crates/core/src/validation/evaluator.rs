//! Form validator: per-field rule evaluation followed by record rules.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;

use super::error_bag::ErrorBag;
use super::messages::{MessageResolver, MessageSource};
use super::parser::{parse_rules, RuleParseError};
use super::rules::{is_skippable, RecordRule, Rule, RuleContext};
use crate::error::CoreError;
use crate::types::Record;

/// Whether a field keeps evaluating rules after one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report every failing rule.
    #[default]
    CollectAll,
    /// Stop at the first failing rule.
    Bail,
}

/// Ordered rules for one field.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    rules: Vec<Arc<dyn Rule>>,
    bail: bool,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn rule(self, rule: impl Rule + 'static) -> Self {
        self.push(Arc::new(rule))
    }

    pub fn push(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Stop at this field's first failure regardless of the validator policy.
    pub fn bail(mut self) -> Self {
        self.bail = true;
        self
    }

    pub fn is_bail(&self) -> bool {
        self.bail
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }
}

impl FromStr for FieldRules {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rules(s)
    }
}

/// Mapping of field name to its rules, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: IndexMap<String, FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of `(field, "rule|rule:param")` declarations.
    pub fn parse<'a, I>(declarations: I) -> Result<Self, RuleParseError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        declarations
            .into_iter()
            .try_fold(Self::new(), |set, (field, declaration)| {
                Ok(set.field(field, parse_rules(declaration)?))
            })
    }

    /// Set the rules for `field`, replacing any previous declaration.
    pub fn field(mut self, field: impl Into<String>, rules: FieldRules) -> Self {
        self.fields.insert(field.into(), rules);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Result of one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// All rules passed. Holds only the validated fields present in the input.
    Valid(Record),
    /// At least one rule failed.
    Invalid(ErrorBag),
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid(_))
    }

    pub fn errors(&self) -> Option<&ErrorBag> {
        match self {
            Outcome::Valid(_) => None,
            Outcome::Invalid(errors) => Some(errors),
        }
    }

    pub fn into_result(self) -> Result<Record, ErrorBag> {
        match self {
            Outcome::Valid(record) => Ok(record),
            Outcome::Invalid(errors) => Err(errors),
        }
    }
}

/// Validates input records against a [`RuleSet`] and optional record rules.
///
/// Immutable once built, so one validator can serve concurrent requests.
#[derive(Clone, Default)]
pub struct Validator {
    rules: RuleSet,
    record_rules: Vec<Arc<dyn RecordRule>>,
    messages: MessageResolver,
    policy: FailurePolicy,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules)
            .field("record_rules", &self.record_rules.len())
            .field("locale", &self.messages.locale())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Validator {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Locale for catalog lookups.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.messages.set_locale(locale);
        self
    }

    /// Replace the message catalog.
    pub fn message_source(mut self, source: Arc<dyn MessageSource>) -> Self {
        self.messages.set_source(source);
        self
    }

    /// Inline message templates keyed by `field.rule`, `field.key`, `rule` or `key`.
    pub fn messages<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.messages.add_overrides(overrides);
        self
    }

    /// Display names substituted for `:attribute`.
    pub fn attributes<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.messages.add_attributes(attributes);
        self
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Add a record rule, run once every field rule has passed.
    pub fn after(mut self, rule: impl RecordRule + 'static) -> Self {
        self.record_rules.push(Arc::new(rule));
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validate `record`. Never fails for bad input; see [`Outcome`].
    pub fn validate(&self, record: &Record) -> Outcome {
        let mut errors = ErrorBag::new();

        for (field, rules) in &self.rules.fields {
            errors.extend_field(field.as_str(), self.validate_field(field, rules, record));
        }

        if errors.is_empty() {
            for rule in &self.record_rules {
                for (field, failure) in rule.check(record) {
                    let message = self.messages.resolve(&field, "after", &failure);
                    errors.add(field, message);
                }
            }
        }

        if errors.is_empty() {
            Outcome::Valid(self.sanitize(record))
        } else {
            tracing::debug!(
                fields = errors.len(),
                messages = errors.count(),
                "Validation failed"
            );
            Outcome::Invalid(errors)
        }
    }

    pub fn passes(&self, record: &Record) -> bool {
        self.validate(record).is_valid()
    }

    pub fn fails(&self, record: &Record) -> bool {
        !self.passes(record)
    }

    /// The error bag for `record`, empty when valid.
    pub fn errors(&self, record: &Record) -> ErrorBag {
        match self.validate(record) {
            Outcome::Valid(_) => ErrorBag::new(),
            Outcome::Invalid(errors) => errors,
        }
    }

    /// Validate and convert an invalid outcome into [`CoreError::InvalidInput`].
    pub fn validate_or_error(&self, record: &Record) -> Result<Record, CoreError> {
        self.validate(record)
            .into_result()
            .map_err(CoreError::InvalidInput)
    }

    /// Failure messages for one field, in rule order.
    fn validate_field(&self, field: &str, rules: &FieldRules, record: &Record) -> Vec<String> {
        let ctx = RuleContext::new(field, record);
        let skippable = is_skippable(ctx.value);
        let bail = rules.bail || self.policy == FailurePolicy::Bail;

        let mut messages = Vec::new();
        for rule in &rules.rules {
            if skippable && !rule.implicit() {
                continue;
            }
            if let Err(failure) = rule.evaluate(&ctx) {
                messages.push(self.messages.resolve(field, rule.name(), &failure));
                if bail {
                    break;
                }
            }
        }
        messages
    }

    fn sanitize(&self, record: &Record) -> Record {
        self.rules
            .fields()
            .filter_map(|field| {
                record
                    .get(field)
                    .map(|value| (field.to_string(), value.clone()))
            })
            .collect()
    }
}
