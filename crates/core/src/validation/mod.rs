//! Validation engine.
//!
//! Provides the rule trait and built-in rules, a rule-string parser, locale
//! aware messages, and the form validator that ties them together. Pure logic
//! with no I/O.

pub mod custom;
pub mod error_bag;
pub mod evaluator;
pub mod messages;
pub mod parser;
pub mod rules;

pub use error_bag::ErrorBag;
pub use evaluator::{FailurePolicy, FieldRules, Outcome, RuleSet, Validator};
pub use messages::{BuiltinMessages, MessageSource};
pub use rules::{RecordRule, Rule, RuleContext, RuleFailure};
