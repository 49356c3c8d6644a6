//! Parses rule declarations such as `"required|email|max:100"`.

use std::sync::Arc;

use regex::Regex;

use super::evaluator::FieldRules;
use super::rules::{Different, Email, Max, Min, Pattern, Required, Rule};
use super::custom::Uppercase;

/// A rule declaration that cannot be turned into a rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleParseError {
    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    #[error("rule '{rule}' requires a parameter")]
    MissingParameter { rule: String },

    #[error("rule '{rule}' expects a non-negative integer, got '{value}'")]
    InvalidInteger { rule: String, value: String },

    #[error("rule 'regex' has an invalid pattern: {0}")]
    InvalidPattern(String),
}

/// One parsed token: either a rule or the `bail` marker.
#[derive(Debug)]
pub enum Token {
    Bail,
    Rule(Arc<dyn Rule>),
}

/// Parse a single token like `max:100`.
pub fn parse_token(token: &str) -> Result<Token, RuleParseError> {
    let token = token.trim();
    let (name, param) = match token.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (token, None),
    };

    let rule: Arc<dyn Rule> = match name {
        "bail" => return Ok(Token::Bail),
        "required" => Arc::new(Required),
        "email" => Arc::new(Email),
        "uppercase" => Arc::new(Uppercase),
        "min" => Arc::new(Min(integer_param(name, param)?)),
        "max" => Arc::new(Max(integer_param(name, param)?)),
        "different" => Arc::new(Different::new(required_param(name, param)?)),
        "regex" => Arc::new(Pattern(regex_param(required_param(name, param)?)?)),
        other => return Err(RuleParseError::UnknownRule(other.to_string())),
    };
    Ok(Token::Rule(rule))
}

/// Parse a `|`-separated declaration. Use [`parse_tokens`] when a pattern
/// itself contains `|`.
pub fn parse_rules(declaration: &str) -> Result<FieldRules, RuleParseError> {
    parse_tokens(declaration.split('|').filter(|t| !t.trim().is_empty()))
}

/// Parse an already-split list of tokens.
pub fn parse_tokens<'a, I>(tokens: I) -> Result<FieldRules, RuleParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut rules = FieldRules::new();
    for token in tokens {
        rules = match parse_token(token)? {
            Token::Bail => rules.bail(),
            Token::Rule(rule) => rules.push(rule),
        };
    }
    Ok(rules)
}

fn required_param<'a>(rule: &str, param: Option<&'a str>) -> Result<&'a str, RuleParseError> {
    match param.map(str::trim) {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(RuleParseError::MissingParameter {
            rule: rule.to_string(),
        }),
    }
}

fn integer_param(rule: &str, param: Option<&str>) -> Result<u64, RuleParseError> {
    let raw = required_param(rule, param)?;
    raw.parse().map_err(|_| RuleParseError::InvalidInteger {
        rule: rule.to_string(),
        value: raw.to_string(),
    })
}

/// Accepts both `^[a-z]+$` and the delimited `/^[a-z]+$/` form.
fn regex_param(raw: &str) -> Result<Regex, RuleParseError> {
    let pattern = raw
        .strip_prefix('/')
        .and_then(|p| p.strip_suffix('/'))
        .unwrap_or(raw);
    Regex::new(pattern).map_err(|e| RuleParseError::InvalidPattern(e.to_string()))
}
