use crate::validation::error_bag::ErrorBag;
use crate::validation::parser::RuleParseError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{}", .0.summary())]
    InvalidInput(ErrorBag),

    #[error("Invalid rule declaration: {0}")]
    Rules(#[from] RuleParseError),
}
