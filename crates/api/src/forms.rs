//! Validators for the forms served by this application.

use formcheck_core::error::CoreError;
use formcheck_core::validation::{RuleSet, Validator};

/// Validators built once at startup and shared across requests.
#[derive(Debug, Clone)]
pub struct Forms {
    /// `POST /login`: both credentials present.
    pub login: Validator,
    /// `POST /form`: username is an email, password 6 to 20 characters.
    pub form: Validator,
}

impl Forms {
    pub fn build(locale: &str) -> Result<Self, CoreError> {
        let login = Validator::new(RuleSet::parse([
            ("username", "required"),
            ("password", "required"),
        ])?)
        .locale(locale);

        let form = Validator::new(RuleSet::parse([
            ("username", "required|email|max:100"),
            ("password", "required|min:6|max:20"),
        ])?)
        .locale(locale);

        Ok(Self { login, form })
    }
}
