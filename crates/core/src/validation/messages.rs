//! Message templates and placeholder substitution.
//!
//! Templates are looked up through a [`MessageSource`], a pure function of
//! `(key, locale)`. Size rules use kind-qualified keys such as `min.string`.

use std::collections::HashMap;
use std::sync::Arc;

use super::rules::RuleFailure;

/// Locale used when the active locale has no template for a key.
pub const FALLBACK_LOCALE: &str = "en";

/// Template lookup by message key and locale.
pub trait MessageSource: Send + Sync {
    fn template(&self, key: &str, locale: &str) -> Option<String>;
}

impl<F> MessageSource for F
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync,
{
    fn template(&self, key: &str, locale: &str) -> Option<String> {
        self(key, locale)
    }
}

const EN: &[(&str, &str)] = &[
    ("required", "The :attribute field is required."),
    ("email", "The :attribute field must be a valid email address."),
    ("min.string", "The :attribute field must be at least :min characters."),
    ("min.numeric", "The :attribute field must be at least :min."),
    ("min.array", "The :attribute field must have at least :min items."),
    ("max.string", "The :attribute field must not be greater than :max characters."),
    ("max.numeric", "The :attribute field must not be greater than :max."),
    ("max.array", "The :attribute field must not have more than :max items."),
    ("different", "The :attribute field and :other must be different."),
    ("regex", "The :attribute field format is invalid."),
    ("registration", "The :attribute must not be the same as the :other."),
];

const ID: &[(&str, &str)] = &[
    ("required", ":Attribute wajib diisi."),
    ("email", ":Attribute harus berupa alamat surel yang valid."),
    ("min.string", ":Attribute minimal berisi :min karakter."),
    ("min.numeric", ":Attribute minimal bernilai :min."),
    ("min.array", ":Attribute minimal terdiri dari :min anggota."),
    ("max.string", ":Attribute maksimal berisi :max karakter."),
    ("max.numeric", ":Attribute maksimal bernilai :max."),
    ("max.array", ":Attribute maksimal terdiri dari :max anggota."),
    ("different", ":Attribute dan :other harus berbeda."),
    ("regex", "Format :attribute tidak valid."),
    ("registration", ":Attribute tidak boleh sama dengan :other."),
];

/// Built-in catalog with `en` and `id` templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMessages;

impl BuiltinMessages {
    pub fn locales() -> &'static [&'static str] {
        &["en", "id"]
    }
}

impl MessageSource for BuiltinMessages {
    fn template(&self, key: &str, locale: &str) -> Option<String> {
        let table = match locale {
            "en" => EN,
            "id" => ID,
            _ => return None,
        };
        table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, template)| (*template).to_string())
    }
}

/// Turns rule failures into display messages for one validator.
#[derive(Clone)]
pub struct MessageResolver {
    source: Arc<dyn MessageSource>,
    locale: String,
    overrides: HashMap<String, String>,
    attributes: HashMap<String, String>,
}

impl Default for MessageResolver {
    fn default() -> Self {
        Self {
            source: Arc::new(BuiltinMessages),
            locale: FALLBACK_LOCALE.to_string(),
            overrides: HashMap::new(),
            attributes: HashMap::new(),
        }
    }
}

impl MessageResolver {
    pub fn set_source(&mut self, source: Arc<dyn MessageSource>) {
        self.source = source;
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Inline templates. Keys are `field.key`, `field.rule`, `key`, or `rule`.
    pub fn add_overrides<I, K, V>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.overrides
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Display names used in place of raw field names.
    pub fn add_attributes<I, K, V>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Display name for a field: the configured name, or the field name with
    /// underscores as spaces.
    pub fn display_attribute(&self, field: &str) -> String {
        self.attributes
            .get(field)
            .cloned()
            .unwrap_or_else(|| field.replace('_', " "))
    }

    /// Produce the final message for `failure` raised by `rule` on `field`.
    pub fn resolve(&self, field: &str, rule: &str, failure: &RuleFailure) -> String {
        match failure {
            RuleFailure::Message(message) => self.substitute(message, field, &[]),
            RuleFailure::Template { key, params } => {
                let template = self.template_for(field, rule, key);
                self.substitute(&template, field, params)
            }
        }
    }

    fn template_for(&self, field: &str, rule: &str, key: &str) -> String {
        let inline = [
            format!("{field}.{key}"),
            format!("{field}.{rule}"),
            key.to_string(),
            rule.to_string(),
        ];
        if let Some(found) = inline.iter().find_map(|k| self.overrides.get(k)) {
            return found.clone();
        }
        self.source
            .template(key, &self.locale)
            .or_else(|| self.source.template(key, FALLBACK_LOCALE))
            .unwrap_or_else(|| {
                tracing::warn!(key, locale = %self.locale, "No message template found");
                key.to_string()
            })
    }

    fn substitute(&self, template: &str, field: &str, params: &[(String, String)]) -> String {
        let attribute = self.display_attribute(field);
        let mut message = replace_placeholder(template, "attribute", &attribute);
        for (name, value) in params {
            // `:other` names a field, so it gets the same display treatment.
            let value = if name == "other" {
                self.display_attribute(value)
            } else {
                value.clone()
            };
            message = replace_placeholder(&message, name, &value);
        }
        message
    }
}

/// Replace `:name`, `:Name` and `:NAME` with the value in matching case.
fn replace_placeholder(template: &str, name: &str, value: &str) -> String {
    template
        .replace(&format!(":{}", name.to_uppercase()), &value.to_uppercase())
        .replace(&format!(":{}", capitalize(name)), &capitalize(value))
        .replace(&format!(":{name}"), value)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_every_key_in_both_locales() {
        for (key, _) in EN {
            assert!(
                BuiltinMessages.template(key, "id").is_some(),
                "missing id template for {key}"
            );
        }
        assert_eq!(EN.len(), ID.len());
    }

    #[test]
    fn resolves_template_with_params() {
        let resolver = MessageResolver::default();
        let failure = RuleFailure::template("min.string").with_param("min", 6);
        assert_eq!(
            resolver.resolve("password", "min", &failure),
            "The password field must be at least 6 characters."
        );
    }

    #[test]
    fn active_locale_changes_text() {
        let mut resolver = MessageResolver::default();
        resolver.set_locale("id");
        let failure = RuleFailure::template("required");
        assert_eq!(
            resolver.resolve("username", "required", &failure),
            "Username wajib diisi."
        );
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        let mut resolver = MessageResolver::default();
        resolver.set_locale("fr");
        let failure = RuleFailure::template("required");
        assert_eq!(
            resolver.resolve("username", "required", &failure),
            "The username field is required."
        );
    }

    #[test]
    fn inline_overrides_take_precedence() {
        let mut resolver = MessageResolver::default();
        resolver.add_overrides([
            ("min", ":attribute minimal :min karakter"),
            ("password.max", "password terlalu panjang"),
        ]);

        let min = RuleFailure::template("min.string").with_param("min", 6);
        assert_eq!(
            resolver.resolve("password", "min", &min),
            "password minimal 6 karakter"
        );

        let max = RuleFailure::template("max.string").with_param("max", 20);
        assert_eq!(
            resolver.resolve("password", "max", &max),
            "password terlalu panjang"
        );
        assert_eq!(
            resolver.resolve("username", "max", &max),
            "The username field must not be greater than 20 characters."
        );
    }

    #[test]
    fn attribute_names_and_case_variants() {
        let mut resolver = MessageResolver::default();
        resolver.add_attributes([("username", "user name")]);
        assert_eq!(resolver.display_attribute("first_name"), "first name");

        let failure = RuleFailure::message(":ATTRIBUTE / :Attribute / :attribute");
        assert_eq!(
            resolver.resolve("username", "custom", &failure),
            "USER NAME / User name / user name"
        );
    }

    #[test]
    fn other_param_uses_display_name() {
        let resolver = MessageResolver::default();
        let failure = RuleFailure::template("different").with_param("other", "user_name");
        assert_eq!(
            resolver.resolve("password", "different", &failure),
            "The password field and user name must be different."
        );
    }

    #[test]
    fn closure_sources_are_accepted() {
        let mut resolver = MessageResolver::default();
        resolver.set_source(Arc::new(|key: &str, _locale: &str| {
            Some(format!("[{key}] :attribute"))
        }));
        let failure = RuleFailure::template("required");
        assert_eq!(
            resolver.resolve("username", "required", &failure),
            "[required] username"
        );
    }

    #[test]
    fn missing_template_returns_key() {
        let resolver = MessageResolver::default();
        let failure = RuleFailure::template("no_such_key");
        assert_eq!(resolver.resolve("f", "x", &failure), "no_such_key");
    }
}
