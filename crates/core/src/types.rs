use serde_json::Value;

/// A submitted input record: field name to raw value.
///
/// Values may be strings, numbers, booleans, lists or null. Absent fields
/// are treated as null by the validator.
pub type Record = serde_json::Map<String, Value>;

/// Build a [`Record`] from string pairs, as submitted by an HTML form.
pub fn record_from_pairs<I, K, V>(pairs: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), Value::String(v.into())))
        .collect()
}
