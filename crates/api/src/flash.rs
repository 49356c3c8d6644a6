use std::collections::HashMap;

use formcheck_core::validation::ErrorBag;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Fields never kept as old input.
const DONT_FLASH: &[&str] = &["password", "password_confirmation"];

/// Form state carried across the redirect that follows a failed submission.
#[derive(Debug, Clone)]
pub struct Flash {
    /// Validation errors to display.
    pub errors: ErrorBag,
    /// Previously submitted values, minus sensitive fields.
    pub old_input: HashMap<String, String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl Flash {
    pub fn new(errors: ErrorBag, input: &HashMap<String, String>) -> Self {
        let old_input = input
            .iter()
            .filter(|(field, _)| !DONT_FLASH.contains(&field.as_str()))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        Self {
            errors,
            old_input,
            created_at: chrono::Utc::now(),
        }
    }

    /// Previously submitted value for `field`, or an empty string.
    pub fn old(&self, field: &str) -> &str {
        self.old_input.get(field).map(String::as_str).unwrap_or("")
    }
}

/// One-shot storage for [`Flash`] entries.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Entries are removed when read and
/// discarded once older than the configured TTL.
pub struct FlashStore {
    entries: RwLock<HashMap<Uuid, Flash>>,
    ttl: chrono::TimeDelta,
}

impl FlashStore {
    /// Create an empty store whose entries expire after `ttl_secs`.
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: i64::try_from(ttl_secs)
                .ok()
                .and_then(chrono::TimeDelta::try_seconds)
                .unwrap_or(chrono::TimeDelta::MAX),
        }
    }

    /// Store a flash and return the id to hand to the next request.
    ///
    /// Expired entries are purged on every insert.
    pub async fn put(&self, flash: Flash) -> Uuid {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, f| now - f.created_at <= self.ttl);
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired flash entries");
        }
        entries.insert(id, flash);
        id
    }

    /// Remove and return the flash for `id`, if present and not expired.
    pub async fn take(&self, id: &Uuid) -> Option<Flash> {
        let flash = self.entries.write().await.remove(id)?;
        if chrono::Utc::now() - flash.created_at > self.ttl {
            return None;
        }
        Some(flash)
    }

    /// Number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> HashMap<String, String> {
        HashMap::from([
            ("username".to_string(), "tian".to_string()),
            ("password".to_string(), "secret".to_string()),
        ])
    }

    fn errors() -> ErrorBag {
        [("username", "The username field must be a valid email address.")]
            .into_iter()
            .collect()
    }

    #[test]
    fn password_is_not_kept_as_old_input() {
        let flash = Flash::new(errors(), &input());
        assert_eq!(flash.old("username"), "tian");
        assert_eq!(flash.old("password"), "");
    }

    #[tokio::test]
    async fn take_consumes_entry() {
        let store = FlashStore::new(60);
        let id = store.put(Flash::new(errors(), &input())).await;
        assert_eq!(store.len().await, 1);

        let flash = store.take(&id).await.expect("flash should be present");
        assert!(flash.errors.has("username"));
        assert!(store.take(&id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn expired_entries_are_not_returned() {
        let store = FlashStore::new(0);
        let id = store.put(Flash::new(errors(), &input())).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert!(store.take(&id).await.is_none());
    }

    #[tokio::test]
    async fn put_purges_expired_entries() {
        let store = FlashStore::new(0);
        store.put(Flash::new(errors(), &input())).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.put(Flash::new(errors(), &input())).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn huge_ttl_saturates_instead_of_panicking() {
        for ttl in [10_000_000_000_000_000, u64::MAX] {
            let store = FlashStore::new(ttl);
            let id = store.put(Flash::new(errors(), &input())).await;
            assert!(store.take(&id).await.is_some());
        }
    }

    #[tokio::test]
    async fn unknown_id_returns_none() {
        let store = FlashStore::new(60);
        assert!(store.take(&Uuid::new_v4()).await.is_none());
    }
}
