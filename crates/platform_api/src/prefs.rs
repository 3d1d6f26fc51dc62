//! Preference storage contract and adapters for the persisted session blob.
//!
//! One localStorage entry is the client's only durable state. The trait keeps
//! the stores testable off-wasm; [`WebPrefsStore`] is the browser adapter and
//! [`MemoryPrefsStore`] backs native tests.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

/// Boxed future used by [`PrefsStore`] methods.
pub type PrefsFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Key/value store holding raw JSON strings.
pub trait PrefsStore {
    /// Loads the raw JSON string for a key, `None` when absent.
    fn load(&self, key: &str) -> PrefsFuture<'_, Result<Option<String>, String>>;

    /// Saves a raw JSON string under a key.
    fn save(&self, key: &str, raw_json: String) -> PrefsFuture<'_, Result<(), String>>;

    /// Deletes a key. Deleting an absent key succeeds.
    fn delete(&self, key: &str) -> PrefsFuture<'_, Result<(), String>>;
}

/// Loads and deserializes a typed value through a [`PrefsStore`].
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub async fn load_typed<T: serde::de::DeserializeOwned>(
    store: &dyn PrefsStore,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed value through a [`PrefsStore`].
///
/// # Errors
///
/// Returns an error when serialization or the store save fails.
pub async fn save_typed<T: serde::Serialize>(
    store: &dyn PrefsStore,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save(key, raw).await
}

/// Browser adapter backed by `window.localStorage`. All methods are no-ops
/// that report absence on non-wasm targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebPrefsStore;

impl WebPrefsStore {
    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    fn load_sync(self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage()?.get_item(key).ok().flatten()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            None
        }
    }

    fn save_sync(self, key: &str, raw_json: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = Self::storage().ok_or_else(|| "localStorage unavailable".to_string())?;
            storage
                .set_item(key, raw_json)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw_json);
            Ok(())
        }
    }

    fn delete_sync(self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = Self::storage().ok_or_else(|| "localStorage unavailable".to_string())?;
            storage
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

impl PrefsStore for WebPrefsStore {
    fn load(&self, key: &str) -> PrefsFuture<'_, Result<Option<String>, String>> {
        let store = *self;
        let key = key.to_string();
        Box::pin(async move { Ok(store.load_sync(&key)) })
    }

    fn save(&self, key: &str, raw_json: String) -> PrefsFuture<'_, Result<(), String>> {
        let store = *self;
        let key = key.to_string();
        Box::pin(async move { store.save_sync(&key, &raw_json) })
    }

    fn delete(&self, key: &str) -> PrefsFuture<'_, Result<(), String>> {
        let store = *self;
        let key = key.to_string();
        Box::pin(async move { store.delete_sync(&key) })
    }
}

/// In-memory store for native tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefsStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Reads a raw entry without going through the async trait, for test
    /// assertions on persisted state.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load(&self, key: &str) -> PrefsFuture<'_, Result<Option<String>, String>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.entries.borrow().get(&key).cloned()) })
    }

    fn save(&self, key: &str, raw_json: String) -> PrefsFuture<'_, Result<(), String>> {
        let key = key.to_string();
        Box::pin(async move {
            self.entries.borrow_mut().insert(key, raw_json);
            Ok(())
        })
    }

    fn delete(&self, key: &str) -> PrefsFuture<'_, Result<(), String>> {
        let key = key.to_string();
        Box::pin(async move {
            self.entries.borrow_mut().remove(&key);
            Ok(())
        })
    }
}

/// Store that holds nothing and accepts everything; baseline for tests that
/// must not persist.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load(&self, _key: &str) -> PrefsFuture<'_, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save(&self, _key: &str, _raw_json: String) -> PrefsFuture<'_, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete(&self, _key: &str) -> PrefsFuture<'_, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Marker {
        seen: bool,
    }

    #[test]
    fn memory_store_round_trips_and_deletes() {
        let store = MemoryPrefsStore::default();
        block_on(store.save("k", "{\"seen\":true}".to_string())).expect("save");
        assert_eq!(
            block_on(store.load("k")).expect("load"),
            Some("{\"seen\":true}".to_string())
        );
        block_on(store.delete("k")).expect("delete");
        assert_eq!(block_on(store.load("k")).expect("load"), None);
    }

    #[test]
    fn typed_helpers_round_trip() {
        let store = MemoryPrefsStore::default();
        block_on(save_typed(&store, "m", &Marker { seen: true })).expect("save typed");
        let loaded: Option<Marker> = block_on(load_typed(&store, "m")).expect("load typed");
        assert_eq!(loaded, Some(Marker { seen: true }));
    }

    #[test]
    fn corrupt_entry_surfaces_a_typed_load_error() {
        let store = MemoryPrefsStore::default();
        block_on(store.save("m", "not json".to_string())).expect("save");
        let loaded: Result<Option<Marker>, String> = block_on(load_typed(&store, "m"));
        assert!(loaded.is_err());
    }

    #[test]
    fn web_store_reports_absence_off_wasm() {
        let store = WebPrefsStore;
        assert_eq!(block_on(store.load("anything")).expect("load"), None);
        block_on(store.save("anything", "{}".to_string())).expect("save");
        block_on(store.delete("anything")).expect("delete");
    }
}
