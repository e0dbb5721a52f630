use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use super::{keys, LocalStore, StoreError};
use crate::domain::{Form, Integrations, Response};

/// Typed view over a [`LocalStore`].
#[derive(Clone)]
pub struct LocalCache {
    store: Arc<dyn LocalStore>,
}

impl LocalCache {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Cache over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(super::MemoryLocalStore::new()))
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.store.get(key)? {
            None => Ok(T::default()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw =
            serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(key, raw)
    }

    // Forms

    pub fn forms(&self) -> Result<Vec<Form>, StoreError> {
        self.read(keys::FORMS)
    }

    pub fn save_forms(&self, forms: &[Form]) -> Result<(), StoreError> {
        self.write(keys::FORMS, forms)
    }

    pub fn find_form(&self, id: &str) -> Result<Option<Form>, StoreError> {
        Ok(self.forms()?.into_iter().find(|f| f.id == id))
    }

    /// Replaces the form with the same id, or appends it.
    pub fn upsert_form(&self, form: &Form) -> Result<(), StoreError> {
        let mut forms = self.forms()?;
        match forms.iter_mut().find(|f| f.id == form.id) {
            Some(existing) => *existing = form.clone(),
            None => forms.push(form.clone()),
        }
        self.save_forms(&forms)
    }

    /// Drops the form together with its responses and integrations.
    pub fn remove_form(&self, id: &str) -> Result<bool, StoreError> {
        let mut forms = self.forms()?;
        let before = forms.len();
        forms.retain(|f| f.id != id);
        let removed = forms.len() != before;
        self.save_forms(&forms)?;
        self.store.remove(&keys::responses(id))?;
        self.store.remove(&keys::integrations(id))?;
        Ok(removed)
    }

    // Responses

    pub fn responses(&self, form_id: &str) -> Result<Vec<Response>, StoreError> {
        self.read(&keys::responses(form_id))
    }

    pub fn push_response(&self, response: &Response) -> Result<(), StoreError> {
        let key = keys::responses(&response.form_id);
        let mut responses: Vec<Response> = self.read(&key)?;
        responses.push(response.clone());
        self.write(&key, &responses)
    }

    // Integrations

    pub fn integrations(&self, form_id: &str) -> Result<Integrations, StoreError> {
        self.read(&keys::integrations(form_id))
    }

    pub fn save_integrations(
        &self,
        form_id: &str,
        integrations: &Integrations,
    ) -> Result<(), StoreError> {
        self.write(&keys::integrations(form_id), integrations)
    }

    // Account

    pub fn is_logged_in(&self) -> Result<bool, StoreError> {
        Ok(self.store.get(keys::LOGGED_IN)?.as_deref() == Some("true"))
    }

    pub fn set_logged_in(&self, logged_in: bool) -> Result<(), StoreError> {
        if logged_in {
            self.store.set(keys::LOGGED_IN, "true".into())
        } else {
            self.store.remove(keys::LOGGED_IN)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Answers, IntegrationKind};
    use crate::store::MemoryLocalStore;

    #[test]
    fn test_remove_form_clears_related_records() {
        let store = Arc::new(MemoryLocalStore::new());
        let cache = LocalCache::new(store.clone());
        let form = Form::untitled();
        cache.upsert_form(&form).unwrap();
        cache.push_response(&Response::complete(&form.id, Answers::new(), 0)).unwrap();
        let mut integrations = Integrations::default();
        integrations.connect(IntegrationKind::Webhook, "https://example.com/hook");
        cache.save_integrations(&form.id, &integrations).unwrap();

        assert!(cache.remove_form(&form.id).unwrap());

        assert!(cache.find_form(&form.id).unwrap().is_none());
        assert!(cache.responses(&form.id).unwrap().is_empty());
        assert_eq!(cache.integrations(&form.id).unwrap().webhook(), None);
        assert_eq!(store.keys(), vec!["forms".to_string()]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let cache = LocalCache::in_memory();
        let a = Form::untitled();
        let mut b = Form::untitled();
        cache.upsert_form(&a).unwrap();
        cache.upsert_form(&b).unwrap();
        b.title = "Renamed".into();
        cache.upsert_form(&b).unwrap();

        let forms = cache.forms().unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[1].title, "Renamed");
    }

    #[test]
    fn test_corrupt_value_is_an_error() {
        let store = Arc::new(MemoryLocalStore::new());
        store.set("forms", "{oops".into()).unwrap();
        let cache = LocalCache::new(store);
        assert!(matches!(cache.forms(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_logged_in_flag() {
        let cache = LocalCache::in_memory();
        assert!(!cache.is_logged_in().unwrap());
        cache.set_logged_in(true).unwrap();
        assert!(cache.is_logged_in().unwrap());
    }
}
