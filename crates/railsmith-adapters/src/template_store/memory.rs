//! In-memory template store with built-in templates.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use railsmith_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{DomainError, Template, TemplateId},
    error::RailsmithResult,
};

use crate::builtin_templates;

/// Thread-safe in-memory template store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<BTreeMap<TemplateId, Template>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding every built-in template.
    pub fn with_builtin() -> Self {
        let store = Self::new();
        for template in builtin_templates::all_templates() {
            store.insert(template);
        }
        store
    }

    /// Insert or replace a template.
    pub fn insert(&self, template: Template) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.insert(template.id.clone(), template);
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error() -> ApplicationError {
    ApplicationError::StoreError {
        reason: "template store lock poisoned".into(),
    }
}

impl TemplateStore for InMemoryStore {
    fn get(&self, id: &TemplateId) -> RailsmithResult<Template> {
        let inner = self.inner.read().map_err(|_| lock_error())?;
        inner.get(id).cloned().ok_or_else(|| {
            DomainError::TemplateNotFound {
                template_id: id.to_string(),
            }
            .into()
        })
    }

    fn list(&self) -> RailsmithResult<Vec<Template>> {
        let inner = self.inner.read().map_err(|_| lock_error())?;
        Ok(inner.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railsmith_core::error::RailsmithError;

    #[test]
    fn builtin_store_serves_known_ids() {
        let store = InMemoryStore::with_builtin();
        assert_eq!(store.len(), 6);
        assert!(store.get(&TemplateId::new("trix.css")).is_ok());
    }

    #[test]
    fn unknown_id_is_template_not_found() {
        let store = InMemoryStore::new();
        let err = store.get(&TemplateId::new("nope")).unwrap_err();
        assert!(matches!(
            err,
            RailsmithError::Domain(DomainError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn list_is_sorted_by_id() {
        let store = InMemoryStore::with_builtin();
        let ids: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|t| t.id.to_string())
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
