//! Overrides first, then a fallback store.

use std::collections::BTreeMap;

use railsmith_core::{
    application::ports::TemplateStore,
    domain::{DomainError, Template, TemplateId},
    error::{RailsmithError, RailsmithResult},
};

pub struct LayeredStore {
    primary: Box<dyn TemplateStore>,
    fallback: Box<dyn TemplateStore>,
}

impl LayeredStore {
    pub fn new(primary: Box<dyn TemplateStore>, fallback: Box<dyn TemplateStore>) -> Self {
        Self { primary, fallback }
    }
}

impl TemplateStore for LayeredStore {
    fn get(&self, id: &TemplateId) -> RailsmithResult<Template> {
        match self.primary.get(id) {
            Err(RailsmithError::Domain(DomainError::TemplateNotFound { .. })) => {
                self.fallback.get(id)
            }
            other => other,
        }
    }

    fn list(&self) -> RailsmithResult<Vec<Template>> {
        let mut merged = BTreeMap::new();
        for t in self.fallback.list()? {
            merged.insert(t.id.clone(), t);
        }
        for t in self.primary.list()? {
            merged.insert(t.id.clone(), t);
        }
        Ok(merged.into_values().collect())
    }
}
