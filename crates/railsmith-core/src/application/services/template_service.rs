//! Template Service - lookup and rendering.

use tracing::{debug, instrument};

use crate::{
    application::ports::TemplateStore,
    domain::{Bindings, Template, TemplateId},
    error::RailsmithResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub description: String,
    pub placeholders: Vec<String>,
    /// `false` when the template comes from the override directory.
    pub builtin: bool,
}

impl From<&Template> for TemplateInfo {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.to_string(),
            description: t.description.clone(),
            placeholders: t.placeholders().into_iter().map(str::to_string).collect(),
            builtin: t.source.is_builtin(),
        }
    }
}

pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, id: &TemplateId) -> RailsmithResult<Template> {
        self.store.get(id)
    }

    /// Look `id` up and substitute its placeholders.
    ///
    /// # Errors
    /// `TemplateNotFound` for an unknown id, `MissingBinding` for a
    /// placeholder without a value.
    #[instrument(skip(self, bindings), fields(template = %id))]
    pub fn render(&self, id: &TemplateId, bindings: &Bindings) -> RailsmithResult<String> {
        let template = self.store.get(id)?;
        let text = template.render(bindings)?;
        debug!(bytes = text.len(), "template rendered");
        Ok(text)
    }

    pub fn list(&self) -> RailsmithResult<Vec<TemplateInfo>> {
        let templates = self.store.list()?;
        Ok(templates.iter().map(TemplateInfo::from).collect())
    }
}
