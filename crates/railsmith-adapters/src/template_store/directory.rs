//! Templates loaded from a directory on disk.
//!
//! # Layout
//!
//! ```text
//! ~/.config/railsmith/templates/
//! ├── templates.toml        ← optional descriptions
//! ├── README.md             ← id "README.md"
//! └── app/
//!     └── banner.txt        ← id "app/banner.txt"
//! ```
//!
//! Every regular file except the manifest becomes a template whose id is its
//! path relative to the directory, with `/` separators.
//!
//! # `templates.toml` format
//!
//! ```toml
//! [templates."README.md"]
//! description = "Company README"
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use railsmith_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{DomainError, Template, TemplateId},
    error::RailsmithResult,
};

const MANIFEST: &str = "templates.toml";

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    templates: HashMap<String, ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    description: String,
}

/// Read-only store snapshot of a template directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    templates: BTreeMap<TemplateId, Template>,
}

impl DirectoryStore {
    /// Load every template under `root`.
    ///
    /// # Errors
    /// `StoreError` when `root` is not a readable directory or the manifest
    /// does not parse. Unreadable files or subdirectories and symlink loops
    /// are skipped with a warning.
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn load(root: impl AsRef<Path>) -> RailsmithResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ApplicationError::StoreError {
                reason: format!("{} is not a directory", root.display()),
            }
            .into());
        }

        let manifest = read_manifest(root)?;
        let mut templates = BTreeMap::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| {
                entry
                    .map_err(|e| warn!(error = %e, "skipping unreadable template path"))
                    .ok()
            })
            .filter(|e| e.file_type().is_file())
        {
            let Some(id) = template_id(root, entry.path()) else {
                continue;
            };
            if id == MANIFEST {
                continue;
            }

            let content = match fs::read_to_string(entry.path()) {
                Ok(c) => c,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "skipping unreadable template");
                    continue;
                }
            };

            let id = match TemplateId::parse(id) {
                Ok(id) => id,
                Err(e) => {
                    warn!(error = %e, "skipping template with invalid id");
                    continue;
                }
            };

            let description = manifest
                .templates
                .get(id.as_str())
                .map(|m| m.description.clone())
                .unwrap_or_default();
            debug!(template = %id, "loaded template override");
            templates.insert(
                id.clone(),
                Template::new(id, content).with_description(description),
            );
        }

        info!(count = templates.len(), "template directory loaded");
        Ok(Self { templates })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateStore for DirectoryStore {
    fn get(&self, id: &TemplateId) -> RailsmithResult<Template> {
        self.templates.get(id).cloned().ok_or_else(|| {
            DomainError::TemplateNotFound {
                template_id: id.to_string(),
            }
            .into()
        })
    }

    fn list(&self) -> RailsmithResult<Vec<Template>> {
        Ok(self.templates.values().cloned().collect())
    }
}

fn read_manifest(root: &Path) -> RailsmithResult<Manifest> {
    let path = root.join(MANIFEST);
    if !path.is_file() {
        return Ok(Manifest::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ApplicationError::StoreError {
        reason: format!("cannot read {}: {}", path.display(), e),
    })?;
    toml::from_str(&text).map_err(|e| {
        ApplicationError::StoreError {
            reason: format!("invalid {}: {}", path.display(), e),
        }
        .into()
    })
}

fn template_id(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}
