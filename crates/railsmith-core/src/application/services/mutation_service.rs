//! File Mutator - applies one `MutationOp` to the project tree.
//!
//! Read, compute, write. The new content is computed in full by
//! `MutationOp::apply` before anything is written, so a missing file or
//! anchor never leaves a half-written file behind.

use tracing::{debug, instrument};

use crate::{
    application::ports::ProjectTree,
    domain::{MutationOp, RelativePath},
    error::RailsmithResult,
};

/// What a successful mutation did to its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationEffect {
    Created,
    Changed,
    /// Written back with identical content (e.g. a substitution with no hits).
    Unchanged,
}

pub struct FileMutator<'a> {
    tree: &'a dyn ProjectTree,
}

impl<'a> FileMutator<'a> {
    pub fn new(tree: &'a dyn ProjectTree) -> Self {
        Self { tree }
    }

    /// Apply `op` and durably write the result.
    ///
    /// `CreateOrOverwrite` creates missing parent directories. Every other
    /// operation requires the file to exist.
    #[instrument(skip_all, fields(op = op.kind(), path = %op.path()))]
    pub fn apply(&self, op: &MutationOp) -> RailsmithResult<MutationEffect> {
        let path = op.path();
        let current = self.tree.read_file(path)?;
        let updated = op.apply(current.as_deref())?;

        if matches!(op, MutationOp::CreateOrOverwrite { .. }) {
            self.ensure_parent(path)?;
        }
        self.tree.write_file(path, &updated)?;

        let effect = match current {
            None => MutationEffect::Created,
            Some(before) if before == updated => MutationEffect::Unchanged,
            Some(_) => MutationEffect::Changed,
        };
        debug!(?effect, bytes = updated.len(), "mutation applied");
        Ok(effect)
    }

    fn ensure_parent(&self, path: &RelativePath) -> RailsmithResult<()> {
        match path.parent() {
            Some(parent) if !self.tree.exists(&parent) => self.tree.create_dir_all(&parent),
            _ => Ok(()),
        }
    }
}
