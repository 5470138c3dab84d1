pub mod checklist;
pub mod component;
pub mod flow;
pub mod init;
pub mod topics;
pub mod traits;

use anyhow::Context;
use std::path::Path;
use stride_core::model::SystemModel;

/// Load the threat model file, with a friendlier message when it is missing.
pub(crate) fn load_model(path: &Path) -> anyhow::Result<SystemModel> {
    if !path.exists() {
        anyhow::bail!(
            "no threat model at {}: run 'stride init' first",
            path.display()
        );
    }
    SystemModel::load(path).with_context(|| format!("failed to load {}", path.display()))
}

pub(crate) fn save_model(path: &Path, model: &SystemModel) -> anyhow::Result<()> {
    model
        .save(path)
        .with_context(|| format!("failed to save {}", path.display()))
}
