use anyhow::{Context as anyhowContext, Result};
use log::info;
use std::fs;
use std::path::Path;

use crate::render::RenderedArtifact;

/// Create the chart tree and flush every artifact. Existing directories are
/// fine; existing files are overwritten. Whatever was written before a
/// failure stays on disk.
pub(crate) fn write_chart(root: &Path, artifacts: &[RenderedArtifact]) -> Result<()> {
    let templates = root.join("templates");
    fs::create_dir_all(&templates)
        .with_context(|| format!("creating directory {}", templates.display()))?;

    for artifact in artifacts {
        let path = root.join(&artifact.path);
        fs::write(&path, &artifact.content)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
    }

    Ok(())
}
