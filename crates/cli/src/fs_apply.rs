use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Permanently removes a single file. Directories are refused; nothing is
/// moved to a trash location first.
pub fn remove_file(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).with_context(|| format!("stat {}", path.display()))?;
    if meta.is_dir() {
        bail!("{} is a directory", path.display());
    }
    fs::remove_file(path).with_context(|| format!("remove {}", path.display()))?;
    Ok(())
}
