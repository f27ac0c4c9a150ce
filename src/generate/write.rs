use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::config::OutputTarget;

pub async fn write_feed(target: &OutputTarget, xml: &str) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            let mut out = tokio::io::stdout();
            out.write_all(xml.as_bytes()).await?;
            out.flush().await?;
            Ok(())
        }
        OutputTarget::File(path) => write_atomic(path, xml).await,
    }
}

// Readers polling the feed URL must never see a half-written file, so write a
// sibling temp file and rename it over the target.
async fn write_atomic(path: &Path, xml: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, xml)
        .await
        .with_context(|| format!("write {}", tmp.display()))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e).with_context(|| format!("rename {} -> {}", tmp.display(), path.display()));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
