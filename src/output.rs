use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::record::ChatRecord;

/// `dir/name.json` becomes `dir/name.convo.<number>.json`.
pub fn output_path(input: &Path, number: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|extension| format!(".{}", extension.to_string_lossy()))
        .unwrap_or_default();

    input.with_file_name(format!("{stem}.convo.{number}{extension}"))
}

pub async fn write_record(file_path: &Path, record: &ChatRecord) -> Result<()> {
    let serialized =
        serde_json::to_vec_pretty(record).context("Failed to serialize conversation")?;

    let mut file = File::create(file_path)
        .await
        .context("Failed to create output file")?;
    file.write_all(&serialized)
        .await
        .context("Failed to write conversation to file")?;
    file.flush().await.context("Failed to flush file")?;

    Ok(())
}
