use std::path::Path;

use anyhow::{Context, Result};
use folio_media::{removed_managed_references, CleanupEvent};
use folio_richtext::{encode_value, Doc, HtmlDecoder};
use serde_json::Value;
use tracing::info;

use crate::settings::Settings;

async fn read_json(path: &Path) -> Result<Value> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

async fn read_doc(path: &Path) -> Result<Doc> {
    let value = read_json(path).await?;
    Doc::from_value(&value).with_context(|| format!("Not a document: {}", path.display()))
}

/// HTML for a stored editor document.
pub async fn render(path: &Path) -> Result<String> {
    Ok(encode_value(&read_json(path).await?))
}

/// Pretty editor JSON for an HTML file.
pub async fn parse(path: &Path) -> Result<String> {
    let html = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let decoder = HtmlDecoder::default();
    let doc = decoder.decode(Some(&html));
    info!(parser = decoder.parser_name(), blocks = doc.content.len(), "Decoded HTML");
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Managed references dropped between two versions of a document.
pub async fn removed(previous: &Path, next: &Path, settings: &Settings) -> Result<Vec<String>> {
    let previous = read_doc(previous).await?;
    let next = read_doc(next).await?;
    Ok(removed_managed_references(&previous, &next, &settings.assets))
}

/// Deletes `references` from the media directory and waits for every outcome.
pub async fn delete(references: Vec<String>, settings: &Settings) -> Vec<CleanupEvent> {
    settings.cleaner().dispatch(references).join().await
}
