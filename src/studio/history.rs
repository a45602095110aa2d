use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::llm::media::{extension_for_mime, GeneratedImage, ImageFile};
use crate::presets::types::ExportSettings;
use crate::studio::settings::ChosenSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    /// Edits of an uploaded product image.
    Studio,
    /// Pure text-to-image results.
    Generation,
}

impl HistoryKind {
    pub fn parse(value: &str) -> Option<HistoryKind> {
        match value.trim().to_lowercase().as_str() {
            "studio" => Some(HistoryKind::Studio),
            "generation" | "generate" => Some(HistoryKind::Generation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub generated: Vec<GeneratedImage>,
    pub source: Option<ImageFile>,
    pub reference_image: Option<ImageFile>,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_settings: Option<ChosenSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_settings: Option<ExportSettings>,
}

impl HistoryItem {
    /// The presence of a source image is the only discriminator.
    pub fn kind(&self) -> HistoryKind {
        if self.source.is_some() {
            HistoryKind::Studio
        } else {
            HistoryKind::Generation
        }
    }
}

pub fn history_id(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// In-memory history, newest first.
#[derive(Debug, Clone, Default)]
pub struct History {
    items: Vec<HistoryItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedItem<'a> {
    id: &'a str,
    kind: HistoryKind,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chosen_settings: Option<&'a ChosenSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export_settings: Option<&'a ExportSettings>,
    images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

pub(crate) fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

impl History {
    pub fn append(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
    }

    /// Drops every item of `kind` and returns how many were removed.
    pub fn clear(&mut self, kind: HistoryKind) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.kind() != kind);
        before - self.items.len()
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&HistoryItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Writes `path` as a JSON index of the history and every image next to it.
    pub async fn export(&self, path: &Path) -> anyhow::Result<usize> {
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;

        let mut exported = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let stem = file_stem(&item.id);
            let mut images = Vec::with_capacity(item.generated.len());
            for (index, image) in item.generated.iter().enumerate() {
                let name = format!("{stem}-{}.{}", index + 1, image.extension());
                tokio::fs::write(dir.join(&name), &image.bytes)
                    .await
                    .with_context(|| format!("writing {name}"))?;
                images.push(name);
            }
            let source = match &item.source {
                Some(source) => {
                    let name = format!("{stem}-source.{}", extension_for_mime(&source.mime_type));
                    tokio::fs::write(dir.join(&name), &source.bytes)
                        .await
                        .with_context(|| format!("writing {name}"))?;
                    Some(name)
                }
                None => None,
            };
            exported.push(ExportedItem {
                id: &item.id,
                kind: item.kind(),
                prompt: &item.prompt,
                negative_prompt: item.negative_prompt.as_deref(),
                chosen_settings: item.chosen_settings.as_ref(),
                export_settings: item.export_settings.as_ref(),
                images,
                source,
            });
        }

        let json = serde_json::to_vec_pretty(&exported)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Exported {} history items to {}", exported.len(), path.display());
        Ok(exported.len())
    }
}
