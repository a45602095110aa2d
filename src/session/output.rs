use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use tracing::info;

use crate::llm::media::GeneratedImage;
use crate::studio::history::{file_stem, history_id};

/// Writes `image` as `<output_dir>/<label>-<timestamp>.<ext>`.
pub async fn save_image(
    output_dir: &Path,
    label: &str,
    image: &GeneratedImage,
) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let name = format!(
        "{}-{}.{}",
        file_stem(label),
        file_stem(&history_id(Utc::now())),
        image.extension()
    );
    let path = output_dir.join(name);
    tokio::fs::write(&path, &image.bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Saved {} ({} bytes)", path.display(), image.bytes.len());
    Ok(path)
}

/// Saves every image and returns one line per file, or the failure.
pub async fn save_all(output_dir: &Path, label: &str, images: &[GeneratedImage]) -> Vec<String> {
    let mut lines = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let label = if images.len() > 1 {
            format!("{label}-{}", index + 1)
        } else {
            label.to_string()
        };
        lines.push(match save_image(output_dir, &label, image).await {
            Ok(path) => format!("Saved {}", path.display()),
            Err(err) => format!("Could not save image: {err:#}"),
        });
    }
    lines
}
