//! Remote operations behind every studio action: prompt direction, image
//! synthesis, suggestions, portrait analysis, retouching and upscaling.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::{
    StudioPipeline, CONFIG, CREATIVE_SUGGESTIONS_SYSTEM_PROMPT, DIRECTOR_SYSTEM_PROMPT,
    PORTRAIT_ANALYSIS_PROMPT,
};
use crate::llm::error::StudioError;
use crate::llm::gemini::{
    generate_images, generate_json, inline_image_part, predict_images, text_part,
};
use crate::llm::media::{GeneratedImage, ImageFile};
use crate::presets::catalog::find_by_id;
use crate::presets::portrait::{AiAnalysisReport, AiProfile, PortraitRetouchSettings};
use crate::presets::types::{Category, ExportSettings, Preset, UpscaleTarget};
use crate::studio::compose::{
    camera_suggestions_prompt, compose_instruction, director_briefing, imagen_prompt,
    retouch_instruction, suggestions_request, upscale_prompt, virtual_shoot_instruction,
    DirectorPrompts,
};
use crate::studio::settings::ChosenSettings;

const NO_IMAGE_MESSAGE: &str = "Generation succeeded, but no image data was returned. The model may have refused the prompt due to safety or complexity constraints.";
const NO_RETOUCH_MESSAGE: &str = "Retouching succeeded, but no image was returned.";
const NO_UPSCALE_MESSAGE: &str = "Upscaling succeeded, but no image was returned.";
const NO_SUGGESTIONS_MESSAGE: &str = "The AI did not return any usable suggestions.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionConcept {
    pub concept_title: String,
    pub prompt_text: String,
    #[serde(default)]
    pub settings_json: ChosenSettings,
}

fn image_parts(product: &ImageFile, reference: Option<&ImageFile>) -> Vec<Value> {
    let mut parts = vec![inline_image_part(product)];
    if let Some(reference) = reference {
        parts.push(inline_image_part(reference));
    }
    parts
}

fn first_image(mut images: Vec<GeneratedImage>, empty_message: &str) -> Result<GeneratedImage, StudioError> {
    if images.is_empty() {
        return Err(StudioError::EmptyResult(empty_message.to_string()));
    }
    Ok(images.swap_remove(0))
}

/// Asks the director model for a positive/negative prompt pair. Never fails:
/// any error degrades to [`DirectorPrompts::fallback`].
pub async fn generate_director_prompts(
    product: &ImageFile,
    reference: Option<&ImageFile>,
    custom_prompt: &str,
    settings: &ChosenSettings,
) -> DirectorPrompts {
    let mut parts = vec![
        text_part(DIRECTOR_SYSTEM_PROMPT),
        text_part(&director_briefing(custom_prompt, settings, reference.is_some())),
    ];
    parts.extend(image_parts(product, reference));

    let schema = json!({
        "type": "OBJECT",
        "properties": {
            "positive_prompt": { "type": "STRING" },
            "negative_prompt": { "type": "STRING" }
        },
        "required": ["positive_prompt", "negative_prompt"]
    });

    match generate_json::<DirectorPrompts>(
        &CONFIG.gemini_director_model,
        parts,
        schema,
        "director_prompts",
    )
    .await
    {
        Ok(prompts) if !prompts.positive_prompt.trim().is_empty() => prompts,
        Ok(_) => {
            warn!("Director returned an empty positive prompt; using the simple construction.");
            DirectorPrompts::fallback(custom_prompt)
        }
        Err(err) => {
            warn!("Director prompt synthesis failed, falling back to simple construction: {err}");
            DirectorPrompts::fallback(custom_prompt)
        }
    }
}

/// Renders the product with director prompts on the image model.
pub async fn execute_virtual_shoot(
    product: &ImageFile,
    reference: Option<&ImageFile>,
    prompts: &DirectorPrompts,
    export: &ExportSettings,
) -> Result<GeneratedImage, StudioError> {
    let mut parts = vec![text_part(&virtual_shoot_instruction(prompts, export))];
    parts.extend(image_parts(product, reference));

    let images = generate_images(
        &CONFIG.gemini_image_model,
        parts,
        "virtual_shoot",
        NO_IMAGE_MESSAGE,
    )
    .await?;
    let image = first_image(images, NO_IMAGE_MESSAGE)?;
    Ok(if export.transparent { image.into_png() } else { image })
}

/// One image-model call with the composed studio instruction.
pub async fn generate_direct_edit(
    product: &ImageFile,
    reference: Option<&ImageFile>,
    custom_prompt: &str,
    settings: &ChosenSettings,
    export: &ExportSettings,
) -> Result<GeneratedImage, StudioError> {
    let instruction = compose_instruction(custom_prompt, settings, export, reference.is_some());
    let mut parts = vec![text_part(&instruction)];
    parts.extend(image_parts(product, reference));

    let images = generate_images(&CONFIG.gemini_image_model, parts, "direct_edit", NO_IMAGE_MESSAGE).await?;
    let image = first_image(images, NO_IMAGE_MESSAGE)?;
    Ok(if export.transparent { image.into_png() } else { image })
}

/// Studio generation through the configured pipeline.
pub async fn generate_final_image(
    product: &ImageFile,
    reference: Option<&ImageFile>,
    custom_prompt: &str,
    settings: &ChosenSettings,
    export: &ExportSettings,
) -> Result<GeneratedImage, StudioError> {
    match CONFIG.studio_pipeline {
        StudioPipeline::Director => {
            let prompts = generate_director_prompts(product, reference, custom_prompt, settings).await;
            info!(
                "Director prompts ready (positive {} chars, negative {} chars)",
                prompts.positive_prompt.len(),
                prompts.negative_prompt.len()
            );
            execute_virtual_shoot(product, reference, &prompts, export).await
        }
        StudioPipeline::Direct => {
            generate_direct_edit(product, reference, custom_prompt, settings, export).await
        }
    }
}

pub async fn generate_with_imagen(
    prompt: &str,
    negative_prompt: &str,
    export: &ExportSettings,
) -> Result<Vec<GeneratedImage>, StudioError> {
    let full_prompt = imagen_prompt(prompt, negative_prompt);
    predict_images(
        &CONFIG.imagen_model,
        &full_prompt,
        CONFIG.imagen_image_count,
        export.aspect_ratio.as_str(),
    )
    .await
}

fn suggestions_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "concept_title": { "type": "STRING" },
                "prompt_text": { "type": "STRING" },
                "settings_json": {
                    "type": "OBJECT",
                    "properties": {
                        "Camera": { "type": "STRING" },
                        "Lighting": { "type": "STRING" },
                        "Mockup": { "type": "STRING" },
                        "Manipulation": { "type": "STRING" },
                        "Product Retouch": { "type": "STRING" },
                        "People Retouch": { "type": "STRING" },
                        "cameraDetails": {
                            "type": "OBJECT",
                            "properties": {
                                "focalLength": { "type": "NUMBER" },
                                "aperture": { "type": "NUMBER" },
                                "shutterSpeed": { "type": "NUMBER" },
                                "height": { "type": "NUMBER" },
                                "pitch": { "type": "NUMBER" },
                                "roll": { "type": "NUMBER" }
                            }
                        },
                        "lightingDetails": {
                            "type": "OBJECT",
                            "properties": {
                                "temperature": { "type": "NUMBER" },
                                "intensity": { "type": "NUMBER" },
                                "hardness": { "type": "NUMBER" }
                            }
                        }
                    }
                }
            }
        }
    })
}

/// Keeps the well-formed concepts of a suggestions payload. Anything that is
/// not an array yields no concepts.
pub fn parse_suggestions(value: Value) -> Vec<SuggestionConcept> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<SuggestionConcept>(item) {
            Ok(concept) => Some(concept),
            Err(err) => {
                warn!("Dropping malformed suggestion concept: {err}");
                None
            }
        })
        .collect()
}

pub async fn generate_creative_suggestions(
    product: &ImageFile,
    reference: Option<&ImageFile>,
    user_draft: &str,
    camera_constraint: Option<&str>,
) -> Result<Vec<SuggestionConcept>, StudioError> {
    let mut parts = vec![text_part(CREATIVE_SUGGESTIONS_SYSTEM_PROMPT)];
    parts.extend(image_parts(product, reference));
    parts.push(text_part(&suggestions_request(
        user_draft,
        camera_constraint,
        reference.is_some(),
    )));

    let value: Value = generate_json(
        &CONFIG.gemini_director_model,
        parts,
        suggestions_schema(),
        "creative_suggestions",
    )
    .await?;
    suggestions_from_payload(value)
}

/// Like [`parse_suggestions`], but a payload without a single usable concept
/// is an empty result.
pub fn suggestions_from_payload(value: Value) -> Result<Vec<SuggestionConcept>, StudioError> {
    let concepts = parse_suggestions(value);
    if concepts.is_empty() {
        return Err(StudioError::EmptyResult(NO_SUGGESTIONS_MESSAGE.to_string()));
    }
    Ok(concepts)
}

/// Keeps only ids that exist in the camera catalog, in the order given.
pub fn camera_presets_from_ids(ids: &[String]) -> Vec<&'static Preset> {
    let mut presets: Vec<&'static Preset> = Vec::new();
    for id in ids {
        if let Some(preset) = find_by_id(Category::Camera, id) {
            if !preset.is_none() && !presets.iter().any(|existing| existing.id == preset.id) {
                presets.push(preset);
            }
        }
    }
    presets.truncate(3);
    presets
}

pub async fn generate_camera_suggestions(
    product: &ImageFile,
    custom_prompt: &str,
) -> Result<Vec<&'static Preset>, StudioError> {
    let parts = vec![
        inline_image_part(product),
        text_part(&camera_suggestions_prompt(custom_prompt)),
    ];
    let schema = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    let value: Value = generate_json(&CONFIG.gemini_text_model, parts, schema, "camera_suggestions").await?;
    let ids: Vec<String> = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    Ok(camera_presets_from_ids(&ids))
}

pub async fn analyze_portrait_subject(image: &ImageFile) -> Result<AiAnalysisReport, StudioError> {
    let parts = vec![inline_image_part(image), text_part(PORTRAIT_ANALYSIS_PROMPT)];
    let schema = json!({
        "type": "OBJECT",
        "properties": {
            "profile": { "type": "STRING" },
            "age_estimation": { "type": "STRING" },
            "lighting_quality": { "type": "STRING" },
            "focus_quality": { "type": "STRING" },
            "key_observations": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["profile", "age_estimation", "lighting_quality", "focus_quality", "key_observations"]
    });
    generate_json(&CONFIG.gemini_text_model, parts, schema, "portrait_analysis").await
}

/// Retouches a portrait. The `off` profile hands the source back untouched
/// without contacting the model.
pub async fn retouch_portrait_image(
    image: &ImageFile,
    profile: AiProfile,
    settings: &PortraitRetouchSettings,
    custom_prompt: &str,
) -> Result<GeneratedImage, StudioError> {
    if profile == AiProfile::Off {
        return Ok(GeneratedImage {
            bytes: image.bytes.clone(),
            mime_type: image.mime_type.clone(),
        });
    }

    let parts = vec![
        text_part(&retouch_instruction(profile, settings, custom_prompt)),
        inline_image_part(image),
    ];
    let images = generate_images(&CONFIG.gemini_image_model, parts, "portrait_retouch", NO_RETOUCH_MESSAGE).await?;
    first_image(images, NO_RETOUCH_MESSAGE)
}

pub async fn upscale_image(
    image: &GeneratedImage,
    target: UpscaleTarget,
) -> Result<GeneratedImage, StudioError> {
    let parts = vec![
        inline_image_part(&image.as_image_file()),
        text_part(upscale_prompt(target)),
    ];
    let images = generate_images(&CONFIG.gemini_image_model, parts, "upscale", NO_UPSCALE_MESSAGE).await?;
    first_image(images, NO_UPSCALE_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::media::tests::tiny_png;

    #[test]
    fn suggestions_keep_well_formed_concepts() {
        let value = json!([
            {
                "concept_title": "Minimal",
                "prompt_text": "45° Hero shot of the bottle on white",
                "settings_json": { "Camera": "45° Hero", "lightingDetails": { "temperature": 5000 } }
            },
            { "concept_title": "Broken" },
            { "concept_title": "Bare", "prompt_text": "Lifestyle kitchen" }
        ]);
        let concepts = parse_suggestions(value);
        assert_eq!(concepts.len(), 2);
        assert_eq!(concepts[0].settings_json.camera.as_deref(), Some("45° Hero"));
        let lighting = concepts[0].settings_json.lighting_details.unwrap();
        assert_eq!(lighting.temperature, Some(5000.0));
        assert_eq!(lighting.intensity, None);
        assert_eq!(concepts[1].settings_json, ChosenSettings::default());
    }

    #[test]
    fn non_array_suggestions_are_empty() {
        assert!(parse_suggestions(json!({ "concept_title": "x" })).is_empty());
        assert!(parse_suggestions(json!("three ideas")).is_empty());
    }

    #[test]
    fn payload_without_concepts_is_an_empty_result() {
        let err = suggestions_from_payload(json!({ "concept_title": "x" })).unwrap_err();
        assert_eq!(err, StudioError::EmptyResult(NO_SUGGESTIONS_MESSAGE.to_string()));
        assert!(suggestions_from_payload(json!([])).is_err());
        let concepts = suggestions_from_payload(json!([
            { "concept_title": "Bare", "prompt_text": "Lifestyle kitchen" }
        ]))
        .unwrap();
        assert_eq!(concepts.len(), 1);
    }

    #[test]
    fn camera_ids_are_filtered_to_catalog() {
        let ids = vec![
            "hero-45".to_string(),
            "made-up".to_string(),
            "none".to_string(),
            "hero-45".to_string(),
            "worms-eye".to_string(),
        ];
        let presets = camera_presets_from_ids(&ids);
        let ids: Vec<_> = presets.iter().map(|preset| preset.id).collect();
        assert_eq!(ids, vec!["hero-45", "worms-eye"]);
    }

    #[tokio::test]
    async fn off_profile_returns_source_without_remote_call() {
        let source = ImageFile::from_bytes(tiny_png(), None, Some("face.png".to_string())).unwrap();
        let result = retouch_portrait_image(
            &source,
            AiProfile::Off,
            &PortraitRetouchSettings::default(),
            "make it pop",
        )
        .await
        .unwrap();
        assert_eq!(result.bytes, source.bytes);
        assert_eq!(result.mime_type, "image/png");
    }

    #[test]
    fn empty_image_list_is_an_empty_result() {
        let err = first_image(Vec::new(), NO_UPSCALE_MESSAGE).unwrap_err();
        assert_eq!(err, StudioError::EmptyResult(NO_UPSCALE_MESSAGE.to_string()));
    }
}
