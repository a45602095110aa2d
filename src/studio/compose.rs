//! Turns selections and free text into the instruction strings sent to the
//! image models.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::{
    CAMERA_SUGGESTIONS_PROMPT, FALLBACK_NEGATIVE_PROMPT, UPSCALE_4K_PROMPT, UPSCALE_HD_PROMPT,
};
use crate::presets::catalog::{catalog, control_schema, find_by_name};
use crate::presets::portrait::{AiProfile, BackgroundEnhancement, ColorGrading, PortraitRetouchSettings};
use crate::presets::types::{Category, ExportSettings, UpscaleTarget};
use crate::studio::settings::{CameraSettings, ChosenSettings, LightingSettings};

pub const PRODUCT_TOKEN: &str = "[PRODUCT]";
const PRODUCT_REFERENCE: &str = "the product shown in the first image";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorPrompts {
    pub positive_prompt: String,
    pub negative_prompt: String,
}

impl DirectorPrompts {
    /// Used when the director model is unavailable or answers with garbage.
    pub fn fallback(custom_prompt: &str) -> Self {
        DirectorPrompts {
            positive_prompt: format!(
                "{custom_prompt}, {PRODUCT_TOKEN}, commercial photography, photorealistic, 8K"
            ),
            negative_prompt: FALLBACK_NEGATIVE_PROMPT.to_string(),
        }
    }
}

fn camera_numbers(details: &CameraSettings) -> String {
    format!(
        "{}mm, f/{}, 1/{}s, height {}cm, pitch {}°, roll {}°",
        details.focal_length,
        details.aperture,
        details.shutter_speed,
        details.height,
        details.pitch,
        details.roll
    )
}

fn lighting_numbers(details: &LightingSettings) -> String {
    format!(
        "{}K, intensity {}%, hardness {}%",
        details.temperature, details.intensity, details.hardness
    )
}

/// Preset names in a stored value, each followed by its description when the
/// catalog still knows it.
fn describe(category: Category, value: &str) -> String {
    let names: Vec<&str> = if category.is_single_select() {
        vec![value]
    } else {
        value.split(',').map(str::trim).collect()
    };
    names
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(|name| match find_by_name(category, name) {
            Some(preset) if !preset.description.is_empty() => {
                format!("{} ({})", preset.name, preset.description.trim_end_matches('.'))
            }
            _ => name.to_string(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Single-call edit instruction built from the current studio state.
///
/// The aspect ratio and the user's text are always present; every other
/// clause appears only for categories with a real selection.
pub fn compose_instruction(
    user_prompt: &str,
    settings: &ChosenSettings,
    export: &ExportSettings,
    has_reference: bool,
) -> String {
    let mut lines = vec![
        "Task: Create a professional product photograph of the product shown in the first image."
            .to_string(),
        format!(
            "HARD CONSTRAINT: The output image MUST use an aspect ratio of {}.",
            export.aspect_ratio.as_str()
        ),
        format!("PRIMARY GOAL (user's creative direction): \"{}\"", user_prompt.trim()),
        "Keep the product's shape, labels, logos and colours exactly as they appear.".to_string(),
    ];

    if has_reference {
        lines.push(
            "STYLE REFERENCE: The second image is a style reference. Draw the mood, lighting and colour palette from it, but do not copy its subject."
                .to_string(),
        );
    }

    let mut clauses = Vec::new();
    for category in Category::ALL {
        let Some(value) = settings.active(category) else {
            continue;
        };
        let described = describe(category, value);
        let clause = match category {
            Category::Mockup => format!("- Scene / mockup: place the product in {described}."),
            Category::Camera => match settings.camera_settings() {
                Some(details) => format!("- Camera angle: {described} [{}].", camera_numbers(&details)),
                None => format!("- Camera angle: {described}."),
            },
            Category::Lighting => match settings.lighting_settings() {
                Some(details) => format!("- Lighting: {described} [{}].", lighting_numbers(&details)),
                None => format!("- Lighting: {described}."),
            },
            Category::Manipulation => format!("- Creative manipulation: {described}."),
            Category::ProductRetouch => format!("- Product retouching: {described}."),
            Category::PeopleRetouch => format!("- People retouching: {described}."),
        };
        clauses.push(clause);
    }
    if !clauses.is_empty() {
        lines.push("STUDIO SETTINGS:".to_string());
        lines.extend(clauses);
    }

    if export.transparent {
        lines.push(
            "BACKGROUND: Render the product on a fully transparent background (PNG with alpha). No backdrop, no shadows outside the product."
                .to_string(),
        );
    } else {
        lines.push("BACKGROUND: Opaque, fully rendered background.".to_string());
    }
    lines.push("OUTPUT: A single photorealistic, high-fidelity image.".to_string());

    lines.join("\n")
}

/// `"{name} ({fl}mm, f/{ap}, 1/{ss}s)"`, or `"None"` without a camera choice.
pub fn camera_selection(settings: &ChosenSettings) -> String {
    let Some(camera) = settings.active(Category::Camera) else {
        return "None".to_string();
    };
    match settings.camera_settings() {
        Some(details) => format!(
            "{camera} ({}mm, f/{}, 1/{}s)",
            details.focal_length, details.aperture, details.shutter_speed
        ),
        None => camera.to_string(),
    }
}

fn lighting_selection(settings: &ChosenSettings) -> String {
    let Some(lighting) = settings.active(Category::Lighting) else {
        return "None".to_string();
    };
    match settings.lighting_settings() {
        Some(details) => format!("{lighting} ({})", lighting_numbers(&details)),
        None => lighting.to_string(),
    }
}

/// The briefing file handed to the director model next to its system prompt.
pub fn director_briefing(custom_prompt: &str, settings: &ChosenSettings, has_reference: bool) -> String {
    let style = if has_reference {
        "Analyze the attached style reference image (Image 2)."
    } else {
        "None"
    };
    let inputs = json!({
        "subject_keyword": PRODUCT_TOKEN,
        "subject_description": "Analyze the attached product image (Image 1) to describe the subject in detail.",
        "user_scene_request": custom_prompt.trim(),
        "style_ref_description": style,
        "camera_angle_selection": camera_selection(settings),
        "lighting_selection": lighting_selection(settings),
    });
    let inputs = serde_json::to_string_pretty(&inputs).unwrap_or_else(|_| inputs.to_string());

    format!(
        "Here are the inputs for your task:\n{inputs}\n\n**Instructions:**\n\
1. Image 1 is the Product. Analyze it to populate 'subject_description'.\n\
2. Image 2 (if provided) is the Style Reference. Analyze it to populate 'style_ref_description'.\n\
3. Fulfill the \"AI Art Director\" role defined in your system instructions."
    )
}

pub fn virtual_shoot_instruction(prompts: &DirectorPrompts, export: &ExportSettings) -> String {
    let positive = prompts.positive_prompt.replace(PRODUCT_TOKEN, PRODUCT_REFERENCE);
    let background = if export.transparent {
        "- Background: Transparent (PNG)"
    } else {
        "- Background: Opaque"
    };
    format!(
        "**INSTRUCTIONS:**\n{positive}\n\n**CONSTRAINTS (AVOID):**\n{}\n\n**OUTPUT REQUIREMENTS:**\n- Aspect Ratio: {}\n{background}\n- Quality: Photorealistic, High Fidelity",
        prompts.negative_prompt,
        export.aspect_ratio.as_str()
    )
}

pub fn imagen_prompt(prompt: &str, negative_prompt: &str) -> String {
    let negative_prompt = negative_prompt.trim();
    if negative_prompt.is_empty() {
        prompt.trim().to_string()
    } else {
        format!("{} | negative prompt: {negative_prompt}", prompt.trim())
    }
}

pub fn upscale_prompt(target: UpscaleTarget) -> &'static str {
    match target {
        UpscaleTarget::FourK => UPSCALE_4K_PROMPT,
        UpscaleTarget::Hd => UPSCALE_HD_PROMPT,
    }
}

pub fn intensity_word(value: u8) -> &'static str {
    if value > 70 {
        "strong"
    } else if value > 30 {
        "noticeable"
    } else {
        "subtle"
    }
}

/// Retouch instruction for one profile. `Off` never reaches the model, so it
/// only carries the shared requirements.
pub fn retouch_instruction(
    profile: AiProfile,
    settings: &PortraitRetouchSettings,
    custom_prompt: &str,
) -> String {
    let mut lines: Vec<String> = vec![
        "Task: Professionally retouch and enhance the provided portrait.".into(),
        "STRICT OUTPUT REQUIREMENTS:".into(),
        "1. Do NOT change the image resolution, width, or height. The output MUST match the original dimensions.".into(),
        "2. Preserve the subject's identity, facial structure, and unique features exactly.".into(),
        "3. Maintain the original image quality. Do not compress or downscale.".into(),
        "4. Do not alter the composition, aspect ratio, or background (unless explicitly instructed to replace).".into(),
    ];

    if !custom_prompt.trim().is_empty() {
        lines.push(format!("\n**User's Creative Direction:** \"{}\".", custom_prompt.trim()));
    }
    lines.push("\n**AI Profile & Technical Settings:**".into());

    match profile {
        AiProfile::Male => {
            lines.push("\nStyle: Masculine, sharp, realistic.".into());
            if settings.blemish_removal {
                lines.push("- Remove temporary blemishes, preserve skin texture.".into());
            }
            if settings.jaw_sculpt > 0 {
                lines.push(format!("- Add {} definition to jawline.", intensity_word(settings.jaw_sculpt)));
            }
            if settings.skin_smoothing > 0 {
                lines.push("- Even out skin tone (subtle).".into());
            }
        }
        AiProfile::Female => {
            lines.push("\nStyle: Clean, aesthetic, glowing.".into());
            if settings.skin_smoothing > 0 {
                lines.push(format!(
                    "- Create smooth skin ({}), preserve texture.",
                    intensity_word(settings.skin_smoothing)
                ));
            }
            if settings.eye_enhancement {
                lines.push("- Enhance makeup, brighten eyes.".into());
            }
            if settings.jaw_sculpt > 0 || settings.nose_sculpt > 0 {
                lines.push("- Subtly sculpt contours.".into());
            }
        }
        AiProfile::Child => {
            lines.push("\nStyle: Natural and clean. Minimal corrections.".into());
            if settings.lighting_correction {
                lines.push("- Correct poor lighting.".into());
            }
        }
        AiProfile::Senior => {
            lines.push("\nStyle: Dignified, natural, sharp.".into());
            if settings.wrinkle_reduction > 0 {
                lines.push(format!(
                    "- {} reduction of deep wrinkles (do not remove character lines).",
                    intensity_word(settings.wrinkle_reduction)
                ));
            }
        }
        AiProfile::Professional => {
            lines.push("\nStyle: Corporate headshot. Clean, confident.".into());
            if settings.shine_removal > 0 {
                lines.push(format!("- {} reduction of shine.", intensity_word(settings.shine_removal)));
            }
            if settings.clothing_wrinkle_removal {
                lines.push("- Remove clothing wrinkles.".into());
            }
            if settings.teeth_whitening > 0 {
                lines.push(format!("- {} teeth whitening.", intensity_word(settings.teeth_whitening)));
            }
        }
        AiProfile::Glamour => {
            lines.push("\nStyle: High-fashion, flawless, dramatic.".into());
            if settings.skin_smoothing > 0 {
                lines.push(format!("- {} skin smoothing.", intensity_word(settings.skin_smoothing)));
            }
            if settings.eye_enhancement {
                lines.push("- Dramatically enhance eyes.".into());
            }
            if settings.color_grading != ColorGrading::None {
                lines.push("- Apply cinematic color grade.".into());
            }
        }
        AiProfile::Off => {}
    }

    if profile != AiProfile::Child && settings.flyaway_hair_removal > 0 {
        lines.push(format!(
            "- Tame flyaway hairs ({}).",
            intensity_word(settings.flyaway_hair_removal)
        ));
    }

    lines.push("\nFinal Touches:".into());
    match settings.background_enhancement {
        BackgroundEnhancement::Blur => lines.push("- Apply soft bokeh blur to background.".into()),
        BackgroundEnhancement::Replace => {
            let replacement = settings
                .background_replacement_prompt
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or("neutral studio");
            lines.push(format!("- Replace background with: \"{replacement}\"."));
        }
        BackgroundEnhancement::Desaturate => lines.push("- Desaturate background slightly.".into()),
        BackgroundEnhancement::Keep => lines.push("- Keep background exactly as is.".into()),
    }
    if settings.film_grain > 0 {
        lines.push(format!("- Add {} film grain.", intensity_word(settings.film_grain)));
    }

    lines.join("\n")
}

/// User-input block for the creative-suggestions call.
pub fn suggestions_request(user_draft: &str, camera_constraint: Option<&str>, has_reference: bool) -> String {
    let schema = control_schema();
    let schema = serde_json::to_string_pretty(&schema).unwrap_or_else(|_| schema.to_string());
    let reference_step = if has_reference {
        "Analyze the Reference Image (Image 2) to extract style/lighting."
    } else {
        "No reference image analysis needed."
    };
    format!(
        "**User Inputs:**\n\
- User Text (Creative Direction): \"{}\"\n\
- Camera Constraint: \"{}\"\n\
- Reference Image Provided: {}\n\
- Product Image Provided: Yes\n\n\
**Control Schema for settings_json:**\n{schema}\n\n\
**Task:**\n\
1. Analyze the Product Image (Image 1) to understand the subject.\n\
2. {reference_step}\n\
3. Generate 3 suggestions based on the appropriate Scenario (1-4) defined in the system instructions.",
        user_draft.trim(),
        camera_constraint.unwrap_or("None"),
        if has_reference { "Yes" } else { "No" },
    )
}

pub fn camera_suggestions_prompt(custom_prompt: &str) -> String {
    let available: Vec<_> = catalog(Category::Camera)
        .iter()
        .filter(|preset| !preset.is_none())
        .map(|preset| json!({ "id": preset.id, "name": preset.name, "description": preset.description }))
        .collect();
    let available = serde_json::to_string_pretty(&available).unwrap_or_default();
    CAMERA_SUGGESTIONS_PROMPT
        .replace("{custom_prompt}", custom_prompt.trim())
        .replace("{available_presets}", &available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::types::AspectRatio;

    fn hero_settings() -> ChosenSettings {
        ChosenSettings {
            camera: Some("45° Hero".to_string()),
            camera_details: Some(
                CameraSettings {
                    focal_length: 42.5,
                    aperture: 6.0,
                    shutter_speed: 125.0,
                    height: 30.0,
                    pitch: -5.0,
                    roll: 0.0,
                }
                .into(),
            ),
            lighting: Some("None".to_string()),
            lighting_details: Some(LightingSettings::default().into()),
            mockup: Some("None (Plain Backdrop)".to_string()),
            manipulation: Some("None".to_string()),
            product_retouch: Some("None".to_string()),
            people_retouch: Some("None".to_string()),
        }
    }

    #[test]
    fn instruction_always_carries_ratio_and_user_text() {
        for ratio in [AspectRatio::Story, AspectRatio::Square, AspectRatio::Landscape] {
            let export = ExportSettings {
                aspect_ratio: ratio,
                transparent: false,
            };
            let text = compose_instruction(
                "bottle on wet black slate",
                &ChosenSettings::default(),
                &export,
                false,
            );
            assert!(text.contains(ratio.as_str()));
            assert!(text.contains("bottle on wet black slate"));
            assert!(!text.contains("STUDIO SETTINGS"));
        }
    }

    #[test]
    fn instruction_lists_only_active_categories_with_numbers() {
        let text = compose_instruction("hero shot", &hero_settings(), &ExportSettings::default(), true);
        assert!(text.contains("- Camera angle: 45° Hero"));
        assert!(text.contains("42.5mm, f/6, 1/125s, height 30cm, pitch -5°"));
        assert!(!text.contains("- Lighting:"));
        assert!(!text.contains("- Scene / mockup:"));
        assert!(text.contains("STYLE REFERENCE"));
        assert!(text.contains("Opaque"));
    }

    #[test]
    fn instruction_clause_order_is_fixed() {
        let settings = ChosenSettings {
            camera: Some("45° Hero".to_string()),
            mockup: Some("Cafe Table".to_string()),
            people_retouch: Some("Some Retired Preset".to_string()),
            ..ChosenSettings::default()
        };
        let export = ExportSettings {
            aspect_ratio: AspectRatio::Portrait,
            transparent: true,
        };
        let text = compose_instruction("", &settings, &export, false);
        let mockup = text.find("Scene / mockup").unwrap();
        let camera = text.find("Camera angle").unwrap();
        let people = text.find("People retouching: Some Retired Preset").unwrap();
        assert!(mockup < camera && camera < people);
        assert!(text.contains("transparent background"));
    }

    #[test]
    fn camera_selection_formats_numbers() {
        assert_eq!(camera_selection(&hero_settings()), "45° Hero (42.5mm, f/6, 1/125s)");
        assert_eq!(camera_selection(&ChosenSettings::default()), "None");
    }

    #[test]
    fn briefing_passes_empty_request_through() {
        let briefing = director_briefing("  ", &ChosenSettings::default(), false);
        assert!(briefing.contains("\"user_scene_request\": \"\""));
        assert!(briefing.contains("\"style_ref_description\": \"None\""));
        assert!(briefing.contains("[PRODUCT]"));
    }

    #[test]
    fn virtual_shoot_replaces_product_token() {
        let prompts = DirectorPrompts::fallback("perfume on marble");
        let export = ExportSettings {
            aspect_ratio: AspectRatio::Classic,
            transparent: true,
        };
        let text = virtual_shoot_instruction(&prompts, &export);
        assert!(text.contains("perfume on marble, the product shown in the first image, commercial photography"));
        assert!(!text.contains(PRODUCT_TOKEN));
        assert!(text.contains("- Aspect Ratio: 3:2"));
        assert!(text.contains("- Background: Transparent (PNG)"));
        assert!(text.contains(FALLBACK_NEGATIVE_PROMPT));
    }

    #[test]
    fn imagen_prompt_appends_negative_only_when_present() {
        assert_eq!(imagen_prompt("a red kettle", ""), "a red kettle");
        assert_eq!(
            imagen_prompt("a red kettle", "blurry"),
            "a red kettle | negative prompt: blurry"
        );
    }

    #[test]
    fn intensity_thresholds() {
        assert_eq!(intensity_word(71), "strong");
        assert_eq!(intensity_word(70), "noticeable");
        assert_eq!(intensity_word(31), "noticeable");
        assert_eq!(intensity_word(30), "subtle");
    }

    #[test]
    fn retouch_instruction_follows_profile() {
        let male = PortraitRetouchSettings::defaults_for(AiProfile::Male);
        let text = retouch_instruction(AiProfile::Male, &male, "");
        assert!(text.contains("Style: Masculine, sharp, realistic."));
        assert!(!text.contains("User's Creative Direction"));

        let mut child = PortraitRetouchSettings::defaults_for(AiProfile::Child);
        child.flyaway_hair_removal = 90;
        child.background_enhancement = BackgroundEnhancement::Replace;
        child.background_replacement_prompt = None;
        let text = retouch_instruction(AiProfile::Child, &child, "school photo");
        assert!(!text.contains("flyaway"));
        assert!(text.contains("\"school photo\""));
        assert!(text.contains("Replace background with: \"neutral studio\"."));
    }

    #[test]
    fn suggestions_request_mentions_camera_constraint() {
        let text = suggestions_request("", Some("45° Hero"), true);
        assert!(text.contains("Camera Constraint: \"45° Hero\""));
        assert!(text.contains("Reference Image Provided: Yes"));
        let text = suggestions_request("cozy", None, false);
        assert!(text.contains("Camera Constraint: \"None\""));
        assert!(text.contains("No reference image analysis needed."));
    }

    #[test]
    fn camera_prompt_fills_placeholders() {
        let text = camera_suggestions_prompt("summer vibes");
        assert!(text.contains("\"summer vibes\""));
        assert!(text.contains("\"hero-45\""));
        assert!(!text.contains("{available_presets}"));
    }
}
