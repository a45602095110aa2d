use std::env;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioPipeline {
    /// Two calls: a reasoning model writes positive/negative prompts, then the image model renders.
    Director,
    /// One call to the image model with the composed instruction.
    Direct,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_text_model: String,
    pub gemini_director_model: String,
    pub gemini_image_model: String,
    pub imagen_model: String,
    pub imagen_image_count: u32,
    pub gemini_safety_settings: String,
    pub gemini_timeout_seconds: u64,
    pub studio_pipeline: StudioPipeline,
    pub output_dir: PathBuf,
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_gemini_safety_settings(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "permissive".to_string();
    }

    let lowered = trimmed.to_lowercase();
    match lowered.as_str() {
        "permissive" | "off" | "none" => "permissive".to_string(),
        "standard" => "standard".to_string(),
        _ => {
            warn!(
                "Unknown GEMINI_SAFETY_SETTINGS value '{}'; defaulting to permissive.",
                value
            );
            "permissive".to_string()
        }
    }
}

fn parse_pipeline(value: &str) -> StudioPipeline {
    match value.trim().to_lowercase().as_str() {
        "direct" | "single" => StudioPipeline::Direct,
        "director" | "" => StudioPipeline::Director,
        other => {
            warn!("Unknown STUDIO_PIPELINE value '{}'; using director.", other);
            StudioPipeline::Director
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Config {
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            gemini_api_key: env_string("GEMINI_API_KEY", "").trim().to_string(),
            gemini_base_url: env_string(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            )
            .trim_end_matches('/')
            .to_string(),
            gemini_text_model: env_string("GEMINI_TEXT_MODEL", "gemini-2.5-flash"),
            gemini_director_model: env_string("GEMINI_DIRECTOR_MODEL", "gemini-2.5-pro"),
            gemini_image_model: env_string("GEMINI_IMAGE_MODEL", "gemini-2.5-flash-image"),
            imagen_model: env_string("IMAGEN_MODEL", "imagen-4.0-generate-001"),
            imagen_image_count: env_u32("IMAGEN_IMAGE_COUNT", 4).clamp(1, 4),
            gemini_safety_settings: normalize_gemini_safety_settings(env_string(
                "GEMINI_SAFETY_SETTINGS",
                "permissive",
            )),
            gemini_timeout_seconds: env_u64("GEMINI_TIMEOUT_SECONDS", 120),
            studio_pipeline: parse_pipeline(&env_string("STUDIO_PIPELINE", "director")),
            output_dir: PathBuf::from(env_string("STUDIO_OUTPUT_DIR", "output")),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }
}

pub const DIRECTOR_SYSTEM_PROMPT: &str = r#"Role: You are the "AI Art Director" for a professional product photography studio.
Task: You will receive a "briefing file" (JSON) containing the product description, category, user text, style ref, and camera angle. Your job is to output the "Final Order" (Positive and Negative prompts) for the image generator.

Your Thinking Process (The Logic):

1. **Check the Creative Direction Text (user_scene_request)**
   - **Case A: Box is Empty ("")**
     - You MUST invent a professional scene from scratch based on the **Product Category**.
     - Example: If "Beverage", invent "A refreshing scene with water splashes and ice".
     - This becomes the "Core Idea".
   - **Case B: Box is Full**
     - Respect the user's vision. The text they wrote is the "Core Idea".

2. **Weave All Threads Together (The "Director" Phase)**
   - Combine the "Core Idea" with:
     - **Product Description** (subject_description)
     - **Camera Angle** (camera_angle_selection) - GIVE PRIORITY to this if it conflicts with the Core Idea (e.g., user chose "Macro").
     - **Lighting Setup** (lighting_selection)
     - **Style Description** (style_ref_description)

3. **Add the "Professional Polish"**
   - Add magic words: "8K quality, professional commercial photography, hyperrealistic, cinematic lighting, sharp focus".

4. **Define the "Don'ts" (Negative Prompt)**
   - List things to avoid: "blurry, cartoon, deformed, low quality, watermark, text, ugly, distorted, drawing, painting, illustration, 3D render, CGI, anime, sketch".

Output Format:
Return a SINGLE JSON object:
{
  "positive_prompt": "The final positive command...",
  "negative_prompt": "The final negative command..."
}"#;

pub const CREATIVE_SUGGESTIONS_SYSTEM_PROMPT: &str = r#"You are an expert AI Creative Director for product photography.
Your goal is to generate 3 distinct, high-quality, photorealistic image generation prompts based on the user's inputs.

**THE 4 SCENARIOS:**
1.  **Product Only (Blank Canvas):** If "User Text" is empty and no Reference is provided.
    - Suggest 3 proven commercial environments:
      - **Option 1 (Minimalist):** Clean composition, studio lighting.
      - **Option 2 (Lifestyle):** Product in a relevant real-world environment.
      - **Option 3 (Creative/Dramatic):** Strong lighting, floating, or creative background.
2.  **Product + Style Ref:** If a Reference Image is provided.
    - Perform "Style Transfer". Merge the product into the style, lighting, and mood of the reference image.
3.  **Product + Text:** If User Text is provided but no Reference.
    - "Prompt Enhancer". Convert the simple user text into a professional, technically detailed prompt (add keywords like '8k', 'studio lighting').
4.  **Full State (Product + Ref + Text):** If both Text and Reference are provided.
    - "The Maestro". Show the [Product] in the [Text Scene] but applying the [Reference Mood/Lighting].

**MANDATORY RULES:**
- **Camera Priority:** If "Camera Constraint" is provided (and not "None"), **YOU MUST** start every single suggestion prompt with this exact phrase. Example: "Hero-45 angle shot of..."
- **Product Fidelity:** The product is the main subject. Do not describe it changing shape or logo.
- **Professional Tone:** Use professional photography terminology.

**OUTPUT:**
Return a JSON Array of exactly 3 suggestions.
Each object must follow this schema:
{
  "concept_title": "Short Descriptive Title",
  "prompt_text": "The full, detailed image generation prompt",
  "settings_json": { ...populate with best matching presets from the provided schema... }
}"#;

pub const CAMERA_SUGGESTIONS_PROMPT: &str = r#"You are an expert product photographer and AI assistant. Your task is to suggest the best camera angles for a product shot.

**Analysis Phase:**
1.  **Analyze the Product Image:** Identify the product's key characteristics (e.g., shape, size, material).
2.  **Analyze the Creative Prompt:** Understand the user's desired mood: "{custom_prompt}".

**Task:**
Based on your analysis, choose up to 3 of the most suitable camera presets from the following list.

**Available Presets:**
```json
{available_presets}
```

**Output Requirement:**
Return a JSON array containing ONLY the string IDs of your top 3 recommended presets."#;

pub const PORTRAIT_ANALYSIS_PROMPT: &str = r#"Analyze the provided portrait image for professional retouching.
**Task:** Identify key characteristics of the subject and the photo's quality.

**Analysis Categories:**
1.  **Profile:** "male", "female", "child", "senior", "group", or "off".
2.  **Age Estimation:** General age range.
3.  **Lighting Quality:** Describe the lighting.
4.  **Focus Quality:** Describe the focus.
5.  **Key Observations:** List up to 3 brief, critical observations for retouching.

**Output:** JSON object with keys "profile", "age_estimation", "lighting_quality", "focus_quality", "key_observations"."#;

pub const UPSCALE_4K_PROMPT: &str = "Perform a professional-grade super-resolution upscale to a 4K resolution (~4096px on the longest side). Preserve all original details and textures perfectly. Do not alter the style or content. Output only the upscaled image.";

pub const UPSCALE_HD_PROMPT: &str = "Upscale this image to a high-definition resolution (~2K). Preserve all original details and textures. Output only the upscaled image.";

pub const FALLBACK_NEGATIVE_PROMPT: &str =
    "blurry, low quality, illustration, 3D render, deformed";
