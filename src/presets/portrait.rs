use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProfile {
    Male,
    Female,
    Child,
    Senior,
    Professional,
    Glamour,
    #[default]
    Off,
}

impl AiProfile {
    pub const ALL: [AiProfile; 7] = [
        AiProfile::Male,
        AiProfile::Female,
        AiProfile::Child,
        AiProfile::Senior,
        AiProfile::Professional,
        AiProfile::Glamour,
        AiProfile::Off,
    ];

    pub fn parse(value: &str) -> Option<AiProfile> {
        match value.trim().to_lowercase().as_str() {
            "male" => Some(AiProfile::Male),
            "female" => Some(AiProfile::Female),
            "child" => Some(AiProfile::Child),
            "senior" => Some(AiProfile::Senior),
            "professional" => Some(AiProfile::Professional),
            "glamour" => Some(AiProfile::Glamour),
            "off" => Some(AiProfile::Off),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AiProfile::Male => "male",
            AiProfile::Female => "female",
            AiProfile::Child => "child",
            AiProfile::Senior => "senior",
            AiProfile::Professional => "professional",
            AiProfile::Glamour => "glamour",
            AiProfile::Off => "off",
        }
    }

    /// Profiles the analysis step may switch to on its own.
    pub fn from_detected(detected: DetectedProfile) -> AiProfile {
        match detected {
            DetectedProfile::Male => AiProfile::Male,
            DetectedProfile::Female => AiProfile::Female,
            DetectedProfile::Child => AiProfile::Child,
            DetectedProfile::Senior => AiProfile::Senior,
            _ => AiProfile::Off,
        }
    }
}

/// Classification returned by portrait analysis. Unknown strings map to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedProfile {
    Male,
    Female,
    Child,
    Senior,
    Professional,
    Glamour,
    Group,
    Off,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysisReport {
    pub profile: DetectedProfile,
    pub age_estimation: String,
    pub lighting_quality: String,
    pub focus_quality: String,
    #[serde(default)]
    pub key_observations: Vec<String>,
}

impl AiAnalysisReport {
    pub fn failed() -> Self {
        AiAnalysisReport {
            profile: DetectedProfile::Off,
            age_estimation: "N/A".to_string(),
            lighting_quality: "Unknown".to_string(),
            focus_quality: "Unknown".to_string(),
            key_observations: vec!["AI analysis failed.".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundEnhancement {
    #[default]
    Keep,
    Blur,
    Desaturate,
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorGrading {
    #[default]
    None,
    Cinematic,
    Warm,
    Cool,
    Vintage,
}

/// Slider fields run 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortraitRetouchSettings {
    pub blemish_removal: bool,
    pub eye_enhancement: bool,
    pub clothing_wrinkle_removal: bool,
    pub lighting_correction: bool,
    pub color_cast_fix: bool,

    pub skin_smoothing: u8,
    pub skin_texture: u8,
    pub wrinkle_reduction: u8,
    pub shine_removal: u8,
    pub dark_circle_reduction: u8,
    pub teeth_whitening: u8,

    pub jaw_sculpt: u8,
    pub nose_sculpt: u8,
    pub eye_sculpt: u8,

    pub flyaway_hair_removal: u8,
    pub hair_shine_enhancement: u8,

    pub background_enhancement: BackgroundEnhancement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_replacement_prompt: Option<String>,

    pub color_grading: ColorGrading,
    pub film_grain: u8,
}

impl PortraitRetouchSettings {
    pub fn defaults_for(profile: AiProfile) -> Self {
        let (bools, sliders, grading) = match profile {
            AiProfile::Male => (
                [true, true, true, true, true],
                [10, 70, 15, 30, 25, 20, 20, 0, 0, 20, 15, 5],
                ColorGrading::None,
            ),
            AiProfile::Female => (
                [true, true, true, true, true],
                [40, 30, 30, 40, 40, 30, 15, 10, 5, 50, 40, 10],
                ColorGrading::Warm,
            ),
            AiProfile::Child => (
                [true, false, true, true, true],
                [0, 0, 0, 10, 5, 10, 0, 0, 0, 10, 5, 0],
                ColorGrading::None,
            ),
            AiProfile::Senior => (
                [true, true, true, true, true],
                [15, 60, 40, 20, 30, 25, 5, 0, 0, 30, 20, 5],
                ColorGrading::Warm,
            ),
            AiProfile::Professional => (
                [true, true, true, true, true],
                [25, 50, 20, 50, 30, 40, 10, 0, 0, 40, 25, 0],
                ColorGrading::None,
            ),
            AiProfile::Glamour => (
                [true, true, true, true, true],
                [60, 20, 50, 20, 60, 50, 30, 15, 10, 60, 60, 15],
                ColorGrading::Cinematic,
            ),
            AiProfile::Off => (
                [false, false, false, false, false],
                [0; 12],
                ColorGrading::None,
            ),
        };
        let [blemish_removal, eye_enhancement, clothing_wrinkle_removal, lighting_correction, color_cast_fix] =
            bools;
        let [skin_smoothing, skin_texture, wrinkle_reduction, shine_removal, dark_circle_reduction, teeth_whitening, jaw_sculpt, nose_sculpt, eye_sculpt, flyaway_hair_removal, hair_shine_enhancement, film_grain] =
            sliders;

        PortraitRetouchSettings {
            blemish_removal,
            eye_enhancement,
            clothing_wrinkle_removal,
            lighting_correction,
            color_cast_fix,
            skin_smoothing,
            skin_texture,
            wrinkle_reduction,
            shine_removal,
            dark_circle_reduction,
            teeth_whitening,
            jaw_sculpt,
            nose_sculpt,
            eye_sculpt,
            flyaway_hair_removal,
            hair_shine_enhancement,
            background_enhancement: BackgroundEnhancement::Keep,
            background_replacement_prompt: None,
            color_grading: grading,
            film_grain,
        }
    }

    /// Sets one field by its camelCase or snake_case name. Sliders clamp to 100.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), String> {
        let key = name.trim().replace('_', "").to_lowercase();
        let parse_bool = |value: &str| match value.trim().to_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(true),
            "false" | "off" | "no" | "0" => Ok(false),
            other => Err(format!("Expected on/off, got '{other}'")),
        };
        let parse_slider = |value: &str| {
            value
                .trim()
                .parse::<u16>()
                .map(|number| number.min(100) as u8)
                .map_err(|_| format!("Expected a number 0-100, got '{}'", value.trim()))
        };

        match key.as_str() {
            "blemishremoval" => self.blemish_removal = parse_bool(value)?,
            "eyeenhancement" => self.eye_enhancement = parse_bool(value)?,
            "clothingwrinkleremoval" => self.clothing_wrinkle_removal = parse_bool(value)?,
            "lightingcorrection" => self.lighting_correction = parse_bool(value)?,
            "colorcastfix" => self.color_cast_fix = parse_bool(value)?,
            "skinsmoothing" => self.skin_smoothing = parse_slider(value)?,
            "skintexture" => self.skin_texture = parse_slider(value)?,
            "wrinklereduction" => self.wrinkle_reduction = parse_slider(value)?,
            "shineremoval" => self.shine_removal = parse_slider(value)?,
            "darkcirclereduction" => self.dark_circle_reduction = parse_slider(value)?,
            "teethwhitening" => self.teeth_whitening = parse_slider(value)?,
            "jawsculpt" => self.jaw_sculpt = parse_slider(value)?,
            "nosesculpt" => self.nose_sculpt = parse_slider(value)?,
            "eyesculpt" => self.eye_sculpt = parse_slider(value)?,
            "flyawayhairremoval" => self.flyaway_hair_removal = parse_slider(value)?,
            "hairshineenhancement" => self.hair_shine_enhancement = parse_slider(value)?,
            "filmgrain" => self.film_grain = parse_slider(value)?,
            "background" | "backgroundenhancement" => {
                self.background_enhancement = match value.trim().to_lowercase().as_str() {
                    "keep" => BackgroundEnhancement::Keep,
                    "blur" => BackgroundEnhancement::Blur,
                    "desaturate" => BackgroundEnhancement::Desaturate,
                    "replace" => BackgroundEnhancement::Replace,
                    other => return Err(format!("Unknown background mode '{other}'")),
                }
            }
            "backgroundprompt" | "backgroundreplacementprompt" => {
                let trimmed = value.trim();
                self.background_replacement_prompt =
                    (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            "colorgrading" | "grade" => {
                self.color_grading = match value.trim().to_lowercase().as_str() {
                    "none" => ColorGrading::None,
                    "cinematic" => ColorGrading::Cinematic,
                    "warm" => ColorGrading::Warm,
                    "cool" => ColorGrading::Cool,
                    "vintage" => ColorGrading::Vintage,
                    other => return Err(format!("Unknown color grade '{other}'")),
                }
            }
            _ => return Err(format!("Unknown portrait setting '{}'", name.trim())),
        }
        Ok(())
    }
}

impl Default for PortraitRetouchSettings {
    fn default() -> Self {
        PortraitRetouchSettings::defaults_for(AiProfile::Off)
    }
}
