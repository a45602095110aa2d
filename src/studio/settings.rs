use serde::{Deserialize, Serialize};

use crate::presets::catalog::{catalog, find_by_name, none_preset};
use crate::presets::select::{joined_names, select};
use crate::presets::types::{Category, Preset};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSettings {
    /// Millimetres.
    pub focal_length: f32,
    /// f-stop.
    pub aperture: f32,
    /// Denominator of 1/x seconds.
    pub shutter_speed: f32,
    /// Centimetres.
    pub height: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            focal_length: 50.0,
            aperture: 5.6,
            shutter_speed: 125.0,
            height: 15.0,
            pitch: 0.0,
            roll: 0.0,
        }
    }
}

fn parse_slider(field: &str, value: &str) -> Result<f32, String> {
    value
        .trim()
        .replace('−', "-")
        .parse::<f32>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| format!("Invalid number for {field}: '{}'", value.trim()))
}

impl CameraSettings {
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        let number = parse_slider(field, value)?;
        match field.trim().to_lowercase().as_str() {
            "focal" | "focallength" | "focal_length" => self.focal_length = number,
            "aperture" | "f" => self.aperture = number,
            "shutter" | "shutterspeed" | "shutter_speed" => self.shutter_speed = number,
            "height" => self.height = number,
            "pitch" => self.pitch = number,
            "roll" => self.roll = number,
            other => return Err(format!("Unknown camera field '{other}'")),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingSettings {
    /// Kelvin.
    pub temperature: f32,
    /// Percent.
    pub intensity: f32,
    /// Percent, 0 is soft and 100 is hard.
    pub hardness: f32,
}

impl Default for LightingSettings {
    fn default() -> Self {
        LightingSettings {
            temperature: 5500.0,
            intensity: 80.0,
            hardness: 25.0,
        }
    }
}

impl LightingSettings {
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        let number = parse_slider(field, value)?;
        match field.trim().to_lowercase().as_str() {
            "temp" | "temperature" => self.temperature = number,
            "intensity" => self.intensity = number.clamp(0.0, 100.0),
            "hardness" => self.hardness = number.clamp(0.0, 100.0),
            other => return Err(format!("Unknown lighting field '{other}'")),
        }
        Ok(())
    }
}

/// Camera sliders as stored or suggested. Absent fields leave the current
/// slider alone when merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutter_speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll: Option<f32>,
}

impl From<CameraSettings> for CameraDetails {
    fn from(camera: CameraSettings) -> Self {
        CameraDetails {
            focal_length: Some(camera.focal_length),
            aperture: Some(camera.aperture),
            shutter_speed: Some(camera.shutter_speed),
            height: Some(camera.height),
            pitch: Some(camera.pitch),
            roll: Some(camera.roll),
        }
    }
}

impl CameraDetails {
    pub fn merged_into(&self, mut camera: CameraSettings) -> CameraSettings {
        camera.focal_length = self.focal_length.unwrap_or(camera.focal_length);
        camera.aperture = self.aperture.unwrap_or(camera.aperture);
        camera.shutter_speed = self.shutter_speed.unwrap_or(camera.shutter_speed);
        camera.height = self.height.unwrap_or(camera.height);
        camera.pitch = self.pitch.unwrap_or(camera.pitch);
        camera.roll = self.roll.unwrap_or(camera.roll);
        camera
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardness: Option<f32>,
}

impl From<LightingSettings> for LightingDetails {
    fn from(lighting: LightingSettings) -> Self {
        LightingDetails {
            temperature: Some(lighting.temperature),
            intensity: Some(lighting.intensity),
            hardness: Some(lighting.hardness),
        }
    }
}

impl LightingDetails {
    pub fn merged_into(&self, mut lighting: LightingSettings) -> LightingSettings {
        lighting.temperature = self.temperature.unwrap_or(lighting.temperature);
        lighting.intensity = self
            .intensity
            .map(|value| value.clamp(0.0, 100.0))
            .unwrap_or(lighting.intensity);
        lighting.hardness = self
            .hardness
            .map(|value| value.clamp(0.0, 100.0))
            .unwrap_or(lighting.hardness);
        lighting
    }
}

/// Flattened record of every category choice plus the detail sliders.
///
/// Category fields are optional because suggestion payloads may only fill
/// some of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChosenSettings {
    #[serde(rename = "Camera", default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(rename = "cameraDetails", default, skip_serializing_if = "Option::is_none")]
    pub camera_details: Option<CameraDetails>,
    #[serde(rename = "Lighting", default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<String>,
    #[serde(rename = "lightingDetails", default, skip_serializing_if = "Option::is_none")]
    pub lighting_details: Option<LightingDetails>,
    #[serde(rename = "Mockup", default, skip_serializing_if = "Option::is_none")]
    pub mockup: Option<String>,
    #[serde(rename = "Manipulation", default, skip_serializing_if = "Option::is_none")]
    pub manipulation: Option<String>,
    #[serde(rename = "Product Retouch", default, skip_serializing_if = "Option::is_none")]
    pub product_retouch: Option<String>,
    #[serde(rename = "People Retouch", default, skip_serializing_if = "Option::is_none")]
    pub people_retouch: Option<String>,
}

impl ChosenSettings {
    /// Camera sliders with absent fields taken from the defaults.
    pub fn camera_settings(&self) -> Option<CameraSettings> {
        self.camera_details
            .map(|details| details.merged_into(CameraSettings::default()))
    }

    pub fn lighting_settings(&self) -> Option<LightingSettings> {
        self.lighting_details
            .map(|details| details.merged_into(LightingSettings::default()))
    }

    pub fn get(&self, category: Category) -> Option<&str> {
        let value = match category {
            Category::Camera => &self.camera,
            Category::Lighting => &self.lighting,
            Category::Mockup => &self.mockup,
            Category::Manipulation => &self.manipulation,
            Category::ProductRetouch => &self.product_retouch,
            Category::PeopleRetouch => &self.people_retouch,
        };
        value.as_deref()
    }

    fn slot(&mut self, category: Category) -> &mut Option<String> {
        match category {
            Category::Camera => &mut self.camera,
            Category::Lighting => &mut self.lighting,
            Category::Mockup => &mut self.mockup,
            Category::Manipulation => &mut self.manipulation,
            Category::ProductRetouch => &mut self.product_retouch,
            Category::PeopleRetouch => &mut self.people_retouch,
        }
    }

    /// Value of a category with absent or "none" entries normalised away.
    pub fn active(&self, category: Category) -> Option<&str> {
        self.get(category)
            .map(str::trim)
            .filter(|value| !value.is_empty() && !is_none_name(value))
    }
}

pub fn is_none_name(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    lowered == "none" || lowered.starts_with("none (")
}

/// Per-category preset choices.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetSelections {
    camera: Vec<&'static Preset>,
    lighting: Vec<&'static Preset>,
    mockup: Vec<&'static Preset>,
    manipulation: Vec<&'static Preset>,
    product_retouch: Vec<&'static Preset>,
    people_retouch: Vec<&'static Preset>,
}

impl Default for PresetSelections {
    fn default() -> Self {
        PresetSelections {
            camera: vec![none_preset(Category::Camera)],
            lighting: vec![none_preset(Category::Lighting)],
            mockup: vec![none_preset(Category::Mockup)],
            manipulation: vec![none_preset(Category::Manipulation)],
            product_retouch: vec![none_preset(Category::ProductRetouch)],
            people_retouch: vec![none_preset(Category::PeopleRetouch)],
        }
    }
}

impl PresetSelections {
    pub fn get(&self, category: Category) -> &[&'static Preset] {
        match category {
            Category::Camera => &self.camera,
            Category::Lighting => &self.lighting,
            Category::Mockup => &self.mockup,
            Category::Manipulation => &self.manipulation,
            Category::ProductRetouch => &self.product_retouch,
            Category::PeopleRetouch => &self.people_retouch,
        }
    }

    fn slot(&mut self, category: Category) -> &mut Vec<&'static Preset> {
        match category {
            Category::Camera => &mut self.camera,
            Category::Lighting => &mut self.lighting,
            Category::Mockup => &mut self.mockup,
            Category::Manipulation => &mut self.manipulation,
            Category::ProductRetouch => &mut self.product_retouch,
            Category::PeopleRetouch => &mut self.people_retouch,
        }
    }

    pub fn apply(&mut self, category: Category, preset: &'static Preset) {
        let next = select(
            preset,
            self.get(category),
            catalog(category),
            category.is_single_select(),
        );
        *self.slot(category) = next;
    }

    pub fn primary(&self, category: Category) -> &'static Preset {
        self.get(category)
            .first()
            .copied()
            .unwrap_or_else(|| none_preset(category))
    }

    pub fn value(&self, category: Category) -> String {
        if category.is_single_select() {
            self.primary(category).name.to_string()
        } else {
            joined_names(self.get(category))
        }
    }

    pub fn to_chosen_settings(
        &self,
        camera: CameraSettings,
        lighting: LightingSettings,
    ) -> ChosenSettings {
        let mut settings = ChosenSettings {
            camera_details: Some(camera.into()),
            lighting_details: Some(lighting.into()),
            ..ChosenSettings::default()
        };
        for category in Category::ALL {
            *settings.slot(category) = Some(self.value(category));
        }
        settings
    }

    /// Re-derives selections from stored names. Unknown or missing names
    /// fall back to the category sentinel.
    pub fn from_chosen_settings(settings: &ChosenSettings) -> PresetSelections {
        let mut selections = PresetSelections::default();
        for category in Category::ALL {
            *selections.slot(category) = restore_category(category, settings.get(category));
        }
        selections
    }
}

fn restore_category(category: Category, value: Option<&str>) -> Vec<&'static Preset> {
    let fallback = vec![none_preset(category)];
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return fallback;
    };
    if value.eq_ignore_ascii_case("none") {
        return fallback;
    }

    let names: Vec<&str> = if category.is_single_select() {
        vec![value]
    } else {
        value.split(',').map(str::trim).collect()
    };

    let mut presets: Vec<&'static Preset> = Vec::new();
    for name in names {
        if let Some(preset) = find_by_name(category, name) {
            if !presets.iter().any(|existing| existing.id == preset.id) {
                presets.push(preset);
            }
        }
    }

    if presets.is_empty() {
        return fallback;
    }
    if presets.len() > 1 {
        presets.retain(|preset| !preset.is_none());
    }
    presets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::catalog::find_by_id;

    fn preset(category: Category, id: &str) -> &'static Preset {
        find_by_id(category, id).unwrap()
    }

    #[test]
    fn hero_camera_with_two_daylight_presets() {
        let mut selections = PresetSelections::default();
        selections.apply(Category::Camera, preset(Category::Camera, "hero-45"));
        selections.apply(Category::Lighting, preset(Category::Lighting, "day-01"));
        selections.apply(Category::Lighting, preset(Category::Lighting, "day-02"));

        let settings =
            selections.to_chosen_settings(CameraSettings::default(), LightingSettings::default());
        assert_eq!(settings.camera.as_deref(), Some("45° Hero"));
        assert_eq!(
            settings.lighting.as_deref(),
            Some("Day-01: Window Soft + Negative Fill, Day-02: Golden Back Rim")
        );
        assert_eq!(settings.manipulation.as_deref(), Some("None"));
        assert_eq!(settings.mockup.as_deref(), Some("None (Plain Backdrop)"));
    }

    #[test]
    fn round_trip_through_chosen_settings_restores_selections() {
        let mut selections = PresetSelections::default();
        selections.apply(Category::Camera, preset(Category::Camera, "dutch-tilt"));
        selections.apply(Category::Mockup, preset(Category::Mockup, "cafe"));
        selections.apply(Category::Manipulation, preset(Category::Manipulation, "liquid-fx"));
        selections.apply(Category::Manipulation, preset(Category::Manipulation, "tilt-shift"));
        selections.apply(Category::ProductRetouch, preset(Category::ProductRetouch, "polish"));
        selections.apply(Category::PeopleRetouch, preset(Category::PeopleRetouch, "eye-enhance"));

        let settings =
            selections.to_chosen_settings(CameraSettings::default(), LightingSettings::default());
        let restored = PresetSelections::from_chosen_settings(&settings);
        assert_eq!(restored, selections);
    }

    #[test]
    fn unknown_names_fall_back_to_sentinel() {
        let settings = ChosenSettings {
            camera: Some("Orbital Drone".to_string()),
            lighting: Some("Moonbeam, Starlight".to_string()),
            mockup: Some("NONE".to_string()),
            ..ChosenSettings::default()
        };
        let restored = PresetSelections::from_chosen_settings(&settings);
        for category in Category::ALL {
            assert_eq!(restored.get(category).len(), 1);
            assert!(restored.get(category)[0].is_none(), "{}", category.label());
        }
    }

    #[test]
    fn partially_known_multi_select_keeps_matches() {
        let settings = ChosenSettings {
            lighting: Some("Moonbeam, Night-02: Dark-Field Glass".to_string()),
            ..ChosenSettings::default()
        };
        let restored = PresetSelections::from_chosen_settings(&settings);
        let ids: Vec<_> = restored.get(Category::Lighting).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["night-02"]);
    }

    #[test]
    fn serialized_keys_match_category_labels() {
        let settings = PresetSelections::default()
            .to_chosen_settings(CameraSettings::default(), LightingSettings::default());
        let value = serde_json::to_value(&settings).unwrap();
        for category in Category::ALL {
            assert!(value.get(category.label()).is_some(), "{}", category.label());
        }
        assert_eq!(value["cameraDetails"]["focalLength"], 50.0);
        assert_eq!(value["lightingDetails"]["temperature"], 5500.0);
    }

    #[test]
    fn partial_suggestion_payload_deserializes() {
        let settings: ChosenSettings = serde_json::from_str(
            r#"{"Camera": "Levitation", "cameraDetails": {"focalLength": 35}}"#,
        )
        .unwrap();
        assert_eq!(settings.camera.as_deref(), Some("Levitation"));
        assert!(settings.lighting.is_none());
        let details = settings.camera_details.unwrap();
        assert_eq!(details.focal_length, Some(35.0));
        assert_eq!(details.aperture, None);
    }

    #[test]
    fn partial_details_merge_into_current_sliders() {
        let current = CameraSettings {
            aperture: 2.0,
            ..CameraSettings::default()
        };
        let details: CameraDetails = serde_json::from_str(r#"{"focalLength": 35}"#).unwrap();
        let merged = details.merged_into(current);
        assert_eq!(merged.focal_length, 35.0);
        assert_eq!(merged.aperture, 2.0);

        let lighting: LightingDetails =
            serde_json::from_str(r#"{"intensity": 140}"#).unwrap();
        let merged = lighting.merged_into(LightingSettings::default());
        assert_eq!(merged.intensity, 100.0);
        assert_eq!(merged.temperature, 5500.0);
    }

    #[test]
    fn none_names_are_recognised() {
        assert!(is_none_name("None"));
        assert!(is_none_name(" none "));
        assert!(is_none_name("None (Plain Backdrop)"));
        assert!(!is_none_name("Nonesuch"));
    }

    #[test]
    fn detail_fields_are_editable() {
        let mut camera = CameraSettings::default();
        camera.set_field("focal", "85").unwrap();
        camera.set_field("pitch", "−12").unwrap();
        assert_eq!(camera.focal_length, 85.0);
        assert_eq!(camera.pitch, -12.0);
        assert!(camera.set_field("zoom", "2").is_err());
        assert!(camera.set_field("roll", "abc").is_err());

        let mut lighting = LightingSettings::default();
        lighting.set_field("intensity", "140").unwrap();
        assert_eq!(lighting.intensity, 100.0);
        assert!(lighting.set_field("focal", "50").is_err());
    }
}
