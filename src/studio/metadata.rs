use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::studio::settings::{CameraSettings, LightingSettings};

// Ranges accept an en-dash or a hyphen; signs accept the Unicode minus.
static FOCAL_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*[–-]\s*(\d+)\s*mm").unwrap());
static FOCAL_SINGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*mm").unwrap());
static APERTURE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"aperture (\d+(?:\.\d+)?)\s*[–-]\s*(\d+(?:\.\d+)?)").unwrap());
static APERTURE_SINGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"aperture (\d+(?:\.\d+)?)").unwrap());
static SHUTTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"shutter (\d+)").unwrap());
static HEIGHT_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"height (\d+)\s*[–-]\s*(\d+)\s*cm").unwrap());
static HEIGHT_SINGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"height (\d+)\s*cm").unwrap());
static PITCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"pitch ([+\-−]?\d+)").unwrap());
static ROLL: Lazy<Regex> = Lazy::new(|| Regex::new(r"roll ([+\-−]?\d+)").unwrap());
static TEMPERATURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"temp (\d+)\s*K").unwrap());
static INTENSITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"intensity (\d+)\s*%").unwrap());
static HARDNESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"hardness (\d+)\s*%").unwrap());

fn number(captures: &Captures, index: usize) -> Option<f32> {
    let raw = captures.get(index)?.as_str().replace('−', "-");
    raw.parse::<f32>().ok()
}

fn midpoint(pattern: &Regex, text: &str) -> Option<f32> {
    let captures = pattern.captures(text)?;
    Some((number(&captures, 1)? + number(&captures, 2)?) / 2.0)
}

fn single(pattern: &Regex, text: &str) -> Option<f32> {
    let captures = pattern.captures(text)?;
    number(&captures, 1)
}

/// Fills camera sliders from a preset's metadata string.
///
/// Ranges resolve to their midpoint and take precedence over single values.
/// Fields with no matching pattern keep the value from `base`.
pub fn parse_camera_metadata(metadata: &str, base: CameraSettings) -> CameraSettings {
    let mut settings = base;
    if metadata.contains("eye-level") {
        settings.height = 15.0;
    }

    if let Some(value) = midpoint(&FOCAL_RANGE, metadata).or_else(|| single(&FOCAL_SINGLE, metadata)) {
        settings.focal_length = value;
    }
    if let Some(value) =
        midpoint(&APERTURE_RANGE, metadata).or_else(|| single(&APERTURE_SINGLE, metadata))
    {
        settings.aperture = value;
    }
    if let Some(value) = single(&SHUTTER, metadata) {
        settings.shutter_speed = value;
    }
    if let Some(value) = midpoint(&HEIGHT_RANGE, metadata).or_else(|| single(&HEIGHT_SINGLE, metadata)) {
        settings.height = value;
    }
    if let Some(value) = single(&PITCH, metadata) {
        settings.pitch = value;
    }
    if let Some(value) = single(&ROLL, metadata) {
        settings.roll = value;
    }
    settings
}

pub fn parse_lighting_metadata(metadata: &str, base: LightingSettings) -> LightingSettings {
    let mut settings = base;
    if let Some(value) = single(&TEMPERATURE, metadata) {
        settings.temperature = value;
    }
    if let Some(value) = single(&INTENSITY, metadata) {
        settings.intensity = value;
    }
    if let Some(value) = single(&HARDNESS, metadata) {
        settings.hardness = value;
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focal_range_resolves_to_midpoint() {
        let settings = parse_camera_metadata("35–50mm lens", CameraSettings::default());
        assert_eq!(settings.focal_length, 42.5);
    }

    #[test]
    fn single_focal_length_is_taken_verbatim() {
        let settings = parse_camera_metadata("50mm", CameraSettings::default());
        assert_eq!(settings.focal_length, 50.0);
        let settings = parse_camera_metadata("35mm lens, shutter 250", CameraSettings::default());
        assert_eq!(settings.focal_length, 35.0);
        assert_eq!(settings.shutter_speed, 250.0);
    }

    #[test]
    fn hero_preset_fills_every_numeric_field() {
        let settings = parse_camera_metadata(
            "35–50mm lens, pitch −5°, camera height 20–40cm, aperture 4.0-8.0",
            CameraSettings::default(),
        );
        assert_eq!(settings.focal_length, 42.5);
        assert_eq!(settings.pitch, -5.0);
        assert_eq!(settings.height, 30.0);
        assert_eq!(settings.aperture, 6.0);
    }

    #[test]
    fn signed_angles_are_parsed() {
        let settings = parse_camera_metadata("14–24mm lens, pitch +35°", CameraSettings::default());
        assert_eq!(settings.pitch, 35.0);
        let settings = parse_camera_metadata("35mm lens, roll 10°", CameraSettings::default());
        assert_eq!(settings.roll, 10.0);
        let settings = parse_camera_metadata("Top-down, pitch -90", CameraSettings::default());
        assert_eq!(settings.pitch, -90.0);
    }

    #[test]
    fn eye_level_pins_height() {
        let base = CameraSettings {
            height: 90.0,
            ..CameraSettings::default()
        };
        let settings = parse_camera_metadata("50–85mm lens, eye-level", base);
        assert_eq!(settings.height, 15.0);
        assert_eq!(settings.focal_length, 67.5);
    }

    #[test]
    fn unmatched_fields_keep_prior_values() {
        let base = CameraSettings {
            focal_length: 70.0,
            aperture: 2.0,
            shutter_speed: 60.0,
            height: 44.0,
            pitch: 3.0,
            roll: -2.0,
        };
        assert_eq!(parse_camera_metadata("soft mood, no numbers", base), base);
        assert_eq!(parse_camera_metadata("", base), base);
    }

    #[test]
    fn lighting_metadata_fills_all_fields() {
        let settings = parse_lighting_metadata(
            "temp 5400K, intensity 70%, hardness 10%",
            LightingSettings::default(),
        );
        assert_eq!(
            settings,
            LightingSettings {
                temperature: 5400.0,
                intensity: 70.0,
                hardness: 10.0
            }
        );
    }

    #[test]
    fn lighting_partial_metadata_keeps_other_fields() {
        let settings = parse_lighting_metadata("intensity 100%", LightingSettings::default());
        assert_eq!(settings.intensity, 100.0);
        assert_eq!(settings.temperature, LightingSettings::default().temperature);
        assert_eq!(settings.hardness, LightingSettings::default().hardness);
    }
}
