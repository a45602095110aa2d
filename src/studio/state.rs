//! The whole application state and every mutation a session command can make.

use chrono::Utc;
use serde::Serialize;

use crate::llm::media::{GeneratedImage, ImageFile};
use crate::llm::studio_api::SuggestionConcept;
use crate::presets::catalog::find_shot;
use crate::presets::portrait::{AiAnalysisReport, AiProfile, PortraitRetouchSettings};
use crate::presets::types::{Category, DirectorShot, ExportSettings, Preset, UpscaleTarget};
use crate::studio::history::{history_id, History, HistoryItem};
use crate::studio::metadata::{parse_camera_metadata, parse_lighting_metadata};
use crate::studio::settings::{CameraSettings, ChosenSettings, LightingSettings, PresetSelections};

/// Label used for the single shot run from the custom prompt alone.
pub const MAGIC_SHOT_LABEL: &str = "Magic Shot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Studio,
    Generate,
    Portrait,
    Director,
}

impl Mode {
    pub fn parse(value: &str) -> Option<Mode> {
        match value.trim().to_lowercase().as_str() {
            "studio" => Some(Mode::Studio),
            "generate" | "generation" => Some(Mode::Generate),
            "portrait" => Some(Mode::Portrait),
            "director" => Some(Mode::Director),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Studio => "studio",
            Mode::Generate => "generate",
            Mode::Portrait => "portrait",
            Mode::Director => "director",
        }
    }
}

/// Remote actions guarded by the in-progress flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Studio,
    Generate,
    Suggestions,
    CameraSuggestions,
    Analysis,
    Retouch,
    Upscale,
    Director,
}

impl Action {
    /// Context string used in user-facing failure messages.
    pub fn context(self) -> &'static str {
        match self {
            Action::Studio => "generation",
            Action::Generate => "image generation",
            Action::Suggestions => "creative suggestion generation",
            Action::CameraSuggestions => "camera angle suggestion generation",
            Action::Analysis => "portrait subject analysis",
            Action::Retouch => "retouching",
            Action::Upscale => "upscaling",
            Action::Director => "director shot generation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Another {0} is still in progress.")]
    Busy(&'static str),
    #[error("You are offline. Run `online` to re-enable remote actions.")]
    Offline,
    #[error("Load a product image first.")]
    MissingProduct,
    #[error("Load a portrait image first.")]
    MissingPortrait,
    #[error("Enter a prompt first.")]
    EmptyPrompt,
    #[error("There is no studio result to upscale.")]
    NothingToUpscale,
    #[error("Select at least one shot or enter a creative direction.")]
    NoShots,
    #[error("Unknown shot '{0}'.")]
    UnknownShot(String),
    #[error("No history item #{0}.")]
    UnknownHistoryItem(usize),
    #[error("No suggestion #{0}.")]
    UnknownSuggestion(usize),
    #[error("No director result '{0}'.")]
    UnknownDirectorResult(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectorResult {
    pub id: String,
    pub shot_label: String,
    pub image: GeneratedImage,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortraitState {
    pub image: Option<ImageFile>,
    pub prompt: String,
    pub profile: AiProfile,
    pub settings: PortraitRetouchSettings,
    pub analysis: Option<AiAnalysisReport>,
    pub result: Option<GeneratedImage>,
}

/// Inputs captured when a studio generation starts.
#[derive(Debug, Clone)]
pub struct StudioRequest {
    pub product: ImageFile,
    pub reference: Option<ImageFile>,
    pub prompt: String,
    pub settings: ChosenSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub export: ExportSettings,
}

#[derive(Debug, Clone)]
pub struct RetouchRequest {
    pub image: ImageFile,
    pub profile: AiProfile,
    pub settings: PortraitRetouchSettings,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct DirectorRequest {
    pub product: ImageFile,
    pub reference: Option<ImageFile>,
    pub settings: ChosenSettings,
    pub export: ExportSettings,
    /// `(shot label, creative direction for that shot)`.
    pub shots: Vec<(String, String)>,
}

/// What the caller should do after a preset selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectOutcome {
    /// Camera reset to none with a product and prompt present.
    pub wants_camera_suggestions: bool,
}

#[derive(Debug, Clone)]
pub struct StudioState {
    pub mode: Mode,

    pub product_image: Option<ImageFile>,
    pub reference_image: Option<ImageFile>,
    pub custom_prompt: String,
    pub selections: PresetSelections,
    pub camera: CameraSettings,
    pub lighting: LightingSettings,
    pub studio_result: Option<GeneratedImage>,
    pub suggestions: Vec<SuggestionConcept>,
    pub camera_suggestions: Vec<&'static Preset>,

    pub generation_prompt: String,
    pub negative_prompt: String,
    pub generation_results: Vec<GeneratedImage>,

    pub portrait: PortraitState,

    pub director_shots: Vec<&'static DirectorShot>,
    pub director_results: Vec<DirectorResult>,
    /// Next director result number; never reused.
    next_director_result: u64,

    pub export: ExportSettings,
    pub history: History,
    pub online: bool,
    in_progress: Option<Action>,
    epoch: u64,
}

impl Default for StudioState {
    fn default() -> Self {
        StudioState {
            mode: Mode::Studio,
            product_image: None,
            reference_image: None,
            custom_prompt: String::new(),
            selections: PresetSelections::default(),
            camera: CameraSettings::default(),
            lighting: LightingSettings::default(),
            studio_result: None,
            suggestions: Vec::new(),
            camera_suggestions: Vec::new(),
            generation_prompt: String::new(),
            negative_prompt: String::new(),
            generation_results: Vec::new(),
            portrait: PortraitState::default(),
            director_shots: Vec::new(),
            director_results: Vec::new(),
            next_director_result: 1,
            export: ExportSettings::default(),
            history: History::default(),
            online: true,
            in_progress: None,
            epoch: 0,
        }
    }
}

impl StudioState {
    pub fn transition(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Back to a fresh studio session. History and connectivity survive, and
    /// results of calls still in flight are discarded when they arrive.
    pub fn reset(&mut self) {
        let history = std::mem::take(&mut self.history);
        let online = self.online;
        let epoch = self.epoch + 1;
        *self = StudioState {
            history,
            online,
            epoch,
            ..StudioState::default()
        };
    }

    fn reset_studio_controls(&mut self) {
        self.selections = PresetSelections::default();
        self.camera = CameraSettings::default();
        self.lighting = LightingSettings::default();
    }

    fn clear_studio_inputs(&mut self) {
        self.product_image = None;
        self.reference_image = None;
        self.custom_prompt.clear();
    }

    pub fn in_progress(&self) -> Option<Action> {
        self.in_progress
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True when a finished call still belongs to this session state.
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Claims the in-progress slot. Returns the epoch the result must carry.
    pub fn begin(&mut self, action: Action) -> Result<u64, ActionError> {
        if let Some(running) = self.in_progress {
            return Err(ActionError::Busy(running.context()));
        }
        if !self.online {
            return Err(ActionError::Offline);
        }
        self.in_progress = Some(action);
        Ok(self.epoch)
    }

    pub fn finish(&mut self, epoch: u64) {
        if self.is_current(epoch) {
            self.in_progress = None;
        }
    }

    pub fn set_product_image(&mut self, image: ImageFile) {
        self.product_image = Some(image);
        self.suggestions.clear();
        self.camera_suggestions.clear();
    }

    pub fn set_reference_image(&mut self, image: Option<ImageFile>) {
        self.reference_image = image;
    }

    pub fn set_custom_prompt(&mut self, prompt: &str) {
        self.custom_prompt = prompt.trim().to_string();
    }

    /// Applies one preset click and keeps the detail sliders in step with it.
    pub fn select_preset(&mut self, category: Category, preset: &'static Preset) -> SelectOutcome {
        self.selections.apply(category, preset);
        let mut outcome = SelectOutcome::default();

        match category {
            Category::Camera => {
                if preset.is_none() {
                    self.camera = CameraSettings::default();
                    outcome.wants_camera_suggestions =
                        self.product_image.is_some() && !self.custom_prompt.trim().is_empty();
                } else {
                    self.camera = parse_camera_metadata(preset.metadata, CameraSettings::default());
                    self.camera_suggestions.clear();
                }
            }
            Category::Lighting => {
                self.lighting = if preset.is_none() {
                    LightingSettings::default()
                } else {
                    parse_lighting_metadata(preset.metadata, LightingSettings::default())
                };
            }
            _ => {}
        }
        outcome
    }

    pub fn chosen_settings(&self) -> ChosenSettings {
        self.selections.to_chosen_settings(self.camera, self.lighting)
    }

    /// Re-derives selections from stored settings and merges any detail
    /// sliders they carry into the current ones.
    pub fn update_controls_from_settings(&mut self, settings: &ChosenSettings) {
        self.selections = PresetSelections::from_chosen_settings(settings);
        if let Some(camera) = settings.camera_details {
            self.camera = camera.merged_into(self.camera);
        }
        if let Some(lighting) = settings.lighting_details {
            self.lighting = lighting.merged_into(self.lighting);
        }
    }

    /// Camera preset text handed to the suggestions call, if any.
    pub fn camera_constraint(&self) -> Option<&'static str> {
        let camera = self.selections.primary(Category::Camera);
        (!camera.is_none()).then_some(camera.name)
    }

    pub fn studio_request(&self) -> Result<StudioRequest, ActionError> {
        let product = self.product_image.clone().ok_or(ActionError::MissingProduct)?;
        if self.custom_prompt.trim().is_empty() {
            return Err(ActionError::EmptyPrompt);
        }
        Ok(StudioRequest {
            product,
            reference: self.reference_image.clone(),
            prompt: self.custom_prompt.clone(),
            settings: self.chosen_settings(),
            export: self.export,
        })
    }

    pub fn record_studio_result(&mut self, request: StudioRequest, image: GeneratedImage) {
        self.studio_result = Some(image.clone());
        self.generation_results.clear();
        self.generation_prompt.clear();
        self.negative_prompt.clear();
        self.history.append(HistoryItem {
            id: history_id(Utc::now()),
            generated: vec![image],
            source: Some(request.product),
            reference_image: request.reference,
            prompt: request.prompt,
            negative_prompt: None,
            chosen_settings: Some(request.settings),
            export_settings: Some(request.export),
        });
    }

    pub fn generation_request(&self) -> Result<GenerationRequest, ActionError> {
        if self.generation_prompt.trim().is_empty() {
            return Err(ActionError::EmptyPrompt);
        }
        Ok(GenerationRequest {
            prompt: self.generation_prompt.clone(),
            negative_prompt: self.negative_prompt.clone(),
            export: self.export,
        })
    }

    pub fn record_generation(&mut self, request: GenerationRequest, images: Vec<GeneratedImage>) {
        self.studio_result = None;
        self.clear_studio_inputs();
        self.generation_results = images.clone();
        self.history.append(HistoryItem {
            id: history_id(Utc::now()),
            generated: images,
            source: None,
            reference_image: None,
            prompt: request.prompt,
            negative_prompt: Some(request.negative_prompt),
            chosen_settings: None,
            export_settings: Some(request.export),
        });
    }

    pub fn upscale_source(&self) -> Result<GeneratedImage, ActionError> {
        self.studio_result.clone().ok_or(ActionError::NothingToUpscale)
    }

    pub fn record_upscale(&mut self, target: UpscaleTarget, image: GeneratedImage) {
        self.studio_result = Some(image.clone());
        self.history.append(HistoryItem {
            id: format!("{}-upscaled", history_id(Utc::now())),
            generated: vec![image],
            source: self.product_image.clone(),
            reference_image: self.reference_image.clone(),
            prompt: format!("Upscaled to {}", target.label()),
            negative_prompt: None,
            chosen_settings: None,
            export_settings: Some(self.export),
        });
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<SuggestionConcept>) {
        self.suggestions = suggestions;
    }

    /// Adopts a suggestion's prompt and settings. `index` is 1-based.
    pub fn apply_suggestion(&mut self, index: usize) -> Result<(), ActionError> {
        let suggestion = index
            .checked_sub(1)
            .and_then(|position| self.suggestions.get(position))
            .cloned()
            .ok_or(ActionError::UnknownSuggestion(index))?;
        self.custom_prompt = suggestion.prompt_text;
        self.update_controls_from_settings(&suggestion.settings_json);
        Ok(())
    }

    pub fn set_camera_suggestions(&mut self, presets: Vec<&'static Preset>) {
        self.camera_suggestions = presets;
    }

    /// Restores the item at `index` (0 = newest).
    pub fn load_from_history(&mut self, index: usize) -> Result<(), ActionError> {
        let item = self
            .history
            .get(index)
            .cloned()
            .ok_or(ActionError::UnknownHistoryItem(index))?;
        self.export = item.export_settings.unwrap_or_default();

        if let Some(source) = item.source {
            self.mode = Mode::Studio;
            self.studio_result = item.generated.into_iter().next();
            self.generation_results.clear();
            self.product_image = Some(source);
            self.reference_image = item.reference_image;
            self.custom_prompt = item.prompt;
            match item.chosen_settings.as_ref() {
                Some(settings) => self.update_controls_from_settings(settings),
                None => self.reset_studio_controls(),
            }
            self.generation_prompt.clear();
            self.negative_prompt.clear();
        } else {
            self.mode = Mode::Generate;
            self.generation_results = item.generated;
            self.studio_result = None;
            self.generation_prompt = item.prompt;
            self.negative_prompt = item.negative_prompt.unwrap_or_default();
            self.clear_studio_inputs();
            self.reset_studio_controls();
        }
        Ok(())
    }

    /// A new portrait clears everything derived from the previous one.
    pub fn set_portrait_image(&mut self, image: ImageFile) {
        self.portrait = PortraitState {
            image: Some(image),
            ..PortraitState::default()
        };
    }

    /// Stores the analysis and, for profiles the analysis may pick on its
    /// own, switches to that profile and returns it for an automatic retouch.
    pub fn apply_analysis(&mut self, report: AiAnalysisReport) -> Option<AiProfile> {
        let profile = AiProfile::from_detected(report.profile);
        self.portrait.analysis = Some(report);
        self.portrait.profile = profile;
        if profile == AiProfile::Off {
            return None;
        }
        self.portrait.settings = PortraitRetouchSettings::defaults_for(profile);
        Some(profile)
    }

    pub fn apply_analysis_failure(&mut self) {
        self.portrait.analysis = Some(AiAnalysisReport::failed());
    }

    pub fn set_portrait_profile(&mut self, profile: AiProfile) {
        self.portrait.profile = profile;
        self.portrait.settings = PortraitRetouchSettings::defaults_for(profile);
        if profile == AiProfile::Off {
            self.portrait.result = None;
        }
    }

    pub fn retouch_request(&self) -> Result<RetouchRequest, ActionError> {
        let image = self.portrait.image.clone().ok_or(ActionError::MissingPortrait)?;
        Ok(RetouchRequest {
            image,
            profile: self.portrait.profile,
            settings: self.portrait.settings.clone(),
            prompt: self.portrait.prompt.clone(),
        })
    }

    pub fn record_retouch(&mut self, image: GeneratedImage) {
        self.portrait.result = Some(image);
    }

    /// Toggles a director shot; returns whether it is now selected.
    pub fn toggle_shot(&mut self, id: &str) -> Result<bool, ActionError> {
        let shot = find_shot(id).ok_or_else(|| ActionError::UnknownShot(id.trim().to_string()))?;
        if let Some(position) = self.director_shots.iter().position(|s| s.id == shot.id) {
            self.director_shots.remove(position);
            Ok(false)
        } else {
            self.director_shots.push(shot);
            Ok(true)
        }
    }

    /// Selected shots, or the prompt alone as a single shot.
    pub fn active_shot_count(&self) -> usize {
        if !self.director_shots.is_empty() {
            self.director_shots.len()
        } else if !self.custom_prompt.trim().is_empty() {
            1
        } else {
            0
        }
    }

    pub fn director_request(&self) -> Result<DirectorRequest, ActionError> {
        let product = self.product_image.clone().ok_or(ActionError::MissingProduct)?;
        if self.active_shot_count() == 0 {
            return Err(ActionError::NoShots);
        }
        let base = self.custom_prompt.trim();
        let shots = if self.director_shots.is_empty() {
            vec![(MAGIC_SHOT_LABEL.to_string(), base.to_string())]
        } else {
            self.director_shots
                .iter()
                .map(|shot| {
                    let direction = if base.is_empty() {
                        shot.label.to_string()
                    } else {
                        format!("{base}, {}", shot.label)
                    };
                    (shot.label.to_string(), direction)
                })
                .collect()
        };
        Ok(DirectorRequest {
            product,
            reference: self.reference_image.clone(),
            settings: self.chosen_settings(),
            export: self.export,
            shots,
        })
    }

    pub fn record_director_result(&mut self, shot_label: String, image: GeneratedImage) -> String {
        let id = format!("{}-{}", history_id(Utc::now()), self.next_director_result);
        self.next_director_result += 1;
        self.director_results.push(DirectorResult {
            id: id.clone(),
            shot_label,
            image,
        });
        id
    }

    pub fn director_result(&self, id: &str) -> Result<&DirectorResult, ActionError> {
        self.director_results
            .iter()
            .find(|result| result.id == id)
            .ok_or_else(|| ActionError::UnknownDirectorResult(id.to_string()))
    }

    pub fn delete_director_result(&mut self, id: &str) -> Result<(), ActionError> {
        let before = self.director_results.len();
        self.director_results.retain(|result| result.id != id);
        if self.director_results.len() == before {
            return Err(ActionError::UnknownDirectorResult(id.to_string()));
        }
        Ok(())
    }

    pub fn replace_director_image(&mut self, id: &str, image: GeneratedImage) -> Result<(), ActionError> {
        let result = self
            .director_results
            .iter_mut()
            .find(|result| result.id == id)
            .ok_or_else(|| ActionError::UnknownDirectorResult(id.to_string()))?;
        result.image = image;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::media::tests::tiny_png;
    use crate::presets::catalog::{find_by_id, none_preset};
    use crate::presets::portrait::DetectedProfile;
    use crate::presets::types::AspectRatio;

    fn png_file() -> ImageFile {
        ImageFile::from_bytes(tiny_png(), None, None).unwrap()
    }

    fn png_result() -> GeneratedImage {
        GeneratedImage {
            bytes: tiny_png(),
            mime_type: "image/png".to_string(),
        }
    }

    fn preset(category: Category, id: &str) -> &'static Preset {
        find_by_id(category, id).unwrap()
    }

    fn studio_ready() -> StudioState {
        let mut state = StudioState::default();
        state.set_product_image(png_file());
        state.set_custom_prompt("perfume bottle on black glass");
        state
    }

    #[test]
    fn camera_selection_parses_metadata_and_none_resets() {
        let mut state = StudioState::default();
        state.select_preset(Category::Camera, preset(Category::Camera, "hero-45"));
        assert_eq!(state.camera.focal_length, 42.5);
        assert_eq!(state.camera.pitch, -5.0);

        let outcome = state.select_preset(Category::Camera, none_preset(Category::Camera));
        assert_eq!(state.camera, CameraSettings::default());
        assert!(!outcome.wants_camera_suggestions);
    }

    #[test]
    fn camera_none_with_product_and_prompt_wants_suggestions() {
        let mut state = studio_ready();
        let outcome = state.select_preset(Category::Camera, none_preset(Category::Camera));
        assert!(outcome.wants_camera_suggestions);
    }

    #[test]
    fn reset_restores_defaults_but_keeps_history() {
        let mut state = studio_ready();
        state.select_preset(Category::Camera, preset(Category::Camera, "hero-45"));
        state.export.aspect_ratio = AspectRatio::Landscape;
        state.transition(Mode::Portrait);
        let request = state.studio_request().unwrap();
        state.record_studio_result(request, png_result());
        let epoch = state.begin(Action::Upscale).unwrap();

        state.reset();

        assert_eq!(state.mode, Mode::Studio);
        assert!(state.product_image.is_none());
        assert!(state.custom_prompt.is_empty());
        assert!(state.studio_result.is_none());
        assert_eq!(state.camera, CameraSettings::default());
        assert_eq!(state.selections, PresetSelections::default());
        assert_eq!(state.export, ExportSettings::default());
        assert_eq!(state.history.len(), 1);
        assert!(state.in_progress().is_none());
        assert!(!state.is_current(epoch));
    }

    #[test]
    fn second_action_is_rejected_while_one_runs() {
        let mut state = studio_ready();
        let epoch = state.begin(Action::Studio).unwrap();
        assert_eq!(
            state.begin(Action::Generate),
            Err(ActionError::Busy("generation"))
        );
        state.set_custom_prompt("editing while busy is fine");
        state.finish(epoch);
        assert!(state.begin(Action::Generate).is_ok());
    }

    #[test]
    fn offline_blocks_remote_actions() {
        let mut state = studio_ready();
        state.online = false;
        assert_eq!(state.begin(Action::Studio), Err(ActionError::Offline));
    }

    #[test]
    fn studio_request_needs_product_and_prompt() {
        let mut state = StudioState::default();
        assert_eq!(state.studio_request().unwrap_err(), ActionError::MissingProduct);
        state.set_product_image(png_file());
        assert_eq!(state.studio_request().unwrap_err(), ActionError::EmptyPrompt);
    }

    #[test]
    fn history_round_trip_restores_studio_controls() {
        let mut state = studio_ready();
        state.select_preset(Category::Camera, preset(Category::Camera, "hero-45"));
        let day = crate::presets::catalog::LIGHTING_PRESETS
            .iter()
            .filter(|preset| !preset.is_none())
            .take(2)
            .collect::<Vec<_>>();
        state.select_preset(Category::Lighting, day[0]);
        state.select_preset(Category::Lighting, day[1]);
        let original = state.chosen_settings();
        let request = state.studio_request().unwrap();
        state.record_studio_result(request, png_result());

        state.reset();
        state.load_from_history(0).unwrap();

        assert_eq!(state.mode, Mode::Studio);
        assert_eq!(state.chosen_settings(), original);
        assert_eq!(state.custom_prompt, "perfume bottle on black glass");
        assert!(state.studio_result.is_some());
    }

    #[test]
    fn generation_items_load_into_generate_mode() {
        let mut state = studio_ready();
        state.generation_prompt = "a teapot in space".to_string();
        state.negative_prompt = "text".to_string();
        let request = state.generation_request().unwrap();
        state.record_generation(request, vec![png_result(), png_result()]);
        assert!(state.product_image.is_none());

        state.set_product_image(png_file());
        state.load_from_history(0).unwrap();
        assert_eq!(state.mode, Mode::Generate);
        assert_eq!(state.generation_results.len(), 2);
        assert_eq!(state.negative_prompt, "text");
        assert!(state.product_image.is_none());
        assert_eq!(state.export, ExportSettings::default());
        assert_eq!(state.load_from_history(5), Err(ActionError::UnknownHistoryItem(5)));
    }

    #[test]
    fn upscale_prepends_tagged_history_entry() {
        let mut state = studio_ready();
        assert_eq!(state.upscale_source(), Err(ActionError::NothingToUpscale));
        let request = state.studio_request().unwrap();
        state.record_studio_result(request, png_result());
        state.record_upscale(UpscaleTarget::FourK, png_result());
        let newest = state.history.get(0).unwrap();
        assert!(newest.id.ends_with("-upscaled"));
        assert_eq!(newest.prompt, "Upscaled to 4K");
        assert!(newest.source.is_some());
    }

    #[test]
    fn analysis_adopts_only_auto_profiles() {
        let mut state = StudioState::default();
        state.set_portrait_image(png_file());
        let mut report = AiAnalysisReport::failed();
        report.profile = DetectedProfile::Senior;
        assert_eq!(state.apply_analysis(report.clone()), Some(AiProfile::Senior));
        assert_eq!(
            state.portrait.settings,
            PortraitRetouchSettings::defaults_for(AiProfile::Senior)
        );

        report.profile = DetectedProfile::Group;
        state.set_portrait_image(png_file());
        assert_eq!(state.apply_analysis(report), None);
        assert_eq!(state.portrait.profile, AiProfile::Off);

        state.apply_analysis_failure();
        let analysis = state.portrait.analysis.as_ref().unwrap();
        assert_eq!(analysis.key_observations, vec!["AI analysis failed.".to_string()]);
    }

    #[test]
    fn director_shots_count_and_directions() {
        let mut state = studio_ready();
        assert_eq!(state.active_shot_count(), 1);
        let request = state.director_request().unwrap();
        assert_eq!(request.shots[0].0, MAGIC_SHOT_LABEL);

        assert!(state.toggle_shot("top-down").unwrap());
        assert!(state.toggle_shot("splash").unwrap());
        assert_eq!(state.active_shot_count(), 2);
        let request = state.director_request().unwrap();
        assert_eq!(
            request.shots[0].1,
            "perfume bottle on black glass, Top Down Shot"
        );
        assert!(!state.toggle_shot("splash").unwrap());
        assert!(state.toggle_shot("nope").is_err());

        state.set_custom_prompt("");
        state.director_shots.clear();
        assert_eq!(state.director_request().unwrap_err(), ActionError::NoShots);
    }

    #[test]
    fn director_results_can_be_replaced_and_deleted() {
        let mut state = StudioState::default();
        let id = state.record_director_result("Eye Level".to_string(), png_result());
        assert!(state.director_result(&id).is_ok());
        state.replace_director_image(&id, png_result()).unwrap();
        state.delete_director_result(&id).unwrap();
        assert!(state.delete_director_result(&id).is_err());
    }

    #[test]
    fn director_ids_are_not_reused_after_a_delete() {
        let mut state = StudioState::default();
        let first = state.record_director_result("Eye Level".to_string(), png_result());
        let second = state.record_director_result("Top Down".to_string(), png_result());
        state.delete_director_result(&first).unwrap();
        let third = state.record_director_result("Low Angle".to_string(), png_result());
        assert_ne!(third, second);
        assert_ne!(third, first);
        assert!(third.ends_with("-3"));
        assert_eq!(state.director_results.len(), 2);
    }

    #[test]
    fn suggestions_apply_prompt_and_settings() {
        let mut state = studio_ready();
        state.set_suggestions(vec![SuggestionConcept {
            concept_title: "Hero".to_string(),
            prompt_text: "45° Hero angle shot of the bottle".to_string(),
            settings_json: ChosenSettings {
                camera: Some("45° Hero".to_string()),
                lighting: Some("Not A Preset".to_string()),
                ..ChosenSettings::default()
            },
        }]);
        assert_eq!(state.apply_suggestion(2), Err(ActionError::UnknownSuggestion(2)));
        state.apply_suggestion(1).unwrap();
        assert_eq!(state.custom_prompt, "45° Hero angle shot of the bottle");
        assert_eq!(state.selections.primary(Category::Camera).id, "hero-45");
        assert!(state.selections.primary(Category::Lighting).is_none());
        assert_eq!(state.camera_constraint(), Some("45° Hero"));
    }

    #[test]
    fn partial_suggestion_details_keep_untouched_sliders() {
        let mut state = studio_ready();
        state.camera.aperture = 2.0;
        state.lighting.hardness = 60.0;
        let settings: ChosenSettings = serde_json::from_str(
            r#"{"Camera":"45° Hero","cameraDetails":{"focalLength":35},"lightingDetails":{"temperature":3200}}"#,
        )
        .unwrap();
        state.set_suggestions(vec![SuggestionConcept {
            concept_title: "Warm".to_string(),
            prompt_text: "Warm tungsten hero shot".to_string(),
            settings_json: settings,
        }]);
        state.apply_suggestion(1).unwrap();
        assert_eq!(state.camera.focal_length, 35.0);
        assert_eq!(state.camera.aperture, 2.0);
        assert_eq!(state.lighting.temperature, 3200.0);
        assert_eq!(state.lighting.hardness, 60.0);
    }
}
