use std::future::Future;
use std::path::Path;

use anyhow::{anyhow, Context};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::llm::media::{GeneratedImage, ImageFile};
use crate::llm::studio_api::{
    analyze_portrait_subject, generate_camera_suggestions, generate_creative_suggestions,
    generate_final_image, generate_with_imagen, retouch_portrait_image, upscale_image,
    SuggestionConcept,
};
use crate::llm::StudioError;
use crate::presets::catalog::{
    catalog, find_by_id, DIRECTOR_SHOTS, EXPORT_ASPECT_RATIOS, PROMPT_ENHANCER_KEYWORDS,
};
use crate::presets::portrait::AiAnalysisReport;
use crate::presets::types::{Category, Preset, ShotCategory, UpscaleTarget};
use crate::session::command::{Command, HELP_TEXT};
use crate::session::output::save_all;
use crate::state::AppState;
use crate::studio::state::{GenerationRequest, StudioRequest};
use crate::studio::{Action, ActionError, Mode, StudioState};
use crate::utils::logging::{read_recent_log_lines, LogStream};
use crate::utils::timing::ActionTimer;

const LIGHTING_FIELDS: [&str; 4] = ["temp", "temperature", "intensity", "hardness"];

/// What a finished remote call produced.
#[derive(Debug)]
pub enum JobOutcome {
    Studio {
        request: StudioRequest,
        result: Result<GeneratedImage, StudioError>,
    },
    Generation {
        request: GenerationRequest,
        result: Result<Vec<GeneratedImage>, StudioError>,
    },
    Suggestions(Result<Vec<SuggestionConcept>, StudioError>),
    CameraSuggestions(Result<Vec<&'static Preset>, StudioError>),
    Analysis(Result<AiAnalysisReport, StudioError>),
    Retouch(Result<GeneratedImage, StudioError>),
    Upscale {
        target: UpscaleTarget,
        director_id: Option<String>,
        result: Result<GeneratedImage, StudioError>,
    },
    /// One entry per shot, in request order.
    Director(Vec<(String, Result<GeneratedImage, StudioError>)>),
}

impl JobOutcome {
    fn status(&self) -> &'static str {
        let ok = match self {
            JobOutcome::Studio { result, .. } => result.is_ok(),
            JobOutcome::Generation { result, .. } => result.is_ok(),
            JobOutcome::Suggestions(result) => result.is_ok(),
            JobOutcome::CameraSuggestions(result) => result.is_ok(),
            JobOutcome::Analysis(result) => result.is_ok(),
            JobOutcome::Retouch(result) => result.is_ok(),
            JobOutcome::Upscale { result, .. } => result.is_ok(),
            JobOutcome::Director(shots) => shots.iter().any(|(_, result)| result.is_ok()),
        };
        if ok {
            "success"
        } else {
            "error"
        }
    }
}

#[derive(Debug)]
pub struct JobEvent {
    pub epoch: u64,
    pub action: Action,
    pub outcome: JobOutcome,
}

#[derive(Debug, PartialEq)]
pub enum Reply {
    Lines(Vec<String>),
    /// Stop reading input until nothing is in progress.
    Wait,
    Quit,
}

pub struct Session {
    state: AppState,
    events: UnboundedSender<JobEvent>,
}

impl Session {
    pub fn new(state: AppState) -> (Session, UnboundedReceiver<JobEvent>) {
        let (events, receiver) = unbounded_channel();
        (Session { state, events }, receiver)
    }

    pub fn is_busy(&self) -> bool {
        self.state.studio.lock().in_progress().is_some()
    }

    pub async fn handle_line(&self, line: &str) -> Reply {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Reply::Lines(Vec::new()),
            Err(message) => return Reply::Lines(vec![message]),
        };
        debug!("Session command: {:?}", command);

        match command {
            Command::Quit => Reply::Quit,
            Command::Wait => Reply::Wait,
            command => match self.execute(command).await {
                Ok(lines) => Reply::Lines(lines),
                Err(err) => Reply::Lines(vec![format!("{err:#}")]),
            },
        }
    }

    async fn execute(&self, command: Command) -> anyhow::Result<Vec<String>> {
        let lines = match command {
            Command::Quit | Command::Wait => Vec::new(),
            Command::Help => HELP_TEXT.lines().map(str::to_string).collect(),
            Command::Status => status_lines(&self.state.studio.lock()),
            Command::Online(online) => {
                self.state.studio.lock().online = online;
                let line = if online {
                    "Back online. Remote actions are enabled."
                } else {
                    "Offline. Remote actions are disabled until you run `online`."
                };
                vec![line.to_string()]
            }
            Command::Reset => {
                let mut studio = self.state.studio.lock();
                studio.reset();
                vec![format!(
                    "Studio reset. {} history item(s) kept.",
                    studio.history.len()
                )]
            }
            Command::Logs { stream, count } => log_lines(stream, count)?,
            Command::Mode(mode) => {
                self.state.studio.lock().transition(mode);
                vec![format!("Mode: {}", mode.as_str())]
            }
            Command::LoadProduct(path) => {
                let image = ImageFile::load(&path).await?;
                let line = loaded_line("Product image", &path, &image);
                self.state.studio.lock().set_product_image(image);
                vec![line]
            }
            Command::Reference(Some(path)) => {
                let image = ImageFile::load(&path).await?;
                let line = loaded_line("Style reference", &path, &image);
                self.state.studio.lock().set_reference_image(Some(image));
                vec![line]
            }
            Command::Reference(None) => {
                self.state.studio.lock().set_reference_image(None);
                vec!["Style reference cleared.".to_string()]
            }
            Command::Prompt(text) => {
                let mut studio = self.state.studio.lock();
                studio.set_custom_prompt(&text);
                let line = if studio.custom_prompt.is_empty() {
                    "Creative direction cleared."
                } else {
                    "Creative direction set."
                };
                vec![line.to_string()]
            }
            Command::Presets(Some(category)) => preset_lines(&self.state.studio.lock(), category),
            Command::Presets(None) => presets_listing(None),
            Command::Select { category, id } => self.select(category, &id)?,
            Command::Detail { field, value } => {
                let mut studio = self.state.studio.lock();
                let key = field.trim().to_lowercase();
                if LIGHTING_FIELDS.contains(&key.as_str()) {
                    studio.lighting.set_field(&key, &value).map_err(|err| anyhow!(err))?;
                } else {
                    studio.camera.set_field(&key, &value).map_err(|err| anyhow!(err))?;
                }
                detail_lines(&studio)
            }
            Command::Settings => settings_lines(&self.state.studio.lock()),
            Command::Ratio(ratio) => {
                self.state.studio.lock().export.aspect_ratio = ratio;
                vec![format!("Aspect ratio: {}", ratio.as_str())]
            }
            Command::Transparent(transparent) => {
                self.state.studio.lock().export.transparent = transparent;
                vec![format!(
                    "Transparent background: {}",
                    if transparent { "on" } else { "off" }
                )]
            }
            Command::Suggest => self.start_suggestions()?,
            Command::UseSuggestion(index) => {
                let mut studio = self.state.studio.lock();
                studio.apply_suggestion(index)?;
                let mut lines = vec![format!("Applied suggestion {index}.")];
                lines.extend(settings_lines(&studio));
                lines
            }
            Command::GenerationPrompt(text) => {
                self.state.studio.lock().generation_prompt = text.trim().to_string();
                vec!["Generation prompt set.".to_string()]
            }
            Command::NegativePrompt(text) => {
                self.state.studio.lock().negative_prompt = text.trim().to_string();
                vec!["Negative prompt set.".to_string()]
            }
            Command::Keywords => keyword_lines(),
            Command::Keyword(word) => {
                let mut studio = self.state.studio.lock();
                let word = word.trim();
                if studio.generation_prompt.trim().is_empty() {
                    studio.generation_prompt = word.to_string();
                } else {
                    studio.generation_prompt = format!("{}, {word}", studio.generation_prompt.trim());
                }
                vec![format!("Generation prompt: {}", studio.generation_prompt)]
            }
            Command::LoadPortrait(path) => self.load_portrait(&path).await?,
            Command::Profile(profile) => {
                self.state.studio.lock().set_portrait_profile(profile);
                vec![format!("Retouch profile: {}", profile.as_str())]
            }
            Command::Retouch { field, value } => {
                let mut studio = self.state.studio.lock();
                studio
                    .portrait
                    .settings
                    .set_field(&field, &value)
                    .map_err(|err| anyhow!(err))?;
                vec![format!("Retouch {} set to {}.", field.trim(), value.trim())]
            }
            Command::PortraitPrompt(text) => {
                self.state.studio.lock().portrait.prompt = text.trim().to_string();
                vec!["Portrait direction set.".to_string()]
            }
            Command::Shots => shot_lines(&self.state.studio.lock()),
            Command::ToggleShot(id) => {
                let mut studio = self.state.studio.lock();
                let selected = studio.toggle_shot(&id)?;
                vec![format!(
                    "{} '{}'. {} shot(s) active.",
                    if selected { "Selected" } else { "Deselected" },
                    id.trim(),
                    studio.active_shot_count()
                )]
            }
            Command::Results => result_lines(&self.state.studio.lock()),
            Command::DropResult(id) => {
                self.state.studio.lock().delete_director_result(id.trim())?;
                vec![format!("Deleted director result {}.", id.trim())]
            }
            Command::Generate => self.generate()?,
            Command::Upscale {
                target,
                director_id,
            } => self.start_upscale(target, director_id)?,
            Command::History => history_lines(&self.state.studio.lock()),
            Command::HistoryLoad(number) => {
                let mut studio = self.state.studio.lock();
                let index = number
                    .checked_sub(1)
                    .ok_or(ActionError::UnknownHistoryItem(number))?;
                studio
                    .load_from_history(index)
                    .map_err(|_| ActionError::UnknownHistoryItem(number))?;
                let mut lines = vec![format!("Loaded history item {number} into {} mode.", studio.mode.as_str())];
                lines.extend(status_lines(&studio));
                lines
            }
            Command::HistoryClear(kind) => {
                let removed = self.state.studio.lock().history.clear(kind);
                vec![format!("Removed {removed} history item(s).")]
            }
            Command::HistoryExport(path) => {
                let history = self.state.studio.lock().history.clone();
                let count = history
                    .export(&path)
                    .await
                    .context("History export failed")?;
                vec![format!("Exported {count} history item(s) to {}.", path.display())]
            }
        };
        Ok(lines)
    }

    fn spawn_job<F>(&self, epoch: u64, action: Action, detail: Option<String>, job: F)
    where
        F: Future<Output = JobOutcome> + Send + 'static,
    {
        let events = self.events.clone();
        tokio::spawn(async move {
            let mut timer = ActionTimer::start(action.context(), detail);
            let outcome = job.await;
            timer.complete(outcome.status());
            if events
                .send(JobEvent {
                    epoch,
                    action,
                    outcome,
                })
                .is_err()
            {
                warn!("Session closed before {} finished", action.context());
            }
        });
    }

    fn select(&self, category: Category, id: &str) -> anyhow::Result<Vec<String>> {
        let preset = find_by_id(category, id).ok_or_else(|| {
            anyhow!(
                "Unknown {} preset '{}'. Run `presets` to list the categories.",
                category.label(),
                id.trim()
            )
        })?;

        let mut studio = self.state.studio.lock();
        let outcome = studio.select_preset(category, preset);
        let mut lines = vec![format!(
            "{}: {}",
            category.label(),
            studio.selections.value(category)
        )];

        if outcome.wants_camera_suggestions {
            if let Some(product) = studio.product_image.clone() {
                let prompt = studio.custom_prompt.clone();
                match studio.begin(Action::CameraSuggestions) {
                    Ok(epoch) => {
                        self.spawn_job(epoch, Action::CameraSuggestions, None, async move {
                            JobOutcome::CameraSuggestions(
                                generate_camera_suggestions(&product, &prompt).await,
                            )
                        });
                        lines.push("Asking for camera angle suggestions...".to_string());
                    }
                    Err(err) => debug!("Skipping camera suggestions: {err}"),
                }
            }
        }
        Ok(lines)
    }

    fn start_suggestions(&self) -> anyhow::Result<Vec<String>> {
        let mut studio = self.state.studio.lock();
        let product = studio
            .product_image
            .clone()
            .ok_or(ActionError::MissingProduct)?;
        let reference = studio.reference_image.clone();
        let draft = studio.custom_prompt.clone();
        let constraint = studio.camera_constraint();
        let epoch = studio.begin(Action::Suggestions)?;

        self.spawn_job(epoch, Action::Suggestions, Some(draft.clone()), async move {
            JobOutcome::Suggestions(
                generate_creative_suggestions(&product, reference.as_ref(), &draft, constraint).await,
            )
        });
        Ok(vec!["Asking for creative suggestions...".to_string()])
    }

    async fn load_portrait(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        let image = ImageFile::load(path).await?;
        let mut lines = vec![loaded_line("Portrait", path, &image)];

        let mut studio = self.state.studio.lock();
        studio.set_portrait_image(image.clone());
        studio.transition(Mode::Portrait);
        match studio.begin(Action::Analysis) {
            Ok(epoch) => {
                self.spawn_job(epoch, Action::Analysis, None, async move {
                    JobOutcome::Analysis(analyze_portrait_subject(&image).await)
                });
                lines.push("Analyzing the subject...".to_string());
            }
            Err(err) => lines.push(format!("Analysis skipped: {err}")),
        }
        Ok(lines)
    }

    fn start_retouch(&self) -> anyhow::Result<Vec<String>> {
        let mut studio = self.state.studio.lock();
        let request = studio.retouch_request()?;
        let epoch = studio.begin(Action::Retouch)?;
        let profile = request.profile;

        self.spawn_job(
            epoch,
            Action::Retouch,
            Some(profile.as_str().to_string()),
            async move {
                JobOutcome::Retouch(
                    retouch_portrait_image(
                        &request.image,
                        request.profile,
                        &request.settings,
                        &request.prompt,
                    )
                    .await,
                )
            },
        );
        Ok(vec![format!("Retouching with the {} profile...", profile.as_str())])
    }

    fn start_upscale(
        &self,
        target: UpscaleTarget,
        director_id: Option<String>,
    ) -> anyhow::Result<Vec<String>> {
        let mut studio = self.state.studio.lock();
        let source = match director_id.as_deref() {
            Some(id) => studio.director_result(id)?.image.clone(),
            None => studio.upscale_source()?,
        };
        let epoch = studio.begin(Action::Upscale)?;

        self.spawn_job(
            epoch,
            Action::Upscale,
            Some(target.label().to_string()),
            async move {
                let result = upscale_image(&source, target).await;
                JobOutcome::Upscale {
                    target,
                    director_id,
                    result,
                }
            },
        );
        Ok(vec![format!("Upscaling to {}...", target.label())])
    }

    /// Runs the primary action of the current mode.
    fn generate(&self) -> anyhow::Result<Vec<String>> {
        let mode = self.state.studio.lock().mode;
        match mode {
            Mode::Studio => {
                let mut studio = self.state.studio.lock();
                let request = studio.studio_request()?;
                let epoch = studio.begin(Action::Studio)?;
                self.spawn_job(epoch, Action::Studio, Some(request.prompt.clone()), async move {
                    let result = generate_final_image(
                        &request.product,
                        request.reference.as_ref(),
                        &request.prompt,
                        &request.settings,
                        &request.export,
                    )
                    .await;
                    JobOutcome::Studio { request, result }
                });
                Ok(vec!["Generating the studio shot...".to_string()])
            }
            Mode::Generate => {
                let mut studio = self.state.studio.lock();
                let request = studio.generation_request()?;
                let epoch = studio.begin(Action::Generate)?;
                self.spawn_job(epoch, Action::Generate, Some(request.prompt.clone()), async move {
                    let result = generate_with_imagen(
                        &request.prompt,
                        &request.negative_prompt,
                        &request.export,
                    )
                    .await;
                    JobOutcome::Generation { request, result }
                });
                Ok(vec!["Generating images...".to_string()])
            }
            Mode::Portrait => self.start_retouch(),
            Mode::Director => {
                let mut studio = self.state.studio.lock();
                let request = studio.director_request()?;
                let epoch = studio.begin(Action::Director)?;
                let count = request.shots.len();
                self.spawn_job(epoch, Action::Director, Some(format!("{count} shots")), async move {
                    let mut results = Vec::with_capacity(request.shots.len());
                    for (label, direction) in &request.shots {
                        let result = generate_final_image(
                            &request.product,
                            request.reference.as_ref(),
                            direction,
                            &request.settings,
                            &request.export,
                        )
                        .await;
                        results.push((label.clone(), result));
                    }
                    JobOutcome::Director(results)
                });
                Ok(vec![format!("Directing {count} shot(s)...")])
            }
        }
    }

    /// Applies a finished call. Results from before the last `reset` are dropped.
    pub async fn apply_event(&self, event: JobEvent) -> Vec<String> {
        let JobEvent {
            epoch,
            action,
            outcome,
        } = event;
        let context = action.context();
        let mut lines = Vec::new();
        let mut to_save: Vec<(String, Vec<GeneratedImage>)> = Vec::new();
        let mut chain_retouch = false;

        {
            let mut studio = self.state.studio.lock();
            studio.finish(epoch);
            if !studio.is_current(epoch) {
                info!("Discarding stale {context} result");
                return lines;
            }

            match outcome {
                JobOutcome::Studio { request, result } => match result {
                    Ok(image) => {
                        studio.record_studio_result(request, image.clone());
                        lines.push("Studio shot ready.".to_string());
                        to_save.push(("studio".to_string(), vec![image]));
                    }
                    Err(err) => lines.push(err.user_message(context)),
                },
                JobOutcome::Generation { request, result } => match result {
                    Ok(images) => {
                        lines.push(format!("{} image(s) generated.", images.len()));
                        studio.record_generation(request, images.clone());
                        to_save.push(("generation".to_string(), images));
                    }
                    Err(err) => lines.push(err.user_message(context)),
                },
                JobOutcome::Suggestions(result) => match result {
                    Ok(suggestions) => {
                        for (index, concept) in suggestions.iter().enumerate() {
                            lines.push(format!("{}. {}", index + 1, concept.concept_title));
                            lines.push(format!("   {}", concept.prompt_text));
                        }
                        studio.set_suggestions(suggestions);
                    }
                    Err(err) => lines.push(err.user_message(context)),
                },
                JobOutcome::CameraSuggestions(result) => match result {
                    Ok(presets) => {
                        if presets.is_empty() {
                            lines.push("No camera angle suggestions.".to_string());
                        } else {
                            let names = presets
                                .iter()
                                .map(|preset| format!("{} ({})", preset.name, preset.id))
                                .collect::<Vec<_>>()
                                .join(", ");
                            lines.push(format!("Suggested camera angles: {names}"));
                        }
                        studio.set_camera_suggestions(presets);
                    }
                    Err(err) => lines.push(err.user_message(context)),
                },
                JobOutcome::Analysis(result) => match result {
                    Ok(report) => {
                        lines.extend(analysis_lines(&report));
                        if let Some(profile) = studio.apply_analysis(report) {
                            lines.push(format!("Profile set to {}.", profile.as_str()));
                            chain_retouch = true;
                        }
                    }
                    Err(err) => {
                        warn!("Portrait analysis failed: {err}");
                        studio.apply_analysis_failure();
                        lines.push(err.user_message(context));
                    }
                },
                JobOutcome::Retouch(result) => match result {
                    Ok(image) => {
                        studio.record_retouch(image.clone());
                        lines.push("Retouch ready.".to_string());
                        let label = format!("portrait-{}", studio.portrait.profile.as_str());
                        to_save.push((label, vec![image]));
                    }
                    Err(err) => lines.push(err.user_message(context)),
                },
                JobOutcome::Upscale {
                    target,
                    director_id,
                    result,
                } => match (result, director_id) {
                    (Ok(image), Some(id)) => match studio.replace_director_image(&id, image.clone()) {
                        Ok(()) => {
                            lines.push(format!("Director result {id} upscaled to {}.", target.label()));
                            to_save.push((format!("director-{}", target.label()), vec![image]));
                        }
                        Err(err) => lines.push(err.to_string()),
                    },
                    (Ok(image), None) => {
                        studio.record_upscale(target, image.clone());
                        lines.push(format!("Upscaled to {}.", target.label()));
                        to_save.push((format!("upscaled-{}", target.label()), vec![image]));
                    }
                    (Err(err), _) => lines.push(err.user_message(context)),
                },
                JobOutcome::Director(shots) => {
                    for (label, result) in shots {
                        match result {
                            Ok(image) => {
                                let id = studio.record_director_result(label.clone(), image.clone());
                                lines.push(format!("[{id}] {label} ready."));
                                to_save.push((label, vec![image]));
                            }
                            Err(err) => lines.push(format!("{label}: {}", err.user_message(context))),
                        }
                    }
                }
            }
        }

        for (label, images) in to_save {
            lines.extend(save_all(&self.state.output_dir, &label, &images).await);
        }
        if chain_retouch {
            match self.start_retouch() {
                Ok(more) => lines.extend(more),
                Err(err) => lines.push(format!("{err:#}")),
            }
        }
        lines
    }
}

fn loaded_line(what: &str, path: &Path, image: &ImageFile) -> String {
    format!(
        "{what} loaded: {} ({}, {} bytes)",
        path.display(),
        image.mime_type,
        image.bytes.len()
    )
}

fn log_lines(stream: LogStream, count: usize) -> anyhow::Result<Vec<String>> {
    let tail = read_recent_log_lines(stream, count).context("Reading logs failed")?;
    Ok(match tail {
        Some(tail) => {
            let mut lines = vec![format!("{}:", tail.path.display())];
            lines.extend(tail.lines);
            lines
        }
        None => vec!["No log file yet.".to_string()],
    })
}

fn status_lines(studio: &StudioState) -> Vec<String> {
    let describe = |image: Option<&ImageFile>| match image {
        Some(image) => image
            .display_name
            .clone()
            .unwrap_or_else(|| image.mime_type.clone()),
        None => "none".to_string(),
    };
    let mut lines = vec![
        format!(
            "Mode: {}  |  {}  |  export {}{}",
            studio.mode.as_str(),
            if studio.online { "online" } else { "offline" },
            studio.export.aspect_ratio.as_str(),
            if studio.export.transparent { " transparent" } else { "" }
        ),
        format!(
            "In progress: {}",
            studio.in_progress().map(Action::context).unwrap_or("nothing")
        ),
    ];

    match studio.mode {
        Mode::Studio | Mode::Director => {
            lines.push(format!("Product: {}", describe(studio.product_image.as_ref())));
            lines.push(format!("Reference: {}", describe(studio.reference_image.as_ref())));
            lines.push(format!("Direction: {}", studio.custom_prompt));
            if studio.mode == Mode::Director {
                lines.push(format!(
                    "Shots: {} active, {} result(s)",
                    studio.active_shot_count(),
                    studio.director_results.len()
                ));
            } else {
                lines.push(format!(
                    "Result: {}",
                    if studio.studio_result.is_some() { "ready" } else { "none" }
                ));
            }
        }
        Mode::Generate => {
            lines.push(format!("Prompt: {}", studio.generation_prompt));
            lines.push(format!("Negative: {}", studio.negative_prompt));
            lines.push(format!("Results: {}", studio.generation_results.len()));
        }
        Mode::Portrait => {
            lines.push(format!("Portrait: {}", describe(studio.portrait.image.as_ref())));
            lines.push(format!("Profile: {}", studio.portrait.profile.as_str()));
            lines.push(format!(
                "Result: {}",
                if studio.portrait.result.is_some() { "ready" } else { "none" }
            ));
        }
    }
    lines.push(format!("History: {} item(s)", studio.history.len()));
    lines
}

/// Catalog listing outside a session: the overview, or one category.
pub fn presets_listing(category: Option<Category>) -> Vec<String> {
    match category {
        Some(category) => preset_lines(&StudioState::default(), category),
        None => category_overview(),
    }
}

fn category_overview() -> Vec<String> {
    let mut lines: Vec<String> = Category::ALL
        .iter()
        .map(|category| {
            format!(
                "{:<16} {} presets{}",
                category.label(),
                catalog(*category).len(),
                if category.is_single_select() { "" } else { " (multi-select)" }
            )
        })
        .collect();
    let ratios = EXPORT_ASPECT_RATIOS
        .iter()
        .map(|(ratio, label)| format!("{} {label}", ratio.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Export ratios: {ratios}"));
    lines
}

fn preset_lines(studio: &StudioState, category: Category) -> Vec<String> {
    let selected = studio.selections.get(category);
    catalog(category)
        .iter()
        .map(|preset| {
            let marker = if selected.iter().any(|chosen| chosen.id == preset.id) {
                '*'
            } else if studio.camera_suggestions.iter().any(|s| s.id == preset.id) {
                '+'
            } else {
                ' '
            };
            format!(
                "{marker} {} {:<22} {} - {}",
                preset.icon.glyph(),
                preset.id,
                preset.name,
                preset.description
            )
        })
        .collect()
}

fn detail_lines(studio: &StudioState) -> Vec<String> {
    let camera = studio.camera;
    let lighting = studio.lighting;
    vec![
        format!(
            "Camera: {}mm f/{} 1/{}s height {}cm pitch {}° roll {}°",
            camera.focal_length,
            camera.aperture,
            camera.shutter_speed,
            camera.height,
            camera.pitch,
            camera.roll
        ),
        format!(
            "Lighting: {}K intensity {}% hardness {}%",
            lighting.temperature, lighting.intensity, lighting.hardness
        ),
    ]
}

fn settings_lines(studio: &StudioState) -> Vec<String> {
    let mut lines: Vec<String> = Category::ALL
        .iter()
        .map(|category| format!("{:<16} {}", category.label(), studio.selections.value(*category)))
        .collect();
    lines.extend(detail_lines(studio));
    lines
}

fn keyword_lines() -> Vec<String> {
    PROMPT_ENHANCER_KEYWORDS
        .iter()
        .map(|group| format!("{}: {}", group.category, group.keywords.join(", ")))
        .collect()
}

fn shot_lines(studio: &StudioState) -> Vec<String> {
    let mut lines = Vec::new();
    for (category, title) in [
        (ShotCategory::Angle, "Angles"),
        (ShotCategory::Environment, "Environments"),
    ] {
        lines.push(format!("{title}:"));
        for shot in DIRECTOR_SHOTS.iter().filter(|shot| shot.category == category) {
            let selected = studio.director_shots.iter().any(|s| s.id == shot.id);
            lines.push(format!(
                "  [{}] {:<18} {}",
                if selected { 'x' } else { ' ' },
                shot.id,
                shot.label
            ));
        }
    }
    lines
}

fn result_lines(studio: &StudioState) -> Vec<String> {
    if studio.director_results.is_empty() {
        return vec!["No director results yet.".to_string()];
    }
    studio
        .director_results
        .iter()
        .map(|result| format!("[{}] {} ({})", result.id, result.shot_label, result.image.mime_type))
        .collect()
}

fn history_lines(studio: &StudioState) -> Vec<String> {
    if studio.history.is_empty() {
        return vec!["History is empty.".to_string()];
    }
    studio
        .history
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let prompt: String = item.prompt.chars().take(60).collect();
            format!(
                "{}. [{:?}] {} {} ({} image(s))",
                index + 1,
                item.kind(),
                item.id,
                prompt,
                item.generated.len()
            )
        })
        .collect()
}

fn analysis_lines(report: &AiAnalysisReport) -> Vec<String> {
    let mut lines = vec![
        format!("Detected: {:?}, age {}", report.profile, report.age_estimation),
        format!(
            "Lighting: {}  |  Focus: {}",
            report.lighting_quality, report.focus_quality
        ),
    ];
    lines.extend(report.key_observations.iter().map(|note| format!("- {note}")));
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Reads commands from stdin until `quit` or end of input. At end of input
/// the loop keeps running until the action in flight has been applied.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let (session, mut events) = Session::new(state);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut reading = true;
    let mut waiting = false;

    println!("Product studio ready. Type `help` for commands.");
    loop {
        if !reading && !session.is_busy() {
            break;
        }
        if waiting && !session.is_busy() {
            waiting = false;
        }

        tokio::select! {
            line = input.next_line(), if reading && !waiting => {
                match line.context("reading stdin")? {
                    Some(line) => match session.handle_line(&line).await {
                        Reply::Lines(lines) => print_lines(&lines),
                        Reply::Wait => waiting = session.is_busy(),
                        Reply::Quit => break,
                    },
                    None => reading = false,
                }
            }
            Some(event) = events.recv() => {
                let lines = session.apply_event(event).await;
                print_lines(&lines);
            }
        }
    }
    info!("Session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::media::tests::tiny_png;
    use crate::presets::portrait::{AiProfile, DetectedProfile};
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("studio-session-{name}-{}", std::process::id()))
    }

    fn png_result() -> GeneratedImage {
        GeneratedImage {
            bytes: tiny_png(),
            mime_type: "image/png".to_string(),
        }
    }

    fn lines(reply: Reply) -> Vec<String> {
        match reply {
            Reply::Lines(lines) => lines,
            other => panic!("unexpected reply {other:?}"),
        }
    }

    async fn session_with_product(name: &str) -> (Session, UnboundedReceiver<JobEvent>, PathBuf) {
        let dir = temp_dir(name);
        std::fs::create_dir_all(&dir).unwrap();
        let product = dir.join("product.png");
        std::fs::write(&product, tiny_png()).unwrap();

        let (session, events) = Session::new(AppState::new(dir.join("out")));
        let reply = lines(session.handle_line(&format!("load {}", product.display())).await);
        assert!(reply[0].starts_with("Product image loaded"));
        lines(session.handle_line("prompt bottle on wet slate").await);
        (session, events, dir)
    }

    #[tokio::test]
    async fn generate_without_product_asks_for_one() {
        let (session, _events) = Session::new(AppState::new(temp_dir("missing")));
        let reply = lines(session.handle_line("generate").await);
        assert_eq!(reply, vec!["Load a product image first.".to_string()]);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn offline_and_busy_block_generation() {
        let (session, _events, dir) = session_with_product("guards").await;

        lines(session.handle_line("offline").await);
        let reply = lines(session.handle_line("generate").await);
        assert!(reply[0].starts_with("You are offline"));

        lines(session.handle_line("online").await);
        session.state.studio.lock().begin(Action::Upscale).unwrap();
        let reply = lines(session.handle_line("generate").await);
        assert_eq!(reply, vec!["Another upscaling is still in progress.".to_string()]);
        // Editing still works while busy.
        let reply = lines(session.handle_line("ratio 16:9").await);
        assert_eq!(reply, vec!["Aspect ratio: 16:9".to_string()]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn non_image_files_are_rejected() {
        let dir = temp_dir("reject");
        std::fs::create_dir_all(&dir).unwrap();
        let notes = dir.join("notes.txt");
        std::fs::write(&notes, b"just some text").unwrap();

        let (session, _events) = Session::new(AppState::new(dir.join("out")));
        let reply = lines(session.handle_line(&format!("load {}", notes.display())).await);
        assert!(reply[0].starts_with("Unsupported file type"));
        assert!(session.state.studio.lock().product_image.is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn studio_result_is_recorded_and_saved() {
        let (session, _events, dir) = session_with_product("studio").await;
        let (epoch, request) = {
            let mut studio = session.state.studio.lock();
            let request = studio.studio_request().unwrap();
            (studio.begin(Action::Studio).unwrap(), request)
        };

        let reply = session
            .apply_event(JobEvent {
                epoch,
                action: Action::Studio,
                outcome: JobOutcome::Studio {
                    request,
                    result: Ok(png_result()),
                },
            })
            .await;

        assert_eq!(reply[0], "Studio shot ready.");
        assert!(reply[1].starts_with("Saved "));
        let studio = session.state.studio.lock();
        assert!(studio.in_progress().is_none());
        assert_eq!(studio.history.len(), 1);
        assert!(studio.studio_result.is_some());
        drop(studio);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn failures_leave_state_untouched() {
        let (session, _events, dir) = session_with_product("failure").await;
        let (epoch, request) = {
            let mut studio = session.state.studio.lock();
            let request = studio.studio_request().unwrap();
            (studio.begin(Action::Studio).unwrap(), request)
        };

        let reply = session
            .apply_event(JobEvent {
                epoch,
                action: Action::Studio,
                outcome: JobOutcome::Studio {
                    request,
                    result: Err(StudioError::RateLimited),
                },
            })
            .await;

        assert_eq!(reply, vec![crate::llm::error::RATE_LIMIT_MESSAGE.to_string()]);
        let studio = session.state.studio.lock();
        assert!(studio.history.is_empty());
        assert!(studio.studio_result.is_none());
        assert!(studio.in_progress().is_none());
        drop(studio);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn empty_suggestions_keep_previous_concepts() {
        let (session, _events, dir) = session_with_product("suggestions").await;
        let epoch = {
            let mut studio = session.state.studio.lock();
            studio.set_suggestions(vec![SuggestionConcept {
                concept_title: "Minimal".to_string(),
                prompt_text: "Bottle on white".to_string(),
                settings_json: Default::default(),
            }]);
            studio.begin(Action::Suggestions).unwrap()
        };

        let result = crate::llm::studio_api::suggestions_from_payload(serde_json::json!({
            "concept_title": "x"
        }));
        let reply = session
            .apply_event(JobEvent {
                epoch,
                action: Action::Suggestions,
                outcome: JobOutcome::Suggestions(result),
            })
            .await;

        assert_eq!(
            reply,
            vec![
                "An error occurred during creative suggestion generation: The AI did not return any usable suggestions."
                    .to_string()
            ]
        );
        let studio = session.state.studio.lock();
        assert_eq!(studio.suggestions.len(), 1);
        assert_eq!(studio.suggestions[0].concept_title, "Minimal");
        assert!(studio.in_progress().is_none());
        drop(studio);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn results_from_before_reset_are_discarded() {
        let (session, _events, dir) = session_with_product("stale").await;
        let (epoch, request) = {
            let mut studio = session.state.studio.lock();
            let request = studio.studio_request().unwrap();
            (studio.begin(Action::Studio).unwrap(), request)
        };
        lines(session.handle_line("reset").await);

        let reply = session
            .apply_event(JobEvent {
                epoch,
                action: Action::Studio,
                outcome: JobOutcome::Studio {
                    request,
                    result: Ok(png_result()),
                },
            })
            .await;

        assert!(reply.is_empty());
        assert!(session.state.studio.lock().history.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn analysis_failure_stores_placeholder_report() {
        let (session, _events) = Session::new(AppState::new(temp_dir("analysis")));
        let epoch = {
            let mut studio = session.state.studio.lock();
            studio.set_portrait_image(ImageFile::from_bytes(tiny_png(), None, None).unwrap());
            studio.begin(Action::Analysis).unwrap()
        };

        let reply = session
            .apply_event(JobEvent {
                epoch,
                action: Action::Analysis,
                outcome: JobOutcome::Analysis(Err(StudioError::Network(String::new()))),
            })
            .await;

        assert_eq!(
            reply,
            vec!["An unexpected error occurred during portrait subject analysis.".to_string()]
        );
        let studio = session.state.studio.lock();
        let analysis = studio.portrait.analysis.as_ref().unwrap();
        assert_eq!(analysis.profile, DetectedProfile::Off);
    }

    #[tokio::test]
    async fn retouch_with_profile_off_round_trips_locally() {
        let dir = temp_dir("retouch-off");
        let (session, mut events) = Session::new(AppState::new(dir.clone()));
        {
            let mut studio = session.state.studio.lock();
            studio.set_portrait_image(ImageFile::from_bytes(tiny_png(), None, None).unwrap());
            studio.set_portrait_profile(AiProfile::Off);
            studio.transition(Mode::Portrait);
        }

        let reply = lines(session.handle_line("generate").await);
        assert_eq!(reply, vec!["Retouching with the off profile...".to_string()]);
        assert!(session.is_busy());

        let event = events.recv().await.unwrap();
        let reply = session.apply_event(event).await;
        assert_eq!(reply[0], "Retouch ready.");
        let studio = session.state.studio.lock();
        assert_eq!(studio.portrait.result.as_ref().unwrap().bytes, tiny_png());
        assert!(studio.in_progress().is_none());
        drop(studio);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn director_results_are_listed_and_dropped() {
        let dir = temp_dir("director");
        let (session, _events) = Session::new(AppState::new(dir.clone()));
        let epoch = session.state.studio.lock().begin(Action::Director).unwrap();

        let reply = session
            .apply_event(JobEvent {
                epoch,
                action: Action::Director,
                outcome: JobOutcome::Director(vec![
                    ("Top Down Shot".to_string(), Ok(png_result())),
                    ("Water Splash Shot".to_string(), Err(StudioError::Blocked { reason: "SAFETY".to_string() })),
                ]),
            })
            .await;

        assert!(reply[0].ends_with("Top Down Shot ready."));
        assert_eq!(
            reply[1],
            "Water Splash Shot: An error occurred during director shot generation: Generation blocked. Reason: SAFETY"
        );
        let id = session.state.studio.lock().director_results[0].id.clone();
        let listed = lines(session.handle_line("results").await);
        assert!(listed[0].contains(&id));

        lines(session.handle_line(&format!("drop {id}")).await);
        let listed = lines(session.handle_line("results").await);
        assert_eq!(listed, vec!["No director results yet.".to_string()]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn editing_commands_update_state() {
        let (session, _events) = Session::new(AppState::new(temp_dir("edits")));
        lines(session.handle_line("select camera hero-45").await);
        lines(session.handle_line("detail pitch −12").await);
        lines(session.handle_line("detail intensity 140").await);
        lines(session.handle_line("keyword Photorealistic").await);
        lines(session.handle_line("keyword Dreamlike").await);

        let studio = session.state.studio.lock();
        assert_eq!(studio.selections.primary(Category::Camera).id, "hero-45");
        assert_eq!(studio.camera.pitch, -12.0);
        assert_eq!(studio.lighting.intensity, 100.0);
        assert_eq!(studio.generation_prompt, "Photorealistic, Dreamlike");
        drop(studio);

        let reply = lines(session.handle_line("select camera does-not-exist").await);
        assert!(reply[0].starts_with("Unknown Camera preset"));
        assert_eq!(session.handle_line("quit").await, Reply::Quit);
    }
}
