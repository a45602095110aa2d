use std::path::PathBuf;

use crate::presets::portrait::AiProfile;
use crate::presets::types::{AspectRatio, Category, UpscaleTarget};
use crate::studio::history::HistoryKind;
use crate::studio::state::Mode;
use crate::utils::logging::LogStream;

pub const HELP_TEXT: &str = "\
Commands:
  mode <studio|generate|portrait|director>   switch mode
  load <path>                                load the product image
  reference <path>|clear                     set or clear the style reference
  prompt <text>                              creative direction for studio/director
  presets [category]                         list presets
  select <category> <preset-id>              click a preset (camera, lighting, mockup, fx, retouch, people)
  detail <field> <value>                     edit a camera/lighting slider (focal, aperture, shutter, height, pitch, roll, temp, intensity, hardness)
  settings                                   show the current chosen settings
  ratio <9:16|4:5|1:1|3:2|16:9>              export aspect ratio
  transparent <on|off>                       transparent PNG export
  suggest                                    ask for three creative concepts
  use <n>                                    adopt suggestion n
  gprompt <text> / negative <text>           text-to-image prompts
  keywords / keyword <word>                  prompt enhancer keywords
  portrait <path>                            load a portrait (runs analysis)
  profile <male|female|child|senior|professional|glamour|off>
  retouch <field> <value>                    edit a portrait retouch setting
  pprompt <text>                             portrait creative direction
  shots / shot <id>                          list or toggle director shots
  results / drop <id>                        list or delete director results
  generate                                   run the action of the current mode
  upscale <hd|4k> [director-result-id]       upscale the studio or a director result
  history [load <n>|clear <studio|generation>|export <path>]
  wait                                       pause input until the running action finishes
  status / online / offline / reset / logs [timing] [n] / help / quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Wait,
    Status,
    Online(bool),
    Reset,
    Logs { stream: LogStream, count: usize },
    Mode(Mode),
    LoadProduct(PathBuf),
    Reference(Option<PathBuf>),
    Prompt(String),
    Presets(Option<Category>),
    Select { category: Category, id: String },
    Detail { field: String, value: String },
    Settings,
    Ratio(AspectRatio),
    Transparent(bool),
    Suggest,
    UseSuggestion(usize),
    GenerationPrompt(String),
    NegativePrompt(String),
    Keywords,
    Keyword(String),
    LoadPortrait(PathBuf),
    Profile(AiProfile),
    Retouch { field: String, value: String },
    PortraitPrompt(String),
    Shots,
    ToggleShot(String),
    Results,
    DropResult(String),
    Generate,
    Upscale { target: UpscaleTarget, director_id: Option<String> },
    History,
    HistoryLoad(usize),
    HistoryClear(HistoryKind),
    HistoryExport(PathBuf),
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    }
}

fn require<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(rest)
    }
}

fn parse_switch(value: &str, usage: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        _ => Err(format!("Usage: {usage}")),
    }
}

fn parse_index(value: &str, usage: &str) -> Result<usize, String> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Usage: {usage}"))
}

impl Command {
    /// Parses one input line. `Ok(None)` means the line was blank.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let (word, rest) = split_word(line);
        if word.is_empty() || word.starts_with('#') {
            return Ok(None);
        }

        let command = match word.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "wait" => Command::Wait,
            "status" => Command::Status,
            "online" => Command::Online(true),
            "offline" => Command::Online(false),
            "reset" => Command::Reset,
            "logs" => {
                let usage = "logs [timing] [n]";
                let (first, second) = split_word(rest);
                let (stream, count) = if first.eq_ignore_ascii_case("timing") {
                    (LogStream::Timing, second)
                } else {
                    (LogStream::Studio, rest)
                };
                let count = if count.is_empty() { 20 } else { parse_index(count, usage)? };
                Command::Logs { stream, count }
            }
            "mode" => {
                let value = require(rest, "mode <studio|generate|portrait|director>")?;
                let mode = Mode::parse(value).ok_or_else(|| format!("Unknown mode '{value}'"))?;
                Command::Mode(mode)
            }
            "load" => Command::LoadProduct(PathBuf::from(require(rest, "load <path>")?)),
            "reference" | "ref" => {
                let value = require(rest, "reference <path>|clear")?;
                if value.eq_ignore_ascii_case("clear") {
                    Command::Reference(None)
                } else {
                    Command::Reference(Some(PathBuf::from(value)))
                }
            }
            "prompt" => Command::Prompt(rest.to_string()),
            "presets" => {
                if rest.is_empty() {
                    Command::Presets(None)
                } else {
                    let category = Category::from_keyword(rest)
                        .ok_or_else(|| format!("Unknown category '{rest}'"))?;
                    Command::Presets(Some(category))
                }
            }
            "select" => {
                let (category, id) = split_word(rest);
                let usage = "select <category> <preset-id>";
                let category = Category::from_keyword(require(category, usage)?)
                    .ok_or_else(|| format!("Unknown category '{category}'"))?;
                Command::Select {
                    category,
                    id: require(id, usage)?.to_string(),
                }
            }
            "detail" => {
                let (field, value) = split_word(rest);
                let usage = "detail <field> <value>";
                Command::Detail {
                    field: require(field, usage)?.to_string(),
                    value: require(value, usage)?.to_string(),
                }
            }
            "settings" => Command::Settings,
            "ratio" => {
                let value = require(rest, "ratio <9:16|4:5|1:1|3:2|16:9>")?;
                let ratio = AspectRatio::parse(value)
                    .ok_or_else(|| format!("Unsupported aspect ratio '{value}'"))?;
                Command::Ratio(ratio)
            }
            "transparent" => Command::Transparent(parse_switch(rest, "transparent <on|off>")?),
            "suggest" => Command::Suggest,
            "use" => Command::UseSuggestion(parse_index(rest, "use <n>")?),
            "gprompt" => Command::GenerationPrompt(rest.to_string()),
            "negative" => Command::NegativePrompt(rest.to_string()),
            "keywords" => Command::Keywords,
            "keyword" => Command::Keyword(require(rest, "keyword <word>")?.to_string()),
            "portrait" => Command::LoadPortrait(PathBuf::from(require(rest, "portrait <path>")?)),
            "profile" => {
                let value = require(rest, "profile <name>")?;
                let profile = AiProfile::parse(value).ok_or_else(|| {
                    let names: Vec<&str> = AiProfile::ALL.iter().map(|p| p.as_str()).collect();
                    format!("Unknown profile '{value}'. Choose one of: {}", names.join(", "))
                })?;
                Command::Profile(profile)
            }
            "retouch" => {
                let (field, value) = split_word(rest);
                let usage = "retouch <field> <value>";
                Command::Retouch {
                    field: require(field, usage)?.to_string(),
                    value: value.to_string(),
                }
            }
            "pprompt" => Command::PortraitPrompt(rest.to_string()),
            "shots" => Command::Shots,
            "shot" => Command::ToggleShot(require(rest, "shot <id>")?.to_string()),
            "results" => Command::Results,
            "drop" => Command::DropResult(require(rest, "drop <id>")?.to_string()),
            "generate" | "go" => Command::Generate,
            "upscale" => {
                let (target, id) = split_word(rest);
                let usage = "upscale <hd|4k> [director-result-id]";
                let target = UpscaleTarget::parse(require(target, usage)?)
                    .ok_or_else(|| format!("Usage: {usage}"))?;
                Command::Upscale {
                    target,
                    director_id: (!id.is_empty()).then(|| id.to_string()),
                }
            }
            "history" => {
                let (sub, arg) = split_word(rest);
                match sub.to_lowercase().as_str() {
                    "" | "list" => Command::History,
                    "load" => Command::HistoryLoad(parse_index(arg, "history load <n>")?),
                    "clear" => {
                        let kind = HistoryKind::parse(arg)
                            .ok_or_else(|| "Usage: history clear <studio|generation>".to_string())?;
                        Command::HistoryClear(kind)
                    }
                    "export" => {
                        Command::HistoryExport(PathBuf::from(require(arg, "history export <path>")?))
                    }
                    other => return Err(format!("Unknown history command '{other}'")),
                }
            }
            other => return Err(format!("Unknown command '{other}'. Type `help` for a list.")),
        };
        Ok(Some(command))
    }
}
