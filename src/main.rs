use std::path::PathBuf;

use anyhow::anyhow;
use dotenvy::dotenv;
use tracing::info;

mod config;
mod llm;
mod presets;
mod session;
mod state;
mod studio;
mod utils;

use config::CONFIG;
use presets::types::Category;
use session::runner::{presets_listing, print_lines};
use state::AppState;
use utils::logging::init_logging;

#[derive(Debug, PartialEq)]
enum Invocation {
    Session { output_dir: PathBuf },
    Presets(Option<Category>),
}

fn usage() -> &'static str {
    "Usage: product_studio [--output-dir <path>]\n       product_studio presets [camera|lighting|mockup|fx|retouch|people]"
}

fn parse_args(args: &[String]) -> anyhow::Result<Invocation> {
    if args.get(1).map(|value| value.as_str()) == Some("presets") {
        let category = match args.get(2) {
            Some(value) => Some(
                Category::from_keyword(value)
                    .ok_or_else(|| anyhow!("Unknown category: {value}\n{}", usage()))?,
            ),
            None => None,
        };
        return Ok(Invocation::Presets(category));
    }

    let mut output_dir = CONFIG.output_dir.clone();
    let mut index = 1;
    while index < args.len() {
        match args[index].as_str() {
            "--output-dir" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| anyhow!("Missing value for --output-dir"))?;
                output_dir = PathBuf::from(value);
            }
            "--help" | "-h" => {
                return Err(anyhow!(usage()));
            }
            other => {
                return Err(anyhow!("Unknown argument: {other}\n{}", usage()));
            }
        }
        index += 1;
    }

    Ok(Invocation::Session { output_dir })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let _guards = init_logging();

    let args: Vec<String> = std::env::args().collect();
    let output_dir = match parse_args(&args)? {
        Invocation::Presets(category) => {
            print_lines(&presets_listing(category));
            return Ok(());
        }
        Invocation::Session { output_dir } => output_dir,
    };

    if !CONFIG.has_api_key() {
        return Err(anyhow!("GEMINI_API_KEY is required to start a studio session"));
    }

    info!(
        "Starting product studio (pipeline {:?}, output {})",
        CONFIG.studio_pipeline,
        output_dir.display()
    );
    session::run(AppState::new(output_dir)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn presets_subcommand_takes_optional_category() {
        assert_eq!(
            parse_args(&args(&["studio", "presets"])).unwrap(),
            Invocation::Presets(None)
        );
        assert_eq!(
            parse_args(&args(&["studio", "presets", "fx"])).unwrap(),
            Invocation::Presets(Some(Category::Manipulation))
        );
        assert!(parse_args(&args(&["studio", "presets", "lens"])).is_err());
    }

    #[test]
    fn output_dir_flag_overrides_config() {
        assert_eq!(
            parse_args(&args(&["studio", "--output-dir", "shots"])).unwrap(),
            Invocation::Session {
                output_dir: PathBuf::from("shots")
            }
        );
        assert!(parse_args(&args(&["studio", "--output-dir"])).is_err());
        assert!(parse_args(&args(&["studio", "--verbose"])).is_err());
    }
}
