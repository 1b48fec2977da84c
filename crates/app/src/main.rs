use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use interview_core::model::AppSettingsDraft;
use services::settings::draft_from_env;
use services::{AppServices, Clock, ConfigError, InterviewLoopService};
use tracing::{Level, info};
use ui::{App, UiApp, build_app_context};

const LOG_ENV: &str = "INTERVIEW_LOG";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDelay { raw: String },
    ConflictingFlags,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDelay { raw } => {
                write!(f, "invalid --offline-delay-ms value: {raw}")
            }
            ArgsError::ConflictingFlags => {
                write!(f, "--offline cannot be combined with --ai-questions or --ai-feedback")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    interview: Arc<InterviewLoopService>,
    model_options: Vec<String>,
}

impl UiApp for DesktopApp {
    fn interview(&self) -> Arc<InterviewLoopService> {
        Arc::clone(&self.interview)
    }

    fn model_options(&self) -> Vec<String> {
        self.model_options.clone()
    }
}

/// Command-line overrides applied on top of the environment.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    offline: bool,
    ai_questions: bool,
    ai_feedback: bool,
    model: Option<String>,
    offline_delay_ms: Option<u64>,
    help: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--offline" => parsed.offline = true,
                "--ai-questions" => parsed.ai_questions = true,
                "--ai-feedback" => parsed.ai_feedback = true,
                "--model" => parsed.model = Some(require_value(args, "--model")?),
                "--offline-delay-ms" => {
                    let value = require_value(args, "--offline-delay-ms")?;
                    let delay = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidDelay { raw: value.clone() })?;
                    parsed.offline_delay_ms = Some(delay);
                }
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if parsed.offline && (parsed.ai_questions || parsed.ai_feedback) {
            return Err(ArgsError::ConflictingFlags);
        }
        Ok(parsed)
    }

    fn apply(self, mut draft: AppSettingsDraft) -> AppSettingsDraft {
        if self.offline {
            draft.ai_questions = false;
            draft.ai_feedback = false;
        }
        draft.ai_questions |= self.ai_questions;
        draft.ai_feedback |= self.ai_feedback;
        if let Some(model) = self.model {
            draft.api_model = Some(model);
        }
        if let Some(delay) = self.offline_delay_ms {
            draft.offline_delay_ms = Some(delay);
        }
        draft
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--offline] [--ai-questions] [--ai-feedback]");
    eprintln!("                      [--model <id>] [--offline-delay-ms <ms>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  INTERVIEW_AI_API_KEY, INTERVIEW_AI_BASE_URL, INTERVIEW_AI_MODEL,");
    eprintln!("  INTERVIEW_AI_QUESTIONS, INTERVIEW_AI_FEEDBACK, INTERVIEW_AI_TIMEOUT_SECS,");
    eprintln!("  INTERVIEW_OFFLINE_DELAY_MS, INTERVIEW_LOG");
}

fn init_tracing() {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(&mut std::env::args().skip(1)).map_err(|e| {
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    init_tracing();

    let settings = args
        .apply(draft_from_env()?)
        .validate()
        .map_err(ConfigError::from)?;
    info!(?settings, "settings loaded");

    let services = AppServices::from_settings(settings, Clock::default_clock())?;
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        interview: services.interview(),
        model_options: services.model_options().await?,
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Interview Practice")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(&mut args.iter().map(|arg| (*arg).to_string()))
    }

    #[test]
    fn no_args_leaves_environment_in_charge() {
        assert_eq!(parse(&[]).unwrap(), Args::default());
    }

    #[test]
    fn flags_enable_features_and_override_model() {
        let args = parse(&["--ai-feedback", "--model", "gpt-4o"]).unwrap();
        let draft = args.apply(AppSettingsDraft {
            api_key: Some("sk-test".into()),
            ..AppSettingsDraft::new()
        });
        assert!(draft.ai_feedback);
        assert!(!draft.ai_questions);
        assert_eq!(draft.api_model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn offline_overrides_environment_toggles() {
        let args = parse(&["--offline"]).unwrap();
        let draft = args.apply(AppSettingsDraft {
            ai_questions: true,
            ai_feedback: true,
            ..AppSettingsDraft::new()
        });
        assert!(!draft.ai_questions);
        assert!(!draft.ai_feedback);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(parse(&["--model"]), Err(ArgsError::MissingValue { .. })));
        assert!(matches!(parse(&["--bogus"]), Err(ArgsError::UnknownArg(_))));
        assert!(matches!(
            parse(&["--offline-delay-ms", "soon"]),
            Err(ArgsError::InvalidDelay { .. })
        ));
        assert!(matches!(
            parse(&["--offline", "--ai-questions"]),
            Err(ArgsError::ConflictingFlags)
        ));
    }
}
