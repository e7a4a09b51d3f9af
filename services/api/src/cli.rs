use crate::infra::{build_service, load_engine, parse_mode, rng_from_seed};
use crate::report::{render_questions, render_results};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mindscope::assessment::{
    parse_answer_sheet, score_sheet, AnswerSet, AssessmentMode, AssessmentRequest,
};
use mindscope::config::AppConfig;
use mindscope::error::AppError;
use mindscope::telemetry;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "MindScope",
    about = "Serve or run the MindScope wellness assessment from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score an answer file and print the results
    Assess(AssessArgs),
    /// Print the questions served for a mode
    Questions(QuestionsArgs),
    /// Score a CSV of respondents, one line per respondent
    Bulk(BulkArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON file holding either `{ "phq_1": 2, ... }` or `{ "answers": {...}, "mode": "quick" }`
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Assessment mode recorded in the payload (full or quick)
    #[arg(long, value_parser = parse_mode)]
    pub(crate) mode: Option<AssessmentMode>,
    /// Seed for the percentile jitter
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print the JSON payload instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct QuestionsArgs {
    /// Question set to print (full or quick)
    #[arg(long, value_parser = parse_mode, default_value = "full")]
    pub(crate) mode: AssessmentMode,
    /// Seed for quick-mode sampling
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug)]
pub(crate) struct BulkArgs {
    /// CSV with a `respondent` column followed by question-id columns
    pub(crate) csv: PathBuf,
    /// Seed for the percentile jitter
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

/// Answer files may hold a bare answer map or a full request body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswerFile {
    Plain(AnswerSet),
    Request(AssessmentRequest),
}

impl AnswerFile {
    fn into_request(self, mode: Option<AssessmentMode>) -> AssessmentRequest {
        let mut request = match self {
            AnswerFile::Plain(answers) => AssessmentRequest {
                answers,
                mode: AssessmentMode::Full,
            },
            AnswerFile::Request(request) => request,
        };
        if let Some(mode) = mode {
            request.mode = mode;
        }
        request
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Questions(args) => run_questions(args),
        Command::Bulk(args) => run_bulk(args),
    }
}

fn offline_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        answers,
        mode,
        seed,
        json,
    } = args;

    let config = offline_config()?;
    let service = build_service(&config.assessment)?;

    let file = std::fs::File::open(&answers)?;
    let parsed: AnswerFile = serde_json::from_reader(std::io::BufReader::new(file))?;
    let request = parsed.into_request(mode);

    let mut rng = rng_from_seed(seed);
    let payload = service.assess(request, &mut rng)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", render_results(&payload));
    }
    Ok(())
}

fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let config = offline_config()?;
    let service = build_service(&config.assessment)?;

    let mut rng = rng_from_seed(args.seed);
    let set = service.questions(args.mode, &mut rng);
    print!("{}", render_questions(&set));
    Ok(())
}

fn run_bulk(args: BulkArgs) -> Result<(), AppError> {
    let config = offline_config()?;
    let engine = load_engine(&config.assessment)?;

    let file = std::fs::File::open(&args.csv)?;
    let rows = parse_answer_sheet(std::io::BufReader::new(file))?;

    let mut rng = rng_from_seed(args.seed);
    for outcome in score_sheet(&rows, &engine, &mut rng) {
        println!("{}", outcome.line());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_assess_flags() {
        let cli = Cli::try_parse_from([
            "mindscope-api",
            "assess",
            "--answers",
            "answers.json",
            "--mode",
            "quick",
            "--seed",
            "7",
            "--json",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Assess(args)) => {
                assert_eq!(args.mode, Some(AssessmentMode::Quick));
                assert_eq!(args.seed, Some(7));
                assert!(args.json);
            }
            other => panic!("expected assess, got {other:?}"),
        }
    }

    #[test]
    fn answer_files_accept_both_shapes() {
        let plain: AnswerFile = serde_json::from_str(r#"{ "phq_1": 2, "who_1": 4 }"#).expect("plain");
        let request = plain.into_request(None);
        assert_eq!(request.answers.len(), 2);
        assert_eq!(request.mode, AssessmentMode::Full);

        let wrapped: AnswerFile =
            serde_json::from_str(r#"{ "answers": { "gad_1": 1 }, "mode": "quick" }"#)
                .expect("wrapped");
        let request = wrapped.into_request(None);
        assert_eq!(request.answers.len(), 1);
        assert_eq!(request.mode, AssessmentMode::Quick);

        let overridden: AnswerFile = serde_json::from_str(r#"{ "gad_1": 1 }"#).expect("plain");
        assert_eq!(
            overridden.into_request(Some(AssessmentMode::Quick)).mode,
            AssessmentMode::Quick
        );
    }

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["mindscope-api"]).expect("parses");
        assert!(cli.command.is_none());
    }
}
