mod shell;

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use shell::{Presenter, Verbosity, parse_answer};
use survey_engine::{SessionState, SurveySession};
use survey_spec::{
    AnswerSet, FlowOutcome, QuestionVersion, Survey, ValidationResult, answers_schema, flow,
    lint_survey, resolve_visibility, validate_answers, validate_section, version,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Survey flow CLI",
    long_about = "Runs, routes, validates, and describes section-based survey flows"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a survey interactively in a text shell.
    Run {
        /// Path to the survey JSON document.
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        /// Optional JSON file containing initial answers.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Show verbose output (progress counters, parse expectations).
        #[arg(long, alias = "debug")]
        verbose: bool,
        /// Also emit answer JSON on completion.
        #[arg(long)]
        answers_json: bool,
    },
    /// Print the section path a set of answers routes through.
    Route {
        /// Path to the survey JSON document.
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        /// Optional JSON file containing answers.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
    },
    /// Lint a survey document, and validate answers when supplied.
    Validate {
        /// Path to the survey JSON document.
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        /// Optional JSON file containing answers to validate.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
    },
    /// Print the answers JSON Schema for a survey.
    Schema {
        /// Path to the survey JSON document.
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
        /// Optional JSON file containing answers that drive visibility.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            survey,
            answers,
            verbose,
            answers_json,
        } => run_survey(survey, answers, verbose, answers_json),
        Command::Route { survey, answers } => run_route(survey, answers),
        Command::Validate { survey, answers } => run_validate(survey, answers),
        Command::Schema { survey, answers } => run_schema(survey, answers),
    }
}

fn load_survey(path: &PathBuf) -> CliResult<Survey> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Accepts either a full answer-set document or a bare question-id map.
fn load_answers(survey: &Survey, path: &PathBuf) -> CliResult<AnswerSet> {
    let contents = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents)?;
    if value.get("answers").is_some() {
        Ok(serde_json::from_value(value)?)
    } else {
        let mut set = AnswerSet::new(&survey.id, &survey.version);
        set.answers = serde_json::from_value(value)?;
        Ok(set)
    }
}

fn run_survey(
    survey_path: PathBuf,
    answers_path: Option<PathBuf>,
    verbose: bool,
    answers_json: bool,
) -> CliResult<()> {
    let survey = load_survey(&survey_path)?;
    let mut session = match answers_path {
        Some(path) => {
            let answers = load_answers(&survey, &path)?;
            SurveySession::with_answers(survey, answers)
        }
        None => SurveySession::new(survey),
    };
    let mut presenter = Presenter::new(Verbosity::from_verbose(verbose), answers_json);
    presenter.show_header(&session.survey().title);

    loop {
        let SessionState::InSection(section_id) = session.state().clone() else {
            break;
        };
        let Some(section) = session.survey().section(&section_id).cloned() else {
            session.advance();
            continue;
        };
        presenter.show_section(&section, &session.progress());

        // Resolve prompts up front; questions with no document or an empty
        // version log are skipped rather than aborting the run.
        let prompts: Vec<(String, QuestionVersion)> = section
            .question_ids
            .iter()
            .filter_map(|question_id| {
                let question = session.survey().question(question_id)?;
                version::resolve(question).map(|current| (question_id.clone(), current.clone()))
            })
            .collect();
        if prompts.is_empty() {
            session.advance();
            continue;
        }

        let mut went_back = false;
        for (question_id, current) in &prompts {
            presenter.show_prompt(current);
            loop {
                let input = prompt_line()?;
                let trimmed = input.trim();
                if trimmed.eq_ignore_ascii_case("exit") {
                    return Err("survey aborted by user".into());
                }
                if trimmed.eq_ignore_ascii_case("back") {
                    if session.back() {
                        went_back = true;
                        break;
                    }
                    println!("Already at the first section.");
                    continue;
                }
                if trimmed.is_empty() {
                    if section.is_required {
                        println!("This question requires an answer.");
                        continue;
                    }
                    break;
                }
                match parse_answer(current, trimmed) {
                    Ok(value) => {
                        session.record_answer(question_id.clone(), value);
                        break;
                    }
                    Err(err) => presenter.show_parse_error(&err),
                }
            }
            if went_back {
                break;
            }
        }
        if went_back {
            continue;
        }

        let result = validate_section(session.survey(), &section, session.answers());
        if !result.valid {
            describe_validation(&result);
            continue;
        }
        session.advance();
    }

    presenter.show_completion(session.answers());
    Ok(())
}

fn prompt_line() -> CliResult<String> {
    print!("> ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}

fn run_route(survey_path: PathBuf, answers_path: Option<PathBuf>) -> CliResult<()> {
    let survey = load_survey(&survey_path)?;
    let answers = match answers_path {
        Some(path) => load_answers(&survey, &path)?,
        None => AnswerSet::new(&survey.id, &survey.version),
    };

    let mut visited = BTreeSet::new();
    let mut outcome = flow::start(&answers, &survey);
    while let FlowOutcome::Section(id) = outcome {
        if !visited.insert(id.clone()) {
            return Err(format!("skip logic loops back through section '{}'", id).into());
        }
        println!("{}", id);
        outcome = flow::next(&id, &answers, &survey);
    }
    println!("complete");
    Ok(())
}

fn run_validate(survey_path: PathBuf, answers_path: Option<PathBuf>) -> CliResult<()> {
    let survey = load_survey(&survey_path)?;

    let findings = lint_survey(&survey);
    if findings.is_empty() {
        println!("Survey lint: clean");
    } else {
        println!("Survey lint: {} finding(s)", findings.len());
        for finding in &findings {
            println!(
                "  {} - {}",
                finding.path.as_deref().unwrap_or("<unknown>"),
                finding.message
            );
        }
    }

    let mut failed = !findings.is_empty();
    if let Some(path) = answers_path {
        let answers = load_answers(&survey, &path)?;
        let result = validate_answers(&survey, &answers);
        println!(
            "Answers: {}",
            if result.valid { "valid" } else { "invalid" }
        );
        describe_validation(&result);
        failed = failed || !result.valid;
    }

    if failed {
        Err("validation failed".into())
    } else {
        Ok(())
    }
}

fn run_schema(survey_path: PathBuf, answers_path: Option<PathBuf>) -> CliResult<()> {
    let survey = load_survey(&survey_path)?;
    let answers = match answers_path {
        Some(path) => load_answers(&survey, &path)?,
        None => AnswerSet::new(&survey.id, &survey.version),
    };
    let visibility = resolve_visibility(&survey, &answers);
    let schema = answers_schema(&survey, &visibility);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn describe_validation(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("Errors:");
        for error in &result.errors {
            println!(
                "  {} - {}",
                error.path.as_deref().unwrap_or("<unknown>"),
                error.message
            );
        }
    }
    if !result.missing_required.is_empty() {
        println!(
            "Missing required answers: {}",
            result.missing_required.join(", ")
        );
    }
    if !result.unknown_fields.is_empty() {
        println!(
            "Unknown answer fields: {}",
            result.unknown_fields.join(", ")
        );
    }
}
