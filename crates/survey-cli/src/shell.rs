use std::fmt::Write;

use survey_engine::SessionProgress;
use survey_spec::{
    AnswerSet, AnswerValue, QuestionVersion, ResponseOptions, ResponseType, Section,
};

/// Controls which bits of state the shell prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: section and question prompts only.
    Clean,
    /// Verbose output: progress counters and validation detail.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints section headers, prompts, and the completion summary.
pub struct Presenter {
    verbosity: Verbosity,
    header_printed: bool,
    show_answers_json: bool,
}

impl Presenter {
    pub fn new(verbosity: Verbosity, show_answers_json: bool) -> Self {
        Self {
            verbosity,
            header_printed: false,
            show_answers_json,
        }
    }

    pub fn show_header(&mut self, title: &str) {
        if self.header_printed {
            return;
        }
        println!("Survey: {}", title);
        self.header_printed = true;
    }

    pub fn show_section(&self, section: &Section, progress: &SessionProgress) {
        let mut line = format!("-- {}", section.name);
        if section.is_required {
            line.push_str(" [required]");
        }
        println!("{}", line);
        if let Some(description) = &section.description {
            println!("   {}", description);
        }
        if self.verbosity.is_verbose() {
            println!(
                "   Section {}/{}",
                progress.sections_done + 1,
                progress.sections_total
            );
        }
    }

    pub fn show_prompt(&self, current: &QuestionVersion) {
        let mut line = current.question_text.clone();
        if let Some(hint) = type_hint(current) {
            line.push(' ');
            line.push_str(&hint);
        }
        println!("{}", line);
        if self.verbosity.is_verbose()
            && let Some(choices) = current.options.as_ref().and_then(ResponseOptions::choices)
        {
            println!("Choices: {}", choices.join(", "));
        }
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if self.verbosity.is_verbose()
            && let Some(debug) = &error.debug_message
        {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_completion(&self, answers: &AnswerSet) {
        println!("Done");
        match answers.to_cbor() {
            Ok(bytes) => {
                println!("Answers (CBOR hex): {}", encode_hex(&bytes));
            }
            Err(err) => {
                eprintln!("Failed to serialize answers to CBOR: {}", err);
            }
        }
        if self.show_answers_json {
            match answers.to_json_pretty() {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => {
                    eprintln!("Failed to serialize answers to JSON: {}", err);
                }
            }
        }
    }
}

fn type_hint(current: &QuestionVersion) -> Option<String> {
    let choices = current.options.as_ref().and_then(ResponseOptions::choices);
    match current.response_type {
        ResponseType::Number => Some("(number)".to_string()),
        ResponseType::Scale | ResponseType::Likert => current
            .options
            .as_ref()
            .and_then(ResponseOptions::range)
            .map(|(min, max)| format!("({}-{})", min, max)),
        ResponseType::Date => Some("(date)".to_string()),
        ResponseType::SingleSelect | ResponseType::Dropdown => {
            choices.map(|labels| format!("({})", labels.join("/")))
        }
        ResponseType::MultiSelect | ResponseType::Checkbox => {
            choices.map(|labels| format!("(comma separated: {})", labels.join("/")))
        }
        _ => None,
    }
}

/// Error produced when parsing answers from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

/// Parses raw shell input into an answer value for a question version.
pub fn parse_answer(current: &QuestionVersion, raw: &str) -> Result<AnswerValue, AnswerParseError> {
    let trimmed = raw.trim();
    match current.response_type {
        ResponseType::Number | ResponseType::Scale | ResponseType::Likert => parse_number(trimmed),
        ResponseType::SingleSelect | ResponseType::Dropdown => parse_choice(current, trimmed),
        ResponseType::MultiSelect | ResponseType::Checkbox => parse_choice_list(current, trimmed),
        ResponseType::ShortText
        | ResponseType::LongText
        | ResponseType::FreeText
        | ResponseType::Date => Ok(AnswerValue::Text(trimmed.to_string())),
    }
}

fn parse_number(raw: &str) -> Result<AnswerValue, AnswerParseError> {
    raw.parse::<f64>()
        .map_err(|_| {
            AnswerParseError::new("Please enter a number.", Some("expected number".to_string()))
        })
        .and_then(|value| {
            if value.is_finite() {
                Ok(AnswerValue::Number(value))
            } else {
                Err(AnswerParseError::new(
                    "Please enter a finite number.",
                    Some("number must be finite".to_string()),
                ))
            }
        })
}

fn parse_choice(current: &QuestionVersion, raw: &str) -> Result<AnswerValue, AnswerParseError> {
    let Some(choices) = current.options.as_ref().and_then(ResponseOptions::choices) else {
        return Ok(AnswerValue::Text(raw.to_string()));
    };
    match choices.iter().find(|choice| choice.eq_ignore_ascii_case(raw)) {
        Some(choice) => Ok(AnswerValue::Text(choice.clone())),
        None => Err(AnswerParseError::new(
            format!("Choose one of: {}.", choices.join(", ")),
            Some(format!("allowed values: {}", choices.join(", "))),
        )),
    }
}

fn parse_choice_list(
    current: &QuestionVersion,
    raw: &str,
) -> Result<AnswerValue, AnswerParseError> {
    let selected = raw
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>();
    if selected.is_empty() {
        return Err(AnswerParseError::new(
            "Provide at least one comma separated selection.",
            None,
        ));
    }

    let Some(choices) = current.options.as_ref().and_then(ResponseOptions::choices) else {
        return Ok(AnswerValue::Many(
            selected
                .into_iter()
                .map(|value| AnswerValue::Text(value.to_string()))
                .collect(),
        ));
    };

    let mut values = Vec::with_capacity(selected.len());
    for candidate in selected {
        match choices
            .iter()
            .find(|choice| choice.eq_ignore_ascii_case(candidate))
        {
            Some(choice) => values.push(AnswerValue::Text(choice.clone())),
            None => {
                return Err(AnswerParseError::new(
                    format!("'{}' is not a choice. Allowed: {}.", candidate, choices.join(", ")),
                    Some(format!("allowed values: {}", choices.join(", "))),
                ));
            }
        }
    }
    Ok(AnswerValue::Many(values))
}

pub fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut encoded, "{:02x}", byte).expect("writing to string cannot fail");
    }
    encoded
}
