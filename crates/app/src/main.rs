use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use services::Clock;
use services::quiz::{
    OptionStyle, QuestionView, QuizConfig, QuizIntent, QuizLoader, QuizViewState, view_state,
};
use services::source::{OpenTriviaClient, SourceConfig};
use trivia_core::{NavigationPolicy, QuizSession};
use url::Url;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidEndpoint { raw: String },
    InvalidCategory { raw: String },
    InvalidAmount { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidEndpoint { raw } => write!(f, "invalid --endpoint value: {raw}"),
            ArgsError::InvalidCategory { raw } => write!(f, "invalid --category value: {raw}"),
            ArgsError::InvalidAmount { raw } => write!(f, "invalid --amount value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--endpoint <url>] [--category <id>] [--amount <n>] [--free-advance]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --endpoint {}", services::source::DEFAULT_ENDPOINT);
    eprintln!("  --category 9   (General Knowledge)");
    eprintln!("  --amount 5");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRIVIA_ENDPOINT, TRIVIA_CATEGORY, TRIVIA_AMOUNT");
}

struct Args {
    config: QuizConfig,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        // Environment first, flags override.
        let mut source = SourceConfig::from_env();
        let mut navigation = NavigationPolicy::ConfirmToAdvance;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--endpoint" => {
                    let value = require_value(args, "--endpoint")?;
                    source.endpoint = Url::parse(&value)
                        .map_err(|_| ArgsError::InvalidEndpoint { raw: value.clone() })?;
                }
                "--category" => {
                    let value = require_value(args, "--category")?;
                    source.category = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCategory { raw: value.clone() })?;
                }
                "--amount" => {
                    let value = require_value(args, "--amount")?;
                    let amount: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidAmount { raw: value.clone() })?;
                    if amount == 0 {
                        return Err(ArgsError::InvalidAmount { raw: value });
                    }
                    source.question_count = amount;
                }
                "--free-advance" => navigation = NavigationPolicy::FreeAdvance,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            config: QuizConfig { source, navigation },
        })
    }
}

/// One line of user input, decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Intent(QuizIntent),
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "q" | "quit" => Input::Quit,
        "c" | "" => Input::Intent(QuizIntent::Confirm),
        "n" | "next" => Input::Intent(QuizIntent::Advance),
        "r" | "restart" => Input::Intent(QuizIntent::Restart),
        _ => match line.parse::<usize>() {
            // Options are displayed 1-based.
            Ok(number) if number >= 1 => Input::Intent(QuizIntent::SelectOption(number - 1)),
            _ => Input::Unknown,
        },
    }
}

fn render_question(view: &QuestionView) {
    println!();
    println!("Question {} of {}   score {}", view.position, view.total, view.score);
    println!("{}", view.text);
    for (index, option) in view.options.iter().enumerate() {
        let marker = if option.selected { '>' } else { ' ' };
        let verdict = match option.style {
            OptionStyle::Correct => "  [correct]",
            OptionStyle::Incorrect => "  [your pick]",
            OptionStyle::Neutral => "",
        };
        println!("  {marker} {}. {}{verdict}", index + 1, option.text);
    }
    if view.confirmed {
        println!("(n = next question, r = restart, q = quit)");
    } else if view.can_confirm {
        println!("(enter = confirm, 1-{} = change pick, q = quit)", view.options.len());
    } else {
        println!("(1-{} = pick an answer, q = quit)", view.options.len());
    }
}

fn render(state: &QuizViewState) {
    match state {
        QuizViewState::Loading => {
            println!();
            println!("Loading questions... (r = retry, q = quit)");
        }
        QuizViewState::NoQuestions => {
            println!();
            println!("The question source returned nothing playable.");
            println!("(r = try again, q = quit)");
        }
        QuizViewState::Question(view) => render_question(view),
        QuizViewState::Finished(view) => {
            println!();
            println!("Answered {} / {}", view.score, view.total);
            println!("(r = play again, q = quit)");
        }
    }
}

async fn apply_intent(
    intent: QuizIntent,
    loader: &mut QuizLoader,
    slot: &mut Option<QuizSession>,
) {
    match intent {
        QuizIntent::SelectOption(index) => {
            if let Some(session) = slot.as_mut() {
                session.select_option(index);
            }
        }
        QuizIntent::Confirm => {
            if let Some(session) = slot.as_mut() {
                session.confirm_answer();
            }
        }
        QuizIntent::Advance => {
            let now = loader.now();
            if let Some(session) = slot.as_mut() {
                session.advance(now);
            }
        }
        QuizIntent::Restart => {
            if let Err(err) = loader.restart(slot).await {
                eprintln!("could not reload questions: {err}");
            }
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    log::info!(
        "question source: {} (category {}, {} questions)",
        args.config.source.endpoint,
        args.config.source.category,
        args.config.source.question_count
    );
    let client = OpenTriviaClient::new(args.config.source.clone());
    let mut loader = QuizLoader::new(Clock::default_clock(), Arc::new(client), args.config);
    let mut slot: Option<QuizSession> = None;

    if let Err(err) = loader.start_session(&mut slot).await {
        // Not fatal: the loading screen offers a retry.
        eprintln!("could not load questions: {err}");
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        render(&view_state(slot.as_ref()));
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match parse_input(&line?) {
            Input::Quit => break,
            Input::Intent(intent) => apply_intent(intent, &mut loader, &mut slot).await,
            Input::Unknown => println!("unrecognized input"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_decodes_selection_one_based() {
        assert_eq!(parse_input("1"), Input::Intent(QuizIntent::SelectOption(0)));
        assert_eq!(parse_input(" 3 "), Input::Intent(QuizIntent::SelectOption(2)));
        assert_eq!(parse_input("0"), Input::Unknown);
    }

    #[test]
    fn input_decodes_commands() {
        assert_eq!(parse_input(""), Input::Intent(QuizIntent::Confirm));
        assert_eq!(parse_input("c"), Input::Intent(QuizIntent::Confirm));
        assert_eq!(parse_input("n"), Input::Intent(QuizIntent::Advance));
        assert_eq!(parse_input("restart"), Input::Intent(QuizIntent::Restart));
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("bogus"), Input::Unknown);
    }
}
