//! Tally CLI - expression calculator and formula workbench

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use tally::prelude::*;
use tally::{format_number, number, parse_decimal};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Largest `--precision` accepted; output is padded to exactly this many digits
const MAX_PRECISION: i64 = 1000;

#[derive(Parser)]
#[command(name = "tally")]
#[command(
    author,
    version,
    about = "Evaluate arithmetic expressions and variable formulas"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read and return angles in degrees instead of radians
    #[arg(long, global = true, env = "TALLY_DEGREES")]
    degrees: bool,

    /// Output notation: plain, scientific or engineering
    #[arg(long, global = true, default_value_t = Notation::Plain)]
    notation: Notation,

    /// Fixed number of fractional digits in the output (at most 1000)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(0..=MAX_PRECISION))]
    precision: Option<u32>,

    /// Log filter, e.g. "debug" or "tally_formula=trace"
    #[arg(long, global = true, env = "TALLY_LOG", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression and print the result
    Eval {
        /// Expression text, e.g. "2(3+4)^2"
        expression: String,
    },

    /// Bind variables in a formula, then print the expression and its result
    Formula {
        /// Formula text, e.g. "Rate * Hours"
        formula: String,

        /// Variable binding (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE", value_parser = parse_binding)]
        bindings: Vec<(String, String)>,
    },

    /// List the variables a formula tracks
    Vars {
        /// Formula text
        formula: String,
    },

    /// Score a class with the built-in questionnaire (answers on stdin)
    Survey,
}

/// How results are rendered
#[derive(Debug, Clone, Copy)]
struct Output {
    notation: Notation,
    precision: Option<u32>,
}

impl Output {
    fn render(&self, value: &BigDecimal) -> String {
        format_number(value, self.notation, self.precision)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let options = if cli.degrees {
        EvaluationOptions::degrees()
    } else {
        EvaluationOptions::default()
    };
    let output = Output {
        notation: cli.notation,
        precision: cli.precision,
    };

    match cli.command {
        Commands::Eval { expression } => eval(&expression, &options, output),
        Commands::Formula { formula, bindings } => {
            evaluate_formula(&formula, &bindings, &options, output)
        }
        Commands::Vars { formula } => list_variables(&formula),
        Commands::Survey => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            survey(stdin.lock(), &mut stdout.lock(), &options, output)
        }
    }
}

fn init_logging(filter: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter '{}'", filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn parse_binding(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{arg}'")),
    }
}

fn eval(expression: &str, options: &EvaluationOptions, output: Output) -> Result<()> {
    let value = tally::evaluate_with(expression, options)
        .with_context(|| format!("Failed to evaluate '{}'", expression))?;
    println!("{}", output.render(&value));
    Ok(())
}

fn evaluate_formula(
    text: &str,
    bindings: &[(String, String)],
    options: &EvaluationOptions,
    output: Output,
) -> Result<()> {
    let formula = Formula::from(text);
    for (name, value) in bindings {
        formula.define_variable(name, value)?;
    }

    let expression = formula.expression();
    println!("{}", expression);

    let value = expression
        .evaluate_with(options)
        .with_context(|| format!("Failed to evaluate '{}'", expression))?;
    println!("{}", output.render(&value));
    Ok(())
}

fn list_variables(text: &str) -> Result<()> {
    let formula = Formula::from(text);
    let variables = formula.variables();

    if variables.is_empty() {
        eprintln!("No variables in '{}'", text);
        return Ok(());
    }

    for name in &variables {
        if tally::is_variable(name) {
            println!("{}", name);
        } else {
            println!("{}  (not bindable)", name);
        }
    }
    Ok(())
}

// Survey

const SURVEY_FORMULA: &str = "((F +(C/N) + H * (P /R *S)) *X)";
const SURVEY_WEIGHT: &str = "0.085";

#[derive(Debug, Clone, Copy)]
enum Answer {
    /// Whole number, bound as typed
    Integer,
    /// Yes/no, bound as 1 or 2
    YesNo { yes: u8, no: u8 },
    /// Whole percentage, bound as a fraction of one
    Percent,
}

const QUESTIONS: [(&str, &str, Answer); 7] = [
    ("F", "How fun will the class be? (1-10)", Answer::Integer),
    ("C", "How cool is the Professor? (1-10)", Answer::Integer),
    ("N", "Do I need this class to Graduate? (Yes/No)", Answer::YesNo { yes: 1, no: 2 }),
    ("H", "How many hours does this class start after I wake up? (0-23)", Answer::Integer),
    ("P", "What is the percent chance I will pass this class? (0-100)", Answer::Percent),
    ("R", "Is this a repeat, have I taken the class before? (Yes/No)", Answer::YesNo { yes: 2, no: 1 }),
    ("S", "Are any of my smart friends taking this class? (Yes/No)", Answer::YesNo { yes: 2, no: 1 }),
];

/// Whitespace-separated answers read lazily, one line at a time
struct Answers<R> {
    input: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Answers<R> {
    fn new(input: R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
        }
    }

    fn next_word(&mut self) -> Result<String> {
        loop {
            if let Some(word) = self.pending.pop_front() {
                return Ok(word);
            }
            let mut line = String::new();
            if self.input.read_line(&mut line).context("Failed to read answer")? == 0 {
                bail!("Input ended before every question was answered");
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}

fn answer_value(kind: Answer, word: &str) -> Result<String> {
    match kind {
        Answer::Integer => {
            let value: i64 = word
                .parse()
                .with_context(|| format!("Expected a whole number, got '{}'", word))?;
            Ok(value.to_string())
        }
        Answer::YesNo { yes, no } => {
            let value = if word.to_lowercase().contains('y') { yes } else { no };
            Ok(value.to_string())
        }
        Answer::Percent => {
            let percent = parse_decimal(word)
                .ok()
                .filter(|value| !tally::is_fractional(value))
                .with_context(|| format!("Expected a whole percentage, got '{}'", word))?;
            let fraction = number::div(&percent, &BigDecimal::from(100))?;
            Ok(format_number(&fraction, Notation::Plain, None))
        }
    }
}

fn survey<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    options: &EvaluationOptions,
    output: Output,
) -> Result<()> {
    let formula = Formula::from(SURVEY_FORMULA);
    formula.define_variable("X", SURVEY_WEIGHT)?;

    let mut answers = Answers::new(input);
    for (name, question, kind) in QUESTIONS {
        writeln!(out, "{}", question)?;
        out.flush()?;

        let word = answers.next_word()?;
        let value = answer_value(kind, &word)?;
        debug!(variable = name, answer = %word, value = %value, "survey answer");
        formula.define_variable(name, value)?;
    }

    let expression = formula.expression();
    writeln!(out, "{}", expression)?;
    match expression.evaluate_with(options) {
        Ok(value) => writeln!(out, "{}", output.render(&value))?,
        Err(e) => writeln!(out, "{}", e)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLAIN: Output = Output {
        notation: Notation::Plain,
        precision: None,
    };

    fn run_survey(input: &str) -> Result<String> {
        let mut out = Vec::new();
        survey(input.as_bytes(), &mut out, &EvaluationOptions::default(), PLAIN)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_parse_binding() {
        assert_eq!(
            parse_binding("Rate=12.5").unwrap(),
            ("Rate".to_string(), "12.5".to_string())
        );
        assert_eq!(
            parse_binding(" x = -2 ").unwrap(),
            ("x".to_string(), "-2".to_string())
        );
        assert!(parse_binding("=3").is_err());
        assert!(parse_binding("x").is_err());
    }

    #[test]
    fn test_answer_values() {
        assert_eq!(answer_value(Answer::Integer, "7").unwrap(), "7");
        assert!(answer_value(Answer::Integer, "seven").is_err());
        assert_eq!(answer_value(Answer::YesNo { yes: 1, no: 2 }, "Yes").unwrap(), "1");
        assert_eq!(answer_value(Answer::YesNo { yes: 1, no: 2 }, "nope").unwrap(), "2");
        assert_eq!(answer_value(Answer::YesNo { yes: 2, no: 1 }, "y").unwrap(), "2");
        assert_eq!(answer_value(Answer::Percent, "90").unwrap(), "0.9");
        assert_eq!(answer_value(Answer::Percent, "100").unwrap(), "1");
        assert!(answer_value(Answer::Percent, "9.5").is_err());
    }

    #[test]
    fn test_survey() {
        let transcript = run_survey("8\n7\nyes\n2 90\nno yes\n").unwrap();
        let lines: Vec<&str> = transcript.lines().collect();

        assert_eq!(lines.len(), QUESTIONS.len() + 2);
        assert_eq!(lines[0], "How fun will the class be? (1-10)");
        assert_eq!(lines[7], "((8 +(7/1) + 2 * (0.9 /1 *2)) *0.085)");
        assert_eq!(lines[8], "1.581");
    }

    #[test]
    fn test_survey_with_zero_answers() {
        let transcript = run_survey("0 0 no 0 0 no no").unwrap();
        assert_eq!(transcript.lines().last(), Some("0"));
    }

    #[test]
    fn test_precision_is_capped() {
        let cli = Cli::try_parse_from(["tally", "--precision", "1000", "eval", "1"]).unwrap();
        assert_eq!(cli.precision, Some(1000));

        for precision in ["1001", "4000000000", "-1"] {
            assert!(
                Cli::try_parse_from(["tally", "--precision", precision, "eval", "1"]).is_err(),
                "--precision {precision} should be rejected"
            );
        }
    }

    #[test]
    fn test_survey_needs_every_answer() {
        assert!(run_survey("8 7").is_err());
    }
}
