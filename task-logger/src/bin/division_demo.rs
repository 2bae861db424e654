use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use task_logger::{
    setup_logger, Classify, Instrument, InstrumentOptions, LoggerConfig, TracingSink,
};
use thiserror::Error;

const LOGGER_PATH: &str = "division_demo";

#[derive(Parser, Debug)]
#[command(author, version, about = "Divides two integers with lifecycle logging", long_about = None)]
struct Args {
    /// Dividend
    a: String,
    /// Divisor
    b: String,
    /// Logger configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,
    /// Log the elapsed time after each successful division
    #[arg(long)]
    timed: bool,
}

#[derive(Error, Debug)]
enum DivisionError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("operand '{input}' is not an integer")]
    ParseOperand {
        input: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("{a} / {b} overflows")]
    Overflow { a: i64, b: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DivisionErrorKind {
    DivisionByZero,
    ParseOperand,
    Overflow,
}

impl Classify for DivisionError {
    type Kind = DivisionErrorKind;

    fn kind(&self) -> DivisionErrorKind {
        match self {
            DivisionError::DivisionByZero => DivisionErrorKind::DivisionByZero,
            DivisionError::ParseOperand { .. } => DivisionErrorKind::ParseOperand,
            DivisionError::Overflow { .. } => DivisionErrorKind::Overflow,
        }
    }
}

fn parse_operand(input: &str) -> Result<i64, DivisionError> {
    input
        .trim()
        .parse()
        .map_err(|source| DivisionError::ParseOperand {
            input: input.to_string(),
            source,
        })
}

fn my_division_function(a: String, b: String) -> Result<i64, DivisionError> {
    let a = parse_operand(&a)?;
    let b = parse_operand(&b)?;
    if b == 0 {
        return Err(DivisionError::DivisionByZero);
    }
    a.checked_div(b).ok_or(DivisionError::Overflow { a, b })
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let logger_config = match &args.config {
        Some(path) => LoggerConfig::load(path)
            .with_context(|| format!("Failed to load logger config from {}", path))?,
        None => LoggerConfig::default(),
    };
    let _log_guard = setup_logger(&logger_config).context("Failed to set up logging")?;

    // Overflow is left out on purpose: it surfaces as an unknown failure.
    let options = InstrumentOptions::new()
        .with_info_message("Executing some code")
        .with_success_message("Successfully executed")
        .with_label_prefix(LOGGER_PATH)
        .with_timing(args.timed)
        .on_error(DivisionErrorKind::DivisionByZero, "You can't divide by 0")
        .on_error(
            DivisionErrorKind::ParseOperand,
            "Unsupported type for division operations",
        );

    let sink = Arc::new(TracingSink::from_config(&logger_config));
    let divide = Instrument::new(options, sink).wrap(my_division_function);

    let result = divide.call((args.a, args.b))?;
    println!("{}", result);
    Ok(())
}
