use clap::ValueEnum;
use console::style;
use serde::Serialize;

use super::{cli_error::CliError, exit_code::FailureExitCode};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Human readable rendering used by `OutputFormat::Text`.
pub trait TextOutput {
    fn to_text(&self) -> String;
}

pub struct CliResult<T: Serialize + TextOutput> {
    inner: Result<T, CliError>,
}

impl<T: Serialize + TextOutput> CliResult<T> {
    pub fn new(inner: Result<T, CliError>) -> Self {
        CliResult { inner }
    }

    pub fn print_or_exit(self, format: &OutputFormat) {
        match self.inner.and_then(|r| render(&r, format)) {
            Ok(text) => println!("{}", text),
            Err(e) => exit_with_error(e),
        }
    }
}

pub fn render<T: Serialize + TextOutput>(
    value: &T,
    format: &OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(value.to_text()),
        OutputFormat::Json => Ok(serde_json::to_string(value)?),
    }
}

fn exit_with_error(e: CliError) -> ! {
    eprintln!("{} {}", style("error:").for_stderr().red().bold(), e);
    if let Some(hint) = e.hint() {
        eprintln!("{} {}", style("hint:").for_stderr().yellow().bold(), hint);
    }
    let exit_code: FailureExitCode = e.exit_code();
    std::process::exit(exit_code as i32);
}
