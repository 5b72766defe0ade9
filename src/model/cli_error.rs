use std::time::Duration;

use thiserror::Error;

use super::exit_code::FailureExitCode;

const ASSUME_ROLE_HINT: &str = "The request to assume the role was denied. This usually means an \
organisation service control policy or a permissions boundary forbids sts:AssumeRole in this \
account. Ask your AWS administrator to allow it for the installed role, then try again.";

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid stack name '{name}': {reason}")]
    InvalidStackName { name: String, reason: &'static str },
    #[error("No AWS region configured, pass --region or set AWS_REGION")]
    MissingRegion,
    #[error("No usable AWS credentials found: {0}")]
    MissingCredentials(String),
    #[error("Unable to verify the AWS caller identity: {0}")]
    Identity(String),
    #[error("CloudFormation {operation} failed: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },
    #[error("Stack {stack_name} ended in {status}{}", format_reasons(.reasons))]
    StackFailed {
        stack_name: String,
        status: String,
        reasons: Vec<String>,
    },
    #[error("Stack {stack_name} is in state {status}, run again with --uninstall to remove it")]
    StackNotReady { stack_name: String, status: String },
    #[error(
        "Timed out after {} waiting for stack {stack_name}, last status was {status}",
        format_waited(.waited)
    )]
    Timeout {
        stack_name: String,
        status: String,
        waited: Duration,
    },
    #[error("Stack {stack_name} has no output named {key}")]
    MissingOutput { stack_name: String, key: &'static str },
    #[error("Could not assume role {role_arn} with the new access key: {message}")]
    Verify { role_arn: String, message: String },
}

impl CliError {
    pub fn exit_code(&self) -> FailureExitCode {
        match self {
            Self::InvalidStackName { .. }
            | Self::MissingRegion
            | Self::MissingCredentials(_)
            | Self::Identity(_) => FailureExitCode::Input,
            Self::Api { .. }
            | Self::StackFailed { .. }
            | Self::StackNotReady { .. }
            | Self::Timeout { .. }
            | Self::Verify { .. } => FailureExitCode::StackOperation,
            Self::Serialization(_) | Self::MissingOutput { .. } => FailureExitCode::Output,
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        assume_role_hint(&self.to_string())
    }
}

/// Recognises the error text AWS returns when an organisation policy blocks
/// `sts:AssumeRole`.
pub fn assume_role_hint(message: &str) -> Option<&'static str> {
    if message.contains("AccessDenied") && message.contains("sts:AssumeRole") {
        Some(ASSUME_ROLE_HINT)
    } else {
        None
    }
}

fn format_waited(waited: &Duration) -> String {
    humantime::format_duration(Duration::from_secs(waited.as_secs())).to_string()
}

fn format_reasons(reasons: &[String]) -> String {
    if reasons.is_empty() {
        String::new()
    } else {
        format!(":\n  {}", reasons.join("\n  "))
    }
}
