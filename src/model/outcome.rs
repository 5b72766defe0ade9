use console::style;
use serde::Serialize;

use super::{cli_output::TextOutput, credentials::AccessCredentials};

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Installed {
        stack_name: String,
        credentials: AccessCredentials,
    },
    AlreadyInstalled {
        stack_name: String,
        credentials: AccessCredentials,
    },
    Uninstalled {
        stack_name: String,
    },
    NothingToUninstall {
        stack_name: String,
    },
}

impl Outcome {
    pub fn credentials(&self) -> Option<&AccessCredentials> {
        match self {
            Self::Installed { credentials, .. } | Self::AlreadyInstalled { credentials, .. } => {
                Some(credentials)
            }
            Self::Uninstalled { .. } | Self::NothingToUninstall { .. } => None,
        }
    }
}

impl TextOutput for Outcome {
    fn to_text(&self) -> String {
        match self {
            Self::Installed {
                stack_name,
                credentials,
            } => format!(
                "{}\n{}",
                style(format!("Stack {stack_name} installed")).green().bold(),
                credential_lines(credentials)
            ),
            Self::AlreadyInstalled {
                stack_name,
                credentials,
            } => format!(
                "{}\n{}",
                style(format!("Stack {stack_name} is already installed")).yellow().bold(),
                credential_lines(credentials)
            ),
            Self::Uninstalled { stack_name } => style(format!("Stack {stack_name} uninstalled"))
                .green()
                .bold()
                .to_string(),
            Self::NothingToUninstall { stack_name } => style(format!(
                "Stack {stack_name} does not exist, nothing to uninstall"
            ))
            .yellow()
            .to_string(),
        }
    }
}

fn credential_lines(credentials: &AccessCredentials) -> String {
    [
        ("AWS Account ID", &credentials.account_id),
        ("Region", &credentials.region),
        ("Access Key ID", &credentials.access_key_id),
        ("Secret Access Key", &credentials.secret_access_key),
        ("Role ARN", &credentials.role_arn),
    ]
    .iter()
    .map(|(key, value)| {
        format!(
            "{} {}",
            style(format!("{key}:")).cyan().bold(),
            style(value).green()
        )
    })
    .collect::<Vec<_>>()
    .join("\n")
}
