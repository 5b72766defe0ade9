use std::{fmt, sync::OnceLock};

use regex::Regex;
use serde::Serialize;

use super::cli_error::CliError;

// IAM user and role names are capped at 64 characters, and we append "-user"/"-role"
pub const MAX_STACK_NAME_LEN: usize = 59;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StackName(String);

fn stack_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z][-A-Za-z0-9]*$").expect("stack name regex is valid"))
}

impl StackName {
    pub fn parse(name: &str) -> Result<StackName, CliError> {
        let invalid = |reason| CliError::InvalidStackName {
            name: name.to_owned(),
            reason,
        };

        if name.is_empty() {
            Err(invalid("must not be empty"))
        } else if name.len() > MAX_STACK_NAME_LEN {
            Err(invalid("must be at most 59 characters"))
        } else if !stack_name_regex().is_match(name) {
            Err(invalid(
                "must start with a letter and contain only letters, digits and hyphens",
            ))
        } else {
            Ok(StackName(name.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_name() {
        let name = "iam-access";
        let parsed = StackName::parse(name);
        assert!(
            matches!(parsed, Ok(_)),
            "Checking if '{}' parsing is Ok(()), was {:?} ",
            name,
            parsed
        );
    }

    #[test]
    fn rejects_empty_name() {
        let parsed = StackName::parse("");
        assert!(
            matches!(parsed, Err(CliError::InvalidStackName { .. })),
            "Checking if '' parsing is Err(..), was {:?} ",
            parsed
        );
    }

    #[test]
    fn rejects_leading_digit_and_underscores() {
        for name in ["1stack", "my_stack", "-stack", "stack name"] {
            let parsed = StackName::parse(name);
            assert!(
                matches!(parsed, Err(CliError::InvalidStackName { .. })),
                "Checking if '{}' parsing is Err(..), was {:?} ",
                name,
                parsed
            );
        }
    }

    #[test]
    fn rejects_names_too_long_for_iam() {
        let longest = "a".repeat(MAX_STACK_NAME_LEN);
        assert!(StackName::parse(&longest).is_ok());

        let too_long = "a".repeat(MAX_STACK_NAME_LEN + 1);
        assert!(StackName::parse(&too_long).is_err());
    }
}
