use std::collections::HashMap;

use serde::Serialize;

use super::cli_error::CliError;

pub const ACCOUNT_ID: &str = "AccountId";
pub const REGION: &str = "Region";
pub const ACCESS_KEY_ID: &str = "AccessKeyId";
pub const SECRET_ACCESS_KEY: &str = "SecretAccessKey";
pub const ROLE_ARN: &str = "RoleArn";
pub const USER_NAME: &str = "UserName";
pub const ROLE_NAME: &str = "RoleName";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessCredentials {
    pub account_id: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub role_arn: String,
    pub user_name: String,
    pub role_name: String,
}

impl AccessCredentials {
    pub fn from_outputs(
        stack_name: &str,
        outputs: &HashMap<String, String>,
    ) -> Result<Self, CliError> {
        let get = |key: &'static str| {
            outputs
                .get(key)
                .cloned()
                .ok_or_else(|| CliError::MissingOutput {
                    stack_name: stack_name.to_owned(),
                    key,
                })
        };

        Ok(AccessCredentials {
            account_id: get(ACCOUNT_ID)?,
            region: get(REGION)?,
            access_key_id: get(ACCESS_KEY_ID)?,
            secret_access_key: get(SECRET_ACCESS_KEY)?,
            role_arn: get(ROLE_ARN)?,
            user_name: get(USER_NAME)?,
            role_name: get(ROLE_NAME)?,
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_outputs(stack_name: &str) -> HashMap<String, String> {
    HashMap::from([
        (ACCOUNT_ID.to_owned(), "123456789012".to_owned()),
        (REGION.to_owned(), "eu-west-1".to_owned()),
        (ACCESS_KEY_ID.to_owned(), "AKIAEXAMPLE".to_owned()),
        (SECRET_ACCESS_KEY.to_owned(), "c2VjcmV0".to_owned()),
        (
            ROLE_ARN.to_owned(),
            format!("arn:aws:iam::123456789012:role/{stack_name}-role"),
        ),
        (USER_NAME.to_owned(), format!("{stack_name}-user")),
        (ROLE_NAME.to_owned(), format!("{stack_name}-role")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_all_outputs() {
        let creds = AccessCredentials::from_outputs("demo", &sample_outputs("demo")).unwrap();
        assert_eq!(creds.account_id, "123456789012");
        assert_eq!(creds.access_key_id, "AKIAEXAMPLE");
        assert_eq!(creds.role_arn, "arn:aws:iam::123456789012:role/demo-role");
        assert_eq!(creds.user_name, "demo-user");
    }

    #[test]
    fn names_the_missing_output() {
        let mut outputs = sample_outputs("demo");
        outputs.remove(SECRET_ACCESS_KEY);

        let err = AccessCredentials::from_outputs("demo", &outputs).unwrap_err();
        assert!(
            matches!(err, CliError::MissingOutput { key: SECRET_ACCESS_KEY, .. }),
            "was {:?}",
            err
        );
    }

    #[test]
    fn serializes_camel_case() {
        let creds = AccessCredentials::from_outputs("demo", &sample_outputs("demo")).unwrap();
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["accessKeyId"], "AKIAEXAMPLE");
        assert_eq!(json["roleArn"], "arn:aws:iam::123456789012:role/demo-role");
    }
}
