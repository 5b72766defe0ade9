use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::Credentials;
use aws_sdk_sts::{
    error::{DisplayErrorContext, ProvideErrorMetadata},
    Client,
};
use tracing::{debug, info};

use crate::model::{cli_error::CliError, credentials::AccessCredentials};

const SESSION_NAME: &str = "iam-stack-installer-verify";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}

/// Who the resolved credentials belong to, via STS GetCallerIdentity.
pub async fn caller_identity(config: &SdkConfig) -> Result<CallerIdentity, CliError> {
    let out = Client::new(config)
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| CliError::Identity(DisplayErrorContext(e).to_string()))?;

    Ok(CallerIdentity {
        account: out.account().unwrap_or_default().to_owned(),
        arn: out.arn().unwrap_or_default().to_owned(),
    })
}

#[derive(Debug, Clone, Copy)]
pub struct RetrySettings {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        // a new access key usually becomes usable within half a minute
        RetrySettings {
            attempts: 8,
            delay: Duration::from_secs(5),
        }
    }
}

/// Errors STS returns while a freshly created key or trust policy is still
/// propagating through IAM.
pub fn is_propagation_error(code: Option<&str>) -> bool {
    matches!(
        code,
        Some("InvalidClientTokenId" | "AccessDenied" | "SignatureDoesNotMatch")
    )
}

/// A failed AssumeRole call: the STS error code, if any, and the full message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleFailure {
    pub code: Option<String>,
    pub message: String,
}

#[async_trait]
pub trait RoleAssumer {
    /// Returns the ARN of the assumed-role session.
    async fn assume_role(&self, role_arn: &str) -> Result<String, AssumeRoleFailure>;
}

/// Calls STS with the installed access key rather than the caller's identity.
pub struct StaticKeyRoleAssumer {
    client: Client,
}

impl StaticKeyRoleAssumer {
    pub fn new(config: &SdkConfig, credentials: &AccessCredentials) -> Self {
        let static_credentials = Credentials::new(
            &credentials.access_key_id,
            &credentials.secret_access_key,
            None,
            None,
            "iam-stack-installer",
        );
        let sts_config = aws_sdk_sts::config::Builder::from(config)
            .credentials_provider(static_credentials)
            .build();

        StaticKeyRoleAssumer {
            client: Client::from_conf(sts_config),
        }
    }
}

#[async_trait]
impl RoleAssumer for StaticKeyRoleAssumer {
    async fn assume_role(&self, role_arn: &str) -> Result<String, AssumeRoleFailure> {
        let out = self
            .client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(SESSION_NAME)
            .duration_seconds(900)
            .send()
            .await
            .map_err(|e| AssumeRoleFailure {
                code: e.code().map(str::to_owned),
                message: DisplayErrorContext(e).to_string(),
            })?;

        Ok(out
            .assumed_role_user()
            .map(|user| user.arn().to_owned())
            .unwrap_or_default())
    }
}

/// Assumes the installed role using the installed access key, retrying while
/// IAM propagates the new key. Returns the ARN of the assumed-role session.
pub async fn verify_role(
    assumer: &impl RoleAssumer,
    role_arn: &str,
    retry: RetrySettings,
) -> Result<String, CliError> {
    let mut attempt = 1;
    loop {
        match assumer.assume_role(role_arn).await {
            Ok(arn) => {
                info!(%arn, attempt, "assumed installed role");
                return Ok(arn);
            }
            Err(failure) => {
                let retryable = is_propagation_error(failure.code.as_deref());
                if !retryable || attempt >= retry.attempts {
                    return Err(CliError::Verify {
                        role_arn: role_arn.to_owned(),
                        message: failure.message,
                    });
                }
                debug!(attempt, code = ?failure.code, "role not assumable yet, retrying");
                attempt += 1;
                tokio::time::sleep(retry.delay).await;
            }
        }
    }
}
