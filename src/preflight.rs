//! Checks run before touching CloudFormation: a region must resolve,
//! credentials must resolve, and STS must accept them.

use aws_config::{Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_sts::error::DisplayErrorContext;
use tracing::info;

use crate::{
    model::cli_error::CliError,
    services::sts::{self, CallerIdentity},
};

pub fn require_region(config: &SdkConfig) -> Result<&Region, CliError> {
    config
        .region()
        .filter(|region| !region.as_ref().is_empty())
        .ok_or(CliError::MissingRegion)
}

pub async fn require_credentials(config: &SdkConfig) -> Result<(), CliError> {
    let provider = config.credentials_provider().ok_or_else(|| {
        CliError::MissingCredentials("no credentials provider is configured".into())
    })?;

    provider
        .provide_credentials()
        .await
        .map_err(|e| CliError::MissingCredentials(DisplayErrorContext(e).to_string()))?;

    Ok(())
}

pub async fn run(config: &SdkConfig) -> Result<CallerIdentity, CliError> {
    let region = require_region(config)?;
    require_credentials(config).await?;

    let identity = sts::caller_identity(config).await?;
    info!(
        account = %identity.account,
        arn = %identity.arn,
        region = %region,
        "using AWS identity"
    );

    Ok(identity)
}
