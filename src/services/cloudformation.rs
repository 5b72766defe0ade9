use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudformation::{
    error::{DisplayErrorContext, ProvideErrorMetadata},
    types::Capability,
    Client,
};
use tracing::debug;

use crate::model::{cli_error::CliError, stack::StackDescription};

/// The CloudFormation operations the installer drives.
#[async_trait]
pub trait StackApi {
    /// Returns `None` when no stack with this name exists.
    async fn describe_stack(&self, stack_name: &str) -> Result<Option<StackDescription>, CliError>;

    /// Starts creating the stack and returns its id.
    async fn create_stack(&self, stack_name: &str, template_body: &str)
        -> Result<String, CliError>;

    async fn delete_stack(&self, stack_name: &str) -> Result<(), CliError>;

    /// Reasons CloudFormation recorded against resources that failed, newest first.
    async fn failure_reasons(&self, stack_name: &str) -> Result<Vec<String>, CliError>;
}

pub struct CloudFormationClient {
    client: Client,
}

impl CloudFormationClient {
    pub fn new(config: &SdkConfig) -> Self {
        CloudFormationClient {
            client: Client::new(config),
        }
    }
}

fn api_error(operation: &'static str, e: impl std::error::Error) -> CliError {
    CliError::Api {
        operation,
        message: DisplayErrorContext(e).to_string(),
    }
}

#[async_trait]
impl StackApi for CloudFormationClient {
    async fn describe_stack(&self, stack_name: &str) -> Result<Option<StackDescription>, CliError> {
        let resp = match self.client.describe_stacks().stack_name(stack_name).send().await {
            Ok(resp) => resp,
            Err(e) => {
                // DescribeStacks reports a missing stack as a ValidationError
                let missing = e.as_service_error().map_or(false, |se| {
                    se.code() == Some("ValidationError")
                        && se.message().map_or(false, |m| m.contains("does not exist"))
                });
                if missing {
                    debug!(stack_name, "stack does not exist");
                    return Ok(None);
                }
                return Err(api_error("DescribeStacks", e));
            }
        };

        let Some(stack) = resp.stacks().first() else {
            return Ok(None);
        };

        let outputs: HashMap<String, String> = stack
            .outputs()
            .iter()
            .filter_map(|output| match (output.output_key(), output.output_value()) {
                (Some(key), Some(value)) => Some((key.to_owned(), value.to_owned())),
                _ => None,
            })
            .collect();

        Ok(Some(StackDescription {
            stack_id: stack.stack_id().unwrap_or_default().to_owned(),
            status: stack
                .stack_status()
                .map(|s| s.as_str().to_owned())
                .unwrap_or_default(),
            status_reason: stack.stack_status_reason().map(str::to_owned),
            outputs,
        }))
    }

    async fn create_stack(
        &self,
        stack_name: &str,
        template_body: &str,
    ) -> Result<String, CliError> {
        let resp = self
            .client
            .create_stack()
            .stack_name(stack_name)
            .template_body(template_body)
            .capabilities(Capability::CapabilityNamedIam)
            .send()
            .await
            .map_err(|e| api_error("CreateStack", e))?;

        Ok(resp.stack_id().unwrap_or(stack_name).to_owned())
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<(), CliError> {
        self.client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| api_error("DeleteStack", e))?;

        Ok(())
    }

    async fn failure_reasons(&self, stack_name: &str) -> Result<Vec<String>, CliError> {
        let resp = self
            .client
            .describe_stack_events()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| api_error("DescribeStackEvents", e))?;

        let reasons = resp
            .stack_events()
            .iter()
            .filter(|event| {
                event
                    .resource_status()
                    .map_or(false, |s| s.as_str().ends_with("_FAILED"))
            })
            .filter_map(|event| {
                let reason = event.resource_status_reason()?;
                let resource = event.logical_resource_id().unwrap_or("(unknown)");
                Some(format!("{resource}: {reason}"))
            })
            .collect();

        Ok(reasons)
    }
}
