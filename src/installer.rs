use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::{
    model::{
        cli_error::CliError,
        credentials::AccessCredentials,
        outcome::Outcome,
        stack::StackDescription,
        stack_name::StackName,
        stack_status::{self, Progress, StackOperation},
    },
    services::cloudformation::StackApi,
    template,
};

#[derive(Debug, Clone, Copy)]
pub struct WaitSettings {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

pub struct Installer<'a, A: StackApi> {
    api: &'a A,
    stack_name: &'a StackName,
    wait: WaitSettings,
    show_progress: bool,
}

impl<'a, A: StackApi> Installer<'a, A> {
    pub fn new(api: &'a A, stack_name: &'a StackName, wait: WaitSettings) -> Self {
        Installer {
            api,
            stack_name,
            wait,
            show_progress: false,
        }
    }

    /// Draw a spinner on stderr while waiting on CloudFormation.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn install(&self) -> Result<Outcome, CliError> {
        let name = self.stack_name.as_str();

        let stack = match self.api.describe_stack(name).await? {
            None => self.create_and_wait().await?,
            Some(existing) if stack_status::is_installed(&existing.status) => {
                info!(status = %existing.status, "stack already exists");
                return Ok(Outcome::AlreadyInstalled {
                    stack_name: name.to_owned(),
                    credentials: AccessCredentials::from_outputs(name, &existing.outputs)?,
                });
            }
            Some(existing) if existing.status == stack_status::CREATE_IN_PROGRESS => {
                info!("stack creation already in progress, waiting for it");
                self.wait_for(StackOperation::Create).await?
            }
            Some(existing) if existing.status == stack_status::DELETE_IN_PROGRESS => {
                info!("previous stack is still being deleted, waiting before creating");
                self.wait_for(StackOperation::Delete).await?;
                self.create_and_wait().await?
            }
            Some(existing) => {
                return Err(CliError::StackNotReady {
                    stack_name: name.to_owned(),
                    status: existing.status,
                })
            }
        };

        // a completed create always has a description
        let stack = stack.unwrap_or_default();
        Ok(Outcome::Installed {
            stack_name: name.to_owned(),
            credentials: AccessCredentials::from_outputs(name, &stack.outputs)?,
        })
    }

    async fn create_and_wait(&self) -> Result<Option<StackDescription>, CliError> {
        let body = template::render(self.stack_name);
        let stack_id = self.api.create_stack(self.stack_name.as_str(), &body).await?;
        info!(%stack_id, "stack creation started");
        self.wait_for(StackOperation::Create).await
    }

    pub async fn uninstall(&self) -> Result<Outcome, CliError> {
        let name = self.stack_name.as_str();

        match self.api.describe_stack(name).await? {
            None => {
                info!("stack does not exist");
                return Ok(Outcome::NothingToUninstall {
                    stack_name: name.to_owned(),
                });
            }
            Some(existing) if existing.status == stack_status::DELETE_IN_PROGRESS => {
                info!("stack deletion already in progress, waiting for it");
            }
            Some(existing) => {
                info!(stack_id = %existing.stack_id, status = %existing.status, "deleting stack");
                self.api.delete_stack(name).await?;
            }
        }

        self.wait_for(StackOperation::Delete).await?;

        Ok(Outcome::Uninstalled {
            stack_name: name.to_owned(),
        })
    }

    /// Polls the stack until `operation` reaches a terminal status. Returns
    /// the last description, which is `None` once a deleted stack is gone.
    async fn wait_for(
        &self,
        operation: StackOperation,
    ) -> Result<Option<StackDescription>, CliError> {
        let name = self.stack_name.as_str();
        let pb = self.progress_bar(operation);
        let started = Instant::now();

        loop {
            let stack = self.api.describe_stack(name).await?;
            let status = stack.as_ref().map(|s| s.status.as_str());
            let shown = status.unwrap_or(stack_status::DELETE_COMPLETE);
            pb.set_message(format!("{} stack {name}: {shown}", operation.verb()));

            match operation.classify(status) {
                Progress::Complete => {
                    pb.finish_and_clear();
                    info!(status = shown, "stack operation finished");
                    return Ok(stack);
                }
                Progress::Failed => {
                    pb.finish_and_clear();
                    let status = shown.to_owned();
                    let reasons = self.collect_reasons(stack).await;
                    return Err(CliError::StackFailed {
                        stack_name: name.to_owned(),
                        status,
                        reasons,
                    });
                }
                Progress::InProgress => {}
            }

            let waited = started.elapsed();
            if waited >= self.wait.timeout {
                pb.finish_and_clear();
                return Err(CliError::Timeout {
                    stack_name: name.to_owned(),
                    status: shown.to_owned(),
                    waited,
                });
            }

            debug!(status = shown, "stack still in progress");
            tokio::time::sleep(self.wait.poll_interval).await;
        }
    }

    async fn collect_reasons(&self, stack: Option<StackDescription>) -> Vec<String> {
        let mut reasons: Vec<String> = stack
            .and_then(|s| s.status_reason)
            .into_iter()
            .collect();

        match self.api.failure_reasons(self.stack_name.as_str()).await {
            Ok(events) => reasons.extend(events),
            Err(e) => warn!("could not read stack events: {e}"),
        }

        reasons
    }

    fn progress_bar(&self, operation: StackOperation) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
            pb.set_style(style);
        }
        pb.set_message(format!("{} stack {}", operation.verb(), self.stack_name));
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }
}
