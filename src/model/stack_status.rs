//! Classification of CloudFormation stack statuses.
//!
//! CloudFormation owns the lifecycle; all we decide is whether a status seen
//! while waiting on one of our operations means keep polling, done, or failed.

pub const CREATE_COMPLETE: &str = "CREATE_COMPLETE";
pub const CREATE_IN_PROGRESS: &str = "CREATE_IN_PROGRESS";
pub const DELETE_COMPLETE: &str = "DELETE_COMPLETE";
pub const DELETE_FAILED: &str = "DELETE_FAILED";
pub const DELETE_IN_PROGRESS: &str = "DELETE_IN_PROGRESS";
pub const UPDATE_COMPLETE: &str = "UPDATE_COMPLETE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOperation {
    Create,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    InProgress,
    Complete,
    Failed,
}

impl StackOperation {
    /// `status` is `None` once the stack no longer exists.
    pub fn classify(self, status: Option<&str>) -> Progress {
        match (self, status) {
            (_, Some(status)) if status.ends_with("_IN_PROGRESS") => Progress::InProgress,
            (Self::Create, Some(CREATE_COMPLETE)) => Progress::Complete,
            // CREATE_FAILED, ROLLBACK_COMPLETE, ROLLBACK_FAILED, or the stack vanished
            (Self::Create, _) => Progress::Failed,
            (Self::Delete, None | Some(DELETE_COMPLETE)) => Progress::Complete,
            (Self::Delete, Some(_)) => Progress::Failed,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Self::Create => "Creating",
            Self::Delete => "Deleting",
        }
    }
}

/// A stack in one of these states already holds the installed resources.
pub fn is_installed(status: &str) -> bool {
    matches!(status, CREATE_COMPLETE | UPDATE_COMPLETE)
}
