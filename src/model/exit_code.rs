/// Process exit codes for failed runs. Success, including a no-op uninstall,
/// always exits with 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureExitCode {
    /// Bad command line arguments, or a missing region or credentials
    Input = 1,
    /// A CloudFormation or STS call failed, or the stack ended in a failed state
    StackOperation = 2,
    /// The stack finished but its outputs could not be read or printed
    Output = 3,
}
