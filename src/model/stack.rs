use std::collections::HashMap;

/// The parts of a CloudFormation `DescribeStacks` answer the installer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackDescription {
    pub stack_id: String,
    pub status: String,
    pub status_reason: Option<String>,
    pub outputs: HashMap<String, String>,
}
