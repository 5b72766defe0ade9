pub mod cli_error;
pub mod cli_output;
pub mod credentials;
pub mod exit_code;
pub mod outcome;
pub mod stack;
pub mod stack_name;
pub mod stack_status;
