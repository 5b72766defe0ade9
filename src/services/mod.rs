pub mod aws;
pub mod cloudformation;
pub mod sts;
