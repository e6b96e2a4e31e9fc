//! CLI command implementations
//!
//! Commands return the process exit code: 0 success, 1 export or import
//! failure, 2 invalid configuration, 5 fatal error.

pub mod export;
pub mod import;
pub mod init;
pub mod serve;
pub mod validate;
