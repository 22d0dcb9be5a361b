//! Command implementations.

pub mod analyze;
pub mod ask;
pub mod extract;
pub mod kb;
pub mod profile;

pub use self::analyze::execute_analyze;
pub use self::ask::execute_ask;
pub use self::extract::execute_extract;
pub use self::kb::execute_kb;
pub use self::profile::execute_profile;

use crate::error::{CliError, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read command input from a file or stdin.
pub(crate) fn read_input(file: Option<&Path>, stdin: bool) -> Result<String> {
    if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(path) = file {
        Ok(fs::read_to_string(path)?)
    } else {
        Err(CliError::InvalidInput(
            "Must specify either --file or --stdin".to_string(),
        ))
    }
}
