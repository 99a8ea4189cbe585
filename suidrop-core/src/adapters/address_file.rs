//! Address file reader
//!
//! One recipient per line. Blank lines are dropped, surrounding whitespace
//! and `\r` are trimmed, and file order is kept.

use std::path::Path;

use crate::domain::parse_address_list;
use crate::domain::result::{Error, Result};

/// Read recipient entries from `path`.
///
/// Entries are not validated here; an invalid address fails only its own
/// transfer.
pub fn read_address_file(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::not_found(format!(
            "Address file {} does not exist",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    Ok(parse_address_list(&content))
}
