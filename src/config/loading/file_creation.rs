use crate::{ListenPartyError, Result};
use std::{fs, path::Path};

const HEADER: &str = "# listenparty configuration file\n\n";

/// Writes a configuration file, creating its parent directory if needed
pub fn create_config_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ListenPartyError::io_at(&e, parent))?;
    }

    fs::write(path, format!("{HEADER}{contents}")).map_err(|e| ListenPartyError::io_at(&e, path))
}
