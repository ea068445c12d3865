// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates release-recovery.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const TEMPLATE: &str = r#"# Deployment plugins, in the order they run for every release phase.
# Each entry is a plugin name, or a [name, config] pair.
plugins:
  - npm
  - - github
    - draft: false

# Where plugins are installed. Each plugin is a directory holding one
# executable per phase it implements (publish, success, ...).
# plugin_dir: .release-recovery/plugins

# Remote the release tag is deleted from when publishing fails.
# remote: origin
"#;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;

    Ok(())
}
