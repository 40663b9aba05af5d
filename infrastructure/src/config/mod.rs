//! Configuration file loading for agile-team
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AGILE_TEAM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./agile-team.toml` or `./.agile-team.toml`
//! 4. Global: `$XDG_CONFIG_HOME/agile-team/config.toml`
//! 5. Default values

mod file_config;
mod loader;
mod validation;

pub use file_config::{
    FileConfig, FileDispatchConfig, FileModelsConfig, FileProviderConfig, FileProvidersConfig,
};
pub use loader::ConfigLoader;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
