//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir
const APP_DIR: &str = "agile-team";
/// Project-level file names, first match wins
const PROJECT_FILES: [&str; 2] = ["agile-team.toml", ".agile-team.toml"];
/// Environment prefix; `__` separates nested keys
/// (e.g. `AGILE_TEAM_DISPATCH__CONCURRENCY=8`)
const ENV_PREFIX: &str = "AGILE_TEAM_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `AGILE_TEAM_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./agile-team.toml` or `./.agile-team.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/agile-team/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let project = Self::project_config_path();
        Self::load_from(
            Self::global_config_path().as_deref(),
            project.as_deref(),
            config_path,
        )
    }

    /// Merge explicit sources; missing global/project files are skipped,
    /// a missing explicit file is an error.
    pub fn load_from(
        global: Option<&Path>,
        project: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = project.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Box::new(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/agile-team/config.toml if set,
    /// otherwise the platform config dir.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&Path>) {
        eprintln!("Configuration sources (in priority order):");

        eprintln!("  [     ] Env:     {}*", ENV_PREFIX);

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            eprintln!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        match Self::project_config_path() {
            Some(path) => eprintln!("  [FOUND] Project: {}", path.display()),
            None => eprintln!("  [     ] Project: ./{} or ./{}", PROJECT_FILES[0], PROJECT_FILES[1]),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            eprintln!("  [{}] Global:  {}", mark, path.display());
        }

        eprintln!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.dispatch.concurrency, 4);
        assert!(config.models.team.is_none());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.to_string_lossy().contains("agile-team"));
    }

    #[test]
    fn later_sources_override_earlier_ones() {
        let dir = TempDir::new().unwrap();
        let global = write(
            &dir,
            "global.toml",
            "[dispatch]\nconcurrency = 2\ntimeout_seconds = 10\n[models]\ndefault_model = \"g:gemini-2.5-pro\"\n",
        );
        let project = write(&dir, "agile-team.toml", "[dispatch]\nconcurrency = 3\n");
        let explicit = write(&dir, "explicit.toml", "[dispatch]\ntimeout_seconds = 99\n");

        let config =
            ConfigLoader::load_from(Some(&global), Some(&project), Some(&explicit)).unwrap();
        assert_eq!(config.dispatch.concurrency, 3);
        assert_eq!(config.dispatch.timeout_seconds, 99);
        assert_eq!(config.models.default_model.as_deref(), Some("g:gemini-2.5-pro"));
    }

    #[test]
    fn missing_optional_files_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from(
            Some(&dir.path().join("nope.toml")),
            Some(&dir.path().join("agile-team.toml")),
            None,
        )
        .unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigLoader::load_from(None, None, Some(&dir.path().join("gone.toml")))
            .unwrap_err();
        assert!(err.to_string().contains("gone.toml"));
    }

    #[test]
    fn invalid_types_are_reported() {
        let dir = TempDir::new().unwrap();
        let bad = write(&dir, "bad.toml", "[dispatch]\nconcurrency = \"many\"\n");
        assert!(ConfigLoader::load_from(None, None, Some(&bad)).is_err());
    }

    #[test]
    fn project_file_discovery_prefers_plain_name() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigLoader::project_config_in(dir.path()).is_none());

        write(&dir, ".agile-team.toml", "");
        assert_eq!(
            ConfigLoader::project_config_in(dir.path()).unwrap(),
            dir.path().join(".agile-team.toml")
        );

        write(&dir, "agile-team.toml", "");
        assert_eq!(
            ConfigLoader::project_config_in(dir.path()).unwrap(),
            dir.path().join("agile-team.toml")
        );
    }
}
