//! Site configuration management for `folio.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── site       # [site]
//! │   ├── content    # [content]
//! │   ├── profile    # [profile]
//! │   ├── nav        # [nav]
//! │   ├── render     # [render]
//! │   └── serve      # [serve]
//! ├── error          # ConfigError, ConfigDiagnostics
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! A missing config file is not an error: every section has defaults, and
//! the site root falls back to `--root` or the current directory.

mod error;
pub mod section;
mod util;

use util::find_config_file;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{
    ContentConfig, NavConfig, ProfileConfig, RenderConfig, ServeConfig, SiteSectionConfig,
};

use crate::{
    cli::{Cli, Commands, RenderArgs},
    debug, log,
    utils::path::normalize_path,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file name looked up when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "folio.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Path of the loaded config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Site root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSectionConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub nav: NavConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from `--root` (or cwd) for the config file. The site
    /// root is `--root` if given, else the config file's directory, else cwd.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let search_from = cli.root.as_ref().map_or_else(|| cwd.clone(), |r| cwd.join(r));

        let config_path = find_config_file(&cli.config, &search_from);
        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None if cli.config != Path::new(DEFAULT_CONFIG) => {
                bail!("Config file '{}' not found", cli.config.display());
            }
            None => {
                debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG);
                Self::default()
            }
        };

        let root = match (&cli.root, &config_path) {
            (Some(_), _) => search_from,
            (None, Some(path)) => path.parent().map_or_else(|| cwd.clone(), Path::to_path_buf),
            (None, None) => cwd,
        };
        config.root = normalize_path(&root);
        config.config_path = config_path.map(|p| normalize_path(&p));

        config.apply_command_options(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Absolute path of the page markup.
    pub fn index_path(&self) -> PathBuf {
        self.root_join(&self.site.index)
    }

    /// Absolute path `folio render` writes to.
    pub fn output_path(&self) -> PathBuf {
        self.root_join(&self.render.output)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Render { args } => self.apply_render_args(args),
            Commands::Serve { interface, port, watch } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.watch, watch.as_ref());
            }
            Commands::Validate { .. } => {}
        }
    }

    fn apply_render_args(&mut self, args: &RenderArgs) {
        Self::update_option(&mut self.render.output, args.output.as_ref());
        if let Some(ref url) = args.base_url {
            self.site.base_url = Some(url.clone());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        if !self.root.is_dir() {
            diag.error_with_hint(
                "root",
                format!("`{}` is not a directory", self.root.display()),
                "pass the site directory with --root",
            );
        }

        self.site.validate(&mut diag);
        self.content.validate(&mut diag);
        self.profile.validate(&mut diag);
        self.nav.validate(&mut diag);
        self.serve.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text on top of the defaults.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
