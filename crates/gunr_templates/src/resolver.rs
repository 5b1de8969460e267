//! Root config discovery and registry construction.
//!
//! The resolver handles:
//! - Locating `.gunrrc` / `.gunrrc.json` under the config root
//! - Resolving `templatesDir` against the config root
//! - Scanning the templates directory into a [`TemplateRegistry`]

use std::env;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{read_config, RootConfig};
use crate::error::{TemplateError, TemplateResult};
use crate::registry::TemplateRegistry;

/// Root config file names, in lookup order.
pub const ROOT_CONFIG_FILES: [&str; 2] = [".gunrrc", ".gunrrc.json"];

/// Environment variable overriding the config root.
pub const ROOT_ENV_VAR: &str = "GUNR_ROOT";

/// Everything resolved at startup. Immutable afterwards.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Working directory of the process at resolution time.
    pub cwd: PathBuf,
    /// Directory holding the root config file.
    pub root_dir: PathBuf,
    pub root_config_path: PathBuf,
    pub root_config: RootConfig,
    /// Absolute templates directory.
    pub templates_dir: PathBuf,
    pub registry: TemplateRegistry,
}

/// Resolves the root config and template registry.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    root: PathBuf,
}

impl ConfigResolver {
    /// Create a resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a resolver from the environment.
    ///
    /// Uses `GUNR_ROOT` when set, otherwise the directory one level above the
    /// one holding the running executable.
    pub fn from_env() -> TemplateResult<Self> {
        if let Ok(root) = env::var(ROOT_ENV_VAR) {
            if !root.is_empty() {
                return Ok(Self::new(root));
            }
        }

        let exe = env::current_exe()?;
        let install_dir = exe.parent().unwrap_or_else(|| Path::new("."));
        let root = install_dir.parent().unwrap_or(install_dir);
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the root config file. The first existing candidate wins.
    pub fn locate_root_config(&self) -> TemplateResult<PathBuf> {
        ROOT_CONFIG_FILES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| TemplateError::RootConfigNotFound(self.root.join(ROOT_CONFIG_FILES[1])))
    }

    /// Load the root config and scan the templates directory.
    ///
    /// Fails when no root config exists or the templates directory is
    /// missing. Nothing can be loaded in either case.
    pub fn resolve(&self) -> TemplateResult<ResolvedConfig> {
        let cwd = env::current_dir()?;
        let root_dir = if self.root.is_absolute() {
            self.root.clone()
        } else {
            cwd.join(&self.root)
        };

        let root_config_path = Self::new(&root_dir).locate_root_config()?;
        let root_config: RootConfig = read_config(&root_config_path)?;

        let templates_dir = root_dir.join(&root_config.templates_dir);
        if !templates_dir.is_dir() {
            return Err(TemplateError::TemplatesDirNotFound(templates_dir));
        }

        let registry = TemplateRegistry::scan(&templates_dir)?;
        info!(
            "Resolved root config {:?} with {} templates",
            root_config_path,
            registry.len()
        );

        Ok(ResolvedConfig {
            cwd,
            root_dir,
            root_config_path,
            root_config,
            templates_dir,
            registry,
        })
    }
}
