//! Template registry: namespace to template directory and assets.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::TemplateResult;
use crate::namespace::namespace_for;

/// Name of the per-template asset directory. Never a template itself.
pub const ASSETS_DIR: &str = "assets";

/// Template config file inside each template directory.
pub const CONFIG_FILE: &str = "config.json";

/// Template body inside each template directory.
pub const HTML_FILE: &str = "html.hbs";

/// One template directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Dotted namespace, e.g. `billing.invoice`.
    pub namespace: String,
    /// Absolute path to the template directory.
    pub path: PathBuf,
    /// Asset key to absolute path.
    pub assets: BTreeMap<String, PathBuf>,
}

impl RegistryEntry {
    pub fn config_path(&self) -> PathBuf {
        self.path.join(CONFIG_FILE)
    }

    pub fn html_path(&self) -> PathBuf {
        self.path.join(HTML_FILE)
    }

    /// Look up an asset by key.
    pub fn asset(&self, key: &str) -> Option<&Path> {
        self.assets.get(key).map(PathBuf::as_path)
    }
}

/// Registry of all templates found under the templates directory.
///
/// Built once; directories added later are not picked up.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    entries: BTreeMap<String, RegistryEntry>,
    templates_dir: PathBuf,
}

impl TemplateRegistry {
    pub fn new(templates_dir: PathBuf) -> Self {
        Self {
            entries: BTreeMap::new(),
            templates_dir,
        }
    }

    /// Scan `templates_dir` for template directories.
    ///
    /// Every directory below the root is registered except `assets`
    /// directories and anything under them. Hidden directories are skipped.
    pub fn scan(templates_dir: &Path) -> TemplateResult<Self> {
        let mut registry = Self::new(templates_dir.to_path_buf());

        let walker = WalkDir::new(templates_dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_excluded(e));

        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let Some(namespace) = namespace_for(templates_dir, entry.path()) else {
                continue;
            };

            let assets = scan_assets(entry.path())?;
            debug!(
                "Registered template {} ({} assets)",
                namespace,
                assets.len()
            );

            registry.register(RegistryEntry {
                namespace,
                path: entry.path().to_path_buf(),
                assets,
            });
        }

        info!(
            "Loaded {} templates from {:?}",
            registry.len(),
            registry.templates_dir
        );
        Ok(registry)
    }

    /// Register an entry. A namespace already present is overwritten.
    pub fn register(&mut self, entry: RegistryEntry) -> Option<RegistryEntry> {
        let replaced = self.entries.insert(entry.namespace.clone(), entry);
        if let Some(previous) = &replaced {
            warn!(
                "Template namespace {} registered twice, {:?} replaced",
                previous.namespace, previous.path
            );
        }
        replaced
    }

    /// Get a template by namespace.
    pub fn get(&self, namespace: &str) -> Option<&RegistryEntry> {
        self.entries.get(namespace)
    }

    pub fn exists(&self, namespace: &str) -> bool {
        self.entries.contains_key(namespace)
    }

    /// All namespaces, sorted.
    pub fn namespaces(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn list(&self) -> Vec<&RegistryEntry> {
        self.entries.values().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }
}

fn is_excluded(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == ASSETS_DIR || name.starts_with('.')
}

/// Files directly inside `<dir>/assets`, keyed by file name.
///
/// Each file is also reachable by its stem (`logo` for `logo.png`) unless
/// another file already claims that key. Colliding keys are last write wins.
fn scan_assets(dir: &Path) -> TemplateResult<BTreeMap<String, PathBuf>> {
    let mut assets = BTreeMap::new();
    let assets_dir = dir.join(ASSETS_DIR);
    if !assets_dir.is_dir() {
        return Ok(assets);
    }

    let pattern = format!(
        "{}/*",
        Pattern::escape(&assets_dir.to_string_lossy())
    );

    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?
        .filter_map(|p| p.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    for file in &files {
        if let Some(name) = file.file_name() {
            assets.insert(name.to_string_lossy().into_owned(), file.clone());
        }
    }
    for file in &files {
        if let Some(stem) = file.file_stem() {
            assets
                .entry(stem.to_string_lossy().into_owned())
                .or_insert_with(|| file.clone());
        }
    }

    Ok(assets)
}
