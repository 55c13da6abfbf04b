//! Configuration file support for diffline.
//!
//! Settings come from the global `config.toml` (under the platform config
//! directory), then the workspace `diffline.toml`, then command-line flags.
//! Later sources win key by key.

use anyhow::{Context, Result};
use diffline_core::{GlyphPreset, GlyphSet};
use diffline_git::{Backend, SourceConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::display::OutputKind;

/// The workspace config file name
pub const CONFIG_FILE_NAME: &str = "diffline.toml";

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// One configuration file, as written on disk
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// `command` or `libgit2`
    pub backend: Option<Backend>,
    /// Git executable for the command backend
    pub git_binary: Option<PathBuf>,
    /// Extra arguments after `git diff --shortstat`
    pub extra_args: Option<Vec<String>>,
    /// Summarize staged changes
    pub staged: Option<bool>,
    /// Wait this long after a trigger to coalesce bursts ("150ms", "1s")
    #[serde(default, with = "humantime_serde")]
    pub debounce: Option<Duration>,
    /// Ignore changes to gitignored paths
    pub respect_gitignore: Option<bool>,
    /// `terminal`, `plain` or `json`
    pub output: Option<OutputKind>,
    #[serde(default)]
    pub glyphs: GlyphConfig,
}

/// `[glyphs]` table
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GlyphConfig {
    pub preset: Option<GlyphPreset>,
    pub added: Option<String>,
    pub removed: Option<String>,
    pub files: Option<String>,
}

impl FileConfig {
    /// Load a configuration file.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }

    /// Layer `other` on top of `self`; keys set in `other` win
    pub fn merge(self, other: FileConfig) -> FileConfig {
        FileConfig {
            backend: other.backend.or(self.backend),
            git_binary: other.git_binary.or(self.git_binary),
            extra_args: other.extra_args.or(self.extra_args),
            staged: other.staged.or(self.staged),
            debounce: other.debounce.or(self.debounce),
            respect_gitignore: other.respect_gitignore.or(self.respect_gitignore),
            output: other.output.or(self.output),
            glyphs: GlyphConfig {
                preset: other.glyphs.preset.or(self.glyphs.preset),
                added: other.glyphs.added.or(self.glyphs.added),
                removed: other.glyphs.removed.or(self.glyphs.removed),
                files: other.glyphs.files.or(self.glyphs.files),
            },
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<Backend>,
    pub output: Option<OutputKind>,
    pub glyphs: Option<GlyphPreset>,
    pub staged: bool,
}

/// Where configuration is read from
#[derive(Debug, Clone)]
pub struct ConfigSources {
    pub global: Option<PathBuf>,
    pub workspace: PathBuf,
}

impl ConfigSources {
    pub fn new(workspace_root: &Path, global: Option<PathBuf>) -> Self {
        Self {
            global,
            workspace: workspace_root.join(CONFIG_FILE_NAME),
        }
    }

    /// Default global config path: `<config dir>/diffline/config.toml`
    pub fn default_global() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("diffline").join("config.toml"))
    }

    /// Every file whose change should reload configuration
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.workspace.clone()];
        if let Some(ref global) = self.global {
            paths.push(global.clone());
        }
        paths
    }
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub backend: Backend,
    pub git_binary: PathBuf,
    pub extra_args: Vec<String>,
    pub staged: bool,
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,
    pub respect_gitignore: bool,
    pub output: OutputKind,
    pub glyphs: GlyphSet,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(FileConfig::default(), &Overrides::default())
    }
}

impl Settings {
    /// Read every configuration source and apply command-line overrides
    pub fn load(sources: &ConfigSources, overrides: &Overrides) -> Result<Self> {
        let global = match sources.global {
            Some(ref path) => FileConfig::load(path)?.unwrap_or_default(),
            None => FileConfig::default(),
        };
        let workspace = FileConfig::load(&sources.workspace)?.unwrap_or_default();

        Ok(Self::resolve(global.merge(workspace), overrides))
    }

    pub fn resolve(file: FileConfig, overrides: &Overrides) -> Self {
        let preset = overrides
            .glyphs
            .or(file.glyphs.preset)
            .unwrap_or_default();
        let mut glyphs = GlyphSet::from_preset(preset);
        if let Some(added) = file.glyphs.added {
            glyphs = glyphs.with_added(added);
        }
        if let Some(removed) = file.glyphs.removed {
            glyphs = glyphs.with_removed(removed);
        }
        if let Some(files) = file.glyphs.files {
            glyphs = glyphs.with_files(files);
        }

        Self {
            backend: overrides.backend.or(file.backend).unwrap_or_default(),
            git_binary: file.git_binary.unwrap_or_else(|| PathBuf::from("git")),
            extra_args: file.extra_args.unwrap_or_default(),
            staged: overrides.staged || file.staged.unwrap_or(false),
            debounce: file.debounce.unwrap_or(DEFAULT_DEBOUNCE),
            respect_gitignore: file.respect_gitignore.unwrap_or(true),
            output: overrides.output.or(file.output).unwrap_or_default(),
            glyphs,
        }
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            backend: self.backend,
            git_binary: self.git_binary.clone(),
            extra_args: self.extra_args.clone(),
            staged: self.staged,
        }
    }
}
