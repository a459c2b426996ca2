//! Preset Registry
//!
//! In-memory registry of controller presets. Built-in presets are embedded in
//! the binary; user presets are loaded from TOML files on disk and override
//! lower-priority presets of the same name.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::schema::{Preset, PresetFile};

/// Name of the preset used when none is requested
pub const DEFAULT_PRESET: &str = "uccnc";

const BUILT_IN_PRESETS: &[(&str, &str)] = &[
    ("uccnc", include_str!("../../resources/presets/uccnc.toml")),
    (
        "uccnc-atc",
        include_str!("../../resources/presets/uccnc-atc.toml"),
    ),
];

/// Loading priority of a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PresetPriority {
    BuiltIn = 0,
    UserGlobal = 1,
    Explicit = 2,
}

/// A registered preset with its source and priority
#[derive(Debug, Clone)]
pub struct LoadedPreset {
    pub preset: Preset,
    pub priority: PresetPriority,
    pub source_path: Option<PathBuf>,
}

/// Simple in-memory preset registry
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: HashMap<String, LoadedPreset>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self {
            presets: HashMap::new(),
        }
    }

    /// Registry holding only the embedded presets
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.add_built_in_presets();
        registry
    }

    /// Add a preset, replacing an existing one of equal or lower priority
    pub fn add_preset(&mut self, preset: Preset, priority: PresetPriority, source: Option<PathBuf>) {
        let should_load = match self.presets.get(&preset.name) {
            Some(existing) => priority >= existing.priority,
            None => true,
        };

        if should_load {
            self.presets.insert(
                preset.name.clone(),
                LoadedPreset {
                    preset,
                    priority,
                    source_path: source,
                },
            );
        }
    }

    /// Get a preset by name
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name).map(|loaded| &loaded.preset)
    }

    /// Get a preset together with its origin
    pub fn get_loaded(&self, name: &str) -> Option<&LoadedPreset> {
        self.presets.get(name)
    }

    /// The default preset, or any registered one if it is missing
    pub fn default_preset(&self) -> Option<&Preset> {
        self.get(DEFAULT_PRESET)
            .or_else(|| self.presets.values().next().map(|loaded| &loaded.preset))
    }

    /// List all registered preset names, sorted
    pub fn list_presets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Register the presets embedded in the binary
    pub fn add_built_in_presets(&mut self) {
        for (name, content) in BUILT_IN_PRESETS {
            match parse_preset_content(content, None) {
                Ok(preset) => self.add_preset(preset, PresetPriority::BuiltIn, None),
                Err(e) => log::error!("Failed to load built-in preset '{}': {:#}", name, e),
            }
        }
    }

    /// Load user presets from the global configuration directory
    pub fn load_user_presets(&mut self) -> Result<usize> {
        match user_preset_directory() {
            Some(dir) => self.load_directory(&dir, PresetPriority::UserGlobal),
            None => Ok(0),
        }
    }

    /// Load every `*.toml` preset of a directory, returning how many loaded
    ///
    /// A missing directory is not an error. Files that fail to parse are
    /// logged and skipped.
    pub fn load_directory(&mut self, dir: &Path, priority: PresetPriority) -> Result<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read preset directory: {}", dir.display()))?;

        let mut loaded = 0;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                continue;
            }
            match load_preset_file(&path) {
                Ok(preset) => {
                    log::debug!("Loaded preset '{}' from {}", preset.name, path.display());
                    self.add_preset(preset, priority, Some(path));
                    loaded += 1;
                }
                Err(e) => log::warn!("Failed to load preset file {}: {:#}", path.display(), e),
            }
        }

        Ok(loaded)
    }
}

/// `<config dir>/gcode-post/presets`
pub fn user_preset_directory() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gcode-post").join("presets"))
}

/// Load a single preset file
pub fn load_preset_file(path: &Path) -> Result<Preset> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preset file: {}", path.display()))?;
    parse_preset_content(&content, Some(path))
}

/// Parse preset content from a TOML string
pub fn parse_preset_content(content: &str, source_path: Option<&Path>) -> Result<Preset> {
    let file: PresetFile = toml::from_str(content).with_context(|| match source_path {
        Some(path) => format!("Failed to parse preset TOML: {}", path.display()),
        None => "Failed to parse built-in preset TOML".to_string(),
    })?;
    Ok(Preset::from(file))
}
