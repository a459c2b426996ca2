//! Preset Schema Types
//!
//! A preset is a named controller profile: default options plus the text
//! blocks framing the generated program.

use serde::Deserialize;

use crate::units::UnitSystem;

/// Root preset file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PresetFile {
    pub preset: PresetMeta,
    #[serde(default)]
    pub options: PresetOptions,
    #[serde(default)]
    pub blocks: PresetBlocks,
}

/// Preset metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PresetMeta {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// What to do with a `message` command when comments are suppressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessagePolicy {
    /// Drop the message command only
    #[default]
    Drop,
    /// Throw away everything emitted so far for the current operation
    DiscardOperation,
}

/// Default formatting options of a preset
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresetOptions {
    pub program_name: String,
    pub output_header: bool,
    pub output_comments: bool,
    pub line_numbers: bool,
    pub line_number_start: u64,
    pub line_number_step: u64,
    pub precision: usize,
    pub units: UnitSystem,
    pub modal: bool,
    pub repeat_arguments: bool,
    pub tool_length_offset: bool,
    pub tool_change: bool,
    pub show_editor: bool,
    pub spindle_dwell: String,
    pub message_policy: MessagePolicy,
    /// Emit blank lines of text blocks instead of skipping them
    pub keep_blank_lines: bool,
}

impl Default for PresetOptions {
    fn default() -> Self {
        Self {
            program_name: "Programme".to_string(),
            output_header: true,
            output_comments: false,
            line_numbers: false,
            line_number_start: 0,
            line_number_step: 1,
            precision: 3,
            units: UnitSystem::Metric,
            modal: false,
            repeat_arguments: false,
            tool_length_offset: false,
            tool_change: true,
            show_editor: false,
            spindle_dwell: "G04 P5000".to_string(),
            message_policy: MessagePolicy::Drop,
            keep_blank_lines: false,
        }
    }
}

/// Literal text blocks of a preset
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresetBlocks {
    /// Preamble used when comments are enabled
    pub preamble: String,
    /// Preamble used when comments are suppressed
    pub preamble_plain: Option<String>,
    pub postamble: String,
    pub postamble_plain: Option<String>,
    pub pre_operation: String,
    pub post_operation: String,
    pub tool_change: String,
}

/// Runtime preset
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub options: PresetOptions,
    pub blocks: PresetBlocks,
}

impl From<PresetFile> for Preset {
    fn from(file: PresetFile) -> Self {
        Self {
            name: file.preset.name,
            version: file.preset.version,
            description: file.preset.description,
            options: file.options,
            blocks: file.blocks,
        }
    }
}

impl PresetBlocks {
    /// Preamble matching the effective comment setting
    pub fn preamble_for(&self, comments: bool) -> &str {
        match (&self.preamble_plain, comments) {
            (Some(plain), false) => plain,
            _ => &self.preamble,
        }
    }

    /// Postamble matching the effective comment setting
    pub fn postamble_for(&self, comments: bool) -> &str {
        match (&self.postamble_plain, comments) {
            (Some(plain), false) => plain,
            _ => &self.postamble,
        }
    }
}
