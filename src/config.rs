//! Configuration management for an export run.
//!
//! Handles:
//! - Parsing the flag-syntax option string handed to an export
//! - Resolving defaults from the selected controller preset

use clap::Parser;

use crate::error::PostError;
use crate::preset::{MessagePolicy, Preset, PresetOptions, PresetRegistry, DEFAULT_PRESET};
use crate::units::UnitSystem;

/// Options accepted in the export option string
#[derive(Debug, Default, Parser)]
#[command(name = "gcode-post")]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Controller preset providing the defaults
    #[arg(long, help = "Controller preset (e.g., 'uccnc', 'uccnc-atc')")]
    pub preset: Option<String>,

    #[arg(long, help = "G-code program name")]
    pub name: Option<String>,

    #[arg(long, help = "Suppress header output")]
    pub no_header: bool,

    #[arg(long, conflicts_with = "comments", help = "Suppress comment output")]
    pub no_comments: bool,

    #[arg(long, help = "Force comment output")]
    pub comments: bool,

    #[arg(long, help = "Prefix every line with a line number")]
    pub line_numbers: bool,

    #[arg(long, help = "Don't pop up the editor before writing output")]
    pub no_show_editor: bool,

    #[arg(long, help = "Number of fractional digits for axis and feed values")]
    pub precision: Option<usize>,

    /// Literal `\n` sequences become line breaks
    #[arg(long, allow_hyphen_values = true, help = "Commands issued before the first operation")]
    pub preamble: Option<String>,

    #[arg(long, allow_hyphen_values = true, help = "Commands issued after the last operation")]
    pub postamble: Option<String>,

    #[arg(long, conflicts_with = "metric", help = "Lengths in inches, G20")]
    pub inches: bool,

    #[arg(long, help = "Lengths in millimetres, G21")]
    pub metric: bool,

    #[arg(long, help = "Suppress repeated command mnemonics")]
    pub modal: bool,

    #[arg(long, help = "Output G43 following tool changes")]
    pub tool_length_offset: bool,

    #[arg(long, help = "Enable M6 tool changes")]
    pub tool_changement: bool,

    #[arg(long, help = "Repeat unchanged axis arguments")]
    pub repeat: bool,
}

/// Effective configuration of one export run. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub preset_name: String,
    pub program_name: String,
    pub output_header: bool,
    pub output_comments: bool,
    pub line_numbers: bool,
    pub line_number_start: u64,
    pub line_number_step: u64,
    pub precision: usize,
    pub units: UnitSystem,
    /// Unit system of the preset; a different `units` is reported in the output
    pub baseline_units: UnitSystem,
    pub modal: bool,
    pub repeat_arguments: bool,
    pub tool_length_offset: bool,
    pub tool_change: bool,
    pub show_editor: bool,
    pub spindle_dwell: String,
    pub message_policy: MessagePolicy,
    pub keep_blank_lines: bool,
    pub preamble: String,
    pub postamble: String,
    pub pre_operation: String,
    pub post_operation: String,
    pub tool_change_block: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_options(DEFAULT_PRESET, &PresetOptions::default())
    }
}

impl Config {
    /// Configuration holding the preset defaults
    pub fn from_preset(preset: &Preset) -> Self {
        let mut config = Self::from_options(&preset.name, &preset.options);
        config.preamble = preset.blocks.preamble_for(config.output_comments).to_string();
        config.postamble = preset.blocks.postamble_for(config.output_comments).to_string();
        config.pre_operation = preset.blocks.pre_operation.clone();
        config.post_operation = preset.blocks.post_operation.clone();
        config.tool_change_block = preset.blocks.tool_change.clone();
        config
    }

    fn from_options(name: &str, options: &PresetOptions) -> Self {
        Self {
            preset_name: name.to_string(),
            program_name: options.program_name.clone(),
            output_header: options.output_header,
            output_comments: options.output_comments,
            line_numbers: options.line_numbers,
            line_number_start: options.line_number_start,
            line_number_step: options.line_number_step,
            precision: options.precision,
            units: options.units,
            baseline_units: options.units,
            modal: options.modal,
            repeat_arguments: options.repeat_arguments,
            tool_length_offset: options.tool_length_offset,
            tool_change: options.tool_change,
            show_editor: options.show_editor,
            spindle_dwell: options.spindle_dwell.clone(),
            message_policy: options.message_policy,
            keep_blank_lines: options.keep_blank_lines,
            preamble: String::new(),
            postamble: String::new(),
            pre_operation: String::new(),
            post_operation: String::new(),
            tool_change_block: String::new(),
        }
    }

    /// Parse a whitespace-separated option string such as
    /// `--precision 4 --modal --inches`
    pub fn from_arg_string(argstring: &str, registry: &PresetRegistry) -> Result<Self, PostError> {
        let args = Args::try_parse_from(argstring.split_whitespace())
            .map_err(|e| PostError::InvalidArguments(e.to_string().trim().to_string()))?;
        Self::from_args(args, registry)
    }

    /// Apply parsed arguments on top of the selected preset
    pub fn from_args(args: Args, registry: &PresetRegistry) -> Result<Self, PostError> {
        let preset = match &args.preset {
            Some(name) => registry
                .get(name)
                .ok_or_else(|| PostError::UnknownPreset(name.clone()))?,
            None => registry
                .default_preset()
                .ok_or_else(|| PostError::UnknownPreset(DEFAULT_PRESET.to_string()))?,
        };

        let mut config = Self::from_preset(preset);

        if let Some(name) = args.name {
            config.program_name = name;
        }
        if args.no_header {
            config.output_header = false;
        }
        if args.no_comments {
            config.output_comments = false;
        }
        if args.comments {
            config.output_comments = true;
        }
        if args.line_numbers {
            config.line_numbers = true;
        }
        if args.no_show_editor {
            config.show_editor = false;
        }
        if let Some(precision) = args.precision {
            config.precision = precision;
        }

        // The comment setting may have changed, pick the matching default blocks
        config.preamble = match args.preamble {
            Some(text) => unescape_newlines(&text),
            None => preset.blocks.preamble_for(config.output_comments).to_string(),
        };
        config.postamble = match args.postamble {
            Some(text) => unescape_newlines(&text),
            None => preset.blocks.postamble_for(config.output_comments).to_string(),
        };

        if args.inches {
            config.units = UnitSystem::Imperial;
        }
        if args.metric {
            config.units = UnitSystem::Metric;
        }
        if config.units_changed() {
            log::info!(
                "Units: {} [{}, {}], check your controller profile.",
                config.units,
                config.units.length_label(),
                config.units.velocity_label()
            );
        }

        if args.modal {
            config.modal = true;
        }
        if args.tool_length_offset {
            config.tool_length_offset = true;
        }
        if args.tool_changement {
            config.tool_change = true;
        }
        if args.repeat {
            config.repeat_arguments = true;
        }

        Ok(config)
    }

    /// Whether the unit system differs from the preset default
    pub fn units_changed(&self) -> bool {
        self.units != self.baseline_units
    }
}

fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}
