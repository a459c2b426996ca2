//! Document Assembly
//!
//! Wraps serializer output into a complete program: program name, header,
//! preamble, per-operation bracketing (tool, coolant, markers) and postamble.
//! Also owns the export entry points that pick the configuration, run an
//! optional preview and persist the result.

use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};

use crate::config::Config;
use crate::error::PostError;
use crate::preset::PresetRegistry;
use crate::serializer::{RunContext, Serializer};
use crate::toolpath::{CoolantMode, Node};

/// Interactive inspection of the program before it is written
pub trait Preview {
    /// Return the accepted (possibly edited) text, or `None` to keep the original
    fn review(&mut self, text: &str) -> Option<String>;
}

/// Where an export writes its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    /// Only return the text (the `-` sentinel)
    ReturnOnly,
}

impl From<&str> for OutputTarget {
    fn from(target: &str) -> Self {
        if target == "-" {
            OutputTarget::ReturnOnly
        } else {
            OutputTarget::File(PathBuf::from(target))
        }
    }
}

/// An assembled program and the tallies of its run
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub text: String,
    pub warnings: usize,
    pub problems: usize,
}

/// Program assembler for one configuration
#[derive(Debug, Clone)]
pub struct Document<'a> {
    config: &'a Config,
    arguments: String,
    timestamp: NaiveDateTime,
}

impl<'a> Document<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            arguments: String::new(),
            timestamp: Local::now().naive_local(),
        }
    }

    /// Option string echoed as a comment below the program name
    pub fn with_arguments(mut self, arguments: &str) -> Self {
        self.arguments = arguments.trim().to_string();
        self
    }

    /// Fix the header timestamp
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Assemble the program for a list of top-level operations
    pub fn assemble(&self, nodes: &[Node]) -> Result<Program, PostError> {
        if let Some(node) = nodes.iter().find(|n| !n.has_path()) {
            return Err(PostError::NotAPath {
                label: node.label().to_string(),
            });
        }

        let config = self.config;
        let comments = config.output_comments;
        let serializer = Serializer::new(config);
        let mut ctx = RunContext::new(config);

        log::info!("export: postprocessing...");
        let mut gcode = format!("%{}\n", config.program_name);

        if !self.arguments.is_empty() {
            gcode += &ctx.line(&format!("({} {})", env!("CARGO_PKG_NAME"), self.arguments));
        }

        if config.output_header {
            gcode += &ctx.line(&format!(
                "({} version {})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ));
            gcode += &ctx.line(&format!("({})", self.timestamp.format("%Y-%m-%d %H:%M:%S")));
        }

        if config.units_changed() {
            gcode += &ctx.line("(WARNING: Units default changed, check your controller profile)");
            ctx.add_warning();
        }

        if comments {
            gcode += &ctx.line("(preamble: begin)");
        }
        gcode += &ctx.block(&config.preamble);
        if comments {
            gcode += &ctx.line("(preamble: done)");
        }

        for node in nodes {
            let label = node.label();

            if comments {
                gcode += &ctx.line(&format!("(operation initialise: {})", label));
            }
            gcode += &ctx.block(&config.pre_operation);

            if let Some(tool) = node.tool() {
                gcode += &ctx.line(&format!("(Tool: {})", tool));
            }

            let coolant = node.coolant();
            match (coolant, comments) {
                (CoolantMode::Mist, true) => gcode += &ctx.line("M7 (coolant: mist on)"),
                (CoolantMode::Mist, false) => gcode += &ctx.line("M7"),
                (CoolantMode::Flood, true) => gcode += &ctx.line("M8 (coolant: flood on)"),
                (CoolantMode::Flood, false) => gcode += &ctx.line("M8"),
                (CoolantMode::None, _) => {}
            }

            if comments {
                gcode += &ctx.line(&format!("(operation start: {})", label));
            }
            gcode += &serializer.serialize(node, &mut ctx);
            if comments {
                gcode += &ctx.line(&format!("(operation done: {})", label));
            }

            gcode += &ctx.block(&config.post_operation);

            if coolant != CoolantMode::None {
                gcode += &ctx.line(if comments { "M9 (coolant: off)" } else { "M9" });
            }
            if comments {
                gcode += &ctx.line(&format!("(operation finalised: {})", label));
            }
        }

        if comments {
            gcode += &ctx.line("(postamble: begin)");
        }
        gcode += &ctx.block(&config.postamble);
        if comments {
            gcode += &ctx.line("(postamble: done)");
        }

        if ctx.warnings() > 0 || ctx.problems() > 0 {
            log::info!(
                "export: postprocessing: done, {} lines, warnings: {}, problems: {}, see GCode for details.",
                ctx.lines_emitted(),
                ctx.warnings(),
                ctx.problems()
            );
        } else {
            log::info!(
                "export: postprocessing: done, {} lines (none of the problems detected).",
                ctx.lines_emitted()
            );
        }

        Ok(Program {
            text: gcode,
            warnings: ctx.warnings(),
            problems: ctx.problems(),
        })
    }
}

/// Export with the built-in presets and no preview
pub fn export(nodes: &[Node], target: &OutputTarget, arguments: &str) -> Result<String, PostError> {
    export_with(nodes, target, arguments, &PresetRegistry::with_builtins(), None)
}

/// Parse the option string against `registry`, assemble, preview and persist
///
/// Nothing is written when the option string or the node list is rejected.
pub fn export_with(
    nodes: &[Node],
    target: &OutputTarget,
    arguments: &str,
    registry: &PresetRegistry,
    preview: Option<&mut dyn Preview>,
) -> Result<String, PostError> {
    let config = Config::from_arg_string(arguments, registry).inspect_err(|e| {
        log::error!("export: process arguments failed, '{}': {}", arguments, e);
    })?;

    let program = Document::new(&config)
        .with_arguments(arguments)
        .assemble(nodes)?;

    let text = match preview {
        Some(preview) if config.show_editor => {
            preview.review(&program.text).unwrap_or(program.text)
        }
        _ => program.text,
    };

    if let OutputTarget::File(path) = target {
        log::info!("export: writing to '{}'", path.display());
        fs::write(path, &text).map_err(|source| PostError::Io {
            path: path.clone(),
            source,
        })?;
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolpath::{Command, Operation};

    fn fixed_time() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-03-01 08:30:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn plain_config() -> Config {
        Config {
            output_header: false,
            line_numbers: false,
            output_comments: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_output_target_sentinel() {
        assert_eq!(OutputTarget::from("-"), OutputTarget::ReturnOnly);
        assert_eq!(
            OutputTarget::from("out.nc"),
            OutputTarget::File(PathBuf::from("out.nc"))
        );
    }

    #[test]
    fn test_minimal_program() {
        let config = Config {
            preamble: "G90\n\nG21".to_string(),
            postamble: "M30".to_string(),
            ..plain_config()
        };
        let nodes = vec![Node::from(Operation::new(
            "Profile",
            vec![Command::new("G0").with('Z', 5.0)],
        ))];

        let program = Document::new(&config).assemble(&nodes).unwrap();
        assert_eq!(program.text, "%Programme\nG90\nG21\nG0 Z5.000\nM30\n");
        assert_eq!(program.warnings, 0);
    }

    #[test]
    fn test_blank_block_lines_kept_on_request() {
        let config = Config {
            line_numbers: true,
            keep_blank_lines: true,
            preamble: "G90\n\nG21".to_string(),
            ..plain_config()
        };
        let program = Document::new(&config).assemble(&[]).unwrap();
        assert_eq!(program.text, "%Programme\nN0 G90\nN1\nN2 G21\n");
    }

    #[test]
    fn test_header_and_arguments() {
        let config = Config {
            output_header: true,
            ..plain_config()
        };
        let program = Document::new(&config)
            .with_arguments("--no-comments ")
            .with_timestamp(fixed_time())
            .assemble(&[])
            .unwrap();

        let lines: Vec<&str> = program.text.lines().collect();
        assert_eq!(lines[0], "%Programme");
        assert_eq!(lines[1], "(gcode-post --no-comments)");
        assert!(lines[2].starts_with("(gcode-post version "));
        assert_eq!(lines[3], "(2024-03-01 08:30:00)");
    }

    #[test]
    fn test_top_level_non_path_is_rejected() {
        let nodes = vec![Node::Other {
            label: "Stock".to_string(),
        }];
        let err = Document::new(&plain_config()).assemble(&nodes).unwrap_err();
        assert!(matches!(err, PostError::NotAPath { label } if label == "Stock"));
    }

    #[test]
    fn test_preview_replaces_text_only_when_enabled() {
        struct Lower;
        impl Preview for Lower {
            fn review(&mut self, text: &str) -> Option<String> {
                Some(text.to_lowercase())
            }
        }

        let registry = PresetRegistry::with_builtins();
        let mut preview = Lower;

        // uccnc shows the editor by default
        let text = export_with(&[], &OutputTarget::ReturnOnly, "", &registry, Some(&mut preview))
            .unwrap();
        assert!(text.starts_with("%programme"));

        let text = export_with(
            &[],
            &OutputTarget::ReturnOnly,
            "--no-show-editor",
            &registry,
            Some(&mut preview),
        )
        .unwrap();
        assert!(text.starts_with("%Programme"));
    }
}
