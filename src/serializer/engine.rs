//! Serialization Engine
//!
//! Turns operation trees into G-code lines. Each leaf operation is serialized
//! with its own modal state; line numbers and warning counts come from the
//! run-wide [`RunContext`].

use std::collections::{BTreeMap, HashMap};

use crate::config::Config;
use crate::preset::MessagePolicy;
use crate::serializer::context::RunContext;
use crate::toolpath::{Command, Node, Operation};

/// Order in which parameters are emitted
pub const PARAMETER_ORDER: [char; 16] = [
    'X', 'Y', 'Z', 'A', 'B', 'C', 'I', 'J', 'K', 'R', 'F', 'S', 'T', 'H', 'L', 'Q',
];

/// Moves that never carry a feed rate
pub const RAPID_MOVES: &[&str] = &["G0", "G00"];

/// Cycles restating every parameter on each occurrence
pub const CANNED_CYCLES: &[&str] = &["G81", "G82", "G83"];

const SPINDLE_START: &str = "M3";
const TOOL_CHANGE: &str = "M6";

/// Modal state of one operation
#[derive(Debug, Clone, PartialEq)]
pub struct ModalState {
    last_command: Option<String>,
    values: HashMap<char, f64>,
}

impl Default for ModalState {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalState {
    /// Seeded with a synthetic first move so the first real position is
    /// always emitted
    pub fn new() -> Self {
        let values = HashMap::from([('X', -1.0), ('Y', -1.0), ('Z', -1.0), ('F', 0.0)]);
        Self {
            last_command: None,
            values,
        }
    }

    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    pub fn value(&self, letter: char) -> Option<f64> {
        self.values.get(&letter).copied()
    }

    /// Record a command, including parameters that were not emitted
    fn update(&mut self, name: &str, parameters: &BTreeMap<char, f64>) {
        self.last_command = Some(name.to_string());
        self.values.extend(parameters.iter().map(|(k, v)| (*k, *v)));
    }
}

/// Stateless formatter over a fixed configuration
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'a> {
    config: &'a Config,
}

impl<'a> Serializer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Serialize a node depth first, left to right
    pub fn serialize(&self, node: &Node, ctx: &mut RunContext) -> String {
        match node {
            Node::Compound { children, .. } => children
                .iter()
                .map(|child| self.serialize(child, ctx))
                .collect(),
            Node::Path(op) => self.serialize_operation(op, ctx),
            Node::Other { label } => {
                log::debug!("Skipping '{}': no tool path", label);
                String::new()
            }
        }
    }

    /// Serialize the commands of one leaf operation
    pub fn serialize_operation(&self, op: &Operation, ctx: &mut RunContext) -> String {
        let mut state = ModalState::new();
        let mut out = String::new();

        for command in &op.commands {
            self.format_command(command, &mut state, ctx, &mut out);
        }

        out
    }

    fn format_command(
        &self,
        command: &Command,
        state: &mut ModalState,
        ctx: &mut RunContext,
        out: &mut String,
    ) {
        let config = self.config;
        let name = command.name.trim();

        if command.is_comment() && !config.output_comments {
            return;
        }

        // Spindle start is always restated so its dwell follows a visible M3
        let spindle_start = name == SPINDLE_START;
        let mnemonic = !(config.modal && state.last_command() == Some(name)) || spindle_start;

        let mut tokens = Vec::new();
        if mnemonic {
            tokens.push(name.to_string());
        }

        for letter in PARAMETER_ORDER {
            if let Some(value) = command.get(letter) {
                if let Some(token) = self.format_parameter(name, letter, value, state) {
                    tokens.push(token);
                }
            }
        }

        state.update(name, &command.parameters);

        if spindle_start {
            out.push_str(&ctx.line(&tokens.join(" ")));
            out.push_str(&ctx.line(&config.spindle_dwell));
            return;
        }

        if name == TOOL_CHANGE {
            if !config.tool_change {
                log::debug!("Tool change disabled, dropping {}", name);
                return;
            }

            out.push_str(&ctx.block(&config.tool_change_block));

            if config.tool_length_offset {
                match command.get('T') {
                    Some(tool) => tokens.push(format!("G43 H{}", tool as i64)),
                    None => {
                        log::warn!("Tool change without tool number, no length offset emitted");
                        ctx.add_problem();
                    }
                }
            }
        }

        if command.is_message() {
            if !config.output_comments {
                ctx.add_warning();
                match config.message_policy {
                    MessagePolicy::Drop => {
                        log::warn!("Dropping message command: comments are suppressed");
                    }
                    MessagePolicy::DiscardOperation => {
                        log::warn!(
                            "Message command with comments suppressed, discarding {} bytes of operation output",
                            out.len()
                        );
                        out.clear();
                    }
                }
                return;
            }
            if mnemonic {
                tokens.remove(0);
            }
        }

        if !tokens.is_empty() {
            let line = ctx.line(&tokens.join(" "));
            log::trace!("parse: >>{}", line.trim_end());
            out.push_str(&line);
        }
    }

    /// Format a single parameter word, or `None` when it must be elided
    fn format_parameter(
        &self,
        name: &str,
        letter: char,
        value: f64,
        state: &ModalState,
    ) -> Option<String> {
        let config = self.config;
        let precision = config.precision;

        match letter {
            'F' => {
                if RAPID_MOVES.contains(&name) {
                    return None;
                }
                let unchanged = state.value('F') == Some(value);
                if unchanged && !config.repeat_arguments && !CANNED_CYCLES.contains(&name) {
                    return None;
                }
                let speed = config.units.velocity(value);
                (speed > 0.0).then(|| format!("F{:.*}", precision, speed))
            }
            'T' | 'H' | 'D' | 'S' => Some(format!("{}{}", letter, value as i64)),
            _ => {
                let unchanged = state.value(letter) == Some(value);
                if unchanged && !config.repeat_arguments && !CANNED_CYCLES.contains(&name) {
                    return None;
                }
                Some(format!(
                    "{}{:.*}",
                    letter,
                    precision,
                    config.units.length(value)
                ))
            }
        }
    }
}
