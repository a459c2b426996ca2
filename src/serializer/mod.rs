//! G-code Serializer
//!
//! The stateful translation from tool-path commands to G-code lines: unit
//! conversion, modal suppression, parameter ordering and controller quirks.

pub mod context;
pub mod engine;

pub use context::RunContext;
pub use engine::{ModalState, Serializer, CANNED_CYCLES, PARAMETER_ORDER, RAPID_MOVES};

use crate::config::Config;
use crate::toolpath::Node;

/// Serialize one node with the given configuration and run context
pub fn serialize(node: &Node, config: &Config, ctx: &mut RunContext) -> String {
    Serializer::new(config).serialize(node, ctx)
}
