//! G-code Post Processor
//!
//! Converts tool-path commands into G-code for a specific CNC controller.
//!
//! This library provides:
//! - Controller presets and option-string configuration
//! - The command serializer (modal state, units, controller quirks)
//! - Program assembly and export

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod preset;
pub mod serializer;
pub mod toolpath;
pub mod units;

// Re-exports for clean public API
pub use config::Config;
pub use document::{export, export_with, Document, OutputTarget, Preview, Program};
pub use error::PostError;
pub use preset::{Preset, PresetRegistry};
pub use serializer::{serialize, RunContext, Serializer};
pub use toolpath::{Command, CoolantMode, Node, Operation};
pub use units::UnitSystem;
