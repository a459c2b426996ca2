//! Controller Presets
//!
//! Named configuration profiles for the supported controller dialects.

pub mod registry;
pub mod schema;

pub use registry::{PresetPriority, PresetRegistry, DEFAULT_PRESET};
pub use schema::{MessagePolicy, Preset, PresetBlocks, PresetOptions};
