//! Tool-path data model
//!
//! Plain data handed to the post processor: commands grouped into operations,
//! operations grouped into compounds. No formatting logic lives here.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Name of the sentinel command carrying an operator message
pub const MESSAGE: &str = "message";

/// A single motion or machine command, e.g. `G1 {X: 10, F: 300}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Command {
    /// Controller mnemonic ("G0", "M6"), a `( ... )` comment or `message`
    pub name: String,
    /// Parameter letter to value; lengths in mm, feed rates in mm/min
    #[serde(default, deserialize_with = "deserialize_parameters")]
    pub parameters: BTreeMap<char, f64>,
}

/// Parameter keys are single letters, stored uppercase
fn deserialize_parameters<'de, D>(deserializer: D) -> Result<BTreeMap<char, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) if letter.is_ascii_alphabetic() => {
                    Ok((letter.to_ascii_uppercase(), value))
                }
                _ => Err(D::Error::custom(format!(
                    "invalid parameter letter '{}'",
                    key
                ))),
            }
        })
        .collect()
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Builder-style parameter setter
    pub fn with(mut self, letter: char, value: f64) -> Self {
        self.parameters.insert(letter.to_ascii_uppercase(), value);
        self
    }

    /// Comment commands carry their text in the name: `(text)`
    pub fn is_comment(&self) -> bool {
        self.name.starts_with('(')
    }

    pub fn is_message(&self) -> bool {
        self.name == MESSAGE
    }

    pub fn get(&self, letter: char) -> Option<f64> {
        self.parameters.get(&letter).copied()
    }
}

/// Coolant mode of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum CoolantMode {
    #[default]
    None,
    Mist,
    Flood,
}

/// A leaf operation holding commands directly
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Operation {
    pub label: String,
    /// Name of the tool controller driving this operation
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub coolant: CoolantMode,
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Operation {
    pub fn new(label: impl Into<String>, commands: Vec<Command>) -> Self {
        Self {
            label: label.into(),
            tool: None,
            coolant: CoolantMode::None,
            commands,
        }
    }
}

/// A node of the operation tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Ordered children, serialized depth first
    Compound { label: String, children: Vec<Node> },
    /// Leaf operation with a tool path
    Path(Operation),
    /// Anything without a tool path (stock, fixtures)
    Other { label: String },
}

impl Node {
    pub fn label(&self) -> &str {
        match self {
            Node::Compound { label, .. } | Node::Other { label } => label,
            Node::Path(op) => &op.label,
        }
    }

    /// Whether this node can be serialized as a tool path
    pub fn has_path(&self) -> bool {
        !matches!(self, Node::Other { .. })
    }

    pub fn tool(&self) -> Option<&str> {
        match self {
            Node::Path(op) => op.tool.as_deref(),
            _ => None,
        }
    }

    pub fn coolant(&self) -> CoolantMode {
        match self {
            Node::Path(op) => op.coolant,
            _ => CoolantMode::None,
        }
    }
}

impl From<Operation> for Node {
    fn from(op: Operation) -> Self {
        Node::Path(op)
    }
}
