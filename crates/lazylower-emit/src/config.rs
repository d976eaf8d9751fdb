use serde::{Deserialize, Serialize};
use std::fmt;

/// What the emitters print and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterConfig {
    pub colors: bool,
    pub indent: IndentStyle,
    pub show_shapes: bool,
    pub show_locations: bool,
    pub verbosity: VerbosityLevel,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            colors: true,
            indent: IndentStyle::Spaces(2),
            show_shapes: true,
            show_locations: false,
            verbosity: VerbosityLevel::Normal,
        }
    }
}

impl EmitterConfig {
    /// Uncolored output, as written to files or compared in tests.
    pub fn plain() -> Self {
        Self {
            colors: false,
            ..Self::default()
        }
    }

    pub fn shapes_enabled(&self) -> bool {
        self.show_shapes || self.verbosity >= VerbosityLevel::Verbose
    }

    pub fn locations_enabled(&self) -> bool {
        self.show_locations || self.verbosity == VerbosityLevel::Debug
    }

    pub fn ids_enabled(&self) -> bool {
        self.verbosity == VerbosityLevel::Debug
    }

    pub fn program_shape_enabled(&self) -> bool {
        self.verbosity >= VerbosityLevel::Verbose
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    Spaces(usize),
    Tabs,
}

impl fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndentStyle::Spaces(n) => write!(f, "{:width$}", "", width = *n),
            IndentStyle::Tabs => f.write_str("\t"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VerbosityLevel {
    Quiet,
    Normal,
    Verbose,
    Debug,
}
