use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::panic::Location;
use std::sync::OnceLock;

pub const IR_DEBUG_ENV: &str = "LAZYLOWER_IR_DEBUG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrDebugConfig {
    pub capture_frames: bool,
}

impl Default for IrDebugConfig {
    fn default() -> Self {
        Self {
            capture_frames: true,
        }
    }
}

impl IrDebugConfig {
    pub fn from_env() -> Self {
        match std::env::var(IR_DEBUG_ENV) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(value: &str) -> Self {
        let disabled = matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "off" | "no"
        );
        Self {
            capture_frames: !disabled,
        }
    }

    /// Process-wide configuration, read from the environment on first use.
    pub fn global() -> &'static IrDebugConfig {
        static CONFIG: OnceLock<IrDebugConfig> = OnceLock::new();
        CONFIG.get_or_init(IrDebugConfig::from_env)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub function: Option<String>,
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(function: Option<String>, file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            function,
            file: file.into(),
            line,
            column,
        }
    }

    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(None, location.file(), location.line(), location.column())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function {
            Some(function) => write!(
                f,
                "{} ({}:{}:{})",
                function, self.file, self.line, self.column
            ),
            None => write!(f, "{}:{}:{}", self.file, self.line, self.column),
        }
    }
}

/// Provenance attached to every IR node for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMetadata {
    pub scope: Option<String>,
    pub frames: Vec<SourceLocation>,
}

impl NodeMetadata {
    /// Records the active scope and, unless frame capture is disabled, the caller's location.
    #[track_caller]
    pub fn capture() -> Self {
        let frames = if IrDebugConfig::global().capture_frames {
            vec![SourceLocation::caller()]
        } else {
            Vec::new()
        };
        Self {
            scope: current_scope(),
            frames,
        }
    }

    pub fn with_frames(mut self, frames: Vec<SourceLocation>) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn frame_info(&self) -> String {
        if self.frames.is_empty() {
            return String::new();
        }
        let mut info = String::from("Frames:\n");
        for frame in &self.frames {
            info.push_str("  ");
            info.push_str(&frame.to_string());
            info.push('\n');
        }
        info
    }
}

thread_local! {
    static SCOPES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

pub fn current_scope() -> Option<String> {
    SCOPES.with(|scopes| {
        let scopes = scopes.borrow();
        if scopes.is_empty() {
            None
        } else {
            Some(scopes.join("/"))
        }
    })
}

/// Pushes a scope name for nodes created on this thread until dropped.
#[must_use = "the scope is popped when the pusher is dropped"]
pub struct ScopePusher {
    _private: (),
}

impl ScopePusher {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        SCOPES.with(|scopes| scopes.borrow_mut().push(name));
        Self { _private: () }
    }
}

impl Drop for ScopePusher {
    fn drop(&mut self) {
        SCOPES.with(|scopes| {
            scopes.borrow_mut().pop();
        });
    }
}
