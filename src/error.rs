use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of block a parse frame was opened by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Conditional,
    Loop,
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKind::Conditional => write!(f, "<? if ?>"),
            FrameKind::Loop => write!(f, "<? for ?>"),
        }
    }
}

/// Innermost open frame at the point a nesting error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFrame(pub Option<FrameKind>);

impl fmt::Display for OpenFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(kind) => write!(f, "innermost open block is {}", kind),
            None => write!(f, "no block is open"),
        }
    }
}

/// Errors raised while compiling or rendering a template.
///
/// Every parse-time variant carries the 1-based line on which it was detected.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("line {line}: missing query in <? {command} ?>")]
    MissingQuery { command: String, line: usize },
    #[error("line {line}: missing variable in <? for ?>")]
    MissingLoopVariable { line: usize },
    #[error("line {line}: missing filename in <? include ?>")]
    MissingFilename { line: usize },
    #[error("line {line}: missing ?> after <? {command} ?>")]
    MissingCloseMarker { command: String, line: usize },
    #[error("line {line}: unknown command {command}")]
    UnknownCommand { command: String, line: usize },
    #[error("line {line}: unexpected <? else ?> ({open})")]
    UnexpectedElse { open: OpenFrame, line: usize },
    #[error("line {line}: unexpected <? elsif / elif ?> ({open})")]
    UnexpectedElsif { open: OpenFrame, line: usize },
    #[error("line {line}: <? endfor ?> without matching <? for ?> ({open})")]
    UnmatchedEndfor { open: OpenFrame, line: usize },
    #[error("line {line}: <? endif ?> without matching <? if ?> ({open})")]
    UnmatchedEndif { open: OpenFrame, line: usize },
    #[error("line {line}: {open} is never closed")]
    UnclosedBlock { open: FrameKind, line: usize },
    #[error("template not found: {0}")]
    TemplateNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid render data: {0}")]
    InvalidData(#[from] ValueError),
}

impl TemplateError {
    /// Line of the template source the error points at, for parse errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            TemplateError::MissingQuery { line, .. }
            | TemplateError::MissingLoopVariable { line }
            | TemplateError::MissingFilename { line }
            | TemplateError::MissingCloseMarker { line, .. }
            | TemplateError::UnknownCommand { line, .. }
            | TemplateError::UnexpectedElse { line, .. }
            | TemplateError::UnexpectedElsif { line, .. }
            | TemplateError::UnmatchedEndfor { line, .. }
            | TemplateError::UnmatchedEndif { line, .. }
            | TemplateError::UnclosedBlock { line, .. } => Some(*line),
            TemplateError::TemplateNotFound(_)
            | TemplateError::Io(_)
            | TemplateError::InvalidData(_) => None,
        }
    }
}

/// Errors raised while converting caller data into a [`Value`](crate::value::Value).
#[derive(Error, Debug)]
pub enum ValueError {
    #[error("{0}")]
    Custom(String),
    #[error("map key must be a string")]
    NonStringKey,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl serde::ser::Error for ValueError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ValueError::Custom(msg.to_string())
    }
}
