use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use iframist_core::CopyPath;
use iframist_logging::{iframist_debug, iframist_trace};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
    #[error("fallback copy via `{command}` failed: {message}")]
    Fallback { command: String, message: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// The platform clipboard write capability.
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Legacy copy mechanism used when the clipboard write fails.
pub trait LegacyCopy: Send + Sync {
    fn copy_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via `arboard`. A handle is opened per write.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArboardClipboard;

impl ClipboardWriter for ArboardClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|err| ClipboardError::Rejected(err.to_string()))
    }
}

/// Copy text held only for the duration of one fallback copy.
///
/// The backing temporary file is deleted when the field is dropped.
pub struct ScratchField {
    file: NamedTempFile,
}

impl ScratchField {
    fn materialize(text: &str) -> Result<Self, ClipboardError> {
        let mut file = tempfile::Builder::new()
            .prefix("iframist-copy-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        iframist_trace!("materialized scratch field at {:?}", file.path());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// A fresh read handle positioned at the start of the text.
    pub fn reader(&self) -> io::Result<File> {
        self.file.reopen()
    }
}

impl Drop for ScratchField {
    fn drop(&mut self) {
        iframist_trace!("releasing scratch field at {:?}", self.file.path());
    }
}

/// Runs `use_field` with `text` materialized in a [`ScratchField`].
///
/// The field is released on every exit path, including errors and panics.
pub fn with_scratch<T>(
    text: &str,
    use_field: impl FnOnce(&ScratchField) -> Result<T, ClipboardError>,
) -> Result<T, ClipboardError> {
    let scratch = ScratchField::materialize(text)?;
    use_field(&scratch)
}

/// Pipes the text into a platform copy command such as `pbcopy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCopy {
    program: String,
    args: Vec<String>,
}

impl CommandCopy {
    /// Builds a command from an argv list; `None` when `argv` is empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn platform_default() -> Self {
        let argv: &[&str] = if cfg!(target_os = "macos") {
            &["pbcopy"]
        } else if cfg!(target_os = "windows") {
            &["clip"]
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            &["wl-copy"]
        } else {
            &["xclip", "-selection", "clipboard"]
        };
        Self {
            program: argv[0].to_string(),
            args: argv[1..].iter().map(|arg| arg.to_string()).collect(),
        }
    }

    pub fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl LegacyCopy for CommandCopy {
    fn copy_text(&self, text: &str) -> Result<(), ClipboardError> {
        with_scratch(text, |scratch| {
            let status = Command::new(&self.program)
                .args(&self.args)
                .stdin(Stdio::from(scratch.reader()?))
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map_err(|err| ClipboardError::Fallback {
                    command: self.describe(),
                    message: err.to_string(),
                })?;
            if status.success() {
                Ok(())
            } else {
                Err(ClipboardError::Fallback {
                    command: self.describe(),
                    message: format!("exited with {status}"),
                })
            }
        })
    }
}

/// Clipboard write with graceful degradation to a legacy mechanism.
pub struct CopyService {
    primary: Box<dyn ClipboardWriter>,
    fallback: Box<dyn LegacyCopy>,
}

impl CopyService {
    pub fn new(primary: Box<dyn ClipboardWriter>, fallback: Box<dyn LegacyCopy>) -> Self {
        Self { primary, fallback }
    }

    /// System clipboard first, then `fallback_command` or the platform default.
    pub fn platform(fallback_command: Option<&[String]>) -> Self {
        let fallback = fallback_command
            .and_then(CommandCopy::from_argv)
            .unwrap_or_else(CommandCopy::platform_default);
        iframist_debug!("clipboard fallback command: {}", fallback.describe());
        Self::new(Box::new(ArboardClipboard), Box::new(fallback))
    }

    /// Copies `text`, reporting which path delivered it.
    pub fn copy_text(&self, text: &str) -> Result<CopyPath, ClipboardError> {
        match self.primary.write_text(text) {
            Ok(()) => Ok(CopyPath::Clipboard),
            Err(err) => {
                iframist_debug!("clipboard write failed ({}); using fallback", err);
                self.fallback
                    .copy_text(text)
                    .map(|()| CopyPath::Fallback)
            }
        }
    }
}
