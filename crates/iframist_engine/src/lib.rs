//! Iframist engine: IO capabilities and effect execution.
mod client;
mod clipboard;
mod types;
mod workflow;

pub use client::{classify_reply, scrape_endpoint, ReqwestScrapeClient, ScrapeClient};
pub use clipboard::{
    with_scratch, ArboardClipboard, ClipboardError, ClipboardWriter, CommandCopy, CopyService,
    LegacyCopy, ScratchField,
};
pub use types::{ClientSettings, ScrapeReplyBody, ScrapeRequest, TransportError, TransportKind};
pub use workflow::ScrapeWorkflow;
