//! Terminal front-end: configuration, logging and the ratatui view.
mod app;
mod config;
mod logging;
mod ui;

pub use app::run_app;
