//! Form validation and notification lifecycle core for UI scaffolds.
//!
//! State objects are constructed explicitly by the application root and
//! passed to whichever layer needs them. UI layers observe changes through
//! the channel receivers returned by the `subscribe` methods.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod error_handler;
pub mod notification;
pub mod observer;
pub mod validation;
pub mod validators;

pub use error::{FormstateError, Result};
