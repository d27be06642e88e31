//! # IO Module
//!
//! Boundary between the calendar engine and whatever shows it to the user:
//! the notifier that surfaces outcomes, and the plain-text renderer used by
//! the terminal binary.

pub mod notifier;
pub mod terminal;

pub use notifier::{LogNotifier, Notification, Notifier, QueuedNotifier};
pub use terminal::render_view;
