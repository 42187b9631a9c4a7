//! Terminal notification delivery.
//!
//! Renders titled messages to stderr with a BEL, so terminals that map
//! the bell to a desktop alert surface it there too.

use std::io::Write;

use owo_colors::OwoColorize;
use winddown_core::alert::Notifier;
use winddown_core::AlertError;

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, title: &str, body: &str) -> Result<(), AlertError> {
        let mut err = std::io::stderr().lock();
        writeln!(err, "\x07{} {}", title.bold().yellow(), body)
            .map_err(|e| AlertError::DeliveryFailed(e.to_string()))
    }
}
