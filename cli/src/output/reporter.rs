//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `header()` prints the task and host being worked on
/// - `step()` shows a spinner on a TTY, otherwise prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ! {message}"`
/// - `pause()` closes the spinner so a prompt can use the terminal
///
/// Everything is suppressed when `ctx.quiet` is set.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    /// Close the spinner of the last step, marking it failed when `ok` is false.
    pub fn finish(&self, ok: bool) {
        if let Some(pb) = self.active.borrow_mut().take() {
            if ok {
                progress::finish_ok(&pb);
            } else {
                progress::finish_error(&pb);
            }
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn header(&self, message: &str) {
        self.finish(true);
        if !self.ctx.quiet {
            println!();
            self.ctx.header(message);
        }
    }

    fn step(&self, message: &str) {
        self.finish(true);
        if self.ctx.quiet {
            return;
        }
        if self.ctx.show_progress() {
            *self.active.borrow_mut() = Some(progress::spinner(message));
        } else {
            println!("  {} {message}", "→".style(self.ctx.styles.info));
        }
    }

    fn success(&self, message: &str) {
        self.finish(true);
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.finish(true);
        self.ctx.warn(message);
    }

    fn pause(&self) {
        self.finish(true);
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = self.active.get_mut().take() {
            pb.abandon();
        }
    }
}
