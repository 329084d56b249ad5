//! Console reporter: log lines through tracing, progress through indicatif

use std::fmt::Write;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use tracing::{debug, error, info, warn};

use crate::ports::{ProgressMode, Reporter, Severity};

const BAR_TEMPLATE: &str =
    "{msg} [{bar:40.green/white}] {percent:>3}% ({pos}/{len} frames, {fps}) eta {eta}";
const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg} {pos} frames ({fps}) [{elapsed_precise}]";
const PROGRESS_MESSAGE: &str = "Transcoding file...";

fn fps_key(state: &ProgressState, w: &mut dyn Write) {
    let elapsed = state.elapsed().as_secs_f32();
    if state.pos() == 0 || elapsed < f32::EPSILON {
        let _ = write!(w, "0 fps");
    } else {
        let _ = write!(w, "{:.2} fps", state.pos() as f32 / elapsed);
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("fps", fps_key)
        .progress_chars("#>-")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .with_key("fps", fps_key)
}

/// Terminal reporter
pub struct ConsoleReporter {
    emit_level: Severity,
    hidden: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    /// Reporter drawing progress on stderr
    pub fn new(emit_level: Severity) -> Self {
        Self {
            emit_level,
            hidden: false,
            bar: Mutex::new(None),
        }
    }

    /// Reporter that never draws a progress bar
    pub fn hidden(emit_level: Severity) -> Self {
        Self {
            hidden: true,
            ..Self::new(emit_level)
        }
    }

    pub fn emit_level(&self) -> Severity {
        self.emit_level
    }

    /// A message passes when its severity is at least the emit level
    pub fn should_emit(&self, severity: Severity) -> bool {
        severity >= self.emit_level
    }

    /// Current bar position, if a bar is live
    pub fn position(&self) -> Option<u64> {
        self.bar
            .lock()
            .ok()
            .and_then(|bar| bar.as_ref().map(ProgressBar::position))
    }

    fn emit(severity: Severity, message: &str) {
        match severity {
            Severity::Debug => debug!("{}", message),
            Severity::Info => info!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Fatal => error!("{}", message),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn log(&self, severity: Severity, message: &str) {
        if !self.should_emit(severity) {
            return;
        }

        let live = self.bar.lock().ok().and_then(|bar| bar.clone());
        match live {
            Some(bar) => bar.suspend(|| Self::emit(severity, message)),
            None => Self::emit(severity, message),
        }
    }

    fn start_progress(&self, mode: ProgressMode) {
        let bar = match mode {
            // A zero-length bar would render as 0/0, show a spinner instead
            ProgressMode::Determinate { total } if total > 0 => {
                ProgressBar::new(total).with_style(bar_style())
            }
            _ => ProgressBar::new_spinner().with_style(spinner_style()),
        };
        bar.set_message(PROGRESS_MESSAGE);

        if self.hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
            bar.enable_steady_tick(Duration::from_millis(100));
        }

        if let Ok(mut slot) = self.bar.lock() {
            if let Some(previous) = slot.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn advance_progress(&self, frames: u64) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.inc(frames);
            }
        }
    }

    fn finish_progress(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}
