//! Progress accounting for a running transcode
//!
//! The engine writes `key=value` blocks to its progress pipe:
//!
//! ```text
//! frame=338
//! fps=104.73
//! out_time=00:00:14.014014
//! progress=continue
//! ```
//!
//! Only `frame` and `progress` matter here. The reporter's bar is advanced by
//! the difference between consecutive frame counts.

use crate::ports::{EngineEvent, ProgressMode, Reporter};

/// One meaningful line of the progress pipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLine {
    /// Frames encoded so far
    Frame(u64),
    /// End of a progress block; `true` for the final one
    BlockEnd { last: bool },
}

/// Parse a progress pipe line; unrelated or malformed lines are `None`
pub fn parse_progress_line(line: &str) -> Option<ProgressLine> {
    let (key, value) = line.trim().split_once('=')?;
    match key.trim() {
        "frame" => value.trim().parse().ok().map(ProgressLine::Frame),
        "progress" => Some(ProgressLine::BlockEnd {
            last: value.trim() == "end",
        }),
        _ => None,
    }
}

/// Last frame count observed, turning absolute counts into increments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounter {
    last: u64,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `frame` and return how far it advanced; counts that go
    /// backwards advance nothing
    pub fn observe(&mut self, frame: u64) -> u64 {
        let delta = frame.saturating_sub(self.last);
        self.last = self.last.max(frame);
        delta
    }

    pub fn last(&self) -> u64 {
        self.last
    }
}

/// Forwards engine events to a reporter
pub struct ProgressTracker<'a> {
    reporter: &'a dyn Reporter,
    counter: FrameCounter,
    verbose: bool,
    started: bool,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(reporter: &'a dyn Reporter, verbose: bool) -> Self {
        Self {
            reporter,
            counter: FrameCounter::new(),
            verbose,
            started: false,
        }
    }

    /// Show the progress display
    pub fn start(&mut self, mode: ProgressMode) {
        self.reporter.start_progress(mode);
        self.started = true;
    }

    /// Handle one engine event
    pub fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Started(arguments) => {
                self.reporter.info(&format!(
                    "Initiated FFmpeg task with the following command: {:?}",
                    arguments
                ));
            }
            EngineEvent::Progress { frame } => {
                let delta = self.counter.observe(frame);
                if delta > 0 && self.started {
                    self.reporter.advance_progress(delta);
                }
            }
            EngineEvent::Diagnostic(line) => {
                if self.verbose {
                    self.reporter.info(&format!("[FFmpeg] {}", line));
                }
            }
            EngineEvent::Finished => self.finish(),
        }
    }

    /// Remove the progress display; safe to call more than once
    pub fn finish(&mut self) {
        if self.started {
            self.reporter.finish_progress();
            self.started = false;
        }
    }

    /// Frames encoded so far
    pub fn frames(&self) -> u64 {
        self.counter.last()
    }
}
