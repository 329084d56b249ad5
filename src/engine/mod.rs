//! Transcode driver: runs the engine port and feeds its events to the reporter

use tokio::sync::mpsc;

use crate::error::ConvertResult;
use crate::ports::{EngineEvent, ExecutePort, ProgressMode, Reporter};

pub mod progress;

pub use progress::{parse_progress_line, FrameCounter, ProgressLine, ProgressTracker};

/// Capacity of the engine event channel
pub const EVENT_BUFFER: usize = 64;

/// Run one transcode to completion while drawing progress.
///
/// The engine and the event consumer run concurrently on the current task;
/// the consumer stops once the engine drops its sender. Returns the number of
/// frames the engine reported.
pub async fn run_transcode(
    engine: &dyn ExecutePort,
    arguments: &[String],
    reporter: &dyn Reporter,
    mode: ProgressMode,
    verbose: bool,
) -> ConvertResult<u64> {
    let (sender, mut receiver) = mpsc::channel::<EngineEvent>(EVENT_BUFFER);
    let mut tracker = ProgressTracker::new(reporter, verbose);
    tracker.start(mode);

    let consume = async {
        while let Some(event) = receiver.recv().await {
            tracker.handle(event);
        }
        tracker.finish();
        tracker.frames()
    };

    let (result, frames) = tokio::join!(engine.transcode(arguments, sender), consume);
    result.map(|_| frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::testing::{FakeEngine, ProgressCall, RecordingReporter};

    #[tokio::test]
    async fn test_run_transcode_reports_progress() {
        let engine = FakeEngine::with_events(vec![
            EngineEvent::Progress { frame: 12 },
            EngineEvent::Progress { frame: 24 },
            EngineEvent::Finished,
        ]);
        let reporter = RecordingReporter::new();
        let arguments = vec!["-i".to_string(), "in".to_string(), "out".to_string()];

        let frames = run_transcode(&engine, &arguments, &reporter, ProgressMode::Indeterminate, false)
            .await
            .unwrap();

        assert_eq!(frames, 24);
        assert_eq!(engine.invocations(), vec![arguments]);
        assert_eq!(
            reporter.progress_calls(),
            vec![
                ProgressCall::Start(ProgressMode::Indeterminate),
                ProgressCall::Advance(12),
                ProgressCall::Advance(12),
                ProgressCall::Finish,
            ]
        );
    }

    #[tokio::test]
    async fn test_run_transcode_propagates_failure() {
        let engine = FakeEngine {
            failure: Some("Unknown encoder 'libfoo'".to_string()),
            ..FakeEngine::default()
        };
        let reporter = RecordingReporter::new();

        let result = run_transcode(
            &engine,
            &["-i".to_string()],
            &reporter,
            ProgressMode::Determinate { total: 10 },
            false,
        )
        .await;

        assert!(matches!(result, Err(ConvertError::EngineFailed { .. })));
        assert_eq!(reporter.progress_calls().last(), Some(&ProgressCall::Finish));
    }
}
