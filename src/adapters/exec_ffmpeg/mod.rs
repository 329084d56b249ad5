//! FFmpeg execution adapter
//!
//! Runs `ffmpeg -hide_banner -nostats -progress pipe:1 <arguments>`. Progress
//! blocks arrive on stdout and diagnostics on stderr; both pipes are drained
//! by background tasks that feed the event channel, so the engine never
//! stalls on a full pipe.

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::adapters::tool_locator::FFMPEG;
use crate::engine::{parse_progress_line, ProgressLine};
use crate::error::{ConvertError, ConvertResult};
use crate::ports::{EngineEvent, ExecutePort};

/// Arguments placed before the assembled ones
pub const ENGINE_ARGS: [&str; 4] = ["-hide_banner", "-nostats", "-progress", "pipe:1"];

/// Stderr lines kept for error reports
const STDERR_TAIL: usize = 8;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    ffmpeg_path: PathBuf,
}

impl FFmpegAdapter {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    /// Complete command line, executable first
    pub fn command_line(&self, arguments: &[String]) -> Vec<String> {
        std::iter::once(self.ffmpeg_path.display().to_string())
            .chain(ENGINE_ARGS.iter().map(|arg| arg.to_string()))
            .chain(arguments.iter().cloned())
            .collect()
    }
}

#[async_trait]
impl ExecutePort for FFmpegAdapter {
    async fn transcode(
        &self,
        arguments: &[String],
        events: mpsc::Sender<EngineEvent>,
    ) -> ConvertResult<()> {
        let command_line = self.command_line(arguments);
        debug!("Spawning {:?}", command_line);

        let mut child = Command::new(&self.ffmpeg_path)
            .args(ENGINE_ARGS)
            .args(arguments)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| match error.kind() {
                io::ErrorKind::NotFound => ConvertError::EngineNotFound {
                    tool: FFMPEG.to_string(),
                },
                _ => ConvertError::Io(error),
            })?;

        let _ = events.send(EngineEvent::Started(command_line.clone())).await;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "ffmpeg stdout unavailable"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "ffmpeg stderr unavailable"))?;

        let progress = tokio::spawn(forward_progress(stdout, events.clone()));
        let diagnostics = tokio::spawn(forward_diagnostics(stderr, events));

        let status = tokio::select! {
            status = child.wait() => status?,
            Ok(()) = tokio::signal::ctrl_c() => {
                warn!("Interrupt received, stopping FFmpeg");
                child.kill().await?;
                progress.abort();
                diagnostics.abort();
                return Err(ConvertError::Interrupted);
            }
        };

        let _ = progress.await;
        let tail = diagnostics.await.unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            let message = tail
                .back()
                .cloned()
                .unwrap_or_else(|| format!("ffmpeg exited with {}", status));
            Err(ConvertError::EngineFailed {
                message,
                arguments: command_line,
                diagnostics: tail.into_iter().collect(),
            })
        }
    }
}

/// Turn the progress pipe into progress events
async fn forward_progress<R: AsyncRead + Unpin>(stdout: R, events: mpsc::Sender<EngineEvent>) {
    let mut lines = BufReader::new(stdout).lines();
    let mut listening = true;

    while let Ok(Some(line)) = lines.next_line().await {
        let event = match parse_progress_line(&line) {
            Some(ProgressLine::Frame(frame)) => EngineEvent::Progress { frame },
            Some(ProgressLine::BlockEnd { last: true }) => EngineEvent::Finished,
            _ => continue,
        };
        // Keep draining after the receiver is gone
        if listening && events.send(event).await.is_err() {
            listening = false;
        }
    }
}

/// Forward stderr lines and return the last few
async fn forward_diagnostics<R: AsyncRead + Unpin>(
    stderr: R,
    events: mpsc::Sender<EngineEvent>,
) -> VecDeque<String> {
    let mut lines = BufReader::new(stderr).lines();
    let mut tail = VecDeque::with_capacity(STDERR_TAIL);
    let mut listening = true;

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        if tail.len() == STDERR_TAIL {
            tail.pop_front();
        }
        tail.push_back(line.clone());
        if listening && events.send(EngineEvent::Diagnostic(line)).await.is_err() {
            listening = false;
        }
    }

    tail
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(mut receiver: mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Some(event) = receiver.recv().await {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_command_line() {
        let adapter = FFmpegAdapter::new(PathBuf::from("/usr/bin/ffmpeg"));
        let line = adapter.command_line(&["-i".to_string(), "in.mkv".to_string(), "out.mp4".to_string()]);
        assert_eq!(
            line,
            vec![
                "/usr/bin/ffmpeg",
                "-hide_banner",
                "-nostats",
                "-progress",
                "pipe:1",
                "-i",
                "in.mkv",
                "out.mp4",
            ]
        );
    }

    #[tokio::test]
    async fn test_forward_progress() {
        let pipe: &[u8] = b"frame=10\nfps=24.0\nprogress=continue\nframe=20\nout_time=00:00:01.0\nprogress=end\n";
        let (sender, receiver) = mpsc::channel(16);
        forward_progress(pipe, sender).await;

        assert_eq!(
            collect(receiver).await,
            vec![
                EngineEvent::Progress { frame: 10 },
                EngineEvent::Progress { frame: 20 },
                EngineEvent::Finished,
            ]
        );
    }

    #[tokio::test]
    async fn test_forward_diagnostics_keeps_tail() {
        let text = (1..=12).map(|n| format!("line {}\n", n)).collect::<String>();
        let (sender, receiver) = mpsc::channel(32);
        let tail = forward_diagnostics(text.as_bytes(), sender).await;

        assert_eq!(collect(receiver).await.len(), 12);
        assert_eq!(tail.len(), STDERR_TAIL);
        assert_eq!(tail.front().map(String::as_str), Some("line 5"));
        assert_eq!(tail.back().map(String::as_str), Some("line 12"));
    }

    #[tokio::test]
    async fn test_forwarding_survives_closed_receiver() {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        let tail = forward_diagnostics(&b"a\nb\n"[..], sender).await;
        assert_eq!(tail, VecDeque::from(vec!["a".to_string(), "b".to_string()]));
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FFmpegAdapter::new(dir.path().join("ffmpeg"));
        let (sender, _receiver) = mpsc::channel(4);
        let result = adapter.transcode(&["-version".to_string()], sender).await;
        assert!(matches!(result, Err(ConvertError::EngineNotFound { .. })));
    }

    #[cfg(unix)]
    mod scripted {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn fake_ffmpeg(dir: &std::path::Path, body: &str) -> PathBuf {
            let path = dir.join("ffmpeg");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn test_successful_run() {
            let dir = tempfile::tempdir().unwrap();
            let adapter = FFmpegAdapter::new(fake_ffmpeg(
                dir.path(),
                "echo frame=5; echo progress=continue; echo frame=9; echo progress=end; echo done >&2",
            ));
            let (sender, receiver) = mpsc::channel(16);
            adapter.transcode(&["out.mp4".to_string()], sender).await.unwrap();

            let events = collect(receiver).await;
            assert!(matches!(events.first(), Some(EngineEvent::Started(_))));
            assert!(events.contains(&EngineEvent::Progress { frame: 9 }));
            assert!(events.contains(&EngineEvent::Finished));
            assert!(events.contains(&EngineEvent::Diagnostic("done".to_string())));
        }

        #[tokio::test]
        async fn test_failed_run() {
            let dir = tempfile::tempdir().unwrap();
            let adapter = FFmpegAdapter::new(fake_ffmpeg(
                dir.path(),
                "echo 'width not divisible by 2 (1921x1080)' >&2; \
                 echo 'Error initializing output stream 0:0' >&2; \
                 echo 'Conversion failed!' >&2; exit 1",
            ));
            let (sender, _receiver) = mpsc::channel(16);
            let arguments = vec!["-c:v".to_string(), "libx264".to_string()];

            let error = adapter.transcode(&arguments, sender).await.unwrap_err();
            let report = error.notes().join("\n");
            assert!(report.contains("width not divisible by 2"));

            match error {
                ConvertError::EngineFailed {
                    message,
                    arguments,
                    diagnostics,
                } => {
                    assert_eq!(message, "Conversion failed!");
                    assert_eq!(arguments.last().map(String::as_str), Some("libx264"));
                    assert_eq!(diagnostics.len(), 3);
                    assert_eq!(diagnostics[0], "width not divisible by 2 (1921x1080)");
                }
                other => panic!("expected EngineFailed, got {:?}", other),
            }
        }
    }
}
