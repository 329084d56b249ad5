//! In-memory fakes for the ports, shared by unit tests

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{ConvertError, ConvertResult};
use crate::ports::{EngineEvent, ExecutePort, ProbePort, ProgressMode, Prompter, Reporter, Severity};
use crate::probe::StreamMetadata;

/// One scripted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Pick a 1-based slot
    Slot(usize),
    Yes,
    No,
    Text(String),
    /// Accept whatever default the prompt offers
    Default,
}

/// Prompter that replays a fixed list of answers
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub sections: Vec<String>,
    pub questions: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, question: &str) -> io::Result<Answer> {
        self.questions.push(question.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted answer for '{}'", question),
            )
        })
    }
}

impl Prompter for ScriptedPrompter {
    fn section(&mut self, title: &str) -> io::Result<()> {
        self.sections.push(title.to_string());
        Ok(())
    }

    fn choose(&mut self, title: &str, options: &[String], default: Option<usize>) -> io::Result<usize> {
        match self.next(title)? {
            Answer::Slot(slot) => Ok(slot),
            Answer::Default => default.ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "no default slot")
            }),
            other => panic!("expected a slot for '{}' ({:?}), got {:?}", title, options, other),
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        match self.next(question)? {
            Answer::Yes => Ok(true),
            Answer::No => Ok(false),
            Answer::Default => Ok(default),
            other => panic!("expected yes/no for '{}', got {:?}", question, other),
        }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        match self.next(question)? {
            Answer::Text(text) => Ok(text),
            Answer::Default => Ok(String::new()),
            other => panic!("expected text for '{}', got {:?}", question, other),
        }
    }
}

/// Reporter that keeps every message and progress call
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub messages: Mutex<Vec<(Severity, String)>>,
    pub progress: Mutex<Vec<ProgressCall>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressCall {
    Start(ProgressMode),
    Advance(u64),
    Finish,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == severity)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|(_, message)| message.contains(needle))
    }

    pub fn progress_calls(&self) -> Vec<ProgressCall> {
        self.progress.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn log(&self, severity: Severity, message: &str) {
        self.messages.lock().unwrap().push((severity, message.to_string()));
    }

    fn start_progress(&self, mode: ProgressMode) {
        self.progress.lock().unwrap().push(ProgressCall::Start(mode));
    }

    fn advance_progress(&self, frames: u64) {
        self.progress.lock().unwrap().push(ProgressCall::Advance(frames));
    }

    fn finish_progress(&self) {
        self.progress.lock().unwrap().push(ProgressCall::Finish);
    }
}

/// Probe returning fixed metadata
pub struct FakeProbe {
    pub metadata: StreamMetadata,
}

#[async_trait]
impl ProbePort for FakeProbe {
    async fn probe_streams(&self, _file_path: &str) -> ConvertResult<StreamMetadata> {
        Ok(self.metadata.clone())
    }
}

/// Engine that replays events and records every invocation
#[derive(Default)]
pub struct FakeEngine {
    pub events: Vec<EngineEvent>,
    pub failure: Option<String>,
    pub invocations: Mutex<Vec<Vec<String>>>,
}

impl FakeEngine {
    pub fn with_events(events: Vec<EngineEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExecutePort for FakeEngine {
    async fn transcode(
        &self,
        arguments: &[String],
        events: mpsc::Sender<EngineEvent>,
    ) -> ConvertResult<()> {
        self.invocations.lock().unwrap().push(arguments.to_vec());
        let _ = events.send(EngineEvent::Started(arguments.to_vec())).await;
        for event in &self.events {
            let _ = events.send(event.clone()).await;
        }
        match &self.failure {
            Some(message) => Err(ConvertError::EngineFailed {
                message: message.clone(),
                arguments: arguments.to_vec(),
                diagnostics: vec![message.clone()],
            }),
            None => Ok(()),
        }
    }
}
