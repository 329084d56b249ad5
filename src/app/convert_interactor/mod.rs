// Convert interactor - Orchestrates the probe, interview and transcode use case

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::domain::catalog::QuestionCatalog;
use crate::domain::model::InterviewMode;
use crate::engine::run_transcode;
use crate::error::{ConvertError, ConvertResult};
use crate::options::{ArgumentAssembler, NegotiatedOptions, OptionsNegotiator};
use crate::ports::{ExecutePort, ProbePort, ProgressMode, Prompter, Reporter};
use crate::probe::inspector::log_metadata;
use crate::probe::{display_or_na, StreamMetadata};
use crate::utils::Utils;


/// One conversion job
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: InterviewMode,
    /// Forward engine diagnostics to the reporter
    pub verbose: bool,
}

/// Outcome of a finished conversion
#[derive(Debug, Clone)]
pub struct ConvertResponse {
    /// Arguments the engine was run with
    pub arguments: Vec<String>,
    pub frames: u64,
    pub elapsed: Duration,
    /// Size of the written file, if it could be read back
    pub output_size: Option<u64>,
    pub output: PathBuf,
}

/// Interactor for the convert use case
pub struct ConvertInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    reporter: Arc<dyn Reporter>,
    prompter: Arc<Mutex<dyn Prompter + Send>>,
    catalog: Arc<QuestionCatalog>,
}

impl ConvertInteractor {
    /// Create new convert interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        reporter: Arc<dyn Reporter>,
        prompter: Arc<Mutex<dyn Prompter + Send>>,
        catalog: Arc<QuestionCatalog>,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            reporter,
            prompter,
            catalog,
        }
    }

    /// Probe, interview, then transcode
    pub async fn execute(&self, request: ConvertRequest) -> ConvertResult<ConvertResponse> {
        if !request.input.is_file() {
            return Err(ConvertError::InputNotFound {
                path: request.input.display().to_string(),
            });
        }
        let input = request.input.to_string_lossy().into_owned();
        let output = request.output.to_string_lossy().into_owned();

        let metadata = self.probe_port.probe_streams(&input).await?;
        let total_frames = metadata.total_frames();
        if total_frames.is_none() {
            self.reporter.warning("Failed retrieving total frames");
            self.reporter
                .warning("- Video frames are used to calculate remaining time");
            self.reporter.warning("- The progress bar will be indeterminate");
            self.reporter
                .warning("- Perhaps you are converting an audio file?");
        }
        log_metadata(&metadata, self.reporter.as_ref());

        let options = self.negotiate(&metadata, &request).await?;
        self.reporter.info("Finished gathering encoding options");

        let arguments = ArgumentAssembler::new()
            .with_overwrite(options.overwrite)
            .assemble(&options.flags, &input, &output);

        let started = Instant::now();
        let frames = run_transcode(
            self.execute_port.as_ref(),
            &arguments,
            self.reporter.as_ref(),
            ProgressMode::from_total(total_frames),
            request.verbose,
        )
        .await?;

        let response = ConvertResponse {
            arguments,
            frames,
            elapsed: started.elapsed(),
            output_size: std::fs::metadata(&request.output).ok().map(|meta| meta.len()),
            output: request.output,
        };
        self.report_summary(&response);
        Ok(response)
    }

    /// Run the interview on a blocking thread so a pending terminal read never
    /// stalls the runtime
    async fn negotiate(
        &self,
        metadata: &StreamMetadata,
        request: &ConvertRequest,
    ) -> ConvertResult<NegotiatedOptions> {
        let catalog = Arc::clone(&self.catalog);
        let reporter = Arc::clone(&self.reporter);
        let prompter = Arc::clone(&self.prompter);
        let metadata = metadata.clone();
        let output = request.output.clone();
        let mode = request.mode;

        tokio::task::spawn_blocking(move || -> ConvertResult<NegotiatedOptions> {
            let mut prompter = prompter
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "prompter lock poisoned"))?;
            OptionsNegotiator::new(&catalog, &metadata, reporter.as_ref()).negotiate(
                mode,
                &output,
                &mut *prompter,
            )
        })
        .await
        .map_err(|error| ConvertError::Io(io::Error::new(io::ErrorKind::Other, error)))?
    }

    fn report_summary(&self, response: &ConvertResponse) {
        self.reporter.info("Successfully executed mpeg-convert");
        self.reporter.info(&format!(
            "- Took {} seconds",
            Utils::format_seconds(response.elapsed)
        ));
        self.reporter.info(&format!(
            "- Took {} of space",
            display_or_na(response.output_size.map(Utils::readable_size))
        ));
        self.reporter.info(&format!(
            "- Output file saved to '{}'",
            response.output.display()
        ));
    }
}
