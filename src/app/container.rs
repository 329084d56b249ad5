use std::sync::{Arc, Mutex};

use crate::adapters::{FFmpegAdapter, FFprobeAdapter, TerminalPrompter, ToolPaths};
use crate::app::convert_interactor::ConvertInteractor;
use crate::domain::catalog::QuestionCatalog;
use crate::ports::{ExecutePort, ProbePort, Prompter, Reporter};

pub trait AppContainer: Send + Sync {
    fn convert_interactor(&self) -> Arc<ConvertInteractor>;
}

pub struct DefaultAppContainer {
    convert_interactor: Arc<ConvertInteractor>,
}

impl DefaultAppContainer {
    /// Wire the process-backed adapters and the terminal prompter
    pub fn new(
        tools: ToolPaths,
        catalog: QuestionCatalog,
        reporter: Arc<dyn Reporter>,
        verbose: bool,
    ) -> Self {
        let probe_port = Arc::new(FFprobeAdapter::new(tools.ffprobe).with_verbose(verbose));
        let execute_port = Arc::new(FFmpegAdapter::new(tools.ffmpeg));
        let prompter = Arc::new(Mutex::new(TerminalPrompter::stdio()));

        let convert_interactor = Arc::new(ConvertInteractor::new(
            probe_port as Arc<dyn ProbePort>,
            execute_port as Arc<dyn ExecutePort>,
            reporter,
            prompter as Arc<Mutex<dyn Prompter + Send>>,
            Arc::new(catalog),
        ));

        Self { convert_interactor }
    }
}

impl AppContainer for DefaultAppContainer {
    fn convert_interactor(&self) -> Arc<ConvertInteractor> {
        Arc::clone(&self.convert_interactor)
    }
}
