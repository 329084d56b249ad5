//! The options interview
//!
//! States: select domain → per-domain questions → miscellaneous options
//! (overwrite, metadata stripping) → custom override → finalized. Defaults
//! mode skips straight to finalized after the overwrite check.
//!
//! Merge order, lowest precedence first: domain defaults, per-question
//! answers, forced domain flags (`-vn` / `-an`), the metadata-stripping flag,
//! then the custom-argument override.

use std::path::Path;

use crate::domain::catalog::QuestionCatalog;
use crate::domain::model::{
    Domain, EncodeTarget, FlagMap, InterviewMode, Question, QuestionKind, Selection,
};
use crate::error::{ConvertError, ConvertResult};
use crate::options::custom_args;
use crate::ports::{Prompter, Reporter};
use crate::probe::StreamMetadata;

/// Flag that drops every video stream from the output
pub const NO_VIDEO_FLAG: &str = "vn";
/// Flag that drops every audio stream from the output
pub const NO_AUDIO_FLAG: &str = "an";
/// Flag controlling global metadata copying
pub const METADATA_FLAG: &str = "map_metadata";

/// Result of a finished interview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatedOptions {
    /// Output flags, in assembly order
    pub flags: FlagMap,
    /// Whether an existing output file may be replaced
    pub overwrite: bool,
}

/// Drives the interview over a question catalogue
pub struct OptionsNegotiator<'a> {
    catalog: &'a QuestionCatalog,
    metadata: &'a StreamMetadata,
    reporter: &'a dyn Reporter,
}

impl<'a> OptionsNegotiator<'a> {
    pub fn new(
        catalog: &'a QuestionCatalog,
        metadata: &'a StreamMetadata,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            catalog,
            metadata,
            reporter,
        }
    }

    /// Run the interview and produce the final options.
    ///
    /// Returns [`ConvertError::UserDeclined`] when the user refuses to
    /// overwrite an existing output file.
    pub fn negotiate(
        &self,
        mode: InterviewMode,
        output_path: &Path,
        prompter: &mut dyn Prompter,
    ) -> ConvertResult<NegotiatedOptions> {
        match mode {
            InterviewMode::Defaults => self.negotiate_defaults(output_path, prompter),
            InterviewMode::Interactive => self.negotiate_interactive(output_path, prompter),
        }
    }

    fn negotiate_defaults(
        &self,
        output_path: &Path,
        prompter: &mut dyn Prompter,
    ) -> ConvertResult<NegotiatedOptions> {
        let overwrite = self.confirm_overwrite(output_path, prompter)?;

        let mut flags = self.catalog.defaults().clone();
        flags.set(METADATA_FLAG, "-1");

        Ok(NegotiatedOptions { flags, overwrite })
    }

    fn negotiate_interactive(
        &self,
        output_path: &Path,
        prompter: &mut dyn Prompter,
    ) -> ConvertResult<NegotiatedOptions> {
        let target = self.select_target(prompter)?;

        let mut answers = FlagMap::new();
        for domain in target.domains() {
            answers.merge(self.ask_domain(*domain, prompter)?);
        }

        prompter.section("Miscellaneous options")?;
        let overwrite = self.confirm_overwrite(output_path, prompter)?;
        let strip_metadata = prompter.confirm("Enable file metadata stripping", true)?;
        let custom = prompter.ask(
            "Custom options to ffmpeg ('-option value -option2 value...')\n -  Use empty field to skip",
        )?;

        let flags = merge_stages(
            FlagMap::new(),
            answers,
            forced_flags(target),
            metadata_flag(strip_metadata),
            custom_args::parse(&custom),
        );

        Ok(NegotiatedOptions { flags, overwrite })
    }

    fn select_target(&self, prompter: &mut dyn Prompter) -> ConvertResult<EncodeTarget> {
        let options = EncodeTarget::LABELS
            .iter()
            .enumerate()
            .map(|(index, label)| {
                if index + 1 == EncodeTarget::DEFAULT_SLOT {
                    format!("{} (default)", label)
                } else {
                    label.to_string()
                }
            })
            .collect::<Vec<_>>();

        let slot = prompter.choose("Encode for...", &options, Some(EncodeTarget::DEFAULT_SLOT))?;
        Ok(EncodeTarget::from_slot(slot).unwrap_or(EncodeTarget::Both))
    }

    /// Ask every question of one domain; an empty map if the user declines
    /// to continue without a matching source stream
    fn ask_domain(&self, domain: Domain, prompter: &mut dyn Prompter) -> ConvertResult<FlagMap> {
        let stream_present = match domain {
            Domain::Video => self.metadata.has_video(),
            Domain::Audio => self.metadata.has_audio(),
        };

        if !stream_present {
            self.reporter
                .warning(&format!("No {} stream detected in metadata!", domain));
            self.reporter.warning("- This may lead to unexpected issues");
            if !prompter.confirm("Would you like to continue?", false)? {
                self.reporter
                    .info(&format!("Skipping {} options", domain));
                return Ok(FlagMap::new());
            }
        }

        let heading = match domain {
            Domain::Video => "Video options",
            Domain::Audio => "Audio options",
        };
        prompter.section(heading)?;

        let mut answers = FlagMap::new();
        for question in self.catalog.questions(domain) {
            answers.merge(self.ask_question(question, prompter)?);
        }
        Ok(answers)
    }

    /// Resolve a single question into zero or one flag
    pub fn ask_question(
        &self,
        question: &Question,
        prompter: &mut dyn Prompter,
    ) -> ConvertResult<FlagMap> {
        let mut answer = FlagMap::new();

        match &question.kind {
            QuestionKind::Choice(choices) => {
                let mut options = choices
                    .iter()
                    .enumerate()
                    .map(|(index, choice)| {
                        if index + 1 == question.default_index {
                            format!("{} (default)", choice.label)
                        } else {
                            choice.label.clone()
                        }
                    })
                    .collect::<Vec<_>>();
                options.push("Custom value".to_string());
                options.push("Remove option".to_string());

                let slot = prompter.choose(&question.title, &options, Some(question.default_index))?;
                match question.resolve(slot) {
                    Some(Selection::Choice(choice)) => {
                        answer.set(question.flag.as_str(), choice.value.as_str());
                    }
                    Some(Selection::Custom) => {
                        let value = prompter.ask("Custom value")?;
                        answer.set(question.flag.as_str(), value);
                    }
                    Some(Selection::Remove) => {
                        self.reporter.info(&format!(
                            "Option '-{}' removed from ffmpeg arguments",
                            question.flag
                        ));
                    }
                    None => {
                        self.reporter.warning(&format!(
                            "Ignoring out-of-range answer {} for '{}'",
                            slot, question.title
                        ));
                    }
                }
            }
            QuestionKind::FreeInput => {
                let value = prompter.ask(&question.title)?;
                let value = value.trim();
                if !value.is_empty() {
                    answer.set(question.flag.as_str(), value);
                }
            }
        }

        Ok(answer)
    }

    /// Ask before replacing an existing output; declining cancels the job
    fn confirm_overwrite(&self, output_path: &Path, prompter: &mut dyn Prompter) -> ConvertResult<bool> {
        if !output_path.exists() {
            return Ok(false);
        }

        if prompter.confirm("Replace existing output path", false)? {
            Ok(true)
        } else {
            self.reporter.info("User declined operation, terminating");
            Err(ConvertError::UserDeclined)
        }
    }
}

fn forced_flags(target: EncodeTarget) -> FlagMap {
    let mut flags = FlagMap::new();
    match target {
        EncodeTarget::AudioOnly => flags.set_bare(NO_VIDEO_FLAG),
        EncodeTarget::VideoOnly => flags.set_bare(NO_AUDIO_FLAG),
        EncodeTarget::Both => {}
    }
    flags
}

fn metadata_flag(strip: bool) -> FlagMap {
    let mut flags = FlagMap::new();
    flags.set(METADATA_FLAG, if strip { "-1" } else { "0" });
    flags
}

/// Combine the interview stages, later stages overriding earlier ones
fn merge_stages(
    domain_defaults: FlagMap,
    answers: FlagMap,
    forced: FlagMap,
    metadata: FlagMap,
    custom: FlagMap,
) -> FlagMap {
    domain_defaults
        .merged(answers)
        .merged(forced)
        .merged(metadata)
        .merged(custom)
}
