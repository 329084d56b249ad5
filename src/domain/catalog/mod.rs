//! Question catalogue: the static description of the interview
//!
//! The catalogue is pure data. It lists the video and audio questions and the
//! flag map used when every default is accepted (`--default`). Catalogues read
//! from a config file go through [`QuestionCatalog::from_specs`], which
//! validates every entry so a malformed catalogue fails at startup.

use serde::Deserialize;

use crate::domain::model::{Choice, Domain, FlagMap, Question, QuestionKind, QuestionSpec};
use crate::error::{ConvertError, ConvertResult};


/// Catalogue of interview questions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCatalog {
    video: Vec<Question>,
    audio: Vec<Question>,
    defaults: FlagMap,
}

/// Catalogue as written in the `[catalog]` table of a config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSpec {
    #[serde(default)]
    pub video: Vec<QuestionSpec>,
    #[serde(default)]
    pub audio: Vec<QuestionSpec>,
    #[serde(default)]
    pub defaults: FlagMap,
}

impl QuestionCatalog {
    /// Build a catalogue from already-typed questions, validating it
    pub fn new(video: Vec<Question>, audio: Vec<Question>, defaults: FlagMap) -> ConvertResult<Self> {
        let catalog = Self {
            video,
            audio,
            defaults,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build a catalogue from config file entries
    pub fn from_specs(spec: CatalogSpec) -> ConvertResult<Self> {
        let video = spec
            .video
            .into_iter()
            .map(question_from_spec)
            .collect::<ConvertResult<Vec<_>>>()?;
        let audio = spec
            .audio
            .into_iter()
            .map(question_from_spec)
            .collect::<ConvertResult<Vec<_>>>()?;
        Self::new(video, audio, spec.defaults)
    }

    /// Questions of one domain, in interview order
    pub fn questions(&self, domain: Domain) -> &[Question] {
        match domain {
            Domain::Video => &self.video,
            Domain::Audio => &self.audio,
        }
    }

    /// Flags used when all defaults are accepted
    pub fn defaults(&self) -> &FlagMap {
        &self.defaults
    }

    /// Check that every question is well-formed
    pub fn validate(&self) -> ConvertResult<()> {
        for (domain, questions) in [(Domain::Video, &self.video), (Domain::Audio, &self.audio)] {
            for question in questions {
                validate_question(domain, question)?;
            }
        }
        Ok(())
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        builtin().expect("built-in catalogue must pass validation")
    }
}

fn validate_question(domain: Domain, question: &Question) -> ConvertResult<()> {
    if question.flag.is_empty() {
        return Err(ConvertError::Catalog {
            message: format!("{} question '{}' has no engine option", domain, question.title),
        });
    }

    if let QuestionKind::Choice(choices) = &question.kind {
        if choices.is_empty() {
            return Err(ConvertError::Catalog {
                message: format!("{} question '{}' has no choices", domain, question.title),
            });
        }
        if question.default_index < 1 || question.default_index > question.remove_slot() {
            return Err(ConvertError::Catalog {
                message: format!(
                    "{} question '{}' has default {} outside 1..={}",
                    domain,
                    question.title,
                    question.default_index,
                    question.remove_slot()
                ),
            });
        }
    }

    Ok(())
}

fn question_from_spec(spec: QuestionSpec) -> ConvertResult<Question> {
    match spec.kind.to_lowercase().as_str() {
        "choice" => Ok(Question::choice(
            spec.title,
            &spec.option,
            spec.default,
            spec.choices,
        )),
        "input" => Ok(Question::free_input(spec.title, &spec.option)),
        other => Err(ConvertError::Catalog {
            message: format!(
                "question '{}' has unknown type '{}' (expected 'choice' or 'input')",
                spec.title, other
            ),
        }),
    }
}

fn choices(pairs: &[(&str, &str)]) -> Vec<Choice> {
    pairs
        .iter()
        .map(|(label, value)| Choice::new(*label, *value))
        .collect()
}

/// The catalogue shipped with the program, validated like any other
pub fn builtin() -> ConvertResult<QuestionCatalog> {
    let video = vec![
        Question::choice(
            "Video resolution...",
            "-s",
            2,
            choices(&[
                ("1280x720", "1280x720"),
                ("1920x1080", "1920x1080"),
                ("2560x1440", "2560x1440"),
                ("3840x2160", "3840x2160"),
            ]),
        ),
        Question::choice(
            "Video framerate...",
            "-r",
            1,
            choices(&[
                ("24 fps", "24"),
                ("30 fps", "30"),
                ("48 fps", "48"),
                ("60 fps", "60"),
            ]),
        ),
        // macOS users may prefer h264_videotoolbox / hevc_videotoolbox
        Question::choice(
            "Video codec...",
            "-c:v",
            2,
            choices(&[
                ("H.264", "libx264"),
                ("H.265", "libx265"),
                ("AV1", "libsvtav1"),
                ("VP9", "libvpx-vp9"),
            ]),
        ),
        Question::choice(
            "Video quality...",
            "-crf",
            2,
            choices(&[
                ("CRF 18", "18"),
                ("CRF 21", "21"),
                ("CRF 24", "24"),
                ("CRF 32", "32"),
            ]),
        ),
    ];

    let audio = vec![
        Question::choice(
            "Audio codec...",
            "-c:a",
            2,
            choices(&[
                ("AAC", "aac"),
                ("MP3", "libmp3lame"),
                ("ALAC", "alac"),
                ("FLAC", "flac"),
            ]),
        ),
        Question::choice(
            "Audio bitrate...",
            "-b:a",
            2,
            choices(&[
                ("96k", "96k"),
                ("128k", "128k"),
                ("192k", "192k"),
                ("320k", "320k"),
            ]),
        ),
        Question::choice(
            "Audio samplerate...",
            "-ar",
            2,
            choices(&[
                ("16000hz", "16000"),
                ("44100hz", "44100"),
                ("48000hz", "48000"),
                ("96000hz", "96000"),
            ]),
        ),
    ];

    let defaults = [
        ("r", "24"),
        ("s", "1920x1080"),
        ("c:v", "libx264"),
        ("c:a", "libmp3lame"),
        ("b:a", "192k"),
        ("ar", "44100"),
        ("crf", "21"),
        ("ac", "2"),
    ]
    .into_iter()
    .map(|(flag, value)| (flag, Some(value.to_string())))
    .collect();

    QuestionCatalog::new(video, audio, defaults)
}
