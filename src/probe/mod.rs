//! Source media metadata as reported by the probe tool

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ConvertResult;

pub mod inspector;

/// Display value for a field that is missing or malformed
pub const UNAVAILABLE: &str = "N/A";

/// Kind of elementary stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
    Other(String),
}

impl StreamKind {
    fn from_codec_type(codec_type: Option<&str>) -> Self {
        match codec_type {
            Some("video") => StreamKind::Video,
            Some("audio") => StreamKind::Audio,
            Some(other) => StreamKind::Other(other.to_string()),
            None => StreamKind::Other("unknown".to_string()),
        }
    }
}

/// One stream record from the probe output.
///
/// Fields vary by stream kind, so the record stays loosely typed and every
/// read goes through [`StreamInfo::field`] and its typed variants. A missing
/// or malformed field is `None`, never a default value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct StreamInfo {
    fields: Map<String, Value>,
}

impl StreamInfo {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn kind(&self) -> StreamKind {
        StreamKind::from_codec_type(self.text("codec_type").as_deref())
    }

    /// Raw field value
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self.fields.get(name) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// Field as text; numbers are rendered as written
    pub fn text(&self, name: &str) -> Option<String> {
        match self.field(name)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    /// Field as a number; numeric strings (ffprobe's usual encoding) are parsed
    pub fn number(&self, name: &str) -> Option<f64> {
        let number = match self.field(name)? {
            Value::Number(number) => number.as_f64()?,
            Value::String(text) => text.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        number.is_finite().then_some(number)
    }

    /// Field as a non-negative integer
    pub fn integer(&self, name: &str) -> Option<u64> {
        match self.field(name)? {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse::<u64>().ok(),
            _ => None,
        }
    }
}

/// Render an optional field for display, `N/A` when unavailable
pub fn display_or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a rational of the form `N/D` (e.g. `30000/1001`), rounded to two
/// decimals. A bare number is accepted as-is. Zero denominators and
/// non-numeric parts yield `None`.
pub fn parse_rational(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let value = match raw.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = numerator.trim().parse::<f64>().ok()?;
            let denominator = denominator.trim().parse::<f64>().ok()?;
            if denominator == 0.0 {
                return None;
            }
            numerator / denominator
        }
        None => raw.parse::<f64>().ok()?,
    };
    value.is_finite().then(|| round2(value))
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<StreamInfo>,
}

/// Typed view over the probe result of one input file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamMetadata {
    streams: Vec<StreamInfo>,
    first_audio_index: Option<usize>,
    first_video_index: Option<usize>,
}

impl StreamMetadata {
    pub fn new(streams: Vec<StreamInfo>) -> Self {
        let first_audio_index = first_stream_of_kind(&streams, &StreamKind::Audio);
        let first_video_index = first_stream_of_kind(&streams, &StreamKind::Video);
        Self {
            streams,
            first_audio_index,
            first_video_index,
        }
    }

    /// Parse the JSON document printed by `ffprobe -print_format json -show_streams`
    pub fn from_probe_json(json: &str) -> ConvertResult<Self> {
        let output: ProbeOutput = serde_json::from_str(json)?;
        Ok(Self::new(output.streams))
    }

    pub fn streams(&self) -> &[StreamInfo] {
        &self.streams
    }

    /// Position of the first stream of `kind`; later streams are ignored
    pub fn first_stream_of_kind(&self, kind: &StreamKind) -> Option<usize> {
        match kind {
            StreamKind::Audio => self.first_audio_index,
            StreamKind::Video => self.first_video_index,
            other => first_stream_of_kind(&self.streams, other),
        }
    }

    pub fn first_audio_index(&self) -> Option<usize> {
        self.first_audio_index
    }

    pub fn first_video_index(&self) -> Option<usize> {
        self.first_video_index
    }

    pub fn has_audio(&self) -> bool {
        self.first_audio_index.is_some()
    }

    pub fn has_video(&self) -> bool {
        self.first_video_index.is_some()
    }

    /// The selected video stream, if any
    pub fn video_stream(&self) -> Option<&StreamInfo> {
        self.first_video_index.and_then(|index| self.streams.get(index))
    }

    /// The selected audio stream, if any
    pub fn audio_stream(&self) -> Option<&StreamInfo> {
        self.first_audio_index.and_then(|index| self.streams.get(index))
    }

    /// Duration of the selected video stream in seconds
    pub fn total_seconds(&self) -> Option<f64> {
        self.video_stream()?.number("duration")
    }

    /// Average framerate of the selected video stream
    pub fn framerate(&self) -> Option<f64> {
        let raw = self.video_stream()?.text("avg_frame_rate")?;
        parse_rational(&raw)
    }

    /// Total frames of the selected video stream, `None` when either the
    /// duration or the framerate is unavailable
    pub fn total_frames(&self) -> Option<u64> {
        let seconds = self.total_seconds()?;
        let framerate = self.framerate()?;
        let frames = (seconds * framerate).round();
        (frames.is_finite() && frames >= 0.0).then_some(frames as u64)
    }
}

fn first_stream_of_kind(streams: &[StreamInfo], kind: &StreamKind) -> Option<usize> {
    streams.iter().position(|stream| stream.kind() == *kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stream(value: Value) -> StreamInfo {
        match value {
            Value::Object(fields) => StreamInfo::new(fields),
            _ => panic!("stream fixture must be an object"),
        }
    }

    fn video(avg_frame_rate: &str, duration: &str) -> StreamInfo {
        stream(json!({
            "index": 0,
            "codec_type": "video",
            "avg_frame_rate": avg_frame_rate,
            "duration": duration,
        }))
    }

    fn audio() -> StreamInfo {
        stream(json!({ "index": 1, "codec_type": "audio", "sample_rate": "48000" }))
    }

    #[test]
    fn test_parse_rational() {
        assert_eq!(parse_rational("30000/1001"), Some(29.97));
        assert_eq!(parse_rational("24/1"), Some(24.0));
        assert_eq!(parse_rational("25"), Some(25.0));
        assert_eq!(parse_rational("24000.0/1001.0"), Some(23.98));
        assert_eq!(parse_rational("0/0"), None);
        assert_eq!(parse_rational("abc/1"), None);
        assert_eq!(parse_rational(""), None);
    }

    #[test]
    fn test_first_stream_of_kind_picks_first() {
        let metadata = StreamMetadata::new(vec![
            audio(),
            video("24/1", "10.0"),
            video("30/1", "20.0"),
            stream(json!({ "codec_type": "subtitle" })),
        ]);
        assert_eq!(metadata.first_audio_index(), Some(0));
        assert_eq!(metadata.first_video_index(), Some(1));
        assert_eq!(
            metadata.first_stream_of_kind(&StreamKind::Other("subtitle".to_string())),
            Some(3)
        );
        assert_eq!(metadata.framerate(), Some(24.0));
    }

    #[test]
    fn test_total_frames() {
        let metadata = StreamMetadata::new(vec![video("30000/1001", "10.010000"), audio()]);
        assert_eq!(metadata.framerate(), Some(29.97));
        assert_eq!(metadata.total_seconds(), Some(10.01));
        assert_eq!(metadata.total_frames(), Some(300));
    }

    #[test]
    fn test_total_frames_unavailable_without_video() {
        let metadata = StreamMetadata::new(vec![audio()]);
        assert!(!metadata.has_video());
        assert_eq!(metadata.total_seconds(), None);
        assert_eq!(metadata.framerate(), None);
        assert_eq!(metadata.total_frames(), None);
    }

    #[test]
    fn test_total_frames_unavailable_on_malformed_fields() {
        let metadata = StreamMetadata::new(vec![video("24/1", "not a number")]);
        assert_eq!(metadata.total_frames(), None);

        let metadata = StreamMetadata::new(vec![video("0/0", "12.5")]);
        assert_eq!(metadata.total_frames(), None);
    }

    #[test]
    fn test_zero_duration_is_not_unavailable() {
        let metadata = StreamMetadata::new(vec![video("24/1", "0.0")]);
        assert_eq!(metadata.total_frames(), Some(0));
    }

    #[test]
    fn test_field_accessors() {
        let info = stream(json!({
            "width": 1920,
            "bit_rate": "128000",
            "profile": null,
            "tags": { "language": "eng" },
        }));
        assert_eq!(info.text("width").as_deref(), Some("1920"));
        assert_eq!(info.integer("bit_rate"), Some(128000));
        assert_eq!(info.number("bit_rate"), Some(128000.0));
        assert_eq!(info.text("profile"), None);
        assert_eq!(info.text("tags"), None);
        assert_eq!(display_or_na(info.text("missing")), "N/A");
    }

    #[test]
    fn test_from_probe_json() {
        let metadata = StreamMetadata::from_probe_json(
            r#"{ "streams": [ { "index": 0, "codec_type": "audio" } ] }"#,
        )
        .unwrap();
        assert_eq!(metadata.streams().len(), 1);
        assert!(metadata.has_audio());

        let empty = StreamMetadata::from_probe_json("{}").unwrap();
        assert!(empty.streams().is_empty());

        assert!(StreamMetadata::from_probe_json("not json").is_err());
    }
}
