//! Human-readable description of probed source streams

use crate::ports::Reporter;
use crate::probe::{display_or_na, parse_rational, round2, StreamInfo, StreamKind, StreamMetadata};

/// Streams beyond this count have not been exercised with the interview
pub const TESTED_STREAM_COUNT: usize = 3;

/// Lines describing one video stream
pub fn describe_video(stream: &StreamInfo) -> Vec<String> {
    let framerate = stream
        .text("avg_frame_rate")
        .and_then(|raw| parse_rational(&raw));
    let duration = stream.number("duration").map(round2);
    let frames = framerate
        .zip(duration)
        .map(|(framerate, duration)| round2(framerate * duration));
    let resolution = stream
        .text("width")
        .zip(stream.text("height"))
        .map(|(width, height)| format!("{}x{}", width, height));

    vec![
        format!("- Video (source stream {})", display_or_na(stream.text("index"))),
        format!("|    Video codec      : {}", display_or_na(stream.text("codec_long_name"))),
        format!("|    Video color      : {}", display_or_na(stream.text("color_space"))),
        format!("|    Video resolution : {}", display_or_na(resolution)),
        format!("|    Video framerate  : {}", display_or_na(framerate)),
        format!("|    Video length     : {}s", display_or_na(duration)),
        format!("|    Total frames     : {}", display_or_na(frames)),
    ]
}

/// Lines describing one audio stream
pub fn describe_audio(stream: &StreamInfo) -> Vec<String> {
    let sample_rate = stream.text("sample_rate").map(|rate| format!("{} Hz", rate));
    let layout = stream.text("channel_layout").map(|layout| capitalize(&layout));
    let bit_rate = stream
        .integer("bit_rate")
        .map(|bits| format!("{} kb/s", bits / 1000));

    vec![
        format!("- Audio (source stream {})", display_or_na(stream.text("index"))),
        format!("|    Audio codec      : {}", display_or_na(stream.text("codec_long_name"))),
        format!("|    Audio profile    : {}", display_or_na(stream.text("profile"))),
        format!("|    Audio samplerate : {}", display_or_na(sample_rate)),
        format!("|    Audio channels   : {}", display_or_na(stream.text("channels"))),
        format!("|    Audio layout     : {}", display_or_na(layout)),
        format!("|    Audio bitrate    : {}", display_or_na(bit_rate)),
    ]
}

/// Lines describing every stream of the source
pub fn describe(metadata: &StreamMetadata) -> Vec<String> {
    metadata
        .streams()
        .iter()
        .flat_map(|stream| match stream.kind() {
            StreamKind::Video => describe_video(stream),
            StreamKind::Audio => describe_audio(stream),
            StreamKind::Other(kind) => vec![format!("- Auxiliary (stream type '{}')", kind)],
        })
        .collect()
}

/// Report stream selection and the per-stream summary
pub fn log_metadata(metadata: &StreamMetadata, reporter: &dyn Reporter) {
    match metadata.audio_stream() {
        Some(stream) => reporter.info(&format!(
            "Using first audio stream found (stream {})",
            display_or_na(stream.text("index"))
        )),
        None => reporter.warning("No audio stream found"),
    }
    match metadata.video_stream() {
        Some(stream) => reporter.info(&format!(
            "Using first video stream found (stream {})",
            display_or_na(stream.text("index"))
        )),
        None => reporter.warning("No video stream found"),
    }

    if metadata.streams().len() > TESTED_STREAM_COUNT {
        reporter.warning("Multiple video/audio streams detected");
        reporter.warning("- Only the first video and audio streams are used");
        reporter.warning("- This could also be a false detection");
    }

    reporter.info("Start source info:");
    for line in describe(metadata) {
        reporter.info(&line);
    }
    reporter.info("End source info");
}

fn capitalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
