use serde::{Deserialize, Serialize};

const VIDEO_EXTENSIONS: &[&str] = &[
    "avi", "mkv", "mp4", "m4v", "mov", "mpg", "mpeg", "ogm", "ts", "m2ts", "webm", "wmv", "divx",
    "flv", "rmvb", "vob", "3gp",
];
const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "sub", "ssa", "ass", "smi", "idx", "sup", "vtt"];
const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "m4a", "aac", "ogg", "oga", "opus", "wav", "wma", "ape", "wv", "aiff",
];
const INFO_EXTENSIONS: &[&str] = &["nfo"];

/// Coarse media class derived from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaClass {
    Video,
    Subtitle,
    Audio,
    Info,
    Other,
}

impl MediaClass {
    pub fn from_extension(extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_lowercase();
        let ext = ext.as_str();

        if VIDEO_EXTENSIONS.contains(&ext) {
            MediaClass::Video
        } else if SUBTITLE_EXTENSIONS.contains(&ext) {
            MediaClass::Subtitle
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            MediaClass::Audio
        } else if INFO_EXTENSIONS.contains(&ext) {
            MediaClass::Info
        } else {
            MediaClass::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaClass::Video => "video",
            MediaClass::Subtitle => "subtitle",
            MediaClass::Audio => "audio",
            MediaClass::Info => "info",
            MediaClass::Other => "other",
        }
    }

    /// Primary media is matched directly; everything else rides along as a companion
    pub fn is_primary(&self) -> bool {
        matches!(self, MediaClass::Video | MediaClass::Audio)
    }
}

impl std::fmt::Display for MediaClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_common_extensions() {
        assert_eq!(MediaClass::from_extension("mkv"), MediaClass::Video);
        assert_eq!(MediaClass::from_extension(".SRT"), MediaClass::Subtitle);
        assert_eq!(MediaClass::from_extension("flac"), MediaClass::Audio);
        assert_eq!(MediaClass::from_extension("nfo"), MediaClass::Info);
        assert_eq!(MediaClass::from_extension("txt"), MediaClass::Other);
    }

    #[test]
    fn test_primary_classes() {
        assert!(MediaClass::Video.is_primary());
        assert!(!MediaClass::Subtitle.is_primary());
    }
}
