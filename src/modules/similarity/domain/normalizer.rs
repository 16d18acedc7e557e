use regex::Regex;
use std::sync::LazyLock;

/// Bracketed groups such as `[HorribleSubs]`, `(2010)`, `{x264}` or `[1A2B3C4D]`
static RE_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)|\{[^}]*\}").expect("Invalid regex"));

/// Resolution, source, codec and audio tokens commonly found in release names
static RE_RELEASE_INFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(^|[\s._\-])(480p|576p|720p|1080[pi]|2160p|4k|uhd|hdr|x26[45]|h\.?26[45]|hevc|avc|xvid|divx|aac|ac3|dts|dd5\.1|flac|blu-?ray|bd(rip)?|br(rip)?|dvd(rip|scr)?|hdtv|web-?(dl|rip)?|hdrip|remux|proper|repack|internal|limited|extended|unrated|multi)([\s._\-]|$)",
    )
    .expect("Invalid regex")
});

static RE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[._\-]+").expect("Invalid regex"));

/// Transformation that can be applied to a name
pub trait NameTransformation: Send + Sync {
    fn transform(&self, name: &str) -> String;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct LowercaseTransform;

impl NameTransformation for LowercaseTransform {
    fn transform(&self, name: &str) -> String {
        name.to_lowercase()
    }

    fn name(&self) -> &'static str {
        "Lowercase"
    }
}

/// Removes bracketed tags and checksums
#[derive(Debug, Clone)]
pub struct StripBracketsTransform;

impl NameTransformation for StripBracketsTransform {
    fn transform(&self, name: &str) -> String {
        RE_BRACKETS.replace_all(name, " ").into_owned()
    }

    fn name(&self) -> &'static str {
        "StripBrackets"
    }
}

/// Removes resolution, source and codec tokens
#[derive(Debug, Clone)]
pub struct StripReleaseInfoTransform;

impl NameTransformation for StripReleaseInfoTransform {
    fn transform(&self, name: &str) -> String {
        // Adjacent tokens share a separator, so one pass can miss every other token
        let mut current = name.to_string();
        loop {
            let next = RE_RELEASE_INFO.replace_all(&current, " ").into_owned();
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn name(&self) -> &'static str {
        "StripReleaseInfo"
    }
}

/// Dots, underscores and dashes become spaces
#[derive(Debug, Clone)]
pub struct SeparatorsToSpaceTransform;

impl NameTransformation for SeparatorsToSpaceTransform {
    fn transform(&self, name: &str) -> String {
        RE_SEPARATORS.replace_all(name, " ").into_owned()
    }

    fn name(&self) -> &'static str {
        "SeparatorsToSpace"
    }
}

/// Keeps only alphanumeric characters and whitespace
#[derive(Debug, Clone)]
pub struct RemovePunctuationTransform;

impl NameTransformation for RemovePunctuationTransform {
    fn transform(&self, name: &str) -> String {
        name.chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect()
    }

    fn name(&self) -> &'static str {
        "RemovePunctuation"
    }
}

/// Collapses runs of whitespace and trims
#[derive(Debug, Clone)]
pub struct NormalizeWhitespaceTransform;

impl NameTransformation for NormalizeWhitespaceTransform {
    fn transform(&self, name: &str) -> String {
        name.split_whitespace().collect::<Vec<&str>>().join(" ")
    }

    fn name(&self) -> &'static str {
        "NormalizeWhitespace"
    }
}

/// Applies a pipeline of transformations to file names, titles and queries
pub struct NameNormalizer {
    transformations: Vec<Box<dyn NameTransformation>>,
}

impl NameNormalizer {
    pub fn new() -> Self {
        Self {
            transformations: Vec::new(),
        }
    }

    /// Full pipeline used for comparing file names against metadata names
    pub fn default_pipeline() -> Self {
        Self::new()
            .with_strip_brackets()
            .with_strip_release_info()
            .with_separators_to_space()
            .with_remove_punctuation()
            .with_lowercase()
            .with_normalize_whitespace()
    }

    /// Readable cleanup for search queries: keeps case and punctuation
    pub fn query_pipeline() -> Self {
        Self::new()
            .with_strip_brackets()
            .with_strip_release_info()
            .with_separators_to_space()
            .with_normalize_whitespace()
    }

    /// Light pipeline for memo keys: case and whitespace only
    pub fn key_pipeline() -> Self {
        Self::new().with_lowercase().with_normalize_whitespace()
    }

    pub fn with_lowercase(mut self) -> Self {
        self.transformations.push(Box::new(LowercaseTransform));
        self
    }

    pub fn with_strip_brackets(mut self) -> Self {
        self.transformations.push(Box::new(StripBracketsTransform));
        self
    }

    pub fn with_strip_release_info(mut self) -> Self {
        self.transformations.push(Box::new(StripReleaseInfoTransform));
        self
    }

    pub fn with_separators_to_space(mut self) -> Self {
        self.transformations
            .push(Box::new(SeparatorsToSpaceTransform));
        self
    }

    pub fn with_remove_punctuation(mut self) -> Self {
        self.transformations
            .push(Box::new(RemovePunctuationTransform));
        self
    }

    pub fn with_normalize_whitespace(mut self) -> Self {
        self.transformations
            .push(Box::new(NormalizeWhitespaceTransform));
        self
    }

    pub fn normalize(&self, name: &str) -> String {
        let mut result = name.to_string();

        for transformation in &self.transformations {
            result = transformation.transform(&result);
            log::trace!("After {}: '{}'", transformation.name(), result);
        }

        result
    }

    pub fn transformation_count(&self) -> usize {
        self.transformations.len()
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::default_pipeline()
    }
}
