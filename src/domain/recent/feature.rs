//! Feature tags naming the AI utilities that produce history

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Prefix prepended to a feature tag to build its storage key
pub const STORAGE_KEY_PREFIX: &str = "recent";

/// Longest accepted tag, in bytes; keeps every derived key a valid file name
pub const MAX_TAG_BYTES: usize = 64;

/// The closed set of features whose history is merged into the global view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    TextToText,
    TextToImage,
    ImageToText,
    VoiceToText,
    TextToAudio,
}

impl Feature {
    /// All known features, in merge iteration order
    pub const ALL: [Feature; 5] = [
        Feature::TextToText,
        Feature::TextToImage,
        Feature::ImageToText,
        Feature::VoiceToText,
        Feature::TextToAudio,
    ];

    /// Canonical tag name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextToText => "TextToText",
            Self::TextToImage => "TextToImage",
            Self::ImageToText => "ImageToText",
            Self::VoiceToText => "VoiceToText",
            Self::TextToAudio => "TextToAudio",
        }
    }

    /// Parses canonical names as well as kebab/snake-case aliases
    /// such as `text-to-image` or `voice_to_text`.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "texttotext" => Some(Self::TextToText),
            "texttoimage" => Some(Self::TextToImage),
            "imagetotext" => Some(Self::ImageToText),
            "voicetotext" => Some(Self::VoiceToText),
            "texttoaudio" => Some(Self::TextToAudio),
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Namespacing tag attached to every record and used to derive its storage key
///
/// Known features are normalized to their canonical name; any other
/// non-empty tag is kept verbatim so it still maps to a distinct key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureTag(String);

impl FeatureTag {
    /// Builds a tag, rejecting empty, whitespace-only or overlong input
    pub fn new(tag: impl AsRef<str>) -> Result<Self, DomainError> {
        let tag = tag.as_ref().trim();

        if tag.is_empty() {
            return Err(DomainError::validation("Feature tag cannot be empty"));
        }

        if tag.len() > MAX_TAG_BYTES {
            return Err(DomainError::validation(format!(
                "Feature tag exceeds {} bytes",
                MAX_TAG_BYTES
            )));
        }

        Ok(match Feature::parse(tag) {
            Some(feature) => feature.into(),
            None => Self(tag.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The known feature this tag names, if any
    pub fn feature(&self) -> Option<Feature> {
        Feature::parse(&self.0)
    }

    /// Storage key owned exclusively by this feature's history
    pub fn storage_key(&self) -> String {
        format!("{}{}", STORAGE_KEY_PREFIX, self.0)
    }
}

impl From<Feature> for FeatureTag {
    fn from(feature: Feature) -> Self {
        Self(feature.as_str().to_string())
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}
