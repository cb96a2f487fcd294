use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(DreamId);

/// Dream text accepted for interpretation. Only constructible from text that
/// is non-empty after trimming; the text itself is stored untrimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DreamSubmission {
    text: String,
}

impl DreamSubmission {
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionSummary {
    pub primary: String,
    pub secondary: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicRecommendation {
    pub title: String,
    pub artist: String,
    pub source_url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationResult {
    pub interpretation_text: String,
    pub emotion: EmotionSummary,
    pub recommendations: Vec<MusicRecommendation>,
}

/// One row of the dream history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreamSummary {
    pub id: DreamId,
    pub date: String,
    pub title: String,
    pub snippet: String,
    pub emotion: String,
    pub image: String,
}
