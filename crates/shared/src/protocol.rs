use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DreamId;

/// Every dream service payload arrives wrapped in `{ data, message }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDreamRequest {
    pub title: String,
    pub content: String,
    pub date: String,
}

impl CreateDreamRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Server-produced analysis of a submitted dream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisRecord {
    pub interpretation: Option<String>,
    pub emotion_category: Option<String>,
    pub emotional_analysis: Option<String>,
    pub recommended_song_name: Option<String>,
    pub recommended_artist: Option<String>,
    pub recommended_song_url: Option<String>,
}

/// A stored dream as returned by the listing and detail endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamEntry {
    pub id: DreamId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_song_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_song_url: Option<String>,
}

impl DreamEntry {
    /// The analysis attached to this entry, if the server produced one.
    pub fn analysis(&self) -> Option<AnalysisRecord> {
        self.interpretation.as_ref()?;
        Some(AnalysisRecord {
            interpretation: self.interpretation.clone(),
            emotion_category: self.emotion_category.clone(),
            emotional_analysis: self.emotional_analysis.clone(),
            recommended_song_name: self.recommended_song_name.clone(),
            recommended_artist: self.recommended_artist.clone(),
            recommended_song_url: self.recommended_song_url.clone(),
        })
    }
}
