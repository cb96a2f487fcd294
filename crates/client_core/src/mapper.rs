//! Normalizes analysis records from the dream service into display models.

use shared::{
    domain::{EmotionSummary, InterpretationResult, MusicRecommendation},
    protocol::AnalysisRecord,
};

use crate::error::FlowError;

pub const SECONDARY_EMOTION_LABEL: &str = "AI Analysis";
pub const PLACEHOLDER_THUMBNAIL_URL: &str = "https://via.placeholder.com/150";

const WATCH_PARAM: &str = "v=";
const SHORT_LINK_PREFIX: &str = "youtu.be/";

/// Extracts a video identifier from a watch URL (`...?v=ID&...`) or a
/// shortened link (`youtu.be/ID?...`). Blank identifiers count as absent.
pub fn extract_video_id(url: &str) -> Option<&str> {
    let id = if let Some((_, rest)) = url.split_once(WATCH_PARAM) {
        rest.split('&').next().unwrap_or_default()
    } else if let Some((_, rest)) = url.split_once(SHORT_LINK_PREFIX) {
        rest.split('?').next().unwrap_or_default()
    } else {
        return None;
    };

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

pub fn thumbnail_url_for(source_url: &str) -> String {
    match extract_video_id(source_url) {
        Some(id) => format!("https://img.youtube.com/vi/{id}/hqdefault.jpg"),
        None => PLACEHOLDER_THUMBNAIL_URL.to_string(),
    }
}

pub fn map_analysis_record(
    record: Option<&AnalysisRecord>,
) -> Result<InterpretationResult, FlowError> {
    let record = record.ok_or(FlowError::MissingAnalysisData)?;
    let source_url = field(&record.recommended_song_url);

    Ok(InterpretationResult {
        interpretation_text: field(&record.interpretation),
        emotion: EmotionSummary {
            primary: field(&record.emotion_category),
            secondary: SECONDARY_EMOTION_LABEL.to_string(),
            description: field(&record.emotional_analysis),
        },
        recommendations: vec![MusicRecommendation {
            title: field(&record.recommended_song_name),
            artist: field(&record.recommended_artist),
            thumbnail_url: thumbnail_url_for(&source_url),
            source_url,
        }],
    })
}

fn field(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/mapper_tests.rs"]
mod tests;
