//! Dream history listing and detail lookup.

use std::{convert::Infallible, str::FromStr};

use shared::{
    domain::{DreamId, DreamSummary, InterpretationResult},
    protocol::DreamEntry,
};
use tracing::{info, warn};

use crate::{
    api::DreamApi, credentials::CredentialStore, error::FlowError, mapper, notify::Notifier,
};

pub const LOGIN_REQUIRED_NOTICE: &str = "로그인이 필요합니다.";
pub const DETAIL_FAILED_NOTICE: &str = "꿈 정보를 불러오는데 실패했습니다.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmotionFilter {
    #[default]
    All,
    Emotion(String),
}

impl EmotionFilter {
    pub fn matches(&self, emotion: &str) -> bool {
        match self {
            Self::All => true,
            Self::Emotion(wanted) => wanted.to_lowercase() == emotion.to_lowercase(),
        }
    }
}

impl FromStr for EmotionFilter {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Emotion(value.to_string()))
        }
    }
}

/// Calendar date part of a server timestamp (`2024-01-02T10:00:00` -> `2024-01-02`).
pub fn format_entry_date(created_at: &str) -> &str {
    created_at.split('T').next().unwrap_or_default()
}

pub fn summarize_entry(entry: &DreamEntry) -> DreamSummary {
    DreamSummary {
        id: entry.id,
        date: format_entry_date(&entry.created_at).to_string(),
        title: entry.title.clone(),
        snippet: entry.content.clone(),
        emotion: entry.emotion_category.clone().unwrap_or_default(),
        image: mapper::thumbnail_url_for(entry.recommended_song_url.as_deref().unwrap_or_default()),
    }
}

/// Case-insensitive search over title and snippet, combined with the emotion filter.
pub fn filter_dreams<'a>(
    dreams: &'a [DreamSummary],
    query: &str,
    filter: &EmotionFilter,
) -> Vec<&'a DreamSummary> {
    let query = query.to_lowercase();
    dreams
        .iter()
        .filter(|dream| {
            query.is_empty()
                || dream.title.to_lowercase().contains(&query)
                || dream.snippet.to_lowercase().contains(&query)
        })
        .filter(|dream| filter.matches(&dream.emotion))
        .collect()
}

/// Loads the signed-in user's dreams, newest first.
pub async fn load_history(
    api: &dyn DreamApi,
    credentials: &dyn CredentialStore,
    notifier: &dyn Notifier,
) -> Result<Vec<DreamSummary>, FlowError> {
    let Some(token) = credentials.token().await else {
        notifier.show_error(LOGIN_REQUIRED_NOTICE);
        return Err(FlowError::MissingCredential);
    };

    let entries = api.list_dreams(&token).await.inspect_err(|err| {
        warn!(error = %err, "dream history load failed");
    })?;
    info!(count = entries.len(), "dream history loaded");
    Ok(entries.iter().rev().map(summarize_entry).collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DreamDetail {
    pub entry: DreamEntry,
    pub result: Option<InterpretationResult>,
}

pub async fn load_dream_detail(
    api: &dyn DreamApi,
    credentials: &dyn CredentialStore,
    notifier: &dyn Notifier,
    id: DreamId,
) -> Result<DreamDetail, FlowError> {
    let fetched = match credentials.token().await {
        Some(token) => api.dream_detail(&token, id).await,
        None => Err(FlowError::MissingCredential),
    };

    let entry = fetched.inspect_err(|err| {
        warn!(dream_id = id.0, error = %err, "dream detail load failed");
        notifier.show_error(DETAIL_FAILED_NOTICE);
    })?;

    let result = match entry.analysis() {
        Some(record) => Some(mapper::map_analysis_record(Some(&record))?),
        None => None,
    };
    Ok(DreamDetail { entry, result })
}

#[cfg(test)]
#[path = "tests/history_tests.rs"]
mod tests;
