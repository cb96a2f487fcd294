use async_trait::async_trait;
use tokio::sync::RwLock;

/// Source of the bearer token used by authenticated calls.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn token(&self) -> Option<String>;
    async fn store_token(&self, token: String);
    async fn clear(&self);
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn token(&self) -> Option<String> {
        self.token
            .read()
            .await
            .clone()
            .filter(|token| !token.is_empty())
    }

    async fn store_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    async fn clear(&self) {
        *self.token.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_clears_token() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.token().await, None);

        store.store_token("abc".to_string()).await;
        assert_eq!(store.token().await.as_deref(), Some("abc"));

        store.clear().await;
        assert_eq!(store.token().await, None);
    }

    #[tokio::test]
    async fn empty_token_counts_as_absent() {
        let store = MemoryCredentialStore::with_token("");
        assert_eq!(store.token().await, None);
    }
}
