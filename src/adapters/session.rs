use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use super::{
    endpoints::{Login, Logout, Me},
    request_client::ApiClient,
};
use crate::{
    application::{
        dto::auth_dto::{LoginForm, LoginResponse},
        error::ApiError,
        services::CredentialProvider,
    },
    domain::{config::client::ClientConfig, models::user::User},
};

/// Shared, replaceable bearer token slot.
#[derive(Clone, Default)]
pub struct SessionStore {
    token: Arc<RwLock<Option<String>>>,
}

impl SessionStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token)),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, token: Option<String>) {
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = token;
    }

    pub fn clear(&self) {
        self.replace(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

impl CredentialProvider for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.get()
    }
}

/// A client bound to a token store it keeps current across login and logout.
#[derive(Clone)]
pub struct Session {
    client: ApiClient,
    store: SessionStore,
}

impl Session {
    pub fn new(client: ApiClient, store: SessionStore) -> Self {
        Self { client, store }
    }

    /// Builds the store from `config.token` and a client reading from it.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let store = SessionStore::new(config.token.clone());
        let client = ApiClient::new(config, Arc::new(store.clone()))?;
        Ok(Self::new(client, store))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn login(&self, form: &LoginForm) -> Result<LoginResponse, ApiError> {
        let response = self.client.call::<Login>(form).await?;
        self.store.replace(Some(response.data.token.clone()));
        info!("Signed in as {}", response.data.user.email);
        Ok(response.data)
    }

    /// The local token is dropped even when the backend call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.client.call::<Logout>(&()).await;
        self.store.clear();
        match result {
            Ok(_) => {
                info!("Signed out");
                Ok(())
            }
            Err(e) => {
                warn!("Logout call failed, local session cleared anyway: {}", e);
                Err(e)
            }
        }
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        Ok(self.client.call::<Me>(&()).await?.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_replaces_and_clears_token() {
        let store = SessionStore::default();
        assert_eq!(store.bearer_token(), None);

        let shared = store.clone();
        store.replace(Some("abc".to_string()));
        assert_eq!(shared.bearer_token(), Some("abc".to_string()));
        assert!(shared.is_authenticated());

        shared.clear();
        assert!(!store.is_authenticated());
    }
}
