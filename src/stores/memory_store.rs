use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::StoreError;
use crate::stores::{AppProvider, UserProvider, UserSaver};
use crate::types::internal::models::{App, User};

#[derive(Clone)]
struct StoredUser {
    user: User,
    is_admin: bool,
}

/// In-memory implementation of every collaborator contract
///
/// Used by tests and local experiments. Counts collaborator calls, can
/// simulate an outage and can delay every call to exercise deadlines.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<String, StoredUser>>,
    apps: RwLock<HashMap<i32, App>>,
    next_user_id: AtomicI64,
    next_app_id: AtomicI32,
    calls: AtomicUsize,
    unavailable: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every collaborator call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every collaborator call fail with `StoreError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of collaborator calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Register an application, assigning the next id
    pub async fn add_app(&self, name: &str, secret: &str) -> App {
        let id = self.next_app_id.fetch_add(1, Ordering::SeqCst) + 1;
        let app = App {
            id,
            name: name.to_string(),
            secret: secret.to_string(),
        };
        self.apps.write().await.insert(id, app.clone());
        app
    }

    pub async fn set_admin(&self, user_id: i64, is_admin: bool) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let stored = users
            .values_mut()
            .find(|stored| stored.user.id == user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
        stored.is_admin = is_admin;
        Ok(())
    }

    async fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserSaver for InMemoryStore {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<i64, StoreError> {
        self.enter().await?;

        // Check and insert under one write lock
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(StoreError::UserExists(email.to_string()));
        }

        let id = self.next_user_id.fetch_add(1, Ordering::SeqCst) + 1;
        users.insert(
            email.to_string(),
            StoredUser {
                user: User {
                    id,
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                },
                is_admin: false,
            },
        );
        Ok(id)
    }
}

#[async_trait]
impl UserProvider for InMemoryStore {
    async fn user(&self, email: &str) -> Result<User, StoreError> {
        self.enter().await?;
        self.users
            .read()
            .await
            .get(email)
            .map(|stored| stored.user.clone())
            .ok_or_else(|| StoreError::UserNotFound(email.to_string()))
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, StoreError> {
        self.enter().await?;
        self.users
            .read()
            .await
            .values()
            .find(|stored| stored.user.id == user_id)
            .map(|stored| stored.is_admin)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))
    }
}

#[async_trait]
impl AppProvider for InMemoryStore {
    async fn app(&self, app_id: i32) -> Result<App, StoreError> {
        self.enter().await?;
        self.apps
            .read()
            .await
            .get(&app_id)
            .cloned()
            .ok_or(StoreError::AppNotFound(app_id))
    }
}
