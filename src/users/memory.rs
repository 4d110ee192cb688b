use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{NewUser, User};
use super::repo::UserRepo;
use crate::error::StoreError;

/// In-process credential store with the same uniqueness rules as the
/// `users` table. Used by tests.
#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let mut all: Vec<User> = self.users.read().await.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }

    async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict("users_email_key".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            role: new.role,
            is_banned: false,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> Result<bool, StoreError> {
        match self.users.write().await.get_mut(&id) {
            Some(u) => {
                u.is_banned = banned;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::model::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            name: "N".into(),
            password_hash: "h".into(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repo = MemoryUserRepo::new();
        repo.insert(new_user("a@x.com")).await.unwrap();
        let err = repo.insert(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn set_banned_reports_missing_rows() {
        let repo = MemoryUserRepo::new();
        let u = repo.insert(new_user("a@x.com")).await.unwrap();
        assert!(repo.set_banned(u.id, true).await.unwrap());
        assert!(repo.find_by_id(u.id).await.unwrap().unwrap().is_banned);
        assert!(!repo.set_banned(Uuid::new_v4(), true).await.unwrap());
    }
}
