use tracing::info;
use uuid::Uuid;

use super::{
    model::{NewUser, Role, User},
    repo::UserRepo,
};
use crate::{
    auth::password::Hasher,
    config::AdminSeed,
    error::{AppError, StoreError},
    validation::normalize_email,
};

pub const ADMIN_NAME: &str = "Admin User";

pub async fn list_users(users: &dyn UserRepo) -> Result<Vec<User>, AppError> {
    Ok(users.list().await?)
}

/// Sets the ban flag. Repeating the same action is a no-op success.
pub async fn set_banned(users: &dyn UserRepo, id: Uuid, banned: bool) -> Result<(), AppError> {
    if !users.set_banned(id, banned).await? {
        return Err(AppError::not_found("User not found."));
    }
    if banned {
        info!(user_id = %id, "user banned");
    } else {
        info!(user_id = %id, "user unbanned");
    }
    Ok(())
}

/// Outcome of [`seed_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeded {
    Created,
    AlreadyPresent,
}

/// Ensures an admin account exists for the configured email.
pub async fn seed_admin(
    users: &dyn UserRepo,
    hasher: &Hasher,
    seed: &AdminSeed,
) -> Result<Seeded, AppError> {
    let email = normalize_email(&seed.email);
    if users.find_by_email(&email).await?.is_some() {
        info!(%email, "admin user already exists");
        return Ok(Seeded::AlreadyPresent);
    }

    let password_hash = hasher
        .hash(seed.password.clone())
        .await
        .map_err(AppError::internal)?;
    let res = users
        .insert(NewUser {
            email: email.clone(),
            name: ADMIN_NAME.into(),
            password_hash,
            role: Role::Admin,
        })
        .await;

    match res {
        Ok(user) => {
            info!(user_id = %user.id, %email, "admin user seeded");
            Ok(Seeded::Created)
        }
        // Another instance seeded it between our lookup and insert.
        Err(StoreError::Conflict(_)) => Ok(Seeded::AlreadyPresent),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::memory::MemoryUserRepo;

    fn seed() -> AdminSeed {
        AdminSeed {
            email: "Admin@Example.com".into(),
            password: "admin-password".into(),
        }
    }

    #[tokio::test]
    async fn seed_admin_creates_once() {
        let repo = MemoryUserRepo::new();
        let hasher = Hasher::fast();

        assert_eq!(seed_admin(&repo, &hasher, &seed()).await.unwrap(), Seeded::Created);
        assert_eq!(
            seed_admin(&repo, &hasher, &seed()).await.unwrap(),
            Seeded::AlreadyPresent
        );

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].email, "admin@example.com");
        assert_eq!(all[0].role, Role::Admin);
        assert_eq!(all[0].name, ADMIN_NAME);
        assert!(hasher
            .verify_blocking("admin-password", &all[0].password_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn ban_and_unban_are_idempotent() {
        let repo = MemoryUserRepo::new();
        let user = repo
            .insert(NewUser {
                email: "a@x.com".into(),
                name: "A".into(),
                password_hash: "h".into(),
                role: Role::User,
            })
            .await
            .unwrap();

        set_banned(&repo, user.id, true).await.unwrap();
        set_banned(&repo, user.id, true).await.unwrap();
        assert!(repo.find_by_id(user.id).await.unwrap().unwrap().is_banned);

        set_banned(&repo, user.id, false).await.unwrap();
        set_banned(&repo, user.id, false).await.unwrap();
        assert!(!repo.find_by_id(user.id).await.unwrap().unwrap().is_banned);
    }

    #[tokio::test]
    async fn ban_unknown_user_is_not_found() {
        let repo = MemoryUserRepo::new();
        let err = set_banned(&repo, Uuid::new_v4(), true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
