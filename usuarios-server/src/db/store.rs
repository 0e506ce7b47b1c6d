//! The store seam between HTTP handlers and persistence
//!
//! Handlers only see `Arc<dyn Store>`. [`Database`] is the production
//! implementation; [`MemoryStore`](super::MemoryStore) is the test double.

use async_trait::async_trait;

use super::{Database, DbError, Role, RoleRepo, UserRecord, UserRepo, UserSummary};
use crate::models::{NewUser, UserUpdate};

#[async_trait]
pub trait Store: Send + Sync {
    /// Whether the store can currently serve statements.
    fn is_ready(&self) -> bool;

    async fn list_users(&self) -> Result<Vec<UserSummary>, DbError>;

    async fn get_user(&self, id: i32) -> Result<UserSummary, DbError>;

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, DbError>;

    async fn update_user(&self, id: i32, user: UserUpdate) -> Result<UserRecord, DbError>;

    async fn delete_user(&self, id: i32) -> Result<(), DbError>;

    async fn list_roles(&self) -> Result<Vec<Role>, DbError>;
}

#[async_trait]
impl Store for Database {
    fn is_ready(&self) -> bool {
        Database::is_ready(self)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, DbError> {
        UserRepo::new(self.pool()?).list().await
    }

    async fn get_user(&self, id: i32) -> Result<UserSummary, DbError> {
        UserRepo::new(self.pool()?).get(id).await
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, DbError> {
        UserRepo::new(self.pool()?).create(user).await
    }

    async fn update_user(&self, id: i32, user: UserUpdate) -> Result<UserRecord, DbError> {
        UserRepo::new(self.pool()?).update(id, user).await
    }

    async fn delete_user(&self, id: i32) -> Result<(), DbError> {
        UserRepo::new(self.pool()?).delete(id).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>, DbError> {
        RoleRepo::new(self.pool()?).list().await
    }
}
