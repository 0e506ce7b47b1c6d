//! In-memory store
//!
//! Same contract as the PostgreSQL store, including the role foreign key and
//! email uniqueness. Every operation runs under one mutex, so check-then-write
//! is atomic here too. Used by the router tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{DbError, Role, Store, UserRecord, UserSummary};
use crate::models::{NewUser, UserUpdate};

#[derive(Debug, Clone)]
struct StoredUser {
    nombre: String,
    gmail: String,
    contrasena: String,
    estado: Option<bool>,
    id_rol: i32,
}

#[derive(Debug, Default)]
struct Tables {
    roles: BTreeMap<i32, String>,
    users: BTreeMap<i32, StoredUser>,
    last_id: i32,
}

impl Tables {
    fn check_role(&self, id_rol: i32) -> Result<(), DbError> {
        if self.roles.contains_key(&id_rol) {
            Ok(())
        } else {
            Err(DbError::Sqlx(sqlx::Error::Protocol(format!(
                "insert or update on table \"usuarios\" violates foreign key constraint: id_rol={id_rol}"
            ))))
        }
    }

    fn email_taken(&self, gmail: &str, except: Option<i32>) -> bool {
        self.users
            .iter()
            .any(|(id, u)| u.gmail == gmail && Some(*id) != except)
    }

    fn record(id: i32, user: &StoredUser) -> UserRecord {
        UserRecord {
            id,
            nombre: user.nombre.clone(),
            gmail: user.gmail.clone(),
            estado: user.estado,
            id_rol: user.id_rol,
        }
    }

    // Mirrors the INNER JOIN: users whose role vanished are skipped.
    fn summary(&self, id: i32, user: &StoredUser) -> Option<UserSummary> {
        let rol = self.roles.get(&user.id_rol)?;
        Some(UserSummary {
            id,
            nombre: user.nombre.clone(),
            gmail: user.gmail.clone(),
            estado: user.estado,
            id_rol: user.id_rol,
            rol: rol.clone(),
        })
    }
}

/// Store backed by ordered maps
#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    ready: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty, ready store with no roles.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            ready: AtomicBool::new(true),
        }
    }

    /// Ready store seeded with the given roles.
    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = (i32, S)>,
        S: Into<String>,
    {
        let store = Self::new();
        store
            .lock()
            .roles
            .extend(roles.into_iter().map(|(id, name)| (id, name.into())));
        store
    }

    /// Flip readiness, simulating a lost or restored connection.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    /// Stored password column for a user, as the database would hold it.
    pub fn stored_password(&self, id: i32) -> Option<String> {
        self.lock().users.get(&id).map(|u| u.contrasena.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panic mid-operation leaves the maps consistent; keep serving.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_ready(&self) -> Result<(), DbError> {
        if self.ready.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DbError::Unavailable)
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, DbError> {
        self.ensure_ready()?;
        let tables = self.lock();
        Ok(tables
            .users
            .iter()
            .filter_map(|(id, u)| tables.summary(*id, u))
            .collect())
    }

    async fn get_user(&self, id: i32) -> Result<UserSummary, DbError> {
        self.ensure_ready()?;
        let tables = self.lock();
        tables
            .users
            .get(&id)
            .and_then(|u| tables.summary(id, u))
            .ok_or_else(|| DbError::usuario_not_found(id))
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, DbError> {
        self.ensure_ready()?;
        let mut tables = self.lock();

        if tables.email_taken(&user.gmail, None) {
            return Err(DbError::DuplicateEmail { gmail: user.gmail });
        }
        tables.check_role(user.id_rol)?;

        tables.last_id += 1;
        let id = tables.last_id;
        let stored = StoredUser {
            nombre: user.nombre,
            gmail: user.gmail,
            contrasena: user.password_hash,
            estado: Some(user.estado),
            id_rol: user.id_rol,
        };
        let record = Tables::record(id, &stored);
        tables.users.insert(id, stored);
        Ok(record)
    }

    async fn update_user(&self, id: i32, user: UserUpdate) -> Result<UserRecord, DbError> {
        self.ensure_ready()?;
        let mut tables = self.lock();

        if tables.email_taken(&user.gmail, Some(id)) {
            return Err(DbError::DuplicateEmail { gmail: user.gmail });
        }
        if !tables.users.contains_key(&id) {
            return Err(DbError::usuario_not_found(id));
        }
        tables.check_role(user.id_rol)?;

        let stored = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DbError::usuario_not_found(id))?;
        stored.nombre = user.nombre;
        stored.gmail = user.gmail;
        stored.contrasena = user.password_hash;
        stored.id_rol = user.id_rol;
        if user.estado.is_some() {
            stored.estado = user.estado;
        }

        Ok(Tables::record(id, stored))
    }

    async fn delete_user(&self, id: i32) -> Result<(), DbError> {
        self.ensure_ready()?;
        self.lock()
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::usuario_not_found(id))
    }

    async fn list_roles(&self) -> Result<Vec<Role>, DbError> {
        self.ensure_ready()?;
        Ok(self
            .lock()
            .roles
            .iter()
            .map(|(id_rol, nombre)| Role {
                id_rol: *id_rol,
                nombre: nombre.clone(),
            })
            .collect())
    }
}
