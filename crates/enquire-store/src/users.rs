use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::{parse_timestamp, Database};
use crate::error::{conflict, not_found, Result};
use crate::models::{NewUser, Session, User};

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, is_staff, created_at";

impl Database {
    pub fn insert_user(&self, user: &NewUser) -> Result<User> {
        let now = Utc::now();
        let username = user.username.trim();
        let email = user.email.trim().to_lowercase();

        self.conn()
            .execute(
                "INSERT INTO users (username, email, first_name, last_name, is_staff, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    username,
                    email,
                    user.first_name.trim(),
                    user.last_name.trim(),
                    user.is_staff,
                    now.to_rfc3339(),
                ],
            )
            .map_err(|e| conflict(e, "username already exists"))?;

        let id = self.conn().last_insert_rowid();
        tracing::debug!(user_id = id, staff = user.is_staff, "user created");
        self.get_user(id)
    }

    pub fn get_user(&self, id: i64) -> Result<User> {
        self.conn()
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                row_to_user,
            )
            .map_err(not_found)
    }

    /// Case-insensitive username lookup.
    pub fn username_exists(&self, username: &str) -> Result<bool> {
        let exists = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1 COLLATE NOCASE)",
            params![username.trim()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn email_registered(&self, email: &str) -> Result<bool> {
        let exists = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
            params![email.trim().to_lowercase()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Issue a fresh random session token for `user_id`.
    pub fn create_session(&self, user_id: i64) -> Result<Session> {
        let token = hex::encode(rand::random::<[u8; 32]>());
        let now = Utc::now();

        self.conn().execute(
            "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![token, user_id, now.to_rfc3339()],
        )?;

        Ok(Session {
            token,
            user_id,
            created_at: now,
        })
    }

    /// Resolve a session token to its user, if the token is known.
    pub fn user_for_session(&self, token: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.is_staff, u.created_at
                 FROM sessions s JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?1",
                params![token],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn delete_session(&self, token: &str) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(affected > 0)
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(6)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        is_staff: row.get(5)?,
        created_at: parse_timestamp(6, &created_at)?,
    })
}
