use crate::auth::repo_types::{Session, User};
use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

impl User {
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Inserts a user. A taken username surfaces as a unique violation from
    /// the store itself.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?, ?, ?)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }
}

impl Session {
    pub async fn create(db: &SqlitePool, user_id: i64) -> sqlx::Result<Session> {
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, created_at)
            VALUES (?, ?, ?)
            RETURNING id, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await
    }

    pub async fn is_active(db: &SqlitePool, id: &str, user_id: i64) -> sqlx::Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM sessions WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .fetch_optional(db)
                .await?;
        Ok(row.is_some())
    }

    pub async fn delete(db: &SqlitePool, id: &str) -> sqlx::Result<u64> {
        let res = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn create_and_find_user() {
        let st = AppState::in_memory().await.unwrap();
        let user = User::create(&st.db, "alice", "hash").await.unwrap();
        assert!(user.id > 0);

        let by_name = User::find_by_username(&st.db, "alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
        let by_id = User::find_by_id(&st.db, user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
        assert!(User::find_by_username(&st.db, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_unique_violation() {
        let st = AppState::in_memory().await.unwrap();
        User::create(&st.db, "alice", "h1").await.unwrap();
        let err = User::create(&st.db, "alice", "h2").await.unwrap_err();
        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let st = AppState::in_memory().await.unwrap();
        let user = User::create(&st.db, "alice", "hash").await.unwrap();
        let session = Session::create(&st.db, user.id).await.unwrap();

        assert!(Session::is_active(&st.db, &session.id, user.id).await.unwrap());
        assert!(!Session::is_active(&st.db, &session.id, user.id + 1).await.unwrap());

        assert_eq!(Session::delete(&st.db, &session.id).await.unwrap(), 1);
        assert!(!Session::is_active(&st.db, &session.id, user.id).await.unwrap());
        assert_eq!(Session::delete(&st.db, &session.id).await.unwrap(), 0);
    }
}
