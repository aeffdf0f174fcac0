use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::repo_types::{Entry, NewEntry, Totals};

/// Newest date first; same-date entries keep insertion order.
pub async fn list_by_user(db: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<Entry>> {
    sqlx::query_as::<_, Entry>(
        r#"
        SELECT id, user_id, date, invest_amount, unit_price, derived_amount, created_at
        FROM entries
        WHERE user_id = ?
        ORDER BY date DESC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn insert(db: &SqlitePool, user_id: i64, entry: &NewEntry) -> sqlx::Result<Entry> {
    sqlx::query_as::<_, Entry>(
        r#"
        INSERT INTO entries (user_id, date, invest_amount, unit_price, derived_amount, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, date, invest_amount, unit_price, derived_amount, created_at
        "#,
    )
    .bind(user_id)
    .bind(&entry.date)
    .bind(entry.invest_amount)
    .bind(entry.unit_price)
    .bind(entry.derived_amount)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await
}

/// Deletes the entry only when `user_id` owns it. Returns rows removed.
pub async fn delete_owned(db: &SqlitePool, user_id: i64, entry_id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM entries WHERE id = ? AND user_id = ?")
        .bind(entry_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

pub async fn totals_by_user(db: &SqlitePool, user_id: i64) -> sqlx::Result<Totals> {
    sqlx::query_as::<_, Totals>(
        r#"
        SELECT COUNT(*)                            AS entry_count,
               COALESCE(SUM(invest_amount), 0.0)  AS total_invested,
               COALESCE(SUM(derived_amount), 0.0) AS total_amount
        FROM entries
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await
}
