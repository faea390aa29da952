use crate::memos::Memo;
use crate::users::User;

use super::CreateMemoValues;
use super::Database;
use super::Result;
use super::UpdateMemoValues;
use super::database_error;
use super::with_retry;

impl Database {
    /// Find all memos of a user, last changed first
    pub async fn find_all_memos(&self, user: &User) -> Result<Vec<Memo>> {
        let memos = with_retry(|| {
            sqlx::query_as::<_, Memo>(
                r"
                SELECT *
                FROM memos
                WHERE user_id = $1
                ORDER BY updated_at DESC
                ",
            )
            .bind(user.id)
            .fetch_all(&self.connection_pool)
        })
        .await
        .map_err(database_error)?;

        Ok(memos)
    }

    pub async fn create_memo(&self, values: &CreateMemoValues<'_>) -> Result<Memo> {
        let memo = sqlx::query_as::<_, Memo>(
            r"
            INSERT INTO memos (id, user_id, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(values.id)
        .bind(values.user.id)
        .bind(values.title)
        .bind(values.content)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(database_error)?;

        Ok(memo)
    }

    pub async fn update_memo(
        &self,
        user: &User,
        id: &str,
        values: &UpdateMemoValues<'_>,
    ) -> Result<Option<Memo>> {
        let memo = with_retry(|| {
            sqlx::query_as::<_, Memo>(
                r"
                UPDATE memos
                SET
                    title = COALESCE($3, title),
                    content = COALESCE($4, content),
                    updated_at = CURRENT_TIMESTAMP
                WHERE id = $1 AND user_id = $2
                RETURNING *
                ",
            )
            .bind(id)
            .bind(user.id)
            .bind(values.title)
            .bind(values.content)
            .fetch_optional(&self.connection_pool)
        })
        .await
        .map_err(database_error)?;

        Ok(memo)
    }

    pub async fn delete_memo(&self, user: &User, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM memos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user.id)
            .execute(&self.connection_pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }
}
