use crate::budgets::Budget;
use crate::users::User;

use super::CreateBudgetValues;
use super::Database;
use super::Result;
use super::UpdateBudgetValues;
use super::database_error;
use super::with_retry;

impl Database {
    /// Find all budgets of a user, newest first
    pub async fn find_all_budgets(&self, user: &User) -> Result<Vec<Budget>> {
        let budgets = with_retry(|| {
            sqlx::query_as::<_, Budget>(
                r"
                SELECT *
                FROM budgets
                WHERE user_id = $1
                ORDER BY created_at DESC
                ",
            )
            .bind(user.id)
            .fetch_all(&self.connection_pool)
        })
        .await
        .map_err(database_error)?;

        Ok(budgets)
    }

    /// Create a budget
    pub async fn create_budget(&self, values: &CreateBudgetValues<'_>) -> Result<Budget> {
        let budget = sqlx::query_as::<_, Budget>(
            r"
            INSERT INTO budgets (id, user_id, name, description, amount, actual_amount, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            ",
        )
        .bind(values.id)
        .bind(values.user.id)
        .bind(values.name)
        .bind(values.description)
        .bind(values.amount)
        .bind(values.actual_amount)
        .bind(values.category)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(database_error)?;

        Ok(budget)
    }

    /// Update a budget of the user, absent values are kept
    pub async fn update_budget(
        &self,
        user: &User,
        id: &str,
        values: &UpdateBudgetValues<'_>,
    ) -> Result<Option<Budget>> {
        let budget = with_retry(|| {
            sqlx::query_as::<_, Budget>(
                r"
                UPDATE budgets
                SET
                    name = COALESCE($3, name),
                    description = COALESCE($4, description),
                    amount = COALESCE($5, amount),
                    actual_amount = COALESCE($6, actual_amount),
                    category = COALESCE($7, category),
                    updated_at = CURRENT_TIMESTAMP
                WHERE id = $1 AND user_id = $2
                RETURNING *
                ",
            )
            .bind(id)
            .bind(user.id)
            .bind(values.name)
            .bind(values.description)
            .bind(values.amount)
            .bind(values.actual_amount)
            .bind(values.category)
            .fetch_optional(&self.connection_pool)
        })
        .await
        .map_err(database_error)?;

        Ok(budget)
    }

    /// Delete a budget of the user
    pub async fn delete_budget(&self, user: &User, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user.id)
            .execute(&self.connection_pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }
}
