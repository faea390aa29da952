use crate::pois::Poi;
use crate::users::User;

use super::CreatePoiValues;
use super::Database;
use super::Result;
use super::UpdatePoiValues;
use super::database_error;
use super::with_retry;

impl Database {
    /// Find all POIs of a user, newest first
    pub async fn find_all_pois(&self, user: &User) -> Result<Vec<Poi>> {
        let pois = with_retry(|| {
            sqlx::query_as::<_, Poi>(
                r"
                SELECT *
                FROM pois
                WHERE user_id = $1
                ORDER BY created_at DESC
                ",
            )
            .bind(user.id)
            .fetch_all(&self.connection_pool)
        })
        .await
        .map_err(database_error)?;

        Ok(pois)
    }

    /// Create a POI
    ///
    /// Fails with a conflict when the ID is taken, by any user
    pub async fn create_poi(&self, values: &CreatePoiValues<'_>) -> Result<Poi> {
        let poi = sqlx::query_as::<_, Poi>(
            r#"
            INSERT INTO pois (id, user_id, name, address, location, tel, "type", typecode)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(values.id)
        .bind(values.user.id)
        .bind(values.name)
        .bind(values.address)
        .bind(values.location)
        .bind(values.tel)
        .bind(values.kind)
        .bind(values.typecode)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(database_error)?;

        Ok(poi)
    }

    /// Update a POI of the user
    ///
    /// `None` when the POI does not exist or is owned by someone else
    pub async fn update_poi(
        &self,
        user: &User,
        id: &str,
        values: &UpdatePoiValues<'_>,
    ) -> Result<Option<Poi>> {
        let poi = with_retry(|| {
            sqlx::query_as::<_, Poi>(
                r#"
                UPDATE pois
                SET
                    name = COALESCE($3, name),
                    address = COALESCE($4, address),
                    location = COALESCE($5, location),
                    tel = COALESCE($6, tel),
                    "type" = COALESCE($7, "type"),
                    typecode = COALESCE($8, typecode)
                WHERE id = $1 AND user_id = $2
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(user.id)
            .bind(values.name)
            .bind(values.address)
            .bind(values.location)
            .bind(values.tel)
            .bind(values.kind)
            .bind(values.typecode)
            .fetch_optional(&self.connection_pool)
        })
        .await
        .map_err(database_error)?;

        Ok(poi)
    }

    /// Delete a POI of the user
    ///
    /// A POI still used by an itinerary can not be deleted, this results in a reference error
    pub async fn delete_poi(&self, user: &User, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pois WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user.id)
            .execute(&self.connection_pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }
}
