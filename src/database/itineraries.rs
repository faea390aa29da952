use sqlx::PgConnection;
use uuid::Uuid;

use crate::itineraries::Itinerary;
use crate::itineraries::ItineraryAggregate;
use crate::itineraries::Stop;
use crate::users::User;

use super::Database;
use super::Error;
use super::ItineraryValues;
use super::Result;
use super::StopValues;
use super::database_error;
use super::types::StopRow;
use super::with_retry;

/// Stop columns joined with the descriptive fields of their POI
const SELECT_STOPS: &str = r#"
    SELECT
        ip.id,
        ip.itinerary_id,
        ip.poi_id,
        ip.description,
        ip.budget,
        ip.transport_type,
        ip.transport_description,
        ip.transport_budget,
        ip.sort_order,
        p.name AS poi_name,
        p.address AS poi_address,
        p.location AS poi_location,
        p.tel AS poi_tel,
        p."type" AS poi_type,
        p.typecode AS poi_typecode
    FROM itinerary_pois ip
    INNER JOIN pois p ON p.id = ip.poi_id
"#;

impl Database {
    /// Find all itineraries of a user with their stops, newest first
    pub async fn find_all_itineraries(&self, user: &User) -> Result<Vec<ItineraryAggregate>> {
        let itineraries = with_retry(|| {
            sqlx::query_as::<_, Itinerary>(
                r"
                SELECT *
                FROM itineraries
                WHERE user_id = $1
                ORDER BY created_at DESC
                ",
            )
            .bind(user.id)
            .fetch_all(&self.connection_pool)
        })
        .await
        .map_err(database_error)?;

        if itineraries.is_empty() {
            return Ok(Vec::new());
        }

        let ids = itineraries
            .iter()
            .map(|itinerary| itinerary.id.clone())
            .collect::<Vec<String>>();

        let query = format!("{SELECT_STOPS} WHERE ip.itinerary_id = ANY($1) ORDER BY ip.sort_order");
        let stops = with_retry(|| {
            sqlx::query_as::<_, StopRow>(&query)
                .bind(&ids)
                .fetch_all(&self.connection_pool)
        })
        .await
        .map_err(database_error)?;

        Ok(ItineraryAggregate::assemble(
            itineraries,
            stops.into_iter().map(Stop::from).collect(),
        ))
    }

    /// Create an itinerary with all its stops
    ///
    /// The POIs of the stops are created or refreshed along the way, everything happens within a
    /// single transaction
    pub async fn create_itinerary(
        &self,
        values: &ItineraryValues<'_>,
    ) -> Result<ItineraryAggregate> {
        let mut transaction = self.connection_pool.begin().await.map_err(database_error)?;

        sqlx::query(
            r"
            INSERT INTO itineraries (id, user_id, name, date, description)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(values.id)
        .bind(values.user.id)
        .bind(values.name)
        .bind(values.date)
        .bind(values.description)
        .execute(&mut *transaction)
        .await
        .map_err(database_error)?;

        insert_stops(&mut transaction, values).await?;

        let aggregate = fetch_aggregate(&mut transaction, values.id).await?;

        transaction.commit().await.map_err(database_error)?;

        Ok(aggregate)
    }

    /// Update an itinerary of the user, its stops are replaced by the given ones
    ///
    /// `None` when the itinerary does not exist or is owned by someone else
    pub async fn update_itinerary(
        &self,
        values: &ItineraryValues<'_>,
    ) -> Result<Option<ItineraryAggregate>> {
        let mut transaction = self.connection_pool.begin().await.map_err(database_error)?;

        let result = sqlx::query(
            r"
            UPDATE itineraries
            SET
                name = $3,
                date = $4,
                description = $5,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(values.id)
        .bind(values.user.id)
        .bind(values.name)
        .bind(values.date)
        .bind(values.description)
        .execute(&mut *transaction)
        .await
        .map_err(database_error)?;

        // dropping the transaction rolls it back
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        sqlx::query("DELETE FROM itinerary_pois WHERE itinerary_id = $1")
            .bind(values.id)
            .execute(&mut *transaction)
            .await
            .map_err(database_error)?;

        insert_stops(&mut transaction, values).await?;

        let aggregate = fetch_aggregate(&mut transaction, values.id).await?;

        transaction.commit().await.map_err(database_error)?;

        Ok(Some(aggregate))
    }

    /// Delete an itinerary of the user, stops go with it
    pub async fn delete_itinerary(&self, user: &User, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM itineraries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user.id)
            .execute(&self.connection_pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }
}

/// Upsert the POI of every stop, then insert the stop itself at its position
async fn insert_stops(connection: &mut PgConnection, values: &ItineraryValues<'_>) -> Result<()> {
    for (index, stop) in values.stops.iter().enumerate() {
        let sort_order = i32::try_from(index)
            .map_err(|_| Error::Query(format!("Too many stops: {}", values.stops.len())))?;

        upsert_poi(connection, values.user, stop).await?;

        sqlx::query(
            r"
            INSERT INTO itinerary_pois (
                id,
                itinerary_id,
                poi_id,
                description,
                budget,
                transport_type,
                transport_description,
                transport_budget,
                sort_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.id)
        .bind(&stop.poi_id)
        .bind(&stop.description)
        .bind(stop.budget)
        .bind(&stop.transport_type)
        .bind(&stop.transport_description)
        .bind(stop.transport_budget)
        .bind(sort_order)
        .execute(&mut *connection)
        .await
        .map_err(database_error)?;
    }

    Ok(())
}

/// Create the POI of a stop, or refresh its descriptive fields when it exists
///
/// A POI of another user is never touched, that results in [`Error::ForeignPoi`]
async fn upsert_poi(connection: &mut PgConnection, user: &User, stop: &StopValues) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO pois (id, user_id, name, address, location, tel, "type", typecode)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE
        SET
            name = EXCLUDED.name,
            address = EXCLUDED.address,
            location = EXCLUDED.location,
            tel = EXCLUDED.tel,
            "type" = EXCLUDED."type",
            typecode = EXCLUDED.typecode
        WHERE pois.user_id = EXCLUDED.user_id
        "#,
    )
    .bind(&stop.poi_id)
    .bind(user.id)
    .bind(&stop.poi_name)
    .bind(&stop.poi_address)
    .bind(&stop.poi_location)
    .bind(&stop.poi_tel)
    .bind(&stop.poi_type)
    .bind(&stop.poi_typecode)
    .execute(&mut *connection)
    .await
    .map_err(database_error)?;

    if result.rows_affected() == 0 {
        return Err(Error::ForeignPoi(stop.poi_id.clone()));
    }

    Ok(())
}

/// Read back a single itinerary with its stops, on the given connection
async fn fetch_aggregate(connection: &mut PgConnection, id: &str) -> Result<ItineraryAggregate> {
    let itinerary = sqlx::query_as::<_, Itinerary>("SELECT * FROM itineraries WHERE id = $1")
        .bind(id)
        .fetch_one(&mut *connection)
        .await
        .map_err(database_error)?;

    let query = format!("{SELECT_STOPS} WHERE ip.itinerary_id = $1 ORDER BY ip.sort_order");
    let stops = sqlx::query_as::<_, StopRow>(&query)
        .bind(id)
        .fetch_all(&mut *connection)
        .await
        .map_err(database_error)?;

    Ok(ItineraryAggregate {
        itinerary,
        stops: stops.into_iter().map(Stop::from).collect(),
    })
}
