use axum::http::Method;
use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[sqlx::test]
async fn test_delete_user_removes_everything(pool: sqlx::PgPool) {
    let mut app = helper::setup_test_app(pool.clone()).await;

    let alice = helper::register(&mut app, "alice").await;
    let bob = helper::register(&mut app, "bob").await;

    for user in [&alice, &bob] {
        let access_token = user.access_token.as_str();

        let (status_code, _) = helper::post(
            &mut app,
            "/api/itineraries",
            access_token,
            json!({
                "id": format!("{}-trip", user.username),
                "name": "Trip",
                "pois": [
                    { "id": format!("{}-p1", user.username), "name": "Tower" },
                    { "id": format!("{}-p2", user.username), "name": "Park" },
                ],
            }),
        )
        .await;
        assert_eq!(StatusCode::CREATED, status_code);

        let (status_code, _) = helper::post(
            &mut app,
            "/api/budgets",
            access_token,
            json!({ "name": "Flights", "amount": 500 }),
        )
        .await;
        assert_eq!(StatusCode::CREATED, status_code);

        let (status_code, _) =
            helper::post(&mut app, "/api/memos", access_token, json!({ "title": "Packing" }))
                .await;
        assert_eq!(StatusCode::CREATED, status_code);
    }

    let tables = ["pois", "itineraries", "budgets", "memos"];

    for table in tables {
        assert!(helper::count_owned(&pool, table, &alice.id).await > 0, "{table}");
    }

    let (status_code, _) = helper::send(
        &mut app,
        Method::DELETE,
        "/api/auth/me",
        Some(&alice.access_token),
        Some(json!({ "password": helper::PASSWORD })),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    for table in tables {
        assert_eq!(0, helper::count_owned(&pool, table, &alice.id).await, "{table}");
        assert!(helper::count_owned(&pool, table, &bob.id).await > 0, "{table}");
    }

    let stops = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM itinerary_pois")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(2, stops);
}
