//! Integration tests for `PostgresStore` against a real Postgres instance
//! (§4.2 player lookup, §4.1 store tier, §6 schema).

mod common;

use casino_core::ports::{ExchangeRateStore, PlayerStore};
use casino_core::types::RateEntry;
use chrono::Utc;

use common::fixtures::TestDb;

#[tokio::test]
async fn missing_player_is_not_found_not_error() {
    let db = TestDb::new().await;
    let player = db.store.get_player(999).await.unwrap();
    assert!(player.is_none());
}

#[tokio::test]
async fn player_lookup_returns_stored_row() {
    let db = TestDb::new().await;
    sqlx::query(
        "INSERT INTO players (id, email, last_signed_in_at) VALUES ($1, $2, $3)",
    )
    .bind(123_i64)
    .bind("player@example.com")
    .bind(Utc::now())
    .execute(db.store.pool())
    .await
    .unwrap();

    let player = db.store.get_player(123).await.unwrap().unwrap();
    assert_eq!(player.email, "player@example.com");
    assert!(player.last_signed_in_at.is_some());
}

#[tokio::test]
async fn upsert_rates_then_get_rate_round_trips() {
    let db = TestDb::new().await;
    let entries = vec![
        RateEntry {
            currency: "USD".into(),
            rate_to_base: 1.0989,
            updated_at: Utc::now(),
        },
        RateEntry {
            currency: "BTC".into(),
            rate_to_base: 0.0000286,
            updated_at: Utc::now(),
        },
    ];
    db.store.upsert_rates(&entries).await.unwrap();

    let usd = db.store.get_rate("USD").await.unwrap().unwrap();
    assert!((usd.rate_to_base - 1.0989).abs() < f64::EPSILON);

    assert!(db.store.get_rate("GBP").await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_rates_overwrites_existing_row() {
    let db = TestDb::new().await;
    let first = RateEntry {
        currency: "USD".into(),
        rate_to_base: 1.0,
        updated_at: Utc::now(),
    };
    db.store.upsert_rates(&[first]).await.unwrap();

    let second = RateEntry {
        currency: "USD".into(),
        rate_to_base: 1.1,
        updated_at: Utc::now(),
    };
    db.store.upsert_rates(&[second]).await.unwrap();

    let rate = db.store.get_rate("USD").await.unwrap().unwrap();
    assert!((rate.rate_to_base - 1.1).abs() < f64::EPSILON);
}

#[tokio::test]
async fn list_rates_is_ordered_by_currency() {
    let db = TestDb::new().await;
    let entries = vec![
        RateEntry {
            currency: "USD".into(),
            rate_to_base: 1.1,
            updated_at: Utc::now(),
        },
        RateEntry {
            currency: "BTC".into(),
            rate_to_base: 0.00003,
            updated_at: Utc::now(),
        },
        RateEntry {
            currency: "GBP".into(),
            rate_to_base: 0.85,
            updated_at: Utc::now(),
        },
    ];
    db.store.upsert_rates(&entries).await.unwrap();

    let listed = db.store.list_rates().await.unwrap();
    let currencies: Vec<&str> = listed.iter().map(|r| r.currency.as_str()).collect();
    assert_eq!(currencies, vec!["BTC", "GBP", "USD"]);
}
