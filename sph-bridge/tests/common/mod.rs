//! Shared fixtures: a throwaway SQLite database with the order/sample schema
//! and a mock instrument REST endpoint

use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::Value;
use sph_common::db::Store;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestDb {
    pub store: Store,
    // Keeps the database file alive for the test's duration
    _dir: TempDir,
}

pub struct SampleRow<'a> {
    pub order_number: i64,
    pub sample_id: i64,
    pub service_type: &'a str,
    pub order_premixed: &'a str,
    pub dna_type: &'a str,
    pub purification: &'a str,
    pub is_special: &'a str,
    pub sample_size: &'a str,
    pub sample_premixed: &'a str,
}

impl Default for SampleRow<'_> {
    fn default() -> Self {
        Self {
            order_number: 960254,
            sample_id: 1,
            service_type: "SeqRegular",
            order_premixed: "N",
            dna_type: "Plasmid",
            purification: "",
            is_special: "no",
            sample_size: "4 kb",
            sample_premixed: "N",
        }
    }
}

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE ordertable (
        OrderNumber INTEGER PRIMARY KEY,
        ServiceType TEXT,
        Premixed TEXT
    )
    "#,
    r#"
    CREATE TABLE sampletable (
        OrderNumber INTEGER NOT NULL,
        SampleID INTEGER NOT NULL,
        DNAType TEXT,
        purification TEXT,
        isSpecial TEXT,
        SampleSize TEXT,
        Premixed TEXT,
        measuredSampleCntr INTEGER,
        S REAL,
        P INTEGER,
        H INTEGER,
        a260_a280 REAL,
        a260_a230 REAL
    )
    "#,
];

impl TestDb {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("lab.db").display());
        let store = Store::new(url);

        let mut conn = store.connect().await.expect("Should open test database");
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&mut conn).await.expect("Should create table");
        }

        Self { store, _dir: dir }
    }

    /// Insert the order (once) and the sample
    pub async fn insert(&self, row: &SampleRow<'_>) {
        let mut conn = self.store.connect().await.unwrap();
        sqlx::query("INSERT OR IGNORE INTO ordertable (OrderNumber, ServiceType, Premixed) VALUES (?, ?, ?)")
            .bind(row.order_number)
            .bind(row.service_type)
            .bind(row.order_premixed)
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO sampletable (OrderNumber, SampleID, DNAType, purification, isSpecial, SampleSize, Premixed) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(row.order_number)
        .bind(row.sample_id)
        .bind(row.dna_type)
        .bind(row.purification)
        .bind(row.is_special)
        .bind(row.sample_size)
        .bind(row.sample_premixed)
        .execute(&mut conn)
        .await
        .unwrap();
    }

    /// (measuredSampleCntr, S, P, H, a260_a280, a260_a230); None until written
    pub async fn written_values(
        &self,
        order_number: i64,
        sample_id: i64,
    ) -> Option<(i64, f64, i64, i64, f64, f64)> {
        let mut conn = self.store.connect().await.unwrap();
        let row = sqlx::query_as::<_, WrittenRow>(
            "SELECT measuredSampleCntr, S, P, H, a260_a280, a260_a230 \
             FROM sampletable WHERE OrderNumber = ? AND SampleID = ?",
        )
        .bind(order_number)
        .bind(sample_id)
        .fetch_one(&mut conn)
        .await
        .unwrap();

        match row {
            (Some(cntr), Some(s), Some(p), Some(h), Some(r280), Some(r230)) => {
                Some((cntr, s, p, h, r280, r230))
            }
            _ => None,
        }
    }
}

type WrittenRow = (
    Option<i64>,
    Option<f64>,
    Option<i64>,
    Option<i64>,
    Option<f64>,
    Option<f64>,
);

/// In-process stand-in for the instrument's REST endpoint
pub struct MockInstrument {
    pub address: String,
    hits: Arc<AtomicUsize>,
}

impl MockInstrument {
    /// Serve `body` with `status` from the sample endpoint
    pub async fn start(status: u16, body: Value) -> Self {
        Self::start_sequence(status, vec![body]).await
    }

    /// Serve `bodies` in order, one per request; the last one repeats
    pub async fn start_sequence(status: u16, bodies: Vec<Value>) -> Self {
        assert!(!bodies.is_empty(), "Need at least one body");

        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let bodies = Arc::new(bodies);
        let status = StatusCode::from_u16(status).unwrap();

        let app = Router::new().route(
            "/rest/session/sample",
            get(move || {
                let bodies = bodies.clone();
                let counter = counter.clone();
                async move {
                    let hit = counter.fetch_add(1, Ordering::SeqCst);
                    let body = bodies[hit.min(bodies.len() - 1)].clone();
                    (status, Json(body))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { address, hits }
    }

    /// Number of sample fetches served so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
