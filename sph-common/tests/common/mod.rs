//! Shared fixtures: a throwaway SQLite database with the order/sample schema

#![allow(dead_code)]

use sph_common::db::Store;
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

    pub async fn insert_order(&self, order_number: i64, service_type: &str, premixed: &str) {
        let mut conn = self.store.connect().await.unwrap();
        sqlx::query("INSERT INTO ordertable (OrderNumber, ServiceType, Premixed) VALUES (?, ?, ?)")
            .bind(order_number)
            .bind(service_type)
            .bind(premixed)
            .execute(&mut conn)
            .await
            .unwrap();
    }

    pub async fn insert_sample(&self, row: &SampleRow<'_>) {
        let mut conn = self.store.connect().await.unwrap();
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

    /// Insert the order (once) and the sample
    pub async fn insert(&self, row: &SampleRow<'_>) {
        let mut conn = self.store.connect().await.unwrap();
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ordertable WHERE OrderNumber = ?")
            .bind(row.order_number)
            .fetch_one(&mut conn)
            .await
            .unwrap();

        if orders == 0 {
            self.insert_order(row.order_number, row.service_type, row.order_premixed)
                .await;
        }
        self.insert_sample(row).await;
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
