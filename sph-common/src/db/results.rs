//! SPH result updates

use crate::db::{Store, UpdateRecord};
use crate::{Error, Result};
use sqlx::Connection;
use tracing::debug;

const UPDATE_SAMPLE: &str = r#"
    UPDATE sampletable
    SET measuredSampleCntr = ?,
        S = ?,
        P = ?,
        H = ?,
        a260_a280 = ?,
        a260_a230 = ?
    WHERE OrderNumber = ?
      AND SampleID = ?
"#;

const SAMPLE_EXISTS: &str =
    "SELECT COUNT(*) FROM sampletable WHERE OrderNumber = ? AND SampleID = ?";

/// Write the measured values and SPH triple onto the matching sample row
///
/// Unconditional single-statement update. An update that touches no row
/// fails with `Error::NoMatchingRecord` unless the row exists (MySQL counts
/// only changed rows, so rewriting identical values reports zero).
pub async fn apply_update(store: &Store, update: &UpdateRecord) -> Result<()> {
    let mut conn = store.connect().await?;

    let affected = sqlx::query(UPDATE_SAMPLE)
        .bind(update.measured_concentration)
        .bind(update.s)
        .bind(update.p)
        .bind(update.h)
        .bind(update.a260_a280)
        .bind(update.a260_a230)
        .bind(update.order_number)
        .bind(update.sample_id)
        .execute(&mut conn)
        .await?
        .rows_affected();

    if affected == 0 {
        let existing: i64 = sqlx::query_scalar(SAMPLE_EXISTS)
            .bind(update.order_number)
            .bind(update.sample_id)
            .fetch_one(&mut conn)
            .await?;

        if existing == 0 {
            conn.close().await?;
            return Err(Error::NoMatchingRecord {
                order_number: update.order_number,
                sample_id: update.sample_id,
            });
        }
    }

    conn.close().await?;

    debug!(
        order_number = update.order_number,
        sample_id = update.sample_id,
        affected,
        "Sample update committed"
    );

    Ok(())
}
