//! Order context queries

use crate::db::{OrderContext, ServiceType, Store};
use crate::{Error, Result};
use sqlx::any::AnyRow;
use sqlx::{Connection, Row};
use tracing::debug;

const ORDER_CONTEXT_QUERY: &str = r#"
    SELECT o.ServiceType AS ServiceType,
           s.DNAType AS DNAType,
           s.purification AS purification,
           s.isSpecial AS isSpecial,
           s.SampleSize AS SampleSize,
           s.Premixed AS s_pre,
           o.Premixed AS o_pre
    FROM ordertable o
    JOIN sampletable s ON o.OrderNumber = s.OrderNumber
    WHERE o.OrderNumber = ?
      AND s.SampleID = ?
"#;

/// Fetch the order/sample row used for classification
///
/// Exactly one row must match: zero rows is `Error::NotFound`, more than one
/// is `Error::AmbiguousMatch`. Never cached.
pub async fn fetch_order_context(
    store: &Store,
    order_number: i64,
    sample_id: i64,
) -> Result<OrderContext> {
    let mut conn = store.connect().await?;

    let rows = sqlx::query(ORDER_CONTEXT_QUERY)
        .bind(order_number)
        .bind(sample_id)
        .fetch_all(&mut conn)
        .await?;

    conn.close().await?;

    debug!(order_number, sample_id, rows = rows.len(), "Order context query complete");

    match rows.as_slice() {
        [] => Err(Error::NotFound {
            order_number,
            sample_id,
        }),
        [row] => order_context_from_row(row),
        _ => Err(Error::AmbiguousMatch {
            order_number,
            sample_id,
            rows: rows.len(),
        }),
    }
}

fn order_context_from_row(row: &AnyRow) -> Result<OrderContext> {
    Ok(OrderContext {
        service_type: ServiceType::from_db(&text_column(row, "ServiceType")?),
        dna_type: text_column(row, "DNAType")?,
        purification: text_column(row, "purification")?,
        is_special: text_column(row, "isSpecial")?,
        sample_size: text_column(row, "SampleSize")?,
        sample_premixed: text_column(row, "s_pre")?,
        order_premixed: text_column(row, "o_pre")?,
    })
}

/// NULL reads as an empty string, which matches no classification value
///
/// MySQL sends TEXT columns with a binary wire type, which the `Any` driver
/// surfaces as bytes rather than text; those are decoded as UTF-8.
fn text_column(row: &AnyRow, column: &str) -> Result<String> {
    match row.try_get::<Option<String>, _>(column) {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(sqlx::Error::ColumnDecode { .. }) => {
            let bytes = row.try_get::<Option<Vec<u8>>, _>(column)?.unwrap_or_default();
            String::from_utf8(bytes).map_err(|e| Error::Database(sqlx::Error::Decode(Box::new(e))))
        }
        Err(e) => Err(e.into()),
    }
}
