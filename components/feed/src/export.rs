use std::io::Write;

use crate::{record::TransactionRecord, FeedError};

#[derive(Debug, serde::Serialize)]
struct SnapshotRow<'a> {
    id: String,
    from: &'a str,
    to: &'a str,
    amount: String,
    status: &'a str,
    created_ms: u64,
}

impl<'a> From<&'a TransactionRecord> for SnapshotRow<'a> {
    fn from(r: &'a TransactionRecord) -> Self {
        Self {
            id: r.id().to_string(),
            from: r.source().code(),
            to: r.dest().code(),
            amount: format!("{:.2}", r.amount()),
            status: r.status().name(),
            created_ms: u64::try_from(r.created_at().as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Writes the records as csv, in the order given (newest first for a snapshot).
pub fn write_snapshot<W: Write>(records: &[TransactionRecord], out: W) -> Result<(), FeedError> {
    let mut wtr = csv::Writer::from_writer(out);
    // serialize() only emits a header for the first row, an empty feed still gets one
    if records.is_empty() {
        wtr.write_record(["id", "from", "to", "amount", "status", "created_ms"])?;
    }
    for record in records {
        wtr.serialize(SnapshotRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;

    use super::*;
    use crate::record::{DestAsset, SourceAsset, TxId, TxStatus};

    fn export(records: &[TransactionRecord]) -> String {
        let mut out = Vec::new();
        write_snapshot(records, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_snapshot_has_header() {
        assert_eq!(export(&[]), "id,from,to,amount,status,created_ms\n");
    }

    #[test]
    fn rows_follow_snapshot_order() {
        let mut completed = TransactionRecord::new(
            TxId::next(),
            SourceAsset::Usd,
            DestAsset::Btc,
            Decimal::new(10_000, 2),
            Duration::ZERO,
        );
        completed.advance_to(TxStatus::Processing);
        completed.advance_to(TxStatus::Completed);
        let pending = TransactionRecord::new(
            TxId::next(),
            SourceAsset::Gbp,
            DestAsset::Usdc,
            Decimal::new(1_009_999, 2),
            Duration::from_millis(3000),
        );

        let expected = format!(
            "id,from,to,amount,status,created_ms\n{},GBP,USDC,10099.99,pending,3000\n{},USD,BTC,\
             100.00,completed,0\n",
            pending.id(),
            completed.id()
        );
        assert_eq!(export(&[pending, completed]), expected);
    }
}
