use std::time::Duration;

use rand::Rng;
use rust_decimal::Decimal;

use crate::record::{DestAsset, SourceAsset, TransactionRecord, TxId};

// amounts are drawn in cents from [100.00, 10100.00)
const MIN_AMOUNT_CENTS: i64 = 10_000;
const MAX_AMOUNT_CENTS: i64 = 1_010_000;

pub(crate) struct RecordGenerator<R> {
    rng: R,
}

impl<R: Rng> RecordGenerator<R> {
    pub(crate) fn new(rng: R) -> Self {
        Self { rng }
    }

    pub(crate) fn generate(&mut self, created_at: Duration) -> TransactionRecord {
        let source = SourceAsset::ALL[self.rng.gen_range(0..SourceAsset::ALL.len())];
        let dest = DestAsset::ALL[self.rng.gen_range(0..DestAsset::ALL.len())];
        let amount = Decimal::new(self.rng.gen_range(MIN_AMOUNT_CENTS..MAX_AMOUNT_CENTS), 2);

        TransactionRecord::new(TxId::next(), source, dest, amount, created_at)
    }
}
