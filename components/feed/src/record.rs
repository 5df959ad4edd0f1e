use std::{
    fmt::{Display, Formatter},
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use rust_decimal::Decimal;

// shared by every simulator in the process, so an id is never handed out twice
static NEXT_TX_ID: AtomicU64 = AtomicU64::new(1);

// ids are zero-padded to 9 digits and grow past that, a u64 needs at most 13
const MIN_ID_LEN: usize = 9;
const MAX_ID_LEN: usize = 13;
const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxId(u64);

impl TxId {
    pub(crate) fn next() -> Self {
        Self(NEXT_TX_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for TxId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut buf = [b'0'; MAX_ID_LEN];
        let mut start = MAX_ID_LEN;
        let mut value = self.0;
        while value > 0 {
            start -= 1;
            buf[start] = ID_ALPHABET[(value % 36) as usize];
            value /= 36;
        }
        let start = start.min(MAX_ID_LEN - MIN_ID_LEN);
        // the alphabet is ascii
        f.write_str(std::str::from_utf8(&buf[start..]).map_err(|_| std::fmt::Error)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceAsset {
    Usd,
    Eur,
    Gbp,
}

impl SourceAsset {
    pub const ALL: [SourceAsset; 3] = [SourceAsset::Usd, SourceAsset::Eur, SourceAsset::Gbp];

    pub fn code(&self) -> &'static str {
        match self {
            SourceAsset::Usd => "USD",
            SourceAsset::Eur => "EUR",
            SourceAsset::Gbp => "GBP",
        }
    }
}

impl Display for SourceAsset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestAsset {
    Btc,
    Eth,
    Usdc,
}

impl DestAsset {
    pub const ALL: [DestAsset; 3] = [DestAsset::Btc, DestAsset::Eth, DestAsset::Usdc];

    pub fn code(&self) -> &'static str {
        match self {
            DestAsset::Btc => "BTC",
            DestAsset::Eth => "ETH",
            DestAsset::Usdc => "USDC",
        }
    }
}

impl Display for DestAsset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Lifecycle of a record. Variants are declared in lifecycle order, so `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TxStatus {
    Pending,
    Processing,
    Completed,
}

impl TxStatus {
    pub fn next(&self) -> Option<TxStatus> {
        match self {
            TxStatus::Pending => Some(TxStatus::Processing),
            TxStatus::Processing => Some(TxStatus::Completed),
            TxStatus::Completed => None,
        }
    }

    /// Badge text shown by the display layer.
    pub fn label(&self) -> &'static str {
        match self {
            TxStatus::Pending => "Pending",
            TxStatus::Processing => "Processing",
            TxStatus::Completed => "Completed",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Processing => "processing",
            TxStatus::Completed => "completed",
        }
    }
}

impl Display for TxStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    id: TxId,
    source: SourceAsset,
    dest: DestAsset,
    amount: Decimal,
    status: TxStatus,
    created_at: Duration,
}

impl TransactionRecord {
    pub(crate) fn new(
        id: TxId,
        source: SourceAsset,
        dest: DestAsset,
        amount: Decimal,
        created_at: Duration,
    ) -> Self {
        Self { id, source, dest, amount, status: TxStatus::Pending, created_at }
    }

    pub fn id(&self) -> TxId {
        self.id
    }

    pub fn source(&self) -> SourceAsset {
        self.source
    }

    pub fn dest(&self) -> DestAsset {
        self.dest
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn status(&self) -> TxStatus {
        self.status
    }

    /// Time on the simulator clock at which the record was generated.
    pub fn created_at(&self) -> Duration {
        self.created_at
    }

    /// Moves the record to `target` when it is the direct successor of the current status.
    /// Returns false (and changes nothing) otherwise, so a status can't regress or skip.
    pub(crate) fn advance_to(&mut self, target: TxStatus) -> bool {
        if self.status.next() != Some(target) {
            return false;
        }
        self.status = target;
        true
    }
}

impl Display for TransactionRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // padded so the view can align rows with a width
        f.pad(&format!("{:.2} {} → {}", self.amount, self.source, self.dest))
    }
}
