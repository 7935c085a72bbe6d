//! Transaction history with search, filters and sorting.

use chrono::NaiveDateTime;

use crate::flow::{Currency, StepStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnStatus {
    Completed,
    Processing,
    Failed,
}

impl TxnStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TxnStatus::Completed => "Completed",
            TxnStatus::Processing => "Processing",
            TxnStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDateTime,
    pub amount_usd: f64,
    pub currency: Currency,
    pub status: TxnStatus,
    pub fee_usd: f64,
    pub recipient: String,
    /// End-to-end settlement time, unknown until the payout lands
    pub processing_time: Option<String>,
}

impl Transaction {
    pub fn corridor(&self) -> String {
        self.currency.corridor()
    }

    pub fn processing_time_label(&self) -> &str {
        self.processing_time.as_deref().unwrap_or("-")
    }

    /// Settlement stages shown in the details view
    pub fn settlement_stages(&self) -> [(&'static str, StepStatus); 3] {
        use StepStatus::{Completed, Pending, Waiting};
        let statuses = match self.status {
            TxnStatus::Completed => [Completed, Completed, Completed],
            TxnStatus::Processing => [Completed, Completed, Pending],
            TxnStatus::Failed => [Completed, Waiting, Waiting],
        };
        [
            ("Fiat Input", statuses[0]),
            ("Polygon Transfer", statuses[1]),
            ("Bank Payout", statuses[2]),
        ]
    }
}

/// Corridor filter applied to the transactions table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorridorFilter {
    #[default]
    All,
    Only(Currency),
}

impl CorridorFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        match self {
            CorridorFilter::All => true,
            CorridorFilter::Only(currency) => txn.currency == *currency,
        }
    }

    /// All → NGN → GHS → BRL → KES → All
    pub fn cycle(&self) -> Self {
        match self {
            CorridorFilter::All => CorridorFilter::Only(Currency::Ngn),
            CorridorFilter::Only(Currency::Kes) => CorridorFilter::All,
            CorridorFilter::Only(currency) => CorridorFilter::Only(currency.next()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            CorridorFilter::All => "All corridors".to_string(),
            CorridorFilter::Only(currency) => currency.corridor(),
        }
    }
}

/// Status filter, `None` shows every status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFilter(pub Option<TxnStatus>);

impl StatusFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.0.map_or(true, |status| txn.status == status)
    }

    /// All → Completed → Processing → Failed → All
    pub fn cycle(&self) -> Self {
        StatusFilter(match self.0 {
            None => Some(TxnStatus::Completed),
            Some(TxnStatus::Completed) => Some(TxnStatus::Processing),
            Some(TxnStatus::Processing) => Some(TxnStatus::Failed),
            Some(TxnStatus::Failed) => None,
        })
    }

    pub fn label(&self) -> &'static str {
        self.0.map_or("All statuses", |status| status.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first
    #[default]
    Date,
    /// Largest first
    Amount,
}

impl SortKey {
    pub fn toggle(&self) -> Self {
        match self {
            SortKey::Date => SortKey::Amount,
            SortKey::Amount => SortKey::Date,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Date => "Sort by date",
            SortKey::Amount => "Sort by amount",
        }
    }
}

/// Search, filter and sort applied to the history table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TxnQuery {
    /// Case-insensitive substring of the id or recipient
    pub search: String,
    pub status: StatusFilter,
    pub corridor: CorridorFilter,
    pub sort: SortKey,
}

impl TxnQuery {
    pub fn matches(&self, txn: &Transaction) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || txn.id.to_lowercase().contains(&needle)
            || txn.recipient.to_lowercase().contains(&needle);
        matches_search && self.status.matches(txn) && self.corridor.matches(txn)
    }

    pub fn apply<'a>(&self, txns: &'a [Transaction]) -> Vec<&'a Transaction> {
        let mut rows: Vec<&Transaction> = txns.iter().filter(|t| self.matches(t)).collect();
        match self.sort {
            SortKey::Date => rows.sort_by(|a, b| b.date.cmp(&a.date)),
            SortKey::Amount => rows.sort_by(|a, b| b.amount_usd.total_cmp(&a.amount_usd)),
        }
        rows
    }

    /// True when anything narrows the full history
    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty()
            || self.status != StatusFilter::default()
            || self.corridor != CorridorFilter::All
    }
}

#[allow(clippy::too_many_arguments)]
fn txn(
    id: &str,
    date: &str,
    amount_usd: f64,
    currency: Currency,
    status: TxnStatus,
    fee_usd: f64,
    recipient: &str,
    processing_time: Option<&str>,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M").unwrap_or_default(),
        amount_usd,
        currency,
        status,
        fee_usd,
        recipient: recipient.to_string(),
        processing_time: processing_time.map(str::to_string),
    }
}

/// Sample transaction history, newest first
pub fn transaction_history() -> Vec<Transaction> {
    use Currency::{Brl, Ghs, Kes, Ngn};
    use TxnStatus::{Completed, Failed, Processing};

    vec![
        txn("TXN-8942", "2025-11-11 14:32", 250.00, Ngn, Completed, 1.25, "Chinedu A.", Some("1.8s")),
        txn("TXN-8941", "2025-11-11 13:18", 100.00, Ghs, Completed, 0.50, "Kwame O.", Some("2.1s")),
        txn("TXN-8940", "2025-11-11 12:45", 500.00, Brl, Processing, 2.50, "Maria S.", None),
        txn("TXN-8939", "2025-11-11 11:22", 75.00, Kes, Completed, 0.38, "James M.", Some("2.3s")),
        txn("TXN-8938", "2025-11-11 09:15", 1000.00, Ngn, Failed, 0.00, "Ada N.", None),
        txn("TXN-8937", "2025-11-10 18:45", 350.00, Ghs, Completed, 1.75, "Ama K.", Some("2.0s")),
        txn("TXN-8936", "2025-11-10 16:30", 200.00, Brl, Completed, 1.00, "Pedro L.", Some("1.9s")),
        txn("TXN-8935", "2025-11-10 14:20", 450.00, Ngn, Completed, 2.25, "Tunde B.", Some("2.2s")),
        txn("TXN-8934", "2025-11-10 11:05", 125.00, Kes, Completed, 0.63, "Lucy W.", Some("2.4s")),
        txn("TXN-8933", "2025-11-10 09:30", 800.00, Ngn, Completed, 4.00, "Ibrahim Y.", Some("1.7s")),
    ]
}

/// Totals over a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TxnTotals {
    pub count: usize,
    pub completed: usize,
    pub processing: usize,
    pub failed: usize,
    /// Volume of completed transactions only
    pub settled_usd: f64,
    pub fees_usd: f64,
}

pub fn totals<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> TxnTotals {
    txns.into_iter().fold(TxnTotals::default(), |mut acc, t| {
        acc.count += 1;
        acc.fees_usd += t.fee_usd;
        match t.status {
            TxnStatus::Completed => {
                acc.completed += 1;
                acc.settled_usd += t.amount_usd;
            }
            TxnStatus::Processing => acc.processing += 1,
            TxnStatus::Failed => acc.failed += 1,
        }
        acc
    })
}
