//! The narrow catalog interface the engine is specified against, plus an
//! in-memory implementation.
//!
//! The engine never issues storage queries itself; any persistence layer
//! that can answer these three operations can back it.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use fisco_core::Cuit;

use crate::error::CatalogError;
use crate::models::{ExpectedInvoiceRecord, ExpectedKey, ExpectedStatus};

/// Catalog of expected invoices.
pub trait ExpectedCatalog {
    /// All records with the given key in any of the given statuses.
    ///
    /// The catalog is expected to be key-unique among `Pending` records, so
    /// more than one hit is an anomaly the caller must resolve.
    fn find_by_key(
        &self,
        key: &ExpectedKey,
        statuses: &[ExpectedStatus],
    ) -> Result<Vec<ExpectedInvoiceRecord>, CatalogError>;

    /// All records for a CUIT, optionally restricted to an issue-date
    /// interval and/or total interval, ordered by issue date descending.
    fn find_by_cuit(
        &self,
        cuit: &Cuit,
        date_window: Option<(NaiveDate, NaiveDate)>,
        total_window: Option<(Decimal, Decimal)>,
        statuses: &[ExpectedStatus],
    ) -> Result<Vec<ExpectedInvoiceRecord>, CatalogError>;

    /// Atomically transition `Pending -> Matched`, linking the matched
    /// document. Returns `false` when the record is no longer `Pending`
    /// (claimed by a concurrent document); implementations must perform the
    /// status re-check and the update under one lock/transaction.
    fn mark_matched(
        &self,
        id: i64,
        document_id: i64,
        invoice_id: Option<i64>,
    ) -> Result<bool, CatalogError>;
}

/// In-memory catalog, used by tests and small deployments.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    records: RwLock<BTreeMap<i64, ExpectedInvoiceRecord>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: ExpectedInvoiceRecord) {
        self.records
            .write()
            .expect("catalog lock poisoned")
            .insert(record.id, record);
    }

    /// Fetch a record by id.
    pub fn get(&self, id: i64) -> Option<ExpectedInvoiceRecord> {
        self.records
            .read()
            .expect("catalog lock poisoned")
            .get(&id)
            .cloned()
    }
}

impl ExpectedCatalog for MemoryCatalog {
    fn find_by_key(
        &self,
        key: &ExpectedKey,
        statuses: &[ExpectedStatus],
    ) -> Result<Vec<ExpectedInvoiceRecord>, CatalogError> {
        let records = self.records.read().expect("catalog lock poisoned");

        // BTreeMap iteration is id-ascending, which keeps anomaly
        // resolution (lowest id wins) deterministic.
        Ok(records
            .values()
            .filter(|r| statuses.contains(&r.status) && r.key() == *key)
            .cloned()
            .collect())
    }

    fn find_by_cuit(
        &self,
        cuit: &Cuit,
        date_window: Option<(NaiveDate, NaiveDate)>,
        total_window: Option<(Decimal, Decimal)>,
        statuses: &[ExpectedStatus],
    ) -> Result<Vec<ExpectedInvoiceRecord>, CatalogError> {
        let records = self.records.read().expect("catalog lock poisoned");

        let mut hits: Vec<ExpectedInvoiceRecord> = records
            .values()
            .filter(|r| statuses.contains(&r.status) && r.cuit == *cuit)
            .filter(|r| date_window.is_none_or(|(from, to)| r.issue_date >= from && r.issue_date <= to))
            .filter(|r| total_window.is_none_or(|(min, max)| r.total >= min && r.total <= max))
            .cloned()
            .collect();

        hits.sort_by(|a, b| b.issue_date.cmp(&a.issue_date).then(a.id.cmp(&b.id)));
        Ok(hits)
    }

    fn mark_matched(
        &self,
        id: i64,
        document_id: i64,
        invoice_id: Option<i64>,
    ) -> Result<bool, CatalogError> {
        let mut records = self.records.write().expect("catalog lock poisoned");

        let Some(record) = records.get_mut(&id) else {
            return Err(CatalogError::Storage(format!("no record with id {}", id)));
        };

        if record.status != ExpectedStatus::Pending {
            return Ok(false);
        }

        record.status = ExpectedStatus::Matched;
        record.matched_document_id = Some(document_id);
        record.matched_invoice_id = invoice_id;
        Ok(true)
    }
}
