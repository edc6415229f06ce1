// 📸 Snapshot - One consistent view of every collection
//
// The engine never holds state between calls. Callers build a Snapshot
// (from JSON, CSV, or record by record) and hand it to the calculators.
//
// Collection data is routed by a fixed Collection → CollectionBatch table
// instead of string matching at each call site. Every record is decoded on
// its own so a shape error names the exact record that broke.

use crate::error::SnapshotError;
use crate::models::{
    flexible_date, Employee, ExpenseRecord, FixedAsset, InventoryMovement, JournalEntry,
    LeaveRequest, PayrollShift, Product, SaleRecord,
};
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

// ============================================================================
// COLLECTION IDENTIFIERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Products,
    Employees,
    FixedAssets,
    SalesLog,
    InventoryLog,
    PayrollLog,
    ExpensesLog,
    LeaveRequests,
    GeneralLedger,
}

/// Collections the dashboard syncs that carry nothing the engine reads
pub const IGNORED_COLLECTIONS: &[&str] = &[
    "suppliers",
    "hrDocuments",
    "purchaseOrders",
    "supplierInvoices",
    "userRoles",
];

impl Collection {
    pub const ALL: [Collection; 9] = [
        Collection::Products,
        Collection::Employees,
        Collection::FixedAssets,
        Collection::SalesLog,
        Collection::InventoryLog,
        Collection::PayrollLog,
        Collection::ExpensesLog,
        Collection::LeaveRequests,
        Collection::GeneralLedger,
    ];

    /// Wire identifier of the collection
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Employees => "employees",
            Collection::FixedAssets => "fixedAssets",
            Collection::SalesLog => "salesLog",
            Collection::InventoryLog => "inventoryLog",
            Collection::PayrollLog => "payrollLog",
            Collection::ExpensesLog => "expensesLog",
            Collection::LeaveRequests => "leaveRequests",
            Collection::GeneralLedger => "generalLedger",
        }
    }

    pub fn from_name(name: &str) -> Option<Collection> {
        match name {
            "products" => Some(Collection::Products),
            "employees" => Some(Collection::Employees),
            "fixedAssets" | "assets" => Some(Collection::FixedAssets),
            "salesLog" => Some(Collection::SalesLog),
            "inventoryLog" => Some(Collection::InventoryLog),
            "payrollLog" => Some(Collection::PayrollLog),
            "expensesLog" => Some(Collection::ExpensesLog),
            "leaveRequests" => Some(Collection::LeaveRequests),
            "generalLedger" => Some(Collection::GeneralLedger),
            _ => None,
        }
    }

    pub fn is_ignored(name: &str) -> bool {
        IGNORED_COLLECTIONS.contains(&name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::from_name(s).ok_or_else(|| SnapshotError::UnknownCollection(s.to_string()))
    }
}

// ============================================================================
// TYPED BATCHES
// ============================================================================

/// A full replacement for one collection, already decoded into its record type
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionBatch {
    Products(Vec<Product>),
    Employees(Vec<Employee>),
    FixedAssets(Vec<FixedAsset>),
    SalesLog(Vec<SaleRecord>),
    InventoryLog(Vec<InventoryMovement>),
    PayrollLog(Vec<PayrollShift>),
    ExpensesLog(Vec<ExpenseRecord>),
    LeaveRequests(Vec<LeaveRequest>),
    GeneralLedger(Vec<JournalEntry>),
}

impl CollectionBatch {
    pub fn collection(&self) -> Collection {
        match self {
            CollectionBatch::Products(_) => Collection::Products,
            CollectionBatch::Employees(_) => Collection::Employees,
            CollectionBatch::FixedAssets(_) => Collection::FixedAssets,
            CollectionBatch::SalesLog(_) => Collection::SalesLog,
            CollectionBatch::InventoryLog(_) => Collection::InventoryLog,
            CollectionBatch::PayrollLog(_) => Collection::PayrollLog,
            CollectionBatch::ExpensesLog(_) => Collection::ExpensesLog,
            CollectionBatch::LeaveRequests(_) => Collection::LeaveRequests,
            CollectionBatch::GeneralLedger(_) => Collection::GeneralLedger,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CollectionBatch::Products(v) => v.len(),
            CollectionBatch::Employees(v) => v.len(),
            CollectionBatch::FixedAssets(v) => v.len(),
            CollectionBatch::SalesLog(v) => v.len(),
            CollectionBatch::InventoryLog(v) => v.len(),
            CollectionBatch::PayrollLog(v) => v.len(),
            CollectionBatch::ExpensesLog(v) => v.len(),
            CollectionBatch::LeaveRequests(v) => v.len(),
            CollectionBatch::GeneralLedger(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode raw JSON documents into the collection's record type
    pub fn decode(collection: Collection, records: Vec<Value>) -> Result<Self, SnapshotError> {
        Ok(match collection {
            Collection::Products => CollectionBatch::Products(decode_records(collection, records)?),
            Collection::Employees => {
                CollectionBatch::Employees(decode_records(collection, records)?)
            }
            Collection::FixedAssets => {
                CollectionBatch::FixedAssets(decode_records(collection, records)?)
            }
            Collection::SalesLog => CollectionBatch::SalesLog(decode_records(collection, records)?),
            Collection::InventoryLog => {
                CollectionBatch::InventoryLog(decode_records(collection, records)?)
            }
            Collection::PayrollLog => {
                CollectionBatch::PayrollLog(decode_records(collection, records)?)
            }
            Collection::ExpensesLog => {
                CollectionBatch::ExpensesLog(decode_records(collection, records)?)
            }
            Collection::LeaveRequests => {
                CollectionBatch::LeaveRequests(decode_records(collection, records)?)
            }
            Collection::GeneralLedger => {
                CollectionBatch::GeneralLedger(decode_records(collection, records)?)
            }
        })
    }

    /// Decode a CSV export of one collection (header row required)
    pub fn from_csv_reader<R: io::Read>(
        collection: Collection,
        reader: R,
    ) -> Result<Self, SnapshotError> {
        let mut rdr = csv::Reader::from_reader(reader);
        Ok(match collection {
            Collection::Products => CollectionBatch::Products(read_csv(collection, &mut rdr)?),
            Collection::Employees => CollectionBatch::Employees(read_csv(collection, &mut rdr)?),
            Collection::FixedAssets => {
                CollectionBatch::FixedAssets(read_csv(collection, &mut rdr)?)
            }
            Collection::SalesLog => CollectionBatch::SalesLog(read_csv(collection, &mut rdr)?),
            Collection::InventoryLog => {
                CollectionBatch::InventoryLog(read_csv(collection, &mut rdr)?)
            }
            Collection::PayrollLog => CollectionBatch::PayrollLog(read_csv(collection, &mut rdr)?),
            Collection::ExpensesLog => {
                CollectionBatch::ExpensesLog(read_csv(collection, &mut rdr)?)
            }
            Collection::LeaveRequests => {
                CollectionBatch::LeaveRequests(read_csv(collection, &mut rdr)?)
            }
            Collection::GeneralLedger => {
                CollectionBatch::GeneralLedger(read_csv(collection, &mut rdr)?)
            }
        })
    }
}

fn decode_records<T: DeserializeOwned>(
    collection: Collection,
    records: Vec<Value>,
) -> Result<Vec<T>, SnapshotError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let label = match value.get("id").and_then(Value::as_str) {
                Some(id) => format!("#{} (id={})", index, id),
                None => format!("#{}", index),
            };
            serde_json::from_value(value).map_err(|e| SnapshotError::MalformedRecord {
                collection,
                record: label,
                reason: e.to_string(),
            })
        })
        .collect()
}

fn read_csv<T: DeserializeOwned, R: io::Read>(
    collection: Collection,
    rdr: &mut csv::Reader<R>,
) -> Result<Vec<T>, SnapshotError> {
    rdr.deserialize()
        .enumerate()
        .map(|(index, row)| {
            // Row 1 is the header
            row.map_err(|e| SnapshotError::MalformedRecord {
                collection,
                record: format!("row {}", index + 2),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Load one collection from a CSV file
pub fn load_csv_batch<P: AsRef<Path>>(
    collection: Collection,
    path: P,
) -> Result<CollectionBatch, SnapshotError> {
    let file = fs::File::open(path.as_ref()).map_err(|source| SnapshotError::Io {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    let batch = CollectionBatch::from_csv_reader(collection, file)?;
    info!(collection = %collection, records = batch.len(), "loaded CSV collection");
    Ok(batch)
}

// ============================================================================
// SNAPSHOT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// "Today" for depreciation; fixed so results are reproducible
    #[serde(with = "flexible_date")]
    pub as_of: NaiveDate,

    pub products: Vec<Product>,
    pub employees: Vec<Employee>,
    pub fixed_assets: Vec<FixedAsset>,
    pub sales_log: Vec<SaleRecord>,
    pub inventory_log: Vec<InventoryMovement>,
    pub payroll_log: Vec<PayrollShift>,
    pub expenses_log: Vec<ExpenseRecord>,
    pub leave_requests: Vec<LeaveRequest>,
    pub general_ledger: Vec<JournalEntry>,
}

impl Snapshot {
    /// Empty snapshot evaluated as of the given date
    pub fn new(as_of: NaiveDate) -> Self {
        Snapshot {
            as_of,
            products: Vec::new(),
            employees: Vec::new(),
            fixed_assets: Vec::new(),
            sales_log: Vec::new(),
            inventory_log: Vec::new(),
            payroll_log: Vec::new(),
            expenses_log: Vec::new(),
            leave_requests: Vec::new(),
            general_ledger: Vec::new(),
        }
    }

    /// Replace one collection wholesale
    pub fn apply(&mut self, batch: CollectionBatch) {
        debug!(collection = %batch.collection(), records = batch.len(), "applying batch");
        match batch {
            CollectionBatch::Products(v) => self.products = v,
            CollectionBatch::Employees(v) => self.employees = v,
            CollectionBatch::FixedAssets(v) => self.fixed_assets = v,
            CollectionBatch::SalesLog(v) => self.sales_log = v,
            CollectionBatch::InventoryLog(v) => self.inventory_log = v,
            CollectionBatch::PayrollLog(v) => self.payroll_log = v,
            CollectionBatch::ExpensesLog(v) => self.expenses_log = v,
            CollectionBatch::LeaveRequests(v) => self.leave_requests = v,
            CollectionBatch::GeneralLedger(v) => self.general_ledger = v,
        }
    }

    /// Route raw documents by collection identifier
    ///
    /// Returns the collection that was replaced, or `None` when the
    /// identifier names a collection the engine does not read.
    pub fn route(
        &mut self,
        name: &str,
        records: Vec<Value>,
    ) -> Result<Option<Collection>, SnapshotError> {
        if Collection::is_ignored(name) {
            debug!(collection = name, "ignoring collection outside the engine");
            return Ok(None);
        }
        let collection: Collection = name.parse()?;
        let batch = CollectionBatch::decode(collection, records)?;
        self.apply(batch);
        Ok(Some(collection))
    }

    /// Parse a whole snapshot document
    ///
    /// Top-level keys are collection identifiers plus an optional `asOf`
    /// date (defaults to today). Unknown keys are skipped with a warning.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let root: Value = serde_json::from_str(json)?;
        let Value::Object(map) = root else {
            return Err(SnapshotError::NotAnObject);
        };

        let mut snapshot = Snapshot::default();

        for (key, value) in map {
            if key == "asOf" {
                let raw = value.as_str().unwrap_or_default();
                snapshot.as_of =
                    flexible_date::parse(raw).ok_or_else(|| SnapshotError::MalformedRecord {
                        collection: Collection::GeneralLedger,
                        record: "asOf".to_string(),
                        reason: format!("invalid date '{}'", raw),
                    })?;
                continue;
            }

            let Some(collection) = Collection::from_name(&key) else {
                if !Collection::is_ignored(&key) {
                    warn!(key = %key, "skipping unknown snapshot key");
                }
                continue;
            };

            let Value::Array(records) = value else {
                return Err(SnapshotError::NotAnArray(collection));
            };
            snapshot.apply(CollectionBatch::decode(collection, records)?);
        }

        Ok(snapshot)
    }

    /// Load a snapshot document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| SnapshotError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let snapshot = Snapshot::from_json_str(&content)?;
        info!(
            path = ?path.as_ref(),
            records = snapshot.record_count(),
            as_of = %snapshot.as_of,
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn record_count(&self) -> usize {
        self.products.len()
            + self.employees.len()
            + self.fixed_assets.len()
            + self.sales_log.len()
            + self.inventory_log.len()
            + self.payroll_log.len()
            + self.expenses_log.len()
            + self.leave_requests.len()
            + self.general_ledger.len()
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

// ============================================================================
// TESTS
// ============================================================================
