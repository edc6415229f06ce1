// 🧾 Record Models - The nine operational collections
//
// Every record is an immutable value inside a snapshot. Field names on the
// wire follow the dashboard's collection documents (camelCase, `id` = the
// referenced product or employee, `qty` = quantity).

use crate::accounts::AccountCode;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// REFERENCE DATA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,

    /// Unit selling price
    pub price: f64,

    /// Standalone unit cost, used when no costed inflow exists
    #[serde(default)]
    pub cost: f64,

    /// Reorder threshold; 9999 means "never alert"
    pub reorder: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,

    /// Hourly rate (>= 0)
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedAsset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Acquisition cost
    pub cost: f64,

    #[serde(rename = "date", with = "flexible_date")]
    pub purchase_date: NaiveDate,

    /// Annual depreciation as a fraction of cost (0.2 = 20%/year)
    pub depreciation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "flexible_date::option")]
    pub date: Option<NaiveDate>,
}

// ============================================================================
// OPERATIONAL LOGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    Inflow,
    Outflow,
    Adjustment,
    Waste,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    #[serde(rename = "id")]
    pub product_id: String,

    /// Signed quantity: positive = inflow, negative = outflow
    #[serde(rename = "qty")]
    pub quantity: f64,

    #[serde(rename = "type")]
    pub kind: MovementKind,

    /// Present only on inflows that establish valuation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,

    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
}

impl InventoryMovement {
    /// Positive quantity with a unit cost attached
    pub fn is_costed_inflow(&self) -> bool {
        self.quantity > 0.0 && self.unit_cost.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    #[serde(rename = "id")]
    pub product_id: String,

    #[serde(rename = "qty")]
    pub quantity: f64,

    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollShift {
    #[serde(rename = "id")]
    pub employee_id: String,

    /// Start hour on a 0-24 clock
    pub start: f64,

    /// End hour; end <= start means the shift crossed midnight
    pub end: f64,
}

impl PayrollShift {
    /// Shift length in hours, wrapping past midnight
    pub fn duration_hours(&self) -> f64 {
        let end = if self.end > self.start {
            self.end
        } else {
            self.end + 24.0
        };
        end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[serde(rename = "id")]
    pub employee_id: String,

    pub days: f64,

    pub status: LeaveStatus,
}

// ============================================================================
// GENERAL LEDGER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Stable identity; generated when the source document has none
    #[serde(default = "default_uuid")]
    pub id: String,

    #[serde(with = "flexible_date")]
    pub date: NaiveDate,

    pub description: String,

    /// Posted amount (> 0)
    pub amount: f64,

    pub debit_account: AccountCode,

    pub credit_account: AccountCode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_account_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_account_name: Option<String>,

    /// When the entry was posted
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

fn default_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl JournalEntry {
    /// True when both sides reference the same account
    pub fn is_self_balancing(&self) -> bool {
        self.debit_account == self.credit_account
    }
}

// ============================================================================
// DATE FORMAT
// ============================================================================

/// Calendar dates arrive as `YYYY-MM-DD` (ledger) or `MM/DD/YYYY`
/// (sales and inventory logs). Always written back as `YYYY-MM-DD`.
pub mod flexible_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const ISO: &str = "%Y-%m-%d";
    const US: &str = "%m/%d/%Y";

    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        // Timestamps like 2025-01-05T10:30:00Z keep only their date part
        let day = s.split('T').next().unwrap_or(s);
        NaiveDate::parse_from_str(day, ISO)
            .or_else(|_| NaiveDate::parse_from_str(day, US))
            .ok()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(ISO).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid date '{}' (expected YYYY-MM-DD or MM/DD/YYYY)",
                raw
            ))
        })
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => super::serialize(d, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) => super::parse(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid date '{}'", raw))
                }),
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
