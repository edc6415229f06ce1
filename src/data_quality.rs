// ✅ Data Quality - Integrity checks over a snapshot
//
// The calculators degrade silently: unknown references are skipped and
// impossible values flow through the arithmetic. This engine makes those
// defects visible. It never corrects anything.
//
// Critical  - the record breaks an accounting invariant (self-balancing entry,
//             non-positive posting, negative rate)
// Warning   - the record is questionable and skews a metric
// Info      - the record is ignored by a calculator

use crate::accounts::is_known_account;
use crate::models::{Employee, JournalEntry, LeaveRequest, PayrollShift, Product, SaleRecord};
use crate::snapshot::{Collection, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub collection: Collection,
    /// Position plus id when the record has one, e.g. `#3 (id=P001)`
    pub record: String,
    pub field: String,
    pub issue: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub records_checked: usize,
    pub issues: Vec<QualityIssue>,
    pub overall_quality: f64,
}

impl QualityReport {
    pub fn summary(&self) -> String {
        format!(
            "Quality: {:.1}%, {} records, Issues: {} ({} critical, {} warnings)",
            self.overall_quality * 100.0,
            self.records_checked,
            self.issues.len(),
            self.count(Severity::Critical),
            self.count(Severity::Warning)
        )
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.count(Severity::Critical) > 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues_for(&self, collection: Collection) -> Vec<&QualityIssue> {
        self.issues
            .iter()
            .filter(|i| i.collection == collection)
            .collect()
    }
}

// ============================================================================
// DATA QUALITY ENGINE
// ============================================================================

pub struct DataQualityEngine {
    /// Clock range for shift hours
    max_clock_hour: f64,

    /// Flag ledger codes missing from the chart of accounts
    check_chart_of_accounts: bool,
}

struct Findings {
    issues: Vec<QualityIssue>,
}

impl Findings {
    fn push(
        &mut self,
        severity: Severity,
        collection: Collection,
        record: String,
        field: &str,
        issue: String,
        recommendation: &str,
    ) {
        self.issues.push(QualityIssue {
            severity,
            collection,
            record,
            field: field.to_string(),
            issue,
            recommendation: recommendation.to_string(),
        });
    }
}

fn label(index: usize, id: &str) -> String {
    format!("#{} (id={})", index, id)
}

impl DataQualityEngine {
    pub fn new() -> Self {
        DataQualityEngine {
            max_clock_hour: 24.0,
            check_chart_of_accounts: true,
        }
    }

    pub fn without_chart_check() -> Self {
        DataQualityEngine {
            check_chart_of_accounts: false,
            ..Self::new()
        }
    }

    /// Run every check over the snapshot
    pub fn validate(&self, snapshot: &Snapshot) -> QualityReport {
        let mut findings = Findings { issues: Vec::new() };

        self.check_products(&snapshot.products, &mut findings);
        self.check_employees(&snapshot.employees, &mut findings);
        self.check_sales(&snapshot.sales_log, &snapshot.products, &mut findings);
        self.check_shifts(&snapshot.payroll_log, &snapshot.employees, &mut findings);
        self.check_leave(&snapshot.leave_requests, &snapshot.employees, &mut findings);
        self.check_ledger(&snapshot.general_ledger, &mut findings);

        for (index, mv) in snapshot.inventory_log.iter().enumerate() {
            if let Some(cost) = mv.unit_cost {
                if cost < 0.0 {
                    findings.push(
                        Severity::Warning,
                        Collection::InventoryLog,
                        label(index, &mv.product_id),
                        "unitCost",
                        format!("Negative unit cost {}", cost),
                        "Unit costs feed the weighted average; correct the inflow",
                    );
                }
            }
        }

        for (index, asset) in snapshot.fixed_assets.iter().enumerate() {
            if asset.depreciation_rate < 0.0 || asset.depreciation_rate > 1.0 {
                findings.push(
                    Severity::Warning,
                    Collection::FixedAssets,
                    format!("#{}", index),
                    "depreciationRate",
                    format!("Rate {} is outside 0..1", asset.depreciation_rate),
                    "Express the annual rate as a fraction of cost",
                );
            }
        }

        let records_checked = snapshot.record_count();
        let flagged: HashSet<(Collection, &str)> = findings
            .issues
            .iter()
            .filter(|i| i.severity != Severity::Info)
            .map(|i| (i.collection, i.record.as_str()))
            .collect();

        let overall_quality = if records_checked == 0 {
            1.0
        } else {
            1.0 - flagged.len() as f64 / records_checked as f64
        };

        debug!(
            records_checked,
            issues = findings.issues.len(),
            "validated snapshot"
        );

        QualityReport {
            records_checked,
            overall_quality,
            issues: findings.issues,
        }
    }

    fn check_products(&self, products: &[Product], findings: &mut Findings) {
        let mut seen = HashSet::new();
        for (index, product) in products.iter().enumerate() {
            if !seen.insert(product.id.as_str()) {
                findings.push(
                    Severity::Warning,
                    Collection::Products,
                    label(index, &product.id),
                    "id",
                    "Duplicate product id".to_string(),
                    "Only the first product with this id is used for pricing",
                );
            }
            if product.price < 0.0 {
                findings.push(
                    Severity::Warning,
                    Collection::Products,
                    label(index, &product.id),
                    "price",
                    format!("Negative price {}", product.price),
                    "Verify the selling price",
                );
            }
        }
    }

    fn check_employees(&self, employees: &[Employee], findings: &mut Findings) {
        for (index, employee) in employees.iter().enumerate() {
            if employee.rate < 0.0 {
                findings.push(
                    Severity::Critical,
                    Collection::Employees,
                    label(index, &employee.id),
                    "rate",
                    format!("Negative hourly rate {}", employee.rate),
                    "Hourly rates must be zero or positive",
                );
            }
        }
    }

    fn check_sales(&self, sales: &[SaleRecord], products: &[Product], findings: &mut Findings) {
        let known: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();

        for (index, sale) in sales.iter().enumerate() {
            if sale.quantity <= 0.0 {
                findings.push(
                    Severity::Warning,
                    Collection::SalesLog,
                    label(index, &sale.product_id),
                    "qty",
                    format!("Sale quantity {} is not positive", sale.quantity),
                    "Record returns as inventory movements instead",
                );
            }
            if !known.contains(sale.product_id.as_str()) {
                findings.push(
                    Severity::Info,
                    Collection::SalesLog,
                    label(index, &sale.product_id),
                    "id",
                    format!("Unknown product '{}'", sale.product_id),
                    "This sale contributes nothing to revenue or COGS",
                );
            }
        }
    }

    fn check_shifts(
        &self,
        shifts: &[PayrollShift],
        employees: &[Employee],
        findings: &mut Findings,
    ) {
        let known: HashSet<&str> = employees.iter().map(|e| e.id.as_str()).collect();
        let clock = 0.0..=self.max_clock_hour;

        for (index, shift) in shifts.iter().enumerate() {
            if !clock.contains(&shift.start) || !clock.contains(&shift.end) {
                findings.push(
                    Severity::Warning,
                    Collection::PayrollLog,
                    label(index, &shift.employee_id),
                    "start/end",
                    format!("Shift {}→{} is outside the 0-24 clock", shift.start, shift.end),
                    "Record shift hours on a 24-hour clock",
                );
            }
            if !known.contains(shift.employee_id.as_str()) {
                findings.push(
                    Severity::Info,
                    Collection::PayrollLog,
                    label(index, &shift.employee_id),
                    "id",
                    format!("Unknown employee '{}'", shift.employee_id),
                    "These hours are excluded from payroll totals",
                );
            }
        }
    }

    fn check_leave(
        &self,
        requests: &[LeaveRequest],
        employees: &[Employee],
        findings: &mut Findings,
    ) {
        let known: HashSet<&str> = employees.iter().map(|e| e.id.as_str()).collect();

        for (index, request) in requests.iter().enumerate() {
            if request.days < 0.0 {
                findings.push(
                    Severity::Warning,
                    Collection::LeaveRequests,
                    label(index, &request.employee_id),
                    "days",
                    format!("Negative leave days {}", request.days),
                    "Leave days must be positive",
                );
            }
            if !known.contains(request.employee_id.as_str()) {
                findings.push(
                    Severity::Info,
                    Collection::LeaveRequests,
                    label(index, &request.employee_id),
                    "id",
                    format!("Unknown employee '{}'", request.employee_id),
                    "This request is ignored for leave cost",
                );
            }
        }
    }

    fn check_ledger(&self, entries: &[JournalEntry], findings: &mut Findings) {
        for (index, entry) in entries.iter().enumerate() {
            let record = label(index, &entry.id);

            if entry.is_self_balancing() {
                findings.push(
                    Severity::Critical,
                    Collection::GeneralLedger,
                    record.clone(),
                    "debitAccount/creditAccount",
                    format!("Entry debits and credits account {}", entry.debit_account),
                    "Repost against two different accounts",
                );
            }
            if entry.amount <= 0.0 {
                findings.push(
                    Severity::Critical,
                    Collection::GeneralLedger,
                    record.clone(),
                    "amount",
                    format!("Posting amount {} is not positive", entry.amount),
                    "Reverse the accounts instead of posting a negative amount",
                );
            }
            if self.check_chart_of_accounts {
                for code in [entry.debit_account, entry.credit_account] {
                    if !is_known_account(code) {
                        findings.push(
                            Severity::Info,
                            Collection::GeneralLedger,
                            record.clone(),
                            "account",
                            format!("Account {} is not in the chart of accounts", code),
                            "Statements still classify it by code range",
                        );
                    }
                }
            }
        }
    }
}

impl Default for DataQualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountCode;
    use crate::models::LeaveStatus;
    use chrono::{NaiveDate, Utc};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn clean_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new(date());
        snapshot.products = vec![Product {
            id: "P1".to_string(),
            name: "Burger".to_string(),
            category: "Food".to_string(),
            price: 8.0,
            cost: 3.0,
            reorder: 10,
        }];
        snapshot.employees = vec![Employee {
            id: "E1".to_string(),
            name: "Ana".to_string(),
            rate: 15.0,
        }];
        snapshot.sales_log = vec![SaleRecord {
            product_id: "P1".to_string(),
            quantity: 2.0,
            date: date(),
        }];
        snapshot.payroll_log = vec![PayrollShift {
            employee_id: "E1".to_string(),
            start: 22.0,
            end: 6.0,
        }];
        snapshot
    }

    fn journal(debit: u32, credit: u32, amount: f64) -> JournalEntry {
        JournalEntry {
            id: "J1".to_string(),
            date: date(),
            description: "test".to_string(),
            amount,
            debit_account: AccountCode(debit),
            credit_account: AccountCode(credit),
            debit_account_name: None,
            credit_account_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_clean_snapshot() {
        let report = DataQualityEngine::new().validate(&clean_snapshot());

        println!("Report: {}", report.summary());

        assert!(report.is_clean());
        assert!(!report.has_critical_issues());
        assert_eq!(report.overall_quality, 1.0);
        assert_eq!(report.records_checked, 4);
    }

    #[test]
    fn test_self_balancing_entry_is_critical() {
        let mut snapshot = clean_snapshot();
        snapshot.general_ledger = vec![journal(1000, 1000, 50.0)];

        let report = DataQualityEngine::new().validate(&snapshot);

        assert!(report.has_critical_issues());
        let issues = report.issues_for(Collection::GeneralLedger);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].record.contains("J1"));
    }

    #[test]
    fn test_non_positive_posting() {
        let mut snapshot = clean_snapshot();
        snapshot.general_ledger = vec![journal(6100, 1000, -20.0)];

        let report = DataQualityEngine::new().validate(&snapshot);
        assert!(report.issues.iter().any(|i| i.field == "amount"));
    }

    #[test]
    fn test_unknown_references_are_info() {
        let mut snapshot = clean_snapshot();
        snapshot.sales_log[0].product_id = "GHOST".to_string();
        snapshot.leave_requests = vec![LeaveRequest {
            employee_id: "NOBODY".to_string(),
            days: 1.0,
            status: LeaveStatus::Approved,
        }];

        let report = DataQualityEngine::new().validate(&snapshot);

        assert_eq!(report.count(Severity::Info), 2);
        assert!(!report.has_critical_issues());
        // Info findings do not lower quality
        assert_eq!(report.overall_quality, 1.0);
    }

    #[test]
    fn test_negative_rate_and_bad_clock() {
        let mut snapshot = clean_snapshot();
        snapshot.employees[0].rate = -1.0;
        snapshot.payroll_log[0].end = 26.0;

        let report = DataQualityEngine::new().validate(&snapshot);

        assert!(report.has_critical_issues());
        assert_eq!(report.count(Severity::Warning), 1);
        assert!(report.overall_quality < 1.0);
    }

    #[test]
    fn test_chart_check_can_be_disabled() {
        let mut snapshot = clean_snapshot();
        snapshot.general_ledger = vec![journal(1234, 1000, 10.0)];

        let strict = DataQualityEngine::new().validate(&snapshot);
        let relaxed = DataQualityEngine::without_chart_check().validate(&snapshot);

        assert_eq!(strict.count(Severity::Info), 1);
        assert!(relaxed.is_clean());
    }
}
