// Storebooks - Core Library
// Accounting and costing engine for a small-business operations dashboard.
// Exposes all modules for use in CLI, API server, and tests

pub mod accounts;
pub mod models;
pub mod error;
pub mod config;
pub mod snapshot;
pub mod valuation;
pub mod depreciation;
pub mod sales;
pub mod payroll;
pub mod expenses;
pub mod inventory;
pub mod ledger;
pub mod statements;
pub mod dashboard;
pub mod cache;
pub mod data_quality;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use accounts::{account_name, AccountClass, AccountCode, CHART_OF_ACCOUNTS};
pub use models::{
    Employee, ExpenseRecord, FixedAsset, InventoryMovement, JournalEntry, LeaveRequest,
    LeaveStatus, MovementKind, PayrollShift, Product, SaleRecord,
};
pub use error::{PostingError, SnapshotError};
pub use config::EngineConfig;
pub use snapshot::{load_csv_batch, Collection, CollectionBatch, Snapshot};
pub use valuation::{weighted_average_cost, WacTable};
pub use depreciation::monthly_depreciation;
pub use sales::{calculate_sales_metrics, CategoryProfit, SalesMetrics};
pub use payroll::{calculate_payroll_metrics, EmployeePayroll, PayrollMetrics};
pub use expenses::calculate_operating_expenses;
pub use inventory::{calculate_inventory_status, InventoryStatus, LowStockAlert};
pub use ledger::{calculate_gl_balances, ledger_net, post_journal_entry, record_sale, SaleBooking};
pub use statements::{
    generate_balance_sheet, generate_income_statement, net_profit_proxy, BalanceLine,
    BalanceSection, BalanceSheet, IncomeStatement,
};
pub use dashboard::DashboardMetrics;
pub use cache::{snapshot_fingerprint, MetricsCache};
pub use data_quality::{DataQualityEngine, QualityIssue, QualityReport, Severity};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
