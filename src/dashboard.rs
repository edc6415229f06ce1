// 📈 Dashboard - Every operational metric from one snapshot
//
// Recomputes everything from scratch on each call. Net profit here is the
// operational figure (gross profit − aggregate expenses), the same one the
// balance sheet uses as its equity plug.

use crate::accounts::AccountCode;
use crate::config::EngineConfig;
use crate::depreciation::monthly_depreciation;
use crate::expenses::calculate_operating_expenses;
use crate::inventory::{calculate_inventory_status, InventoryStatus};
use crate::ledger::calculate_gl_balances;
use crate::payroll::{calculate_payroll_metrics, PayrollMetrics};
use crate::sales::{calculate_sales_metrics, SalesMetrics};
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub sales: SalesMetrics,
    pub payroll: PayrollMetrics,
    pub monthly_depreciation: f64,
    /// Expenses log + payroll cost + monthly depreciation
    pub operating_expenses: f64,
    pub net_profit: f64,
    pub inventory: InventoryStatus,
    pub gl_balances: BTreeMap<AccountCode, f64>,
}

impl DashboardMetrics {
    pub fn compute(snapshot: &Snapshot, config: &EngineConfig) -> Self {
        let sales = calculate_sales_metrics(
            &snapshot.products,
            &snapshot.inventory_log,
            &snapshot.sales_log,
        );
        let payroll = calculate_payroll_metrics(
            &snapshot.employees,
            &snapshot.payroll_log,
            &snapshot.leave_requests,
            config,
        );
        let monthly_depreciation = monthly_depreciation(&snapshot.fixed_assets, snapshot.as_of);
        let operating_expenses = calculate_operating_expenses(
            &snapshot.expenses_log,
            payroll.total_salary_cost,
            monthly_depreciation,
        );
        let inventory = calculate_inventory_status(
            &snapshot.products,
            &snapshot.inventory_log,
            &snapshot.sales_log,
            config,
        );
        let net_profit = sales.gross_profit - operating_expenses;

        DashboardMetrics {
            sales,
            payroll,
            monthly_depreciation,
            operating_expenses,
            net_profit,
            inventory,
            gl_balances: calculate_gl_balances(&snapshot.general_ledger),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Revenue ${:.2} | Gross ${:.2} | Overhead ${:.2} | Net ${:.2} | {} low-stock alerts",
            self.sales.total_revenue,
            self.sales.gross_profit,
            self.operating_expenses,
            self.net_profit,
            self.inventory.low_stock_alerts.len()
        )
    }
}
