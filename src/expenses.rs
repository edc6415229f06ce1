// 🧮 Expense Aggregator - Operating expenses + payroll + depreciation

use crate::models::ExpenseRecord;

/// Σ expense amounts plus the payroll and depreciation charges passed in
pub fn calculate_operating_expenses(
    expenses: &[ExpenseRecord],
    payroll_cost: f64,
    depreciation_cost: f64,
) -> f64 {
    let mut total: f64 = expenses.iter().map(|e| e.amount).sum();
    total += payroll_cost;
    total += depreciation_cost;
    total
}
