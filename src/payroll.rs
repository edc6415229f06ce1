// 👥 Payroll - Logged hours, cost and approved leave per employee
//
// Shift hours wrap past midnight (22 → 6 is 8 hours). Approved leave is paid
// at leave_hours_per_day × rate and reported separately from actual cost.

use crate::config::EngineConfig;
use crate::models::{Employee, LeaveRequest, LeaveStatus, PayrollShift};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeePayroll {
    pub id: String,
    pub name: String,
    pub rate: f64,
    pub logged_hours: f64,
    pub actual_cost: f64,
    pub estimated_monthly_cost: f64,
    pub leave_days: f64,
    pub leave_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayrollMetrics {
    /// Σ actual cost over known employees (leave excluded)
    pub total_salary_cost: f64,

    /// Hours logged by known employees
    pub total_hours_logged: f64,

    /// total_salary_cost / total_hours_logged, 0 with no hours
    pub average_rate: f64,

    pub total_estimated_monthly_cost: f64,

    /// Raw hours per employee id, including ids with no employee record
    pub hours_by_employee: BTreeMap<String, f64>,

    /// One entry per employee, in roster order
    pub employees: Vec<EmployeePayroll>,
}

impl PayrollMetrics {
    pub fn employee(&self, id: &str) -> Option<&EmployeePayroll> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn total_leave_cost(&self) -> f64 {
        self.employees.iter().fold(0.0, |acc, e| acc + e.leave_cost)
    }
}

pub fn calculate_payroll_metrics(
    employees: &[Employee],
    shifts: &[PayrollShift],
    leave_requests: &[LeaveRequest],
    config: &EngineConfig,
) -> PayrollMetrics {
    let mut hours_by_employee: BTreeMap<String, f64> = BTreeMap::new();
    for shift in shifts {
        *hours_by_employee
            .entry(shift.employee_id.clone())
            .or_insert(0.0) += shift.duration_hours();
    }

    let mut total_salary_cost = 0.0;
    let mut total_hours_logged = 0.0;
    let mut total_estimated_monthly_cost = 0.0;

    let mut details: Vec<EmployeePayroll> = employees
        .iter()
        .map(|employee| {
            let logged_hours = hours_by_employee.get(&employee.id).copied().unwrap_or(0.0);
            let actual_cost = logged_hours * employee.rate;
            let estimated_monthly_cost = employee.rate * config.standard_monthly_hours;

            total_salary_cost += actual_cost;
            total_hours_logged += logged_hours;
            total_estimated_monthly_cost += estimated_monthly_cost;

            EmployeePayroll {
                id: employee.id.clone(),
                name: employee.name.clone(),
                rate: employee.rate,
                logged_hours,
                actual_cost,
                estimated_monthly_cost,
                leave_days: 0.0,
                leave_cost: 0.0,
            }
        })
        .collect();

    for request in leave_requests
        .iter()
        .filter(|r| r.status == LeaveStatus::Approved)
    {
        if let Some(detail) = details.iter_mut().find(|d| d.id == request.employee_id) {
            let hours = request.days * config.leave_hours_per_day;
            detail.leave_days += request.days;
            detail.leave_cost += hours * detail.rate;
        }
    }

    let average_rate = if total_hours_logged > 0.0 {
        total_salary_cost / total_hours_logged
    } else {
        0.0
    };

    debug!(
        employees = employees.len(),
        shifts = shifts.len(),
        total_salary_cost,
        total_hours_logged,
        "computed payroll metrics"
    );

    PayrollMetrics {
        total_salary_cost,
        total_hours_logged,
        average_rate,
        total_estimated_monthly_cost,
        hours_by_employee,
        employees: details,
    }
}

// ============================================================================
// TESTS
// ============================================================================
