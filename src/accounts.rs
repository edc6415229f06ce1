// 📒 Chart of Accounts - Account codes and statement placement
//
// Account codes are numeric. Their ranges decide where a posting lands:
//   1xxx assets, 2xxx liabilities, 3xxx equity,
//   4xxx revenue, 5xxx cost of goods sold, 6xxx operating expenses
//
// Names are for display only; classification never depends on them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ACCOUNT CODE
// ============================================================================

/// Numeric GL account code (e.g. 1000 = Cash, 4000 = Sales Revenue)
///
/// Accepts either a JSON number or a numeric string on input, since ledger
/// exports carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAccountCode", into = "u32")]
pub struct AccountCode(pub u32);

pub const CASH: AccountCode = AccountCode(1000);
pub const INVENTORY: AccountCode = AccountCode(1100);
pub const FIXED_ASSETS: AccountCode = AccountCode(1200);
pub const ACCOUNTS_PAYABLE: AccountCode = AccountCode(2000);
pub const OWNERS_EQUITY: AccountCode = AccountCode(3000);
pub const OWNERS_DRAWS: AccountCode = AccountCode(3100);
pub const NET_PROFIT_PLUG: AccountCode = AccountCode(3999);
pub const SALES_REVENUE: AccountCode = AccountCode(4000);
pub const COST_OF_GOODS_SOLD: AccountCode = AccountCode(5000);
pub const PAYROLL_EXPENSE: AccountCode = AccountCode(6000);
pub const DEPRECIATION_EXPENSE: AccountCode = AccountCode(6400);

impl AccountCode {
    pub fn value(self) -> u32 {
        self.0
    }

    /// Leading decimal digit of the code (1000 → 1, 2050 → 2)
    pub fn prefix(self) -> u32 {
        let mut n = self.0;
        while n >= 10 {
            n /= 10;
        }
        n
    }

    /// Display name from the chart of accounts
    pub fn name(self) -> &'static str {
        account_name(self)
    }
}

impl fmt::Display for AccountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AccountCode> for u32 {
    fn from(code: AccountCode) -> u32 {
        code.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAccountCode {
    Number(u32),
    Text(String),
}

impl TryFrom<RawAccountCode> for AccountCode {
    type Error = String;

    fn try_from(raw: RawAccountCode) -> Result<Self, Self::Error> {
        match raw {
            RawAccountCode::Number(n) => Ok(AccountCode(n)),
            RawAccountCode::Text(s) => s
                .trim()
                .parse::<u32>()
                .map(AccountCode)
                .map_err(|_| format!("invalid account code '{}'", s)),
        }
    }
}

// ============================================================================
// ACCOUNT CLASS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountClass {
    Asset,
    Liability,
    Equity,
    Revenue,
    CostOfGoodsSold,
    Expense,
    Other,
}

impl AccountClass {
    /// Classify a code by its range
    pub fn of(code: AccountCode) -> Self {
        match code.0 {
            1000..=1999 => AccountClass::Asset,
            2000..=2999 => AccountClass::Liability,
            3000..=3999 => AccountClass::Equity,
            4000..=4999 => AccountClass::Revenue,
            5000..=5999 => AccountClass::CostOfGoodsSold,
            6000..=6999 => AccountClass::Expense,
            _ => AccountClass::Other,
        }
    }
}

// ============================================================================
// CHART OF ACCOUNTS
// ============================================================================

pub const CHART_OF_ACCOUNTS: &[(u32, &str)] = &[
    (1000, "Cash"),
    (1100, "Inventory"),
    (1200, "Fixed Assets"),
    (2000, "Accounts Payable"),
    (3000, "Owner's Equity"),
    (3100, "Owner's Draws"),
    (4000, "Sales Revenue"),
    (5000, "Cost of Goods Sold (COGS)"),
    (6000, "Payroll Expense"),
    (6100, "Utilities Expense"),
    (6200, "Rent Expense"),
    (6300, "Maintenance Expense"),
    (6400, "Depreciation Expense"),
    (6500, "Franchise Fees Expense"),
    (9999, "Suspense/Other Expense"),
];

pub fn account_name(code: AccountCode) -> &'static str {
    if code == NET_PROFIT_PLUG {
        return "Net Profit (operational proxy)";
    }
    CHART_OF_ACCOUNTS
        .iter()
        .find(|(c, _)| *c == code.0)
        .map(|(_, name)| *name)
        .unwrap_or("Unknown Account")
}

pub fn is_known_account(code: AccountCode) -> bool {
    CHART_OF_ACCOUNTS.iter().any(|(c, _)| *c == code.0)
}

// ============================================================================
// TESTS
// ============================================================================
