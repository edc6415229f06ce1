// ⚖️ General Ledger - Per-account balances and journal postings
//
// Each entry adds its amount to the debit account and subtracts it from the
// credit account. Debit-normal accounts (assets, expenses) trend positive and
// credit-normal accounts (liabilities, equity, revenue) trend negative;
// callers apply sign conventions when presenting.

use crate::accounts::{AccountCode, CASH, SALES_REVENUE};
use crate::error::PostingError;
use crate::models::{JournalEntry, Product, SaleRecord};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

// ============================================================================
// BALANCES
// ============================================================================

/// Signed balance per account code, ordered by code
pub fn calculate_gl_balances(entries: &[JournalEntry]) -> BTreeMap<AccountCode, f64> {
    let mut balances: BTreeMap<AccountCode, f64> = BTreeMap::new();

    for entry in entries {
        *balances.entry(entry.debit_account).or_insert(0.0) += entry.amount;
        *balances.entry(entry.credit_account).or_insert(0.0) -= entry.amount;
    }

    debug!(entries = entries.len(), accounts = balances.len(), "computed GL balances");
    balances
}

/// Signed sum of every balance; zero (up to float noise) for any ledger
pub fn ledger_net(balances: &BTreeMap<AccountCode, f64>) -> f64 {
    balances.values().fold(0.0, |acc, b| acc + b)
}

// ============================================================================
// POSTINGS
// ============================================================================

/// Build a journal entry moving `amount` from `credit` to `debit`
///
/// Rejects non-positive amounts and entries that debit and credit the same
/// account. The entry gets a fresh id and the current timestamp.
pub fn post_journal_entry(
    date: NaiveDate,
    description: impl Into<String>,
    debit: AccountCode,
    credit: AccountCode,
    amount: f64,
) -> Result<JournalEntry, PostingError> {
    if amount.is_nan() || amount <= 0.0 {
        return Err(PostingError::NonPositiveAmount(amount));
    }
    if debit == credit {
        return Err(PostingError::SameAccount(debit));
    }

    Ok(JournalEntry {
        id: uuid::Uuid::new_v4().to_string(),
        date,
        description: description.into(),
        amount,
        debit_account: debit,
        credit_account: credit,
        debit_account_name: Some(debit.name().to_string()),
        credit_account_name: Some(credit.name().to_string()),
        created_at: Utc::now(),
    })
}

/// Records produced by booking one sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleBooking {
    pub sale: SaleRecord,

    /// Cash / Sales Revenue posting; `None` when the sale has no revenue
    pub revenue_entry: Option<JournalEntry>,
}

/// Book a sale: the sale record plus its revenue posting
///
/// No outflow movement is emitted. Stock status already subtracts sales, so
/// an extra movement would count the same units twice.
pub fn record_sale(
    products: &[Product],
    product_id: &str,
    quantity: f64,
    date: NaiveDate,
) -> Result<SaleBooking, PostingError> {
    if quantity.is_nan() || quantity <= 0.0 {
        return Err(PostingError::NonPositiveQuantity(quantity));
    }

    let product = products
        .iter()
        .find(|p| p.id == product_id)
        .ok_or_else(|| PostingError::UnknownProduct(product_id.to_string()))?;

    let revenue = quantity * product.price;
    let revenue_entry = if revenue > 0.0 {
        Some(post_journal_entry(
            date,
            format!("Sale: {}", product.name),
            CASH,
            SALES_REVENUE,
            revenue,
        )?)
    } else {
        None
    };

    Ok(SaleBooking {
        sale: SaleRecord {
            product_id: product_id.to_string(),
            quantity,
            date,
        },
        revenue_entry,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{COST_OF_GOODS_SOLD, INVENTORY, OWNERS_EQUITY};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    fn entry(debit: u32, credit: u32, amount: f64) -> JournalEntry {
        post_journal_entry(date(), "test", AccountCode(debit), AccountCode(credit), amount).unwrap()
    }

    #[test]
    fn test_balances() {
        let entries = vec![
            entry(1000, 3000, 5000.0), // owner invests cash
            entry(1100, 1000, 800.0),  // buy inventory
            entry(1000, 4000, 300.0),  // sale
            entry(5000, 1100, 120.0),  // cost of the sale
        ];

        let balances = calculate_gl_balances(&entries);

        assert_eq!(balances[&CASH], 4500.0);
        assert_eq!(balances[&INVENTORY], 680.0);
        assert_eq!(balances[&OWNERS_EQUITY], -5000.0);
        assert_eq!(balances[&SALES_REVENUE], -300.0);
        assert_eq!(balances[&COST_OF_GOODS_SOLD], 120.0);
        assert!(ledger_net(&balances).abs() < 1e-9);

        println!("✅ GL balances across {} accounts", balances.len());
    }

    #[test]
    fn test_empty_ledger() {
        let balances = calculate_gl_balances(&[]);
        assert!(balances.is_empty());
        assert_eq!(ledger_net(&balances), 0.0);
    }

    #[test]
    fn test_posting_rejections() {
        assert_eq!(
            post_journal_entry(date(), "zero", CASH, SALES_REVENUE, 0.0),
            Err(PostingError::NonPositiveAmount(0.0))
        );
        assert_eq!(
            post_journal_entry(date(), "loop", CASH, CASH, 10.0),
            Err(PostingError::SameAccount(CASH))
        );
        assert!(post_journal_entry(date(), "nan", CASH, SALES_REVENUE, f64::NAN).is_err());
    }

    #[test]
    fn test_posting_carries_account_names() {
        let e = post_journal_entry(date(), "Rent", AccountCode(6200), CASH, 1200.0).unwrap();
        assert_eq!(e.debit_account_name.as_deref(), Some("Rent Expense"));
        assert_eq!(e.credit_account_name.as_deref(), Some("Cash"));
        assert!(!e.id.is_empty());
    }

    #[test]
    fn test_record_sale() {
        let products = vec![Product {
            id: "P1".to_string(),
            name: "Burger".to_string(),
            category: "Food".to_string(),
            price: 8.5,
            cost: 3.0,
            reorder: 10,
        }];

        let booking = record_sale(&products, "P1", 2.0, date()).unwrap();
        let revenue = booking.revenue_entry.unwrap();

        assert_eq!(booking.sale.quantity, 2.0);
        assert_eq!(revenue.amount, 17.0);
        assert_eq!(revenue.debit_account, CASH);
        assert_eq!(revenue.credit_account, SALES_REVENUE);
        assert_eq!(revenue.description, "Sale: Burger");

        assert_eq!(
            record_sale(&products, "P9", 1.0, date()),
            Err(PostingError::UnknownProduct("P9".to_string()))
        );
        assert_eq!(
            record_sale(&products, "P1", 0.0, date()),
            Err(PostingError::NonPositiveQuantity(0.0))
        );
    }

    #[test]
    fn test_free_item_sale_has_no_posting() {
        let products = vec![Product {
            id: "W".to_string(),
            name: "Water".to_string(),
            category: "Drinks".to_string(),
            price: 0.0,
            cost: 0.1,
            reorder: 9999,
        }];

        let booking = record_sale(&products, "W", 3.0, date()).unwrap();
        assert!(booking.revenue_entry.is_none());
    }
}
