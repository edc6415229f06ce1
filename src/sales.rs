// 💰 Sales & Margin - Revenue, COGS and profit by category
//
// Revenue = qty × price, COGS = qty × WAC. Sales that reference an unknown
// product contribute nothing.

use crate::models::{InventoryMovement, Product, SaleRecord};
use crate::valuation::WacTable;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfit {
    pub category: String,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesMetrics {
    pub total_revenue: f64,
    pub total_cogs: f64,
    pub gross_profit: f64,

    /// Profit per category, in order of first appearance
    pub category_profits: Vec<CategoryProfit>,
}

impl SalesMetrics {
    pub fn category_profit(&self, category: &str) -> Option<f64> {
        self.category_profits
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.profit)
    }

    /// Gross margin as a fraction of revenue (0 when there is no revenue)
    pub fn gross_margin(&self) -> f64 {
        if self.total_revenue == 0.0 {
            0.0
        } else {
            self.gross_profit / self.total_revenue
        }
    }
}

pub fn calculate_sales_metrics(
    products: &[Product],
    movements: &[InventoryMovement],
    sales: &[SaleRecord],
) -> SalesMetrics {
    let wac = WacTable::build(products, movements);

    let mut total_revenue = 0.0;
    let mut total_cogs = 0.0;
    let mut category_profits: Vec<CategoryProfit> = Vec::new();
    let mut skipped = 0usize;

    for sale in sales {
        let Some(product) = products.iter().find(|p| p.id == sale.product_id) else {
            skipped += 1;
            continue;
        };

        let revenue = sale.quantity * product.price;
        let cogs = sale.quantity * wac.cost_of(&sale.product_id);

        total_revenue += revenue;
        total_cogs += cogs;

        let profit = revenue - cogs;
        match category_profits
            .iter_mut()
            .find(|c| c.category == product.category)
        {
            Some(bucket) => bucket.profit += profit,
            None => category_profits.push(CategoryProfit {
                category: product.category.clone(),
                profit,
            }),
        }
    }

    debug!(
        sales = sales.len(),
        skipped,
        total_revenue,
        total_cogs,
        "computed sales metrics"
    );

    SalesMetrics {
        total_revenue,
        total_cogs,
        gross_profit: total_revenue - total_cogs,
        category_profits,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovementKind;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn product(id: &str, category: &str, price: f64, cost: f64) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            category: category.to_string(),
            price,
            cost,
            reorder: 5,
        }
    }

    fn sale(id: &str, qty: f64) -> SaleRecord {
        SaleRecord { product_id: id.to_string(), quantity: qty, date: date() }
    }

    fn inflow(id: &str, qty: f64, unit_cost: f64) -> InventoryMovement {
        InventoryMovement {
            product_id: id.to_string(),
            quantity: qty,
            kind: MovementKind::Inflow,
            unit_cost: Some(unit_cost),
            date: date(),
        }
    }

    #[test]
    fn test_duplicate_product_id_uses_first_record() {
        let products = vec![
            product("P1", "Food", 4.0, 1.0),
            product("P1", "Drinks", 9.0, 5.0),
        ];
        let sales = vec![sale("P1", 2.0)];

        let metrics = calculate_sales_metrics(&products, &[], &sales);

        // Price and fallback cost both come from the first P1
        assert_eq!(metrics.total_revenue, 8.0);
        assert_eq!(metrics.total_cogs, 2.0);
        assert_eq!(metrics.category_profit("Food"), Some(6.0));
        assert_eq!(metrics.category_profit("Drinks"), None);
    }

    #[test]
    fn test_cogs_uses_wac() {
        let products = vec![product("P1", "Food", 5.0, 0.0)];
        let movements = vec![inflow("P1", 10.0, 2.0)];
        let sales = vec![sale("P1", 4.0)];

        let metrics = calculate_sales_metrics(&products, &movements, &sales);

        assert_eq!(metrics.total_revenue, 20.0);
        assert_eq!(metrics.total_cogs, 8.0);
        assert_eq!(metrics.gross_profit, 12.0);
        assert_eq!(metrics.category_profit("Food"), Some(12.0));

        println!("✅ Sales: revenue ${:.2}, COGS ${:.2}", metrics.total_revenue, metrics.total_cogs);
    }

    #[test]
    fn test_unknown_product_skipped() {
        let products = vec![product("P1", "Food", 5.0, 1.0)];
        let sales = vec![sale("P1", 1.0), sale("GHOST", 100.0)];

        let metrics = calculate_sales_metrics(&products, &[], &sales);

        assert_eq!(metrics.total_revenue, 5.0);
        assert_eq!(metrics.total_cogs, 1.0);
        assert_eq!(metrics.category_profits.len(), 1);
    }

    #[test]
    fn test_category_order_follows_first_sale() {
        let products = vec![
            product("A", "Drinks", 2.0, 1.0),
            product("B", "Food", 6.0, 2.0),
            product("C", "Drinks", 3.0, 1.0),
        ];
        let sales = vec![sale("B", 1.0), sale("A", 2.0), sale("C", 1.0)];

        let metrics = calculate_sales_metrics(&products, &[], &sales);

        let order: Vec<&str> = metrics
            .category_profits
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(order, vec!["Food", "Drinks"]);
        assert_eq!(metrics.category_profit("Food"), Some(4.0));
        assert_eq!(metrics.category_profit("Drinks"), Some(4.0));
    }

    #[test]
    fn test_later_restock_reprices_earlier_sales() {
        let products = vec![product("P1", "Food", 5.0, 0.0)];
        let sales = vec![sale("P1", 2.0)];

        let before = calculate_sales_metrics(&products, &[inflow("P1", 10.0, 2.0)], &sales);
        let after = calculate_sales_metrics(
            &products,
            &[inflow("P1", 10.0, 2.0), inflow("P1", 10.0, 4.0)],
            &sales,
        );

        assert_eq!(before.total_cogs, 4.0);
        assert_eq!(after.total_cogs, 6.0);
    }

    #[test]
    fn test_empty_sales() {
        let metrics = calculate_sales_metrics(&[], &[], &[]);
        assert_eq!(metrics, SalesMetrics::default());
        assert_eq!(metrics.gross_margin(), 0.0);
    }
}
