// 📊 Inventory Status - Stock levels and low-stock alerts
//
// stock = Σ movement qty − Σ sale qty
//
// Sales are a separate source from movements and both are applied. A product
// whose reorder threshold is the sentinel never alerts.

use crate::config::EngineConfig;
use crate::models::{InventoryMovement, Product, SaleRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub id: String,
    pub name: String,
    pub current: f64,
    pub reorder: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryStatus {
    /// Net level per product id; every known product is present
    pub stock_levels: BTreeMap<String, f64>,

    /// Alerts in product order
    pub low_stock_alerts: Vec<LowStockAlert>,
}

impl InventoryStatus {
    pub fn level(&self, product_id: &str) -> f64 {
        self.stock_levels.get(product_id).copied().unwrap_or(0.0)
    }

    pub fn has_alert(&self, product_id: &str) -> bool {
        self.low_stock_alerts.iter().any(|a| a.id == product_id)
    }
}

pub fn calculate_inventory_status(
    products: &[Product],
    movements: &[InventoryMovement],
    sales: &[SaleRecord],
    config: &EngineConfig,
) -> InventoryStatus {
    let mut stock_levels: BTreeMap<String, f64> = BTreeMap::new();

    for mv in movements {
        *stock_levels.entry(mv.product_id.clone()).or_insert(0.0) += mv.quantity;
    }

    for sale in sales {
        *stock_levels.entry(sale.product_id.clone()).or_insert(0.0) -= sale.quantity;
    }

    let mut low_stock_alerts = Vec::new();

    for product in products {
        let current = *stock_levels.entry(product.id.clone()).or_insert(0.0);

        if product.reorder != config.reorder_sentinel && current < product.reorder as f64 {
            low_stock_alerts.push(LowStockAlert {
                id: product.id.clone(),
                name: product.name.clone(),
                current,
                reorder: product.reorder,
            });
        }
    }

    debug!(
        products = products.len(),
        alerts = low_stock_alerts.len(),
        "computed inventory status"
    );

    InventoryStatus { stock_levels, low_stock_alerts }
}

// ============================================================================
// TESTS
// ============================================================================
