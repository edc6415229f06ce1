// 📦 Inventory Valuation - Weighted average cost per product
//
//   WAC = Σ(qty × unit_cost) / Σ(qty)   over every costed inflow ever recorded
//
// The average spans the full history on every call. It is NOT frozen at sale
// time: a later restock changes the COGS of earlier sales too.

use crate::models::{InventoryMovement, Product};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// WAC for a single product
///
/// Falls back to the product's standalone cost when no costed inflow exists,
/// and to 0 when the product is unknown.
pub fn weighted_average_cost(
    product_id: &str,
    products: &[Product],
    movements: &[InventoryMovement],
) -> f64 {
    let mut total_value = 0.0;
    let mut total_quantity = 0.0;

    for mv in movements
        .iter()
        .filter(|mv| mv.product_id == product_id && mv.is_costed_inflow())
    {
        let unit_cost = mv.unit_cost.unwrap_or_default();
        total_value += mv.quantity * unit_cost;
        total_quantity += mv.quantity;
    }

    if total_quantity == 0.0 {
        return fallback_cost(product_id, products);
    }
    total_value / total_quantity
}

fn fallback_cost(product_id: &str, products: &[Product]) -> f64 {
    products
        .iter()
        .find(|p| p.id == product_id)
        .map(|p| p.cost)
        .unwrap_or(0.0)
}

// ============================================================================
// WAC TABLE
// ============================================================================

#[derive(Debug, Clone, Default)]
struct Accumulator {
    value: f64,
    quantity: f64,
}

/// WAC of every product, built in one pass over the movement log
///
/// Gives the same numbers as calling `weighted_average_cost` per product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WacTable {
    costs: HashMap<String, f64>,
}

impl WacTable {
    pub fn build(products: &[Product], movements: &[InventoryMovement]) -> Self {
        let mut sums: HashMap<&str, Accumulator> = HashMap::new();

        for mv in movements.iter().filter(|mv| mv.is_costed_inflow()) {
            let acc = sums.entry(mv.product_id.as_str()).or_default();
            acc.value += mv.quantity * mv.unit_cost.unwrap_or_default();
            acc.quantity += mv.quantity;
        }

        // First product with an id wins, as in `weighted_average_cost`
        let mut costs: HashMap<String, f64> = HashMap::new();
        for p in products {
            costs.entry(p.id.clone()).or_insert(p.cost);
        }

        for (id, acc) in sums {
            if acc.quantity != 0.0 {
                costs.insert(id.to_string(), acc.value / acc.quantity);
            }
        }

        WacTable { costs }
    }

    /// WAC of a product, 0 when neither inflows nor a product record exist
    pub fn cost_of(&self, product_id: &str) -> f64 {
        self.costs.get(product_id).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
