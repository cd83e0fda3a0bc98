use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// =============================================================================
// Dashboard statistics
// =============================================================================

/// A product that has dropped below its reorder threshold.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowStockItem {
    pub name: Option<String>,
    pub quantity: Option<u32>,
}

impl LowStockItem {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: Some(name.into()),
            quantity: Some(quantity),
        }
    }

    /// Item name, or the empty string when the provider left it out.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Read-only dashboard metrics supplied by the host's data provider.
///
/// Any field may be absent or `null` in the source data. The accessors
/// return the zero value for anything missing so callers never have to
/// care which fields the provider actually filled in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsSnapshot {
    pub total_revenue: Option<f64>,
    pub transaction_count: Option<u64>,
    pub average_order_value: Option<f64>,
    pub low_stock_count: Option<u64>,
    pub low_stock_items: Option<Vec<LowStockItem>>,
    pub total_customers: Option<u64>,
}

impl StatisticsSnapshot {
    /// Parse a snapshot from JSON. Unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Figures used when the host has no data provider wired up.
    pub fn sample() -> Self {
        Self {
            total_revenue: Some(12_450.75),
            transaction_count: Some(87),
            average_order_value: Some(143.11),
            low_stock_count: Some(3),
            low_stock_items: Some(vec![
                LowStockItem::new("Milo 400g", 4),
                LowStockItem::new("Peak Milk Tin", 6),
                LowStockItem::new("Frytol Oil 1L", 2),
            ]),
            total_customers: Some(1_204),
        }
    }

    pub fn revenue(&self) -> f64 {
        self.total_revenue.unwrap_or_default()
    }

    pub fn transactions(&self) -> u64 {
        self.transaction_count.unwrap_or_default()
    }

    pub fn average_order(&self) -> f64 {
        self.average_order_value.unwrap_or_default()
    }

    pub fn low_stock(&self) -> u64 {
        self.low_stock_count.unwrap_or_default()
    }

    pub fn low_stock_items(&self) -> &[LowStockItem] {
        self.low_stock_items.as_deref().unwrap_or_default()
    }

    pub fn customers(&self) -> u64 {
        self.total_customers.unwrap_or_default()
    }
}
