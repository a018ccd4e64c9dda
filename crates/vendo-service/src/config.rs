//! Service configuration.

/// Configuration for the billing service.
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Loyalty points earned per currency unit of a bill's final amount,
    /// floored to whole points. `0.0` disables accrual.
    pub loyalty_earn_rate: f64,
    /// Emit a notification when a stock deduction crosses an item's
    /// low-stock threshold.
    pub low_stock_alerts: bool,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            loyalty_earn_rate: 0.0,
            low_stock_alerts: true,
        }
    }
}
