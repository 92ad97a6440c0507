//! Trade journal with realized P&L on closing trades.

use std::collections::HashMap;

use eventbt_core::types::{FillEvent, OrderEvent, TradeRecord};

/// Running entry state for one instrument.
#[derive(Debug, Clone, Copy, Default)]
struct EntryAccumulator {
    /// Volume-weighted average entry price
    average_price: f64,
    quantity: u64,
}

impl EntryAccumulator {
    fn add(&mut self, quantity: u64, price: f64) {
        let held = self.quantity as f64;
        let added = quantity as f64;
        self.average_price = (self.average_price * held + price * added) / (held + added);
        self.quantity += quantity;
    }
}

/// Records every executed trade in order.
#[derive(Debug, Clone, Default)]
pub struct TradeJournal {
    records: Vec<TradeRecord>,
    open: HashMap<String, EntryAccumulator>,
}

impl TradeJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the trade for `fill`. Entries fold into the instrument's
    /// average entry price; an EXIT realizes `(exit - average entry) * quantity`
    /// against it and resets it. The sign does not depend on the entry side.
    pub fn record(&mut self, order: &OrderEvent, fill: &FillEvent) -> &TradeRecord {
        let mut realized_pnl = None;
        let mut realized_pnl_pct = None;

        if order.signal_kind.is_entry() {
            self.open
                .entry(fill.symbol.clone())
                .or_default()
                .add(fill.quantity, fill.fill_price);
        } else if let Some(entry) = self.open.remove(&fill.symbol) {
            if entry.quantity > 0 && entry.average_price > 0.0 {
                let diff = fill.fill_price - entry.average_price;
                realized_pnl = Some(diff * fill.quantity as f64);
                realized_pnl_pct = Some(diff / entry.average_price);
            }
        }

        self.records.push(TradeRecord {
            timestamp: fill.timestamp,
            symbol: fill.symbol.clone(),
            direction: order.signal_kind,
            side: fill.side,
            quantity: fill.quantity,
            price: fill.fill_price,
            commission: fill.commission,
            realized_pnl,
            realized_pnl_pct,
        });
        &self.records[self.records.len() - 1]
    }

    /// All trades, oldest first.
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    /// Average entry price of the open position in `symbol`, if any.
    pub fn average_entry(&self, symbol: &str) -> Option<f64> {
        self.open
            .get(symbol)
            .filter(|e| e.quantity > 0)
            .map(|e| e.average_price)
    }

    /// Sum of realized P&L over closing trades.
    pub fn realized_pnl(&self) -> f64 {
        self.records.iter().filter_map(|r| r.realized_pnl).sum()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
