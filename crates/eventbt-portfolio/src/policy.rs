//! Order generation policies.

use serde::{Deserialize, Serialize};

use eventbt_core::types::{OrderEvent, Side, SignalEvent, SignalKind};

/// Turns a signal into an order given the current position and cash.
///
/// Implementations are pure functions of their inputs. Returning `None`
/// declines the signal.
pub trait OrderPolicy {
    fn generate_order(&self, signal: &SignalEvent, position: i64, cash: f64) -> Option<OrderEvent>;

    fn name(&self) -> &str;
}

/// What a signal asks for, after state gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    /// Open a new position from flat
    Open(Side),
    /// Flatten an existing position of the given size
    Close(Side, u64),
}

/// Entries only open from flat; EXIT only closes a non-zero position and
/// always closes all of it.
fn gate(kind: SignalKind, position: i64) -> Option<Intent> {
    match (kind, position) {
        (SignalKind::Long, 0) => Some(Intent::Open(Side::Buy)),
        (SignalKind::Short, 0) => Some(Intent::Open(Side::Sell)),
        (SignalKind::Exit, p) if p > 0 => Some(Intent::Close(Side::Sell, p.unsigned_abs())),
        (SignalKind::Exit, p) if p < 0 => Some(Intent::Close(Side::Buy, p.unsigned_abs())),
        _ => None,
    }
}

fn build(signal: &SignalEvent, side: Side, quantity: u64) -> Option<OrderEvent> {
    if quantity == 0 {
        return None;
    }
    Some(OrderEvent::market(
        signal.timestamp,
        signal.symbol.clone(),
        quantity,
        side,
        signal.reference_price,
        signal.kind,
    ))
}

/// Commits all available cash to a new position:
/// `quantity = floor(cash / reference_price)`.
///
/// Commission is not reserved, so cash can end slightly negative after an
/// all-in fill.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AllInPolicy;

impl OrderPolicy for AllInPolicy {
    fn generate_order(&self, signal: &SignalEvent, position: i64, cash: f64) -> Option<OrderEvent> {
        match gate(signal.kind, position)? {
            Intent::Open(side) => {
                if signal.reference_price <= 0.0 || cash <= 0.0 {
                    return None;
                }
                let quantity = (cash / signal.reference_price).floor() as u64;
                build(signal, side, quantity)
            }
            Intent::Close(side, quantity) => build(signal, side, quantity),
        }
    }

    fn name(&self) -> &str {
        "all_in"
    }
}

/// Opens every position with the same share count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedQuantityPolicy {
    pub quantity: u64,
}

impl FixedQuantityPolicy {
    pub fn new(quantity: u64) -> Self {
        Self { quantity }
    }
}

impl Default for FixedQuantityPolicy {
    fn default() -> Self {
        Self { quantity: 100 }
    }
}

impl OrderPolicy for FixedQuantityPolicy {
    fn generate_order(&self, signal: &SignalEvent, position: i64, _cash: f64) -> Option<OrderEvent> {
        match gate(signal.kind, position)? {
            Intent::Open(side) => build(signal, side, self.quantity),
            Intent::Close(side, quantity) => build(signal, side, quantity),
        }
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Configurable choice of built-in policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderPolicyKind {
    #[default]
    AllIn,
    Fixed { quantity: u64 },
}

impl OrderPolicy for OrderPolicyKind {
    fn generate_order(&self, signal: &SignalEvent, position: i64, cash: f64) -> Option<OrderEvent> {
        match self {
            OrderPolicyKind::AllIn => AllInPolicy.generate_order(signal, position, cash),
            OrderPolicyKind::Fixed { quantity } => {
                FixedQuantityPolicy::new(*quantity).generate_order(signal, position, cash)
            }
        }
    }

    fn name(&self) -> &str {
        match self {
            OrderPolicyKind::AllIn => AllInPolicy.name(),
            OrderPolicyKind::Fixed { .. } => "fixed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn signal(kind: SignalKind, price: f64) -> SignalEvent {
        SignalEvent::new(1, Utc::now(), "AAPL", kind, price)
    }

    #[test]
    fn test_all_in_sizing() {
        let order = AllInPolicy
            .generate_order(&signal(SignalKind::Long, 100.0), 0, 100_000.0)
            .unwrap();
        assert_eq!(order.quantity, 1000);
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.signal_kind, SignalKind::Long);

        let order = AllInPolicy
            .generate_order(&signal(SignalKind::Short, 33.0), 0, 1000.0)
            .unwrap();
        assert_eq!(order.quantity, 30);
        assert_eq!(order.side, Side::Sell);
    }

    #[test]
    fn test_entry_requires_flat() {
        assert!(AllInPolicy
            .generate_order(&signal(SignalKind::Long, 100.0), 10, 100_000.0)
            .is_none());
        assert!(AllInPolicy
            .generate_order(&signal(SignalKind::Short, 100.0), -10, 100_000.0)
            .is_none());
    }

    #[test]
    fn test_exit_flattens() {
        let order = AllInPolicy
            .generate_order(&signal(SignalKind::Exit, 110.0), 1000, -8.0)
            .unwrap();
        assert_eq!((order.side, order.quantity), (Side::Sell, 1000));

        let order = FixedQuantityPolicy::default()
            .generate_order(&signal(SignalKind::Exit, 110.0), -250, 0.0)
            .unwrap();
        assert_eq!((order.side, order.quantity), (Side::Buy, 250));

        assert!(AllInPolicy
            .generate_order(&signal(SignalKind::Exit, 110.0), 0, 100_000.0)
            .is_none());
    }

    #[test]
    fn test_all_in_declines_unaffordable() {
        assert!(AllInPolicy
            .generate_order(&signal(SignalKind::Long, 500.0), 0, 499.0)
            .is_none());
        assert!(AllInPolicy
            .generate_order(&signal(SignalKind::Long, 0.0), 0, 1000.0)
            .is_none());
        assert!(AllInPolicy
            .generate_order(&signal(SignalKind::Long, 10.0), 0, -8.0)
            .is_none());
    }

    #[test]
    fn test_policy_kind_deserialize() {
        let kind: OrderPolicyKind = serde_json::from_str(r#"{"type":"fixed","quantity":100}"#).unwrap();
        assert_eq!(kind, OrderPolicyKind::Fixed { quantity: 100 });
        let order = kind
            .generate_order(&signal(SignalKind::Long, 100.0), 0, 1.0)
            .unwrap();
        assert_eq!(order.quantity, 100);
    }
}
