//! Commission model trait.

/// Computes the commission charged for a fill.
///
/// Implementations must be deterministic so runs are reproducible.
pub trait CommissionModel {
    /// Commission for a fill of `quantity` shares at `price`.
    fn commission(&self, quantity: u64, price: f64) -> f64;

    /// Get the name of the schedule.
    fn name(&self) -> &str;
}

impl<C: CommissionModel + ?Sized> CommissionModel for Box<C> {
    fn commission(&self, quantity: u64, price: f64) -> f64 {
        (**self).commission(quantity, price)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
