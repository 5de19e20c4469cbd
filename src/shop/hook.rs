//! Trade-in valuation extension point.
//!
//! Other modules register listeners that may adjust what the shop pays for a
//! character's current armor. Listeners run in registration order, each seeing
//! the value left by the previous one.

use log::debug;

use crate::shop::types::Armor;

/// Event name the valuation is published under.
pub const TRADE_IN_HOOK: &str = "h/lotgd/module-armor-shop/trade-in";

/// The record passed to every listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeInValuation {
    pub value: i64,
    pub armor: Armor,
}

pub trait TradeInListener: Send + Sync {
    fn adjust(&self, valuation: &mut TradeInValuation);
}

impl<F> TradeInListener for F
where
    F: Fn(&mut TradeInValuation) + Send + Sync,
{
    fn adjust(&self, valuation: &mut TradeInValuation) {
        self(valuation)
    }
}

#[derive(Default)]
pub struct TradeInHook {
    listeners: Vec<Box<dyn TradeInListener>>,
}

impl TradeInHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: impl TradeInListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Run `value` for `armor` through every listener and return the result.
    pub fn publish(&self, value: i64, armor: &Armor) -> i64 {
        let mut valuation = TradeInValuation {
            value,
            armor: armor.clone(),
        };
        for listener in &self.listeners {
            listener.adjust(&mut valuation);
        }
        if valuation.value != value {
            debug!(
                "{}: trade-in for armor id={} adjusted {} -> {}",
                TRADE_IN_HOOK, armor.id, value, valuation.value
            );
        }
        valuation.value
    }
}

impl std::fmt::Debug for TradeInHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeInHook")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
