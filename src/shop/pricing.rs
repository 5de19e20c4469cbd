//! Trade-in pricing and affordability rules.
//!
//! The shop buys back the armor a character is wearing at a fixed percentage
//! of its list price and credits that amount toward the new piece.

use crate::shop::types::Armor;

/// Default share of the list price paid back on a trade-in.
pub const DEFAULT_TRADE_IN_PERCENT: u8 = 75;

/// Trade-in value of `armor` at `percent` of its cost, rounded half away from zero.
/// No armor is worth nothing.
pub fn trade_in_value(armor: Option<&Armor>, percent: u8) -> i64 {
    match armor {
        Some(a) => scale_rounded(a.cost, percent),
        None => 0,
    }
}

fn scale_rounded(cost: i64, percent: u8) -> i64 {
    let scaled = cost as i128 * percent as i128;
    let whole = (scaled.abs() + 50) / 100;
    let signed = if scaled < 0 { -whole } else { whole };
    signed as i64
}

/// The numbers behind a single purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeQuote {
    pub gold: i64,
    pub trade_in: i64,
    pub cost: i64,
}

impl TradeQuote {
    pub fn new(gold: i64, trade_in: i64, cost: i64) -> Self {
        Self {
            gold,
            trade_in,
            cost,
        }
    }

    /// What the character pays out of pocket, saturating at the `i64` bounds.
    pub fn net_price(&self) -> i64 {
        self.cost.saturating_sub(self.trade_in)
    }

    /// Listeners may push the trade-in anywhere in `i64`, so the sum is taken in `i128`.
    pub fn is_affordable(&self) -> bool {
        self.gold as i128 + self.trade_in as i128 >= self.cost as i128
    }

    /// Gold left after the trade, or `None` if the character can't afford it.
    /// Saturates at `i64::MAX` when the refund overflows the purse.
    pub fn gold_after(&self) -> Option<i64> {
        if !self.is_affordable() {
            return None;
        }
        let left = self.gold as i128 + self.trade_in as i128 - self.cost as i128;
        Some(i64::try_from(left).unwrap_or(i64::MAX))
    }
}

/// Whether `candidate` may be picked from the shop list.
pub fn is_selectable(candidate: &Armor, current: Option<&Armor>, trade_in: i64, gold: i64) -> bool {
    let owned = current.is_some_and(|c| c.id == candidate.id);
    let affordable = TradeQuote::new(gold, trade_in, candidate.cost).is_affordable();
    affordable && !owned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armor(id: u64, cost: i64) -> Armor {
        Armor::new(id, "Test Armor", cost, 1, 1)
    }

    #[test]
    fn test_trade_in_rounds_to_nearest() {
        assert_eq!(trade_in_value(Some(&armor(1, 48)), 75), 36);
        assert_eq!(trade_in_value(Some(&armor(1, 1)), 75), 1); // 0.75
        assert_eq!(trade_in_value(Some(&armor(1, 2)), 75), 2); // 1.5
        assert_eq!(trade_in_value(Some(&armor(1, 5)), 75), 4); // 3.75
        assert_eq!(trade_in_value(Some(&armor(1, 0)), 75), 0);
    }

    #[test]
    fn test_trade_in_without_armor_is_zero() {
        assert_eq!(trade_in_value(None, 75), 0);
        assert_eq!(trade_in_value(None, 100), 0);
    }

    #[test]
    fn test_trade_in_respects_percent() {
        assert_eq!(trade_in_value(Some(&armor(1, 200)), 50), 100);
        assert_eq!(trade_in_value(Some(&armor(1, 200)), 0), 0);
        assert_eq!(trade_in_value(Some(&armor(1, 200)), 100), 200);
        assert_eq!(trade_in_value(Some(&armor(1, i64::MIN)), 100), i64::MIN);
    }

    #[test]
    fn test_quote_rejects_short_purse() {
        let quote = TradeQuote::new(100, 0, 150);
        assert!(!quote.is_affordable());
        assert_eq!(quote.gold_after(), None);
    }

    #[test]
    fn test_quote_accepts_exact_purse() {
        let quote = TradeQuote::new(100, 50, 150);
        assert!(quote.is_affordable());
        assert_eq!(quote.net_price(), 100);
        assert_eq!(quote.gold_after(), Some(0));
    }

    #[test]
    fn test_trade_in_above_cost_refunds() {
        let quote = TradeQuote::new(10, 300, 48);
        assert_eq!(quote.gold_after(), Some(262));
    }

    #[test]
    fn test_huge_trade_in_does_not_overflow() {
        let quote = TradeQuote::new(100, i64::MAX, 150);
        assert!(quote.is_affordable());
        assert_eq!(quote.gold_after(), Some(i64::MAX - 50));
        assert_eq!(quote.net_price(), 150 - i64::MAX);

        let quote = TradeQuote::new(i64::MAX, i64::MAX, 0);
        assert_eq!(quote.gold_after(), Some(i64::MAX));

        let quote = TradeQuote::new(i64::MAX, i64::MIN, 0);
        assert!(!quote.is_affordable());
        assert_eq!(quote.gold_after(), None);
        assert_eq!(quote.net_price(), i64::MAX);
    }

    #[test]
    fn test_owned_armor_never_selectable() {
        let owned = armor(3, 10);
        assert!(!is_selectable(&owned, Some(&owned), 0, 1_000_000));
        assert!(is_selectable(&armor(4, 10), Some(&owned), 0, 10));
        assert!(!is_selectable(&armor(4, 11), Some(&owned), 0, 10));
        assert!(is_selectable(&armor(4, 11), None, 1, 10));
    }
}
