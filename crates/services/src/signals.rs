use oracle_models::{Odds, Outcome, Signal, SIGNAL_MARKET_1X2};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Home price below which a home-favourite signal is raised.
pub const HOME_FAVOURITE_THRESHOLD: Decimal = dec!(2.0);

/// Confidence attached to every home-favourite signal.
pub const HOME_FAVOURITE_CONFIDENCE: f64 = 0.6;

/// Raises a 1X2 home signal when the home price is strictly under a threshold.
///
/// An ineligible record produces nothing; it never retracts a signal that an
/// earlier tick raised for the same match.
#[derive(Debug, Clone)]
pub struct SignalEvaluator {
    threshold: Decimal,
    confidence: f64,
}

impl Default for SignalEvaluator {
    fn default() -> Self {
        Self {
            threshold: HOME_FAVOURITE_THRESHOLD,
            confidence: HOME_FAVOURITE_CONFIDENCE,
        }
    }
}

impl SignalEvaluator {
    pub fn new(threshold: Decimal, confidence: f64) -> Self {
        Self { threshold, confidence }
    }

    pub fn evaluate(&self, odds: &Odds) -> Option<Signal> {
        let home = odds.home_price()?;
        (home < self.threshold).then(|| {
            Signal::new(odds.match_id.clone(), SIGNAL_MARKET_1X2, Outcome::Home, self.confidence)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_models::OddsLine;

    fn odds_with_home(home: Option<Decimal>) -> Odds {
        let mut line = OddsLine::default();
        line.set(Outcome::Home, home);
        line.set(Outcome::Away, Some(dec!(1.5)));
        Odds::new("m".to_string(), "Book".to_string(), "A", "B").with_odds(line)
    }

    #[test]
    fn test_home_favourite_raises_signal() {
        let signal = SignalEvaluator::default()
            .evaluate(&odds_with_home(Some(dec!(1.9))))
            .unwrap();

        assert_eq!(signal.match_id, "m");
        assert_eq!(signal.market, "1X2");
        assert_eq!(signal.side, Outcome::Home);
        assert_eq!(signal.confidence, 0.6);
    }

    #[test]
    fn test_threshold_is_strict() {
        let evaluator = SignalEvaluator::default();
        assert!(evaluator.evaluate(&odds_with_home(Some(dec!(2.0)))).is_none());
        assert!(evaluator.evaluate(&odds_with_home(Some(dec!(2.1)))).is_none());
        assert!(evaluator.evaluate(&odds_with_home(Some(dec!(1.999)))).is_some());
    }

    #[test]
    fn test_missing_home_price_raises_nothing() {
        // A short away price alone is not a home signal.
        assert!(SignalEvaluator::default().evaluate(&odds_with_home(None)).is_none());
    }

    #[test]
    fn test_custom_rule() {
        let evaluator = SignalEvaluator::new(dec!(1.5), 0.8);
        assert!(evaluator.evaluate(&odds_with_home(Some(dec!(1.6)))).is_none());
        assert_eq!(evaluator.evaluate(&odds_with_home(Some(dec!(1.4)))).unwrap().confidence, 0.8);
    }
}
