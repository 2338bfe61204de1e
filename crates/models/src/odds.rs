use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market tag carried by every signal produced by the home-favourite rule.
pub const SIGNAL_MARKET_1X2: &str = "1X2";

/// Bookmaker name used when the provider record lists none.
pub const UNKNOWN_BOOKMAKER: &str = "unknown";

/// Current wall-clock time as fractional seconds since the Unix epoch.
pub fn epoch_seconds() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

/// Outcome of a 1X2 market.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

/// Decimal prices keyed by outcome. Any subset may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OddsLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away: Option<Decimal>,
}

impl OddsLine {
    pub fn new(home: Decimal, draw: Decimal, away: Decimal) -> Self {
        Self {
            home: Some(home),
            draw: Some(draw),
            away: Some(away),
        }
    }

    pub fn get(&self, outcome: Outcome) -> Option<Decimal> {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    pub fn set(&mut self, outcome: Outcome, price: Option<Decimal>) {
        let slot = match outcome {
            Outcome::Home => &mut self.home,
            Outcome::Draw => &mut self.draw,
            Outcome::Away => &mut self.away,
        };
        *slot = price;
    }

    pub fn is_empty(&self) -> bool {
        self.home.is_none() && self.draw.is_none() && self.away.is_none()
    }
}

/// One bookmaker's current line for one match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Odds {
    pub match_id: String,
    pub bookmaker: String,
    #[serde(rename = "match")]
    pub match_name: String,
    pub odds: OddsLine,
    pub ts: f64,
}

impl Odds {
    pub fn new(match_id: String, bookmaker: String, home_team: &str, away_team: &str) -> Self {
        Self {
            match_id,
            bookmaker,
            match_name: format!("{} vs {}", home_team, away_team),
            odds: OddsLine::default(),
            ts: epoch_seconds(),
        }
    }

    pub fn with_odds(mut self, odds: OddsLine) -> Self {
        self.odds = odds;
        self
    }

    pub fn home_price(&self) -> Option<Decimal> {
        self.odds.home
    }
}

/// Betting hint derived from one match's odds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    pub match_id: String,
    pub market: String,
    pub side: Outcome,
    pub confidence: f64,
    pub ts: f64,
}

impl Signal {
    pub fn new(match_id: String, market: &str, side: Outcome, confidence: f64) -> Self {
        Self {
            match_id,
            market: market.to_string(),
            side,
            confidence,
            ts: epoch_seconds(),
        }
    }
}

/// Messages pushed to live subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveMessage {
    OddsUpdate { odds: Vec<Odds>, signals: Vec<Signal> },
}

impl LiveMessage {
    pub fn odds_update(odds: Vec<Odds>, signals: Vec<Signal>) -> Self {
        LiveMessage::OddsUpdate { odds, signals }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_odds_serialization_shape() {
        let odds = Odds::new("m1".to_string(), "1XBET".to_string(), "Man City", "Arsenal")
            .with_odds(OddsLine::new(dec!(2.1), dec!(3.2), dec!(3.8)));

        let value = serde_json::to_value(&odds).unwrap();
        assert_eq!(value["match_id"], "m1");
        assert_eq!(value["bookmaker"], "1XBET");
        assert_eq!(value["match"], "Man City vs Arsenal");
        assert_eq!(value["odds"]["home"], 2.1);
        assert_eq!(value["odds"]["draw"], 3.2);
        assert_eq!(value["odds"]["away"], 3.8);
        assert!(value["ts"].is_f64());
    }

    #[test]
    fn test_partial_odds_line_omits_missing_outcomes() {
        let mut line = OddsLine::default();
        assert!(line.is_empty());

        line.set(Outcome::Away, Some(dec!(4.5)));
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value, serde_json::json!({ "away": 4.5 }));
        assert_eq!(line.get(Outcome::Away), Some(dec!(4.5)));
        assert_eq!(line.get(Outcome::Home), None);
    }

    #[test]
    fn test_live_message_is_tagged() {
        let signal = Signal::new("m2".to_string(), SIGNAL_MARKET_1X2, Outcome::Home, 0.6);
        let message = LiveMessage::odds_update(vec![], vec![signal]);

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "odds_update");
        assert!(value["odds"].as_array().unwrap().is_empty());
        assert_eq!(value["signals"][0]["side"], "home");
        assert_eq!(value["signals"][0]["market"], "1X2");
        assert_eq!(value["signals"][0]["confidence"], 0.6);
    }
}
