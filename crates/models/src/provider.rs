use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Market keys treated as head-to-head (1X2) markets.
pub const HEAD_TO_HEAD_MARKETS: [&str; 2] = ["h2h", "1x2"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub sport_key: Option<String>,
    #[serde(default)]
    pub commence_time: Option<String>,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub bookmakers: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderBookmaker {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub markets: Vec<ProviderMarket>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderMarket {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<ProviderOutcome>,
}

impl ProviderMarket {
    pub fn is_head_to_head(&self) -> bool {
        self.key
            .as_deref()
            .is_some_and(|key| HEAD_TO_HEAD_MARKETS.contains(&key))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderOutcome {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl ProviderEvent {
    pub fn home_team(&self) -> &str {
        self.home_team.as_deref().unwrap_or_default()
    }

    pub fn away_team(&self) -> &str {
        self.away_team.as_deref().unwrap_or_default()
    }

    /// First listed bookmaker, still in raw form.
    pub fn first_bookmaker(&self) -> Option<&Value> {
        self.bookmakers.as_ref().and_then(|books| books.first())
    }
}

/// Upstream-shaped stand-ins served when no provider credential is configured.
pub fn demo_events() -> Vec<ProviderEvent> {
    vec![
        demo_event("m1", "Man City", "Arsenal", "1XBET", [2.1, 3.2, 3.8]),
        demo_event("m2", "Real", "Barca", "Betway", [1.9, 3.6, 4.2]),
    ]
}

fn demo_event(
    id: &str,
    home: &str,
    away: &str,
    bookmaker: &str,
    prices: [f64; 3],
) -> ProviderEvent {
    ProviderEvent {
        id: Some(id.to_string()),
        sport_key: Some("demo".to_string()),
        commence_time: None,
        home_team: Some(home.to_string()),
        away_team: Some(away.to_string()),
        bookmakers: Some(vec![json!({
            "title": bookmaker,
            "markets": [{
                "key": "h2h",
                "outcomes": [
                    { "name": home, "price": prices[0] },
                    { "name": "Draw", "price": prices[1] },
                    { "name": away, "price": prices[2] },
                ]
            }]
        })]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_event_tolerates_missing_fields() {
        let event: ProviderEvent = serde_json::from_value(json!({ "sport_key": "soccer_epl" })).unwrap();
        assert_eq!(event.id, None);
        assert_eq!(event.home_team(), "");
        assert!(event.first_bookmaker().is_none());
    }

    #[test]
    fn test_bookmaker_decodes_float_prices() {
        let bookmaker: ProviderBookmaker = serde_json::from_value(json!({
            "title": "Unibet",
            "markets": [{ "key": "h2h", "outcomes": [{ "name": "Arsenal", "price": 1.85 }] }]
        }))
        .unwrap();

        assert!(bookmaker.markets[0].is_head_to_head());
        assert_eq!(bookmaker.markets[0].outcomes[0].price, Some(dec!(1.85)));
    }

    #[test]
    fn test_market_key_classification() {
        let market = |key: &str| ProviderMarket { key: Some(key.to_string()), outcomes: vec![] };
        assert!(market("h2h").is_head_to_head());
        assert!(market("1x2").is_head_to_head());
        assert!(!market("spreads").is_head_to_head());
        assert!(!ProviderMarket::default().is_head_to_head());
    }

    #[test]
    fn test_demo_events() {
        let events = demo_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id.as_deref(), Some("m1"));
        assert_eq!(events[1].first_bookmaker().unwrap()["title"], "Betway");
    }
}
