// Raw provider record -> internal Odds schema

use oracle_models::{
    Odds, OddsLine, Outcome, ProviderBookmaker, ProviderEvent, UNKNOWN_BOOKMAKER,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Placeholder for a missing part of a synthesized match id.
const MISSING_ID_PART: &str = "unknown";

/// Normalize a batch of raw upstream records, skipping unreadable ones.
pub fn normalize_records(records: &[Value]) -> Vec<Odds> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            match serde_json::from_value::<ProviderEvent>(record.clone()) {
                Ok(event) => Some(normalize_event(&event)),
                Err(e) => {
                    warn!("⚠️  Skipping unreadable upstream record #{}: {}", index, e);
                    None
                }
            }
        })
        .collect()
}

/// Normalize one provider event into an [`Odds`] record.
pub fn normalize_event(event: &ProviderEvent) -> Odds {
    let match_id = match_id_for(event);
    let bookmaker = event
        .first_bookmaker()
        .and_then(|book| book.get("title"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_BOOKMAKER)
        .to_string();

    let mut odds = Odds::new(match_id, bookmaker, event.home_team(), event.away_team());

    if let Some(raw) = event.first_bookmaker() {
        match serde_json::from_value::<ProviderBookmaker>(raw.clone()) {
            Ok(book) => {
                odds.odds = extract_line(&book, event.home_team(), event.away_team());
            }
            Err(e) => {
                warn!("⚠️  Malformed bookmaker data for {}, storing without prices: {}", odds.match_id, e);
            }
        }
    }

    if odds.odds.is_empty() {
        debug!("No 1X2 prices found for {}", odds.match_id);
    }

    odds
}

fn match_id_for(event: &ProviderEvent) -> String {
    match event.id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!(
            "{}_{}",
            event.sport_key.as_deref().unwrap_or(MISSING_ID_PART),
            event.commence_time.as_deref().unwrap_or(MISSING_ID_PART),
        ),
    }
}

fn extract_line(book: &ProviderBookmaker, home_team: &str, away_team: &str) -> OddsLine {
    let mut line = OddsLine::default();

    for market in book.markets.iter().filter(|m| m.is_head_to_head()) {
        for outcome in &market.outcomes {
            let name = outcome.name.as_deref().unwrap_or_default();
            if let Some(side) = classify_outcome(name, home_team, away_team) {
                line.set(side, outcome.price);
            }
        }
    }

    line
}

/// Decide which 1X2 outcome a provider outcome name refers to.
pub fn classify_outcome(name: &str, home_team: &str, away_team: &str) -> Option<Outcome> {
    let name = name.to_lowercase();
    let is_team = |team: &str| !team.is_empty() && name == team.to_lowercase();

    if name.contains("home") || is_team(home_team) {
        Some(Outcome::Home)
    } else if name.contains("away") || is_team(away_team) {
        Some(Outcome::Away)
    } else if name.contains("draw") {
        Some(Outcome::Draw)
    } else {
        None
    }
}
