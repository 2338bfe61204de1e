// Next-value heuristic over a single numeric sequence

use oracle_models::SequencePrediction;
use std::collections::HashMap;

const WEIGHT_RECENT: f64 = 0.6;
const WEIGHT_TREND: f64 = 0.3;
const WEIGHT_MODE: f64 = 0.1;

/// Sequences shorter than this get the median-plus-one fallback.
const MIN_HEURISTIC_LEN: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct SequencePredictor;

impl SequencePredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(&self, sequence: &[f64]) -> SequencePrediction {
        let n = sequence.len();
        if n == 0 {
            return SequencePrediction::new(None, 0.0, "empty");
        }
        if n < MIN_HEURISTIC_LEN {
            return SequencePrediction::new(Some(median(sequence) + 1.0), 0.4, "short seq");
        }

        let first = sequence[0];
        let last = sequence[n - 1];
        let slope = (last - first) / (n - 1).max(1) as f64;
        let trend = last + slope;
        let mode = mode(sequence);

        let prediction = WEIGHT_RECENT * last + WEIGHT_TREND * trend + WEIGHT_MODE * mode;

        let variance = population_variance(sequence);
        let length_factor = 0.5 + (n as f64 / 20.0).min(0.5);
        let confidence = (1.0 / (1.0 + variance) * length_factor).clamp(0.05, 0.95);

        SequencePrediction::new(Some(prediction), round_to(confidence, 3), "heuristic")
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent value; the earliest one wins a tie.
fn mode(values: &[f64]) -> f64 {
    // count and first position, keyed by bit pattern (-0.0 folded into 0.0)
    let mut counts: HashMap<u64, (usize, usize)> = HashMap::with_capacity(values.len());
    for (index, &value) in values.iter().enumerate() {
        let key = if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() };
        counts.entry(key).or_insert((0, index)).0 += 1;
    }

    counts
        .values()
        .max_by(|(count_a, first_a), (count_b, first_b)| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map_or(values[0], |&(_, first)| values[first])
}

fn population_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
