use rand::Rng;

use super::models::{Forecast, ForecastEntry, SECONDS_PER_DAY};
use crate::lookup::Condition;

/// Widest allowed perturbation, in whole degrees either side of the base
pub const MAX_VARIATION: i32 = 4;

/// Conditions a synthesized day can take, drawn uniformly
const SYNTHETIC_CONDITIONS: [Condition; 4] = [
    Condition::Clear,
    Condition::Clouds,
    Condition::Rain,
    Condition::Thunderstorm,
];

/// Produces five-day forecasts from a single base temperature.
/// Never fails and performs no I/O; timestamps saturate at the i64 bounds.
#[derive(Debug, Clone)]
pub struct ForecastSynthesizer {
    variation_min: i32,
    variation_max: i32,
}

impl Default for ForecastSynthesizer {
    fn default() -> Self {
        Self {
            variation_min: -MAX_VARIATION,
            variation_max: MAX_VARIATION,
        }
    }
}

impl ForecastSynthesizer {
    /// Bounds are clamped into [-MAX_VARIATION, MAX_VARIATION]; reversed bounds are swapped.
    pub fn new(variation_min: i32, variation_max: i32) -> Self {
        let (low, high) = if variation_min <= variation_max {
            (variation_min, variation_max)
        } else {
            (variation_max, variation_min)
        };
        let low_clamped = low.clamp(-MAX_VARIATION, MAX_VARIATION);
        let high_clamped = high.clamp(-MAX_VARIATION, MAX_VARIATION);

        if (low_clamped, high_clamped) != (variation_min, variation_max) {
            tracing::warn!(
                requested_min = variation_min,
                requested_max = variation_max,
                min = low_clamped,
                max = high_clamped,
                "Forecast variation adjusted"
            );
        }

        Self {
            variation_min: low_clamped,
            variation_max: high_clamped,
        }
    }

    pub fn variation(&self) -> (i32, i32) {
        (self.variation_min, self.variation_max)
    }

    pub fn synthesize(&self, base_temp: f64, reference_time: i64) -> Forecast {
        self.synthesize_with(&mut rand::thread_rng(), base_temp, reference_time)
    }

    /// Same as `synthesize` with a caller-supplied RNG
    pub fn synthesize_with<R: Rng>(
        &self,
        rng: &mut R,
        base_temp: f64,
        reference_time: i64,
    ) -> Forecast {
        Forecast::new(std::array::from_fn(|index| {
            let day = index as i64 + 1;
            let condition = SYNTHETIC_CONDITIONS[rng.gen_range(0..SYNTHETIC_CONDITIONS.len())];
            let perturbation = rng.gen_range(self.variation_min..=self.variation_max);

            ForecastEntry {
                timestamp: reference_time.saturating_add(day * SECONDS_PER_DAY),
                temperature: base_temp + f64::from(perturbation),
                condition,
                description: condition.default_description().to_string(),
            }
        }))
    }
}
