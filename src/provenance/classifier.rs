use anyhow::{Context, Result};
use regex::Regex;

use super::{ClassifierState, ProvenanceTag, WedgeConfig};

/// Timing heuristic that decides whether a value arrived as a wedge burst.
///
/// Fast typists can trip it. That only mis-tags a correct value, it never
/// rejects one.
#[derive(Debug, Clone)]
pub struct WedgeClassifier {
    config: WedgeConfig,
    shape: Regex,
}

impl WedgeClassifier {
    pub fn new(config: WedgeConfig) -> Result<Self> {
        let lo = config.min_digits.min(config.max_digits);
        let hi = config.min_digits.max(config.max_digits);
        // ASCII only; `\d` would also accept other Unicode digits.
        let shape = Regex::new(&format!("^[0-9]{{{lo},{hi}}}$"))
            .with_context(|| format!("invalid barcode shape for {lo}..={hi} digits"))?;
        Ok(Self { config, shape })
    }

    pub fn config(&self) -> &WedgeConfig {
        &self.config
    }

    /// Whether `value` looks like a numeric barcode at all.
    pub fn is_barcode_shaped(&self, value: &str) -> bool {
        self.shape.is_match(value)
    }

    /// Returns `Wedge` or `Manual`; never `Camera`.
    pub fn classify(&self, value: &str, state: &ClassifierState) -> ProvenanceTag {
        if self.is_likely_wedge(value, state) {
            ProvenanceTag::Wedge
        } else {
            ProvenanceTag::Manual
        }
    }

    fn is_likely_wedge(&self, value: &str, state: &ClassifierState) -> bool {
        if !self.is_barcode_shaped(value) {
            return false;
        }

        // Shape check guarantees ASCII, so byte length is digit count.
        let digits = value.len();
        if state.len() < self.config.min_samples.min(digits) {
            return false;
        }

        if state.average_interval_ms() <= self.config.max_avg_interval_ms {
            return true;
        }

        digits >= self.config.long_value_digits && state.span_ms() <= self.config.max_burst_span_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> WedgeClassifier {
        WedgeClassifier::new(WedgeConfig::default()).unwrap()
    }

    fn typed(value: &str, gap_ms: f64) -> ClassifierState {
        let mut state = ClassifierState::new(32);
        for (i, ch) in value.chars().enumerate() {
            state.record_digit(ch, 1_000.0 + i as f64 * gap_ms);
        }
        state
    }

    #[test]
    fn wedge_burst_at_10ms_per_key() {
        let state = typed("012345678905", 10.0);
        assert_eq!(state.len(), 12);
        assert_eq!(state.span_ms(), 110.0);
        assert_eq!(classifier().classify("012345678905", &state), ProvenanceTag::Wedge);
    }

    #[test]
    fn fast_bursts_of_every_valid_length_are_wedge() {
        let classifier = classifier();
        let digits = "12345678901234";
        for len in 8..=14 {
            for gap in [1.0, 20.0, 35.0] {
                let value = &digits[..len];
                let state = typed(value, gap);
                assert_eq!(
                    classifier.classify(value, &state),
                    ProvenanceTag::Wedge,
                    "len {len} gap {gap}"
                );
            }
        }
    }

    #[test]
    fn slow_typing_is_manual_regardless_of_length() {
        let classifier = classifier();
        let digits = "12345678901234";
        for len in 8..=14 {
            let value = &digits[..len];
            let state = typed(value, 120.0);
            assert_eq!(classifier.classify(value, &state), ProvenanceTag::Manual);
        }
    }

    #[test]
    fn long_values_qualify_on_total_span() {
        // Uneven burst: average gap above 35ms, total span under 400ms.
        let mut state = ClassifierState::new(32);
        let times = [0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 390.0];
        for t in times {
            state.record_digit('1', t);
        }
        assert!(state.average_interval_ms() > 35.0);
        assert_eq!(classifier().classify("1234567890", &state), ProvenanceTag::Wedge);
        // Same timing on a 9 digit value only has the average rule.
        assert_eq!(classifier().classify("123456789", &state), ProvenanceTag::Manual);
    }

    #[test]
    fn rejects_values_that_are_not_barcode_shaped() {
        let classifier = classifier();
        let state = typed("12345678901234567", 5.0);
        assert_eq!(classifier.classify("1234567", &state), ProvenanceTag::Manual);
        assert_eq!(classifier.classify("123456789012345", &state), ProvenanceTag::Manual);
        assert_eq!(classifier.classify("12345678a", &state), ProvenanceTag::Manual);
        assert_eq!(classifier.classify("١٢٣٤٥٦٧٨", &state), ProvenanceTag::Manual);
        assert_eq!(classifier.classify("", &state), ProvenanceTag::Manual);
    }

    #[test]
    fn needs_enough_recorded_keystrokes() {
        let state = typed("1234567", 5.0);
        assert_eq!(classifier().classify("12345678", &state), ProvenanceTag::Manual);
    }

    #[test]
    fn thresholds_are_configurable() {
        let config = WedgeConfig {
            max_avg_interval_ms: 80.0,
            ..WedgeConfig::default()
        };
        let classifier = WedgeClassifier::new(config).unwrap();
        let state = typed("12345678", 60.0);
        assert_eq!(classifier.classify("12345678", &state), ProvenanceTag::Wedge);
    }
}
