use std::collections::VecDeque;

/// A single digit keydown seen on the barcode field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeystrokeEvent {
    pub key: char,
    /// Monotonic timestamp in milliseconds.
    pub timestamp_ms: f64,
}

/// Keystroke timing buffer owned by whoever handles input on the barcode field.
#[derive(Debug, Clone)]
pub struct ClassifierState {
    keystrokes: VecDeque<KeystrokeEvent>,
    capacity: usize,
    /// Field value at the last reset or input event; used to spot large deletions.
    last_value: String,
}

impl ClassifierState {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            keystrokes: VecDeque::with_capacity(capacity),
            capacity,
            last_value: String::new(),
        }
    }

    /// Append a digit keystroke, evicting the oldest once the ring is full.
    pub fn record_digit(&mut self, key: char, timestamp_ms: f64) {
        if self.keystrokes.len() == self.capacity {
            self.keystrokes.pop_front();
        }
        self.keystrokes.push_back(KeystrokeEvent { key, timestamp_ms });
    }

    /// Forget all timing and take `current_value` as the new baseline.
    pub fn reset(&mut self, current_value: &str) {
        self.keystrokes.clear();
        self.last_value = current_value.to_string();
    }

    pub fn len(&self) -> usize {
        self.keystrokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keystrokes.is_empty()
    }

    pub fn keystrokes(&self) -> impl Iterator<Item = &KeystrokeEvent> {
        self.keystrokes.iter()
    }

    /// Elapsed time between the first and last recorded keystroke.
    pub fn span_ms(&self) -> f64 {
        match (self.keystrokes.front(), self.keystrokes.back()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0.0,
        }
    }

    pub fn average_interval_ms(&self) -> f64 {
        let gaps = self.keystrokes.len().saturating_sub(1).max(1);
        self.span_ms() / gaps as f64
    }

    pub fn last_value(&self) -> &str {
        &self.last_value
    }

    pub fn set_last_value(&mut self, value: &str) {
        self.last_value = value.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_evicts_oldest_first() {
        let mut state = ClassifierState::new(32);
        for i in 0..40 {
            let key = char::from_digit(i % 10, 10).unwrap();
            state.record_digit(key, i as f64 * 10.0);
        }
        assert_eq!(state.len(), 32);
        let oldest = state.keystrokes().next().unwrap();
        assert_eq!((oldest.key, oldest.timestamp_ms), ('8', 80.0));
        assert_eq!(state.span_ms(), 310.0);
    }

    #[test]
    fn reset_clears_timing_and_sets_baseline() {
        let mut state = ClassifierState::new(4);
        state.record_digit('4', 1.0);
        state.record_digit('2', 2.0);
        state.reset("42");
        assert!(state.is_empty());
        assert_eq!(state.last_value(), "42");
        assert_eq!(state.average_interval_ms(), 0.0);
    }
}
