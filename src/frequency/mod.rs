use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Occurrence {
    pub is_new: bool,
    pub frequency: u32,
    pub insertion_index: usize,
}

/// Word → submission count, remembering first-appearance order.
#[derive(Debug, Default)]
pub struct FrequencyStore {
    counts: HashMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    frequency: u32,
    insertion_index: usize,
}

impl FrequencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` for empty or whitespace-only input, leaving the store untouched.
    pub fn record_occurrence(&mut self, word: &str) -> Option<Occurrence> {
        let word = word.trim();
        if word.is_empty() {
            return None;
        }
        if let Some(entry) = self.counts.get_mut(word) {
            entry.frequency = entry.frequency.saturating_add(1);
            return Some(Occurrence {
                is_new: false,
                frequency: entry.frequency,
                insertion_index: entry.insertion_index,
            });
        }
        let insertion_index = self.counts.len();
        self.counts.insert(
            word.to_string(),
            Entry {
                frequency: 1,
                insertion_index,
            },
        );
        Some(Occurrence {
            is_new: true,
            frequency: 1,
            insertion_index,
        })
    }

    /// Raises a known word's count to at least `frequency`. Unknown words are ignored.
    pub fn raise_to(&mut self, word: &str, frequency: u32) -> Option<u32> {
        let entry = self.counts.get_mut(word)?;
        entry.frequency = entry.frequency.max(frequency);
        Some(entry.frequency)
    }

    pub fn frequency(&self, word: &str) -> Option<u32> {
        self.counts.get(word).map(|e| e.frequency)
    }

    pub fn total_distinct_count(&self) -> usize {
        self.counts.len()
    }
}
