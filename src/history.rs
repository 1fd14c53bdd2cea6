use std::collections::VecDeque;

pub const HISTORY_SIZE: usize = 10;

/// Leading character of a history recall (`!3`).
pub const RECALL_SIGIL: char = '!';

/// Fixed-size buffer of past command lines, newest in slot 0.
#[derive(Debug)]
pub struct HistoryRing {
    slots: VecDeque<String>,
}

impl Default for HistoryRing {
    fn default() -> Self {
        HistoryRing {
            slots: std::iter::repeat_with(String::new)
                .take(HISTORY_SIZE)
                .collect(),
        }
    }
}

impl HistoryRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `line` in slot 0, dropping the oldest entry. Recall lines are
    /// ignored so that `!n` never ends up in the ring itself.
    pub fn record(&mut self, line: &str) {
        if line.starts_with(RECALL_SIGIL) {
            return;
        }
        self.slots.pop_back();
        self.slots.push_front(line.to_owned());
    }

    /// Text stored at `index`. Negative or out-of-range indices fall back to
    /// slot 0.
    pub fn recall(&self, index: i64) -> &str {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.slots.get(i))
            .unwrap_or(&self.slots[0])
    }

    pub fn list(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.slots.iter().map(String::as_str).enumerate()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}
