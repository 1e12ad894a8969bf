use std::collections::VecDeque;

/// Sliding window of the most recently shown values.
///
/// Holds at most `window_size + 1` entries: the current value plus the `n`
/// values before it. Pushing past capacity evicts the oldest entry, so once
/// the window is full `oldest()` is exactly the n-back value for `newest()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    values: VecDeque<u8>,
    window_size: usize,
}

impl History {
    pub fn new(window_size: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(window_size + 1),
            window_size,
        }
    }

    fn capacity(&self) -> usize {
        self.window_size + 1
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn push(&mut self, value: u8) {
        self.values.push_back(value);
        while self.values.len() > self.capacity() {
            self.values.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn oldest(&self) -> Option<u8> {
        self.values.front().copied()
    }

    pub fn newest(&self) -> Option<u8> {
        self.values.back().copied()
    }

    /// The value the next trial has to repeat to count as a match.
    ///
    /// `None` during warm-up, while fewer than `window_size` values exist.
    pub fn n_back_target(&self) -> Option<u8> {
        let len = self.values.len();
        if len >= self.window_size {
            self.values.get(len - self.window_size).copied()
        } else {
            None
        }
    }

    /// A trial can only be judged once the window holds the current value and
    /// the one `n` steps before it.
    pub fn is_judgeable(&self) -> bool {
        self.values.len() > self.window_size
    }

    /// Whether the newest value repeats the oldest one in the window.
    pub fn is_match(&self) -> Option<bool> {
        if !self.is_judgeable() {
            return None;
        }
        match (self.oldest(), self.newest()) {
            (Some(oldest), Some(newest)) => Some(oldest == newest),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &u8> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(window_size: usize, values: &[u8]) -> History {
        let mut history = History::new(window_size);
        for &v in values {
            history.push(v);
        }
        history
    }

    #[test]
    fn test_push_evicts_oldest_past_capacity() {
        let history = history_of(2, &[1, 2, 3, 4, 5]);

        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(history.oldest(), Some(3));
        assert_eq!(history.newest(), Some(5));
    }

    #[test]
    fn test_length_never_exceeds_window_plus_one() {
        for window_size in 1..=4 {
            let mut history = History::new(window_size);
            for i in 0..20u8 {
                history.push(i % 5 + 1);
                assert!(history.len() <= window_size + 1);
            }
        }
    }

    #[test]
    fn test_n_back_target_during_warm_up() {
        let history = history_of(3, &[4, 2]);
        assert_eq!(history.n_back_target(), None);
    }

    #[test]
    fn test_n_back_target_once_window_filled() {
        // with n = 2 the next value must repeat the one two steps back
        let history = history_of(2, &[1, 4]);
        assert_eq!(history.n_back_target(), Some(1));

        let history = history_of(2, &[1, 4, 2]);
        assert_eq!(history.n_back_target(), Some(4));
    }

    #[test]
    fn test_target_becomes_oldest_after_push() {
        let mut history = history_of(2, &[1, 4, 2]);
        let target = history.n_back_target();

        history.push(5);

        assert_eq!(history.oldest(), target);
    }

    #[test]
    fn test_is_judgeable() {
        let mut history = History::new(1);
        assert!(!history.is_judgeable());

        history.push(3);
        assert!(!history.is_judgeable());

        history.push(3);
        assert!(history.is_judgeable());
    }

    #[test]
    fn test_is_match() {
        assert_eq!(history_of(1, &[3]).is_match(), None);
        assert_eq!(history_of(1, &[3, 3]).is_match(), Some(true));
        assert_eq!(history_of(2, &[3, 1, 2]).is_match(), Some(false));
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = History::new(3);

        assert!(history.is_empty());
        assert_eq!(history.oldest(), None);
        assert_eq!(history.capacity(), 4);
        assert_eq!(history.window_size(), 3);
    }
}
