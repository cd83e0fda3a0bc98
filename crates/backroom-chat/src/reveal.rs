//! Character-by-character reveal of a message.
//!
//! [`Reveal`] is clock-free: each call to [`Reveal::advance`] is one tick.
//! The owner schedules ticks every [`Reveal::interval`] and must drop its
//! pending tick when it restarts or tears the reveal down.

use std::time::Duration;

/// Outcome of a single reveal tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep<'a> {
    /// One more character is visible; carries the visible prefix.
    Frame(&'a str),
    /// The full text has been shown. Produced exactly once per reveal.
    Complete,
    /// Nothing left to do: already complete, or torn down.
    Finished,
}

/// Progressive renderer for a single target string.
#[derive(Debug, Clone)]
pub struct Reveal {
    text: String,
    interval: Duration,
    /// Byte offset of the end of the visible prefix. Always a char boundary.
    shown: usize,
    completed: bool,
    torn_down: bool,
}

impl Reveal {
    pub fn new(text: impl Into<String>, interval: Duration) -> Self {
        Self {
            text: text.into(),
            interval,
            shown: 0,
            completed: false,
            torn_down: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Currently visible prefix.
    pub fn visible(&self) -> &str {
        &self.text[..self.shown]
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Whether further ticks can still change anything.
    pub fn is_active(&self) -> bool {
        !self.completed && !self.torn_down
    }

    /// Reveal one more character, or signal completion.
    pub fn advance(&mut self) -> RevealStep<'_> {
        if !self.is_active() {
            return RevealStep::Finished;
        }
        let next = self.text[self.shown..].chars().next();
        match next {
            Some(c) => {
                self.shown += c.len_utf8();
                RevealStep::Frame(&self.text[..self.shown])
            }
            None => {
                self.completed = true;
                RevealStep::Complete
            }
        }
    }

    /// Point the reveal at new text.
    ///
    /// A different target (or any target after teardown) starts over from
    /// the empty prefix and returns `true`. Re-setting the same text while
    /// still active is a no-op.
    pub fn restart(&mut self, text: &str) -> bool {
        if !self.torn_down && self.text == text {
            return false;
        }
        self.text.clear();
        self.text.push_str(text);
        self.shown = 0;
        self.completed = false;
        self.torn_down = false;
        true
    }

    /// Stop revealing. No completion is signalled after this.
    pub fn teardown(&mut self) {
        self.torn_down = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(reveal: &mut Reveal) -> (Vec<String>, usize) {
        let mut frames = Vec::new();
        let mut completions = 0;
        loop {
            match reveal.advance() {
                RevealStep::Frame(p) => frames.push(p.to_string()),
                RevealStep::Complete => completions += 1,
                RevealStep::Finished => break,
            }
        }
        (frames, completions)
    }

    #[test]
    fn test_reveal_hi() {
        let mut reveal = Reveal::new("Hi", Duration::from_millis(10));
        let (frames, completions) = drain(&mut reveal);
        assert_eq!(frames, vec!["H", "Hi"]);
        assert_eq!(completions, 1);
        assert!(reveal.is_complete());
        assert_eq!(reveal.visible(), "Hi");
    }

    #[test]
    fn test_reveal_empty_completes_immediately() {
        let mut reveal = Reveal::new("", Duration::from_millis(10));
        assert_eq!(reveal.advance(), RevealStep::Complete);
        assert_eq!(reveal.advance(), RevealStep::Finished);
    }

    #[test]
    fn test_reveal_completion_signalled_once() {
        let mut reveal = Reveal::new("ok", Duration::from_millis(1));
        drain(&mut reveal);
        for _ in 0..5 {
            assert_eq!(reveal.advance(), RevealStep::Finished);
        }
    }

    #[test]
    fn test_reveal_multibyte_never_splits() {
        let mut reveal = Reveal::new("GH₵ 5", Duration::from_millis(1));
        let (frames, _) = drain(&mut reveal);
        assert_eq!(frames, vec!["G", "GH", "GH₵", "GH₵ ", "GH₵ 5"]);
    }

    #[test]
    fn test_restart_with_new_text_starts_from_empty() {
        let mut reveal = Reveal::new("Hello", Duration::from_millis(1));
        reveal.advance();
        reveal.advance();
        assert_eq!(reveal.visible(), "He");

        assert!(reveal.restart("Bye"));
        assert_eq!(reveal.visible(), "");
        let (frames, completions) = drain(&mut reveal);
        assert_eq!(frames, vec!["B", "By", "Bye"]);
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_restart_same_text_is_noop() {
        let mut reveal = Reveal::new("Hello", Duration::from_millis(1));
        reveal.advance();
        assert!(!reveal.restart("Hello"));
        assert_eq!(reveal.visible(), "H");
    }

    #[test]
    fn test_teardown_suppresses_completion() {
        let mut reveal = Reveal::new("Hi", Duration::from_millis(1));
        reveal.advance();
        reveal.teardown();
        assert!(!reveal.is_active());
        let (frames, completions) = drain(&mut reveal);
        assert!(frames.is_empty());
        assert_eq!(completions, 0);
        assert!(!reveal.is_complete());
    }

    #[test]
    fn test_restart_after_teardown_rearms() {
        let mut reveal = Reveal::new("Hi", Duration::from_millis(1));
        reveal.teardown();
        assert!(reveal.restart("Hi"));
        let (frames, completions) = drain(&mut reveal);
        assert_eq!(frames, vec!["H", "Hi"]);
        assert_eq!(completions, 1);
    }
}
