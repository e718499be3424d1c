use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::session::game::GameEvent;

/// Short-lived visual signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Echo of the key that was just pressed on the virtual keyboard.
    KeyEcho,
    Correct,
    Wrong,
    /// Banner shown during the pause after a completed word.
    Celebrate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    pub key_echo: Duration,
    pub feedback: Duration,
    pub word_pause: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            key_echo: Duration::from_millis(150),
            feedback: Duration::from_millis(200),
            word_pause: Duration::from_millis(800),
        }
    }
}

/// Deadlines for transient signals. Expiry only flips visibility; it never
/// touches game progress.
pub struct FeedbackCoordinator {
    timings: Timings,
    deadlines: HashMap<Signal, Instant>,
    echoed_key: Option<String>,
    celebrated_word: Option<String>,
}

impl FeedbackCoordinator {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            deadlines: HashMap::new(),
            echoed_key: None,
            celebrated_word: None,
        }
    }

    pub fn duration_of(&self, signal: Signal) -> Duration {
        match signal {
            Signal::KeyEcho => self.timings.key_echo,
            Signal::Correct | Signal::Wrong => self.timings.feedback,
            Signal::Celebrate => self.timings.word_pause,
        }
    }

    /// Show `signal` from `now` for its configured duration. Re-triggering
    /// an active signal restarts its window.
    pub fn trigger(&mut self, signal: Signal, now: Instant) {
        let duration = self.duration_of(signal);
        self.deadlines.insert(signal, now + duration);
    }

    pub fn observe(&mut self, event: &GameEvent, now: Instant) {
        match event {
            GameEvent::KeyPressed(key) => {
                self.echoed_key = Some(key.clone());
                self.trigger(Signal::KeyEcho, now);
            }
            GameEvent::KeyCorrect { .. } => self.trigger(Signal::Correct, now),
            GameEvent::KeyWrong { .. } => self.trigger(Signal::Wrong, now),
            GameEvent::WordComplete { word, .. } => {
                self.celebrated_word = Some(word.clone());
                self.trigger(Signal::Celebrate, now);
            }
            GameEvent::CharacterComplete { .. }
            | GameEvent::WordAdvanced { .. }
            | GameEvent::GameComplete { .. } => {}
        }
    }

    pub fn is_active(&self, signal: Signal, now: Instant) -> bool {
        self.deadlines.get(&signal).is_some_and(|&due| now < due)
    }

    /// Clear every signal whose window has passed. Each expiry is reported
    /// once.
    pub fn expire(&mut self, now: Instant) -> Vec<Signal> {
        let expired: Vec<Signal> = self
            .deadlines
            .iter()
            .filter(|&(_, &due)| now >= due)
            .map(|(&signal, _)| signal)
            .collect();
        for signal in &expired {
            self.deadlines.remove(signal);
            match signal {
                Signal::KeyEcho => self.echoed_key = None,
                Signal::Celebrate => self.celebrated_word = None,
                Signal::Correct | Signal::Wrong => {}
            }
        }
        expired
    }

    /// Drop all pending signals, e.g. when a new game starts.
    pub fn clear(&mut self) {
        self.deadlines.clear();
        self.echoed_key = None;
        self.celebrated_word = None;
    }

    pub fn echoed_key(&self, now: Instant) -> Option<&str> {
        if self.is_active(Signal::KeyEcho, now) {
            self.echoed_key.as_deref()
        } else {
            None
        }
    }

    pub fn celebrated_word(&self, now: Instant) -> Option<&str> {
        if self.is_active(Signal::Celebrate, now) {
            self.celebrated_word.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn signal_clears_after_its_window() {
        let mut fb = FeedbackCoordinator::new(Timings::default());
        let t0 = Instant::now();
        fb.trigger(Signal::Correct, t0);
        assert!(fb.is_active(Signal::Correct, t0));
        assert!(fb.is_active(Signal::Correct, t0 + ms(199)));
        assert!(!fb.is_active(Signal::Correct, t0 + ms(200)));
    }

    #[test]
    fn expiry_is_reported_once() {
        let mut fb = FeedbackCoordinator::new(Timings::default());
        let t0 = Instant::now();
        fb.trigger(Signal::Wrong, t0);
        assert!(fb.expire(t0 + ms(100)).is_empty());
        assert_eq!(fb.expire(t0 + ms(200)), vec![Signal::Wrong]);
        assert!(fb.expire(t0 + ms(400)).is_empty());
    }

    #[test]
    fn retrigger_restarts_rather_than_stacks() {
        let mut fb = FeedbackCoordinator::new(Timings::default());
        let t0 = Instant::now();
        fb.trigger(Signal::Wrong, t0);
        fb.trigger(Signal::Wrong, t0 + ms(150));
        assert!(fb.expire(t0 + ms(200)).is_empty());
        assert!(fb.is_active(Signal::Wrong, t0 + ms(300)));
        assert_eq!(fb.expire(t0 + ms(350)), vec![Signal::Wrong]);
    }

    #[test]
    fn signals_are_independent() {
        let mut fb = FeedbackCoordinator::new(Timings::default());
        let t0 = Instant::now();
        fb.trigger(Signal::KeyEcho, t0);
        fb.trigger(Signal::Correct, t0);
        assert_eq!(fb.expire(t0 + ms(150)), vec![Signal::KeyEcho]);
        assert!(fb.is_active(Signal::Correct, t0 + ms(150)));
    }

    #[test]
    fn observes_game_events() {
        let mut fb = FeedbackCoordinator::new(Timings::default());
        let t0 = Instant::now();
        fb.observe(&GameEvent::KeyPressed("v".to_string()), t0);
        fb.observe(&GameEvent::KeyCorrect { key: 'v' }, t0);
        assert_eq!(fb.echoed_key(t0), Some("v"));
        assert!(fb.is_active(Signal::Correct, t0));
        assert!(!fb.is_active(Signal::Wrong, t0));

        fb.observe(
            &GameEvent::WordComplete {
                word: "小貓".to_string(),
                score: 10,
            },
            t0,
        );
        assert_eq!(fb.celebrated_word(t0 + ms(799)), Some("小貓"));
        assert_eq!(fb.celebrated_word(t0 + ms(800)), None);

        assert_eq!(fb.echoed_key(t0 + ms(150)), None);
        fb.expire(t0 + ms(150));
        assert_eq!(fb.echoed_key(t0), None);
    }

    #[test]
    fn clear_cancels_everything() {
        let mut fb = FeedbackCoordinator::new(Timings::default());
        let t0 = Instant::now();
        fb.trigger(Signal::Celebrate, t0);
        fb.trigger(Signal::Wrong, t0);
        fb.clear();
        assert!(!fb.is_active(Signal::Celebrate, t0));
        assert!(fb.expire(t0 + ms(1000)).is_empty());
    }

    #[test]
    fn custom_timings_are_respected() {
        let timings = Timings {
            key_echo: ms(10),
            feedback: ms(20),
            word_pause: ms(30),
        };
        let mut fb = FeedbackCoordinator::new(timings);
        let t0 = Instant::now();
        fb.trigger(Signal::Celebrate, t0);
        assert!(fb.is_active(Signal::Celebrate, t0 + ms(29)));
        assert!(!fb.is_active(Signal::Celebrate, t0 + ms(30)));
    }
}
