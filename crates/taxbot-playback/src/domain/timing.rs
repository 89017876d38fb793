//! Reveal cadence and theme-transition timing.

use std::time::Duration;

/// The reply's mood is committed 45% (9/20) of the way through typing.
const MOOD_COMMIT_NUMERATOR: u32 = 9;
const MOOD_COMMIT_DENOMINATOR: u32 = 20;
/// The mood is committed at least this long before typing would end.
const MOOD_COMMIT_LEAD: Duration = Duration::from_millis(400);
/// ...and never sooner than this after the reply starts.
const MOOD_COMMIT_FLOOR: Duration = Duration::from_millis(250);

/// Timing knobs for one reply cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTiming {
    /// Delay between a send and the assistant placeholder appearing.
    pub reply_delay: Duration,
    /// Interval between revealed words.
    pub word_interval: Duration,
    /// Floor for the nominal typing duration.
    pub min_typing: Duration,
    /// Floor for the theme-transition duration.
    pub min_theme_transition: Duration,
    /// Theme-transition time contributed by each word of a long reply.
    pub theme_per_word: Duration,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(700),
            word_interval: Duration::from_millis(120),
            min_typing: Duration::from_millis(2400),
            min_theme_transition: Duration::from_millis(7000),
            theme_per_word: Duration::from_millis(350),
        }
    }
}

fn word_factor(words: usize) -> u32 {
    u32::try_from(words).unwrap_or(u32::MAX)
}

impl PlaybackTiming {
    /// Nominal typing duration for a reply of `words` words.
    #[must_use]
    pub fn typing_duration(&self, words: usize) -> Duration {
        self.word_interval
            .saturating_mul(word_factor(words))
            .max(self.min_typing)
    }

    /// Time from the placeholder to the last word being revealed.
    #[must_use]
    pub fn reveal_duration(&self, words: usize) -> Duration {
        self.word_interval.saturating_mul(word_factor(words))
    }

    /// How long the theme takes to cross-fade for a reply of `words` words.
    #[must_use]
    pub fn theme_transition(&self, words: usize) -> Duration {
        self.theme_per_word
            .saturating_mul(word_factor(words))
            .max(self.min_theme_transition)
    }

    /// Delay from the placeholder appearing to the mood commit:
    /// `max(min(0.45 * typing, typing - 400ms), 250ms)`.
    #[must_use]
    pub fn mood_commit_delay(typing: Duration) -> Duration {
        (typing.saturating_mul(MOOD_COMMIT_NUMERATOR) / MOOD_COMMIT_DENOMINATOR)
            .min(typing.saturating_sub(MOOD_COMMIT_LEAD))
            .max(MOOD_COMMIT_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_short_replies_use_the_floors() {
        let timing = PlaybackTiming::default();

        assert_eq!(timing.typing_duration(0), ms(2400));
        assert_eq!(timing.typing_duration(3), ms(2400));
        assert_eq!(timing.theme_transition(3), ms(7000));
    }

    #[test]
    fn test_long_replies_scale_with_word_count() {
        let timing = PlaybackTiming::default();

        assert_eq!(timing.typing_duration(50), ms(6000));
        assert_eq!(timing.theme_transition(40), ms(14_000));
    }

    #[test]
    fn test_reveal_duration_is_one_interval_per_word() {
        let timing = PlaybackTiming::default();

        assert_eq!(timing.reveal_duration(9), ms(1080));
        assert_eq!(timing.reveal_duration(0), Duration::ZERO);
    }

    #[test]
    fn test_mood_commit_lands_at_forty_five_percent_of_typing() {
        assert_eq!(PlaybackTiming::mood_commit_delay(ms(2400)), ms(1080));
        assert_eq!(PlaybackTiming::mood_commit_delay(ms(10_000)), ms(4500));
    }

    #[test]
    fn test_mood_commit_respects_lead_and_floor() {
        // 0.45 * 600 = 270 > 600 - 400 = 200, so the lead wins, then the floor.
        assert_eq!(PlaybackTiming::mood_commit_delay(ms(600)), ms(250));
        // 0.45 * 700 = 315 > 700 - 400 = 300.
        assert_eq!(PlaybackTiming::mood_commit_delay(ms(700)), ms(300));
        assert_eq!(PlaybackTiming::mood_commit_delay(Duration::ZERO), ms(250));
    }
}
