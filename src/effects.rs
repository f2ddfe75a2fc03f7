//! Presentation effects: every particle burst, confetti shower or theme change
//! the page plays. The core only says *which* effect to play; it never waits on
//! one or reads anything back.

use serde::{Deserialize, Serialize};

use crate::celebration::ButtonKey;
use crate::events::{Events, EFFECT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Effect {
    /// Balloons, fireworks and confetti over the countdown page.
    #[serde(rename_all = "camelCase")]
    BirthdayCelebration { duration_ms: u64 },
    /// Burst of sparkles when a slide is left.
    SlideBurst,
    /// Shake and pleading emojis after a "no".
    QuestionRejected,
    /// Slides fold away and the button grid appears.
    ButtonsRevealed,
    ButtonBurst { button: ButtonKey },
    /// Dark theme with light beams.
    LightsOn,
    MusicNotes,
    Decoration { button: ButtonKey },
    #[serde(rename_all = "camelCase")]
    Confetti { duration_ms: u64 },
    Finale,
    CurtainsOpened,
    RevealPhotos,
    ScrollToTop,
}

/// Fire-and-forget sink for effects.
pub trait PresentationEffects: Send + Sync + 'static {
    fn play(&self, effect: Effect);
}

/// Forwards each effect to the renderer as an `effect` event.
#[derive(Clone)]
pub struct EventEffects {
    events: Events,
}

impl EventEffects {
    pub fn new(events: Events) -> Self {
        Self { events }
    }
}

impl PresentationEffects for EventEffects {
    fn play(&self, effect: Effect) {
        log::debug!("effect: {effect:?}");
        self.events.emit(EFFECT, &effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;

    #[test]
    fn effects_serialize_with_kind_tag() {
        let sink = MemorySink::new();
        let effects = EventEffects::new(Events::new(sink.clone()));

        effects.play(Effect::Decoration {
            button: ButtonKey::Balloons,
        });
        effects.play(Effect::Confetti { duration_ms: 5_000 });

        let played = sink.named(EFFECT);
        assert_eq!(played[0]["kind"], "decoration");
        assert_eq!(played[0]["button"], "balloons");
        assert_eq!(played[1]["kind"], "confetti");
        assert_eq!(played[1]["durationMs"], 5_000);
    }
}
