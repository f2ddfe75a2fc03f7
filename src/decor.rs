//! Floating decorations behind the pages. Generated once per session from a
//! seed so the layout stays put across re-renders.

use std::ops::Range;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Floater {
    pub emoji: &'static str,
    /// Horizontal position, percent of the viewport.
    pub left: f32,
    pub delay_secs: f32,
    pub duration_secs: f32,
    /// Relative font size.
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sparkle {
    pub left: f32,
    pub top: f32,
    pub delay_secs: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorConfig {
    pub seed: u64,
    pub party_elements: Vec<Floater>,
    pub celebration_hearts: Vec<Floater>,
    pub celebration_emojis: Vec<Floater>,
    pub message_decorations: Vec<Floater>,
    pub sparkles: Vec<Sparkle>,
}

struct FloaterSpec {
    count: usize,
    emojis: &'static [&'static str],
    delay: Range<f32>,
    duration: Range<f32>,
    size: Range<f32>,
}

const PARTY_ELEMENTS: FloaterSpec = FloaterSpec {
    count: 8,
    emojis: &["🎈", "🎁", "🌟", "💖", "✨"],
    delay: 0.0..10.0,
    duration: 18.0..26.0,
    size: 0.9..1.5,
};

const CELEBRATION_HEARTS: FloaterSpec = FloaterSpec {
    count: 8,
    emojis: &["💗", "💖", "✨"],
    delay: 0.0..5.0,
    duration: 12.0..17.0,
    size: 0.9..1.4,
};

const CELEBRATION_EMOJIS: FloaterSpec = FloaterSpec {
    count: 5,
    emojis: &["🎈", "🎁", "🌟", "🎉"],
    delay: 0.0..8.0,
    duration: 14.0..19.0,
    size: 1.0..1.3,
};

const MESSAGE_DECORATIONS: FloaterSpec = FloaterSpec {
    count: 5,
    emojis: &["💖", "✨", "🌟"],
    delay: 0.0..6.0,
    duration: 12.0..17.0,
    size: 0.9..1.3,
};

const SPARKLES: usize = 6;

impl DecorConfig {
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        Self {
            seed,
            party_elements: floaters(&mut rng, &PARTY_ELEMENTS),
            celebration_hearts: floaters(&mut rng, &CELEBRATION_HEARTS),
            celebration_emojis: floaters(&mut rng, &CELEBRATION_EMOJIS),
            message_decorations: floaters(&mut rng, &MESSAGE_DECORATIONS),
            sparkles: (0..SPARKLES)
                .map(|_| Sparkle {
                    left: rng.gen_range(0.0..100.0),
                    top: rng.gen_range(0.0..100.0),
                    delay_secs: rng.gen_range(0.0..5.0),
                })
                .collect(),
        }
    }
}

fn floaters(rng: &mut StdRng, spec: &FloaterSpec) -> Vec<Floater> {
    (0..spec.count)
        .map(|_| Floater {
            emoji: spec.emojis.choose(rng).copied().unwrap_or("✨"),
            left: rng.gen_range(0.0..100.0),
            delay_secs: rng.gen_range(spec.delay.clone()),
            duration_secs: rng.gen_range(spec.duration.clone()),
            size: rng.gen_range(spec.size.clone()),
        })
        .collect()
}
