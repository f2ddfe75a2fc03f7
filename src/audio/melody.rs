use rodio::Source;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;
const BEAT_SECS: f32 = 0.42;
/// Share of each note spent fading in and out, to avoid clicks.
const ENVELOPE: f32 = 0.08;

const C4: f32 = 261.63;
const D4: f32 = 293.66;
const E4: f32 = 329.63;
const F4: f32 = 349.23;
const G4: f32 = 392.00;
const A4: f32 = 440.00;
const BB4: f32 = 466.16;
const C5: f32 = 523.25;

/// (frequency, beats)
const NOTES: [(f32, f32); 25] = [
    (C4, 0.75), (C4, 0.25), (D4, 1.0), (C4, 1.0), (F4, 1.0), (E4, 2.0),
    (C4, 0.75), (C4, 0.25), (D4, 1.0), (C4, 1.0), (G4, 1.0), (F4, 2.0),
    (C4, 0.75), (C4, 0.25), (C5, 1.0), (A4, 1.0), (F4, 1.0), (E4, 1.0), (D4, 2.0),
    (BB4, 0.75), (BB4, 0.25), (A4, 1.0), (F4, 1.0), (G4, 1.0), (F4, 2.0),
];

/// "Happy Birthday", synthesised as soft sine tones. Finite: plays once.
pub struct BirthdayMelody {
    sample_rate: u32,
    note: usize,
    sample_in_note: u32,
    phase: f32,
}

impl BirthdayMelody {
    pub fn new() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            note: 0,
            sample_in_note: 0,
            phase: 0.0,
        }
    }

    fn note_samples(&self, beats: f32) -> u32 {
        (beats * BEAT_SECS * self.sample_rate as f32) as u32
    }
}

impl Default for BirthdayMelody {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for BirthdayMelody {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let (freq, beats) = *NOTES.get(self.note)?;
        let length = self.note_samples(beats);

        let progress = self.sample_in_note as f32 / length as f32;
        let gain = if progress < ENVELOPE {
            progress / ENVELOPE
        } else if progress > 1.0 - ENVELOPE {
            (1.0 - progress) / ENVELOPE
        } else {
            1.0
        };

        let sample = (self.phase * std::f32::consts::TAU).sin() * gain * 0.25;

        self.phase += freq / self.sample_rate as f32;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        self.sample_in_note += 1;
        if self.sample_in_note >= length {
            self.sample_in_note = 0;
            self.note += 1;
        }

        Some(sample)
    }
}

impl Source for BirthdayMelody {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let beats: f32 = NOTES.iter().map(|(_, beats)| beats).sum();
        Some(Duration::from_secs_f32(beats * BEAT_SECS))
    }
}
