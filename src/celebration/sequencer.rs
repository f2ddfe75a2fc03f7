use serde::{Deserialize, Serialize};

use super::{Answer, ButtonChain, ButtonKey, Slide};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum Phase {
    Slideshow { index: usize },
    ButtonChain,
    Complete,
}

/// What an input did to the sequencer. The controller maps these to effects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum Step {
    Unchanged,
    SlideAdvanced { index: usize },
    ButtonsRevealed,
    /// "No" on the question slide. Purely cosmetic, the slide stays.
    Rejected,
    Activated { button: ButtonKey },
    Completed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebrationView {
    pub phase: Phase,
    pub slide: Option<Slide>,
    pub slide_count: usize,
    pub buttons: ButtonChain,
    pub visible_buttons: Vec<ButtonKey>,
    pub lights_on: bool,
}

/// Slides first, strictly in order, then the button chain.
#[derive(Debug, Clone)]
pub struct CelebrationSequencer {
    slides: Vec<Slide>,
    phase: Phase,
    buttons: ButtonChain,
}

impl CelebrationSequencer {
    pub fn new(slides: Vec<Slide>) -> Self {
        // An empty deck goes straight to the buttons.
        let phase = if slides.is_empty() {
            Phase::ButtonChain
        } else {
            Phase::Slideshow { index: 0 }
        };

        Self {
            slides,
            phase,
            buttons: ButtonChain::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn buttons(&self) -> ButtonChain {
        self.buttons
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        match self.phase {
            Phase::Slideshow { index } => self.slides.get(index),
            _ => None,
        }
    }

    /// Back to the first slide with every button unpressed.
    pub fn reset(&mut self) {
        *self = Self::new(std::mem::take(&mut self.slides));
    }

    /// Moves past an announcement slide. Question slides need an answer.
    pub fn advance(&mut self) -> Step {
        match self.current_slide() {
            Some(slide) if !slide.is_question() => self.step_forward(),
            _ => Step::Unchanged,
        }
    }

    pub fn answer(&mut self, answer: Answer) -> Step {
        match self.current_slide() {
            Some(slide) if slide.is_question() => match answer {
                Answer::Yes => self.step_forward(),
                Answer::No => Step::Rejected,
            },
            _ => Step::Unchanged,
        }
    }

    pub fn activate(&mut self, key: ButtonKey) -> Step {
        if self.phase != Phase::ButtonChain {
            return Step::Unchanged;
        }
        if self.buttons.activate(key) {
            Step::Activated { button: key }
        } else {
            Step::Unchanged
        }
    }

    /// Closes the chain once the message button has been pressed.
    pub fn finish(&mut self) -> Step {
        if self.phase == Phase::ButtonChain && self.buttons.message {
            self.phase = Phase::Complete;
            Step::Completed
        } else {
            Step::Unchanged
        }
    }

    /// `Enter`/`Space` advance announcements, `y`/`n` answer questions.
    pub fn handle_key(&mut self, key: &str) -> Step {
        match key {
            "Enter" | " " | "Space" => self.advance(),
            _ if key.eq_ignore_ascii_case("y") => self.answer(Answer::Yes),
            _ if key.eq_ignore_ascii_case("n") => self.answer(Answer::No),
            _ => Step::Unchanged,
        }
    }

    pub fn view(&self) -> CelebrationView {
        CelebrationView {
            phase: self.phase,
            slide: self.current_slide().cloned(),
            slide_count: self.slides.len(),
            buttons: self.buttons,
            visible_buttons: match self.phase {
                Phase::ButtonChain => self.buttons.visible(),
                _ => Vec::new(),
            },
            lights_on: self.buttons.lights,
        }
    }

    fn step_forward(&mut self) -> Step {
        let Phase::Slideshow { index } = self.phase else {
            return Step::Unchanged;
        };

        if index + 1 < self.slides.len() {
            self.phase = Phase::Slideshow { index: index + 1 };
            Step::SlideAdvanced { index: index + 1 }
        } else {
            self.phase = Phase::ButtonChain;
            self.buttons = ButtonChain::default();
            Step::ButtonsRevealed
        }
    }
}
