use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Answer {
    Yes,
    No,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub text: String,
    pub emoji: String,
    pub answer: Answer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SlideKind {
    Announcement,
    Question { options: Vec<AnswerOption> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub icon: String,
    pub sub_icons: Vec<String>,
    pub text: String,
    pub kind: SlideKind,
}

impl Slide {
    pub fn announcement(icon: &str, sub_icons: [&str; 3], text: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            sub_icons: sub_icons.iter().map(|s| s.to_string()).collect(),
            text: text.into(),
            kind: SlideKind::Announcement,
        }
    }

    pub fn question(icon: &str, sub_icons: [&str; 3], text: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            sub_icons: sub_icons.iter().map(|s| s.to_string()).collect(),
            text: text.into(),
            kind: SlideKind::Question {
                options: vec![
                    AnswerOption {
                        text: "Yes!".into(),
                        emoji: "😍".into(),
                        answer: Answer::Yes,
                    },
                    AnswerOption {
                        text: "No".into(),
                        emoji: "😅".into(),
                        answer: Answer::No,
                    },
                ],
            },
        }
    }

    pub fn is_question(&self) -> bool {
        matches!(self.kind, SlideKind::Question { .. })
    }
}

/// Announcement, question, announcement.
pub fn default_slides(recipient: &str) -> Vec<Slide> {
    vec![
        Slide::announcement(
            "🎉",
            ["✨", "🌟", "💫"],
            format!("It's your special day, {recipient}! 🥰"),
        ),
        Slide::question("🎁", ["💝", "🎀", "💖"], "Wanna see what we made? 👀"),
        Slide::announcement("🥳", ["🎊", "🪅", "🎈"], "Let's gooooo! 💅"),
    ]
}
