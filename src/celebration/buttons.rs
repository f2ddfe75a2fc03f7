use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ButtonKey {
    Lights,
    Music,
    Decorate,
    Balloons,
    Message,
}

impl ButtonKey {
    /// Unlock order.
    pub const CHAIN: [ButtonKey; 5] = [
        ButtonKey::Lights,
        ButtonKey::Music,
        ButtonKey::Decorate,
        ButtonKey::Balloons,
        ButtonKey::Message,
    ];

    pub fn predecessor(self) -> Option<ButtonKey> {
        match self {
            ButtonKey::Lights => None,
            ButtonKey::Music => Some(ButtonKey::Lights),
            ButtonKey::Decorate => Some(ButtonKey::Music),
            ButtonKey::Balloons => Some(ButtonKey::Decorate),
            ButtonKey::Message => Some(ButtonKey::Balloons),
        }
    }
}

/// Which celebration buttons have been pressed. Entries only go from false
/// to true; [`ButtonChain::default`] is the fresh, all-false map.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ButtonChain {
    pub lights: bool,
    pub music: bool,
    pub decorate: bool,
    pub balloons: bool,
    pub message: bool,
}

impl ButtonChain {
    pub fn is_active(&self, key: ButtonKey) -> bool {
        match key {
            ButtonKey::Lights => self.lights,
            ButtonKey::Music => self.music,
            ButtonKey::Decorate => self.decorate,
            ButtonKey::Balloons => self.balloons,
            ButtonKey::Message => self.message,
        }
    }

    pub fn is_unlocked(&self, key: ButtonKey) -> bool {
        key.predecessor()
            .map(|previous| self.is_active(previous))
            .unwrap_or(true)
    }

    /// Returns false, and changes nothing, when `key` is already active or
    /// its predecessor isn't.
    pub fn activate(&mut self, key: ButtonKey) -> bool {
        if self.is_active(key) || !self.is_unlocked(key) {
            return false;
        }

        let slot = match key {
            ButtonKey::Lights => &mut self.lights,
            ButtonKey::Music => &mut self.music,
            ButtonKey::Decorate => &mut self.decorate,
            ButtonKey::Balloons => &mut self.balloons,
            ButtonKey::Message => &mut self.message,
        };
        *slot = true;
        true
    }

    /// Buttons currently on screen. Pressed buttons go away, except the
    /// message button which stays until the page is left.
    pub fn visible(&self) -> Vec<ButtonKey> {
        ButtonKey::CHAIN
            .into_iter()
            .filter(|key| self.is_unlocked(*key))
            .filter(|key| *key == ButtonKey::Message || !self.is_active(*key))
            .collect()
    }
}
