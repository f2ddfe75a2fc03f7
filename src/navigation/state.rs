use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "camelCase")]
pub enum PageId {
    #[default]
    Countdown = 1,
    Celebration = 2,
    Message = 3,
    Gallery = 4,
}

impl PageId {
    pub const ALL: [PageId; 4] = [
        PageId::Countdown,
        PageId::Celebration,
        PageId::Message,
        PageId::Gallery,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.number() == number)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn between(from: PageId, to: PageId) -> Self {
        if to > from {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub id: Uuid,
    pub from: PageId,
    pub to: PageId,
    pub direction: Direction,
}

impl Transition {
    /// Horizontal offset, in percent of the viewport, the leaving page slides to.
    pub fn exit_offset(&self) -> i32 {
        match self.direction {
            Direction::Forward => -100,
            Direction::Backward => 100,
        }
    }

    /// Offset the entering page is staged at before sliding to 0.
    pub fn entry_offset(&self) -> i32 {
        -self.exit_offset()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    Active,
    Leaving,
    Entering,
    Hidden,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum GoTo {
    /// Target is already the current page.
    Unchanged,
    /// Another transition is still settling; the request was dropped.
    Busy { in_flight: Transition },
    Started { transition: Transition },
}

/// Which page is current, and the transition that may be replacing it.
///
/// `current` only moves in [`NavigationState::settle`]; starting a transition
/// leaves it alone.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    current: PageId,
    in_flight: Option<Transition>,
}

impl NavigationState {
    pub fn new(current: PageId) -> Self {
        Self {
            current,
            in_flight: None,
        }
    }

    pub fn current(&self) -> PageId {
        self.current
    }

    pub fn in_flight(&self) -> Option<Transition> {
        self.in_flight
    }

    pub fn begin(&mut self, target: PageId) -> GoTo {
        if let Some(in_flight) = self.in_flight {
            return GoTo::Busy { in_flight };
        }
        if target == self.current {
            return GoTo::Unchanged;
        }

        let transition = Transition {
            id: Uuid::new_v4(),
            from: self.current,
            to: target,
            direction: Direction::between(self.current, target),
        };
        self.in_flight = Some(transition);
        GoTo::Started { transition }
    }

    /// Completes the in-flight transition if `id` matches it and returns the
    /// new current page. Stale ids are ignored.
    pub fn settle(&mut self, id: Uuid) -> Option<PageId> {
        match self.in_flight {
            Some(transition) if transition.id == id => {
                self.in_flight = None;
                self.current = transition.to;
                Some(transition.to)
            }
            _ => None,
        }
    }

    /// Drops any transition and jumps straight to `page`.
    pub fn reset(&mut self, page: PageId) {
        self.in_flight = None;
        self.current = page;
    }

    pub fn visibility(&self, page: PageId) -> Visibility {
        match self.in_flight {
            Some(transition) if transition.from == page => Visibility::Leaving,
            Some(transition) if transition.to == page => Visibility::Entering,
            _ if page == self.current => Visibility::Active,
            _ => Visibility::Hidden,
        }
    }

    /// Only a page at rest takes input.
    pub fn is_interactive(&self, page: PageId) -> bool {
        self.visibility(page) == Visibility::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interactive_pages(state: &NavigationState) -> Vec<PageId> {
        PageId::ALL
            .into_iter()
            .filter(|page| state.is_interactive(*page))
            .collect()
    }

    #[test]
    fn every_pair_settles_on_exactly_the_target() {
        for from in PageId::ALL {
            for to in PageId::ALL {
                let mut state = NavigationState::new(from);
                match state.begin(to) {
                    GoTo::Unchanged => assert_eq!(from, to),
                    GoTo::Started { transition } => {
                        assert_ne!(from, to);
                        assert_eq!(state.current(), from);
                        assert!(interactive_pages(&state).is_empty());
                        assert_eq!(state.settle(transition.id), Some(to));
                    }
                    GoTo::Busy { .. } => panic!("nothing was in flight"),
                }
                assert_eq!(interactive_pages(&state), vec![to]);
            }
        }
    }

    #[test]
    fn direction_follows_page_order() {
        let mut state = NavigationState::new(PageId::Message);
        let GoTo::Started { transition } = state.begin(PageId::Celebration) else {
            panic!("expected a transition");
        };
        assert_eq!(transition.direction, Direction::Backward);
        assert_eq!(transition.exit_offset(), 100);
        assert_eq!(transition.entry_offset(), -100);

        state.settle(transition.id);
        let GoTo::Started { transition } = state.begin(PageId::Gallery) else {
            panic!("expected a transition");
        };
        assert_eq!(transition.direction, Direction::Forward);
        assert_eq!(transition.exit_offset(), -100);
    }

    #[test]
    fn both_pages_visible_while_in_flight() {
        let mut state = NavigationState::new(PageId::Countdown);
        state.begin(PageId::Celebration);

        assert_eq!(state.visibility(PageId::Countdown), Visibility::Leaving);
        assert_eq!(state.visibility(PageId::Celebration), Visibility::Entering);
        assert_eq!(state.visibility(PageId::Message), Visibility::Hidden);
    }

    #[test]
    fn overlapping_begin_is_refused() {
        let mut state = NavigationState::new(PageId::Countdown);
        let GoTo::Started { transition } = state.begin(PageId::Celebration) else {
            panic!("expected a transition");
        };

        assert_eq!(
            state.begin(PageId::Gallery),
            GoTo::Busy {
                in_flight: transition
            }
        );
        assert_eq!(state.settle(Uuid::new_v4()), None);
        assert_eq!(state.settle(transition.id), Some(PageId::Celebration));
    }

    #[test]
    fn page_numbers_round_trip() {
        for page in PageId::ALL {
            assert_eq!(PageId::from_number(page.number()), Some(page));
        }
        assert_eq!(PageId::from_number(0), None);
        assert_eq!(PageId::from_number(5), None);
    }

    #[test]
    fn sessions_start_on_the_countdown() {
        assert_eq!(PageId::default(), PageId::Countdown);
    }
}
