// Thief monitor (spec.md §4.8): tracks recent thief sightings/thefts in a
// bounded ring buffer so the Reactive Planner can decide whether to engage,
// reroute, or ignore. Grounded on the bounded-history ring-buffer pattern
// used by the teacher's narrative memory.

use engine_contract::{ObjectId, RoomId};
use std::collections::VecDeque;

const HISTORY_CAPACITY: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThiefEvent {
    Sighted { room: RoomId, turn: u32 },
    Stole { item: ObjectId, room: RoomId, turn: u32 },
}

/// Bounded history of thief activity. Oldest entries drop off once
/// `HISTORY_CAPACITY` is exceeded; nothing here allocates beyond the ring
/// buffer itself.
#[derive(Clone, Debug, Default)]
pub struct ThiefMonitor {
    history: VecDeque<ThiefEvent>,
}

impl ThiefMonitor {
    pub fn new() -> Self {
        Self { history: VecDeque::with_capacity(HISTORY_CAPACITY) }
    }

    fn push(&mut self, event: ThiefEvent) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(event);
    }

    pub fn record_sighting(&mut self, room: RoomId, turn: u32) {
        self.push(ThiefEvent::Sighted { room, turn });
    }

    pub fn record_theft(&mut self, item: ObjectId, room: RoomId, turn: u32) {
        self.push(ThiefEvent::Stole { item, room, turn });
    }

    pub fn history(&self) -> impl Iterator<Item = &ThiefEvent> {
        self.history.iter()
    }

    /// Every item seen stolen in the recorded history, most recent first,
    /// without duplicates.
    pub fn stolen_items(&self) -> Vec<ObjectId> {
        let mut seen = std::collections::HashSet::new();
        let mut items = Vec::new();
        for event in self.history.iter().rev() {
            if let ThiefEvent::Stole { item, .. } = event {
                if seen.insert(*item) {
                    items.push(*item);
                }
            }
        }
        items
    }

    /// Number of thefts recorded in the last `window` turns, counting back
    /// from `current_turn`.
    pub fn thefts_within(&self, current_turn: u32, window: u32) -> usize {
        self.history
            .iter()
            .filter(|event| match event {
                ThiefEvent::Stole { turn, .. } => current_turn.saturating_sub(*turn) <= window,
                ThiefEvent::Sighted { .. } => false,
            })
            .count()
    }

    pub fn last_sighting(&self) -> Option<(RoomId, u32)> {
        self.history.iter().rev().find_map(|event| match event {
            ThiefEvent::Sighted { room, turn } => Some((*room, *turn)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_bounded() {
        let mut monitor = ThiefMonitor::new();
        for turn in 0..(HISTORY_CAPACITY as u32 + 5) {
            monitor.record_sighting(RoomId::new("maze"), turn);
        }
        assert_eq!(monitor.history().count(), HISTORY_CAPACITY);
    }

    #[test]
    fn stolen_items_deduplicates_repeated_theft() {
        let egg = ObjectId::new("egg");
        let mut monitor = ThiefMonitor::new();
        monitor.record_theft(egg, RoomId::new("room"), 3);
        monitor.record_theft(egg, RoomId::new("room"), 9);
        assert_eq!(monitor.stolen_items(), vec![egg]);
    }

    #[test]
    fn thefts_within_respects_the_window() {
        let mut monitor = ThiefMonitor::new();
        monitor.record_theft(ObjectId::new("egg"), RoomId::new("room"), 1);
        monitor.record_theft(ObjectId::new("knife"), RoomId::new("room"), 19);
        assert_eq!(monitor.thefts_within(20, 5), 1);
        assert_eq!(monitor.thefts_within(20, 25), 2);
    }
}
