//! Participant identification and per-participant data storage.
//!
//! ## ParticipantId
//!
//! Type-safe participant identifier. Identifiers are 1-based, matching
//! how the games label their players ("Player 1", "Player 2").
//!
//! ## ParticipantMap
//!
//! Per-participant storage backed by `Vec` for O(1) access.
//! Supports iteration and indexing by `ParticipantId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Largest supported participant count.
pub const MAX_PARTICIPANTS: usize = 255;

/// Participant identifier, 1-based (`1..=N`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(u8);

impl ParticipantId {
    /// Create a participant ID from its 1-based number.
    ///
    /// # Panics
    ///
    /// Panics if `id` is 0.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(id > 0, "Participant ids start at 1");
        Self(id)
    }

    /// Create a participant ID from a 0-based storage index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u8 + 1)
    }

    /// The 1-based participant number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The 0-based storage index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// Next participant in round-robin order, wrapping after `count`.
    #[must_use]
    pub fn next(self, count: usize) -> Self {
        Self::from_index((self.index() + 1) % count.max(1))
    }

    /// Iterate over all participant IDs for a session with `count` participants.
    ///
    /// ```
    /// use timed_rounds::core::ParticipantId;
    ///
    /// let ids: Vec<_> = ParticipantId::all(3).collect();
    /// assert_eq!(ids, vec![ParticipantId::new(1), ParticipantId::new(2), ParticipantId::new(3)]);
    /// ```
    pub fn all(count: usize) -> impl Iterator<Item = ParticipantId> {
        (0..count.min(MAX_PARTICIPANTS)).map(ParticipantId::from_index)
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-participant data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use timed_rounds::core::{ParticipantId, ParticipantMap};
///
/// let mut scores: ParticipantMap<u64> = ParticipantMap::with_value(2, 0);
/// scores[ParticipantId::new(2)] += 45;
/// assert_eq!(scores[ParticipantId::new(1)], 0);
/// assert_eq!(scores[ParticipantId::new(2)], 45);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantMap<T> {
    data: Vec<T>,
}

impl<T> ParticipantMap<T> {
    /// Create a map with values from a factory function.
    ///
    /// # Panics
    ///
    /// Panics if `count` is 0 or above [`MAX_PARTICIPANTS`]. Session
    /// configuration is validated before any map is built.
    pub fn new(count: usize, factory: impl Fn(ParticipantId) -> T) -> Self {
        assert!(count > 0, "Must have at least 1 participant");
        assert!(count <= MAX_PARTICIPANTS, "At most 255 participants supported");

        Self {
            data: ParticipantId::all(count).map(factory).collect(),
        }
    }

    /// Create a map with all entries set to the same value.
    pub fn with_value(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(count, |_| value.clone())
    }

    /// Create a map with default values.
    pub fn with_default(count: usize) -> Self
    where
        T: Default,
    {
        Self::new(count, |_| T::default())
    }

    /// Number of participants.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.data.len()
    }

    /// Whether `participant` has an entry in this map.
    #[must_use]
    pub fn contains(&self, participant: ParticipantId) -> bool {
        participant.index() < self.data.len()
    }

    /// Get a participant's entry, if present.
    #[must_use]
    pub fn get(&self, participant: ParticipantId) -> Option<&T> {
        self.data.get(participant.index())
    }

    /// Get a mutable reference to a participant's entry, if present.
    pub fn get_mut(&mut self, participant: ParticipantId) -> Option<&mut T> {
        self.data.get_mut(participant.index())
    }

    /// Iterate over `(ParticipantId, &T)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (ParticipantId::from_index(i), v))
    }

    /// Iterate over `(ParticipantId, &mut T)` pairs in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ParticipantId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (ParticipantId::from_index(i), v))
    }

    /// Iterate over all participant IDs.
    pub fn participant_ids(&self) -> impl Iterator<Item = ParticipantId> {
        ParticipantId::all(self.data.len())
    }
}

impl<T> Index<ParticipantId> for ParticipantMap<T> {
    type Output = T;

    fn index(&self, participant: ParticipantId) -> &Self::Output {
        &self.data[participant.index()]
    }
}

impl<T> IndexMut<ParticipantId> for ParticipantMap<T> {
    fn index_mut(&mut self, participant: ParticipantId) -> &mut Self::Output {
        &mut self.data[participant.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_basics() {
        let p1 = ParticipantId::new(1);
        let p2 = ParticipantId::new(2);

        assert_eq!(p1.index(), 0);
        assert_eq!(p2.index(), 1);
        assert_eq!(p2.get(), 2);
        assert_eq!(ParticipantId::from_index(1), p2);
        assert_eq!(format!("{}", p1), "Player 1");
    }

    #[test]
    #[should_panic(expected = "Participant ids start at 1")]
    fn test_participant_id_zero() {
        let _ = ParticipantId::new(0);
    }

    #[test]
    fn test_participant_next_wraps() {
        let p1 = ParticipantId::new(1);
        let p2 = ParticipantId::new(2);

        assert_eq!(p1.next(2), p2);
        assert_eq!(p2.next(2), p1);
        assert_eq!(p1.next(1), p1);
    }

    #[test]
    fn test_participant_map_new() {
        let map: ParticipantMap<u32> = ParticipantMap::new(3, |p| u32::from(p.get()) * 10);

        assert_eq!(map[ParticipantId::new(1)], 10);
        assert_eq!(map[ParticipantId::new(2)], 20);
        assert_eq!(map[ParticipantId::new(3)], 30);
    }

    #[test]
    fn test_participant_map_get_out_of_range() {
        let map: ParticipantMap<u32> = ParticipantMap::with_value(2, 0);

        assert!(map.contains(ParticipantId::new(2)));
        assert!(!map.contains(ParticipantId::new(3)));
        assert_eq!(map.get(ParticipantId::new(3)), None);
    }

    #[test]
    fn test_participant_map_iter() {
        let map: ParticipantMap<u8> = ParticipantMap::new(2, |p| p.get());

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(ParticipantId::new(1), &1), (ParticipantId::new(2), &2)]);
    }

    #[test]
    fn test_participant_map_serialization() {
        let map: ParticipantMap<u64> = ParticipantMap::new(2, |p| u64::from(p.get()) + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: ParticipantMap<u64> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 participant")]
    fn test_participant_map_zero_participants() {
        let _: ParticipantMap<u32> = ParticipantMap::with_value(0, 0);
    }
}
