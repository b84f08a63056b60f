use serde::{Deserialize, Serialize};

use crate::core::{ParticipantId, ParticipantMap};
use crate::eval::{AnswerSheet, RawInput};

/// Per-round answers for every participant. Cleared when a round opens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerStore {
    sheets: ParticipantMap<AnswerSheet>,
}

impl AnswerStore {
    #[must_use]
    pub fn new(participant_count: usize) -> Self {
        Self {
            sheets: ParticipantMap::with_default(participant_count),
        }
    }

    #[must_use]
    pub fn sheet(&self, participant: ParticipantId) -> Option<&AnswerSheet> {
        self.sheets.get(participant)
    }

    /// Record `value` at `position`, returning the previous value.
    pub fn record(
        &mut self,
        participant: ParticipantId,
        position: usize,
        value: RawInput,
    ) -> Option<RawInput> {
        self.sheets
            .get_mut(participant)
            .and_then(|sheet| sheet.insert(position, value))
    }

    /// Clear `position`, returning what it held.
    pub fn withdraw(&mut self, participant: ParticipantId, position: usize) -> Option<RawInput> {
        self.sheets
            .get_mut(participant)
            .and_then(|sheet| sheet.remove(position))
    }

    /// Drop every participant's answers.
    pub fn clear(&mut self) {
        for (_, sheet) in self.sheets.iter_mut() {
            sheet.clear();
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.iter().all(|(_, sheet)| sheet.is_empty())
    }
}
