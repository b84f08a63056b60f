use serde::{Deserialize, Serialize};

use super::state::{Lifecycle, RoundRecord};
use crate::core::ParticipantId;
use crate::eval::RawInput;

/// Notification sent to subscribers after each discrete change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The lifecycle changed. `round` is the round index after the change.
    Transition {
        from: Lifecycle,
        to: Lifecycle,
        round: u32,
    },
    /// A second passed on the open round.
    Tick { round: u32, remaining: u32 },
    AnswerRecorded {
        participant: ParticipantId,
        position: usize,
        value: RawInput,
    },
    AnswerWithdrawn {
        participant: ParticipantId,
        position: usize,
    },
    /// A round closed. Sent while the engine is `Evaluating`.
    RoundEvaluated(RoundRecord),
}

pub(crate) type Listener = Box<dyn FnMut(&SessionEvent)>;
