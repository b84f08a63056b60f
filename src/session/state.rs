//! Session state: lifecycle, the session aggregate and closed-round records.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::answers::AnswerStore;
use crate::core::{ParticipantId, ParticipantMap, PuzzleRng, SessionConfig, TurnPolicy};
use crate::eval::{evaluate, Evaluation};
use crate::puzzle::Puzzle;
use crate::score::Scoreboard;

/// Engine lifecycle. Exactly one state holds at any time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Lifecycle {
    /// Nothing started yet.
    #[default]
    #[display("idle")]
    Idle,
    /// A round is open and its clock is running.
    #[display("playing")]
    Playing,
    /// Transient: the round just closed and is being scored.
    #[display("evaluating")]
    Evaluating,
    /// Round budget exhausted.
    #[display("finished")]
    Finished,
}

/// A closed round. Never changes once recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round index.
    pub index: u32,
    /// The round's puzzle, ground truth included.
    pub puzzle: Puzzle,
    /// One evaluation per participant who answered this round.
    pub evaluations: Vec<(ParticipantId, Evaluation)>,
    /// Cumulative scores after this round was folded in.
    pub scores_after: ParticipantMap<u64>,
}

impl RoundRecord {
    /// Evaluation of one participant's answers, if they answered this round.
    #[must_use]
    pub fn evaluation(&self, participant: ParticipantId) -> Option<&Evaluation> {
        self.evaluations
            .iter()
            .find(|(p, _)| *p == participant)
            .map(|(_, evaluation)| evaluation)
    }
}

/// Everything a started session owns.
///
/// Created by `RoundEngine::start` and replaced by the next `start`.
/// The open round's puzzle stays in place after the last round closes so a
/// finished session can still show it with its ground truth.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: SessionConfig,
    round: u32,
    turn: ParticipantId,
    remaining: u32,
    scores: Scoreboard,
    answers: AnswerStore,
    puzzle: Puzzle,
    history: Vector<RoundRecord>,
    winner: Option<ParticipantId>,
    rng: PuzzleRng,
}

impl GameSession {
    pub(crate) fn new(config: SessionConfig, puzzle: Puzzle, rng: PuzzleRng) -> Self {
        let count = config.participant_count;
        Self {
            round: 1,
            turn: ParticipantId::new(1),
            remaining: config.round_seconds,
            scores: Scoreboard::new(count),
            answers: AnswerStore::new(count),
            puzzle,
            history: Vector::new(),
            winner: None,
            rng,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// 1-based index of the current (or, once finished, last) round.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Participant whose turn it is under round-robin play.
    #[must_use]
    pub fn turn(&self) -> ParticipantId {
        self.turn
    }

    /// Seconds left on the open round, as of the last delivered tick.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn scores(&self) -> &ParticipantMap<u64> {
        self.scores.scores()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    #[must_use]
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Closed rounds, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<RoundRecord> {
        &self.history
    }

    #[must_use]
    pub fn winner(&self) -> Option<ParticipantId> {
        self.winner
    }

    /// Seed the session's puzzles are drawn from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Whether the round budget is used up.
    #[must_use]
    pub fn is_last_round(&self) -> bool {
        self.round >= self.config.round_budget
    }

    /// Participants answering the open round.
    #[must_use]
    pub fn active_participants(&self) -> SmallVec<[ParticipantId; 4]> {
        match self.config.turn_policy {
            TurnPolicy::RoundRobin => SmallVec::from_elem(self.turn, 1),
            TurnPolicy::Simultaneous => self.scores().participant_ids().collect(),
        }
    }

    #[must_use]
    pub fn is_active(&self, participant: ParticipantId) -> bool {
        match self.config.turn_policy {
            TurnPolicy::RoundRobin => participant == self.turn,
            TurnPolicy::Simultaneous => self.scores().contains(participant),
        }
    }

    pub(crate) fn answers_mut(&mut self) -> &mut AnswerStore {
        &mut self.answers
    }

    pub(crate) fn rng_mut(&mut self) -> &mut PuzzleRng {
        &mut self.rng
    }

    pub(crate) fn set_remaining(&mut self, remaining: u32) {
        self.remaining = remaining;
    }

    /// Evaluate the open round, fold the scores and append the record.
    pub(crate) fn close_round(&mut self) -> RoundRecord {
        let mut evaluations = Vec::new();
        for participant in self.active_participants() {
            let evaluation = match self.answers.sheet(participant) {
                Some(sheet) => evaluate(&self.puzzle, sheet),
                None => continue,
            };
            self.scores.record(participant, &evaluation);
            evaluations.push((participant, evaluation));
        }

        let record = RoundRecord {
            index: self.round,
            puzzle: self.puzzle.clone(),
            evaluations,
            scores_after: self.scores.scores().clone(),
        };
        self.history.push_back(record.clone());
        record
    }

    /// Compute and store the winner of a finished game.
    pub(crate) fn settle(&mut self) -> Option<ParticipantId> {
        self.winner = self.scores.winner(self.config.kind().evaluation_mode());
        self.winner
    }

    /// Open the next round with a fresh puzzle.
    pub(crate) fn open_next_round(&mut self, puzzle: Puzzle) {
        self.round += 1;
        if self.config.turn_policy == TurnPolicy::RoundRobin {
            self.turn = self.turn.next(self.config.participant_count);
        }
        self.puzzle = puzzle;
        self.answers.clear();
        self.remaining = self.config.round_seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PuzzleConfig, PuzzleKind};

    fn duel() -> GameSession {
        let config = SessionConfig::new(PuzzleConfig::for_kind(PuzzleKind::AngleEstimate))
            .with_participants(2)
            .with_rounds(3);
        GameSession::new(config, Puzzle::angle(90), PuzzleRng::new(7))
    }

    #[test]
    fn test_lifecycle_display() {
        assert_eq!(Lifecycle::default(), Lifecycle::Idle);
        assert_eq!(Lifecycle::Evaluating.to_string(), "evaluating");
    }

    #[test]
    fn test_round_robin_turns() {
        let mut session = duel();
        let p1 = ParticipantId::new(1);
        let p2 = ParticipantId::new(2);

        assert_eq!(session.active_participants().as_slice(), &[p1]);
        assert!(session.is_active(p1));
        assert!(!session.is_active(p2));

        session.open_next_round(Puzzle::angle(10));
        assert_eq!(session.round(), 2);
        assert_eq!(session.turn(), p2);

        session.open_next_round(Puzzle::angle(20));
        assert_eq!(session.turn(), p1);
        assert!(session.is_last_round());
    }

    #[test]
    fn test_simultaneous_everyone_active() {
        let config = SessionConfig::new(PuzzleConfig::for_kind(PuzzleKind::TruthTable))
            .with_participants(3)
            .with_turn_policy(TurnPolicy::Simultaneous);
        let mut session = GameSession::new(config, Puzzle::angle(1), PuzzleRng::new(0));

        assert_eq!(session.active_participants().len(), 3);
        assert!(session.is_active(ParticipantId::new(3)));
        assert!(!session.is_active(ParticipantId::new(4)));

        session.open_next_round(Puzzle::angle(2));
        assert_eq!(session.turn(), ParticipantId::new(1));
    }

    #[test]
    fn test_close_round_records_and_folds() {
        let mut session = duel();
        let p1 = ParticipantId::new(1);
        session.answers_mut().record(p1, 0, "80".into());

        let record = session.close_round();

        assert_eq!(record.index, 1);
        assert_eq!(record.evaluation(p1).and_then(Evaluation::difference), Some(10));
        assert!(record.evaluation(ParticipantId::new(2)).is_none());
        assert_eq!(record.scores_after[p1], 10);
        assert_eq!(session.scores()[p1], 10);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_open_next_round_clears_answers() {
        let mut session = duel();
        session.answers_mut().record(ParticipantId::new(1), 0, "5".into());
        session.set_remaining(3);

        session.open_next_round(Puzzle::angle(33));

        assert!(session.answers().is_empty());
        assert_eq!(session.remaining(), session.config().round_seconds);
        assert_eq!(session.puzzle(), &Puzzle::angle(33));
    }
}
