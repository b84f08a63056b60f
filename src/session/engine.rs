//! The round state machine.
//!
//! ```text
//! idle ──start──▶ playing ──expire/close──▶ evaluating ──▶ playing
//!                    ▲                           │
//!   finished ──start─┘                           └──▶ finished
//! ```
//!
//! `evaluating` is transient: it is entered and left inside the call that
//! closed the round, so callers only ever observe it through
//! `SessionEvent`s.

use std::time::Duration;

use im::Vector;
use smallvec::SmallVec;
use tracing::{debug, info, instrument, trace};

use super::events::{Listener, SessionEvent};
use super::state::{GameSession, Lifecycle, RoundRecord};
use crate::clock::{ClockEvent, ClockHandle, ManualClock, RoundClock};
use crate::core::{EngineError, ParticipantId, ParticipantMap, PuzzleRng, SessionConfig};
use crate::eval::{AnswerSheet, Evaluation, RawInput};
use crate::puzzle::{GroundTruth, PuzzlePayload, PuzzleSource, PuzzleView, RandomPuzzles};

/// Timed round controller.
///
/// Owns the session, the round clock and the puzzle source. All mutation
/// of the session goes through here.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use timed_rounds::core::ParticipantId;
/// use timed_rounds::games;
/// use timed_rounds::session::{Lifecycle, RoundEngine};
///
/// let mut engine: RoundEngine = RoundEngine::default();
/// engine.start(games::angle_duel().with_seed(42)).unwrap();
///
/// engine.submit_answer(ParticipantId::new(1), 0, "90").unwrap();
/// engine.advance(Duration::from_secs(15));
///
/// assert_eq!(engine.lifecycle(), Lifecycle::Playing);
/// assert_eq!(engine.round(), 2);
/// ```
pub struct RoundEngine<C = ManualClock, S = RandomPuzzles> {
    clock: C,
    source: S,
    lifecycle: Lifecycle,
    session: Option<GameSession>,
    handle: Option<ClockHandle>,
    listeners: Vec<Listener>,
}

impl Default for RoundEngine {
    fn default() -> Self {
        Self::new(ManualClock::new())
    }
}

impl<C: RoundClock> RoundEngine<C> {
    /// Engine generating random puzzles.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self::with_source(clock, RandomPuzzles)
    }
}

impl<C: RoundClock, S: PuzzleSource> RoundEngine<C, S> {
    /// Engine drawing puzzles from `source`.
    #[must_use]
    pub fn with_source(clock: C, source: S) -> Self {
        Self {
            clock,
            source,
            lifecycle: Lifecycle::Idle,
            session: None,
            handle: None,
            listeners: Vec::new(),
        }
    }

    /// Register a callback for every `SessionEvent`.
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // === Operations ===

    /// Start a new session, replacing any finished one.
    ///
    /// Valid from `idle` or `finished`. Scores reset to zero, the first
    /// puzzle is drawn and the clock starts.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` while a session is running, `Config` if the
    /// configuration is invalid or the puzzle source cannot serve it.
    #[instrument(skip(self, config), fields(kind = %config.kind()))]
    pub fn start(&mut self, config: SessionConfig) -> Result<(), EngineError> {
        if !matches!(self.lifecycle, Lifecycle::Idle | Lifecycle::Finished) {
            return self.reject(EngineError::InvalidTransition {
                operation: "start",
                state: self.lifecycle,
            });
        }
        if let Err(err) = config
            .validate()
            .and_then(|()| self.source.check(&config.puzzle))
        {
            return self.reject(err.into());
        }

        self.cancel_clock();
        self.source.rewind();
        let mut rng = config.seed.map_or_else(PuzzleRng::from_entropy, PuzzleRng::new);
        let puzzle = self.source.next_puzzle(&config.puzzle, &mut rng);

        info!(
            seed = rng.seed(),
            participants = config.participant_count,
            rounds = config.round_budget,
            seconds = config.round_seconds,
            "session started"
        );
        self.session = Some(GameSession::new(config, puzzle, rng));
        self.start_clock();
        self.set_lifecycle(Lifecycle::Playing);
        Ok(())
    }

    /// Record an answer for the open round.
    ///
    /// Re-submitting a position overwrites it, except for ordering puzzles:
    /// there a filled slot must be withdrawn first and each symbol may be
    /// placed once.
    ///
    /// # Errors
    ///
    /// Any rejection leaves the engine unchanged: wrong lifecycle, unknown
    /// participant, not their turn, position out of range, or a placement
    /// the ordering rules forbid.
    #[instrument(skip(self, value))]
    pub fn submit_answer(
        &mut self,
        participant: ParticipantId,
        position: usize,
        value: impl Into<RawInput>,
    ) -> Result<(), EngineError> {
        let value = value.into();
        let checked = self
            .open_session("submit_answer", participant, position)
            .and_then(|session| check_placement(session, participant, position, &value));
        if let Err(err) = checked {
            return self.reject(err);
        }

        if let Some(session) = self.session.as_mut() {
            session.answers_mut().record(participant, position, value.clone());
        }
        debug!(%participant, position, ?value, "answer recorded");
        self.emit(SessionEvent::AnswerRecorded {
            participant,
            position,
            value,
        });
        Ok(())
    }

    /// Clear a recorded answer, returning it.
    ///
    /// # Errors
    ///
    /// Same checks as [`submit_answer`](Self::submit_answer), minus the
    /// placement rules.
    #[instrument(skip(self))]
    pub fn withdraw_answer(
        &mut self,
        participant: ParticipantId,
        position: usize,
    ) -> Result<Option<RawInput>, EngineError> {
        if let Err(err) = self.open_session("withdraw_answer", participant, position) {
            return self.reject(err);
        }

        let removed = self
            .session
            .as_mut()
            .and_then(|session| session.answers_mut().withdraw(participant, position));
        if removed.is_some() {
            debug!(%participant, position, "answer withdrawn");
            self.emit(SessionEvent::AnswerWithdrawn {
                participant,
                position,
            });
        }
        Ok(removed)
    }

    /// Close the open round before its clock runs out.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless `playing`.
    #[instrument(skip(self))]
    pub fn close_round(&mut self) -> Result<(), EngineError> {
        if self.lifecycle != Lifecycle::Playing {
            return self.reject(EngineError::InvalidTransition {
                operation: "close_round",
                state: self.lifecycle,
            });
        }
        self.cancel_clock();
        self.finish_round();
        Ok(())
    }

    /// Feed elapsed time to the clock and process what it produced.
    ///
    /// Time past a round's expiry is not carried into the next round.
    pub fn advance(&mut self, elapsed: Duration) {
        self.clock.advance(elapsed);
        self.pump();
    }

    /// Process pending clock events. Events from cancelled countdowns are
    /// dropped.
    pub fn pump(&mut self) {
        for event in self.clock.poll() {
            if self.handle != Some(event.handle()) {
                trace!(handle = %event.handle(), "stale clock event ignored");
                continue;
            }
            match event {
                ClockEvent::Tick { remaining, .. } => {
                    let Some(session) = self.session.as_mut() else {
                        continue;
                    };
                    session.set_remaining(remaining);
                    let round = session.round();
                    trace!(round, remaining, "tick");
                    self.emit(SessionEvent::Tick { round, remaining });
                }
                ClockEvent::Expired { .. } => {
                    self.handle = None;
                    debug!("round clock expired");
                    self.finish_round();
                }
            }
        }
    }

    // === Observers ===

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Current round index, 0 before the first `start`.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.session.as_ref().map_or(0, GameSession::round)
    }

    /// Seconds left on the open round.
    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.playing().map(GameSession::remaining)
    }

    /// The current puzzle without its ground truth.
    #[must_use]
    pub fn puzzle(&self) -> Option<PuzzleView<'_>> {
        self.session.as_ref().map(|s| s.puzzle().view())
    }

    /// Ground truth of the current puzzle, once it has been evaluated.
    #[must_use]
    pub fn ground_truth(&self) -> Option<&GroundTruth> {
        self.evaluated().map(|s| s.puzzle().ground_truth())
    }

    /// Answers recorded so far in the open round.
    #[must_use]
    pub fn answers(&self, participant: ParticipantId) -> Option<&AnswerSheet> {
        self.session.as_ref()?.answers().sheet(participant)
    }

    /// A participant's evaluation for the last closed round, once
    /// evaluated.
    #[must_use]
    pub fn evaluation(&self, participant: ParticipantId) -> Option<&Evaluation> {
        self.evaluated()?.history().last()?.evaluation(participant)
    }

    /// The most recently closed round, at any time.
    #[must_use]
    pub fn last_round(&self) -> Option<&RoundRecord> {
        self.session.as_ref()?.history().last()
    }

    #[must_use]
    pub fn scores(&self) -> Option<&ParticipantMap<u64>> {
        self.session.as_ref().map(GameSession::scores)
    }

    #[must_use]
    pub fn winner(&self) -> Option<ParticipantId> {
        self.session.as_ref()?.winner()
    }

    /// Participants who may answer right now.
    #[must_use]
    pub fn active_participants(&self) -> SmallVec<[ParticipantId; 4]> {
        self.playing()
            .map(GameSession::active_participants)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn history(&self) -> Vector<RoundRecord> {
        self.session
            .as_ref()
            .map(|s| s.history().clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    // === Internals ===

    fn playing(&self) -> Option<&GameSession> {
        match self.lifecycle {
            Lifecycle::Playing => self.session.as_ref(),
            _ => None,
        }
    }

    fn evaluated(&self) -> Option<&GameSession> {
        match self.lifecycle {
            Lifecycle::Evaluating | Lifecycle::Finished => self.session.as_ref(),
            _ => None,
        }
    }

    /// The open session, if `participant` may answer at `position`.
    fn open_session(
        &self,
        operation: &'static str,
        participant: ParticipantId,
        position: usize,
    ) -> Result<&GameSession, EngineError> {
        let session = self.playing().ok_or(EngineError::InvalidTransition {
            operation,
            state: self.lifecycle,
        })?;
        if !session.scores().contains(participant) {
            return Err(EngineError::UnknownParticipant { participant });
        }
        if !session.is_active(participant) {
            return Err(EngineError::NotYourTurn { participant });
        }
        let slots = session.puzzle().answer_slots();
        if position >= slots {
            return Err(EngineError::PositionOutOfRange { position, slots });
        }
        Ok(session)
    }

    /// Evaluate, fold, then either open the next round or finish.
    fn finish_round(&mut self) {
        self.set_lifecycle(Lifecycle::Evaluating);

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let record = session.close_round();
        info!(round = record.index, scores = ?record.scores_after, "round closed");
        self.emit(SessionEvent::RoundEvaluated(record));

        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.is_last_round() {
            let winner = session.settle();
            info!(?winner, "game finished");
            self.set_lifecycle(Lifecycle::Finished);
            return;
        }

        let puzzle_config = session.config().puzzle.clone();
        let puzzle = self.source.next_puzzle(&puzzle_config, session.rng_mut());
        session.open_next_round(puzzle);
        self.start_clock();
        self.set_lifecycle(Lifecycle::Playing);
    }

    fn start_clock(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let seconds = session.config().round_seconds;
        let round = session.round();
        let handle = self.clock.start(seconds);
        debug!(%handle, round, seconds, "round clock started");
        self.handle = Some(handle);
    }

    fn cancel_clock(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.clock.cancel(handle);
            debug!(%handle, "round clock cancelled");
        }
    }

    fn set_lifecycle(&mut self, to: Lifecycle) {
        let from = std::mem::replace(&mut self.lifecycle, to);
        let round = self.round();
        self.emit(SessionEvent::Transition { from, to, round });
    }

    fn emit(&mut self, event: SessionEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn reject<T>(&self, err: EngineError) -> Result<T, EngineError> {
        debug!(%err, state = %self.lifecycle, "operation rejected");
        Err(err)
    }
}

/// Ordering puzzles fill each slot once, with a symbol from the puzzle not
/// yet placed elsewhere.
fn check_placement(
    session: &GameSession,
    participant: ParticipantId,
    position: usize,
    value: &RawInput,
) -> Result<(), EngineError> {
    let PuzzlePayload::Symbols { presentation } = session.puzzle().payload() else {
        return Ok(());
    };
    let Some(sheet) = session.answers().sheet(participant) else {
        return Ok(());
    };
    if sheet.answered(position).is_some() {
        return Err(EngineError::SlotOccupied { position });
    }
    match value.as_symbol() {
        Some(symbol) if presentation.contains(&symbol) && !sheet.holds_symbol(symbol) => Ok(()),
        _ => Err(EngineError::SymbolUnavailable {
            symbol: value.to_string(),
        }),
    }
}

impl<C: std::fmt::Debug, S: std::fmt::Debug> std::fmt::Debug for RoundEngine<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundEngine")
            .field("clock", &self.clock)
            .field("source", &self.source)
            .field("lifecycle", &self.lifecycle)
            .field("session", &self.session)
            .field("handle", &self.handle)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::{PuzzleConfig, PuzzleKind, TurnPolicy};
    use crate::eval::RoundOutcome;
    use crate::puzzle::{FixedPuzzles, Puzzle};

    fn p(id: u8) -> ParticipantId {
        ParticipantId::new(id)
    }

    fn engine() -> RoundEngine {
        RoundEngine::default()
    }

    fn scripted(puzzles: Vec<Puzzle>) -> RoundEngine<ManualClock, FixedPuzzles> {
        RoundEngine::with_source(ManualClock::new(), FixedPuzzles::new(puzzles))
    }

    fn config(kind: PuzzleKind) -> SessionConfig {
        SessionConfig::new(PuzzleConfig::for_kind(kind)).with_seed(1)
    }

    #[test]
    fn test_start_enters_playing() {
        let mut engine = engine();
        assert_eq!(engine.lifecycle(), Lifecycle::Idle);
        assert_eq!(engine.round(), 0);

        engine.start(config(PuzzleKind::TallerNeighbors)).unwrap();

        assert_eq!(engine.lifecycle(), Lifecycle::Playing);
        assert_eq!(engine.round(), 1);
        assert_eq!(engine.remaining_seconds(), Some(30));
        assert_eq!(engine.puzzle().map(|v| v.answer_slots()), Some(6));
        assert!(engine.ground_truth().is_none());
        assert_eq!(engine.scores().map(|s| s[p(1)]), Some(0));
    }

    #[test]
    fn test_start_rejected_while_playing() {
        let mut engine = engine();
        engine.start(config(PuzzleKind::AngleEstimate)).unwrap();

        let err = engine.start(config(PuzzleKind::AngleEstimate)).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidTransition {
                operation: "start",
                state: Lifecycle::Playing
            }
        );
        assert_eq!(engine.lifecycle(), Lifecycle::Playing);
    }

    #[test]
    fn test_start_rejects_bad_config() {
        let mut engine = engine();
        let bad = config(PuzzleKind::NumberValley).with_rounds(0);

        assert!(matches!(engine.start(bad), Err(EngineError::Config(_))));
        assert_eq!(engine.lifecycle(), Lifecycle::Idle);
        assert!(engine.session().is_none());
    }

    #[test]
    fn test_submit_while_idle_is_rejected() {
        let mut engine = engine();
        let err = engine.submit_answer(p(1), 0, "5").unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidTransition {
                operation: "submit_answer",
                state: Lifecycle::Idle
            }
        );
    }

    #[test]
    fn test_submit_checks_turn_and_position() {
        let mut engine = engine();
        engine
            .start(config(PuzzleKind::AngleEstimate).with_participants(2))
            .unwrap();

        assert_eq!(
            engine.submit_answer(p(2), 0, "5"),
            Err(EngineError::NotYourTurn { participant: p(2) })
        );
        assert_eq!(
            engine.submit_answer(p(3), 0, "5"),
            Err(EngineError::UnknownParticipant { participant: p(3) })
        );
        assert_eq!(
            engine.submit_answer(p(1), 1, "5"),
            Err(EngineError::PositionOutOfRange { position: 1, slots: 1 })
        );
        assert!(engine.answers(p(1)).is_some_and(AnswerSheet::is_empty));
    }

    #[test]
    fn test_expiry_scores_and_advances_turn() {
        let mut engine = scripted(vec![Puzzle::angle(90), Puzzle::angle(45)]);
        engine
            .start(config(PuzzleKind::AngleEstimate).with_participants(2).with_rounds(2))
            .unwrap();

        engine.submit_answer(p(1), 0, "80").unwrap();
        engine.advance(Duration::from_secs(30));

        assert_eq!(engine.round(), 2);
        assert_eq!(engine.active_participants().as_slice(), &[p(2)]);
        assert_eq!(engine.scores().map(|s| s[p(1)]), Some(10));
        assert!(engine.answers(p(1)).is_some_and(AnswerSheet::is_empty));
        assert!(engine.evaluation(p(1)).is_none(), "hidden while playing");
        assert_eq!(engine.last_round().map(|r| r.index), Some(1));

        engine.close_round().unwrap();

        assert_eq!(engine.lifecycle(), Lifecycle::Finished);
        assert_eq!(engine.scores().map(|s| s[p(2)]), Some(45));
        assert_eq!(engine.winner(), Some(p(1)));
        assert_eq!(engine.ground_truth(), Some(&GroundTruth::Scalar(45)));
        assert_eq!(engine.evaluation(p(2)).and_then(Evaluation::difference), Some(45));
        assert!(engine.remaining_seconds().is_none());
        assert!(engine.active_participants().is_empty());
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_ticks_update_remaining() {
        let mut engine = engine();
        engine
            .start(config(PuzzleKind::NumberValley).with_round_seconds(20))
            .unwrap();

        engine.advance(Duration::from_millis(2500));
        assert_eq!(engine.remaining_seconds(), Some(18));

        engine.advance(Duration::from_millis(17_500));
        assert_eq!(engine.lifecycle(), Lifecycle::Finished);
        assert_eq!(engine.winner(), None);
    }

    #[test]
    fn test_close_round_requires_playing() {
        let mut engine = engine();
        assert!(matches!(
            engine.close_round(),
            Err(EngineError::InvalidTransition { operation: "close_round", .. })
        ));
    }

    #[test]
    fn test_restart_after_finish_resets() {
        let mut engine = scripted(vec![Puzzle::angle(60)]);
        let cfg = config(PuzzleKind::AngleEstimate);

        engine.start(cfg.clone()).unwrap();
        engine.close_round().unwrap();
        assert_eq!(engine.scores().map(|s| s[p(1)]), Some(60));

        engine.start(cfg).unwrap();
        assert_eq!(engine.lifecycle(), Lifecycle::Playing);
        assert_eq!(engine.round(), 1);
        assert_eq!(engine.scores().map(|s| s[p(1)]), Some(0));
        assert!(engine.history().is_empty());
        assert_eq!(engine.winner(), None);
    }

    #[test]
    fn test_withdraw_answer() {
        let mut engine = engine();
        engine.start(config(PuzzleKind::TruthTable)).unwrap();

        engine.submit_answer(p(1), 3, true).unwrap();
        assert_eq!(engine.withdraw_answer(p(1), 3), Ok(Some(RawInput::Flag(true))));
        assert_eq!(engine.withdraw_answer(p(1), 3), Ok(None));
        assert!(matches!(
            engine.withdraw_answer(p(1), 16),
            Err(EngineError::PositionOutOfRange { .. })
        ));
    }

    #[test]
    fn test_ordering_placement_rules() {
        let mut engine = scripted(vec![Puzzle::alphabet_order(vec!['M', 'C', 'Q'])]);
        engine.start(config(PuzzleKind::AlphabetOrder)).unwrap();

        engine.submit_answer(p(1), 0, 'c').unwrap();
        assert_eq!(
            engine.submit_answer(p(1), 0, 'M'),
            Err(EngineError::SlotOccupied { position: 0 })
        );
        assert_eq!(
            engine.submit_answer(p(1), 1, "C"),
            Err(EngineError::SymbolUnavailable { symbol: "C".into() })
        );
        assert_eq!(
            engine.submit_answer(p(1), 1, "Z"),
            Err(EngineError::SymbolUnavailable { symbol: "Z".into() })
        );

        engine.submit_answer(p(1), 1, 'M').unwrap();
        engine.submit_answer(p(1), 2, 'Q').unwrap();
        engine.close_round().unwrap();

        assert_eq!(
            engine.evaluation(p(1)).and_then(Evaluation::outcome),
            Some(RoundOutcome::Win)
        );
        assert_eq!(engine.scores().map(|s| s[p(1)]), Some(1));
    }

    #[test]
    fn test_simultaneous_round_evaluates_everyone() {
        let mut engine = scripted(vec![Puzzle::taller_neighbors(vec![3, 1, 2])]);
        engine
            .start(
                config(PuzzleKind::TallerNeighbors)
                    .with_participants(2)
                    .with_turn_policy(TurnPolicy::Simultaneous),
            )
            .unwrap();

        // Truth: [0, 2, 0]
        engine.submit_answer(p(1), 1, 2).unwrap();
        engine.submit_answer(p(2), 1, 1).unwrap();
        engine.close_round().unwrap();

        let record = engine.last_round().unwrap();
        assert_eq!(record.evaluations.len(), 2);
        assert_eq!(record.scores_after[p(1)], 1);
        assert_eq!(record.scores_after[p(2)], 0);
    }

    #[test]
    fn test_events_in_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        let mut engine = scripted(vec![Puzzle::angle(10)]);
        engine.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        engine
            .start(config(PuzzleKind::AngleEstimate).with_round_seconds(2))
            .unwrap();
        engine.submit_answer(p(1), 0, 10).unwrap();
        engine.advance(Duration::from_secs(2));

        let events = events.borrow();
        let kinds: Vec<&str> = events
            .iter()
            .map(|e| match e {
                SessionEvent::Transition { .. } => "transition",
                SessionEvent::Tick { .. } => "tick",
                SessionEvent::AnswerRecorded { .. } => "recorded",
                SessionEvent::AnswerWithdrawn { .. } => "withdrawn",
                SessionEvent::RoundEvaluated(_) => "evaluated",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["transition", "recorded", "tick", "tick", "transition", "evaluated", "transition"]
        );
        assert_eq!(
            events.last(),
            Some(&SessionEvent::Transition {
                from: Lifecycle::Evaluating,
                to: Lifecycle::Finished,
                round: 1
            })
        );
    }
}
