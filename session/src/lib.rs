#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative state of a single "find on map" round.
//!
//! The session owns no clock and no background work. Hosts deliver one
//! [`Command::Tick`] per elapsed second and every other player action as a
//! command; the session mutates itself synchronously and reports what
//! happened as [`Event`] values. A session is not internally synchronised:
//! callers must serialise access when sharing it across threads.

use heritage_map_core::{
    accuracy_percent, ArchaeologicalObject, Command, Event, FinishReason, LastAnswer, Operation,
    RegionId, SessionConfig, SessionError, SessionStatus,
};
use heritage_map_system_classifier::RegionClassifier;
use tracing::{debug, info};

/// Represents one play-through over a fixed object catalog.
#[derive(Debug)]
pub struct GameSession {
    catalog: Vec<ArchaeologicalObject>,
    classifier: RegionClassifier,
    config: SessionConfig,
    status: SessionStatus,
    current_index: usize,
    selected: Option<RegionId>,
    score: u32,
    correct_answers: u32,
    total_attempts: u32,
    time_remaining: u32,
    last_answer: Option<LastAnswer>,
}

impl GameSession {
    /// Creates a session over the catalog using the default region classifier.
    #[must_use]
    pub fn new(catalog: Vec<ArchaeologicalObject>, config: SessionConfig) -> Self {
        Self::with_classifier(catalog, config, RegionClassifier::default())
    }

    /// Creates a session that resolves answers with the provided classifier.
    #[must_use]
    pub fn with_classifier(
        catalog: Vec<ArchaeologicalObject>,
        config: SessionConfig,
        classifier: RegionClassifier,
    ) -> Self {
        Self {
            catalog,
            classifier,
            config,
            status: SessionStatus::NotStarted,
            current_index: 0,
            selected: None,
            score: 0,
            correct_answers: 0,
            total_attempts: 0,
            time_remaining: config.round_seconds,
            last_answer: None,
        }
    }

    fn reject(&self, operation: Operation) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            status: self.status,
        }
    }

    fn start_round(&mut self, out_events: &mut Vec<Event>) {
        self.current_index = 0;
        self.selected = None;
        self.score = 0;
        self.correct_answers = 0;
        self.total_attempts = 0;
        self.last_answer = None;
        self.time_remaining = self.config.round_seconds;
        self.status = SessionStatus::Running;

        out_events.push(Event::RoundStarted {
            total_objects: self.catalog.len(),
            time_remaining: self.time_remaining,
        });

        if self.catalog.is_empty() {
            self.finish(FinishReason::EmptyCatalog, out_events);
            return;
        }
        if self.time_remaining == 0 {
            self.finish(FinishReason::TimeExpired, out_events);
            return;
        }

        self.present(out_events);
    }

    fn present(&mut self, out_events: &mut Vec<Event>) {
        if let Some(object) = self.catalog.get(self.current_index) {
            debug!(index = self.current_index, object = %object.id, "presenting object");
            out_events.push(Event::ObjectPresented {
                index: self.current_index,
                object: object.id.clone(),
            });
        }
    }

    fn finish(&mut self, reason: FinishReason, out_events: &mut Vec<Event>) {
        self.status = SessionStatus::Finished;
        self.selected = None;
        let accuracy = accuracy_percent(self.correct_answers, self.total_attempts);
        info!(?reason, score = self.score, accuracy, "round finished");
        out_events.push(Event::RoundFinished {
            reason,
            score: self.score,
            accuracy,
        });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.status != SessionStatus::Running {
            return;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        out_events.push(Event::TimeAdvanced {
            time_remaining: self.time_remaining,
        });

        if self.time_remaining == 0 {
            self.finish(FinishReason::TimeExpired, out_events);
        }
    }

    fn check_answer(&mut self, out_events: &mut Vec<Event>) -> Result<(), SessionError> {
        if self.status != SessionStatus::Running {
            return Err(self.reject(Operation::CheckAnswer));
        }
        let selected = self.selected.ok_or(SessionError::EmptySelection)?;
        let object = self
            .catalog
            .get(self.current_index)
            .ok_or(SessionError::InvalidTransition {
                operation: Operation::CheckAnswer,
                status: self.status,
            })?;

        let correct_region = self.classifier.classify(&object.region);
        let correct = selected == correct_region;
        self.total_attempts = self.total_attempts.saturating_add(1);

        let points_awarded = if correct {
            self.correct_answers = self.correct_answers.saturating_add(1);
            self.score = self.score.saturating_add(object.points);
            self.time_remaining = self
                .time_remaining
                .saturating_add(self.config.bonus_seconds);
            out_events.push(Event::AnswerCorrect {
                object: object.id.clone(),
                name: object.name.clone(),
                region: correct_region,
                points: object.points,
                bonus_seconds: self.config.bonus_seconds,
            });
            object.points
        } else {
            out_events.push(Event::AnswerIncorrect {
                object: object.id.clone(),
                selected,
                correct_region,
            });
            0
        };

        debug!(
            object = %object.id,
            %selected,
            %correct_region,
            correct,
            score = self.score,
            "answer checked"
        );

        self.last_answer = Some(LastAnswer {
            correct,
            selected,
            correct_region,
            points_awarded,
        });
        self.status = SessionStatus::AwaitingNext;
        Ok(())
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) -> Result<(), SessionError> {
        if self.status != SessionStatus::AwaitingNext {
            return Err(self.reject(Operation::Advance));
        }

        self.selected = None;
        self.last_answer = None;

        if self.current_index + 1 < self.catalog.len() {
            self.current_index += 1;
            self.status = SessionStatus::Running;
            self.present(out_events);
        } else {
            self.finish(FinishReason::CatalogExhausted, out_events);
        }
        Ok(())
    }
}

/// Applies the provided command to the session, mutating state deterministically.
///
/// Rejected commands leave the session untouched and emit no events.
/// [`Command::Tick`] outside a running round is ignored, since host timers
/// may fire after a round already ended.
pub fn apply(
    session: &mut GameSession,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), SessionError> {
    match command {
        Command::StartRound => match session.status {
            SessionStatus::NotStarted | SessionStatus::Finished => {
                session.start_round(out_events);
                Ok(())
            }
            _ => Err(session.reject(Operation::Start)),
        },
        Command::Reset => match session.status {
            SessionStatus::Finished => {
                session.start_round(out_events);
                Ok(())
            }
            _ => Err(session.reject(Operation::Reset)),
        },
        Command::Tick => {
            session.tick(out_events);
            Ok(())
        }
        Command::SelectRegion { region } => {
            if session.status != SessionStatus::Running {
                return Err(session.reject(Operation::SelectRegion));
            }
            session.selected = Some(region);
            session.last_answer = None;
            out_events.push(Event::RegionSelected { region });
            Ok(())
        }
        Command::CheckAnswer => session.check_answer(out_events),
        Command::Advance => session.advance(out_events),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use heritage_map_core::{
        accuracy_percent, ArchaeologicalObject, LastAnswer, RegionId, SessionConfig,
        SessionStatus,
    };

    use super::GameSession;

    /// Current lifecycle status.
    #[must_use]
    pub fn status(session: &GameSession) -> SessionStatus {
        session.status
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(session: &GameSession) -> SessionConfig {
        session.config
    }

    /// Object awaiting an answer or showing its result, if a round is in progress.
    #[must_use]
    pub fn current_object(session: &GameSession) -> Option<&ArchaeologicalObject> {
        match session.status {
            SessionStatus::Running | SessionStatus::AwaitingNext => {
                session.catalog.get(session.current_index)
            }
            SessionStatus::NotStarted | SessionStatus::Finished => None,
        }
    }

    /// Rounded percentage of correct answers, zero before the first attempt.
    #[must_use]
    pub fn accuracy(session: &GameSession) -> u32 {
        accuracy_percent(session.correct_answers, session.total_attempts)
    }

    /// Captures everything a host needs to render the session.
    #[must_use]
    pub fn snapshot(session: &GameSession) -> SessionSnapshot {
        SessionSnapshot {
            status: session.status,
            score: session.score,
            correct_answers: session.correct_answers,
            total_attempts: session.total_attempts,
            accuracy: accuracy(session),
            time_remaining: session.time_remaining,
            current_object_index: session.current_index,
            total_objects: session.catalog.len(),
            selected_region: session.selected,
            last_answer: session.last_answer,
        }
    }

    /// Immutable view of the session after an operation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SessionSnapshot {
        /// Lifecycle status.
        pub status: SessionStatus,
        /// Points earned in the round.
        pub score: u32,
        /// Number of correct answers.
        pub correct_answers: u32,
        /// Number of checked answers.
        pub total_attempts: u32,
        /// Rounded percentage of correct answers.
        pub accuracy: u32,
        /// Seconds left on the clock.
        pub time_remaining: u32,
        /// Position of the current object within the catalog.
        pub current_object_index: usize,
        /// Number of objects in the round.
        pub total_objects: usize,
        /// Region guessed for the current object.
        pub selected_region: Option<RegionId>,
        /// Result of the last answer while awaiting the next object.
        pub last_answer: Option<LastAnswer>,
    }
}
