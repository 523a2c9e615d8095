#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Score reporting boundary between the session and the external points ledger.
//!
//! The in-session score always advances; the ledger is a best-effort mirror.
//! A failing ledger is logged and counted here and never reaches the session.

use heritage_map_core::{AwardRequest, Event, GameVariant};
use tracing::{debug, warn};

/// Failures a points ledger may report.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ledger cannot be reached or has shut down.
    #[error("points ledger is unavailable: {0}")]
    Unavailable(String),
}

/// External system of record for user point totals.
///
/// Implementations must return promptly; slow persistence belongs behind a
/// queue owned by the implementation.
pub trait PointsLedger {
    /// Hands an award to the ledger.
    fn record(&mut self, award: &AwardRequest) -> Result<(), LedgerError>;
}

/// Collects awards in memory.
impl PointsLedger for Vec<AwardRequest> {
    fn record(&mut self, award: &AwardRequest) -> Result<(), LedgerError> {
        self.push(award.clone());
        Ok(())
    }
}

/// Builds the award for a correctly answered object.
#[must_use]
pub fn award_for(variant: GameVariant, name: &str, points: u32) -> AwardRequest {
    let description = match variant {
        GameVariant::Map => format!("Found \"{name}\" on the map"),
        GameVariant::Quiz => format!("Answered the quiz question about \"{name}\""),
    };
    AwardRequest {
        action_type: variant.action_type().to_owned(),
        description,
        points,
    }
}

/// Translates correct answers into ledger awards.
#[derive(Debug)]
pub struct ScoreReporter {
    variant: GameVariant,
    submitted: u64,
    failed: u64,
}

impl ScoreReporter {
    /// Creates a reporter tagging awards with the variant's action type.
    #[must_use]
    pub const fn new(variant: GameVariant) -> Self {
        Self {
            variant,
            submitted: 0,
            failed: 0,
        }
    }

    /// Emits one award per [`Event::AnswerCorrect`] in the batch.
    pub fn handle(&self, events: &[Event], out: &mut Vec<AwardRequest>) {
        for event in events {
            if let Event::AnswerCorrect { name, points, .. } = event {
                out.push(award_for(self.variant, name, *points));
            }
        }
    }

    /// Forwards the batch's awards to the ledger without propagating failures.
    pub fn report<L>(&mut self, events: &[Event], ledger: &mut L)
    where
        L: PointsLedger + ?Sized,
    {
        let mut awards = Vec::new();
        self.handle(events, &mut awards);

        for award in &awards {
            match ledger.record(award) {
                Ok(()) => {
                    self.submitted = self.submitted.saturating_add(1);
                    debug!(
                        action_type = %award.action_type,
                        points = award.points,
                        "award forwarded to ledger"
                    );
                }
                Err(error) => {
                    self.failed = self.failed.saturating_add(1);
                    warn!(%error, points = award.points, "dropping award after ledger failure");
                }
            }
        }
    }

    /// Number of awards the ledger accepted.
    #[must_use]
    pub const fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Number of awards lost to ledger failures.
    #[must_use]
    pub const fn failed(&self) -> u64 {
        self.failed
    }
}
