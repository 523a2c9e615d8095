//! Interactive terminal round driven by a wall clock.

use std::{
    io::{BufRead, Write},
    time::{Duration, Instant},
};

use anyhow::Result;
use heritage_map_core::{Command, Event, RegionId, SessionStatus};
use heritage_map_session::{
    self as session,
    query::{self, SessionSnapshot},
    GameSession,
};
use heritage_map_system_scoring::{PointsLedger, ScoreReporter};

use crate::output::format_summary;

/// Source of whole elapsed seconds between polls.
pub(crate) trait SecondsClock {
    /// Returns the number of whole seconds since the previous call.
    fn elapsed_seconds(&mut self) -> u32;
}

/// Clock backed by [`Instant`], carrying sub-second remainders between polls.
#[derive(Debug)]
pub(crate) struct WallClock {
    last: Instant,
    carry: Duration,
}

impl WallClock {
    /// Starts measuring from now.
    pub(crate) fn start() -> Self {
        Self {
            last: Instant::now(),
            carry: Duration::ZERO,
        }
    }
}

impl SecondsClock for WallClock {
    fn elapsed_seconds(&mut self) -> u32 {
        let now = Instant::now();
        let total = now.duration_since(self.last) + self.carry;
        self.last = now;
        let whole = total.as_secs();
        self.carry = total - Duration::from_secs(whole);
        u32::try_from(whole).unwrap_or(u32::MAX)
    }
}

/// Plays one round reading region guesses line by line.
///
/// Time is charged when each answer arrives, so a slow answer can end the
/// round before it is checked. `q` or end of input abandons the round.
pub(crate) fn play_round<L, C, R, W>(
    game: &mut GameSession,
    reporter: &mut ScoreReporter,
    ledger: &mut L,
    clock: &mut C,
    input: &mut R,
    out: &mut W,
) -> Result<SessionSnapshot>
where
    L: PointsLedger + ?Sized,
    C: SecondsClock + ?Sized,
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let mut events = Vec::new();
    session::apply(game, Command::StartRound, &mut events)?;
    let _ = clock.elapsed_seconds();

    let snapshot = query::snapshot(game);
    writeln!(
        out,
        "Find {} objects on the map. You have {} seconds.",
        snapshot.total_objects, snapshot.time_remaining
    )?;

    let mut line = String::new();
    while query::status(game) == SessionStatus::Running {
        let snapshot = query::snapshot(game);
        if let Some(object) = query::current_object(game) {
            write!(
                out,
                "[{}/{}] {} ({}s left)\nRegion ({}, q to quit): ",
                snapshot.current_object_index + 1,
                snapshot.total_objects,
                object.name,
                snapshot.time_remaining,
                region_choices()
            )?;
            out.flush()?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        events.clear();
        for _ in 0..clock.elapsed_seconds() {
            session::apply(game, Command::Tick, &mut events)?;
        }
        if query::status(game) != SessionStatus::Running {
            break;
        }

        let answer = line.trim();
        if matches!(answer, "q" | "quit") {
            break;
        }
        let region: RegionId = match answer.parse() {
            Ok(region) => region,
            Err(error) => {
                writeln!(out, "{error}")?;
                continue;
            }
        };

        session::apply(game, Command::SelectRegion { region }, &mut events)?;
        session::apply(game, Command::CheckAnswer, &mut events)?;
        reporter.report(&events, ledger);
        report_answer(&events, query::config(game).bonus_seconds, out)?;
        session::apply(game, Command::Advance, &mut events)?;
    }

    let snapshot = query::snapshot(game);
    write!(out, "\n{}", format_summary(&snapshot))?;
    Ok(snapshot)
}

fn region_choices() -> String {
    RegionId::ALL
        .iter()
        .map(|region| region.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

fn report_answer<W>(events: &[Event], bonus_seconds: u32, out: &mut W) -> Result<()>
where
    W: Write + ?Sized,
{
    for event in events {
        match event {
            Event::AnswerCorrect { points, .. } => {
                writeln!(out, "Correct! +{points} points, +{bonus_seconds}s")?;
            }
            Event::AnswerIncorrect { correct_region, .. } => {
                writeln!(out, "Wrong. The answer was {correct_region}.")?;
            }
            _ => {}
        }
    }
    Ok(())
}
