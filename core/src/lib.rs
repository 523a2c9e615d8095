#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Heritage Map game engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative game session, and pure systems. Adapters submit [`Command`]
//! values describing the player's intent, the session executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values for
//! systems such as score reporting to react to deterministically.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Length of a round in seconds when no override is configured.
pub const DEFAULT_ROUND_SECONDS: u32 = 60;

/// Bonus seconds granted per correct answer in the map game.
pub const MAP_BONUS_SECONDS: u32 = 40;

/// Bonus seconds granted per correct answer in the quiz variant.
pub const QUIZ_BONUS_SECONDS: u32 = 30;

/// Canonical macro-region of Kazakhstan used for answer comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionId {
    /// Northern oblasts (Akmola, Kostanay, Pavlodar, North Kazakhstan).
    North,
    /// Southern oblasts (Turkestan, Zhambyl, Kyzylorda) and Shymkent.
    South,
    /// Eastern oblasts (East Kazakhstan, Abai).
    East,
    /// Western oblasts (Aktobe, Atyrau, Mangystau, West Kazakhstan).
    West,
    /// Central oblasts (Karaganda, Ulytau) and the fallback for unknown names.
    Central,
    /// Almaty city and Almaty/Zhetysu oblasts.
    Almaty,
}

impl RegionId {
    /// Every canonical region in declaration order.
    pub const ALL: [RegionId; 6] = [
        RegionId::North,
        RegionId::South,
        RegionId::East,
        RegionId::West,
        RegionId::Central,
        RegionId::Almaty,
    ];

    /// Short code used on the wire and in marker identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Central => "central",
            Self::Almaty => "almaty",
        }
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionId {
    type Err = RegionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|region| region.as_str() == normalized)
            .ok_or_else(|| RegionParseError(value.to_owned()))
    }
}

/// Raised when a string does not name a canonical region.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown region identifier '{0}'")]
pub struct RegionParseError(String);

impl RegionParseError {
    /// Input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

/// Unique identifier of an archaeological object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Creates a new object identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrowed string form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic position in decimal degrees, serialised as `[longitude, latitude]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct GeoCoord {
    longitude: f64,
    latitude: f64,
}

impl GeoCoord {
    /// Creates a coordinate from longitude and latitude.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// East-west component in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// North-south component in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Reports whether both components are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}

impl From<(f64, f64)> for GeoCoord {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<GeoCoord> for (f64, f64) {
    fn from(coord: GeoCoord) -> Self {
        (coord.longitude, coord.latitude)
    }
}

/// Heritage object the player is asked to locate on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchaeologicalObject {
    /// Unique identifier of the object.
    pub id: ObjectId,
    /// Display name shown to the player.
    pub name: String,
    /// Free-text region name in the source locale.
    pub region: String,
    /// Location of the object.
    pub coordinates: GeoCoord,
    /// Points awarded for locating the object.
    pub points: u32,
    /// Historical period, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    /// Short description, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArchaeologicalObject {
    /// Creates an object without optional metadata.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        region: impl Into<String>,
        coordinates: GeoCoord,
        points: u32,
    ) -> Self {
        Self {
            id: ObjectId::new(id),
            name: name.into(),
            region: region.into(),
            coordinates,
            points,
            period: None,
            description: None,
        }
    }

    /// Attaches a historical period.
    #[must_use]
    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// On-map anchor aggregating one or more objects of a region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionMarker {
    /// Synthetic identifier derived from the region and aggregation order.
    pub id: String,
    /// Canonical region represented by the marker.
    pub region_id: RegionId,
    /// Horizontal pixel position on the map canvas.
    pub x: f64,
    /// Vertical pixel position on the map canvas.
    pub y: f64,
    /// Human-readable region name.
    pub label: String,
    /// Number of objects folded into the marker.
    pub value: u32,
}

/// Lifecycle state of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Created but no round has started yet.
    NotStarted,
    /// Waiting for the player to select and check a region.
    Running,
    /// Showing the result of the last answer.
    AwaitingNext,
    /// Time expired or the catalog was exhausted.
    Finished,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "not started",
            Self::Running => "running",
            Self::AwaitingNext => "awaiting next",
            Self::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Flavour of the game, which decides bonus time and the ledger action tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameVariant {
    /// "Find on map" geography game.
    Map,
    /// Quiz variant sharing the same state machine.
    Quiz,
}

impl GameVariant {
    /// Bonus seconds granted per correct answer unless overridden.
    #[must_use]
    pub const fn default_bonus_seconds(self) -> u32 {
        match self {
            Self::Map => MAP_BONUS_SECONDS,
            Self::Quiz => QUIZ_BONUS_SECONDS,
        }
    }

    /// Action type recorded in the points ledger.
    #[must_use]
    pub const fn action_type(self) -> &'static str {
        match self {
            Self::Map => "map_game",
            Self::Quiz => "quiz",
        }
    }
}

/// Per-session tuning of the round timer and rewards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Game flavour.
    pub variant: GameVariant,
    /// Seconds on the clock when a round starts.
    pub round_seconds: u32,
    /// Seconds added to the clock per correct answer.
    pub bonus_seconds: u32,
}

impl SessionConfig {
    /// Default configuration for the provided variant.
    #[must_use]
    pub const fn for_variant(variant: GameVariant) -> Self {
        Self {
            variant,
            round_seconds: DEFAULT_ROUND_SECONDS,
            bonus_seconds: variant.default_bonus_seconds(),
        }
    }

    /// Overrides the starting clock.
    #[must_use]
    pub const fn with_round_seconds(mut self, round_seconds: u32) -> Self {
        self.round_seconds = round_seconds;
        self
    }

    /// Overrides the per-answer bonus.
    #[must_use]
    pub const fn with_bonus_seconds(mut self, bonus_seconds: u32) -> Self {
        self.bonus_seconds = bonus_seconds;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_variant(GameVariant::Map)
    }
}

/// Why a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinishReason {
    /// The clock reached zero.
    TimeExpired,
    /// Every object in the catalog was answered.
    CatalogExhausted,
    /// The round was started without any objects.
    EmptyCatalog,
}

/// Outcome of the most recent answer, visible while awaiting the next object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAnswer {
    /// Whether the selected region matched.
    pub correct: bool,
    /// Region the player chose.
    pub selected: RegionId,
    /// Canonical region of the object.
    pub correct_region: RegionId,
    /// Points granted for the answer, zero when incorrect.
    pub points_awarded: u32,
}

/// Session operations, used to describe rejected transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Starting a round.
    Start,
    /// Recording a region guess.
    SelectRegion,
    /// Checking the current guess.
    CheckAnswer,
    /// Moving on to the next object.
    Advance,
    /// Restarting a finished round.
    Reset,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Start => "start",
            Self::SelectRegion => "select region",
            Self::CheckAnswer => "check answer",
            Self::Advance => "advance",
            Self::Reset => "reset",
        };
        f.write_str(label)
    }
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts a fresh round from `NotStarted` or `Finished`.
    StartRound,
    /// One second of round time elapsed.
    Tick,
    /// Records the player's region guess.
    SelectRegion {
        /// Region picked on the map.
        region: RegionId,
    },
    /// Resolves the current guess against the current object.
    CheckAnswer,
    /// Moves past a shown result.
    Advance,
    /// Restarts a finished round.
    Reset,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A round began.
    RoundStarted {
        /// Number of objects in the round.
        total_objects: usize,
        /// Seconds on the clock.
        time_remaining: u32,
    },
    /// A new object is awaiting an answer.
    ObjectPresented {
        /// Position of the object within the catalog.
        index: usize,
        /// Identifier of the presented object.
        object: ObjectId,
    },
    /// The round clock moved.
    TimeAdvanced {
        /// Seconds left after the tick.
        time_remaining: u32,
    },
    /// The player picked a region.
    RegionSelected {
        /// Region picked on the map.
        region: RegionId,
    },
    /// The player located the current object.
    AnswerCorrect {
        /// Identifier of the located object.
        object: ObjectId,
        /// Display name of the located object.
        name: String,
        /// Canonical region of the object.
        region: RegionId,
        /// Points granted.
        points: u32,
        /// Seconds added to the clock.
        bonus_seconds: u32,
    },
    /// The player chose the wrong region.
    AnswerIncorrect {
        /// Identifier of the current object.
        object: ObjectId,
        /// Region the player chose.
        selected: RegionId,
        /// Region the object actually belongs to.
        correct_region: RegionId,
    },
    /// The round ended.
    RoundFinished {
        /// Why the round ended.
        reason: FinishReason,
        /// Final score.
        score: u32,
        /// Final accuracy percentage.
        accuracy: u32,
    },
}

/// Points award forwarded to the external ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardRequest {
    /// Ledger action tag, e.g. `map_game`.
    pub action_type: String,
    /// Free-text explanation shown in the user's history.
    pub description: String,
    /// Points to credit.
    pub points: u32,
}

/// Reasons the session rejects a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The operation is not allowed in the current status.
    #[error("cannot {operation} while the session is {status}")]
    InvalidTransition {
        /// Rejected operation.
        operation: Operation,
        /// Status at the time of rejection.
        status: SessionStatus,
    },
    /// An answer was checked before any region was selected.
    #[error("select a region before checking the answer")]
    EmptySelection,
}

/// Percentage of correct answers rounded half up, zero without attempts.
///
/// Rounding uses exact integer arithmetic, so ties such as 3 of 40 (7.5%)
/// round to 8 where a floating-point `round(c / a * 100)` may yield 7.
#[must_use]
pub const fn accuracy_percent(correct: u32, attempts: u32) -> u32 {
    if attempts == 0 {
        return 0;
    }
    let scaled = correct as u64 * 200 + attempts as u64;
    (scaled / (attempts as u64 * 2)) as u32
}
