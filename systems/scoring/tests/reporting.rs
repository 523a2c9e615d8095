use heritage_map_core::{
    ArchaeologicalObject, AwardRequest, Command, Event, GameVariant, GeoCoord, RegionId,
    SessionConfig, SessionStatus,
};
use heritage_map_session::{self as session, query, GameSession};
use heritage_map_system_scoring::{LedgerError, PointsLedger, ScoreReporter};

#[derive(Debug, Default)]
struct UnreachableLedger {
    attempts: usize,
}

impl PointsLedger for UnreachableLedger {
    fn record(&mut self, _award: &AwardRequest) -> Result<(), LedgerError> {
        self.attempts += 1;
        Err(LedgerError::Unavailable("connection refused".to_owned()))
    }
}

fn catalog() -> Vec<ArchaeologicalObject> {
    vec![
        ArchaeologicalObject::new(
            "otrar",
            "Otrar",
            "Туркестанская область",
            GeoCoord::new(68.3, 42.85),
            10,
        ),
        ArchaeologicalObject::new(
            "berel",
            "Berel kurgans",
            "Восточно-Казахстанская область",
            GeoCoord::new(86.4, 49.4),
            15,
        ),
    ]
}

fn play<L: PointsLedger>(
    reporter: &mut ScoreReporter,
    ledger: &mut L,
    answers: &[RegionId],
) -> GameSession {
    let mut game = GameSession::new(catalog(), SessionConfig::default());
    let mut events: Vec<Event> = Vec::new();
    session::apply(&mut game, Command::StartRound, &mut events).expect("round starts");

    for region in answers {
        events.clear();
        session::apply(&mut game, Command::SelectRegion { region: *region }, &mut events)
            .expect("selection accepted");
        session::apply(&mut game, Command::CheckAnswer, &mut events).expect("answer checked");
        reporter.report(&events, ledger);
        session::apply(&mut game, Command::Advance, &mut events).expect("advanced");
    }

    game
}

#[test]
fn correct_answers_reach_the_ledger() {
    let mut reporter = ScoreReporter::new(GameVariant::Map);
    let mut ledger: Vec<AwardRequest> = Vec::new();

    let game = play(&mut reporter, &mut ledger, &[RegionId::South, RegionId::East]);

    assert_eq!(query::snapshot(&game).score, 25);
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].action_type, "map_game");
    assert_eq!(ledger[1].points, 15);
    assert_eq!(reporter.submitted(), 2);
    assert_eq!(reporter.failed(), 0);
}

#[test]
fn incorrect_answers_are_not_reported() {
    let mut reporter = ScoreReporter::new(GameVariant::Map);
    let mut ledger: Vec<AwardRequest> = Vec::new();

    let _ = play(&mut reporter, &mut ledger, &[RegionId::North, RegionId::East]);

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].points, 15);
}

#[test]
fn ledger_failure_never_affects_the_session() {
    let mut reporter = ScoreReporter::new(GameVariant::Map);
    let mut ledger = UnreachableLedger::default();

    let game = play(&mut reporter, &mut ledger, &[RegionId::South, RegionId::East]);

    let snapshot = query::snapshot(&game);
    assert_eq!(snapshot.score, 25);
    assert_eq!(snapshot.status, SessionStatus::Finished);
    assert_eq!(ledger.attempts, 2);
    assert_eq!(reporter.submitted(), 0);
    assert_eq!(reporter.failed(), 2);
}
