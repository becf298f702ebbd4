use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish_core::{
    Action, CellCoord, Event, GridError, Modifier, Modifiers, Strategy, UnitColor,
};
use skirmish_system_path_selection::{
    FixedRoll, PathPlan, PathRequest, PathSelection, PlanError, RngRoll,
};
use skirmish_world::Grid;

const ORIGIN: CellCoord = CellCoord::new(2, 2);
const DESTINATION: CellCoord = CellCoord::new(2, 6);

fn plan_with(
    grid: &Grid,
    request: PathRequest,
    modifiers: &mut Modifiers,
    draw: u8,
) -> Result<PathPlan, PlanError> {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    PathSelection::new().plan(grid, request, modifiers, &mut FixedRoll::always(draw), &mut rng)
}

fn move_strategy(color: UnitColor, modifiers: &mut Modifiers, draw: u8) -> Strategy {
    let grid = Grid::new();
    plan_with(&grid, PathRequest::movement(color, ORIGIN, DESTINATION), modifiers, draw)
        .expect("valid move")
        .strategy
}

#[test]
fn precise_units_take_the_shortest_path_on_low_draws() {
    for color in [UnitColor::Red, UnitColor::Blue] {
        assert_eq!(move_strategy(color, &mut Modifiers::none(), 1), Strategy::ShortestUnweighted);
        assert_eq!(move_strategy(color, &mut Modifiers::none(), 5), Strategy::ShortestUnweighted);
        assert_eq!(move_strategy(color, &mut Modifiers::none(), 6), Strategy::RandomWalk);
        assert_eq!(move_strategy(color, &mut Modifiers::none(), 10), Strategy::RandomWalk);
    }
}

#[test]
fn erratic_units_use_uniform_cost_up_to_eight() {
    for color in [UnitColor::Green, UnitColor::Yellow] {
        assert_eq!(move_strategy(color, &mut Modifiers::none(), 8), Strategy::UniformCost);
        assert_eq!(move_strategy(color, &mut Modifiers::none(), 9), Strategy::RandomWalk);
    }
}

#[test]
fn mobility_precision_raises_odds_and_is_consumed_either_way() {
    let mut modifiers = Modifiers::none().with(Modifier::MobilityPrecision);
    assert_eq!(move_strategy(UnitColor::Red, &mut modifiers, 9), Strategy::ShortestUnweighted);
    assert!(!modifiers.is_active(Modifier::MobilityPrecision));

    let mut modifiers = Modifiers::none().with(Modifier::MobilityPrecision);
    assert_eq!(move_strategy(UnitColor::Green, &mut modifiers, 10), Strategy::RandomWalk);
    assert!(!modifiers.is_active(Modifier::MobilityPrecision));

    let mut modifiers = Modifiers::none();
    assert_eq!(move_strategy(UnitColor::Red, &mut modifiers, 9), Strategy::RandomWalk);
}

#[test]
fn moves_leave_attack_modifiers_alone() {
    let mut modifiers = Modifiers::none()
        .with(Modifier::AttackPrecision)
        .with(Modifier::AttackPower);
    let _ = move_strategy(UnitColor::Blue, &mut modifiers, 3);
    assert!(modifiers.is_active(Modifier::AttackPrecision));
    assert!(modifiers.is_active(Modifier::AttackPower));
}

#[test]
fn exact_move_reaches_destination() {
    let grid = Grid::new();
    let plan = plan_with(
        &grid,
        PathRequest::movement(UnitColor::Red, ORIGIN, DESTINATION),
        &mut Modifiers::none(),
        2,
    )
    .expect("valid move");

    assert_eq!(plan.action, Action::Move);
    assert_eq!(plan.roll, Some(2));
    assert!(plan.reaches(DESTINATION));
    assert_eq!(
        plan.steps(),
        &[
            CellCoord::new(2, 3),
            CellCoord::new(2, 4),
            CellCoord::new(2, 5),
            DESTINATION,
        ]
    );
}

#[test]
fn random_walk_move_may_stop_short() {
    let mut grid = Grid::new();
    let enclosed = CellCoord::new(6, 12);
    for cell in [
        CellCoord::new(5, 12),
        CellCoord::new(7, 12),
        CellCoord::new(6, 11),
        CellCoord::new(6, 13),
    ] {
        grid.set_traversable(cell, false).expect("in bounds");
    }
    grid.connect_nodes();

    let plan = plan_with(
        &grid,
        PathRequest::movement(UnitColor::Yellow, CellCoord::new(1, 1), enclosed),
        &mut Modifiers::none(),
        10,
    )
    .expect("valid move");

    assert_eq!(plan.strategy, Strategy::RandomWalk);
    assert!(!plan.reaches(enclosed));
    assert!(plan.steps().len() <= 28);
    assert_eq!(plan.landing(), *plan.steps().last().expect("walked somewhere"));
}

#[test]
fn random_walk_stops_before_another_unit() {
    let mut grid = Grid::new();
    for column in 0..grid.dimensions().columns() {
        grid.set_traversable(CellCoord::new(1, column), false)
            .expect("in bounds");
    }
    grid.connect_nodes();
    let origin = CellCoord::new(0, 0);
    let blocker = CellCoord::new(0, 4);
    grid.place(origin).expect("in bounds");
    grid.place(blocker).expect("in bounds");

    let selection = PathSelection::new();
    let plan = selection
        .plan(
            &grid,
            PathRequest::movement(UnitColor::Red, origin, CellCoord::new(0, 10)),
            &mut Modifiers::none(),
            &mut FixedRoll::always(10),
            &mut ChaCha8Rng::seed_from_u64(0),
        )
        .expect("valid move");

    assert_eq!(plan.strategy, Strategy::RandomWalk);
    assert!(plan.steps().iter().all(|cell| cell.column() < blocker.column()));
    assert_ne!(plan.landing(), blocker);

    let mut events = Vec::new();
    selection.commit(&mut grid, &plan, &mut events);

    assert_eq!(grid.is_occupied(blocker), Ok(true));
    assert_eq!(grid.is_occupied(plan.landing()), Ok(true));
    assert!(!events.contains(&Event::UnitPlaced { cell: blocker }));
}

#[test]
fn shots_follow_line_of_sight_by_default() {
    let grid = Grid::new();
    let plan = plan_with(
        &grid,
        PathRequest::fire(UnitColor::Green, ORIGIN, DESTINATION),
        &mut Modifiers::none(),
        10,
    )
    .expect("valid shot");

    assert_eq!(plan.strategy, Strategy::LineOfSight);
    assert_eq!(plan.roll, None);
    assert!(!plan.amplified);
    assert_eq!(plan.path.len(), 5);
}

#[test]
fn attack_precision_switches_to_exact_strategy_once() {
    let mut grid = Grid::new();
    grid.set_traversable(CellCoord::new(2, 4), false)
        .expect("in bounds");
    grid.connect_nodes();
    let mut modifiers = Modifiers::none().with(Modifier::AttackPrecision);

    let guided = plan_with(
        &grid,
        PathRequest::fire(UnitColor::Yellow, ORIGIN, DESTINATION),
        &mut modifiers,
        10,
    )
    .expect("valid shot");
    assert_eq!(guided.strategy, Strategy::UniformCost);
    assert!(guided.reaches(DESTINATION));
    assert!(!modifiers.is_active(Modifier::AttackPrecision));

    let plain = plan_with(
        &grid,
        PathRequest::fire(UnitColor::Yellow, ORIGIN, DESTINATION),
        &mut modifiers,
        10,
    )
    .expect("valid shot");
    assert_eq!(plain.strategy, Strategy::LineOfSight);
    assert!(plain.path.is_empty());
}

#[test]
fn attack_power_amplifies_without_changing_the_path() {
    let grid = Grid::new();
    let mut modifiers = Modifiers::none().with(Modifier::AttackPower);

    let plan = plan_with(
        &grid,
        PathRequest::fire(UnitColor::Red, ORIGIN, DESTINATION),
        &mut modifiers,
        1,
    )
    .expect("valid shot");

    assert!(plan.amplified);
    assert_eq!(plan.strategy, Strategy::LineOfSight);
    assert_eq!(plan.path.len(), 5);
    assert!(!modifiers.is_active(Modifier::AttackPower));
}

#[test]
fn rejected_requests_keep_modifiers() {
    let mut grid = Grid::new();
    let blocked = CellCoord::new(3, 3);
    let occupied = CellCoord::new(3, 5);
    grid.set_traversable(blocked, false).expect("in bounds");
    grid.connect_nodes();
    grid.place(occupied).expect("in bounds");
    let granted = Modifiers::none()
        .with(Modifier::MobilityPrecision)
        .with(Modifier::AttackPrecision)
        .with(Modifier::AttackPower);

    let mut modifiers = granted;
    assert_eq!(
        plan_with(
            &grid,
            PathRequest::movement(UnitColor::Red, ORIGIN, blocked),
            &mut modifiers,
            1
        ),
        Err(PlanError::DestinationBlocked { cell: blocked })
    );
    assert_eq!(
        plan_with(
            &grid,
            PathRequest::movement(UnitColor::Red, ORIGIN, occupied),
            &mut modifiers,
            1
        ),
        Err(PlanError::DestinationOccupied { cell: occupied })
    );
    let outside = CellCoord::new(13, 0);
    assert_eq!(
        plan_with(&grid, PathRequest::fire(UnitColor::Red, ORIGIN, outside), &mut modifiers, 1),
        Err(PlanError::OutOfBounds(GridError::out_of_bounds(outside)))
    );
    assert_eq!(
        plan_with(&grid, PathRequest::movement(UnitColor::Red, outside, ORIGIN), &mut modifiers, 1),
        Err(PlanError::OutOfBounds(GridError::out_of_bounds(outside)))
    );
    assert_eq!(modifiers, granted);
}

#[test]
fn seeded_rolls_approach_the_documented_odds() {
    let grid = Grid::new();
    let selection = PathSelection::new();
    let mut roll = RngRoll::new(ChaCha8Rng::seed_from_u64(2024));
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let trials = 4_000;

    for (color, expected) in [(UnitColor::Red, 0.5), (UnitColor::Green, 0.8)] {
        let exact = (0..trials)
            .filter(|_| {
                let plan = selection
                    .plan(
                        &grid,
                        PathRequest::movement(color, ORIGIN, DESTINATION),
                        &mut Modifiers::none(),
                        &mut roll,
                        &mut rng,
                    )
                    .expect("valid move");
                plan.strategy != Strategy::RandomWalk
            })
            .count();
        let ratio = exact as f64 / f64::from(trials);
        assert!((ratio - expected).abs() < 0.05, "{color:?}: {ratio}");
    }
}
