use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use skirmish_core::{Action, CellCoord, Modifier, Modifiers, Path, Strategy, UnitColor};
use skirmish_system_generation::{GenerationConfig, GenerationReport, MapGenerator};
use skirmish_system_path_selection::{
    FixedRoll, PathRequest, PathSelection, Roll, RngRoll,
};
use skirmish_system_pathfinding::find_path;
use skirmish_world::{query, Grid};

use crate::{config::load_generation_config, snapshot::MapSnapshot};

const GENERATION_STREAM: u64 = 0;
const PATH_STREAM: u64 = 1;
const ROLL_STREAM: u64 = 2;

fn seeded(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// Where the map comes from.
#[derive(Args, Debug)]
pub(crate) struct MapSource {
    /// Seed for map generation and every random draw
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// TOML file with generator tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use an exported map snapshot instead of generating one
    #[arg(long, conflicts_with = "config")]
    map: Option<String>,
}

impl MapSource {
    fn build(&self) -> Result<(Grid, Option<GenerationReport>)> {
        if let Some(map) = &self.map {
            let grid = MapSnapshot::decode(map)
                .and_then(|snapshot| snapshot.restore())
                .context("failed to load map snapshot")?;
            return Ok((grid, None));
        }

        let config = match &self.config {
            Some(path) => load_generation_config(path)?,
            None => GenerationConfig::default(),
        };
        let generator = MapGenerator::new(config).context("invalid generator config")?;
        let mut grid = Grid::new();
        let report = generator.generate(&mut grid, &mut seeded(self.seed, GENERATION_STREAM));
        Ok((grid, Some(report)))
    }
}

fn print_layout(grid: &Grid) {
    for row in query::layout_rows(grid) {
        println!("{row}");
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialise output")?;
    println!("{json}");
    Ok(())
}

/// Generate a map and print its layout, report and snapshot
#[derive(Parser, Debug)]
pub(crate) struct Generate {
    #[command(flatten)]
    source: MapSource,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    seed: u64,
    layout: Vec<String>,
    report: Option<&'a GenerationReport>,
    snapshot: String,
}

impl Generate {
    pub(crate) fn execute(self) -> Result<()> {
        let (grid, report) = self.source.build()?;
        let snapshot = MapSnapshot::capture(&grid).encode()?;

        if self.json {
            return print_json(&GenerateOutput {
                seed: self.source.seed,
                layout: query::layout_rows(&grid),
                report: report.as_ref(),
                snapshot,
            });
        }

        print_layout(&grid);
        if let Some(report) = report {
            println!();
            println!(
                "clusters: {}/{} in {} attempts",
                report.clusters_placed, report.clusters_target, report.cluster_attempts
            );
            println!(
                "coverage: {}  suppression: {}  separation: {} ({} attempts)",
                report.coverage_cells,
                report.suppression_cells,
                report.separation_cells,
                report.separation_attempts
            );
            println!(
                "corridor: {} ({} cells)  pockets: {}",
                if report.corridor_carved { "carved" } else { "none" },
                report.corridor_cells,
                report.pocket_cells
            );
            for exhaustion in &report.exhausted {
                println!("exhausted: {exhaustion:?}");
            }
        }
        println!();
        println!("{snapshot}");
        Ok(())
    }
}

/// Run a single search strategy between two cells
#[derive(Parser, Debug)]
pub(crate) struct PathCommand {
    #[command(flatten)]
    source: MapSource,

    /// Start cell as `row,column`
    #[arg(long)]
    from: CellCoord,

    /// Target cell as `row,column`
    #[arg(long)]
    to: CellCoord,

    /// shortest, uniform-cost, line-of-sight or random-walk
    #[arg(long, default_value = "shortest")]
    strategy: Strategy,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct PathOutput {
    strategy: Strategy,
    reached: bool,
    path: Path,
}

impl PathCommand {
    pub(crate) fn execute(self) -> Result<()> {
        let (grid, _) = self.source.build()?;
        let mut rng = seeded(self.source.seed, PATH_STREAM);
        let path = find_path(self.strategy, &grid, self.from, self.to, &mut rng);
        let output = PathOutput {
            strategy: self.strategy,
            reached: path.ends_at(self.to),
            path,
        };

        if self.json {
            return print_json(&output);
        }

        print_layout(&grid);
        println!();
        println!(
            "{}: {} cells, {}",
            output.strategy,
            output.path.len(),
            if output.reached { "reached" } else { "did not arrive" }
        );
        let cells: Vec<String> = output.path.cells().iter().map(ToString::to_string).collect();
        println!("{}", cells.join(" "));
        Ok(())
    }
}

/// Run the path selection policy for a move or a shot
#[derive(Parser, Debug)]
pub(crate) struct Plan {
    #[command(flatten)]
    source: MapSource,

    /// Cell the unit stands on, as `row,column`
    #[arg(long)]
    from: CellCoord,

    /// Selected cell as `row,column`
    #[arg(long)]
    to: CellCoord,

    /// Unit color: red, blue, green or yellow
    #[arg(long)]
    color: UnitColor,

    /// move or fire
    #[arg(long, default_value = "move")]
    action: Action,

    /// Active modifier; repeat for several
    #[arg(long = "modifier")]
    modifiers: Vec<Modifier>,

    /// Force the draw instead of rolling it
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    roll: Option<u8>,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct PlanOutput {
    action: Action,
    strategy: Strategy,
    roll: Option<u8>,
    amplified: bool,
    reached: bool,
    landing: CellCoord,
    steps: Vec<CellCoord>,
    events: Vec<String>,
    remaining_modifiers: Vec<Modifier>,
}

impl Plan {
    pub(crate) fn execute(self) -> Result<()> {
        let (mut grid, _) = self.source.build()?;
        grid.place(self.from)
            .with_context(|| format!("cannot place a unit on {}", self.from))?;

        let mut modifiers = Modifiers::none();
        for modifier in &self.modifiers {
            modifiers.grant(*modifier);
        }
        let mut roll: Box<dyn Roll> = match self.roll {
            Some(draw) => Box::new(FixedRoll::always(draw)),
            None => Box::new(RngRoll::new(seeded(self.source.seed, ROLL_STREAM))),
        };
        let mut rng = seeded(self.source.seed, PATH_STREAM);

        let selection = PathSelection::new();
        let request = PathRequest {
            action: self.action,
            origin: self.from,
            destination: self.to,
            color: self.color,
        };
        let plan = selection
            .plan(&grid, request, &mut modifiers, &mut *roll, &mut rng)
            .context("request rejected")?;
        let mut events = Vec::new();
        selection.commit(&mut grid, &plan, &mut events);

        let output = PlanOutput {
            action: plan.action,
            strategy: plan.strategy,
            roll: plan.roll,
            amplified: plan.amplified,
            reached: plan.reaches(self.to),
            landing: plan.landing(),
            steps: plan.steps().to_vec(),
            events: events.iter().map(|event| format!("{event:?}")).collect(),
            remaining_modifiers: [
                Modifier::MobilityPrecision,
                Modifier::AttackPrecision,
                Modifier::AttackPower,
            ]
            .into_iter()
            .filter(|modifier| modifiers.is_active(*modifier))
            .collect(),
        };

        if self.json {
            return print_json(&output);
        }

        print_layout(&grid);
        println!();
        match output.roll {
            Some(draw) => println!("{:?} with {} (draw {draw})", output.action, output.strategy),
            None => println!("{:?} with {}", output.action, output.strategy),
        }
        if output.amplified {
            println!("amplified shot");
        }
        println!(
            "{} steps, {}, lands on {}",
            output.steps.len(),
            if output.reached { "reached" } else { "did not arrive" },
            output.landing
        );
        for event in &output.events {
            println!("event: {event}");
        }
        Ok(())
    }
}

/// Decode a map snapshot and check its layout
#[derive(Parser, Debug)]
pub(crate) struct Import {
    /// Snapshot string produced by `generate`
    snapshot: String,
}

impl Import {
    pub(crate) fn execute(self) -> Result<()> {
        let grid = MapSnapshot::decode(&self.snapshot)
            .and_then(|snapshot| snapshot.restore())
            .context("failed to load map snapshot")?;
        let zones = grid.safe_zones();
        let connected = grid.reachable_from(zones.left()).reaches_any(zones.right());

        print_layout(&grid);
        println!();
        println!("obstacles: {}", query::obstacle_cells(&grid).len());
        println!("safe zones connected: {connected}");
        println!("isolated pockets: {}", query::has_isolated_pockets(&grid));
        Ok(())
    }
}
