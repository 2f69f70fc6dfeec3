//! Toroidal Life - command line entry point.

mod app;
mod gpu;

use std::error::Error;

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::event_loop::EventLoop;

use toroidal_life::config::{
    DEFAULT_RULE, FRAMERATE, HEADLESS_GENERATIONS, MAX_PRINT_WIDTH, OCCUPANCY,
};
use toroidal_life::runner::{run_headless, CancellationToken, FrameSnapshot, SimulationHandle};
use toroidal_life::simulation::{
    Automaton, BoundaryPolicy, Bounded, CellularAutomaton, Dimensions, Grid, LifeLikeRule, Moore,
    Neighborhood, Pattern, Toroidal, VonNeumann,
};

use app::App;

#[derive(Parser)]
#[command(name = "toroidal-life")]
#[command(version)]
#[command(about = "Cellular automaton viewer, Conway's Game of Life on a torus by default")]
struct Cli {
    /// Grid width in cells
    width: usize,

    /// Grid height in cells
    height: usize,

    /// Probability that each cell starts alive
    #[arg(short, long, default_value_t = OCCUPANCY)]
    occupancy: f64,

    /// Generations per second (0 = as fast as possible)
    #[arg(short, long, default_value_t = FRAMERATE)]
    fps: u32,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Birth/survival rulestring
    #[arg(short, long, default_value = DEFAULT_RULE)]
    rule: LifeLikeRule,

    /// Edge behavior
    #[arg(long, value_enum, default_value_t = BoundaryKind::Toroidal)]
    boundary: BoundaryKind,

    /// Which cells count as neighbors
    #[arg(long, value_enum, default_value_t = NeighborhoodKind::Moore)]
    neighborhood: NeighborhoodKind,

    /// Start from an empty grid with this pattern in the center
    #[arg(short, long, value_enum)]
    pattern: Option<PatternKind>,

    /// Run without a window and log population each generation
    #[arg(long)]
    headless: bool,

    /// Generations to run in headless mode
    #[arg(short, long, default_value_t = HEADLESS_GENERATIONS)]
    generations: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BoundaryKind {
    Toroidal,
    Bounded,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NeighborhoodKind {
    Moore,
    VonNeumann,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PatternKind {
    Block,
    Blinker,
    Glider,
    RPentomino,
}

impl PatternKind {
    fn pattern(self) -> Pattern {
        match self {
            PatternKind::Block => Pattern::block(),
            PatternKind::Blinker => Pattern::blinker(),
            PatternKind::Glider => Pattern::glider(),
            PatternKind::RPentomino => Pattern::r_pentomino(),
        }
    }
}

type DynAutomaton = Automaton<Grid, Box<dyn Neighborhood>, Box<dyn BoundaryPolicy>, LifeLikeRule>;

fn build_automaton(cli: &Cli) -> Result<DynAutomaton, Box<dyn Error>> {
    let dimensions = Dimensions::new(cli.width, cli.height)?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("Seed: {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let neighborhood: Box<dyn Neighborhood> = match cli.neighborhood {
        NeighborhoodKind::Moore => Box::new(Moore),
        NeighborhoodKind::VonNeumann => Box::new(VonNeumann),
    };
    let boundary: Box<dyn BoundaryPolicy> = match cli.boundary {
        BoundaryKind::Toroidal => Box::new(Toroidal),
        BoundaryKind::Bounded => Box::new(Bounded),
    };

    let mut automaton = Automaton::new(
        cli.occupancy,
        neighborhood,
        boundary,
        Grid::default(),
        cli.rule,
        dimensions,
        &mut rng,
    );

    if let Some(kind) = cli.pattern {
        let pattern = kind.pattern();
        let origin = (
            (dimensions.width() as i64 - pattern.width() as i64) / 2,
            (dimensions.height() as i64 - pattern.height() as i64) / 2,
        );
        automaton.clear();
        automaton.place(&pattern, origin)?;
        log::info!("Placed {:?} at {:?}", kind, origin);
    }

    Ok(automaton)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut automaton = match build_automaton(&cli) {
        Ok(automaton) => automaton,
        Err(e) => {
            log::error!("{}", e);
            return Err(e);
        }
    };

    let dimensions = automaton.dimensions();
    log::info!(
        "Rule {} on a {}x{} grid at occupancy {:.2}, {} live cells",
        automaton.rule(),
        dimensions.width(),
        dimensions.height(),
        automaton.occupancy(),
        automaton.population()
    );

    let token = CancellationToken::new();

    if cli.headless {
        let advanced = run_headless(&mut automaton, cli.generations, None, &token);
        log::info!(
            "Finished {} generations, final population {}",
            advanced,
            automaton.population()
        );
        if cli.width <= MAX_PRINT_WIDTH {
            println!("{}", automaton.current_state());
        }
        return Ok(());
    }

    if let Err(e) = app::grid_extent(automaton.dimensions()) {
        log::error!("{}x{} grid cannot be displayed: {}", cli.width, cli.height, e);
        return Err(e.into());
    }

    let initial = FrameSnapshot::capture(&automaton);
    let simulation = SimulationHandle::spawn(automaton, cli.fps, token);
    let event_loop = EventLoop::new()?;
    let mut app = App::new(simulation, initial);
    event_loop.run_app(&mut app)?;

    log::info!("Simulation finished.");
    Ok(())
}
