mod view;

use std::{
    io::{self, BufRead},
    path::PathBuf,
    sync::mpsc::Receiver,
    time::Duration,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use labyrinth::{
    Direction, Generator, GridEvent, Labyrinth, LabyrinthSettings, Position, Session, Solver,
    logging,
};
use view::Mirror;

/// Time between two moves of the auto player.
const AUTO_MOVE_DELAY: Duration = Duration::from_millis(120);
/// How long to wait for grid events before checking whether a worker is done.
const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(30);

#[derive(Parser, Debug)]
#[command(name = "labyrinth", version, about = "Generate, solve and walk perfect mazes in the terminal")]
struct Cli {
    /// Number of columns
    #[arg(long, default_value_t = LabyrinthSettings::DEFAULT_WIDTH)]
    width: usize,

    /// Number of rows
    #[arg(long, default_value_t = LabyrinthSettings::DEFAULT_HEIGHT)]
    height: usize,

    /// Generation algorithm
    #[arg(short, long, value_enum, default_value_t = Generator::default())]
    generator: Generator,

    /// Solving algorithm used by the auto player
    #[arg(short, long, value_enum, default_value_t = Solver::default())]
    solver: Solver,

    /// Seed of the generation; random if omitted
    #[arg(long)]
    seed: Option<i64>,

    /// Place start and end on random cells derived from the seed
    #[arg(long)]
    random_endpoints: bool,

    /// Animate the generation
    #[arg(long)]
    step_by_step: bool,

    /// Animate the solver's search
    #[arg(long)]
    solve_step_by_step: bool,

    /// Let the solver walk to the goal instead of reading moves from stdin
    #[arg(long)]
    auto: bool,

    /// Directory for the log file; logging is off if omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Minimum level written to the log file
    #[arg(long, default_value_t = tracing::Level::INFO)]
    log_level: tracing::Level,
}

/// The labyrinth view plus the session feeding it.
struct Game {
    session: Session,
    events: Receiver<GridEvent>,
    mirror: Mirror,
    start: Position,
    end: Position,
}

impl Game {
    fn drain_events(&mut self) {
        for event in self.events.try_iter() {
            self.mirror.apply(event);
        }
    }

    fn draw(&mut self, status: &str) -> Result<()> {
        self.drain_events();
        let player = self.session.read(|lab| lab.player().position())?;
        self.mirror
            .draw(&mut io::stdout(), player, self.start, self.end, status)?;
        Ok(())
    }

    /// Keep redrawing from grid events until `done` holds.
    fn animate(&mut self, status: &str, mut done: impl FnMut(&Session) -> bool) -> Result<()> {
        while !done(&self.session) {
            if let Ok(event) = self.events.recv_timeout(EVENT_POLL_TIMEOUT) {
                self.mirror.apply(event);
                self.drain_events();
                // The player does not move during generation or solving
                self.mirror
                    .draw(&mut io::stdout(), self.start, self.start, self.end, status)?;
            }
        }
        Ok(())
    }

    fn generate(&mut self, seed: i64, step_by_step: bool) -> Result<()> {
        self.session.start_generation(seed, step_by_step)?;
        if step_by_step {
            self.animate("Generating...", |session| {
                session.is_generation_finished().unwrap_or(true)
            })?;
        }
        self.session.wait_generation()?;
        self.draw(&format!("Generated with seed {seed}"))
    }

    fn auto_play(&mut self) -> Result<()> {
        self.session.set_auto_player(true)?;
        if !self.session.spawn_solve() {
            bail!("a generation or a search is still running");
        }
        self.animate("Searching a path...", |session| !session.is_searching_path())?;
        let Some(path) = self.session.wait_solve()? else {
            self.draw("No path to the goal")?;
            return Ok(());
        };

        for pair in path.windows(2) {
            let direction = self
                .session
                .read(|lab| lab.direction_between(pair[0], pair[1]))?
                .context("solver returned a path with a gap")?;
            self.session.move_player(direction)?;
            self.draw(&format!("Following a {} step path", path.len() - 1))?;
            std::thread::sleep(AUTO_MOVE_DELAY);
        }
        self.draw("Goal reached!")
    }

    fn play(&mut self) -> Result<()> {
        let mut status = String::from("Move with n/s/e/w, quit with q");
        self.draw(&status)?;
        for line in io::stdin().lock().lines() {
            let direction = match line?.trim() {
                "n" => Direction::North,
                "s" => Direction::South,
                "e" => Direction::East,
                "w" => Direction::West,
                "q" => break,
                other => {
                    status = format!("Unknown command {other:?}; use n/s/e/w or q");
                    self.draw(&status)?;
                    continue;
                }
            };
            status = if self.session.move_player(direction)? {
                format!("Moved {direction}")
            } else {
                format!("Cannot move {direction}")
            };
            self.session.wait_blocked_check()?;

            if self.session.read(Labyrinth::goal_achieved)? {
                self.draw("Goal reached!")?;
                break;
            }
            if self.session.is_blocked()? {
                self.draw("Blocked: the goal can no longer be reached")?;
                break;
            }
            self.draw(&status)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = match &cli.log_dir {
        Some(dir) => logging::init_file_logging(dir, cli.log_level),
        None => None,
    };

    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut settings = LabyrinthSettings {
        generator: cli.generator,
        solver: cli.solver,
        solver_step_by_step: cli.solve_step_by_step,
        ..LabyrinthSettings::with_size(cli.width, cli.height)
    };
    if cli.random_endpoints {
        settings = settings.with_random_endpoints(seed);
    }
    tracing::info!("[main] starting with {:?}, seed {}", settings, seed);

    let mut labyrinth = Labyrinth::from_settings(&settings).context("invalid labyrinth")?;
    let events = labyrinth.subscribe();
    let mut game = Game {
        session: Session::new(labyrinth),
        events,
        mirror: Mirror::new(settings.width, settings.height),
        start: settings.start,
        end: settings.end,
    };

    game.generate(seed, cli.step_by_step)?;
    if cli.auto {
        game.auto_play()?;
    } else {
        game.play()?;
    }
    game.session.shutdown()?;
    Ok(())
}
