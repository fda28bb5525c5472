use std::str::FromStr;
use std::time::Duration;

use sweeper_core::{
    Coord, Coord2, GameConfig, GameEngine, GameStatus, RandomMineGenerator, Result, Snapshot,
};
use thiserror::Error;
use web_time::Instant;

use crate::level::Level;

pub const HELP: &str = "\
commands:
  r X Y, reveal X Y   reveal a cell
  f X Y, flag X Y     toggle a flag
  n [LEVEL], new      start over, optionally on debug/beginner/intermediate/expert
  h, help             show this help
  q, quit             leave";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    New(Option<Level>),
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command {0:?}, try \"help\"")]
    Unknown(String),
    #[error("Expected two coordinates, like \"r 3 4\"")]
    MissingCoords,
    #[error("Not a coordinate: {0:?}")]
    BadCoord(String),
    #[error("Unknown level {0:?}")]
    UnknownLevel(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Command::Reveal(parse_coords(&mut words)?),
            "f" | "flag" => Command::Flag(parse_coords(&mut words)?),
            "n" | "new" => match words.next() {
                Some(name) => Command::New(Some(
                    Level::parse(name).ok_or_else(|| CommandError::UnknownLevel(name.into()))?,
                )),
                None => Command::New(None),
            },
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.into())),
        };

        Ok(command)
    }
}

fn parse_coords<'a>(
    words: &mut impl Iterator<Item = &'a str>,
) -> std::result::Result<Coord2, CommandError> {
    let mut next = || -> std::result::Result<Coord, CommandError> {
        let word = words.next().ok_or(CommandError::MissingCoords)?;
        word.parse()
            .map_err(|_| CommandError::BadCoord(word.into()))
    };
    Ok((next()?, next()?))
}

/// Wall clock for the status line, runs from the first move until the game ends.
#[derive(Clone, Debug, Default)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
}

impl Stopwatch {
    pub fn tick(&mut self, status: GameStatus, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        if status.is_finished() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started_at) => self.ended_at.unwrap_or(now).saturating_duration_since(started_at),
            None => Duration::ZERO,
        }
    }
}

/// Seeds for consecutive games; a forced seed keeps the whole session reproducible.
#[derive(Clone, Debug)]
pub enum Seeds {
    Random,
    Forced { next: u64 },
}

impl Seeds {
    pub fn new(forced: Option<u64>) -> Self {
        match forced {
            Some(seed) => Self::Forced { next: seed },
            None => Self::Random,
        }
    }

    pub fn next_seed(&mut self) -> u64 {
        match self {
            Self::Random => rand::random(),
            Self::Forced { next } => {
                let seed = *next;
                *next = next.wrapping_add(1);
                seed
            }
        }
    }
}

/// What the loop should do after a command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Redraw,
    ShowHelp,
    Quit,
}

/// One player at a terminal, owning the current game.
pub struct Session {
    engine: GameEngine,
    config: GameConfig,
    seeds: Seeds,
    stopwatch: Stopwatch,
}

impl Session {
    pub fn new(config: GameConfig, mut seeds: Seeds) -> Self {
        let engine = Self::start(config, &mut seeds);
        Self {
            engine,
            config,
            seeds,
            stopwatch: Stopwatch::default(),
        }
    }

    fn start(config: GameConfig, seeds: &mut Seeds) -> GameEngine {
        let seed = seeds.next_seed();
        log::info!(
            "New {}x{} game with {} mines, seed {}",
            config.size.0,
            config.size.1,
            config.mines,
            seed
        );
        GameEngine::with_generator(config, RandomMineGenerator::new(seed))
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        self.stopwatch.elapsed(now).as_secs()
    }

    /// Runs one command; out-of-board coordinates come back as errors and leave the game as it was.
    pub fn apply(&mut self, command: Command, now: Instant) -> Result<Step> {
        match command {
            Command::Reveal(coords) => {
                let outcome = self.engine.reveal(coords)?;
                log::debug!("reveal {:?}: {:?}", coords, outcome);
                self.stopwatch.tick(self.engine.status(), now);
            }
            Command::Flag(coords) => {
                let outcome = self.engine.flag(coords)?;
                log::debug!("flag {:?}: {:?}", coords, outcome);
                self.stopwatch.tick(self.engine.status(), now);
            }
            Command::New(level) => {
                if let Some(level) = level {
                    self.config = level.config();
                }
                self.engine.reset_with(
                    self.config,
                    RandomMineGenerator::new(self.seeds.next_seed()),
                );
                self.stopwatch.reset();
            }
            Command::Help => return Ok(Step::ShowHelp),
            Command::Quit => return Ok(Step::Quit),
        }
        Ok(Step::Redraw)
    }
}
