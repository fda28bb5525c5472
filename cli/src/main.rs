use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use sweeper_core::{CellCount, Coord};
use web_time::Instant;

use crate::level::Level;
use crate::session::{Command, HELP, Seeds, Session, Step};

mod level;
mod render;
mod session;

#[derive(Parser, Debug)]
#[command(version, about = "Play minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board preset
    #[arg(short, long, value_enum, default_value_t = Level::Beginner)]
    level: Level,

    /// Override the preset width
    #[arg(long)]
    width: Option<Coord>,

    /// Override the preset height
    #[arg(long)]
    height: Option<Coord>,

    /// Override the preset mine count, clamped to the board size
    #[arg(long)]
    mines: Option<CellCount>,

    /// Print every state as a JSON snapshot instead of drawing the board
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("{:?}", args);

    let config = args
        .level
        .config_with(args.width, args.height, args.mines)
        .context("Invalid board size")?;
    let session = Session::new(config, Seeds::new(args.seed));

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(session, stdin.lock(), stdout.lock(), args.json)
}

fn run(
    mut session: Session,
    input: impl BufRead,
    mut out: impl Write,
    json: bool,
) -> anyhow::Result<()> {
    draw(&session, &mut out, json)?;

    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{}", err)?;
                continue;
            }
        };

        match session.apply(command, Instant::now()) {
            Ok(Step::Redraw) => draw(&session, &mut out, json)?,
            Ok(Step::ShowHelp) => writeln!(out, "{}", HELP)?,
            Ok(Step::Quit) => break,
            Err(err) => writeln!(out, "{}", err)?,
        }
    }

    out.flush()?;
    Ok(())
}

fn draw(session: &Session, out: &mut impl Write, json: bool) -> anyhow::Result<()> {
    let snapshot = session.snapshot();
    if json {
        writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
    } else {
        let elapsed = session.elapsed_secs(Instant::now());
        write!(out, "{}", render::render_board(&snapshot))?;
        writeln!(out, "{}", render::render_status(&snapshot, elapsed))?;
    }
    Ok(())
}
