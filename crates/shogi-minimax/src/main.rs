//! USI engine driven by the local alpha-beta search.

use anyhow::Result;
use shogi_core::Owner;
use shogi_engine::Game;
use shogi_minimax::{SearchConfig, Searcher, MATE_SCORE};
use std::io::{BufReader, Stdin, Stdout};
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use usi::{stdio_engine, EngineMessage, GoOptions, GuiCommand, InfoBuilder, UsiEngine, UsiError};

type StdioEngine = UsiEngine<BufReader<Stdin>, Stdout>;

const MAX_DEPTH_LIMIT: u32 = 10;

/// Per-move budget when the GUI gives no usable time control.
const DEFAULT_MOVETIME: Duration = Duration::from_millis(1000);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut engine = stdio_engine();
    let mut config = SearchConfig::default();
    let mut game = Game::new();

    loop {
        let cmd = match engine.read_command() {
            Ok(cmd) => cmd,
            Err(UsiError::Eof) => break,
            Err(e) => {
                warn!("Error reading command: {}", e);
                continue;
            }
        };
        debug!(?cmd, "received");

        match cmd {
            GuiCommand::Usi => {
                engine.send_id("shogi-minimax", "Tom Metten")?;
                engine.send(&EngineMessage::Other(format!(
                    "option name MaxDepth type spin default {} min 1 max {}",
                    config.max_depth, MAX_DEPTH_LIMIT
                )))?;
                engine.send_usiok()?;
            }

            GuiCommand::IsReady => engine.send_readyok()?,

            GuiCommand::SetOption { name, value } => {
                if name == "MaxDepth" {
                    match value.as_deref().and_then(|v| v.parse::<u32>().ok()) {
                        Some(d) => config.max_depth = d.clamp(1, MAX_DEPTH_LIMIT),
                        None => warn!(?value, "bad MaxDepth value"),
                    }
                }
            }

            GuiCommand::UsiNewGame => game = Game::new(),

            GuiCommand::Position { sfen, moves } => {
                game = setup_game(sfen.as_deref(), &moves);
            }

            GuiCommand::Go(opts) => go(&mut engine, &game, &config, &opts)?,

            GuiCommand::Stop | GuiCommand::GameOver(_) => {}

            GuiCommand::Quit => break,

            GuiCommand::Unknown(line) => {
                if !line.is_empty() {
                    debug!(%line, "ignoring unknown command");
                }
            }
        }
    }

    Ok(())
}

/// Builds the game for a `position` command; stops at the first bad move.
fn setup_game(sfen: Option<&str>, moves: &[String]) -> Game {
    let mut game = match sfen {
        Some(s) => Game::from_sfen(s).unwrap_or_else(|e| {
            warn!("Invalid SFEN {:?}: {}", s, e);
            Game::new()
        }),
        None => Game::new(),
    };
    for mv in moves {
        if let Err(e) = game.make_move_usi(mv) {
            warn!("Stopping position setup at {}: {}", mv, e);
            break;
        }
    }
    game
}

/// Picks the search budget from a `go` command.
fn budget(opts: &GoOptions, side: Owner) -> Duration {
    if let Some(ms) = opts.movetime {
        return Duration::from_millis(ms);
    }
    let remaining = match side {
        Owner::First => opts.btime,
        Owner::Second => opts.wtime,
    };
    match (remaining, opts.byoyomi) {
        (Some(0), Some(b)) => Duration::from_millis(b),
        (Some(t), b) => Duration::from_millis(t / 40 + b.unwrap_or(0)),
        (None, Some(b)) => Duration::from_millis(b),
        (None, None) => DEFAULT_MOVETIME,
    }
}

/// Search scores are in pawns; mate scores are clamped to the mate bound.
fn to_centipawns(score: f64) -> i32 {
    (score.clamp(-MATE_SCORE, MATE_SCORE) * 100.0).round() as i32
}

fn go(engine: &mut StdioEngine, game: &Game, config: &SearchConfig, opts: &GoOptions) -> Result<()> {
    let position = game.position();
    let mut run = config.clone();
    run.time_budget = budget(opts, position.side_to_move);
    if let Some(d) = opts.depth {
        run.max_depth = d.clamp(1, MAX_DEPTH_LIMIT);
    }

    let mut searcher = Searcher::new(run);
    let mut send_err = None;
    let best = searcher.choose_move_with(position, |info| {
        let info = InfoBuilder::new()
            .depth(info.depth)
            .score_cp(to_centipawns(info.score))
            .nodes(info.nodes)
            .time(info.elapsed.as_millis() as u64)
            .pv(vec![info.best_move.to_usi()])
            .build();
        if let Err(e) = engine.send_info(info) {
            send_err.get_or_insert(e);
        }
    });
    if let Some(e) = send_err {
        return Err(e.into());
    }

    match best {
        Some(mv) => engine.send_bestmove(&mv.to_usi())?,
        None => engine.send_bestmove("resign")?,
    }
    Ok(())
}
