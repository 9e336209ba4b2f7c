mod render;
mod session;

use anyhow::Context;
use cardduel_core::{EventBus, PowerUpKind, RoundTransition, SlotKey, TeamKey};
use cardduel_data::{load_game_config, load_rosters, ROSTERS_FILE};
use clap::Parser;
use session::{auto_step, load_match, resolved_in, save_match, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_SEED: u64 = 0xC0FFEE;
const AUTO_TURN_LIMIT: usize = 1_000;

#[derive(Parser, Debug)]
#[command(name = "cardduel")]
#[command(about = "Two-team card duel played in the terminal")]
struct Args {
    /// Directory holding rules.json and rosters.json
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Roster file; defaults to <assets>/rosters.json
    #[arg(long)]
    rosters: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Play the whole match with the built-in policy and exit
    #[arg(long)]
    auto: bool,
    /// Autosave after every round transition
    #[arg(long)]
    save: Option<PathBuf>,
    /// Resume by replaying a save file
    #[arg(long)]
    load: Option<PathBuf>,
}

enum HostMessage {
    Line(String),
    Advance { generation: u64, round: u32 },
    Closed,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut events = EventBus::default();
    let mut session = open_session(&args, &mut events)?;
    session.autosave = args.save.clone();
    flush_events(&mut events);

    if args.auto {
        return run_auto(&mut session, &mut events);
    }
    run_repl(session, events)
}

fn open_session(args: &Args, events: &mut EventBus) -> anyhow::Result<Session> {
    if let Some(path) = &args.load {
        let saved = load_match(path)?;
        return Session::replay(saved, events)
            .with_context(|| format!("resume {}", path.display()));
    }
    let config = load_game_config(&args.assets)?;
    let rosters_path = args
        .rosters
        .clone()
        .unwrap_or_else(|| args.assets.join(ROSTERS_FILE));
    let rosters = load_rosters(&rosters_path)?;
    info!(seed = args.seed, players = rosters.player_count(), "starting match");
    Session::start(config, rosters, args.seed, events).context("start match")
}

fn run_auto(session: &mut Session, events: &mut EventBus) -> anyhow::Result<()> {
    for _ in 0..AUTO_TURN_LIMIT {
        let finished = auto_step(session, events)?;
        flush_events(events);
        if let Some(winner) = finished {
            print!("{}", render::status(&session.game));
            println!("{winner} wins");
            return Ok(());
        }
    }
    anyhow::bail!("self-play did not finish within {AUTO_TURN_LIMIT} steps")
}

fn run_repl(mut session: Session, mut events: EventBus) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel();
    spawn_stdin_reader(tx.clone());
    print_help();
    print!("{}", render::board(&session.game));
    prompt();

    while let Ok(message) = rx.recv() {
        match message {
            HostMessage::Line(line) => {
                if !execute(&mut session, &mut events, &tx, line.trim()) {
                    break;
                }
                prompt();
            }
            HostMessage::Advance { generation, round } => {
                if !advance_is_current(&session, generation, round) {
                    debug!(
                        generation,
                        round,
                        current = session.game.round(),
                        "stale advance ignored"
                    );
                    continue;
                }
                println!();
                match session.next_round(&mut events) {
                    Ok(_) => {
                        flush_events(&mut events);
                        print!("{}", render::board(&session.game));
                    }
                    Err(err) => warn!(%err, "auto-advance failed"),
                }
                prompt();
            }
            HostMessage::Closed => break,
        }
    }
    Ok(())
}

fn spawn_stdin_reader(tx: Sender<HostMessage>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(HostMessage::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(HostMessage::Closed);
    });
}

/// Posts an advance for the current round once the display delay elapses.
fn schedule_advance(session: &Session, tx: &Sender<HostMessage>) {
    if !session.game.should_auto_advance() {
        return;
    }
    let generation = session.generation;
    let round = session.game.round();
    let delay = Duration::from_millis(session.game.config.auto_advance_ms);
    let tx = tx.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = tx.send(HostMessage::Advance { generation, round });
    });
}

/// An advance applies only to the match and round it was armed for.
fn advance_is_current(session: &Session, generation: u64, round: u32) -> bool {
    generation == session.generation
        && round == session.game.round()
        && session.game.should_auto_advance()
}

/// Runs one command line. Returns false when the user quits.
fn execute(
    session: &mut Session,
    events: &mut EventBus,
    tx: &Sender<HostMessage>,
    line: &str,
) -> bool {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return true;
    };
    let args: Vec<&str> = parts.collect();
    match command {
        "board" | "b" => print!("{}", render::board(&session.game)),
        "status" | "s" => print!("{}", render::status(&session.game)),
        "powers" => print!("{}", render::powers(&session.game)),
        "pick" | "p" => {
            let Some(slot) = args.first().and_then(|arg| SlotKey::from_keyword(arg)) else {
                println!("usage: pick <tl|tr|bl|br>");
                return true;
            };
            match session.pick(slot, events) {
                Ok(()) => after_action(session, events, tx),
                Err(err) => println!("error: {err}"),
            }
        }
        "use" | "u" => {
            let (Some(team), Some(kind)) = (
                args.first().and_then(|arg| TeamKey::from_keyword(arg)),
                args.get(1).and_then(|arg| PowerUpKind::from_keyword(arg)),
            ) else {
                println!("usage: use <team1|team2> <power-up>");
                return true;
            };
            match session.use_power_up(team, kind, events) {
                Ok(()) => after_action(session, events, tx),
                Err(err) => println!("error: {err}"),
            }
        }
        "next" | "n" => match session.next_round(events) {
            Ok(transition) => {
                flush_events(events);
                if let RoundTransition::Started { .. } = transition {
                    print!("{}", render::board(&session.game));
                }
            }
            Err(err) => println!("error: {err}"),
        },
        "save" => {
            let Some(path) = path_arg(&args, session) else {
                println!("usage: save <path>");
                return true;
            };
            match save_match(&session.snapshot(), &path) {
                Ok(()) => println!("saved to {}", path.display()),
                Err(err) => println!("error: {err:#}"),
            }
        }
        "load" => {
            let Some(path) = path_arg(&args, session) else {
                println!("usage: load <path>");
                return true;
            };
            let mut replayed = EventBus::default();
            match load_match(&path).and_then(|saved| Session::replay(saved, &mut replayed)) {
                Ok(mut restored) => {
                    restored.autosave = session.autosave.take();
                    restored.generation = session.generation + 1;
                    *session = restored;
                    println!("loaded {}", path.display());
                    print!("{}", render::board(&session.game));
                    schedule_advance(session, tx);
                }
                Err(err) => println!("error: {err:#}"),
            }
        }
        "help" | "h" | "?" => print_help(),
        "quit" | "q" | "exit" => return false,
        other => println!("unknown command '{other}', try help"),
    }
    true
}

fn after_action(session: &Session, events: &mut EventBus, tx: &Sender<HostMessage>) {
    let drained: Vec<_> = events.drain().collect();
    let resolved = resolved_in(&drained);
    for event in &drained {
        println!("{}", render::event_line(event));
    }
    print!("{}", render::board(&session.game));
    if resolved {
        if session.game.second_chance_pending() {
            println!("waiting on a second chance; type next to move on");
        } else if session.game.should_auto_advance() {
            println!(
                "next round in {} ms",
                session.game.config.auto_advance_ms
            );
        }
        schedule_advance(session, tx);
    }
}

fn path_arg(args: &[&str], session: &Session) -> Option<PathBuf> {
    args.first()
        .map(PathBuf::from)
        .or_else(|| session.autosave.clone())
}

fn flush_events(events: &mut EventBus) {
    for event in events.drain() {
        println!("{}", render::event_line(&event));
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn print_help() {
    println!("commands:");
    println!("  board               show the board");
    println!("  status              scores, players and charges");
    println!("  pick <slot>         draw into tl, tr, bl or br");
    println!("  use <team> <power>  second_chance, reveal_two, life_shield, lock_all, remove_worst");
    println!("  powers              power-ups each team may use now");
    println!("  next                start the next round");
    println!("  save [path]         write a save file");
    println!("  load [path]         replay a save file");
    println!("  quit");
}
