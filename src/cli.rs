use std::env;
use std::io::{self, BufRead, Write as _};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::data::import::{import_station_csv, DEFAULT_IMPORT_OUTPUT_PATH};
use crate::data::registry::DataRegistry;
use crate::data::station::DEFAULT_STATIONS_PATH;
use crate::data::validate::validate_station_dataset;
use crate::game::index::GuessLanguage;
use crate::game::session::{GameSession, Phase, SessionEvent};
use crate::server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Play,
    Import,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("play") => Some(Command::Play),
        Some("import") => Some(Command::Import),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Play) => handle_play(args),
        Some(Command::Import) => handle_import(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("usage: mrt-recall <serve|play|import|validate>");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("MRT_RECALL_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_import(args: &[String]) -> i32 {
    let source = match args.get(2) {
        Some(source) => source.as_str(),
        None => {
            eprintln!("usage: mrt-recall import <stations.csv> [output.json]");
            return 2;
        }
    };
    let output = args
        .get(3)
        .map(String::as_str)
        .unwrap_or(DEFAULT_IMPORT_OUTPUT_PATH);

    match import_station_csv(source, output) {
        Ok(report) => {
            match serde_json::to_string_pretty(&report) {
                Ok(payload) => println!("{payload}"),
                Err(err) => eprintln!("failed to render import report: {err}"),
            }
            0
        }
        Err(err) => {
            eprintln!("import error: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let path = args
        .get(2)
        .map(String::as_str)
        .unwrap_or(DEFAULT_STATIONS_PATH);

    match validate_station_dataset(path) {
        Ok(report) => {
            for diag in &report.diagnostics {
                println!("{} [{}] {}", diag.severity, diag.context, diag.message);
            }
            println!(
                "{} diagnostics ({})",
                report.diagnostics.len(),
                if report.has_errors() { "errors present" } else { "no errors" }
            );
            if report.has_errors() {
                1
            } else {
                0
            }
        }
        Err(err) => {
            eprintln!("validate error: {err}");
            1
        }
    }
}

enum PlayInput {
    Tick,
    Line(String),
    Eof,
}

fn handle_play(args: &[String]) -> i32 {
    let language = match args.get(2) {
        Some(raw) => match GuessLanguage::parse(raw) {
            Some(language) => language,
            None => {
                eprintln!("unknown language '{raw}'; expected english, pinyin, chinese or abbreviation");
                return 2;
            }
        },
        None => GuessLanguage::English,
    };

    let registry = DataRegistry::load();
    if registry.is_empty() {
        eprintln!("no station data available; run `mrt-recall import <stations.csv>` first");
        return 1;
    }

    let mut session = GameSession::new(registry, language);
    println!(
        "Name all {} stations before the clock runs out. Language: {}.",
        session.total_stations(),
        language.as_str()
    );
    println!("Commands: /pause /resume /giveup /quit");
    session.start();

    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));

    let ticker_tx = tx.clone();
    let ticker_stop = Arc::clone(&stop);
    let ticker = thread::spawn(move || {
        while !ticker_stop.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_secs(1));
            if ticker_stop.load(Ordering::Relaxed) || ticker_tx.send(PlayInput::Tick).is_err() {
                break;
            }
        }
    });

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(PlayInput::Line(line)).is_err() {
                        return;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = tx.send(PlayInput::Eof);
    });

    let exit_code = play_loop(&mut session, &rx);

    stop.store(true, Ordering::Relaxed);
    let _ = ticker.join();
    exit_code
}

fn play_loop(session: &mut GameSession, rx: &mpsc::Receiver<PlayInput>) -> i32 {
    prompt(session);
    loop {
        let input = match rx.recv() {
            Ok(input) => input,
            Err(_) => return 0,
        };
        match input {
            PlayInput::Tick => {
                if let Some(SessionEvent::TimeExpired) = session.tick() {
                    println!();
                    println!("Time's up!");
                    reveal(session);
                    return 0;
                }
            }
            PlayInput::Line(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    prompt(session);
                    continue;
                }
                match trimmed {
                    "/quit" => return 0,
                    "/pause" => {
                        session.pause();
                        println!("Paused. /resume to continue.");
                    }
                    "/resume" => {
                        session.resume();
                        prompt(session);
                    }
                    "/giveup" => {
                        if session.give_up().is_some() {
                            println!("Given up.");
                            reveal(session);
                            return 0;
                        }
                    }
                    guess => {
                        if session.phase() == Phase::Paused {
                            println!("Paused; guesses are not accepted. /resume to continue.");
                            continue;
                        }
                        match session.submit_guess(guess) {
                            Some(SessionEvent::AlreadyFound { station }) => {
                                println!("Already found: {station}");
                            }
                            Some(SessionEvent::Victory) => {
                                println!(
                                    "Victory! All {} stations named with {} on the clock.",
                                    session.total_stations(),
                                    format_time(session.time_remaining_seconds())
                                );
                                return 0;
                            }
                            _ => {
                                let snapshot = session.snapshot();
                                match snapshot.last_guess {
                                    Some(feedback) if feedback.correct => {
                                        println!(
                                            "Correct: {} ({}/{})",
                                            feedback.station_name.unwrap_or_default(),
                                            snapshot.found_count,
                                            snapshot.total_stations
                                        );
                                    }
                                    _ => println!("Not a station."),
                                }
                            }
                        }
                        prompt(session);
                    }
                }
            }
            PlayInput::Eof => return 0,
        }
    }
}

fn prompt(session: &GameSession) {
    print!(
        "[{} {}/{}] > ",
        format_time(session.time_remaining_seconds()),
        session.found_count(),
        session.total_stations()
    );
    let _ = io::stdout().flush();
}

/// End-of-game reveal: every station grouped by line, with the ones the
/// player actually found marked. Revealed stations do not count as found.
fn reveal(session: &GameSession) {
    let snapshot = session.snapshot();
    println!(
        "Found {} of {} stations.",
        snapshot.found_count, snapshot.total_stations
    );
    for (line_name, stations) in session_line_groups(session) {
        println!("{line_name}");
        for (codes, name, found) in stations {
            let marker = if found { "+" } else { " " };
            println!("  {marker} [{codes}] {name}");
        }
    }
}

type RevealLine = (String, Vec<(String, String, bool)>);

fn session_line_groups(session: &GameSession) -> Vec<RevealLine> {
    session
        .registry()
        .line_groups()
        .iter()
        .map(|group| {
            let stations = group
                .stations
                .iter()
                .map(|station| {
                    (
                        station.codes.join("/"),
                        station.english_name.clone(),
                        session.is_found(&station.english_name),
                    )
                })
                .collect();
            (group.line_name.clone(), stations)
        })
        .collect()
}

fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
