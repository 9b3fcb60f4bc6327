/// Preview: replays a recorded game feed and prints the comment for each poll.
///
/// Usage: preview <replay.json> [--seed <n>] [--catalog <path>] [--config <path>] [--variants <n>]
///
/// The replay file holds the followed team, both team names and the
/// polled at-bat records in order:
///
///   { "team": "...", "home_team": "...", "away_team": "...", "at_bats": [ ... ] }

use baseball_narrative::core::pipeline::{Narrator, NarratorBuilder};
use baseball_narrative::core::render::{inning_text, outs_text};
use baseball_narrative::schema::game_state::{GameState, Half, PreviousGameState};
use baseball_narrative::schema::raw::RawAtBat;
use serde::Deserialize;
use std::path::Path;
use std::process;

#[derive(Debug, Deserialize)]
struct Replay {
    team: String,
    home_team: String,
    away_team: String,
    at_bats: Vec<RawAtBat>,
}

impl Replay {
    fn load(path: &Path) -> Result<Replay, String> {
        let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&text).map_err(|e| e.to_string())
    }

    /// The away side bats in the top half, the home side in the bottom.
    fn attacking_team(&self, half: Half) -> &str {
        match half {
            Half::Top => &self.away_team,
            Half::Bottom => &self.home_team,
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let replay_path = &args[1];
    let mut builder = Narrator::builder();
    let mut variants: usize = 0;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" if i + 1 < args.len() => {
                i += 1;
                match args[i].parse() {
                    Ok(seed) => builder = builder.seed(seed),
                    Err(_) => eprintln!("Ignoring invalid seed '{}'", args[i]),
                }
            }
            "--catalog" if i + 1 < args.len() => {
                i += 1;
                builder = builder.catalog_file(&args[i]);
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                builder = builder.config_file(&args[i]);
            }
            "--variants" if i + 1 < args.len() => {
                i += 1;
                variants = args[i].parse().unwrap_or(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let replay = match Replay::load(Path::new(replay_path)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("ERROR: Failed to load replay '{}': {}", replay_path, e);
            process::exit(1);
        }
    };

    let mut narrator = build_narrator(builder);
    let mut session = narrator.new_session();

    println!(
        "Replaying {} polls, following {} ({} @ {})",
        replay.at_bats.len(),
        replay.team,
        replay.away_team,
        replay.home_team
    );
    println!("Catalog: {} templates\n", narrator.catalog().len());

    let mut emitted = 0;
    for (n, raw) in replay.at_bats.iter().enumerate() {
        // Normalize once up front to learn which side is batting.
        let first_pass = match raw.normalize(&replay.team, "") {
            Ok(state) => state,
            Err(e) => {
                println!("[{:>3}] invalid snapshot: {}", n + 1, e);
                continue;
            }
        };
        let attacking = replay.attacking_team(first_pass.half);
        let state = match raw.normalize(&replay.team, attacking) {
            Ok(state) => state,
            Err(e) => {
                println!("[{:>3}] invalid snapshot: {}", n + 1, e);
                continue;
            }
        };

        let prev = session.previous().cloned();
        print!("[{:>3}] {}", n + 1, describe(&state));

        match narrator.observe(&mut session, &state) {
            Some(narration) => {
                emitted += 1;
                println!(
                    "\n      [{} / {} #{}] {}",
                    narration.category, narration.kind, narration.template_id, narration.text
                );
                if variants > 0 {
                    print_variants(&mut narrator, &state, prev.as_ref(), variants);
                }
            }
            None => println!("  (silent)"),
        }
    }

    println!("\n--- {} comments from {} polls ---", emitted, replay.at_bats.len());
}

fn build_narrator(builder: NarratorBuilder) -> Narrator {
    match builder.build() {
        Ok(n) => n,
        Err(e) => {
            eprintln!("ERROR: Failed to build narrator: {}", e);
            process::exit(1);
        }
    }
}

fn describe(state: &GameState) -> String {
    format!(
        "{} {} {} | {} : {}",
        inning_text(state.inning, state.half),
        outs_text(state.outs),
        state.score,
        state.batter_name,
        state.main_result
    )
}

fn print_variants(
    narrator: &mut Narrator,
    state: &GameState,
    prev: Option<&PreviousGameState>,
    count: usize,
) {
    for variant in narrator.generate_variants(state, prev, count) {
        println!("        ~ #{} {}", variant.template_id, variant.text);
    }
}

fn print_usage() {
    println!("Preview: replays a recorded game feed and prints the comment for each poll.");
    println!();
    println!("Usage: preview <replay.json> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --seed <n>        RNG seed (default: from config, else random)");
    println!("  --catalog <path>  RON catalog merged over the built-in one");
    println!("  --config <path>   RON settings file");
    println!("  --variants <n>    Also print n alternative picks per comment");
}
