/// Live Game example: narrates the back half of a tight game.
///
/// A sequence: leadoff strikeout → tying double → go-ahead hit →
///             repeated poll → pinch-hit home run → game over.
///
/// Snapshots are built by hand here; a real feed would arrive as
/// upstream JSON and go through `Narrator::observe_json`.
///
/// Run with: cargo run --example live_game

use baseball_narrative::core::pipeline::Narrator;
use baseball_narrative::core::render::inning_text;
use baseball_narrative::core::session::GameSession;
use baseball_narrative::schema::game_state::{Bases, GameState, Half, Occupant, Score};

fn main() {
    let mut narrator = Narrator::builder()
        .seed(2024)
        .history_limit(5)
        .build()
        .expect("Failed to build narrator");
    let mut session = narrator.new_session();

    println!("========================================");
    println!("   LG 트윈스 vs 두산 베어스");
    println!("   [잠실, 8회초부터]");
    println!("========================================");
    println!();

    // --- Scene 1: leadoff strikeout, LG trailing 2:4 ---
    let mut state = GameState::opening("LG");
    state.inning = 8;
    state.half = Half::Top;
    state.score = Score::new(2, 4);
    state.outs = 1;
    state.attacking_team_name = "LG".to_string();
    state.pitcher_name = "김택연".to_string();
    state.batter_name = "홍창기".to_string();
    state.main_result = "헛스윙 삼진".to_string();
    state.strikeout_count = 7;
    play(&mut narrator, &mut session, &state);

    // --- Scene 2: two on, a double ties it ---
    state.batter_name = "오스틴".to_string();
    state.main_result = "좌중간 2루타".to_string();
    state.full_result = "오스틴 : 좌중간 2루타 (2루주자 신민재 홈인) (1루주자 문성주 홈인)".to_string();
    state.score = Score::new(4, 4);
    state.on_base = Bases {
        first: Occupant::Empty,
        second: Occupant::Runner("오스틴".to_string()),
        third: Occupant::Empty,
    };
    play(&mut narrator, &mut session, &state);

    // --- Scene 3: go-ahead single ---
    state.batter_name = "문보경".to_string();
    state.main_result = "중전 안타".to_string();
    state.full_result = "문보경 : 중전 안타 (2루주자 오스틴 홈인)".to_string();
    state.score = Score::new(5, 4);
    state.on_base = Bases {
        first: Occupant::Runner("문보경".to_string()),
        second: Occupant::Empty,
        third: Occupant::Empty,
    };
    play(&mut narrator, &mut session, &state);

    // --- Scene 4: the feed repeats itself ---
    play(&mut narrator, &mut session, &state);

    // --- Scene 5: pinch hitter goes deep ---
    state.batter_name = "김현수".to_string();
    state.original_batter = Some("박동원".to_string());
    state.main_result = "홈런".to_string();
    state.full_result = "김현수 : 우월 홈런 (1루주자 문보경 홈인)".to_string();
    state.score = Score::new(7, 4);
    state.on_base = Bases::empty();
    play(&mut narrator, &mut session, &state);

    session.finish();
    state.inning = 9;
    state.half = Half::Bottom;
    play(&mut narrator, &mut session, &state);

    println!("--- 최근 코멘트 ---");
    for narration in session.recent(5) {
        println!("  #{:<3} [{}] {}", narration.template_id, narration.category, narration.text);
    }
}

fn play(narrator: &mut Narrator, session: &mut GameSession, state: &GameState) {
    println!(
        "[{} {} | {} {}]",
        inning_text(state.inning, state.half),
        state.score,
        state.batter_name,
        state.main_result
    );
    match narrator.observe(session, state) {
        Some(narration) => println!("{}", narration.text),
        None => println!("(no comment)"),
    }
    println!();
}
