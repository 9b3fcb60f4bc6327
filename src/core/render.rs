/// Variable substitution of template bodies against a game state.
use crate::core::catalog::CommentTemplate;
use crate::core::template::{Placeholder, Template, TemplateSegment};
use crate::schema::game_state::{Bases, GameState, Half, PreviousGameState, Score};

const SCORED_MARKER: &str = "홈인";

/// Home run label from the number of runners aboard before the swing.
pub fn hr_type(on_base: &Bases) -> &'static str {
    match on_base.occupied_count() {
        0 => "솔로 홈런",
        1 => "투런 홈런",
        2 => "쓰리런 홈런",
        _ => "만루 홈런",
    }
}

/// RBI label from the play description and the score after the play.
pub fn run_type(full_result: &str, score: &Score) -> String {
    let runs = full_result.matches(SCORED_MARKER).count();
    if runs >= 2 {
        format!("{}타점 적시타", runs)
    } else if score.is_tied() {
        "동점타".to_string()
    } else {
        "적시타".to_string()
    }
}

/// How the batter was put out, read from either result text.
pub fn out_type(main_result: &str, full_result: &str) -> &'static str {
    let mentions = |word: &str| main_result.contains(word) || full_result.contains(word);
    if mentions("플라이") {
        if mentions("인필드") {
            "인필드 플라이"
        } else {
            "플라이"
        }
    } else if mentions("땅볼") {
        "땅볼"
    } else if mentions("라인드라이브") {
        "라인드라이브"
    } else {
        "아웃"
    }
}

/// "7회말", "3회초".
pub fn inning_text(inning: u32, half: Half) -> String {
    format!("{}회{}", inning, half.suffix())
}

/// "무사", "1사", "2사".
pub fn outs_text(outs: u8) -> String {
    match outs {
        0 => "무사".to_string(),
        n => format!("{}사", n),
    }
}

/// Korean particle pairs that depend on the preceding syllable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Josa {
    /// 이/가
    IGa,
    /// 을/를
    EulReul,
    /// 은/는
    EunNeun,
}

fn ends_with_batchim(word: &str) -> bool {
    match word.trim_end().chars().last() {
        Some(c @ '\u{AC00}'..='\u{D7A3}') => (c as u32 - 0xAC00) % 28 != 0,
        // Not a Hangul syllable: fall back to the consonant form.
        _ => true,
    }
}

/// Pick the particle form that follows `word`.
pub fn josa(word: &str, josa: Josa) -> &'static str {
    let batchim = ends_with_batchim(word);
    match (josa, batchim) {
        (Josa::IGa, true) => "이",
        (Josa::IGa, false) => "가",
        (Josa::EulReul, true) => "을",
        (Josa::EulReul, false) => "를",
        (Josa::EunNeun, true) => "은",
        (Josa::EunNeun, false) => "는",
    }
}

fn value(placeholder: Placeholder, state: &GameState, pre_play: &Bases) -> String {
    match placeholder {
        Placeholder::PlayerName => state.batter_name.clone(),
        Placeholder::PitcherName => state.pitcher_name.clone(),
        Placeholder::TeamName => state.team_name.clone(),
        Placeholder::AttackingTeamName => state.attacking_team_name.clone(),
        Placeholder::Score => state.score.to_string(),
        Placeholder::Inning => inning_text(state.inning, state.half),
        Placeholder::Outs => outs_text(state.outs),
        Placeholder::StrikeoutCount => state.strikeout_count.to_string(),
        Placeholder::HrType => hr_type(pre_play).to_string(),
        Placeholder::RunType => run_type(&state.full_result, &state.score),
        Placeholder::OutType => out_type(&state.main_result, &state.full_result).to_string(),
        Placeholder::PlayerJosaIga => josa(&state.batter_name, Josa::IGa).to_string(),
        Placeholder::PlayerJosaEulreul => josa(&state.batter_name, Josa::EulReul).to_string(),
        Placeholder::PitcherJosaIga => josa(&state.pitcher_name, Josa::IGa).to_string(),
        Placeholder::PitcherJosaEulreul => josa(&state.pitcher_name, Josa::EulReul).to_string(),
        Placeholder::TeamJosaIga => josa(&state.team_name, Josa::IGa).to_string(),
        Placeholder::TeamJosaEulreul => josa(&state.team_name, Josa::EulReul).to_string(),
        Placeholder::TeamJosaEunneun => josa(&state.team_name, Josa::EunNeun).to_string(),
    }
}

/// Render a parsed body. Unknown tokens are kept verbatim.
///
/// `pre_play` is the base occupancy before the play being narrated.
pub fn render_body(body: &Template, state: &GameState, pre_play: &Bases) -> String {
    let mut out = String::new();
    for segment in &body.segments {
        match segment {
            TemplateSegment::Literal(text) => out.push_str(text),
            TemplateSegment::Placeholder(p) => out.push_str(&value(*p, state, pre_play)),
            TemplateSegment::Unknown(name) => {
                log::warn!("template uses unknown placeholder {{{}}}", name);
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
    }
    out
}

/// Render a catalog template against the current state alone. The
/// state's own occupancy stands in for the pre-play bases.
pub fn render(template: &CommentTemplate, state: &GameState) -> String {
    render_body(&template.body, state, &state.on_base)
}

/// Render with the previous snapshot at hand, which supplies the
/// pre-play bases when present.
pub fn render_transition(
    template: &CommentTemplate,
    state: &GameState,
    prev: Option<&PreviousGameState>,
) -> String {
    let pre_play = prev.map_or(&state.on_base, |p| &p.on_base);
    render_body(&template.body, state, pre_play)
}
