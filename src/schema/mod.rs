pub mod comment;
pub mod game_state;
pub mod raw;
