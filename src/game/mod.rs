pub mod index;
pub mod lines;
pub mod session;

pub use index::{normalize_chinese, normalize_latin, GuessIndex, GuessLanguage};
pub use lines::{code_number, group_by_line, line_code, line_color, line_name, LineGroup, LINE_ORDER};
pub use session::{
    EndReason, GameSession, GuessFeedback, Phase, SessionEvent, SessionSnapshot,
    GAME_DURATION_SECONDS,
};
