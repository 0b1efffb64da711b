//! Game session state machine: countdown, pause/resume, found-set tracking,
//! guess feedback and the win/lose/give-up transitions. The session owns its
//! state exclusively; collaborators drive it through the transition methods
//! and render from [SessionSnapshot] values.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::data::registry::DataRegistry;
use crate::game::index::GuessLanguage;

/// Countdown length: 15 minutes.
pub const GAME_DURATION_SECONDS: u32 = 15 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Won,
    GaveUp,
    TimedOut,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Won => "won",
            Self::GaveUp => "gave_up",
            Self::TimedOut => "timed_out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    Ended(EndReason),
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Ended(_) => "ended",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended(_))
    }
}

/// Discrete events emitted by transitions. The engine names the outcome; the
/// presentation layer decides how to surface it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    AlreadyFound { station: String },
    Victory,
    TimeExpired,
    GaveUp,
}

/// Structured feedback for the most recent guess. `station_name` is None for
/// a miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuessFeedback {
    pub station_name: Option<String>,
    pub correct: bool,
}

/// Immutable view of session state after a transition. The presentation
/// layer renders from snapshots instead of observing field mutation.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: &'static str,
    pub end_reason: Option<&'static str>,
    pub language: GuessLanguage,
    pub time_remaining_seconds: u32,
    pub found_count: usize,
    pub total_stations: usize,
    pub progress: f64,
    pub found_stations: Vec<String>,
    pub last_guess: Option<GuessFeedback>,
    /// True once the game ended without a win: every station is shown but
    /// revealed stations do not count toward the score.
    pub revealed: bool,
    pub data_available: bool,
}

#[derive(Debug)]
pub struct GameSession {
    registry: Arc<DataRegistry>,
    language: GuessLanguage,
    phase: Phase,
    time_remaining_seconds: u32,
    found_names: HashSet<String>,
    found_order: Vec<String>,
    last_guess: Option<GuessFeedback>,
}

impl GameSession {
    pub fn new(registry: Arc<DataRegistry>, language: GuessLanguage) -> GameSession {
        GameSession {
            registry,
            language,
            phase: Phase::NotStarted,
            time_remaining_seconds: GAME_DURATION_SECONDS,
            found_names: HashSet::new(),
            found_order: Vec::new(),
            last_guess: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The immutable data bundle this session plays against.
    pub fn registry(&self) -> &DataRegistry {
        &self.registry
    }

    pub fn language(&self) -> GuessLanguage {
        self.language
    }

    pub fn time_remaining_seconds(&self) -> u32 {
        self.time_remaining_seconds
    }

    pub fn found_count(&self) -> usize {
        self.found_order.len()
    }

    pub fn total_stations(&self) -> usize {
        self.registry.catalog().total_distinct()
    }

    pub fn is_found(&self, english_name: &str) -> bool {
        self.found_names.contains(english_name)
    }

    /// Change the answer language. Legal only before the game starts: the
    /// matching index and all typed progress are language-specific.
    pub fn select_language(&mut self, language: GuessLanguage) {
        if self.phase == Phase::NotStarted {
            self.language = language;
        }
    }

    /// Begin the countdown. No-op unless NotStarted, and no-op with an empty
    /// catalog (a zero-station game would be instantly won).
    pub fn start(&mut self) {
        if self.phase == Phase::NotStarted && self.total_stations() > 0 {
            self.phase = Phase::Running;
            self.time_remaining_seconds = GAME_DURATION_SECONDS;
        }
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
        }
    }

    /// Advance the clock by one second. Only ticks while Running; crossing
    /// zero ends the game and stops the clock, so the timer never goes
    /// negative and no tick survives a terminal state.
    pub fn tick(&mut self) -> Option<SessionEvent> {
        if self.phase != Phase::Running {
            return None;
        }
        self.time_remaining_seconds = self.time_remaining_seconds.saturating_sub(1);
        if self.time_remaining_seconds == 0 {
            self.phase = Phase::Ended(EndReason::TimedOut);
            return Some(SessionEvent::TimeExpired);
        }
        None
    }

    /// Evaluate a typed answer against the current language's index. Rejected
    /// (no state change, no feedback) while not Running.
    pub fn submit_guess(&mut self, text: &str) -> Option<SessionEvent> {
        if self.phase != Phase::Running {
            return None;
        }

        let station = match self.registry.guess_index().resolve(self.language, text) {
            Some(station) => station,
            None => {
                self.last_guess = Some(GuessFeedback {
                    station_name: None,
                    correct: false,
                });
                return None;
            }
        };

        let name = station.english_name.clone();
        if self.found_names.contains(&name) {
            return Some(SessionEvent::AlreadyFound { station: name });
        }

        self.found_names.insert(name.clone());
        self.found_order.push(name.clone());
        self.last_guess = Some(GuessFeedback {
            station_name: Some(name),
            correct: true,
        });

        if self.found_order.len() == self.total_stations() {
            self.phase = Phase::Ended(EndReason::Won);
            return Some(SessionEvent::Victory);
        }
        None
    }

    /// Concede: reveals every station without counting it as found.
    pub fn give_up(&mut self) -> Option<SessionEvent> {
        match self.phase {
            Phase::Running | Phase::Paused => {
                self.phase = Phase::Ended(EndReason::GaveUp);
                Some(SessionEvent::GaveUp)
            }
            _ => None,
        }
    }

    /// Return to NotStarted from any state, clearing found set, feedback and
    /// timer, optionally switching language.
    pub fn reset(&mut self, language: Option<GuessLanguage>) {
        if let Some(language) = language {
            self.language = language;
        }
        self.phase = Phase::NotStarted;
        self.time_remaining_seconds = GAME_DURATION_SECONDS;
        self.found_names.clear();
        self.found_order.clear();
        self.last_guess = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let total = self.total_stations();
        let found = self.found_order.len();
        let progress = if total > 0 {
            found as f64 / total as f64
        } else {
            0.0
        };
        let end_reason = match self.phase {
            Phase::Ended(reason) => Some(reason.as_str()),
            _ => None,
        };
        SessionSnapshot {
            phase: self.phase.as_str(),
            end_reason,
            language: self.language,
            time_remaining_seconds: self.time_remaining_seconds,
            found_count: found,
            total_stations: total,
            progress,
            found_stations: self.found_order.clone(),
            last_guess: self.last_guess.clone(),
            revealed: matches!(
                self.phase,
                Phase::Ended(EndReason::GaveUp) | Phase::Ended(EndReason::TimedOut)
            ),
            data_available: !self.registry.catalog().is_empty(),
        }
    }
}
