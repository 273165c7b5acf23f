//! Exact-match command vocabulary and the group-chat noise gate.

use crate::record::ContextKind;

/// Time window for count and leaderboard queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Day,
    Week,
    Month,
}

impl Window {
    /// How many ranked entries a leaderboard reply may carry.
    pub fn leaderboard_cap(&self) -> usize {
        match self {
            Self::Day => 3,
            Self::Week | Self::Month => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A recognized command tag.
pub enum Command {
    /// Append a new event record (`大便` / `💩`).
    LogEvent,
    /// Private-only per-user count.
    SelfCount(Window),
    /// Shared ranked count for the current context.
    Leaderboard(Window),
    /// `兜不住屎`: templated tease substituting the sender's name.
    EasterEggFeeder,
    /// `屎王` with the draw feature disabled, answered with a fixed line.
    EasterEggKing,
    /// `屎王` with the draw feature enabled, running the weighted draw.
    RandomDraw,
    Help,
}

/// Outcome of classifying one inbound text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Command(Command),
    /// Group/room message outside the allowed vocabulary, or a private-only
    /// trigger seen in a shared context. No reply, no side effect.
    Ignored,
    /// Private message that matched nothing; gets the fallback reply.
    Unrecognized,
}

/// Log triggers. Both tokens mean "log one event now"; the literal text is
/// stored as the record label.
pub const LOG_TRIGGERS: [&str; 2] = ["大便", "💩"];
pub const HELP_TRIGGERS: [&str; 3] = ["幫助", "help", "使用說明"];
/// The `屎王` trigger doubles as the draw command when that feature is on.
pub const KING_TRIGGER: &str = "屎王";

fn lookup(text: &str, draw_enabled: bool) -> Option<Command> {
    if LOG_TRIGGERS.contains(&text) {
        return Some(Command::LogEvent);
    }
    let command = match text {
        "查詢" => Command::SelfCount(Window::Day),
        "查詢本週" => Command::SelfCount(Window::Week),
        "查詢本月" => Command::SelfCount(Window::Month),
        "排行榜" => Command::Leaderboard(Window::Day),
        "週排行" | "周排行" => Command::Leaderboard(Window::Week),
        "月排行" => Command::Leaderboard(Window::Month),
        "兜不住屎" => Command::EasterEggFeeder,
        KING_TRIGGER if draw_enabled => Command::RandomDraw,
        KING_TRIGGER => Command::EasterEggKing,
        _ if HELP_TRIGGERS.contains(&text) => Command::Help,
        _ => return None,
    };
    Some(command)
}

/// Classifies trimmed message text for the given context.
///
/// Shared contexts (group/room) only react to the fixed vocabulary;
/// everything else is dropped without a reply so the bot stays quiet in
/// ordinary conversation. Private-only count triggers pass the vocabulary
/// gate but are still dropped in shared contexts rather than answered
/// with the unrecognized-command fallback.
pub fn classify(text: &str, context_kind: ContextKind, draw_enabled: bool) -> Classification {
    let matched = lookup(text, draw_enabled);
    if context_kind.is_shared() {
        return match matched {
            Some(Command::SelfCount(_)) | None => Classification::Ignored,
            Some(command) => Classification::Command(command),
        };
    }
    match matched {
        Some(command) => Classification::Command(command),
        None => Classification::Unrecognized,
    }
}
