//! User-facing reply text catalog.
//!
//! All error replies carry the ⚠️ marker; the transport never sees an
//! unhandled failure for a processed message.

use plop_core::Window;

pub const LOG_SUCCESS: &str = "✅ 已紀錄你的大便！記得多喝水 💧";
pub const KING_EGG: &str = "豪哥是gay";
pub const UNRECOGNIZED: &str = "⚠️ 指令無法辨識，請精準輸入或輸入「幫助」查看所有功能";

pub const MORNING_REMINDER: &str = "早安！記得排便哦～";
pub const NIGHT_REMINDER: &str = "晚安前也別忘了便便唷！";
pub const GROUP_REMINDER_PREFIX: &str = "群組提醒：";
pub const BROADCAST_DONE: &str = "✅ 推播完成";

pub const HELP_TEXT: &str = "📖 使用說明（需完整輸入指令）：\n\n\
【個人聊天功能】\n\
💩 大便 / 💩 → 記錄大便\n\
📊 查詢 → 今天大幾次\n\
📅 查詢本週 → 本週大幾次\n\
🗓️ 查詢本月 → 本月大幾次\n\n\
【群組功能】\n\
🏆 排行榜 → 今日群組排行\n\
📅 週排行 → 本週群組排行\n\
🗓️ 月排行 → 本月群組排行\n\n\
【通用彩蛋】\n\
🤡 兜不住屎 → {你} 愛吃大便";

pub fn broadcast_failure(error: impl std::fmt::Display) -> String {
    format!("❌ 推播失敗：{error}")
}

pub fn log_failure(error: impl std::fmt::Display) -> String {
    format!("⚠️ 寫入失敗：{error}")
}

pub fn query_failure(error: impl std::fmt::Display) -> String {
    format!("⚠️ 查詢失敗：{error}")
}

pub fn leaderboard_failure(window: Window, error: impl std::fmt::Display) -> String {
    match window {
        Window::Day => format!("⚠️ 排行榜查詢失敗：{error}"),
        Window::Week => format!("⚠️ 週排行查詢失敗：{error}"),
        Window::Month => format!("⚠️ 月排行查詢失敗：{error}"),
    }
}

pub fn self_count_reply(window: Window, count: usize) -> String {
    match window {
        Window::Day => format!("📊 今天你已經大了 {count} 次便啦！"),
        Window::Week => format!("📅 本週你總共大了 {count} 次便！"),
        Window::Month => format!("🗓️ 本月你總共大了 {count} 次便！"),
    }
}

pub fn feeder_egg(actor_name: &str) -> String {
    format!("{actor_name} 愛吃大便 💩")
}

/// Renders a numbered leaderboard, or the window's "no records yet" line.
pub fn leaderboard_reply(window: Window, entries: &[(String, u64)]) -> String {
    if entries.is_empty() {
        return match window {
            Window::Day => "📉 今天還沒有人在群組大便",
            Window::Week => "📉 本週還沒有群組大便紀錄",
            Window::Month => "📉 本月還沒有群組大便紀錄",
        }
        .to_string();
    }
    let header = match window {
        Window::Day => "💩 今日群組大便排行榜：",
        Window::Week => "📅 本週群組大便排行榜：",
        Window::Month => "🗓️ 本月群組大便排行榜：",
    };
    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(index, (name, count))| format!("{}. {name} - {count} 次", index + 1))
        .collect();
    format!("{header}\n{}", lines.join("\n"))
}
