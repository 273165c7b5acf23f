//! End-to-end dispatcher scenarios over in-memory stores and a scripted
//! transport: a group's day of logging, window queries, and the
//! broadcast sweep that follows.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone};
use chrono_tz::Asia::Taipei;
use chrono_tz::Tz;
use plop_core::{ContextKind, RegistryKind};
use plop_line::{MessagingTransport, ReplyPayload};
use plop_runtime::{run_reminder_sweep, DispatchOutcome, Dispatcher, InboundMessage};
use plop_store::{ContextRegistry, EventLogStore, MemoryContextRegistry, MemoryEventLog};

struct ScriptedTransport {
    display_names: Mutex<Vec<(String, String)>>,
    pushes: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    fn new(profiles: &[(&str, &str)]) -> Self {
        Self {
            display_names: Mutex::new(
                profiles
                    .iter()
                    .map(|(id, name)| (id.to_string(), name.to_string()))
                    .collect(),
            ),
            pushes: Mutex::new(Vec::new()),
        }
    }

    fn pushes(&self) -> Vec<(String, String)> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingTransport for ScriptedTransport {
    async fn reply(&self, _reply_token: &str, _payload: &ReplyPayload) -> anyhow::Result<()> {
        Ok(())
    }

    async fn push(&self, to: &str, text: &str) -> anyhow::Result<()> {
        self.pushes
            .lock()
            .unwrap()
            .push((to.to_string(), text.to_string()));
        Ok(())
    }

    async fn get_display_name(&self, user_id: &str) -> anyhow::Result<String> {
        self.display_names
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| id == user_id)
            .map(|(_, name)| name.clone())
            .ok_or_else(|| anyhow::anyhow!("no profile for {user_id}"))
    }
}

struct World {
    log: Arc<MemoryEventLog>,
    registry: Arc<MemoryContextRegistry>,
    transport: Arc<ScriptedTransport>,
    dispatcher: Dispatcher,
}

fn world(profiles: &[(&str, &str)]) -> World {
    let log = Arc::new(MemoryEventLog::new());
    let registry = Arc::new(MemoryContextRegistry::new());
    let transport = Arc::new(ScriptedTransport::new(profiles));
    let dispatcher = Dispatcher::new(
        Arc::clone(&log) as Arc<dyn EventLogStore>,
        Arc::clone(&registry) as Arc<dyn ContextRegistry>,
        Arc::clone(&transport) as Arc<dyn MessagingTransport>,
        Taipei,
        false,
    );
    World {
        log,
        registry,
        transport,
        dispatcher,
    }
}

fn at(hour: u32, minute: u32) -> DateTime<Tz> {
    Taipei.with_ymd_and_hms(2024, 6, 3, hour, minute, 0).unwrap()
}

fn message(kind: ContextKind, context_id: &str, user_id: &str, text: &str) -> InboundMessage {
    InboundMessage {
        context_kind: kind,
        context_id: context_id.to_string(),
        user_id: user_id.to_string(),
        reply_token: format!("rt-{user_id}"),
        text: text.to_string(),
    }
}

fn text_of(outcome: DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Reply(ReplyPayload::Text(text)) => text,
        other => panic!("expected a text reply, got {other:?}"),
    }
}

#[tokio::test]
async fn a_group_day_of_logging_queries_and_reminders() {
    let w = world(&[("U-alice", "Alice"), ("U-bob", "Bob")]);

    // Morning: Alice logs twice in the group, Bob once. Bob also logs once
    // in his private chat, which must not count toward the group board.
    for (user, hour) in [("U-alice", 8), ("U-bob", 9), ("U-alice", 10)] {
        let outcome = w
            .dispatcher
            .process(&message(ContextKind::Group, "G1", user, "💩"), at(hour, 0))
            .await;
        assert_eq!(text_of(outcome), "✅ 已紀錄你的大便！記得多喝水 💧");
    }
    w.dispatcher
        .process(&message(ContextKind::User, "U-bob", "U-bob", "大便"), at(10, 30))
        .await;

    // Ordinary chatter in the group stays silent.
    let chatter = w
        .dispatcher
        .process(&message(ContextKind::Group, "G1", "U-bob", "nice"), at(11, 0))
        .await;
    assert_eq!(chatter, DispatchOutcome::Ignored);

    // Noon: the day board ranks Alice over Bob, group records only.
    let board = w
        .dispatcher
        .process(&message(ContextKind::Group, "G1", "U-bob", "排行榜"), at(12, 0))
        .await;
    assert_eq!(
        text_of(board),
        "💩 今日群組大便排行榜：\n1. Alice - 2 次\n2. Bob - 1 次"
    );

    // Bob checks his personal tally in private: group + private records.
    let count = w
        .dispatcher
        .process(&message(ContextKind::User, "U-bob", "U-bob", "查詢"), at(12, 5))
        .await;
    assert_eq!(text_of(count), "📊 今天你已經大了 2 次便啦！");

    // Both contexts registered exactly once, with the coarse kinds.
    let entries = w.registry.snapshot();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].context_id, "G1");
    assert_eq!(entries[0].kind, RegistryKind::Group);
    assert_eq!(entries[1].context_id, "U-bob");
    assert_eq!(entries[1].kind, RegistryKind::User);

    // Evening: the reminder sweep reaches both, prefixing the group.
    let summary =
        run_reminder_sweep(w.registry.as_ref(), w.transport.as_ref(), "晚安前也別忘了便便唷！")
            .await;
    assert_eq!(summary, "✅ 推播完成");
    assert_eq!(
        w.transport.pushes(),
        vec![
            ("G1".to_string(), "群組提醒：晚安前也別忘了便便唷！".to_string()),
            ("U-bob".to_string(), "晚安前也別忘了便便唷！".to_string()),
        ]
    );
}

#[tokio::test]
async fn week_and_month_boards_span_days_within_their_windows() {
    let w = world(&[("U-alice", "Alice"), ("U-bob", "Bob")]);

    // Monday and Tuesday logs, queried on Wednesday afternoon. Each log
    // happens later in the day than the query hour, so the week window
    // (which keeps time-of-day) includes all of them.
    let days = [(3, "U-alice"), (3, "U-bob"), (4, "U-alice"), (5, "U-alice")];
    for (day, user) in days {
        let now = Taipei.with_ymd_and_hms(2024, 6, day, 16, 0, 0).unwrap();
        w.dispatcher
            .process(&message(ContextKind::Group, "G1", user, "💩"), now)
            .await;
    }

    let wednesday = Taipei.with_ymd_and_hms(2024, 6, 5, 15, 0, 0).unwrap();
    let week = w
        .dispatcher
        .process(&message(ContextKind::Group, "G1", "U-bob", "週排行"), wednesday)
        .await;
    assert_eq!(
        text_of(week),
        "📅 本週群組大便排行榜：\n1. Alice - 3 次\n2. Bob - 1 次"
    );

    let month = w
        .dispatcher
        .process(&message(ContextKind::Group, "G1", "U-bob", "月排行"), wednesday)
        .await;
    assert_eq!(
        text_of(month),
        "🗓️ 本月群組大便排行榜：\n1. Alice - 3 次\n2. Bob - 1 次"
    );
}

#[tokio::test]
async fn rooms_and_groups_keep_separate_leaderboards() {
    let w = world(&[("U-alice", "Alice")]);

    // Same conversation id under two different kinds; each board only
    // sees its own kind.
    w.dispatcher
        .process(&message(ContextKind::Group, "C1", "U-alice", "💩"), at(8, 0))
        .await;
    w.dispatcher
        .process(&message(ContextKind::Room, "C1", "U-alice", "💩"), at(9, 0))
        .await;

    let group_board = w
        .dispatcher
        .process(&message(ContextKind::Group, "C1", "U-alice", "排行榜"), at(12, 0))
        .await;
    assert_eq!(
        text_of(group_board),
        "💩 今日群組大便排行榜：\n1. Alice - 1 次"
    );

    let room_board = w
        .dispatcher
        .process(&message(ContextKind::Room, "C1", "U-alice", "排行榜"), at(12, 0))
        .await;
    assert_eq!(
        text_of(room_board),
        "💩 今日群組大便排行榜：\n1. Alice - 1 次"
    );
}

#[tokio::test]
async fn unknown_sender_still_logs_under_the_placeholder_name() {
    let w = world(&[]);
    w.dispatcher
        .process(&message(ContextKind::Group, "G1", "U-ghost", "💩"), at(8, 0))
        .await;

    let records = w.log.snapshot();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].actor_name, "未知使用者");

    let board = w
        .dispatcher
        .process(&message(ContextKind::Group, "G1", "U-ghost", "排行榜"), at(9, 0))
        .await;
    assert_eq!(
        text_of(board),
        "💩 今日群組大便排行榜：\n1. 未知使用者 - 1 次"
    );
}

#[tokio::test]
async fn help_is_stable_regardless_of_log_state() {
    let w = world(&[("U-alice", "Alice")]);
    let before = text_of(
        w.dispatcher
            .process(&message(ContextKind::User, "U-alice", "U-alice", "幫助"), at(8, 0))
            .await,
    );
    w.dispatcher
        .process(&message(ContextKind::User, "U-alice", "U-alice", "💩"), at(8, 5))
        .await;
    let after = text_of(
        w.dispatcher
            .process(&message(ContextKind::User, "U-alice", "U-alice", "使用說明"), at(8, 10))
            .await,
    );
    assert_eq!(before, after);
    assert!(before.contains("使用說明"));
}
