//! Broadcast reminder sweep over the context registry.

use plop_core::RegistryKind;
use plop_line::MessagingTransport;
use plop_store::ContextRegistry;

use crate::replies::{broadcast_failure, BROADCAST_DONE, GROUP_REMINDER_PREFIX};

/// Pushes `message` to every registered context: verbatim to user
/// contexts, prefixed with the group-reminder label otherwise.
///
/// Per-recipient failures are logged and skipped; only a failure to read
/// the registry itself aborts the sweep. The returned string is the
/// human-readable summary served by the trigger endpoints.
pub async fn run_reminder_sweep(
    registry: &dyn ContextRegistry,
    transport: &dyn MessagingTransport,
    message: &str,
) -> String {
    let entries = match registry.read_entries().await {
        Ok(entries) => entries,
        Err(error) => {
            tracing::error!(%error, "reminder sweep could not read the registry");
            return broadcast_failure(error);
        }
    };

    for entry in entries {
        let text = match entry.kind {
            RegistryKind::User => message.to_string(),
            RegistryKind::Group => format!("{GROUP_REMINDER_PREFIX}{message}"),
        };
        if let Err(error) = transport.push(&entry.context_id, &text).await {
            tracing::warn!(context_id = %entry.context_id, %error, "reminder push failed");
        }
    }
    BROADCAST_DONE.to_string()
}

#[cfg(test)]
mod tests {
    use plop_core::RegistryEntry;
    use plop_store::MemoryContextRegistry;

    use super::*;
    use crate::test_support::ScriptedTransport;

    fn registry() -> MemoryContextRegistry {
        MemoryContextRegistry::with_entries(vec![
            RegistryEntry {
                context_id: "U1".to_string(),
                kind: RegistryKind::User,
            },
            RegistryEntry {
                context_id: "G1".to_string(),
                kind: RegistryKind::Group,
            },
        ])
    }

    #[tokio::test]
    async fn users_get_the_message_verbatim_and_groups_get_the_prefix() {
        let transport = ScriptedTransport::new();
        let summary = run_reminder_sweep(&registry(), &transport, "早安！記得排便哦～").await;
        assert_eq!(summary, BROADCAST_DONE);
        assert_eq!(
            transport.pushes(),
            vec![
                ("U1".to_string(), "早安！記得排便哦～".to_string()),
                ("G1".to_string(), "群組提醒：早安！記得排便哦～".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn a_failing_recipient_does_not_abort_the_sweep() {
        let transport = ScriptedTransport::new();
        transport.fail_push_to("U1");
        let summary = run_reminder_sweep(&registry(), &transport, "msg").await;
        assert_eq!(summary, BROADCAST_DONE);
        assert_eq!(transport.pushes().len(), 1);
        assert_eq!(transport.pushes()[0].0, "G1");
    }

    #[tokio::test]
    async fn a_registry_read_failure_reports_total_failure() {
        let transport = ScriptedTransport::new();
        let broken = MemoryContextRegistry::new();
        broken.fail_reads();
        let summary = run_reminder_sweep(&broken, &transport, "msg").await;
        assert!(summary.starts_with("❌ 推播失敗："), "got: {summary}");
        assert!(transport.pushes().is_empty());
    }

    #[tokio::test]
    async fn an_empty_registry_still_reports_success() {
        let transport = ScriptedTransport::new();
        let summary =
            run_reminder_sweep(&MemoryContextRegistry::new(), &transport, "msg").await;
        assert_eq!(summary, BROADCAST_DONE);
        assert!(transport.pushes().is_empty());
    }
}
