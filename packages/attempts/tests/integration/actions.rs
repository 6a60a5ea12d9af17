use crate::support::{TestTable, alice, count, row, update};
use attempts::{Animation, AttemptsError, Effect, Notification, Sound};
use common::{AttemptDetail, VerdictCode, Viewer};

mod rerun {
    use super::*;

    #[tokio::test]
    async fn rerun_resets_row_and_rearms_effects() {
        let mut table = TestTable::new(alice());
        table.controller.set_rows(vec![row(42, "alice", true)]);
        let mut accepted = update(42, VerdictCode::Accepted);
        accepted.balls = Some(100);
        accepted.time = Some(31);
        table.push(accepted);
        table.sent();

        table.controller.rerun(42).await.unwrap();
        let reset = table.controller.row(42).unwrap();
        assert_eq!(reset.verdict_code, VerdictCode::InQueue);
        assert_eq!(reset.balls, None);
        assert_eq!(reset.time, None);
        assert_eq!(table.api.calls(), ["rerun 42"]);
        assert!(table.sent().is_empty());
        assert_eq!(
            table.controller.sink().notifications,
            [Notification::Info("Attempt 42 queued for rerun".into())]
        );

        table.push(update(42, VerdictCode::InQueue));
        assert_eq!(table.controller.sink().sounds(), [Sound::Success]);

        table.push(update(42, VerdictCode::Running));
        table.push(update(42, VerdictCode::Accepted));
        assert_eq!(
            table.controller.sink().sounds(),
            [Sound::Success, Sound::Success]
        );
        assert_eq!(table.controller.sink().finished().len(), 2);
    }

    #[tokio::test]
    async fn failed_rerun_keeps_state_and_notifies() {
        let mut table = TestTable::new(alice());
        table.controller.set_rows(vec![row(5, "alice", true)]);
        table.push(update(5, VerdictCode::WrongAnswer));
        table.api.fail("rerun");

        let err = table.controller.rerun(5).await.unwrap_err();
        assert!(matches!(err, AttemptsError::Api(_)));
        assert_eq!(table.code(5), VerdictCode::WrongAnswer);

        let notifications = &table.controller.sink().notifications;
        assert_eq!(notifications.len(), 1);
        match &notifications[0] {
            Notification::Error(message) => assert!(message.contains("rerun attempt 5")),
            other => panic!("expected error notification, got {other:?}"),
        }

        table.push(update(5, VerdictCode::WrongAnswer));
        assert_eq!(table.controller.sink().sounds(), [Sound::Failure]);
    }

    #[tokio::test]
    async fn rerun_of_missing_row_skips_the_server() {
        let mut table = TestTable::new(alice());
        table.controller.set_rows(Vec::new());

        let err = table.controller.rerun(1).await.unwrap_err();
        assert!(matches!(err, AttemptsError::NotFound(1)));
        assert!(table.api.calls().is_empty());
    }
}

mod purchases {
    use super::*;

    #[tokio::test]
    async fn purchase_view_unlocks_effects_without_resubscribing() {
        let mut table = TestTable::new(alice());
        table.controller.set_rows(vec![row(9, "bob", false)]);
        table.sent();

        table.controller.purchase_view(9).await.unwrap();
        assert!(table.controller.row(9).unwrap().can_view);
        assert!(table.sent().is_empty());

        table.push(update(9, VerdictCode::CompilationError));
        assert!(table.controller.sink().effects.contains(&Effect::Animate {
            attempt_id: 9,
            animation: Animation::Failure,
        }));
    }

    #[tokio::test]
    async fn purchase_test_view_flips_flag() {
        let mut table = TestTable::new(alice());
        table.controller.set_rows(vec![row(9, "bob", false)]);

        table.controller.purchase_test_view(9).await.unwrap();
        let current = table.controller.row(9).unwrap();
        assert!(current.can_test_view);
        assert!(!current.can_view);
        assert!(matches!(
            table.controller.sink().notifications.as_slice(),
            [Notification::Info(_)]
        ));
        assert_eq!(table.api.calls(), ["purchase_test_view 9"]);
    }

    #[tokio::test]
    async fn failed_purchase_is_not_committed() {
        let mut table = TestTable::new(alice());
        table.controller.set_rows(vec![row(9, "bob", false)]);
        table.api.fail("purchase_view");

        assert!(table.controller.purchase_view(9).await.is_err());
        assert!(!table.controller.row(9).unwrap().can_view);
        assert_eq!(table.controller.sink().notifications.len(), 1);
    }
}

mod details {
    use super::*;

    fn detail(id: i32, author: &str) -> AttemptDetail {
        AttemptDetail {
            attempt: row(id, author, false),
            source_code: Some("fn main() {}".into()),
            error_log: None,
            tests: Vec::new(),
        }
    }

    #[tokio::test]
    async fn owner_can_open_detail() {
        let mut table = TestTable::new(alice());
        table.controller.set_rows(vec![row(3, "alice", false)]);
        table.api.add_detail(detail(3, "alice"));

        let opened = table.controller.open_detail(3).await.unwrap();
        assert_eq!(opened.source_code.as_deref(), Some("fn main() {}"));
        assert_eq!(table.api.calls(), ["attempt 3"]);
    }

    #[tokio::test]
    async fn stranger_is_refused_locally() {
        let mut table = TestTable::new(Viewer::user("mallory", "en"));
        table.controller.set_rows(vec![row(3, "alice", false)]);

        let err = table.controller.open_detail(3).await.unwrap_err();
        assert!(matches!(err, AttemptsError::Forbidden(3)));
        assert!(table.api.calls().is_empty());
        assert_eq!(table.controller.sink().notifications.len(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_is_surfaced() {
        let mut table = TestTable::new(Viewer::anonymous("en"));
        table.controller.set_rows(vec![row(4, "bob", true)]);

        let err = table.controller.open_detail(4).await.unwrap_err();
        assert!(matches!(err, AttemptsError::Api(_)));
        assert_eq!(table.controller.sink().notifications.len(), 1);
        assert_eq!(count(&table.sent(), "attempt-add"), 1);
    }
}
