use sea_orm::DatabaseConnection;
use serde_json::json;
use uuid::Uuid;

use canteen_domain::user::UserRole;
use canteen_notifications::domain::types::{
    INVALID_ARGUMENT, INVALID_REGISTRATION_TOKEN, TOKEN_NOT_REGISTERED,
};
use canteen_notifications::error::NotificationsServiceError;
use canteen_notifications::infra::fcm::FcmPushProvider;
use canteen_notifications::state::{AppState, FanoutSettings};
use canteen_notifications::usecase::fanout::FanoutUseCase;

use crate::helpers::{DirectoryUser, InMemoryDirectory, MockPushProvider, notification_from};

fn fanout(
    directory: &InMemoryDirectory,
    provider: &MockPushProvider,
) -> FanoutUseCase<InMemoryDirectory, MockPushProvider, InMemoryDirectory> {
    FanoutUseCase {
        recipients: directory.clone(),
        provider: provider.clone(),
        logs: directory.clone(),
        target_role: UserRole::Member,
        batch_size: 500,
    }
}

// ── Batching ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_split_1200_tokens_into_three_calls() {
    let users: Vec<_> = (0..600)
        .map(|i| {
            let phone = format!("phone-{i}");
            let tablet = format!("tablet-{i}");
            DirectoryUser::member(&[phone.as_str(), tablet.as_str()])
        })
        .collect();
    let directory = InMemoryDirectory::new(users);
    let provider = MockPushProvider::default();

    let report = fanout(&directory, &provider)
        .execute(&notification_from(Uuid::now_v7()))
        .await
        .unwrap();

    assert_eq!(provider.call_sizes(), vec![500, 500, 200]);
    assert_eq!(report.batches, 3);
    assert_eq!(report.tokens, 1200);
    assert_eq!(report.delivered, 1200);
    assert_eq!(report.recipients, 600);
    assert_eq!(directory.log_count(), 600);
    assert_eq!(directory.commit_count(), 1);
}

#[tokio::test]
async fn should_clamp_batch_size() {
    let directory = InMemoryDirectory::new(vec![DirectoryUser::member(&["a", "b", "c"])]);
    let provider = MockPushProvider::default();
    let mut usecase = fanout(&directory, &provider);
    usecase.batch_size = 0;

    usecase
        .execute(&notification_from(Uuid::now_v7()))
        .await
        .unwrap();

    assert_eq!(provider.call_sizes(), vec![1, 1, 1]);
}

// ── Eligibility ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_not_notify_sender() {
    let sender = DirectoryUser::member(&["sender-phone"]);
    let other = DirectoryUser::member(&["other-phone"]);
    let directory = InMemoryDirectory::new(vec![sender.clone(), other.clone()]);
    let provider = MockPushProvider::default();
    let notification = notification_from(sender.id);

    fanout(&directory, &provider)
        .execute(&notification)
        .await
        .unwrap();

    assert_eq!(provider.sent_tokens(), vec!["other-phone"]);
    assert!(directory.log(notification.id, sender.id).is_none());
    assert!(directory.log(notification.id, other.id).is_some());
}

#[tokio::test]
async fn should_skip_other_roles_disabled_users_and_users_without_tokens() {
    let mut muted = DirectoryUser::member(&["muted-phone"]);
    muted.notifications_enabled = false;
    let staff = DirectoryUser::with_role(UserRole::Staff, &["staff-phone"]);
    let tokenless = DirectoryUser::member(&[]);
    let target = DirectoryUser::member(&["target-phone"]);
    let directory =
        InMemoryDirectory::new(vec![muted, staff, tokenless.clone(), target.clone()]);
    let provider = MockPushProvider::default();
    let notification = notification_from(Uuid::now_v7());

    let report = fanout(&directory, &provider)
        .execute(&notification)
        .await
        .unwrap();

    assert_eq!(provider.sent_tokens(), vec!["target-phone"]);
    assert_eq!(report.recipients, 1);
    assert!(directory.log(notification.id, tokenless.id).is_none());
}

#[tokio::test]
async fn should_do_nothing_without_eligible_tokens() {
    let directory = InMemoryDirectory::new(vec![
        DirectoryUser::member(&[]),
        DirectoryUser::with_role(UserRole::Admin, &["admin-phone"]),
    ]);
    let provider = MockPushProvider::default();

    let report = fanout(&directory, &provider)
        .execute(&notification_from(Uuid::now_v7()))
        .await
        .unwrap();

    assert!(provider.call_sizes().is_empty());
    assert_eq!(directory.commit_count(), 0);
    assert_eq!(report.batches, 0);
    assert_eq!(report.tokens, 0);
}

// ── Tallies and pruning ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_prune_only_the_dead_token() {
    let student = DirectoryUser::member(&["old-phone", "new-phone"]);
    let directory = InMemoryDirectory::new(vec![student.clone()]);
    let provider = MockPushProvider::failing(&[("old-phone", TOKEN_NOT_REGISTERED)]);
    let notification = notification_from(Uuid::now_v7());

    let report = fanout(&directory, &provider)
        .execute(&notification)
        .await
        .unwrap();

    assert_eq!(directory.tokens_of(student.id), vec!["new-phone"]);
    assert_eq!(report.pruned, 1);
    let log = directory.log(notification.id, student.id).unwrap();
    assert_eq!(log.success_count, 1);
    assert_eq!(log.failure_count, 1);
    assert_eq!(log.errors, vec![TOKEN_NOT_REGISTERED]);
}

#[tokio::test]
async fn should_prune_malformed_tokens_but_keep_transient_failures() {
    let student = DirectoryUser::member(&["garbage", "throttled", "fine"]);
    let directory = InMemoryDirectory::new(vec![student.clone()]);
    let provider = MockPushProvider::failing(&[
        ("garbage", INVALID_REGISTRATION_TOKEN),
        ("throttled", "messaging/message-rate-exceeded"),
    ]);
    let notification = notification_from(Uuid::now_v7());

    let report = fanout(&directory, &provider)
        .execute(&notification)
        .await
        .unwrap();

    assert_eq!(directory.tokens_of(student.id), vec!["throttled", "fine"]);
    assert_eq!(report.failed, 2);
    assert_eq!(report.pruned, 1);
    let log = directory.log(notification.id, student.id).unwrap();
    assert_eq!(
        log.errors,
        vec![INVALID_REGISTRATION_TOKEN, "messaging/message-rate-exceeded"]
    );
}

#[tokio::test]
async fn should_cap_recorded_errors_at_five() {
    let tokens: Vec<String> = (0..7).map(|i| format!("device-{i}")).collect();
    let token_refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
    let student = DirectoryUser::member(&token_refs);
    let directory = InMemoryDirectory::new(vec![student.clone()]);
    let failures: Vec<(&str, &str)> = token_refs
        .iter()
        .map(|t| (*t, "messaging/server-unavailable"))
        .collect();
    let provider = MockPushProvider::failing(&failures);
    let notification = notification_from(Uuid::now_v7());

    fanout(&directory, &provider)
        .execute(&notification)
        .await
        .unwrap();

    let log = directory.log(notification.id, student.id).unwrap();
    assert_eq!(log.failure_count, 7);
    assert_eq!(log.errors.len(), 5);
}

// ── Idempotence ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_merge_logs_when_run_twice() {
    let first = DirectoryUser::member(&["a1", "a2"]);
    let second = DirectoryUser::member(&["b1"]);
    let directory = InMemoryDirectory::new(vec![first.clone(), second.clone()]);
    let provider = MockPushProvider::default();
    let notification = notification_from(Uuid::now_v7());
    let usecase = fanout(&directory, &provider);

    usecase.execute(&notification).await.unwrap();
    usecase.execute(&notification).await.unwrap();

    assert_eq!(directory.log_count(), 2);
    assert_eq!(directory.commit_count(), 2);
    let log = directory.log(notification.id, first.id).unwrap();
    assert_eq!(log.success_count, 2);
    assert_eq!(log.failure_count, 0);
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_commit_nothing_when_a_batch_call_fails() {
    let users: Vec<_> = (0..3)
        .map(|i| {
            let token = format!("t{i}");
            DirectoryUser::member(&[token.as_str()])
        })
        .collect();
    let directory = InMemoryDirectory::new(users);
    let provider = MockPushProvider {
        fail_call: Some(1),
        failures: [("t0".to_owned(), TOKEN_NOT_REGISTERED.to_owned())].into(),
        ..Default::default()
    };
    let mut usecase = fanout(&directory, &provider);
    usecase.batch_size = 1;

    let result = usecase.execute(&notification_from(Uuid::now_v7())).await;

    assert!(matches!(result, Err(NotificationsServiceError::Internal(_))));
    assert_eq!(provider.call_sizes(), vec![1, 1]);
    assert_eq!(directory.commit_count(), 0);
    assert_eq!(directory.log_count(), 0);
    assert_eq!(directory.users.lock().unwrap()[0].tokens, vec!["t0"]);
}

#[tokio::test]
async fn should_reject_mismatched_provider_results() {
    let directory = InMemoryDirectory::new(vec![DirectoryUser::member(&["x", "y"])]);
    let provider = MockPushProvider {
        truncate_results: true,
        ..Default::default()
    };

    let result = fanout(&directory, &provider)
        .execute(&notification_from(Uuid::now_v7()))
        .await;

    assert!(matches!(result, Err(NotificationsServiceError::Internal(_))));
    assert_eq!(directory.commit_count(), 0);
}

// ── FCM provider ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_keep_tokens_when_fcm_rejects_the_payload() {
    let mut server = mockito::Server::new_async().await;
    let rejected = server
        .mock("POST", "/v1/projects/school-app/messages:send")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "error": {
                    "code": 400,
                    "message": "Message is too big",
                    "status": "INVALID_ARGUMENT",
                    "details": [{ "errorCode": "INVALID_ARGUMENT" }],
                }
            })
            .to_string(),
        )
        .expect(3)
        .create_async()
        .await;
    let first = DirectoryUser::member(&["a1", "a2"]);
    let second = DirectoryUser::member(&["b1"]);
    let directory = InMemoryDirectory::new(vec![first.clone(), second.clone()]);
    let usecase = FanoutUseCase {
        recipients: directory.clone(),
        provider: FcmPushProvider::new(
            reqwest::Client::new(),
            &server.url(),
            "school-app",
            "test-token".to_owned(),
            2,
        ),
        logs: directory.clone(),
        target_role: UserRole::Member,
        batch_size: 500,
    };
    let notification = notification_from(Uuid::now_v7());

    let report = usecase.execute(&notification).await.unwrap();

    rejected.assert_async().await;
    assert_eq!(report.failed, 3);
    assert_eq!(report.pruned, 0);
    assert_eq!(directory.tokens_of(first.id), vec!["a1", "a2"]);
    assert_eq!(directory.tokens_of(second.id), vec!["b1"]);
    let log = directory.log(notification.id, first.id).unwrap();
    assert_eq!(log.errors, vec![INVALID_ARGUMENT, INVALID_ARGUMENT]);
}

// ── Background trigger ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_run_spawned_fanout_to_completion_when_storage_fails() {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        push: FcmPushProvider::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            "school-app",
            "unused".to_owned(),
            1,
        ),
        fanout: FanoutSettings {
            target_role: UserRole::Member,
            batch_size: 500,
        },
    };

    state
        .spawn_fanout(notification_from(Uuid::now_v7()))
        .await
        .unwrap();
}
