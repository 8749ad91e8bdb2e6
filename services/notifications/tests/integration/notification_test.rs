use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use canteen_domain::pagination::PageRequest;
use canteen_domain::user::UserRole;
use canteen_notifications::domain::repository::NotificationRepository;
use canteen_notifications::error::NotificationsServiceError;
use canteen_notifications::usecase::fanout::FanoutUseCase;
use canteen_notifications::usecase::notification::{
    CreateNotificationInput, CreateNotificationUseCase, GetDeliveryLogsUseCase,
    GetNotificationUseCase, ListNotificationsUseCase,
};

use crate::helpers::{
    DirectoryUser, InMemoryDirectory, MockNotificationRepo, MockPushProvider, notification_from,
};

fn input(title: &str, message: &str) -> CreateNotificationInput {
    CreateNotificationInput {
        title: title.to_owned(),
        message: message.to_owned(),
    }
}

// ── CreateNotificationUseCase ────────────────────────────────────────────────

#[tokio::test]
async fn should_create_notification_with_sender_name_from_directory() {
    let mut sender = DirectoryUser::with_role(UserRole::Staff, &[]);
    sender.name = "Ms. Lee".to_owned();
    let repo = MockNotificationRepo::default();
    let usecase = CreateNotificationUseCase {
        notifications: repo.clone(),
        users: InMemoryDirectory::new(vec![sender.clone()]),
    };

    let created = usecase
        .execute(
            sender.id,
            UserRole::Staff,
            input("  Sports day  ", "Bring water"),
        )
        .await
        .unwrap();

    assert_eq!(created.title, "Sports day");
    assert_eq!(created.sender_name, "Ms. Lee");
    assert_eq!(created.sender_role, UserRole::Staff);
    assert_eq!(repo.notifications.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_blank_title_and_message() {
    let sender = DirectoryUser::with_role(UserRole::Staff, &[]);
    let usecase = CreateNotificationUseCase {
        notifications: MockNotificationRepo::default(),
        users: InMemoryDirectory::new(vec![sender.clone()]),
    };

    let result = usecase
        .execute(sender.id, UserRole::Staff, input(" ", "Bring water"))
        .await;
    assert!(matches!(
        result,
        Err(NotificationsServiceError::InvalidNotification("title"))
    ));

    let result = usecase
        .execute(sender.id, UserRole::Staff, input("Sports day", ""))
        .await;
    assert!(matches!(
        result,
        Err(NotificationsServiceError::InvalidNotification("message"))
    ));
}

#[tokio::test]
async fn should_reject_overlong_title() {
    let sender = DirectoryUser::with_role(UserRole::Staff, &[]);
    let usecase = CreateNotificationUseCase {
        notifications: MockNotificationRepo::default(),
        users: InMemoryDirectory::new(vec![sender.clone()]),
    };

    let result = usecase
        .execute(sender.id, UserRole::Staff, input(&"x".repeat(121), "body"))
        .await;

    assert!(matches!(
        result,
        Err(NotificationsServiceError::InvalidNotification("title"))
    ));
}

#[tokio::test]
async fn should_reject_message_over_push_payload_budget() {
    let sender = DirectoryUser::with_role(UserRole::Staff, &[]);
    let repo = MockNotificationRepo::default();
    let usecase = CreateNotificationUseCase {
        notifications: repo.clone(),
        users: InMemoryDirectory::new(vec![sender.clone()]),
    };

    // 2000 characters, three bytes each.
    let result = usecase
        .execute(sender.id, UserRole::Staff, input("급식 안내", &"가".repeat(2000)))
        .await;

    assert!(matches!(
        result,
        Err(NotificationsServiceError::InvalidNotification("message"))
    ));
    assert!(repo.notifications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_require_known_sender() {
    let repo = MockNotificationRepo::default();
    let usecase = CreateNotificationUseCase {
        notifications: repo.clone(),
        users: InMemoryDirectory::default(),
    };

    let result = usecase
        .execute(Uuid::now_v7(), UserRole::Admin, input("Title", "Body"))
        .await;

    assert!(matches!(result, Err(NotificationsServiceError::SenderNotFound)));
    assert!(repo.notifications.lock().unwrap().is_empty());
}

// ── List / Get ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_newest_first_with_clamped_page() {
    let repo = MockNotificationRepo::default();
    let mut older = notification_from(Uuid::now_v7());
    older.created_at = Utc::now() - TimeDelta::hours(1);
    let newer = notification_from(Uuid::now_v7());
    repo.create(&older).await.unwrap();
    repo.create(&newer).await.unwrap();

    let usecase = ListNotificationsUseCase { repo: repo.clone() };
    let listed = usecase
        .execute(PageRequest {
            per_page: 1000,
            page: 0,
        })
        .await
        .unwrap();

    assert_eq!(listed.iter().map(|n| n.id).collect::<Vec<_>>(), vec![newer.id, older.id]);
    assert_eq!(
        *repo.last_page.lock().unwrap(),
        Some(PageRequest {
            per_page: 100,
            page: 1
        })
    );
}

#[tokio::test]
async fn should_return_not_found_for_unknown_notification() {
    let usecase = GetNotificationUseCase {
        repo: MockNotificationRepo::default(),
    };
    let result = usecase.execute(Uuid::now_v7()).await;
    assert!(matches!(
        result,
        Err(NotificationsServiceError::NotificationNotFound)
    ));
}

// ── GetDeliveryLogsUseCase ───────────────────────────────────────────────────

#[tokio::test]
async fn should_list_logs_written_by_fanout() {
    let students = vec![
        DirectoryUser::member(&["p1"]),
        DirectoryUser::member(&["p2"]),
    ];
    let directory = InMemoryDirectory::new(students);
    let repo = MockNotificationRepo::default();
    let notification = notification_from(Uuid::now_v7());
    repo.create(&notification).await.unwrap();

    FanoutUseCase {
        recipients: directory.clone(),
        provider: MockPushProvider::default(),
        logs: directory.clone(),
        target_role: UserRole::Member,
        batch_size: 500,
    }
    .execute(&notification)
    .await
    .unwrap();

    let logs = GetDeliveryLogsUseCase {
        notifications: repo,
        logs: directory,
    }
    .execute(notification.id)
    .await
    .unwrap();

    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| l.success_count == 1));
    assert!(logs.iter().all(|l| l.notification_id == notification.id));
}

#[tokio::test]
async fn should_not_list_logs_of_unknown_notification() {
    let result = GetDeliveryLogsUseCase {
        notifications: MockNotificationRepo::default(),
        logs: InMemoryDirectory::default(),
    }
    .execute(Uuid::now_v7())
    .await;

    assert!(matches!(
        result,
        Err(NotificationsServiceError::NotificationNotFound)
    ));
}
