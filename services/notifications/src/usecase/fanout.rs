//! Notification fan-out: deliver one notification to every eligible device,
//! tally outcomes per recipient, prune dead tokens, then commit once.

use std::collections::BTreeMap;

use anyhow::anyhow;
use chrono::Utc;
use uuid::Uuid;

use canteen_domain::user::UserRole;

use crate::domain::repository::{DeliveryLogRepository, PushProvider, RecipientRepository};
use crate::domain::types::{
    DeliveryLog, DeliveryTally, FanoutReport, MULTICAST_BATCH_LIMIT, Notification, PushMessage,
    SendResult, StaleToken, is_permanently_invalid,
};
use crate::error::NotificationsServiceError;

pub struct FanoutUseCase<R, P, L>
where
    R: RecipientRepository,
    P: PushProvider,
    L: DeliveryLogRepository,
{
    pub recipients: R,
    pub provider: P,
    pub logs: L,
    pub target_role: UserRole,
    /// Clamped to `1..=MULTICAST_BATCH_LIMIT`.
    pub batch_size: usize,
}

impl<R, P, L> FanoutUseCase<R, P, L>
where
    R: RecipientRepository,
    P: PushProvider,
    L: DeliveryLogRepository,
{
    /// Run the fan-out for `notification`.
    ///
    /// Batches are sent one after another. Nothing is written until every
    /// batch has returned; a failed provider call aborts the run with no
    /// writes. Re-running is safe since logs are keyed per recipient.
    pub async fn execute(
        &self,
        notification: &Notification,
    ) -> Result<FanoutReport, NotificationsServiceError> {
        let recipients = self
            .recipients
            .eligible_recipients(self.target_role, notification.sender_id)
            .await?;

        let pairs: Vec<(Uuid, String)> = recipients
            .into_iter()
            .filter(|r| r.user_id != notification.sender_id)
            .flat_map(|r| {
                let user_id = r.user_id;
                r.tokens.into_iter().map(move |token| (user_id, token))
            })
            .collect();

        let mut report = FanoutReport {
            notification_id: notification.id,
            tokens: pairs.len(),
            ..Default::default()
        };
        if pairs.is_empty() {
            tracing::info!(notification_id = %notification.id, "no eligible push tokens");
            return Ok(report);
        }

        let message = PushMessage::for_notification(notification);
        let batch_size = self.batch_size.clamp(1, MULTICAST_BATCH_LIMIT);
        let mut tallies: BTreeMap<Uuid, DeliveryTally> = BTreeMap::new();
        let mut stale_tokens = Vec::new();

        for batch in pairs.chunks(batch_size) {
            let tokens: Vec<String> = batch.iter().map(|(_, token)| token.clone()).collect();
            let results = self.provider.send_multicast(&tokens, &message).await?;
            if results.len() != batch.len() {
                return Err(anyhow!(
                    "push provider returned {} results for {} tokens",
                    results.len(),
                    batch.len()
                )
                .into());
            }
            report.batches += 1;

            for ((user_id, token), result) in batch.iter().zip(&results) {
                tallies.entry(*user_id).or_default().record(result);
                match result {
                    SendResult::Delivered => report.delivered += 1,
                    SendResult::Failed { code } => {
                        report.failed += 1;
                        if is_permanently_invalid(code) {
                            stale_tokens.push(StaleToken {
                                user_id: *user_id,
                                token: token.clone(),
                            });
                        }
                    }
                }
            }
            tracing::debug!(
                notification_id = %notification.id,
                batch = report.batches,
                size = batch.len(),
                "push batch sent"
            );
        }

        let now = Utc::now();
        let logs: Vec<DeliveryLog> = tallies
            .into_iter()
            .map(|(user_id, tally)| DeliveryLog {
                notification_id: notification.id,
                user_id,
                success_count: tally.success_count,
                failure_count: tally.failure_count,
                errors: tally.errors.into(),
                updated_at: now,
            })
            .collect();
        report.recipients = logs.len();
        report.pruned = stale_tokens.len();

        self.logs.commit_fanout(&logs, &stale_tokens).await?;

        tracing::info!(
            notification_id = %notification.id,
            recipients = report.recipients,
            batches = report.batches,
            delivered = report.delivered,
            failed = report.failed,
            pruned = report.pruned,
            "notification fan-out complete"
        );
        Ok(report)
    }
}
