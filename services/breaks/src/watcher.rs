//! Polling break-status watcher.
//!
//! Every tick the watcher re-evaluates the catalog against the wall clock,
//! publishes a [`BreakStatus`] and reports `break_started` / `break_ended`
//! transitions to a [`BreakEventSink`].

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::domain::repository::BreakEventSink;
use crate::domain::schedule::{compare_by_schedule, resolve_window};
use crate::domain::types::{
    BreakDefinition, BreakEvent, BreakEventKind, BreakStatus, ResolvedWindow,
};

pub struct BreakStatusWatcher<Tz: TimeZone> {
    tz: Tz,
    /// Active break seen on the previous tick.
    previous: Option<(Uuid, String)>,
    /// The first tick only records a baseline.
    primed: bool,
}

impl<Tz: TimeZone> BreakStatusWatcher<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            previous: None,
            primed: false,
        }
    }

    /// Evaluate `definitions` at `now`.
    ///
    /// When several breaks are active at once, the one that started most
    /// recently wins; equal starts fall back to schedule order. Events are
    /// produced only when the active break id differs from the previous tick.
    pub fn tick(
        &mut self,
        definitions: &[BreakDefinition],
        now: DateTime<Utc>,
    ) -> (BreakStatus, Vec<BreakEvent>) {
        let local_now = now.with_timezone(&self.tz);
        let active = definitions
            .iter()
            .map(|definition| (definition, resolve_window(definition, &local_now)))
            .filter(|(_, window)| window.contains(now))
            .max_by(|(a, wa), (b, wb)| {
                wa.start_time
                    .cmp(&wb.start_time)
                    .then_with(|| compare_by_schedule(b, a, &self.tz))
            });

        let current = active.map(|(definition, _)| (definition.id, definition.name.clone()));
        let events = self.transitions(current, now);

        let status = match active {
            Some((definition, ResolvedWindow { end_time, .. })) => {
                BreakStatus::active(definition.clone(), (end_time - now).num_milliseconds())
            }
            None => BreakStatus::idle(),
        };
        (status, events)
    }

    fn transitions(&mut self, current: Option<(Uuid, String)>, now: DateTime<Utc>) -> Vec<BreakEvent> {
        let previous = std::mem::replace(&mut self.previous, current.clone());
        if !std::mem::replace(&mut self.primed, true) {
            return Vec::new();
        }

        let previous_id = previous.as_ref().map(|(id, _)| *id);
        let current_id = current.as_ref().map(|(id, _)| *id);
        if previous_id == current_id {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some((break_id, break_name)) = previous {
            events.push(BreakEvent {
                kind: BreakEventKind::Ended,
                break_id,
                break_name,
                occurred_at: now,
            });
        }
        if let Some((break_id, break_name)) = current {
            events.push(BreakEvent {
                kind: BreakEventKind::Started,
                break_id,
                break_name,
                occurred_at: now,
            });
        }
        events
    }

    /// Drive [`Self::tick`] every `every` until the catalog sender is dropped.
    ///
    /// Publishes `BreakStatus::loading()` until the catalog delivers its first
    /// list. Sink failures are logged and do not stop the loop.
    pub async fn run<S: BreakEventSink>(
        mut self,
        mut catalog: watch::Receiver<Option<Vec<BreakDefinition>>>,
        status: watch::Sender<BreakStatus>,
        sink: S,
        every: Duration,
    ) {
        status.send_replace(BreakStatus::loading());
        if catalog.wait_for(Option::is_some).await.is_err() {
            return;
        }

        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                changed = catalog.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            let definitions = catalog.borrow_and_update().clone().unwrap_or_default();
            let (next, events) = self.tick(&definitions, Utc::now());
            status.send_replace(next);

            for event in events {
                tracing::info!(
                    kind = event.kind.as_str(),
                    break_id = %event.break_id,
                    name = %event.break_name,
                    "break transition"
                );
                if let Err(e) = sink.record(&event).await {
                    tracing::warn!(error = %e, kind = event.kind.as_str(), "failed to record break event");
                }
            }
        }
        tracing::info!("break catalog closed, status watcher stopped");
    }
}
