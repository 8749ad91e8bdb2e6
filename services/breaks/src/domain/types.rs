use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A recurring daily break window.
///
/// Only the local time of day of `start_time` and `end_time` matters; the
/// calendar date they carry is normalized away by [`super::schedule`]. A break
/// whose end time of day is not after its start wraps past midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakDefinition {
    pub id: Uuid,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Concrete bounds of one occurrence of a [`BreakDefinition`]. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ResolvedWindow {
    /// Left-inclusive, right-exclusive.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start_time <= instant && instant < self.end_time
    }
}

/// Longest accepted break name, in characters.
pub const MAX_BREAK_NAME_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakEventKind {
    Started,
    Ended,
}

impl BreakEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "break_started",
            Self::Ended => "break_ended",
        }
    }
}

/// Lifecycle transition observed by the status watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakEvent {
    pub kind: BreakEventKind,
    pub break_id: Uuid,
    pub break_name: String,
    pub occurred_at: DateTime<Utc>,
}

/// What the status watcher publishes every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakStatus {
    pub active_break: Option<BreakDefinition>,
    /// Milliseconds until the active break ends; 0 when none is active.
    pub time_remaining: i64,
    pub is_break_active: bool,
    /// No break catalog has been delivered yet.
    pub loading: bool,
}

impl BreakStatus {
    pub fn loading() -> Self {
        Self {
            active_break: None,
            time_remaining: 0,
            is_break_active: false,
            loading: true,
        }
    }

    pub fn idle() -> Self {
        Self {
            loading: false,
            ..Self::loading()
        }
    }

    pub fn active(definition: BreakDefinition, time_remaining: i64) -> Self {
        Self {
            active_break: Some(definition),
            time_remaining,
            is_break_active: true,
            loading: false,
        }
    }
}
