use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use canteen_domain::time_of_day::{TimeOfDay, parse_time_of_day};

use crate::domain::repository::BreakRepository;
use crate::domain::schedule::{anchor_to_reference_day, compare_by_schedule, time_of_day};
use crate::domain::types::{BreakDefinition, MAX_BREAK_NAME_LEN};
use crate::error::BreaksServiceError;

// ── ListBreaks ───────────────────────────────────────────────────────────────

pub struct ListBreaksUseCase<R: BreakRepository, Tz: TimeZone> {
    pub repo: R,
    pub tz: Tz,
}

impl<R: BreakRepository, Tz: TimeZone> ListBreaksUseCase<R, Tz> {
    /// All breaks in daily schedule order.
    pub async fn execute(&self) -> Result<Vec<BreakDefinition>, BreaksServiceError> {
        let mut breaks = self.repo.list().await?;
        breaks.sort_by(|a, b| compare_by_schedule(a, b, &self.tz));
        Ok(breaks)
    }
}

// ── CreateBreak ──────────────────────────────────────────────────────────────

pub struct CreateBreakInput {
    pub name: String,
    /// `"HH:MM"` local time.
    pub start: String,
    /// `"HH:MM"` local time; may be earlier than `start` for overnight breaks.
    pub end: String,
}

pub struct CreateBreakUseCase<R: BreakRepository, Tz: TimeZone> {
    pub repo: R,
    pub tz: Tz,
}

impl<R: BreakRepository, Tz: TimeZone> CreateBreakUseCase<R, Tz> {
    pub async fn execute(
        &self,
        input: CreateBreakInput,
        now: DateTime<Utc>,
    ) -> Result<BreakDefinition, BreaksServiceError> {
        let name = validate_name(&input.name)?;
        let start = parse_field(&input.start, "start")?;
        let end = parse_field(&input.end, "end")?;
        if start == end {
            return Err(BreaksServiceError::InvalidBreakWindow);
        }

        let reference = now.with_timezone(&self.tz);
        let definition = BreakDefinition {
            id: Uuid::now_v7(),
            name,
            start_time: anchor_to_reference_day(start, &reference),
            end_time: anchor_to_reference_day(end, &reference),
        };
        self.repo.create(&definition).await?;
        tracing::info!(break_id = %definition.id, name = %definition.name, %start, %end, "break created");
        Ok(definition)
    }
}

// ── UpdateBreak ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateBreakInput {
    pub name: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

pub struct UpdateBreakUseCase<R: BreakRepository, Tz: TimeZone> {
    pub repo: R,
    pub tz: Tz,
}

impl<R: BreakRepository, Tz: TimeZone> UpdateBreakUseCase<R, Tz> {
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdateBreakInput,
        now: DateTime<Utc>,
    ) -> Result<BreakDefinition, BreaksServiceError> {
        let name = input.name.as_deref().map(validate_name).transpose()?;
        let start = input
            .start
            .as_deref()
            .map(|s| parse_field(s, "start"))
            .transpose()?;
        let end = input
            .end
            .as_deref()
            .map(|s| parse_field(s, "end"))
            .transpose()?;

        let mut definition = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(BreaksServiceError::BreakNotFound)?;

        let reference = now.with_timezone(&self.tz);
        if let Some(name) = name {
            definition.name = name;
        }
        if let Some(start) = start {
            definition.start_time = anchor_to_reference_day(start, &reference);
        }
        if let Some(end) = end {
            definition.end_time = anchor_to_reference_day(end, &reference);
        }
        if time_of_day(definition.start_time, &self.tz) == time_of_day(definition.end_time, &self.tz)
        {
            return Err(BreaksServiceError::InvalidBreakWindow);
        }

        if !self.repo.update(&definition).await? {
            return Err(BreaksServiceError::BreakNotFound);
        }
        tracing::info!(break_id = %definition.id, "break updated");
        Ok(definition)
    }
}

// ── DeleteBreak ──────────────────────────────────────────────────────────────

pub struct DeleteBreakUseCase<R: BreakRepository> {
    pub repo: R,
}

impl<R: BreakRepository> DeleteBreakUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), BreaksServiceError> {
        if !self.repo.delete(id).await? {
            return Err(BreaksServiceError::BreakNotFound);
        }
        tracing::info!(break_id = %id, "break deleted");
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, BreaksServiceError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_BREAK_NAME_LEN {
        return Err(BreaksServiceError::InvalidBreakName);
    }
    Ok(name.to_owned())
}

fn parse_field(text: &str, field: &'static str) -> Result<TimeOfDay, BreaksServiceError> {
    parse_time_of_day(text).ok_or(BreaksServiceError::InvalidTimeOfDay(field))
}
