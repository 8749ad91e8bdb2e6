use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use canteen_breaks_schema::{break_events, breaks};

use crate::domain::repository::{BreakEventSink, BreakRepository};
use crate::domain::types::{BreakDefinition, BreakEvent};
use crate::error::BreaksServiceError;

// ── Break repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBreakRepository {
    pub db: DatabaseConnection,
}

impl BreakRepository for DbBreakRepository {
    async fn list(&self) -> Result<Vec<BreakDefinition>, BreaksServiceError> {
        let models = breaks::Entity::find()
            .order_by_asc(breaks::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list breaks")?;
        Ok(models.into_iter().map(break_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BreakDefinition>, BreaksServiceError> {
        let model = breaks::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find break by id")?;
        Ok(model.map(break_from_model))
    }

    async fn create(&self, definition: &BreakDefinition) -> Result<(), BreaksServiceError> {
        let now = Utc::now();
        breaks::ActiveModel {
            id: Set(definition.id),
            name: Set(definition.name.clone()),
            start_time: Set(definition.start_time),
            end_time: Set(definition.end_time),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .context("create break")?;
        Ok(())
    }

    async fn update(&self, definition: &BreakDefinition) -> Result<bool, BreaksServiceError> {
        let result = breaks::Entity::update_many()
            .set(breaks::ActiveModel {
                name: Set(definition.name.clone()),
                start_time: Set(definition.start_time),
                end_time: Set(definition.end_time),
                updated_at: Set(Utc::now()),
                ..Default::default()
            })
            .filter(breaks::Column::Id.eq(definition.id))
            .exec(&self.db)
            .await
            .context("update break")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BreaksServiceError> {
        let result = breaks::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete break")?;
        Ok(result.rows_affected > 0)
    }
}

fn break_from_model(model: breaks::Model) -> BreakDefinition {
    BreakDefinition {
        id: model.id,
        name: model.name,
        start_time: model.start_time,
        end_time: model.end_time,
    }
}

// ── Break event log ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBreakEventLog {
    pub db: DatabaseConnection,
}

impl BreakEventSink for DbBreakEventLog {
    async fn record(&self, event: &BreakEvent) -> Result<(), BreaksServiceError> {
        break_events::ActiveModel {
            id: Set(Uuid::now_v7()),
            break_id: Set(event.break_id),
            break_name: Set(event.break_name.clone()),
            kind: Set(event.kind.as_str().to_owned()),
            occurred_at: Set(event.occurred_at),
        }
        .insert(&self.db)
        .await
        .context("insert break event")?;
        Ok(())
    }
}
