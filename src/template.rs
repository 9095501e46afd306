use chrono::{DateTime, Utc};
use diesel::{
    deserialize::FromSqlRow,
    expression::AsExpression,
    prelude::{Queryable, Selectable},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user;

#[derive(Clone, Debug, Deserialize, Serialize, Hash, PartialEq, Eq, FromSqlRow, AsExpression)]
#[diesel(sql_type = diesel::sql_types::Uuid)]
pub struct Id(Uuid);

messenger_crm::uuid_id!(Id);

/// Canned reply owned by a CRM user. Counts how often it was sent.
#[derive(Queryable, Selectable, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::message_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageTemplate {
    id: Id,
    creator_id: user::Id,
    name: String,
    content: String,
    category: Option<String>,
    usage_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MessageTemplate {
    pub const fn id(&self) -> &Id {
        &self.id
    }
}

#[cfg(test)]
impl MessageTemplate {
    pub const fn usage_count(&self) -> i32 {
        self.usage_count
    }

    pub fn new(id: Id, creator_id: user::Id, name: &str, content: &str) -> Self {
        let now = Utc::now();
        Self {
            id,
            creator_id,
            name: name.to_string(),
            content: content.to_string(),
            category: None,
            usage_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn used(self) -> Self {
        Self {
            usage_count: self.usage_count + 1,
            ..self
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDto {
    id: Id,
    name: String,
    content: String,
    category: Option<String>,
    usage_count: i32,
}

impl From<MessageTemplate> for TemplateDto {
    fn from(t: MessageTemplate) -> Self {
        Self {
            id: t.id,
            name: t.name,
            content: t.content,
            category: t.category,
            usage_count: t.usage_count,
        }
    }
}
