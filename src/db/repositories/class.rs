use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};

use crate::entities::classes;
use crate::models::roster::Class;

impl From<classes::Model> for Class {
    fn from(model: classes::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            title: model.title,
        }
    }
}

pub struct ClassRepository {
    conn: DatabaseConnection,
}

impl ClassRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Class>> {
        let rows = classes::Entity::find()
            .order_by_asc(classes::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list classes")?;

        Ok(rows.into_iter().map(Class::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Class>> {
        let row = classes::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query class by ID")?;

        Ok(row.map(Class::from))
    }

    pub async fn count(&self) -> Result<u64> {
        classes::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count classes")
    }
}
