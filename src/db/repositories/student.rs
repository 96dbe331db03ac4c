use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::entities::students;
use crate::models::roster::Student;

impl From<students::Model> for Student {
    fn from(model: students::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            roll: model.roll,
            email: model.email,
            dept: model.dept,
            class_name: model.class_name,
            bluetooth_id: model.bluetooth_id,
        }
    }
}

pub struct StudentRepository {
    conn: DatabaseConnection,
}

impl StudentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Student>> {
        let rows = students::Entity::find()
            .order_by_asc(students::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list students")?;

        Ok(rows.into_iter().map(Student::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Student>> {
        let row = students::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query student by ID")?;

        Ok(row.map(Student::from))
    }

    /// Exact match on both roll and email.
    pub async fn find_by_credentials(&self, roll: &str, email: &str) -> Result<Option<Student>> {
        let row = students::Entity::find()
            .filter(students::Column::Roll.eq(roll))
            .filter(students::Column::Email.eq(email))
            .order_by_asc(students::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query student by credentials")?;

        Ok(row.map(Student::from))
    }

    pub async fn count(&self) -> Result<u64> {
        students::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count students")
    }
}
