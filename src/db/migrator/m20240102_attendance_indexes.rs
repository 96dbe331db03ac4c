use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_student_ts")
                    .table(Attendance::Table)
                    .col(Attendance::StudentId)
                    .col(Attendance::Ts)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_device_id")
                    .table(Attendance::Table)
                    .col(Attendance::DeviceId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_attendance_device_id")
                    .table(Attendance::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_attendance_student_ts")
                    .table(Attendance::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    StudentId,
    Ts,
    DeviceId,
}
