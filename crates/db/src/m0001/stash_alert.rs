use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::StashAlert;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(StashAlert::Table)
        .col(
            ColumnDef::new(StashAlert::UserId)
                .string()
                .not_null()
                .string_len(32),
        )
        .col(
            ColumnDef::new(StashAlert::ProductType)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(ColumnDef::new(StashAlert::Threshold).double().not_null())
        .primary_key(
            sea_query::Index::create()
                .col(StashAlert::UserId)
                .col(StashAlert::ProductType),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(StashAlert::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
