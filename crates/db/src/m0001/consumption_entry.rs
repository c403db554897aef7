use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::ConsumptionEntry;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(ConsumptionEntry::Table)
        .col(
            ColumnDef::new(ConsumptionEntry::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(ConsumptionEntry::UserId)
                .string()
                .not_null()
                .string_len(32),
        )
        .col(
            ColumnDef::new(ConsumptionEntry::ProductType)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(
            ColumnDef::new(ConsumptionEntry::Strain)
                .string()
                .null()
                .string_len(100),
        )
        .col(ColumnDef::new(ConsumptionEntry::Amount).double().not_null())
        .col(ColumnDef::new(ConsumptionEntry::ThcPercent).double().null())
        .col(
            ColumnDef::new(ConsumptionEntry::Method)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(
            ColumnDef::new(ConsumptionEntry::AbsorbedThcMg)
                .double()
                .not_null(),
        )
        .col(
            ColumnDef::new(ConsumptionEntry::Notes)
                .string()
                .null()
                .string_len(500),
        )
        .col(
            ColumnDef::new(ConsumptionEntry::Symptom)
                .string()
                .null()
                .string_len(100),
        )
        .col(ColumnDef::new(ConsumptionEntry::EffectRating).tiny_integer().null())
        .col(
            ColumnDef::new(ConsumptionEntry::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(ConsumptionEntry::Table).to_owned()
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

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_consumption_entry_user_created")
        .table(ConsumptionEntry::Table)
        .col(ConsumptionEntry::UserId)
        .col(ConsumptionEntry::CreatedAt)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_consumption_entry_user_created")
        .table(ConsumptionEntry::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
