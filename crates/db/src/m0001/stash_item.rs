use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::StashItem;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(StashItem::Table)
        .col(
            ColumnDef::new(StashItem::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(StashItem::UserId)
                .string()
                .not_null()
                .string_len(32),
        )
        .col(
            ColumnDef::new(StashItem::ProductType)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(
            ColumnDef::new(StashItem::Strain)
                .string()
                .not_null()
                .string_len(100)
                .default(""),
        )
        .col(ColumnDef::new(StashItem::Amount).double().not_null())
        .col(ColumnDef::new(StashItem::ThcPercent).double().null())
        .col(ColumnDef::new(StashItem::Notes).string().null().string_len(500))
        .col(ColumnDef::new(StashItem::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(StashItem::UpdatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(StashItem::Table).to_owned()
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

pub struct CreateUk1;

fn create_uk_1() -> IndexCreateStatement {
    Index::create()
        .name("uk_stash_item_user_product_strain")
        .table(StashItem::Table)
        .unique()
        .col(StashItem::UserId)
        .col(StashItem::ProductType)
        .col(StashItem::Strain)
        .to_owned()
}

fn drop_uk_1() -> IndexDropStatement {
    Index::drop()
        .name("uk_stash_item_user_product_strain")
        .table(StashItem::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateUk1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_uk_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_uk_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
