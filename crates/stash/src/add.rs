use cannabot_db::table::StashItem as StashTable;
use cannabot_shared::ProductType;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use validator::Validate;

use crate::{StashItem, find_item, now, strain_key};

#[derive(Validate)]
pub struct AddInput {
    pub product_type: ProductType,
    #[validate(length(max = 100))]
    pub strain: Option<String>,
    #[validate(range(exclusive_min = 0.0, max = 100000.0))]
    pub amount: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub thc_percent: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl super::Command {
    /// Adds to the matching item or creates it.
    pub async fn add(
        &self,
        user_id: impl Into<String>,
        input: AddInput,
    ) -> cannabot_shared::Result<StashItem> {
        input.validate()?;

        let user_id: String = user_id.into();
        let strain = strain_key(input.strain.as_deref());
        let now = now();
        let mut tx = self.write_db.begin().await?;

        let existing =
            find_item(&mut *tx, &user_id, input.product_type, Some(strain.as_str())).await?;

        let statement = match &existing {
            Some(item) => {
                let mut statement = Query::update();
                statement
                    .table(StashTable::Table)
                    .value(StashTable::Amount, Expr::col(StashTable::Amount).add(input.amount))
                    .value(StashTable::UpdatedAt, now)
                    .and_where(Expr::col(StashTable::Id).eq(item.id.as_str()));

                if let Some(thc) = input.thc_percent {
                    statement.value(StashTable::ThcPercent, thc);
                }
                if let Some(notes) = &input.notes {
                    statement.value(StashTable::Notes, notes.as_str());
                }

                statement.build_sqlx(SqliteQueryBuilder)
            }
            None => Query::insert()
                .into_table(StashTable::Table)
                .columns([
                    StashTable::Id,
                    StashTable::UserId,
                    StashTable::ProductType,
                    StashTable::Strain,
                    StashTable::Amount,
                    StashTable::ThcPercent,
                    StashTable::Notes,
                    StashTable::CreatedAt,
                    StashTable::UpdatedAt,
                ])
                .values_panic([
                    ulid::Ulid::new().to_string().into(),
                    user_id.clone().into(),
                    input.product_type.to_string().into(),
                    strain.clone().into(),
                    input.amount.into(),
                    input.thc_percent.into(),
                    input.notes.clone().into(),
                    now.into(),
                    now.into(),
                ])
                .build_sqlx(SqliteQueryBuilder),
        };

        let (sql, values) = statement;
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let item = find_item(&mut *tx, &user_id, input.product_type, Some(strain.as_str())).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            product_type = %input.product_type,
            strain = %strain,
            amount = input.amount,
            merged = existing.is_some(),
            "stash item added"
        );

        let Some(item) = item else {
            cannabot_shared::bail!("stash item missing after write");
        };

        Ok(item)
    }

    /// Overwrites the amount of an item, creating it when missing. Zero
    /// removes it.
    pub async fn set_amount(
        &self,
        user_id: impl Into<String>,
        product_type: ProductType,
        strain: Option<&str>,
        amount: f64,
    ) -> cannabot_shared::Result<Option<StashItem>> {
        if !(0.0..=100000.0).contains(&amount) {
            cannabot_shared::user!("Amount must be between 0 and 100000");
        }

        let user_id: String = user_id.into();
        let existing = self.find(&user_id, product_type, strain).await?;

        match existing {
            Some(item) if amount == 0.0 => {
                let statement = Query::delete()
                    .from_table(StashTable::Table)
                    .and_where(Expr::col(StashTable::Id).eq(item.id.as_str()))
                    .to_owned();
                let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
                sqlx::query_with(&sql, values).execute(&self.write_db).await?;

                Ok(None)
            }
            Some(item) => {
                let statement = Query::update()
                    .table(StashTable::Table)
                    .value(StashTable::Amount, amount)
                    .value(StashTable::UpdatedAt, now())
                    .and_where(Expr::col(StashTable::Id).eq(item.id.as_str()))
                    .to_owned();
                let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
                sqlx::query_with(&sql, values).execute(&self.write_db).await?;

                self.find(&user_id, product_type, strain).await
            }
            None if amount == 0.0 => Ok(None),
            None => self
                .add(
                    user_id,
                    AddInput {
                        product_type,
                        strain: strain.map(str::to_owned),
                        amount,
                        thc_percent: None,
                        notes: None,
                    },
                )
                .await
                .map(Some),
        }
    }
}
