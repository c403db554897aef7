mod add;
mod alert;
mod remove;

pub use add::*;
pub use alert::*;
pub use remove::*;

use std::ops::Deref;

use cannabot_db::table::StashItem as StashTable;
use cannabot_shared::ProductType;
use sea_query::{Expr, ExprTrait, Func, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteExecutor, prelude::FromRow};

#[derive(Debug, Clone, FromRow)]
pub struct StashItem {
    pub id: String,
    pub user_id: String,
    pub product_type: sqlx::types::Text<ProductType>,
    /// Empty when the item is not tied to a strain.
    pub strain: String,
    pub amount: f64,
    pub thc_percent: Option<f64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl StashItem {
    pub fn label(&self) -> String {
        let product_type = self.product_type.0;
        if self.strain.is_empty() {
            format!("{} {}", product_type.emoji(), product_type)
        } else {
            format!("{} {} ({})", product_type.emoji(), self.strain, product_type)
        }
    }
}

#[derive(Clone)]
pub struct Command(pub cannabot_shared::State);

impl Deref for Command {
    type Target = cannabot_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub fn new(state: cannabot_shared::State) -> Self {
        Self(state)
    }

    /// Every item of a user, grouped by product type.
    pub async fn list(
        &self,
        user_id: impl Into<String>,
    ) -> cannabot_shared::Result<Vec<StashItem>> {
        let user_id: String = user_id.into();
        let statement = select_items()
            .and_where(Expr::col(StashTable::UserId).eq(user_id))
            .order_by(StashTable::ProductType, Order::Asc)
            .order_by(StashTable::Strain, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, StashItem, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn find(
        &self,
        user_id: impl Into<String>,
        product_type: ProductType,
        strain: Option<&str>,
    ) -> cannabot_shared::Result<Option<StashItem>> {
        let user_id: String = user_id.into();

        find_item(&self.read_db, &user_id, product_type, strain).await
    }

    /// Total amount held per product type.
    pub async fn totals(
        &self,
        user_id: impl Into<String>,
    ) -> cannabot_shared::Result<Vec<(ProductType, f64)>> {
        let mut totals: Vec<(ProductType, f64)> = vec![];
        for item in self.list(user_id).await? {
            match totals.iter_mut().find(|(t, _)| *t == item.product_type.0) {
                Some((_, total)) => *total += item.amount,
                None => totals.push((item.product_type.0, item.amount)),
            }
        }

        Ok(totals)
    }
}

pub(crate) fn strain_key(strain: Option<&str>) -> String {
    strain.map(str::trim).unwrap_or_default().to_owned()
}

pub(crate) fn select_items() -> SelectStatement {
    Query::select()
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
        .from(StashTable::Table)
        .to_owned()
}

/// Strain names match case-insensitively.
pub(crate) async fn find_item<'e, E: SqliteExecutor<'e>>(
    executor: E,
    user_id: &str,
    product_type: ProductType,
    strain: Option<&str>,
) -> cannabot_shared::Result<Option<StashItem>> {
    let statement = select_items()
        .and_where(Expr::col(StashTable::UserId).eq(user_id))
        .and_where(Expr::col(StashTable::ProductType).eq(product_type.to_string()))
        .and_where(
            Expr::expr(Func::lower(Expr::col(StashTable::Strain)))
                .eq(strain_key(strain).to_lowercase()),
        )
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, StashItem, _>(&sql, values)
        .fetch_optional(executor)
        .await?)
}

pub(crate) fn now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
