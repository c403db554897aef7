use cannabot_db::table::StashItem as StashTable;
use cannabot_shared::ProductType;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::{find_item, now};

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Removed {
    pub remaining: f64,
    /// The item reached zero and was deleted.
    pub emptied: bool,
}

impl super::Command {
    /// Takes `amount` out of an item. Nothing changes when the item is
    /// missing or holds less than `amount`.
    pub async fn remove(
        &self,
        user_id: impl Into<String>,
        product_type: ProductType,
        strain: Option<&str>,
        amount: f64,
    ) -> cannabot_shared::Result<Removed> {
        if amount <= 0.0 || !amount.is_finite() {
            cannabot_shared::user!("Amount must be greater than 0");
        }

        let user_id: String = user_id.into();
        let mut tx = self.write_db.begin().await?;

        let Some(item) = find_item(&mut *tx, &user_id, product_type, strain).await? else {
            let strain = strain.map(|s| format!(" ({})", s.trim())).unwrap_or_default();
            cannabot_shared::user!("No {product_type}{strain} found in your stash");
        };

        if item.amount + EPSILON < amount {
            cannabot_shared::user!(
                "Not enough {} in your stash, {} available",
                product_type,
                product_type.format_amount(item.amount)
            );
        }

        let remaining = item.amount - amount;
        let emptied = remaining <= EPSILON;

        let statement = if emptied {
            Query::delete()
                .from_table(StashTable::Table)
                .and_where(Expr::col(StashTable::Id).eq(item.id.as_str()))
                .build_sqlx(SqliteQueryBuilder)
        } else {
            Query::update()
                .table(StashTable::Table)
                .value(StashTable::Amount, remaining)
                .value(StashTable::UpdatedAt, now())
                .and_where(Expr::col(StashTable::Id).eq(item.id.as_str()))
                .build_sqlx(SqliteQueryBuilder)
        };

        let (sql, values) = statement;
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            product_type = %product_type,
            amount,
            remaining,
            emptied,
            "stash item depleted"
        );

        Ok(Removed {
            remaining: if emptied { 0.0 } else { remaining },
            emptied,
        })
    }
}
