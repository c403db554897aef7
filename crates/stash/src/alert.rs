use cannabot_db::table::StashAlert;
use cannabot_shared::ProductType;
use sea_query::{Expr, ExprTrait, OnConflict, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Alert {
    pub product_type: sqlx::types::Text<ProductType>,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LowStock {
    pub product_type: ProductType,
    pub total: f64,
    pub threshold: f64,
}

impl LowStock {
    pub fn message(&self) -> String {
        format!(
            "⚠️ Low {}: {} remaining",
            self.product_type,
            self.product_type.format_amount(self.total)
        )
    }
}

impl super::Command {
    pub async fn set_alert(
        &self,
        user_id: impl Into<String>,
        product_type: ProductType,
        threshold: f64,
    ) -> cannabot_shared::Result<()> {
        if threshold < 0.0 || !threshold.is_finite() {
            cannabot_shared::user!("Threshold must be 0 or more");
        }

        let user_id: String = user_id.into();
        let statement = Query::insert()
            .into_table(StashAlert::Table)
            .columns([
                StashAlert::UserId,
                StashAlert::ProductType,
                StashAlert::Threshold,
            ])
            .values_panic([
                user_id.into(),
                product_type.to_string().into(),
                threshold.into(),
            ])
            .on_conflict(
                OnConflict::columns([StashAlert::UserId, StashAlert::ProductType])
                    .update_column(StashAlert::Threshold)
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        Ok(())
    }

    pub async fn alerts(&self, user_id: impl Into<String>) -> cannabot_shared::Result<Vec<Alert>> {
        let user_id: String = user_id.into();
        let statement = Query::select()
            .columns([StashAlert::ProductType, StashAlert::Threshold])
            .from(StashAlert::Table)
            .and_where(Expr::col(StashAlert::UserId).eq(user_id))
            .order_by(StashAlert::ProductType, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Alert, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    /// Product types whose total is at or below the user's threshold.
    pub async fn low_stock(
        &self,
        user_id: impl Into<String>,
    ) -> cannabot_shared::Result<Vec<LowStock>> {
        let user_id: String = user_id.into();
        let alerts = self.alerts(&user_id).await?;
        if alerts.is_empty() {
            return Ok(vec![]);
        }

        let totals = self.totals(&user_id).await?;

        Ok(alerts
            .into_iter()
            .filter_map(|alert| {
                let product_type = alert.product_type.0;
                let total = totals
                    .iter()
                    .find(|(t, _)| *t == product_type)
                    .map(|(_, total)| *total)
                    .unwrap_or(0.0);

                (total <= alert.threshold).then_some(LowStock {
                    product_type,
                    total,
                    threshold: alert.threshold,
                })
            })
            .collect())
    }
}
