use cannabot_db::table::ConsumptionEntry as EntryTable;
use cannabot_shared::{ConsumptionMethod, ProductType};
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;
use time::OffsetDateTime;
use validator::Validate;

use crate::{DEFAULT_THC_PERCENT, User, calculate_absorbed_thc};

#[derive(Validate)]
pub struct LogInput {
    pub method: ConsumptionMethod,
    /// Defaults to the product usually consumed with `method`.
    pub product_type: Option<ProductType>,
    #[validate(range(exclusive_min = 0.0, max = 10000.0))]
    pub amount: f64,
    #[validate(length(max = 100))]
    pub strain: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub thc_percent: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    #[validate(length(max = 100))]
    pub symptom: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub effect_rating: Option<u8>,
    pub auto_deduct: bool,
}

impl LogInput {
    pub fn new(method: ConsumptionMethod, amount: f64) -> Self {
        Self {
            method,
            product_type: None,
            amount,
            strain: None,
            thc_percent: None,
            notes: None,
            symptom: None,
            effect_rating: None,
            auto_deduct: true,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ConsumptionEntry {
    pub id: String,
    pub user_id: String,
    pub product_type: sqlx::types::Text<ProductType>,
    pub strain: Option<String>,
    pub amount: f64,
    pub thc_percent: Option<f64>,
    pub method: sqlx::types::Text<ConsumptionMethod>,
    pub absorbed_thc_mg: f64,
    pub notes: Option<String>,
    pub symptom: Option<String>,
    pub effect_rating: Option<u8>,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct Logged {
    pub entry: ConsumptionEntry,
    /// Things the user should know about, none of which stopped the log.
    pub warnings: Vec<String>,
    pub daily_total_mg: f64,
}

impl super::Command {
    pub async fn log(
        &self,
        user_id: impl Into<String>,
        input: LogInput,
    ) -> cannabot_shared::Result<Logged> {
        self.log_at(user_id, input, OffsetDateTime::now_utc()).await
    }

    pub async fn log_at(
        &self,
        user_id: impl Into<String>,
        input: LogInput,
        at: OffsetDateTime,
    ) -> cannabot_shared::Result<Logged> {
        input.validate()?;

        let user = self.ensure_user(user_id).await?;
        let product_type = input
            .product_type
            .unwrap_or_else(|| input.method.default_product());
        let strain = input
            .strain
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let mut warnings = vec![];
        let mut thc_percent = input.thc_percent;

        if thc_percent.is_none() && strain.is_some() {
            thc_percent = self
                .stash()
                .find(&user.id, product_type, strain.as_deref())
                .await?
                .and_then(|item| item.thc_percent);
        }

        if thc_percent.is_none() && !product_type.is_measured_in_mg() {
            thc_percent = Some(DEFAULT_THC_PERCENT);
            warnings.push(format!(
                "⚠️ THC percentage not specified, assuming {DEFAULT_THC_PERCENT}%"
            ));
        }

        let absorbed_thc_mg = calculate_absorbed_thc(
            product_type,
            input.amount,
            thc_percent.unwrap_or(DEFAULT_THC_PERCENT),
            input.method,
        );

        let id = ulid::Ulid::new().to_string();
        let statement = Query::insert()
            .into_table(EntryTable::Table)
            .columns([
                EntryTable::Id,
                EntryTable::UserId,
                EntryTable::ProductType,
                EntryTable::Strain,
                EntryTable::Amount,
                EntryTable::ThcPercent,
                EntryTable::Method,
                EntryTable::AbsorbedThcMg,
                EntryTable::Notes,
                EntryTable::Symptom,
                EntryTable::EffectRating,
                EntryTable::CreatedAt,
            ])
            .values_panic([
                id.clone().into(),
                user.id.clone().into(),
                product_type.to_string().into(),
                strain.clone().into(),
                input.amount.into(),
                thc_percent.into(),
                input.method.to_string().into(),
                absorbed_thc_mg.into(),
                input.notes.clone().into(),
                input.symptom.clone().into(),
                input.effect_rating.into(),
                at.unix_timestamp().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        tracing::info!(
            user_id = %user.id,
            method = %input.method,
            product_type = %product_type,
            amount = input.amount,
            absorbed_thc_mg,
            "consumption logged"
        );

        if input.auto_deduct {
            match self
                .stash()
                .remove(&user.id, product_type, strain.as_deref(), input.amount)
                .await
            {
                Ok(_) => {}
                Err(err) if err.is_user_facing() => {
                    warnings.push(format!("⚠️ Could not deduct from stash: {err}"));
                }
                Err(err) => return Err(err),
            }
        }

        let daily_total_mg = self.daily_total(&user, at).await?;
        if let Some(warning) = self.daily_limit_warning(&user, daily_total_mg) {
            warnings.push(warning);
        }

        for low in self.stash().low_stock(&user.id).await? {
            warnings.push(low.message());
        }

        let Some(entry) = self.find_entry(&id).await? else {
            cannabot_shared::bail!("consumption entry {id} missing after insert");
        };

        Ok(Logged {
            entry,
            warnings,
            daily_total_mg,
        })
    }

    pub async fn find_entry(&self, id: &str) -> cannabot_shared::Result<Option<ConsumptionEntry>> {
        let statement = select_entries()
            .and_where(Expr::col(EntryTable::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ConsumptionEntry, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    /// Entries created in `[start, end)`, oldest first.
    pub async fn entries_between(
        &self,
        user_id: &str,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> cannabot_shared::Result<Vec<ConsumptionEntry>> {
        let statement = select_entries()
            .and_where(Expr::col(EntryTable::UserId).eq(user_id))
            .and_where(Expr::col(EntryTable::CreatedAt).gte(start.unix_timestamp()))
            .and_where(Expr::col(EntryTable::CreatedAt).lt(end.unix_timestamp()))
            .order_by(EntryTable::CreatedAt, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ConsumptionEntry, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn recent(
        &self,
        user_id: &str,
        limit: u64,
    ) -> cannabot_shared::Result<Vec<ConsumptionEntry>> {
        let statement = select_entries()
            .and_where(Expr::col(EntryTable::UserId).eq(user_id))
            .order_by(EntryTable::CreatedAt, Order::Desc)
            .limit(limit)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ConsumptionEntry, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    /// Absorbed THC over the user's local calendar day containing `at`.
    pub async fn daily_total(&self, user: &User, at: OffsetDateTime) -> cannabot_shared::Result<f64> {
        let (start, end) = user.days_range(user.local(at).date(), 1);
        let entries = self.entries_between(&user.id, start, end).await?;

        Ok(entries.iter().map(|e| e.absorbed_thc_mg).sum())
    }

    /// Warns above 80% of the daily limit and again once it is exceeded.
    pub fn daily_limit_warning(&self, user: &User, total_mg: f64) -> Option<String> {
        let limit = self.daily_limit(user)?;

        if total_mg > limit {
            Some(format!(
                "⚠️ Daily limit exceeded! Consumed: {total_mg:.1}mg / Limit: {limit}mg"
            ))
        } else if total_mg > limit * 0.8 {
            Some(format!(
                "⚠️ Approaching daily limit! Remaining: {:.1}mg",
                limit - total_mg
            ))
        } else {
            None
        }
    }
}

fn select_entries() -> SelectStatement {
    Query::select()
        .columns([
            EntryTable::Id,
            EntryTable::UserId,
            EntryTable::ProductType,
            EntryTable::Strain,
            EntryTable::Amount,
            EntryTable::ThcPercent,
            EntryTable::Method,
            EntryTable::AbsorbedThcMg,
            EntryTable::Notes,
            EntryTable::Symptom,
            EntryTable::EffectRating,
            EntryTable::CreatedAt,
        ])
        .from(EntryTable::Table)
        .to_owned()
}
