use cannabot_db::table::User as UserTable;
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;
use time::{Date, Duration, OffsetDateTime};
use time_tz::{TimeZone, ToTimezone, timezones};

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub timezone: String,
    pub max_daily_thc_mg: Option<f64>,
    pub created_at: i64,
}

impl User {
    /// `at` in the user's timezone, left in UTC when the name is unknown.
    pub fn local(&self, at: OffsetDateTime) -> OffsetDateTime {
        match timezones::get_by_name(&self.timezone) {
            Some(tz) => at.to_timezone(tz),
            None => at,
        }
    }

    /// First instant of the local calendar day `date`.
    pub fn day_start(&self, date: Date) -> OffsetDateTime {
        let midnight = date.midnight();
        let Some(tz) = timezones::get_by_name(&self.timezone) else {
            return midnight.assume_utc();
        };

        // Settle on the offset in force at local midnight, which differs from
        // the offset at UTC midnight around DST changes.
        let guess = midnight.assume_offset(midnight.assume_utc().to_timezone(tz).offset());
        midnight.assume_offset(guess.to_timezone(tz).offset())
    }

    /// Instants bounding the local days `first..first + days`.
    pub fn days_range(&self, first: Date, days: u32) -> (OffsetDateTime, OffsetDateTime) {
        let end = first
            .checked_add(Duration::days(days as i64))
            .unwrap_or(Date::MAX);

        (self.day_start(first), self.day_start(end))
    }
}

impl super::Command {
    pub async fn find_user(
        &self,
        user_id: impl Into<String>,
    ) -> cannabot_shared::Result<Option<User>> {
        let user_id: String = user_id.into();
        let statement = Query::select()
            .columns([
                UserTable::Id,
                UserTable::Timezone,
                UserTable::MaxDailyThcMg,
                UserTable::CreatedAt,
            ])
            .from(UserTable::Table)
            .and_where(Expr::col(UserTable::Id).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    /// Loads the user, registering them on first contact.
    pub async fn ensure_user(&self, user_id: impl Into<String>) -> cannabot_shared::Result<User> {
        let user_id: String = user_id.into();
        if let Some(user) = self.find_user(&user_id).await? {
            return Ok(user);
        }

        let statement = Query::insert()
            .into_table(UserTable::Table)
            .columns([UserTable::Id, UserTable::Timezone, UserTable::CreatedAt])
            .values_panic([
                user_id.clone().into(),
                "UTC".into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .on_conflict(OnConflict::column(UserTable::Id).do_nothing().to_owned())
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        tracing::info!(user_id = %user_id, "user registered");

        let Some(user) = self.find_user(&user_id).await? else {
            cannabot_shared::bail!("user {user_id} missing after insert");
        };

        Ok(user)
    }

    /// `None` clears the personal limit.
    pub async fn set_daily_limit(
        &self,
        user_id: impl Into<String>,
        max_daily_thc_mg: Option<f64>,
    ) -> cannabot_shared::Result<User> {
        if let Some(limit) = max_daily_thc_mg {
            if !(limit > 0.0 && limit <= 10_000.0) {
                cannabot_shared::user!("Daily limit must be between 0 and 10000mg");
            }
        }

        let user = self.ensure_user(user_id).await?;
        self.update_user(&user.id, UserTable::MaxDailyThcMg, max_daily_thc_mg.into())
            .await?;

        self.ensure_user(user.id).await
    }

    pub async fn set_timezone(
        &self,
        user_id: impl Into<String>,
        timezone: &str,
    ) -> cannabot_shared::Result<User> {
        let Some(tz) = timezones::get_by_name(timezone.trim()) else {
            cannabot_shared::user!("Unknown timezone `{}`", timezone.trim());
        };

        let user = self.ensure_user(user_id).await?;
        self.update_user(&user.id, UserTable::Timezone, tz.name().into())
            .await?;

        self.ensure_user(user.id).await
    }

    /// Personal limit, or the configured default.
    pub fn daily_limit(&self, user: &User) -> Option<f64> {
        user.max_daily_thc_mg.or(self.default_daily_limit)
    }

    async fn update_user(
        &self,
        user_id: &str,
        column: UserTable,
        value: sea_query::Expr,
    ) -> cannabot_shared::Result<()> {
        let statement = Query::update()
            .table(UserTable::Table)
            .value(column, value)
            .and_where(Expr::col(UserTable::Id).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        Ok(())
    }
}
