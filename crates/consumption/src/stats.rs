use std::collections::HashMap;

use cannabot_shared::ConsumptionMethod;
use time::{Date, Duration, OffsetDateTime};

use crate::{ConsumptionEntry, User};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub days: u32,
    pub sessions: usize,
    pub total_absorbed_mg: f64,
    pub total_amount: f64,
    pub average_effect: Option<f64>,
    /// Most used first.
    pub methods: Vec<(ConsumptionMethod, usize)>,
    pub strains: Vec<(String, usize)>,
    pub active_days: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayTotal {
    pub date: Date,
    pub sessions: usize,
    pub absorbed_mg: f64,
    pub average_effect: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTrend {
    pub current_mg: f64,
    pub previous_mg: f64,
    pub current_sessions: usize,
    pub previous_sessions: usize,
}

impl MonthlyTrend {
    /// Percent change against the previous 30 days, `None` without history.
    pub fn change_pct(&self) -> Option<f64> {
        (self.previous_mg > 0.0)
            .then(|| (self.current_mg - self.previous_mg) / self.previous_mg * 100.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn average_effect(entries: &[&ConsumptionEntry]) -> Option<f64> {
    let ratings = entries
        .iter()
        .filter_map(|e| e.effect_rating)
        .map(f64::from)
        .collect::<Vec<_>>();

    if ratings.is_empty() {
        return None;
    }

    let average = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some((average * 10.0).round() / 10.0)
}

fn ranked<K: Eq + std::hash::Hash + Ord + Clone>(counts: HashMap<K, usize>) -> Vec<(K, usize)> {
    let mut counts = counts.into_iter().collect::<Vec<_>>();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// First local day of the window covering `days` days up to `now`.
fn first_day(user: &User, now: OffsetDateTime, days: u32) -> Date {
    user.local(now).date() - Duration::days(days.saturating_sub(1) as i64)
}

impl super::Command {
    pub async fn summary(
        &self,
        user_id: impl Into<String>,
        days: u32,
        now: OffsetDateTime,
    ) -> cannabot_shared::Result<Summary> {
        let days = days.max(1);
        let user = self.ensure_user(user_id).await?;
        let (start, end) = user.days_range(first_day(&user, now, days), days);
        let entries = self.entries_between(&user.id, start, end).await?;
        let entries = entries.iter().collect::<Vec<_>>();

        let mut methods = HashMap::new();
        let mut strains = HashMap::new();
        let mut active = std::collections::HashSet::new();
        for entry in &entries {
            *methods.entry(entry.method.0).or_insert(0) += 1;
            if let Some(strain) = &entry.strain {
                *strains.entry(strain.clone()).or_insert(0) += 1;
            }
            if let Ok(at) = OffsetDateTime::from_unix_timestamp(entry.created_at) {
                active.insert(user.local(at).date());
            }
        }

        Ok(Summary {
            days,
            sessions: entries.len(),
            total_absorbed_mg: round2(entries.iter().map(|e| e.absorbed_thc_mg).sum()),
            total_amount: round2(entries.iter().map(|e| e.amount).sum()),
            average_effect: average_effect(&entries),
            methods: ranked(methods),
            strains: ranked(strains),
            active_days: active.len(),
        })
    }

    /// One total per local day, oldest first, days without sessions included.
    pub async fn daily_breakdown(
        &self,
        user_id: impl Into<String>,
        days: u32,
        now: OffsetDateTime,
    ) -> cannabot_shared::Result<Vec<DayTotal>> {
        let days = days.max(1);
        let user = self.ensure_user(user_id).await?;
        let first = first_day(&user, now, days);
        let (start, end) = user.days_range(first, days);
        let entries = self.entries_between(&user.id, start, end).await?;

        let mut by_day: HashMap<Date, Vec<&ConsumptionEntry>> = HashMap::new();
        for entry in &entries {
            let at = OffsetDateTime::from_unix_timestamp(entry.created_at)
                .map_err(anyhow::Error::from)?;
            by_day.entry(user.local(at).date()).or_default().push(entry);
        }

        Ok((0..days as i64)
            .map(|offset| {
                let date = first + Duration::days(offset);
                let entries = by_day.remove(&date).unwrap_or_default();

                DayTotal {
                    date,
                    sessions: entries.len(),
                    absorbed_mg: round2(entries.iter().map(|e| e.absorbed_thc_mg).sum()),
                    average_effect: average_effect(&entries),
                }
            })
            .collect())
    }

    /// Last 30 days against the 30 before.
    pub async fn monthly_trend(
        &self,
        user_id: impl Into<String>,
        now: OffsetDateTime,
    ) -> cannabot_shared::Result<MonthlyTrend> {
        let user = self.ensure_user(user_id).await?;
        let first = first_day(&user, now, 30);
        let (current_start, current_end) = user.days_range(first, 30);
        let (previous_start, _) = user.days_range(first - Duration::days(30), 30);

        let current = self
            .entries_between(&user.id, current_start, current_end)
            .await?;
        let previous = self
            .entries_between(&user.id, previous_start, current_start)
            .await?;

        Ok(MonthlyTrend {
            current_mg: round2(current.iter().map(|e| e.absorbed_thc_mg).sum()),
            previous_mg: round2(previous.iter().map(|e| e.absorbed_thc_mg).sum()),
            current_sessions: current.len(),
            previous_sessions: previous.len(),
        })
    }
}
