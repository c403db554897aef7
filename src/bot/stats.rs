use cannabot_consumption::{Summary, ToleranceReport, ToleranceStatus, MIN_ACTIVE_DAYS};
use time::OffsetDateTime;

use super::{
    HandlerResult, StatsReport,
    embed::{Embed, Reply, color},
};

fn effect_label(average: Option<f64>) -> String {
    match average {
        Some(average) => format!("{average:.1}/5"),
        None => "Not rated".to_owned(),
    }
}

fn patterns(summary: &Summary) -> String {
    let favorite_method = summary
        .methods
        .first()
        .map(|(method, count)| {
            let share = *count as f64 / summary.sessions.max(1) as f64 * 100.0;
            format!("{} {method} ({share:.0}%)", method.emoji())
        })
        .unwrap_or_else(|| "None yet".to_owned());

    let top_strain = summary
        .strains
        .first()
        .map(|(strain, _)| strain.clone())
        .unwrap_or_else(|| "None yet".to_owned());

    format!(
        "**Favorite Method:** {favorite_method}\n**Top Strain:** {top_strain}\n**Average Effect:** {}",
        effect_label(summary.average_effect)
    )
}

pub async fn reply(
    cmd: &cannabot_consumption::Command,
    user_id: &str,
    report: StatsReport,
    now: OffsetDateTime,
) -> HandlerResult {
    let embed = match report {
        StatsReport::Dashboard => {
            let summary = cmd.summary(user_id, 30, now).await?;
            let per_session = if summary.sessions > 0 {
                summary.total_absorbed_mg / summary.sessions as f64
            } else {
                0.0
            };

            let user = cmd.ensure_user(user_id).await?;
            let today = cmd.daily_total(&user, now).await?;
            let limit = match cmd.daily_limit(&user) {
                Some(limit) => format!("{today:.1}mg / {limit}mg"),
                None => format!("{today:.1}mg (no limit set)"),
            };

            Embed::new("📊 Your Cannabis Dashboard", color::BLUE)
                .description("Overview of the last 30 days")
                .field(
                    "📈 Last 30 Days",
                    format!(
                        "**Sessions:** {}\n**Total THC:** {:.1}mg\n**Avg/Session:** {per_session:.1}mg\n**Days Active:** {}",
                        summary.sessions, summary.total_absorbed_mg, summary.active_days
                    ),
                    true,
                )
                .field("🎯 Your Patterns", patterns(&summary), true)
                .field("📅 Today", limit, false)
        }
        StatsReport::Weekly => {
            let days = cmd.daily_breakdown(user_id, 7, now).await?;
            let total = days.iter().map(|d| d.absorbed_mg).sum::<f64>();

            days.iter()
                .fold(
                    Embed::new("📅 Weekly Report", color::GREEN)
                        .description(format!("Your past 7 days, {total:.1}mg absorbed THC")),
                    |embed, day| {
                        let sessions = match day.sessions {
                            1 => "1 session".to_owned(),
                            n => format!("{n} sessions"),
                        };
                        embed.field(
                            format!("{} {}", day.date.weekday(), day.date),
                            format!("{sessions}\n{:.1}mg THC", day.absorbed_mg),
                            true,
                        )
                    },
                )
        }
        StatsReport::Monthly => {
            let trend = cmd.monthly_trend(user_id, now).await?;
            let change = match trend.change_pct() {
                Some(pct) if pct >= 0.0 => format!("📈 +{pct:.0}% vs previous 30 days"),
                Some(pct) => format!("📉 {pct:.0}% vs previous 30 days"),
                None => "No data for the previous 30 days yet".to_owned(),
            };

            Embed::new("📊 Monthly Trends", color::PURPLE)
                .description("Last 30 days against the 30 before")
                .field("Trend", change, false)
                .field(
                    "Last 30 Days",
                    format!(
                        "{} sessions\n{:.1}mg THC",
                        trend.current_sessions, trend.current_mg
                    ),
                    true,
                )
                .field(
                    "Previous 30 Days",
                    format!(
                        "{} sessions\n{:.1}mg THC",
                        trend.previous_sessions, trend.previous_mg
                    ),
                    true,
                )
        }
        StatsReport::Insights => match cmd.tolerance_trend(user_id, 30, now).await? {
            ToleranceReport::InsufficientData { active_days } => {
                Embed::new("🧠 Insights", color::ORANGE).description(format!(
                    "Log sessions with an effect rating on at least {MIN_ACTIVE_DAYS} different days to unlock tolerance insights ({active_days} so far)."
                ))
            }
            ToleranceReport::Analyzed {
                analysis,
                recommendations,
            } => {
                let status = match analysis.status {
                    ToleranceStatus::Increasing => "🔺 Tolerance increasing",
                    ToleranceStatus::SlightIncrease => "↗️ Slight tolerance increase",
                    ToleranceStatus::Improving => "✅ Effectiveness improving",
                    ToleranceStatus::Stable => "➖ Tolerance stable",
                };

                Embed::new("🧠 Insights", color::ORANGE)
                    .description(format!("{status} ({} severity)", analysis.severity))
                    .field(
                        "Effectiveness",
                        format!(
                            "{:.1} → {:.1} ({:+.1})",
                            analysis.early_effectiveness,
                            analysis.recent_effectiveness,
                            analysis.effectiveness_change
                        ),
                        true,
                    )
                    .field(
                        "Daily Dose",
                        format!(
                            "{:.1}mg → {:.1}mg ({:+.0}%)",
                            analysis.early_dosage,
                            analysis.recent_dosage,
                            analysis.dosage_change_pct
                        ),
                        true,
                    )
                    .field("💡 Recommendations", recommendations.join("\n"), false)
            }
        },
    };

    Ok(Reply::private(embed))
}
