use strum::{AsRefStr, Display};
use time::OffsetDateTime;

/// Active days needed before a trend is computed.
pub const MIN_ACTIVE_DAYS: usize = 7;

#[derive(Display, AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum ToleranceStatus {
    Increasing,
    SlightIncrease,
    Improving,
    Stable,
}

#[derive(Display, AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    High,
    Moderate,
    Low,
    Good,
    Normal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToleranceAnalysis {
    pub status: ToleranceStatus,
    pub severity: Severity,
    /// Recent minus early average effect rating.
    pub effectiveness_change: f64,
    pub dosage_change_pct: f64,
    pub early_effectiveness: f64,
    pub recent_effectiveness: f64,
    pub early_dosage: f64,
    pub recent_dosage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToleranceReport {
    InsufficientData { active_days: usize },
    Analyzed {
        analysis: ToleranceAnalysis,
        recommendations: Vec<String>,
    },
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compares the first half of the series with the second half. Both series
/// are per active day, oldest first.
pub fn analyze_tolerance(effectiveness: &[f64], dosage: &[f64]) -> Option<ToleranceAnalysis> {
    if effectiveness.len() < 2 || dosage.len() < 2 {
        return None;
    }

    let (early_eff, recent_eff) = effectiveness.split_at(effectiveness.len() / 2);
    let (early_dose, recent_dose) = dosage.split_at(dosage.len() / 2);

    let early_effectiveness = mean(early_eff);
    let recent_effectiveness = mean(recent_eff);
    let early_dosage = mean(early_dose);
    let recent_dosage = mean(recent_dose);

    let effectiveness_change = recent_effectiveness - early_effectiveness;
    let dosage_change = recent_dosage - early_dosage;
    let dosage_change_pct = if early_dosage > 0.0 {
        dosage_change / early_dosage * 100.0
    } else {
        0.0
    };

    let (status, severity) = if effectiveness_change < -0.5 && dosage_change > 0.0 {
        let severity = if effectiveness_change < -1.0 {
            Severity::High
        } else {
            Severity::Moderate
        };
        (ToleranceStatus::Increasing, severity)
    } else if effectiveness_change < -0.3 {
        (ToleranceStatus::SlightIncrease, Severity::Low)
    } else if effectiveness_change > 0.3 {
        (ToleranceStatus::Improving, Severity::Good)
    } else {
        (ToleranceStatus::Stable, Severity::Normal)
    };

    Some(ToleranceAnalysis {
        status,
        severity,
        effectiveness_change,
        dosage_change_pct,
        early_effectiveness,
        recent_effectiveness,
        early_dosage,
        recent_dosage,
    })
}

pub fn tolerance_recommendations(
    analysis: &ToleranceAnalysis,
    methods_used: usize,
    average_daily_mg: f64,
) -> Vec<String> {
    let mut recommendations: Vec<String> = match (analysis.status, analysis.severity) {
        (ToleranceStatus::Increasing, Severity::High) => vec![
            "🔄 Consider a tolerance break, 3 to 7 days".into(),
            "📉 Reduce dosage by 25-50% when resuming".into(),
            "⏰ Space sessions at least 2-3 hours apart".into(),
        ],
        (ToleranceStatus::Increasing, _) => vec![
            "⚠️ Monitor tolerance closely and consider micro-dosing".into(),
            "🔄 Alternate strains between sessions".into(),
            "📊 Rate the effect of every session".into(),
        ],
        (ToleranceStatus::SlightIncrease, _) => vec![
            "📉 Consider reducing dosage slightly (10-20%)".into(),
            "🌿 Try CBD-dominant strains".into(),
            "⏰ Take occasional rest days".into(),
        ],
        (ToleranceStatus::Improving, _) => vec![
            "✅ Current approach is working well".into(),
            "📊 Keep your current dosage and methods".into(),
        ],
        (ToleranceStatus::Stable, _) => vec![
            "✅ Tolerance appears stable".into(),
            "🔄 Consider rotating strains for variety".into(),
        ],
    };

    if methods_used == 1 {
        recommendations.push("🔄 Try alternating consumption methods".into());
    }

    if average_daily_mg > 50.0 {
        recommendations.push("⚠️ Daily intake is high, consider spreading doses out".into());
    }

    recommendations
}

impl super::Command {
    pub async fn tolerance_trend(
        &self,
        user_id: impl Into<String>,
        days: u32,
        now: OffsetDateTime,
    ) -> cannabot_shared::Result<ToleranceReport> {
        let user_id: String = user_id.into();
        let days = days.max(MIN_ACTIVE_DAYS as u32);
        let breakdown = self.daily_breakdown(&user_id, days, now).await?;
        let active = breakdown
            .iter()
            .filter(|d| d.sessions > 0)
            .collect::<Vec<_>>();

        if active.len() < MIN_ACTIVE_DAYS {
            return Ok(ToleranceReport::InsufficientData {
                active_days: active.len(),
            });
        }

        let effectiveness = active
            .iter()
            .filter_map(|d| d.average_effect)
            .collect::<Vec<_>>();
        let dosage = active.iter().map(|d| d.absorbed_mg).collect::<Vec<_>>();

        let Some(analysis) = analyze_tolerance(&effectiveness, &dosage) else {
            return Ok(ToleranceReport::InsufficientData {
                active_days: active.len(),
            });
        };

        let summary = self.summary(&user_id, days, now).await?;
        let recommendations = tolerance_recommendations(
            &analysis,
            summary.methods.len(),
            summary.total_absorbed_mg / days as f64,
        );

        Ok(ToleranceReport::Analyzed {
            analysis,
            recommendations,
        })
    }
}
