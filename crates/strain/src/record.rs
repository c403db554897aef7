use std::collections::{BTreeMap, BTreeSet};

use strum::{AsRefStr, Display, EnumString, VariantArray};

pub const EFFECT_COLUMNS: &[&str] = &[
    "relaxed",
    "happy",
    "euphoric",
    "uplifted",
    "sleepy",
    "hungry",
    "talkative",
    "creative",
    "energetic",
    "focused",
    "giggly",
    "tingly",
    "aroused",
];

pub const MEDICAL_COLUMNS: &[&str] = &[
    "stress",
    "pain",
    "depression",
    "anxiety",
    "insomnia",
    "ptsd",
    "fatigue",
    "lack_of_appetite",
    "nausea",
    "headaches",
    "migraines",
    "inflammation",
    "muscle_spasms",
    "cramps",
    "arthritis",
    "seizures",
    "add/adhd",
    "bipolar_disorder",
    "fibromyalgia",
    "glaucoma",
];

pub const SIDE_EFFECT_COLUMNS: &[&str] = &[
    "dry_mouth",
    "dry_eyes",
    "dizzy",
    "paranoid",
    "anxious",
    "headache",
];

#[derive(
    EnumString, Display, VariantArray, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Hash,
)]
#[strum(ascii_case_insensitive)]
pub enum StrainType {
    Indica,
    Sativa,
    Hybrid,
}

impl StrainType {
    pub fn emoji(&self) -> &'static str {
        match self {
            StrainType::Indica => "🟣",
            StrainType::Sativa => "🟡",
            StrainType::Hybrid => "🟢",
        }
    }
}

/// One strain of the dataset. Scores are percentages in `[0, 100]`, keyed by
/// lower-cased snake_case names (`relaxed`, `dry_mouth`, `lack_of_appetite`).
#[derive(Debug, Clone, PartialEq)]
pub struct StrainRecord {
    pub name: String,
    pub strain_type: StrainType,
    pub thc_percent: Option<f64>,
    pub cbd_percent: Option<f64>,
    pub most_common_terpene: Option<String>,
    pub effect_scores: BTreeMap<String, f64>,
    pub medical_scores: BTreeMap<String, f64>,
    pub side_effect_scores: BTreeMap<String, f64>,
    pub medical_uses: BTreeSet<String>,
    pub description: String,
    pub image_url: Option<String>,
}

impl StrainRecord {
    pub fn new(name: impl Into<String>, strain_type: StrainType) -> Self {
        Self {
            name: name.into(),
            strain_type,
            thc_percent: None,
            cbd_percent: None,
            most_common_terpene: None,
            effect_scores: BTreeMap::new(),
            medical_scores: BTreeMap::new(),
            side_effect_scores: BTreeMap::new(),
            medical_uses: BTreeSet::new(),
            description: String::new(),
            image_url: None,
        }
    }

    pub fn thc(mut self, percent: f64) -> Self {
        self.thc_percent = Some(percent);
        self
    }

    pub fn cbd(mut self, percent: f64) -> Self {
        self.cbd_percent = Some(percent);
        self
    }

    pub fn effect(mut self, effect: &str, score: f64) -> Self {
        self.effect_scores.insert(normalize_key(effect), score);
        self
    }

    pub fn medical(mut self, condition: &str, score: f64) -> Self {
        let condition = normalize_key(condition);
        if score > 0.0 {
            self.medical_uses.insert(condition.clone());
        }
        self.medical_scores.insert(condition, score);
        self
    }

    pub fn side_effect(mut self, side_effect: &str, score: f64) -> Self {
        self.side_effect_scores
            .insert(normalize_key(side_effect), score);
        self
    }

    pub fn terpene(mut self, terpene: impl Into<String>) -> Self {
        self.most_common_terpene = Some(terpene.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn image_url(mut self, url: &str) -> Self {
        self.image_url = normalize_image_url(url);
        self
    }

    /// Score for an effect, 0 when the strain has no data for it.
    pub fn effect_score(&self, effect: &str) -> f64 {
        self.effect_scores
            .get(&normalize_key(effect))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn has_medical_use(&self, condition: &str) -> bool {
        self.medical_uses.contains(&normalize_key(condition))
    }

    /// Highest scoring entries of `scores`, zero scores left out.
    pub fn top_scores(scores: &BTreeMap<String, f64>, n: usize) -> Vec<(&str, f64)> {
        let mut entries = scores
            .iter()
            .filter(|(_, score)| **score > 0.0)
            .map(|(name, score)| (name.as_str(), *score))
            .collect::<Vec<_>>();

        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    pub fn top_effects(&self, n: usize) -> Vec<(&str, f64)> {
        Self::top_scores(&self.effect_scores, n)
    }

    pub fn thc_label(&self) -> String {
        match self.thc_percent {
            Some(thc) => format!("{thc:.0}%"),
            None => "Unknown".to_owned(),
        }
    }
}

/// Lower-cases a name and folds spaces and dashes to underscores.
pub fn normalize_key(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

const NULL_MARKERS: &[&str] = &["", "nan", "null", "[null]", "none", "n/a", "na", "-"];

pub(crate) fn is_null_marker(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    NULL_MARKERS.contains(&value.as_str())
}

/// Parses `66%`, `66`, `0.5 %` or a range such as `18-24%` (upper bound).
/// Null markers yield `Ok(None)`, anything else unparsable yields `Err(())`.
pub(crate) fn parse_percent(value: &str) -> Result<Option<f64>, ()> {
    if is_null_marker(value) {
        return Ok(None);
    }

    let value = value.trim().trim_end_matches('%').trim();
    let upper = match value.rsplit_once('-') {
        Some((lower, upper)) if !lower.trim().is_empty() => upper.trim().trim_end_matches('%'),
        _ => value,
    };

    let parsed = upper.trim().parse::<f64>().map_err(|_| ())?;
    if !parsed.is_finite() || !(0.0..=100.0).contains(&parsed) {
        return Err(());
    }

    Ok(Some(parsed))
}

/// Placeholder values and non-http URLs mean the strain has no image.
pub fn normalize_image_url(value: &str) -> Option<String> {
    let value = value.trim();
    if is_null_marker(value) {
        return None;
    }

    let lower = value.to_lowercase();
    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        return None;
    }

    Some(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_percent_forms() {
        assert_eq!(parse_percent("66%"), Ok(Some(66.0)));
        assert_eq!(parse_percent(" 66 "), Ok(Some(66.0)));
        assert_eq!(parse_percent("0.5 %"), Ok(Some(0.5)));
        assert_eq!(parse_percent("18-24%"), Ok(Some(24.0)));
        assert_eq!(parse_percent("18% - 24%"), Ok(Some(24.0)));
        assert_eq!(parse_percent("nan"), Ok(None));
        assert_eq!(parse_percent(""), Ok(None));
        assert_eq!(parse_percent("[null]"), Ok(None));
        assert_eq!(parse_percent("lots"), Err(()));
        assert_eq!(parse_percent("140%"), Err(()));
    }

    #[test]
    fn normalizes_placeholder_images() {
        assert_eq!(normalize_image_url("nan"), None);
        assert_eq!(normalize_image_url("[null]"), None);
        assert_eq!(normalize_image_url("None"), None);
        assert_eq!(normalize_image_url("ftp://example.com/a.png"), None);
        assert_eq!(
            normalize_image_url(" https://images.leafly.com/a.png "),
            Some("https://images.leafly.com/a.png".to_owned())
        );
    }

    #[test]
    fn scores_default_to_zero() {
        let record = StrainRecord::new("Blue Dream", StrainType::Hybrid)
            .effect("Relaxed", 40.0)
            .medical("Lack of Appetite", 12.0)
            .medical("Seizures", 0.0);

        assert_eq!(record.effect_score("relaxed"), 40.0);
        assert_eq!(record.effect_score("sleepy"), 0.0);
        assert!(record.has_medical_use("lack of appetite"));
        assert!(!record.has_medical_use("seizures"));
    }
}
