use std::collections::HashSet;

use rand::Rng;

use crate::{
    Discovery, StrainError, StrainRecord, StrainType, normalize_key, pool_size, rank_by_score,
    surprise_from, top_k_then_shuffle,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    pub desired_effects: Vec<String>,
    pub preferred_type: Option<StrainType>,
    /// Strain names never returned.
    pub exclude: Vec<String>,
    pub medical_conditions: Vec<String>,
    pub max_thc: Option<f64>,
    pub min_cbd: Option<f64>,
}

impl Preferences {
    /// True when nothing would contribute to a score.
    pub fn is_unscored(&self) -> bool {
        self.desired_effects.is_empty()
            && self.preferred_type.is_none()
            && self.medical_conditions.is_empty()
    }

    fn accepts(&self, record: &StrainRecord, excluded: &HashSet<String>) -> bool {
        if excluded.contains(&record.name.to_lowercase()) {
            return false;
        }

        if let (Some(max), Some(thc)) = (self.max_thc, record.thc_percent) {
            if thc > max {
                return false;
            }
        }

        match self.min_cbd {
            Some(min) => record.cbd_percent.is_some_and(|cbd| cbd >= min),
            None => true,
        }
    }
}

impl Discovery {
    pub fn recommend(
        &self,
        preferences: &Preferences,
        limit: usize,
    ) -> Result<Vec<StrainRecord>, StrainError> {
        self.recommend_with(preferences, limit, &mut rand::rng())
    }

    pub fn recommend_with<R: Rng + ?Sized>(
        &self,
        preferences: &Preferences,
        limit: usize,
        rng: &mut R,
    ) -> Result<Vec<StrainRecord>, StrainError> {
        let excluded = preferences
            .exclude
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect::<HashSet<_>>();

        let candidates = self
            .all()
            .iter()
            .filter(|r| preferences.accepts(r, &excluded))
            .collect::<Vec<_>>();

        if preferences.is_unscored() {
            if candidates.is_empty() {
                return Err(StrainError::EmptyPool);
            }

            return Ok(surprise_from(candidates, limit, rng));
        }

        let effects = preferences
            .desired_effects
            .iter()
            .map(|e| normalize_key(e))
            .collect::<Vec<_>>();

        let candidate_count = candidates.len();
        let scored = candidates
            .into_iter()
            .map(|r| (self.score(r, &effects, preferences), r))
            .filter(|(score, _)| *score > 0.0)
            .collect::<Vec<_>>();

        if scored.is_empty() {
            return Err(StrainError::EmptyPool);
        }

        let k = pool_size(self.options.pool_fraction, candidate_count).max(limit);
        let mut seen = HashSet::new();
        let ranked = rank_by_score(scored, rng)
            .into_iter()
            .filter(|r| seen.insert(r.name.to_lowercase()))
            .collect::<Vec<_>>();

        tracing::debug!(
            candidates = ranked.len(),
            pool = k,
            limit,
            "strain recommendation"
        );

        Ok(top_k_then_shuffle(ranked, k, limit, rng)
            .into_iter()
            .cloned()
            .collect())
    }

    fn score(&self, record: &StrainRecord, effects: &[String], preferences: &Preferences) -> f64 {
        let effect_score = if effects.is_empty() {
            0.0
        } else {
            effects.iter().map(|e| record.effect_score(e)).sum::<f64>() / effects.len() as f64
        };

        let type_bonus = match preferences.preferred_type {
            Some(t) if t == record.strain_type => self.options.type_bonus,
            _ => 0.0,
        };

        let medical_matches = preferences
            .medical_conditions
            .iter()
            .filter(|c| record.has_medical_use(c))
            .count();

        effect_score + type_bonus + medical_matches as f64 * self.options.medical_bonus
    }
}
