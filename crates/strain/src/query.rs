use std::{collections::BTreeSet, ops::Deref, sync::Arc};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom, seq::SliceRandom};
use strum::VariantArray;
use time::Date;

use crate::{
    StrainError, StrainRecord, StrainStore, StrainType, normalize_key, pool_size, rank_by_score,
    top_k_then_shuffle,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscoveryOptions {
    /// Share of the ranked records kept before shuffling.
    pub pool_fraction: f64,
    pub type_bonus: f64,
    pub medical_bonus: f64,
    pub default_limit: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            pool_fraction: 0.2,
            type_bonus: 10.0,
            medical_bonus: 20.0,
            default_limit: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub total: usize,
    pub by_type: Vec<(StrainType, usize)>,
    pub with_image: usize,
    pub with_thc: usize,
}

/// Read-only queries over a loaded store.
#[derive(Clone)]
pub struct Discovery {
    store: Arc<StrainStore>,
    pub options: DiscoveryOptions,
}

impl Deref for Discovery {
    type Target = StrainStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl Discovery {
    pub fn new(store: Arc<StrainStore>, options: DiscoveryOptions) -> Self {
        Self { store, options }
    }

    /// Case-insensitive substring search on the name.
    pub fn search(&self, term: &str) -> Vec<StrainRecord> {
        self.search_with(term, self.options.default_limit, &mut rand::rng())
    }

    pub fn search_with<R: Rng + ?Sized>(
        &self,
        term: &str,
        limit: usize,
        rng: &mut R,
    ) -> Vec<StrainRecord> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return vec![];
        }

        let matches = self
            .all()
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&term))
            .collect::<Vec<_>>();

        tracing::debug!(term = %term, matches = matches.len(), "strain search");

        let k = matches.len();
        top_k_then_shuffle(matches, k, limit, rng)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn filter_by_effect(&self, effect: &str, limit: usize) -> Vec<StrainRecord> {
        self.filter_by_effect_with(effect, limit, &mut rand::rng())
    }

    pub fn filter_by_effect_with<R: Rng + ?Sized>(
        &self,
        effect: &str,
        limit: usize,
        rng: &mut R,
    ) -> Vec<StrainRecord> {
        let effect = normalize_key(effect);
        let scored = self
            .all()
            .iter()
            .map(|r| (r.effect_score(&effect), r))
            .filter(|(score, _)| *score > 0.0)
            .collect::<Vec<_>>();

        if scored.is_empty() {
            tracing::debug!(effect = %effect, "no strain has this effect");
            return vec![];
        }

        let ranked = rank_by_score(scored, rng);
        let k = pool_size(self.options.pool_fraction, self.len());

        top_k_then_shuffle(ranked, k, limit, rng)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Mixed selection spread as evenly as possible over strain types.
    pub fn surprise(&self, limit: usize) -> Vec<StrainRecord> {
        self.surprise_with(limit, &mut rand::rng())
    }

    pub fn surprise_with<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Vec<StrainRecord> {
        surprise_from(self.all().iter().collect(), limit, rng)
    }

    pub fn random_one(&self) -> Result<StrainRecord, StrainError> {
        self.random_one_with(&mut rand::rng())
    }

    pub fn random_one_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<StrainRecord, StrainError> {
        self.all()
            .choose(rng)
            .cloned()
            .ok_or(StrainError::EmptyStore)
    }

    pub fn by_type(&self, strain_type: StrainType, limit: usize) -> Vec<StrainRecord> {
        self.by_type_with(strain_type, limit, &mut rand::rng())
    }

    pub fn by_type_with<R: Rng + ?Sized>(
        &self,
        strain_type: StrainType,
        limit: usize,
        rng: &mut R,
    ) -> Vec<StrainRecord> {
        let matches = self
            .all()
            .iter()
            .filter(|r| r.strain_type == strain_type)
            .collect::<Vec<_>>();

        let k = matches.len();
        top_k_then_shuffle(matches, k, limit, rng)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Strains tagged with a medical condition, best rated first in the pool.
    pub fn by_medical_use(&self, condition: &str, limit: usize) -> Vec<StrainRecord> {
        self.by_medical_use_with(condition, limit, &mut rand::rng())
    }

    pub fn by_medical_use_with<R: Rng + ?Sized>(
        &self,
        condition: &str,
        limit: usize,
        rng: &mut R,
    ) -> Vec<StrainRecord> {
        let condition = normalize_key(condition);
        let scored = self
            .all()
            .iter()
            .filter(|r| r.has_medical_use(&condition))
            .map(|r| {
                let score = r.medical_scores.get(&condition).copied().unwrap_or(0.0);
                (score, r)
            })
            .collect::<Vec<_>>();

        let k = pool_size(self.options.pool_fraction, scored.len()).max(limit);
        let ranked = rank_by_score(scored, rng);

        top_k_then_shuffle(ranked, k, limit, rng)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Strain of the day, stable for a given calendar date.
    pub fn featured(&self, date: Date) -> Result<StrainRecord, StrainError> {
        let seed = date.year() as u64 * 10_000
            + u8::from(date.month()) as u64 * 100
            + date.day() as u64;
        let mut rng = StdRng::seed_from_u64(seed);

        self.random_one_with(&mut rng)
    }

    pub fn stats(&self) -> CatalogStats {
        let by_type = StrainType::VARIANTS
            .iter()
            .map(|t| (*t, self.all().iter().filter(|r| r.strain_type == *t).count()))
            .collect();

        CatalogStats {
            total: self.len(),
            by_type,
            with_image: self.all().iter().filter(|r| r.image_url.is_some()).count(),
            with_thc: self.all().iter().filter(|r| r.thc_percent.is_some()).count(),
        }
    }

    pub fn known_effects(&self) -> Vec<String> {
        self.all()
            .iter()
            .flat_map(|r| {
                r.effect_scores
                    .iter()
                    .filter(|(_, score)| **score > 0.0)
                    .map(|(effect, _)| effect.clone())
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Round-robin over per-type buckets so a small bucket's shortfall is taken
/// from the others.
pub(crate) fn surprise_from<R: Rng + ?Sized>(
    candidates: Vec<&StrainRecord>,
    limit: usize,
    rng: &mut R,
) -> Vec<StrainRecord> {
    let mut buckets = StrainType::VARIANTS
        .iter()
        .map(|t| {
            let mut bucket = candidates
                .iter()
                .filter(|r| r.strain_type == *t)
                .copied()
                .collect::<Vec<_>>();
            bucket.shuffle(rng);
            bucket.into_iter()
        })
        .collect::<Vec<_>>();
    buckets.shuffle(rng);

    let mut picked = Vec::with_capacity(limit);
    'draw: while picked.len() < limit {
        let mut drew = false;
        for bucket in buckets.iter_mut() {
            if picked.len() == limit {
                break 'draw;
            }
            if let Some(record) = bucket.next() {
                picked.push(record.clone());
                drew = true;
            }
        }

        if !drew {
            break;
        }
    }

    picked.shuffle(rng);
    picked
}
