#![allow(dead_code)]

use std::sync::Arc;

use cannabot_strain::{Discovery, DiscoveryOptions, StrainRecord, StrainStore, StrainType};
use rand::{SeedableRng, rngs::StdRng};

pub fn records() -> Vec<StrainRecord> {
    vec![
        StrainRecord::new("Northern Lights", StrainType::Indica)
            .thc(18.0)
            .effect("relaxed", 80.0)
            .effect("sleepy", 60.0)
            .medical("insomnia", 30.0),
        StrainRecord::new("Granddaddy Purple", StrainType::Indica)
            .thc(20.0)
            .effect("relaxed", 70.0)
            .effect("sleepy", 65.0)
            .medical("pain", 40.0)
            .image_url("https://images.leafly.com/gdp.png"),
        StrainRecord::new("Tahoe OG", StrainType::Indica)
            .thc(23.0)
            .effect("relaxed", 60.0)
            .effect("hungry", 40.0),
        StrainRecord::new("Sour Diesel", StrainType::Sativa)
            .thc(22.0)
            .effect("energetic", 60.0)
            .effect("uplifted", 55.0)
            .effect("relaxed", 10.0),
        StrainRecord::new("Jack Herer", StrainType::Sativa)
            .thc(19.0)
            .effect("creative", 50.0)
            .effect("focused", 45.0)
            .effect("relaxed", 15.0)
            .medical("depression", 25.0),
        StrainRecord::new("Durban Poison", StrainType::Sativa)
            .effect("energetic", 70.0)
            .effect("creative", 40.0)
            .effect("relaxed", 5.0),
        StrainRecord::new("Blue Dream", StrainType::Hybrid)
            .thc(21.0)
            .cbd(0.1)
            .effect("relaxed", 50.0)
            .effect("happy", 60.0)
            .effect("creative", 30.0)
            .image_url("https://images.leafly.com/blue-dream.png"),
        StrainRecord::new("OG Kush", StrainType::Hybrid)
            .thc(24.0)
            .effect("relaxed", 55.0)
            .effect("euphoric", 50.0),
        StrainRecord::new("SFV OG", StrainType::Hybrid)
            .thc(25.0)
            .effect("relaxed", 45.0)
            .effect("euphoric", 60.0),
        StrainRecord::new("Harlequin", StrainType::Hybrid)
            .thc(7.0)
            .cbd(10.0)
            .effect("relaxed", 40.0)
            .effect("focused", 30.0)
            .medical("anxiety", 30.0)
            .medical("pain", 35.0),
    ]
}

pub fn discovery() -> Discovery {
    Discovery::new(
        Arc::new(StrainStore::from_records(records())),
        DiscoveryOptions::default(),
    )
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn names(records: &[StrainRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}
