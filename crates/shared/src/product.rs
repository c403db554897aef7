use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    Flower,
    Dab,
    Edible,
    Tincture,
    Cart,
    Capsule,
    Other,
}

impl ProductType {
    /// Edibles, tinctures and capsules are tracked in mg of THC, everything
    /// else in grams of product.
    pub fn is_measured_in_mg(&self) -> bool {
        matches!(
            self,
            ProductType::Edible | ProductType::Tincture | ProductType::Capsule
        )
    }

    pub fn unit(&self) -> &'static str {
        if self.is_measured_in_mg() { "mg" } else { "g" }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ProductType::Flower => "🌸",
            ProductType::Dab => "🥄",
            ProductType::Edible => "🍪",
            ProductType::Tincture => "💧",
            ProductType::Cart => "🖤",
            ProductType::Capsule => "💊",
            ProductType::Other => "📦",
        }
    }

    /// Formats an amount without trailing zeros, e.g. `3.5g` or `10mg`.
    pub fn format_amount(&self, amount: f64) -> String {
        let value = format!("{amount:.2}");
        let value = value.trim_end_matches('0').trim_end_matches('.');

        format!("{value}{}", self.unit())
    }
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionMethod {
    #[default]
    Smoke,
    #[strum(to_string = "vape", serialize = "vaporizer")]
    #[serde(alias = "vaporizer")]
    Vape,
    Dab,
    Edible,
    Tincture,
    Capsule,
    Other,
}

impl ConsumptionMethod {
    /// Average fraction of THC absorbed for this route of administration.
    pub fn bioavailability(&self) -> f64 {
        match self {
            ConsumptionMethod::Smoke => 0.275,
            ConsumptionMethod::Vape => 0.30,
            ConsumptionMethod::Dab => 0.65,
            ConsumptionMethod::Edible => 0.12,
            ConsumptionMethod::Tincture => 0.275,
            ConsumptionMethod::Capsule => 0.12,
            ConsumptionMethod::Other => 0.25,
        }
    }

    pub fn is_inhaled(&self) -> bool {
        matches!(
            self,
            ConsumptionMethod::Smoke | ConsumptionMethod::Vape | ConsumptionMethod::Dab
        )
    }

    pub fn onset(&self) -> &'static str {
        if self.is_inhaled() {
            "5-15 minutes"
        } else {
            "30-120 minutes"
        }
    }

    /// Product drawn from the stash when the caller does not name one.
    pub fn default_product(&self) -> ProductType {
        match self {
            ConsumptionMethod::Smoke | ConsumptionMethod::Vape => ProductType::Flower,
            ConsumptionMethod::Dab => ProductType::Dab,
            ConsumptionMethod::Edible => ProductType::Edible,
            ConsumptionMethod::Tincture => ProductType::Tincture,
            ConsumptionMethod::Capsule => ProductType::Capsule,
            ConsumptionMethod::Other => ProductType::Other,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ConsumptionMethod::Smoke => "🚬",
            ConsumptionMethod::Vape => "💨",
            ConsumptionMethod::Dab => "🔥",
            ConsumptionMethod::Edible => "🍪",
            ConsumptionMethod::Tincture => "💧",
            ConsumptionMethod::Capsule => "💊",
            ConsumptionMethod::Other => "🌿",
        }
    }
}
