use cannabot_shared::{ConsumptionMethod, ProductType};

/// THC percentage assumed when neither the caller nor the stash knows it.
pub const DEFAULT_THC_PERCENT: f64 = 20.0;

/// Milligrams of THC in the consumed product. Edibles, tinctures and capsules
/// are dosed in mg already; other products are weighed in grams.
pub fn thc_content_mg(product_type: ProductType, amount: f64, thc_percent: f64) -> f64 {
    if product_type.is_measured_in_mg() {
        amount
    } else {
        amount * thc_percent * 10.0
    }
}

/// Milligrams of THC reaching the bloodstream, rounded to 2 decimals.
pub fn calculate_absorbed_thc(
    product_type: ProductType,
    amount: f64,
    thc_percent: f64,
    method: ConsumptionMethod,
) -> f64 {
    let absorbed = thc_content_mg(product_type, amount, thc_percent) * method.bioavailability();

    (absorbed * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gram_products_use_thc_percent() {
        // 0.5g at 20% = 100mg THC
        assert_eq!(
            calculate_absorbed_thc(ProductType::Flower, 0.5, 20.0, ConsumptionMethod::Smoke),
            27.5
        );
        assert_eq!(
            calculate_absorbed_thc(ProductType::Flower, 0.5, 20.0, ConsumptionMethod::Vape),
            30.0
        );
        assert_eq!(
            calculate_absorbed_thc(ProductType::Dab, 0.1, 80.0, ConsumptionMethod::Dab),
            52.0
        );
        assert_eq!(
            calculate_absorbed_thc(ProductType::Other, 1.0, 10.0, ConsumptionMethod::Other),
            25.0
        );
    }

    #[test]
    fn mg_products_ignore_thc_percent() {
        assert_eq!(
            calculate_absorbed_thc(ProductType::Edible, 10.0, 20.0, ConsumptionMethod::Edible),
            1.2
        );
        assert_eq!(
            calculate_absorbed_thc(ProductType::Tincture, 10.0, 99.0, ConsumptionMethod::Tincture),
            2.75
        );
        assert_eq!(
            calculate_absorbed_thc(ProductType::Capsule, 25.0, 0.0, ConsumptionMethod::Capsule),
            3.0
        );
    }
}
