//! Property tests for the landed-cost engine's numeric contract.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tradequote_core::{
    round_settlement, LandedCostEngine, ProductCostSpec, ShippingMethod, ShippingRateTable,
};

fn cost_spec() -> impl Strategy<Value = ProductCostSpec> {
    (
        1i64..10_000,
        1u32..500,
        1i64..500,
        0i64..50,
        0i64..5_000,
        0i64..100,
        0i64..80,
    )
        .prop_map(|(cents, case_pack_size, tenths_kg, duties, setup, margin, profit_override)| {
            ProductCostSpec {
                unit_cost_usd: Decimal::new(cents, 2),
                case_pack_size,
                carton_weight_kg: Decimal::new(tenths_kg, 1),
                duties_percent: Decimal::new(duties, 0),
                setup_cost_usd: Some(Decimal::new(setup, 0)),
                profit_margin_percent: Decimal::new(margin, 0),
                profit_override_percent: Some(Decimal::new(profit_override, 0)),
            }
        })
}

fn shipping_method() -> impl Strategy<Value = ShippingMethod> {
    prop_oneof![Just(ShippingMethod::AirExpress), Just(ShippingMethod::SeaFreight)]
}

proptest! {
    #[test]
    fn prop_identical_inputs_give_identical_results(
        cost in cost_spec(),
        quantity in 1u32..5_000,
        method in shipping_method(),
    ) {
        let engine = LandedCostEngine::default();
        let first = engine.compute_landed_cost(&cost, quantity, method);
        let second = engine.compute_landed_cost(&cost, quantity, method);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_light_shipments_pay_exactly_the_minimum(
        tenths_kg in 0i64..1_000,
        method in shipping_method(),
    ) {
        let engine = LandedCostEngine::default();
        let weight = Decimal::new(tenths_kg, 1);
        let rate = *ShippingRateTable::standard().rate(method).expect("standard rate");

        let charged = engine.compute_shipping_cost(weight, method).expect("shipping cost");
        if weight * rate.rate_per_kg_usd < rate.minimum_charge_usd {
            prop_assert_eq!(charged, rate.minimum_charge_usd);
        } else {
            prop_assert_eq!(charged, weight * rate.rate_per_kg_usd);
        }
    }

    #[test]
    fn prop_cartons_cover_the_quantity(
        cost in cost_spec(),
        quantity in 1u32..5_000,
    ) {
        let result = LandedCostEngine::default()
            .compute_landed_cost(&cost, quantity, ShippingMethod::SeaFreight)
            .expect("pricing");
        prop_assert!(result.cartons * cost.case_pack_size >= quantity);
        prop_assert!((result.cartons - 1) * cost.case_pack_size < quantity);
    }

    #[test]
    fn prop_total_price_never_falls_as_quantity_grows(
        cost in cost_spec(),
        quantity in 1u32..5_000,
        extra in 1u32..500,
        method in shipping_method(),
    ) {
        let engine = LandedCostEngine::default();
        let smaller = engine.compute_landed_cost(&cost, quantity, method).expect("smaller");
        let larger = engine.compute_landed_cost(&cost, quantity + extra, method).expect("larger");
        prop_assert!(larger.total_price_settlement >= smaller.total_price_settlement);
    }

    #[test]
    fn prop_unit_price_shrinks_within_a_carton_count(
        cost in cost_spec(),
        quantity in 1u32..5_000,
        method in shipping_method(),
    ) {
        let engine = LandedCostEngine::default();
        let current = engine.compute_landed_cost(&cost, quantity, method).expect("current");
        let next = engine.compute_landed_cost(&cost, quantity + 1, method).expect("next");

        if current.cartons == next.cartons {
            prop_assert!(next.unit_price_settlement <= current.unit_price_settlement);
            prop_assert!(next.landed_cost_per_unit_usd <= current.landed_cost_per_unit_usd);
        }
    }

    #[test]
    fn prop_settlement_price_is_rounded_usd_price(
        cost in cost_spec(),
        quantity in 1u32..5_000,
        method in shipping_method(),
        rate_hundredths in 1i64..1_000,
    ) {
        let exchange_rate = Decimal::new(rate_hundredths, 2);
        let result = LandedCostEngine::default()
            .with_exchange_rate(exchange_rate)
            .compute_landed_cost(&cost, quantity, method)
            .expect("pricing");

        prop_assert_eq!(
            result.unit_price_settlement,
            round_settlement(result.unit_price_usd * exchange_rate)
        );
        prop_assert_eq!(result.exchange_rate_used, exchange_rate);
    }

    #[test]
    fn prop_override_wins_only_when_positive(cost in cost_spec()) {
        let result = LandedCostEngine::default()
            .compute_landed_cost(&cost, 100, ShippingMethod::AirExpress)
            .expect("pricing");
        let profit_override = cost.profit_override_percent.unwrap_or(Decimal::ZERO);
        let expected = if profit_override > Decimal::ZERO {
            profit_override
        } else {
            cost.profit_margin_percent
        };
        prop_assert_eq!(result.effective_profit_margin_percent, expected);
    }
}
