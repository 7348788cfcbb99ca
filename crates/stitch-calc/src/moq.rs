//! MOQ 談判策略（供應商短名單 → 槓桿疊加 → 預估 MOQ → 合併下單機會）

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use stitch_core::moq::{
    max_combined_reduction, ConsolidationOpportunity, MoqPlan, NegotiationLever,
    NegotiationStrategy,
};
use stitch_core::tables::{ReferenceTables, SupplierProfile};
use stitch_core::{MoqInputs, PaymentFlexibility};

use crate::{PlanWarning, WarningSeverity};

/// 短名單門檻：可談判下限 ≤ 目標 × 1.5
const SHORTLIST_FACTOR: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// MOQ 談判計算器
pub struct MoqCalculator;

impl MoqCalculator {
    /// 建立完整 MOQ 談判計畫
    pub fn calculate(
        inputs: &MoqInputs,
        tables: &dyn ReferenceTables,
        warnings: &mut Vec<PlanWarning>,
    ) -> MoqPlan {
        let candidates = Self::shortlist(inputs.target_units, tables);

        tracing::debug!(
            "MOQ 談判: 目標 {} 件 × {} 款，{} 家候選供應商",
            inputs.target_units,
            inputs.num_styles,
            candidates.len()
        );

        if candidates.is_empty() {
            warnings.push(PlanWarning::new(
                "moq",
                format!(
                    "沒有供應商的可談判下限落在目標 {} 件的 1.5 倍內",
                    inputs.target_units
                ),
                WarningSeverity::Warning,
            ));
        }

        let levers = Self::applicable_levers(inputs);

        let mut strategies: Vec<NegotiationStrategy> = candidates
            .iter()
            .map(|supplier| Self::strategy_for(supplier, &levers, inputs.target_units))
            .collect();
        strategies.sort_by_key(|s| s.estimated_moq);

        let consolidation = Self::consolidation_opportunities(inputs);
        let recommendation = Self::recommendation(&strategies, inputs.target_units);

        MoqPlan {
            target_units: inputs.target_units,
            candidate_suppliers: candidates,
            strategies,
            consolidation_opportunities: consolidation,
            recommendation,
        }
    }

    /// 可談判下限落在目標 1.5 倍內的供應商
    fn shortlist(target_units: u32, tables: &dyn ReferenceTables) -> Vec<SupplierProfile> {
        let ceiling = Decimal::from(target_units) * SHORTLIST_FACTOR;

        tables
            .suppliers()
            .iter()
            .filter_map(|name| tables.supplier_profile(name))
            .filter(|profile| Decimal::from(profile.moq_negotiable) <= ceiling)
            .collect()
    }

    /// 依訂單條件挑出可用槓桿（尚未套用 65% 上限）
    fn applicable_levers(inputs: &MoqInputs) -> Vec<NegotiationLever> {
        let mut levers = Vec::new();

        if inputs.num_styles >= 3 {
            let reduction = if inputs.num_styles >= 5 {
                Decimal::new(40, 2)
            } else {
                Decimal::new(30, 2)
            };
            levers.push(NegotiationLever {
                name: "Multi-style commitment".to_string(),
                reduction_pct: reduction,
                rationale: format!(
                    "Committing to {} styles - suppliers prefer volume across a collection",
                    inputs.num_styles
                ),
            });
        }

        match inputs.order_month {
            2 | 3 | 8 | 9 => levers.push(NegotiationLever {
                name: "Off-peak timing".to_string(),
                reduction_pct: Decimal::new(25, 2),
                rationale: "Factories seek orders between peak seasons".to_string(),
            }),
            // 年末僅有小幅空檔
            11 | 12 => levers.push(NegotiationLever {
                name: "Year-end timing".to_string(),
                reduction_pct: Decimal::new(5, 2),
                rationale: "Limited year-end capacity gaps after holiday production".to_string(),
            }),
            _ => {}
        }

        match inputs.payment_flexibility {
            PaymentFlexibility::FullPrepayment => levers.push(NegotiationLever {
                name: "100% prepayment".to_string(),
                reduction_pct: Decimal::new(20, 2),
                rationale: "Eliminates supplier cash flow risk".to_string(),
            }),
            PaymentFlexibility::FiftyDeposit => levers.push(NegotiationLever {
                name: "50% deposit".to_string(),
                reduction_pct: Decimal::new(15, 2),
                rationale: "Reduces supplier financial risk versus standard 30-40% deposit"
                    .to_string(),
            }),
            PaymentFlexibility::None => {}
        }

        levers
    }

    fn strategy_for(
        supplier: &SupplierProfile,
        levers: &[NegotiationLever],
        target_units: u32,
    ) -> NegotiationStrategy {
        let raw_reduction: Decimal = levers.iter().map(|l| l.reduction_pct).sum();
        let combined = raw_reduction.min(max_combined_reduction());

        let negotiated =
            (Decimal::from(supplier.moq_standard) * (Decimal::ONE - combined)).round();
        let estimated_moq = negotiated
            .to_u32()
            .unwrap_or(supplier.moq_standard)
            .max(supplier.moq_negotiable);

        let dampening = Decimal::ONE - combined * Decimal::new(3, 1);
        let success_probability = (supplier.negotiation_success_rate * dampening)
            .clamp(Decimal::new(30, 2), Decimal::new(95, 2))
            .round_dp(3);

        NegotiationStrategy {
            supplier: supplier.name.clone(),
            standard_moq: supplier.moq_standard,
            negotiable_floor: supplier.moq_negotiable,
            levers: levers.to_vec(),
            combined_reduction_pct: combined,
            estimated_moq,
            success_probability,
            meets_target: estimated_moq <= target_units,
            talking_points: Self::talking_points(supplier, levers, estimated_moq),
        }
    }

    fn talking_points(
        supplier: &SupplierProfile,
        levers: &[NegotiationLever],
        estimated_moq: u32,
    ) -> Vec<String> {
        let mut points = vec![format!(
            "Open at {} units against the published {} MOQ",
            estimated_moq, supplier.moq_standard
        )];
        points.extend(levers.iter().map(|l| l.rationale.clone()));
        points.push(format!(
            "Concede toward the {} floor only if all levers are rejected",
            supplier.moq_negotiable
        ));
        points
    }

    /// 合併下單機會（資訊性，不回饋到預估 MOQ）
    fn consolidation_opportunities(inputs: &MoqInputs) -> Vec<ConsolidationOpportunity> {
        let mut opportunities = Vec::new();

        let unique_fabrics: std::collections::HashSet<&str> =
            inputs.fabrics.iter().map(String::as_str).collect();
        if unique_fabrics.len() > 2 {
            opportunities.push(ConsolidationOpportunity {
                name: "fabric-consolidation".to_string(),
                potential_pct: 30,
                description: format!(
                    "Consolidate {} fabrics to 1-2 base fabrics to combine fabric MOQ across styles",
                    unique_fabrics.len()
                ),
            });
        }

        if inputs.colors.len() > 3 {
            opportunities.push(ConsolidationOpportunity {
                name: "colorway-coordination".to_string(),
                potential_pct: 25,
                description: format!(
                    "Limit {} colors to 3 coordinated colors to meet dye lot minimums",
                    inputs.colors.len()
                ),
            });
        }

        if inputs.num_styles >= 4 {
            opportunities.push(ConsolidationOpportunity {
                name: "style-component-sharing".to_string(),
                potential_pct: 15,
                description: "Design styles with shared trims so component orders meet MOQs"
                    .to_string(),
            });
        }

        opportunities
    }

    fn recommendation(strategies: &[NegotiationStrategy], target_units: u32) -> String {
        let Some(best) = strategies.first() else {
            return "No supplier shortlisted - raise target units or widen the supplier pool"
                .to_string();
        };

        let target = Decimal::from(target_units);
        let estimated = Decimal::from(best.estimated_moq);

        if estimated <= target {
            format!(
                "Negotiate with {}: estimated {} units meets the {} unit target",
                best.supplier, best.estimated_moq, target_units
            )
        } else if estimated <= target * Decimal::new(12, 1) {
            format!(
                "Negotiate with {}: estimated {} units lands within 20% of target",
                best.supplier, best.estimated_moq
            )
        } else {
            format!(
                "Caution: best estimated MOQ {} from {} exceeds target {} - consider consolidation first",
                best.estimated_moq, best.supplier, target_units
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stitch_tables::StaticTables;

    fn inputs(
        num_styles: u32,
        order_month: u32,
        payment: PaymentFlexibility,
        target: u32,
    ) -> MoqInputs {
        MoqInputs {
            num_styles,
            order_month,
            payment_flexibility: payment,
            target_units: target,
            fabrics: vec![
                "cotton-jersey-180gsm".to_string(),
                "french-terry-320gsm".to_string(),
            ],
            colors: vec!["black".to_string(), "heather-grey".to_string()],
        }
    }

    #[test]
    fn test_shortlist_excludes_high_floor_suppliers() {
        let tables = StaticTables::new();
        let shortlist = MoqCalculator::shortlist(200, &tables);
        let names: Vec<&str> = shortlist.iter().map(|s| s.name.as_str()).collect();

        // 下限 ≤ 300: 600 與 1000 出局
        assert_eq!(
            names,
            vec![
                "EcoKnits-Tirupur",
                "VietnamTex-HoChiMinh",
                "PortugalPremium-Porto",
                "MakersRow-LosAngeles"
            ]
        );
    }

    #[test]
    fn test_all_levers_hit_the_cap() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let plan = MoqCalculator::calculate(
            &inputs(3, 3, PaymentFlexibility::FullPrepayment, 200),
            &tables,
            &mut warnings,
        );

        // 0.30 + 0.25 + 0.20 = 0.75 → 上限 0.65
        let best = plan.best_strategy().unwrap();
        assert_eq!(best.combined_reduction_pct, Decimal::new(65, 2));
        assert_eq!(best.levers.len(), 3);

        // 依預估 MOQ 升冪: LA 50, Porto 100, EcoKnits 150, Vietnam 250
        let estimated: Vec<u32> = plan.strategies.iter().map(|s| s.estimated_moq).collect();
        assert_eq!(estimated, vec![50, 100, 150, 250]);
        assert_eq!(best.supplier, "MakersRow-LosAngeles");
        assert!(plan.any_meets_target());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_floor_clamp_and_success_dampening() {
        let tables = StaticTables::new();
        let eco = tables.supplier_profile("EcoKnits-Tirupur").unwrap();
        let levers = MoqCalculator::applicable_levers(&inputs(
            3,
            3,
            PaymentFlexibility::FullPrepayment,
            200,
        ));
        let strategy = MoqCalculator::strategy_for(&eco, &levers, 200);

        // 300 × 0.35 = 105 → 夾回下限 150
        assert_eq!(strategy.estimated_moq, 150);
        assert!(strategy.meets_target);
        // 0.75 × (1 − 0.65×0.3) = 0.60375 → 0.604
        assert_eq!(strategy.success_probability, Decimal::new(604, 3));
    }

    #[test]
    fn test_year_end_variant_is_five_percent() {
        let levers =
            MoqCalculator::applicable_levers(&inputs(1, 11, PaymentFlexibility::None, 300));
        assert_eq!(levers.len(), 1);
        assert_eq!(levers[0].reduction_pct, Decimal::new(5, 2));

        let levers =
            MoqCalculator::applicable_levers(&inputs(1, 6, PaymentFlexibility::None, 300));
        assert!(levers.is_empty());
    }

    #[test]
    fn test_consolidation_thresholds() {
        let mut moq = inputs(5, 3, PaymentFlexibility::None, 200);
        moq.fabrics = vec![
            "cotton-jersey-180gsm".to_string(),
            "french-terry-320gsm".to_string(),
            "fleece-280gsm".to_string(),
        ];
        moq.colors = (0..4).map(|i| format!("color-{}", i)).collect();

        let opportunities = MoqCalculator::consolidation_opportunities(&moq);
        let pcts: Vec<u32> = opportunities.iter().map(|o| o.potential_pct).collect();
        assert_eq!(pcts, vec![30, 25, 15]);

        // 已整併的系列沒有建議
        let lean = inputs(2, 3, PaymentFlexibility::None, 200);
        assert!(MoqCalculator::consolidation_opportunities(&lean).is_empty());
    }

    #[test]
    fn test_no_candidates_warns() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let plan = MoqCalculator::calculate(
            &inputs(1, 6, PaymentFlexibility::None, 20),
            &tables,
            &mut warnings,
        );

        assert!(plan.strategies.is_empty());
        assert!(plan.best_strategy().is_none());
        assert_eq!(warnings.len(), 1);
        assert!(plan.recommendation.contains("No supplier"));
    }

    proptest! {
        /// 槓桿任意疊加也不得超過 65%
        #[test]
        fn prop_reduction_never_exceeds_cap(
            num_styles in 0u32..10,
            order_month in 1u32..=12,
            payment_idx in 0usize..3,
        ) {
            let payment = [
                PaymentFlexibility::None,
                PaymentFlexibility::FullPrepayment,
                PaymentFlexibility::FiftyDeposit,
            ][payment_idx];

            let tables = StaticTables::new();
            let mut warnings = Vec::new();
            let plan = MoqCalculator::calculate(
                &inputs(num_styles, order_month, payment, 500),
                &tables,
                &mut warnings,
            );

            for strategy in &plan.strategies {
                prop_assert!(strategy.combined_reduction_pct <= Decimal::new(65, 2));
                prop_assert!(strategy.estimated_moq >= strategy.negotiable_floor);
                prop_assert!(strategy.success_probability >= Decimal::new(30, 2));
                prop_assert!(strategy.success_probability <= Decimal::new(95, 2));
            }
        }
    }
}
