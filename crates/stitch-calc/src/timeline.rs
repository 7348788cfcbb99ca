//! 生產時程規劃（階段排程 → 品管關卡 → 風險 → 可行性 → 壓縮選項）

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use stitch_core::tables::{defaults, ReferenceTables, SupplierProfile};
use stitch_core::timeline::{
    counts_toward_critical_path, high_defect_threshold, ExpediteOption, Feasibility, Probability,
    QualityGate, RiskFactor, TimelinePhase, TimelinePlan,
};
use stitch_core::{Complexity, OrderSpec, TimelineInputs};

use crate::{PlanWarning, WarningSeverity};

/// 技術包與布料採購（天，固定）
const TECHPACK_DAYS: u32 = 14;
/// 終檢（天，固定）
const QC_DAYS: u32 = 3;
/// 入倉（天，固定）
const RECEIVING_DAYS: u32 = 4;
/// 每輪修樣天數
const DAYS_PER_REVISION_ROUND: u32 = 7;

/// 生產時程計算器
pub struct TimelineCalculator;

impl TimelineCalculator {
    /// 建立完整生產時程
    pub fn calculate(
        order: &OrderSpec,
        inputs: &TimelineInputs,
        tables: &dyn ReferenceTables,
        warnings: &mut Vec<PlanWarning>,
    ) -> TimelinePlan {
        let supplier = Self::resolve_supplier(&order.supplier, tables, warnings);

        tracing::debug!(
            "時程規劃: {} @ {}，{} 件，下單月 {}",
            order.garment_type,
            supplier.name,
            order.units,
            inputs.order_month
        );

        let shipping_days = tables.shipping_days(&supplier.location).unwrap_or_else(|| {
            warnings.push(PlanWarning::new(
                supplier.location.clone(),
                format!("查無 {} 的海運天數，套用預設值", supplier.location),
                WarningSeverity::Warning,
            ));
            defaults::shipping_days()
        });

        let revision_rounds =
            Self::estimate_revision_rounds(&order.garment_type, supplier.quality_defect_rate);
        let phases = Self::build_phases(
            inputs.today,
            &supplier,
            revision_rounds,
            shipping_days,
        );

        let total_calendar_days: u32 = phases.iter().map(|p| p.duration_days).sum();
        let estimated_completion = inputs.today + Duration::days(i64::from(total_calendar_days));

        let quality_gates = Self::quality_gates(&phases, order.units);
        let risk_factors =
            Self::assess_risks(&supplier.location, inputs.order_month, inputs.complexity);
        let critical_path_days = Self::critical_path_days(&phases, &risk_factors);
        let recommended_buffer_days = Self::recommended_buffer(&risk_factors);
        let aql_sample_size = aql_sample_size(order.units);

        let feasibility = order.target_launch.map(|launch| {
            Self::assess_feasibility(launch, total_calendar_days, inputs.today)
        });
        let buffer_days = feasibility.as_ref().map(|f| f.buffer_days).unwrap_or(0);

        let expedite_options = Self::expedite_options(&supplier, buffer_days);

        TimelinePlan {
            supplier: supplier.name.clone(),
            order_date: inputs.today,
            phases,
            total_calendar_days,
            estimated_completion,
            quality_gates,
            risk_factors,
            critical_path_days,
            recommended_buffer_days,
            aql_sample_size,
            feasibility,
            expedite_options,
        }
    }

    fn resolve_supplier(
        supplier: &str,
        tables: &dyn ReferenceTables,
        warnings: &mut Vec<PlanWarning>,
    ) -> SupplierProfile {
        match tables.supplier_profile(supplier) {
            Some(profile) => profile,
            None => {
                warnings.push(PlanWarning::new(
                    supplier.to_string(),
                    format!("查無供應商 {} 的檔案，套用一般供應商假設", supplier),
                    WarningSeverity::Warning,
                ));
                SupplierProfile {
                    name: supplier.to_string(),
                    location: "Unknown".to_string(),
                    lead_time_sampling_days: 14,
                    lead_time_bulk_days: 35,
                    lead_time_rush_days: None,
                    rush_premium_pct: Decimal::ZERO,
                    quality_defect_rate: Decimal::new(20, 1),
                    response_time_hours: 24,
                    moq_standard: 500,
                    moq_negotiable: 250,
                    negotiation_success_rate: Decimal::new(60, 2),
                    labor_rate_per_minute: defaults::labor_rate(),
                }
            }
        }
    }

    /// 修樣輪次：款式複雜度給基礎輪次，瑕疵率偏高再加一輪
    fn estimate_revision_rounds(garment_type: &str, defect_rate: Decimal) -> u32 {
        let garment = garment_type.to_lowercase();
        let keyword_rounds: [(&str, u32); 6] = [
            ("t-shirt", 0),
            ("hoodie", 1),
            ("jogger", 1),
            ("leggings", 1),
            ("bomber", 2),
            ("jacket", 2),
        ];

        let mut rounds = 1;
        for (keyword, base) in keyword_rounds {
            if garment.contains(keyword) {
                rounds = base;
                break;
            }
        }

        if defect_rate > high_defect_threshold() {
            rounds += 1;
        }

        rounds
    }

    /// 七個循序階段（修樣輪次為零時跳過修樣階段）
    fn build_phases(
        start: NaiveDate,
        supplier: &SupplierProfile,
        revision_rounds: u32,
        shipping_days: u32,
    ) -> Vec<TimelinePhase> {
        let mut phases = Vec::new();
        let mut cursor = start;

        let mut push = |name: &str, days: u32, description: String, cursor: &mut NaiveDate| {
            let end = *cursor + Duration::days(i64::from(days));
            phases.push(TimelinePhase {
                name: name.to_string(),
                duration_days: days,
                start_date: *cursor,
                end_date: end,
                description,
            });
            *cursor = end;
        };

        push(
            "Tech Pack Finalization & Fabric Procurement",
            TECHPACK_DAYS,
            "Finalize technical specifications and source materials".to_string(),
            &mut cursor,
        );
        push(
            "Sampling & Development",
            supplier.lead_time_sampling_days,
            "Create and revise pre-production samples".to_string(),
            &mut cursor,
        );
        if revision_rounds > 0 {
            push(
                "Sample Revisions",
                revision_rounds * DAYS_PER_REVISION_ROUND,
                format!(
                    "Address fit and construction issues ({} rounds estimated)",
                    revision_rounds
                ),
                &mut cursor,
            );
        }
        push(
            "Bulk Production",
            supplier.lead_time_bulk_days,
            "Full-scale manufacturing with quality checkpoints".to_string(),
            &mut cursor,
        );
        push(
            "Quality Control & Inspection",
            QC_DAYS,
            "Final random inspection before shipment".to_string(),
            &mut cursor,
        );
        push(
            "Shipping & Logistics",
            shipping_days,
            "Sea freight and customs clearance to destination".to_string(),
            &mut cursor,
        );
        push(
            "Receiving & Distribution",
            RECEIVING_DAYS,
            "Warehouse receiving and inventory allocation".to_string(),
            &mut cursor,
        );

        phases
    }

    /// 品管關卡（樣品簽核、首件、20%/50% 巡檢、終檢）
    fn quality_gates(phases: &[TimelinePhase], units: u32) -> Vec<QualityGate> {
        let mut gates = Vec::new();

        let phase_end = |name: &str| phases.iter().find(|p| p.name == name).map(|p| p.end_date);
        let phase_start = |name: &str| phases.iter().find(|p| p.name == name).map(|p| p.start_date);

        if let Some(date) = phase_end("Sampling & Development") {
            gates.push(QualityGate {
                name: "Pre-Production Sample Approval".to_string(),
                date,
                scope: "Fit test, fabric quality, construction accuracy (tolerance ±0.5cm)"
                    .to_string(),
                on_failure: "Revision round before bulk order".to_string(),
            });
        }

        if let (Some(start), Some(end)) =
            (phase_start("Bulk Production"), phase_end("Bulk Production"))
        {
            let span = (end - start).num_days();
            let at = |fraction_num: i64, fraction_den: i64| {
                start + Duration::days(span * fraction_num / fraction_den)
            };

            gates.push(QualityGate {
                name: "First Article Inspection".to_string(),
                date: at(1, 7),
                scope: "First 20 units: construction consistency, measurement verification"
                    .to_string(),
                on_failure: "Stop production until corrected".to_string(),
            });
            gates.push(QualityGate {
                name: "Inline Inspection 20%".to_string(),
                date: at(1, 5),
                scope: format!(
                    "Random sampling AQL 2.5, sample size {}",
                    aql_sample_size(units / 5)
                ),
                on_failure: "Adjust process immediately".to_string(),
            });
            gates.push(QualityGate {
                name: "Inline Inspection 50%".to_string(),
                date: at(1, 2),
                scope: format!(
                    "Random sampling AQL 2.5, sample size {}",
                    aql_sample_size(units / 2)
                ),
                on_failure: "Rework defects, adjust process".to_string(),
            });
        }

        if let Some(date) = phase_end("Quality Control & Inspection") {
            gates.push(QualityGate {
                name: "Final Random Inspection".to_string(),
                date,
                scope: format!(
                    "Full random inspection AQL 2.5, sample size {}",
                    aql_sample_size(units)
                ),
                on_failure: "Stop shipment, sort and rework".to_string(),
            });
        }

        gates
    }

    /// 規則比對風險因子（地區 × 月份 × 複雜度）
    fn assess_risks(location: &str, order_month: u32, complexity: Complexity) -> Vec<RiskFactor> {
        let mut risks = Vec::new();

        let cny_regions = ["China", "Vietnam", "Taiwan"];
        if cny_regions.contains(&location) && matches!(order_month, 1 | 2) {
            risks.push(RiskFactor {
                name: "Chinese New Year Factory Closure".to_string(),
                probability: Probability::High,
                delay_days: 21,
                mitigation: "Place order 60 days before CNY or plan for delay".to_string(),
            });
        }

        let monsoon_regions = ["India", "Bangladesh"];
        if monsoon_regions.contains(&location) && (6..=9).contains(&order_month) {
            risks.push(RiskFactor {
                name: "Monsoon Season Delays".to_string(),
                probability: Probability::Medium,
                delay_days: 7,
                mitigation: "Add 1 week buffer to timeline".to_string(),
            });
        }

        if (10..=12).contains(&order_month) {
            risks.push(RiskFactor {
                name: "Peak Season Port Congestion".to_string(),
                probability: Probability::MediumHigh,
                delay_days: 10,
                mitigation: "Book freight early, consider air freight backup".to_string(),
            });
        }

        if complexity == Complexity::High {
            risks.push(RiskFactor {
                name: "Complex Construction Quality Issues".to_string(),
                probability: Probability::Medium,
                delay_days: 10,
                mitigation: "Allocate extra 1-2 weeks for revisions".to_string(),
            });
        }

        if ["Bangladesh", "China"].contains(&location) {
            risks.push(RiskFactor {
                name: "Compliance Audits & Factory Inspections".to_string(),
                probability: Probability::Low,
                delay_days: 3,
                mitigation: "Verify supplier compliance status before ordering".to_string(),
            });
        }

        risks
    }

    /// 關鍵路徑 = 打樣 + 大貨 + 海運 + 高機率風險延誤
    fn critical_path_days(phases: &[TimelinePhase], risks: &[RiskFactor]) -> u32 {
        let critical_phases = [
            "Sampling & Development",
            "Bulk Production",
            "Shipping & Logistics",
        ];
        let phase_days: u32 = phases
            .iter()
            .filter(|p| critical_phases.contains(&p.name.as_str()))
            .map(|p| p.duration_days)
            .sum();

        let risk_days: u32 = risks
            .iter()
            .filter(|r| counts_toward_critical_path(r.probability))
            .map(|r| r.delay_days)
            .sum();

        phase_days + risk_days
    }

    fn recommended_buffer(risks: &[RiskFactor]) -> u32 {
        (risks.len() as u32 * 3).max(7)
    }

    /// 目標上市日可行性：回推必須開工日與今天比較
    fn assess_feasibility(
        target_launch: NaiveDate,
        total_days: u32,
        today: NaiveDate,
    ) -> Feasibility {
        let required_start = target_launch - Duration::days(i64::from(total_days));
        let achievable = required_start <= today;
        let buffer_days = (today - required_start).num_days().max(0) as u32;

        let assessment = if achievable {
            format!(
                "Required start date has passed - begin immediately and compress {} days",
                buffer_days
            )
        } else {
            format!("Start by {} to meet the target launch", required_start)
        };

        Feasibility {
            target_launch,
            required_start,
            achievable,
            buffer_days,
            assessment,
        }
    }

    /// 壓縮時程選項（加急大貨、空運、跳過修樣）
    fn expedite_options(supplier: &SupplierProfile, buffer_days: u32) -> Vec<ExpediteOption> {
        let mut options = Vec::new();

        if let Some(rush_days) = supplier.lead_time_rush_days {
            let days_saved = supplier.lead_time_bulk_days.saturating_sub(rush_days);
            options.push(ExpediteOption {
                name: "Rush Production".to_string(),
                days_saved,
                cost_impact: format!("+{}% production cost", supplier.rush_premium_pct),
                risk: if buffer_days > days_saved {
                    "Use if timeline critical".to_string()
                } else {
                    "Not necessary".to_string()
                },
            });
        }

        options.push(ExpediteOption {
            name: "Air Freight Instead of Sea".to_string(),
            days_saved: 14,
            cost_impact: "$5.00-8.00 per unit".to_string(),
            risk: "Emergency option only, significantly increases landed cost".to_string(),
        });

        options.push(ExpediteOption {
            name: "Skip Sample Revisions".to_string(),
            days_saved: DAYS_PER_REVISION_ROUND,
            cost_impact: "No direct cost".to_string(),
            risk: "Not recommended - quality issues will cost more than time saved".to_string(),
        });

        options
    }
}

/// AQL 2.5 一般檢驗水準 II 的抽樣數階梯
pub fn aql_sample_size(lot_size: u32) -> u32 {
    match lot_size {
        0..=90 => 13,
        91..=150 => 20,
        151..=280 => 32,
        281..=500 => 50,
        501..=1200 => 80,
        1201..=3200 => 125,
        _ => 200,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use stitch_core::order::SizeCode;
    use stitch_tables::StaticTables;

    fn inputs(order_month: u32, complexity: Complexity) -> TimelineInputs {
        TimelineInputs {
            order_month,
            complexity,
            today: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        }
    }

    fn hoodie_order(supplier: &str) -> OrderSpec {
        OrderSpec::new(
            "hoodie-pullover",
            SizeCode::M,
            "cotton-jersey-180gsm",
            supplier,
            500,
        )
    }

    #[test]
    fn test_hoodie_at_ecoknits_phases() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let plan = TimelineCalculator::calculate(
            &hoodie_order("EcoKnits-Tirupur"),
            &inputs(3, Complexity::Medium),
            &tables,
            &mut warnings,
        );

        // 14 + 14 + 7 + 35 + 3 + 20 + 4 = 97 天
        assert_eq!(plan.phases.len(), 7);
        assert_eq!(plan.total_calendar_days, 97);
        assert!(plan.phases_contiguous());
        assert_eq!(
            plan.estimated_completion,
            NaiveDate::from_ymd_opt(2026, 6, 7).unwrap()
        );
        // 關鍵路徑 = 14 + 35 + 20（無高機率風險）
        assert_eq!(plan.critical_path_days, 69);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_tshirt_skips_revisions() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let mut order = hoodie_order("EcoKnits-Tirupur");
        order.garment_type = "t-shirt-basic".to_string();
        let plan = TimelineCalculator::calculate(
            &order,
            &inputs(3, Complexity::Low),
            &tables,
            &mut warnings,
        );

        assert!(plan.phases.iter().all(|p| p.name != "Sample Revisions"));
        assert_eq!(plan.phases.len(), 6);
    }

    #[test]
    fn test_high_defect_supplier_gets_extra_round() {
        // BangladeshValue 瑕疵率 3.2% > 2.5%
        assert_eq!(
            TimelineCalculator::estimate_revision_rounds(
                "hoodie-pullover",
                Decimal::new(32, 1)
            ),
            2
        );
        assert_eq!(
            TimelineCalculator::estimate_revision_rounds("t-shirt-basic", Decimal::new(32, 1)),
            1
        );
        assert_eq!(
            TimelineCalculator::estimate_revision_rounds("jacket-bomber", Decimal::new(6, 1)),
            2
        );
    }

    #[rstest]
    #[case(90, 13)]
    #[case(150, 20)]
    #[case(280, 32)]
    #[case(500, 50)]
    #[case(1200, 80)]
    #[case(3200, 125)]
    #[case(5000, 200)]
    fn test_aql_sample_steps(#[case] lot: u32, #[case] expected: u32) {
        assert_eq!(aql_sample_size(lot), expected);
    }

    #[test]
    fn test_cny_risk_for_china_in_january() {
        let risks = TimelineCalculator::assess_risks("China", 1, Complexity::Low);
        assert!(risks.iter().any(|r| r.name.contains("Chinese New Year")));
        // 中國供應商恆有合規稽核風險
        assert!(risks.iter().any(|r| r.probability == Probability::Low));

        let risks = TimelineCalculator::assess_risks("Portugal", 1, Complexity::Low);
        assert!(risks.is_empty());
    }

    #[test]
    fn test_q4_port_congestion_counts_in_critical_path() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let plan = TimelineCalculator::calculate(
            &hoodie_order("EcoKnits-Tirupur"),
            &inputs(11, Complexity::Medium),
            &tables,
            &mut warnings,
        );

        // 14 + 35 + 20 + 港口壅塞 10 天
        assert_eq!(plan.critical_path_days, 79);
        assert_eq!(plan.recommended_buffer_days, 7);
    }

    #[test]
    fn test_feasibility_against_injected_today() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

        // 必須開工日在今天之後 → 尚未到壓線點
        let f = TimelineCalculator::assess_feasibility(
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            97,
            today,
        );
        assert!(!f.achievable);
        assert_eq!(
            f.required_start,
            NaiveDate::from_ymd_opt(2026, 3, 26).unwrap()
        );
        assert_eq!(f.buffer_days, 0);

        let f = TimelineCalculator::assess_feasibility(
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            97,
            today,
        );
        assert!(f.achievable);
        assert_eq!(f.buffer_days, 37);
    }

    #[test]
    fn test_no_rush_option_for_porto() {
        let tables = StaticTables::new();
        let porto = tables.supplier_profile("PortugalPremium-Porto").unwrap();
        let options = TimelineCalculator::expedite_options(&porto, 0);

        assert!(options.iter().all(|o| o.name != "Rush Production"));
        assert_eq!(options.len(), 2);

        let eco = tables.supplier_profile("EcoKnits-Tirupur").unwrap();
        let options = TimelineCalculator::expedite_options(&eco, 0);
        assert_eq!(options[0].days_saved, 10);
    }

    #[test]
    fn test_unknown_supplier_defaults_with_warning() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let plan = TimelineCalculator::calculate(
            &hoodie_order("NewMill-Izmir"),
            &inputs(4, Complexity::Medium),
            &tables,
            &mut warnings,
        );

        // 一般假設 + 預設海運 18 天: 14+14+7+35+3+18+4 = 95
        assert_eq!(plan.total_calendar_days, 95);
        assert_eq!(warnings.len(), 2);
    }
}
