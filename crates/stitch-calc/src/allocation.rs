//! 庫存分配計算（尺碼曲線 → 配色 → SKU 矩陣 → 補貨/滯銷/售罄）

use rust_decimal::Decimal;

use stitch_core::inventory::{
    size_velocity_multiplier, ColorAllocation, DeadStockRisk, InventoryPlan, MonthlySellThrough,
    ReorderTrigger, ReorderUrgency, SellThrough, SellThroughRating, SizeAllocation, Sku,
    StockRiskLevel,
};
use stitch_core::order::SizeCode;
use stitch_core::tables::{defaults, ReferenceTables, SizeCurve};
use stitch_core::{ColorStrategy, InventoryInputs, OrderSpec};

use crate::{PlanWarning, WarningSeverity};

/// 安全庫存週數
const SAFETY_STOCK_WEEKS: u32 = 2;

/// 已知的尺碼曲線鍵（解析順序即優先序）
const CURVE_KEYS: [&str; 6] = [
    "activewear-standard",
    "athletic-fit",
    "relaxed-fit",
    "plus-inclusive",
    "streetwear",
    "womens-fashion",
];

/// 庫存分配計算器
pub struct AllocationCalculator;

impl AllocationCalculator {
    /// 計算完整庫存分配計畫
    pub fn calculate(
        order: &OrderSpec,
        inputs: &InventoryInputs,
        tables: &dyn ReferenceTables,
        warnings: &mut Vec<PlanWarning>,
    ) -> InventoryPlan {
        let total_units = order.units;

        tracing::debug!(
            "庫存分配: {} 件，{} 配色，{}/{}",
            total_units,
            order.colors.len(),
            inputs.category,
            inputs.fit_type
        );

        let colors = if order.colors.is_empty() {
            warnings.push(PlanWarning::new(
                order.garment_type.clone(),
                "未指定配色，以單一配色分配".to_string(),
                WarningSeverity::Info,
            ));
            vec!["core".to_string()]
        } else {
            order.colors.clone()
        };

        let (curve_key, curve) = Self::resolve_size_curve(inputs, tables, warnings);

        let size_allocation = Self::apply_size_curve(total_units, &curve);
        let color_allocation =
            Self::distribute_colors(&colors, total_units, inputs.color_strategy);
        let sku_matrix = Self::sku_matrix(&order.garment_type, &size_allocation, &color_allocation);

        let reorder_triggers = Self::reorder_points(
            &sku_matrix,
            inputs.lead_time_weeks,
            inputs.expected_weekly_sales,
        );
        let dead_stock_risks =
            Self::dead_stock_risks(&sku_matrix, inputs.expected_weekly_sales);
        let sell_through = Self::forecast_sell_through(
            total_units,
            inputs.expected_weekly_sales,
            inputs.selling_season_weeks,
        );
        let recommendations = Self::recommendations(
            &size_allocation,
            &color_allocation,
            &dead_stock_risks,
            &sell_through,
        );

        InventoryPlan {
            product_name: order.garment_type.clone(),
            total_units,
            size_curve_applied: curve_key,
            size_allocation,
            color_allocation,
            sku_matrix,
            reorder_triggers,
            dead_stock_risks,
            sell_through,
            recommendations,
        }
    }

    /// 尺碼曲線解析鏈：
    /// 品類-版型複合鍵 → 版型關鍵字 → 客群關鍵字 → 預設曲線
    fn resolve_size_curve(
        inputs: &InventoryInputs,
        tables: &dyn ReferenceTables,
        warnings: &mut Vec<PlanWarning>,
    ) -> (String, SizeCurve) {
        let composite = format!("{}-{}", inputs.category, inputs.fit_type).to_lowercase();
        let fit = inputs.fit_type.to_lowercase();
        let demographic = inputs.target_demographic.to_lowercase();

        let mut chosen = None;
        for key in CURVE_KEYS {
            if composite.contains(key) || key.contains(fit.as_str()) {
                chosen = Some(key);
                break;
            }
        }

        let key = chosen.unwrap_or_else(|| {
            if fit.contains("athletic") {
                "athletic-fit"
            } else if fit.contains("relaxed") || fit.contains("oversized") {
                "relaxed-fit"
            } else if fit.contains("inclusive") || fit.contains("plus") {
                "plus-inclusive"
            } else if demographic.contains("womens") || demographic.contains("female") {
                "womens-fashion"
            } else {
                defaults::SIZE_CURVE_KEY
            }
        });

        match tables.size_curve(key) {
            Some(curve) => (key.to_string(), curve),
            None => {
                warnings.push(PlanWarning::new(
                    key.to_string(),
                    format!("參照表查無尺碼曲線 {}，套用預設曲線", key),
                    WarningSeverity::Warning,
                ));
                (
                    defaults::SIZE_CURVE_KEY.to_string(),
                    fallback_curve(),
                )
            }
        }
    }

    /// 尺碼拆分；捨入差額歸入 M 桶，總和精確等於總量
    fn apply_size_curve(total_units: u32, curve: &SizeCurve) -> Vec<SizeAllocation> {
        let total = Decimal::from(total_units);
        let hundred = Decimal::from(100);

        let mut allocation: Vec<SizeAllocation> = SizeCode::ALL
            .iter()
            .map(|&size| {
                let pct = curve.pct(size);
                let units = (total * pct / hundred).round();
                SizeAllocation {
                    size,
                    percentage: pct,
                    units: decimal_to_u32(units),
                }
            })
            .collect();

        let allocated: i64 = allocation.iter().map(|a| i64::from(a.units)).sum();
        let diff = i64::from(total_units) - allocated;
        if diff != 0 {
            // M 是索引 2
            allocation[2].units = (i64::from(allocation[2].units) + diff).max(0) as u32;
        }

        allocation
    }

    /// 配色拆分；各策略都把捨入差額歸入第一個配色
    fn distribute_colors(
        colors: &[String],
        total_units: u32,
        strategy: ColorStrategy,
    ) -> Vec<ColorAllocation> {
        let n = colors.len();
        let percentages: Vec<Decimal> = match strategy {
            ColorStrategy::NeutralHeavy => match n {
                1 => vec![Decimal::from(100)],
                2 => vec![Decimal::from(60), Decimal::from(40)],
                3 => vec![Decimal::from(40), Decimal::from(35), Decimal::from(25)],
                _ => even_split_pcts(n, true),
            },
            ColorStrategy::Balanced => even_split_pcts(n, true),
            ColorStrategy::TrendAccent => {
                if n <= 2 {
                    even_split_pcts(n, true)
                } else {
                    // n−1 個中性色均分 75%，最後一個強調色 25%
                    let neutral_each = Decimal::from(75 / (n as u32 - 1));
                    let mut pcts = vec![neutral_each; n - 1];
                    pcts.push(Decimal::from(25));
                    pcts
                }
            }
        };

        let total = Decimal::from(total_units);
        let hundred = Decimal::from(100);
        let mut allocation: Vec<ColorAllocation> = colors
            .iter()
            .zip(&percentages)
            .map(|(color, pct)| ColorAllocation {
                color: color.clone(),
                percentage: *pct,
                units: decimal_to_u32((total * *pct / hundred).trunc()),
            })
            .collect();

        let allocated: i64 = allocation.iter().map(|a| i64::from(a.units)).sum();
        let diff = i64::from(total_units) - allocated;
        if diff != 0 {
            allocation[0].units = (i64::from(allocation[0].units) + diff).max(0) as u32;
        }

        allocation
    }

    /// SKU 矩陣（配色 × 尺碼）；每個配色的捨入差額歸入該配色的 M SKU
    fn sku_matrix(
        product_name: &str,
        size_allocation: &[SizeAllocation],
        color_allocation: &[ColorAllocation],
    ) -> Vec<Sku> {
        let hundred = Decimal::from(100);
        let prefix = code_prefix(product_name);
        let mut matrix = Vec::new();

        for color in color_allocation {
            let color_total = Decimal::from(color.units);
            let start = matrix.len();

            for size in size_allocation {
                let units = (color_total * size.percentage / hundred).round();
                matrix.push(Sku {
                    code: format!("{}-{}-{}", prefix, code_prefix(&color.color), size.size.as_str()),
                    color: color.color.clone(),
                    size: size.size,
                    units: decimal_to_u32(units),
                });
            }

            let allocated: i64 = matrix[start..].iter().map(|s| i64::from(s.units)).sum();
            let diff = i64::from(color.units) - allocated;
            if diff != 0 {
                // M 是該配色區段的索引 2
                let m_sku = &mut matrix[start + 2];
                m_sku.units = (i64::from(m_sku.units) + diff).max(0) as u32;
            }
        }

        matrix
    }

    /// 補貨點（前置期需求 + 兩週安全庫存，含尺碼速度加權）
    fn reorder_points(
        sku_matrix: &[Sku],
        lead_time_weeks: u32,
        expected_weekly_sales: Decimal,
    ) -> Vec<ReorderTrigger> {
        if sku_matrix.is_empty() {
            return Vec::new();
        }

        let avg_weekly = expected_weekly_sales / Decimal::from(sku_matrix.len() as u32);

        sku_matrix
            .iter()
            .map(|sku| {
                let weekly = avg_weekly * size_velocity_multiplier(sku.size);
                let lead_demand = weekly * Decimal::from(lead_time_weeks);
                let safety_stock = weekly * Decimal::from(SAFETY_STOCK_WEEKS);
                let reorder_point = decimal_to_u32((lead_demand + safety_stock).trunc());

                let weeks_of_inventory = if weekly > Decimal::ZERO {
                    Some((Decimal::from(sku.units) / weekly).round_dp(1))
                } else {
                    None
                };

                let urgency = match weeks_of_inventory {
                    Some(weeks) if weeks < Decimal::from(lead_time_weeks) => ReorderUrgency::High,
                    Some(weeks) if weeks < Decimal::from(lead_time_weeks + 4) => {
                        ReorderUrgency::Medium
                    }
                    _ => ReorderUrgency::Low,
                };

                ReorderTrigger {
                    sku_code: sku.code.clone(),
                    initial_stock: sku.units,
                    expected_weekly_sales: weekly.round_dp(1),
                    reorder_point,
                    reorder_quantity: reorder_point,
                    lead_time_weeks,
                    safety_stock_units: decimal_to_u32(safety_stock.trunc()),
                    weeks_of_inventory,
                    urgency,
                }
            })
            .collect()
    }

    /// 滯銷風險標記（> 20 週高風險，> 12 週中風險）
    fn dead_stock_risks(
        sku_matrix: &[Sku],
        expected_weekly_sales: Decimal,
    ) -> Vec<DeadStockRisk> {
        if sku_matrix.is_empty() {
            return Vec::new();
        }

        let avg_weekly = expected_weekly_sales / Decimal::from(sku_matrix.len() as u32);
        let mut risks = Vec::new();

        for sku in sku_matrix {
            let weekly = avg_weekly * size_velocity_multiplier(sku.size);
            let weeks_to_sell = if weekly > Decimal::ZERO {
                Some((Decimal::from(sku.units) / weekly).round_dp(1))
            } else {
                None
            };

            // 週銷量為零視同永遠賣不完
            let risk_level = match weeks_to_sell {
                None => StockRiskLevel::High,
                Some(weeks) if weeks > Decimal::from(20) => StockRiskLevel::High,
                Some(weeks) if weeks > Decimal::from(12) => StockRiskLevel::Medium,
                _ => continue,
            };

            let (recommendation, markdown_timing, markdown_percentage) = match risk_level {
                StockRiskLevel::High => (
                    "Reduce units by 40-50% in next order. Consider markdown at week 8.",
                    "Week 8-10",
                    "30-40%",
                ),
                StockRiskLevel::Medium => (
                    "Monitor closely. Potential markdown needed at week 10-12.",
                    "Week 10-14",
                    "20-30%",
                ),
            };

            risks.push(DeadStockRisk {
                sku_code: sku.code.clone(),
                units: sku.units,
                estimated_weeks_to_sell: weeks_to_sell,
                risk_level,
                recommendation: recommendation.to_string(),
                markdown_timing: markdown_timing.to_string(),
                markdown_percentage: markdown_percentage.to_string(),
            });
        }

        risks
    }

    /// 售罄預測與逐月進度
    fn forecast_sell_through(
        total_units: u32,
        expected_weekly_sales: Decimal,
        selling_season_weeks: u32,
    ) -> SellThrough {
        let total = Decimal::from(total_units);
        let expected_total = expected_weekly_sales * Decimal::from(selling_season_weeks);

        let sell_through_pct = if total > Decimal::ZERO {
            (expected_total / total * Decimal::from(100)).round_dp(1)
        } else {
            Decimal::ZERO
        };

        let weeks_to_sell_out = if expected_weekly_sales > Decimal::ZERO {
            Some((total / expected_weekly_sales).round_dp(1))
        } else {
            None
        };

        let (rating, risk_assessment) = if sell_through_pct >= Decimal::from(85) {
            (
                SellThroughRating::Excellent,
                "Potential stockout risk - consider reorder timing",
            )
        } else if sell_through_pct >= Decimal::from(70) {
            (SellThroughRating::Good, "Healthy sell-through expected")
        } else if sell_through_pct >= Decimal::from(50) {
            (
                SellThroughRating::Moderate,
                "Some dead stock likely - plan markdowns",
            )
        } else {
            (
                SellThroughRating::Poor,
                "Significant dead stock risk - reduce next order",
            )
        };

        let month_count = match weeks_to_sell_out {
            Some(weeks) => {
                let whole_months = (weeks / Decimal::from(4)).trunc();
                decimal_to_u32(whole_months).saturating_add(1).min(6)
            }
            None => 6,
        };

        let mut monthly_breakdown = Vec::new();
        for month in 1..=month_count {
            let start_week = (month - 1) * 4;
            let end_week = (month * 4).min(selling_season_weeks.max(start_week));
            let weeks_in_month = end_week - start_week;

            let units_sold =
                decimal_to_u32((expected_weekly_sales * Decimal::from(weeks_in_month)).trunc());
            let cumulative_sold =
                decimal_to_u32((expected_weekly_sales * Decimal::from(end_week)).trunc());
            let remaining = total_units.saturating_sub(cumulative_sold);

            let inventory_weeks_remaining = if expected_weekly_sales > Decimal::ZERO {
                Some((Decimal::from(remaining) / expected_weekly_sales).round_dp(1))
            } else {
                None
            };

            monthly_breakdown.push(MonthlySellThrough {
                month,
                units_sold,
                cumulative_sold,
                remaining_inventory: remaining,
                inventory_weeks_remaining,
            });
        }

        SellThrough {
            total_units,
            expected_total_sales: decimal_to_u32(expected_total.trunc()),
            expected_sell_through_pct: sell_through_pct,
            weeks_to_sell_out,
            rating,
            risk_assessment: risk_assessment.to_string(),
            monthly_breakdown,
        }
    }

    fn recommendations(
        size_allocation: &[SizeAllocation],
        color_allocation: &[ColorAllocation],
        dead_stock_risks: &[DeadStockRisk],
        sell_through: &SellThrough,
    ) -> Vec<String> {
        let mut recs = Vec::new();

        let pct_of = |size: SizeCode| {
            size_allocation
                .iter()
                .find(|a| a.size == size)
                .map(|a| a.percentage)
                .unwrap_or(Decimal::ZERO)
        };

        let xs_pct = pct_of(SizeCode::Xs);
        let xxl_pct = pct_of(SizeCode::Xxl);
        if xs_pct > Decimal::from(5) || xxl_pct > Decimal::from(5) {
            recs.push(format!(
                "Consider reducing XS ({}%) and XXL ({}%) to 3-4% each. These sizes typically have lowest velocity.",
                xs_pct, xxl_pct
            ));
        }

        if color_allocation.len() > 3 {
            recs.push(format!(
                "You have {} colors. Consider consolidating to 3 core colors to reduce SKU complexity and meet fabric MOQs.",
                color_allocation.len()
            ));
        }

        let high_risk = dead_stock_risks
            .iter()
            .filter(|r| r.risk_level == StockRiskLevel::High)
            .count();
        if high_risk > 0 {
            recs.push(format!(
                "{} SKUs at high dead stock risk. Plan markdowns early (week 8-10) to clear inventory.",
                high_risk
            ));
        }

        if sell_through.expected_sell_through_pct > Decimal::from(90) {
            recs.push(
                "Strong sell-through forecast (>90%). Consider producing 10-15% more units or planning faster reorder."
                    .to_string(),
            );
        } else if sell_through.expected_sell_through_pct < Decimal::from(60) {
            recs.push(format!(
                "Low sell-through forecast ({}%). Reduce initial order by 20-30% to minimize dead stock risk.",
                sell_through.expected_sell_through_pct.round()
            ));
        }

        let ml_pct = pct_of(SizeCode::M) + pct_of(SizeCode::L);
        if ml_pct < Decimal::from(55) {
            recs.push(format!(
                "M+L allocation is {}%. Consider increasing to 60-65% as these are fastest-moving sizes.",
                ml_pct
            ));
        }

        if recs.is_empty() {
            recs.push(
                "Inventory allocation looks well-optimized. Monitor actual sales data and adjust for reorders."
                    .to_string(),
            );
        }

        recs
    }
}

/// 均分百分比；`bias_first` 時整數餘額加到第一個
fn even_split_pcts(n: usize, bias_first: bool) -> Vec<Decimal> {
    let base = 100 / n as u32;
    let remainder = 100 - base * n as u32;

    (0..n)
        .map(|i| {
            if i == 0 && bias_first {
                Decimal::from(base + remainder)
            } else {
                Decimal::from(base)
            }
        })
        .collect()
}

/// 內建的後備曲線（與預設鍵同值）
fn fallback_curve() -> SizeCurve {
    SizeCurve::new(
        "Activewear Standard Fit",
        [
            Decimal::from(4),
            Decimal::from(18),
            Decimal::from(32),
            Decimal::from(28),
            Decimal::from(14),
            Decimal::from(4),
        ],
        "Athletic demographic, M/L bias",
    )
}

fn code_prefix(name: &str) -> String {
    name.chars().take(3).collect::<String>().to_uppercase()
}

fn decimal_to_u32(value: Decimal) -> u32 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_u32().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stitch_tables::StaticTables;

    fn inputs(strategy: ColorStrategy) -> InventoryInputs {
        InventoryInputs {
            category: "activewear".to_string(),
            fit_type: "standard".to_string(),
            target_demographic: "unisex".to_string(),
            color_strategy: strategy,
            lead_time_weeks: 8,
            expected_weekly_sales: Decimal::from(25),
            selling_season_weeks: 16,
        }
    }

    fn hoodie_order(units: u32, colors: &[&str]) -> OrderSpec {
        OrderSpec::new(
            "hoodie-pullover",
            SizeCode::M,
            "cotton-jersey-180gsm",
            "EcoKnits-Tirupur",
            units,
        )
        .with_colors(colors.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_size_split_remainder_goes_to_m() {
        let tables = StaticTables::new();
        let curve = tables.size_curve("activewear-standard").unwrap();
        let allocation = AllocationCalculator::apply_size_curve(503, &curve);

        let total: u32 = allocation.iter().map(|a| a.units).sum();
        assert_eq!(total, 503);
    }

    #[test]
    fn test_curve_resolution_chain() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();

        let mut i = inputs(ColorStrategy::Balanced);
        i.fit_type = "athletic".to_string();
        let (key, _) = AllocationCalculator::resolve_size_curve(&i, &tables, &mut warnings);
        assert_eq!(key, "athletic-fit");

        i.fit_type = "oversized".to_string();
        let (key, _) = AllocationCalculator::resolve_size_curve(&i, &tables, &mut warnings);
        assert_eq!(key, "relaxed-fit");

        i.fit_type = "regular".to_string();
        i.target_demographic = "womens".to_string();
        i.category = "fashion".to_string();
        let (key, _) = AllocationCalculator::resolve_size_curve(&i, &tables, &mut warnings);
        assert_eq!(key, "womens-fashion");

        i.target_demographic = "unisex".to_string();
        let (key, _) = AllocationCalculator::resolve_size_curve(&i, &tables, &mut warnings);
        assert_eq!(key, defaults::SIZE_CURVE_KEY);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_neutral_heavy_three_colors() {
        let allocation = AllocationCalculator::distribute_colors(
            &["black".to_string(), "grey".to_string(), "olive".to_string()],
            500,
            ColorStrategy::NeutralHeavy,
        );

        assert_eq!(allocation[0].units, 200);
        assert_eq!(allocation[1].units, 175);
        assert_eq!(allocation[2].units, 125);
        assert_eq!(allocation.iter().map(|a| a.units).sum::<u32>(), 500);
    }

    #[test]
    fn test_trend_accent_reserves_25_pct() {
        let allocation = AllocationCalculator::distribute_colors(
            &[
                "black".to_string(),
                "grey".to_string(),
                "neon-green".to_string(),
            ],
            400,
            ColorStrategy::TrendAccent,
        );

        // 兩個中性色各 37%，強調色 25%，差額歸第一色
        assert_eq!(allocation[2].percentage, Decimal::from(25));
        assert_eq!(allocation[2].units, 100);
        assert_eq!(allocation.iter().map(|a| a.units).sum::<u32>(), 400);
    }

    #[test]
    fn test_sku_matrix_reconciles_per_color() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let order = hoodie_order(500, &["black", "heather-grey"]);
        let plan = AllocationCalculator::calculate(
            &order,
            &inputs(ColorStrategy::NeutralHeavy),
            &tables,
            &mut warnings,
        );

        assert_eq!(plan.sku_matrix.len(), 12);
        for color in &plan.color_allocation {
            let color_total: u32 = plan
                .sku_matrix
                .iter()
                .filter(|s| s.color == color.color)
                .map(|s| s.units)
                .sum();
            assert_eq!(color_total, color.units);
        }
        assert_eq!(plan.sku_matrix[0].code, "HOO-BLA-XS");
    }

    #[test]
    fn test_reorder_urgency_thresholds() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let order = hoodie_order(500, &["black"]);
        let plan = AllocationCalculator::calculate(
            &order,
            &inputs(ColorStrategy::Balanced),
            &tables,
            &mut warnings,
        );

        for trigger in &plan.reorder_triggers {
            let weeks = trigger.weeks_of_inventory.unwrap();
            match trigger.urgency {
                ReorderUrgency::High => assert!(weeks < Decimal::from(8)),
                ReorderUrgency::Medium => {
                    assert!(weeks >= Decimal::from(8) && weeks < Decimal::from(12))
                }
                ReorderUrgency::Low => assert!(weeks >= Decimal::from(12)),
            }
        }
    }

    #[test]
    fn test_zero_weekly_sales_degenerates() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let order = hoodie_order(300, &["black"]);
        let mut i = inputs(ColorStrategy::Balanced);
        i.expected_weekly_sales = Decimal::ZERO;
        let plan = AllocationCalculator::calculate(&order, &i, &tables, &mut warnings);

        assert_eq!(plan.sell_through.weeks_to_sell_out, None);
        assert_eq!(plan.sell_through.rating, SellThroughRating::Poor);
        for trigger in &plan.reorder_triggers {
            assert_eq!(trigger.weeks_of_inventory, None);
            assert_eq!(trigger.urgency, ReorderUrgency::Low);
        }
        // 賣不動的 SKU 全部標為高滯銷風險
        assert_eq!(plan.dead_stock_risks.len(), plan.sku_matrix.len());
        for risk in &plan.dead_stock_risks {
            assert_eq!(risk.risk_level, StockRiskLevel::High);
            assert_eq!(risk.estimated_weeks_to_sell, None);
        }
    }

    #[test]
    fn test_sell_through_ratings() {
        // 25 × 16 = 400 / 500 = 80% → good
        let forecast = AllocationCalculator::forecast_sell_through(500, Decimal::from(25), 16);
        assert_eq!(forecast.rating, SellThroughRating::Good);
        assert_eq!(forecast.expected_sell_through_pct, Decimal::from(80));

        // 30 × 16 = 480 / 500 = 96% → excellent
        let forecast = AllocationCalculator::forecast_sell_through(500, Decimal::from(30), 16);
        assert_eq!(forecast.rating, SellThroughRating::Excellent);
    }

    proptest! {
        /// 任意總量與配色數下，配色分配總和必等於總量
        #[test]
        fn prop_color_units_sum_to_total(
            total in 1u32..5000,
            n_colors in 1usize..8,
            strategy_idx in 0usize..3,
        ) {
            let colors: Vec<String> = (0..n_colors).map(|i| format!("color-{}", i)).collect();
            let strategy = [
                ColorStrategy::NeutralHeavy,
                ColorStrategy::Balanced,
                ColorStrategy::TrendAccent,
            ][strategy_idx];

            let allocation = AllocationCalculator::distribute_colors(&colors, total, strategy);
            let sum: u32 = allocation.iter().map(|a| a.units).sum();
            prop_assert_eq!(sum, total);
        }

        /// 任意總量下，尺碼分配總和必等於總量
        #[test]
        fn prop_size_units_sum_to_total(total in 1u32..5000) {
            let curve = fallback_curve();
            let allocation = AllocationCalculator::apply_size_curve(total, &curve);
            let sum: u32 = allocation.iter().map(|a| a.units).sum();
            prop_assert_eq!(sum, total);
        }
    }
}
