//! 成本鏈計算（用布量 → BOM → FOB → 到岸成本 → 定價）

use rust_decimal::Decimal;

use stitch_core::tables::{defaults, ReferenceTables, TrimItem};
use stitch_core::{CostBreakdown, OrderSpec, PriceTier, PricingTiers, Result};

use crate::{PlanWarning, WarningSeverity};

/// 報關行固定費用（整單攤提）
const CUSTOMS_BROKER_FLAT: i64 = 125;

/// 每件驗貨費（美分）
const INSPECTION_CENTS: i64 = 40;

/// 每件入倉費（美分）
const RECEIVING_CENTS: i64 = 65;

/// 成本鏈計算器
pub struct CostingCalculator;

impl CostingCalculator {
    /// 計算單件完整成本分解
    ///
    /// 查無鍵的款式/布料/供應商以文件化預設值解析並附警告，
    /// 不會因此失敗。
    pub fn calculate(
        order: &OrderSpec,
        tables: &dyn ReferenceTables,
        warnings: &mut Vec<PlanWarning>,
    ) -> Result<CostBreakdown> {
        order.validate()?;

        tracing::debug!(
            "成本計算: {} / {} / {} / {} 件",
            order.garment_type,
            order.fabric,
            order.supplier,
            order.units
        );

        // 用布量
        let base = lookup(
            tables.base_meters(&order.garment_type, order.size),
            defaults::base_meters(),
            &order.garment_type,
            "基礎用布量",
            warnings,
        );
        let efficiency = lookup(
            tables.pattern_efficiency(&order.garment_type),
            defaults::pattern_efficiency(),
            &order.garment_type,
            "排版效率",
            warnings,
        );
        let shrinkage = lookup(
            tables.shrinkage(&order.fabric),
            defaults::shrinkage(),
            &order.fabric,
            "縮率",
            warnings,
        );
        let waste = lookup(
            tables.waste(&order.fabric),
            defaults::waste(),
            &order.fabric,
            "裁耗率",
            warnings,
        );

        let one = Decimal::ONE;
        let consumption = (base / efficiency * (one + shrinkage) * (one + waste)).round_dp(2);

        // 布料成本
        let price_per_meter = lookup(
            tables.fabric_price(&order.fabric),
            defaults::fabric_price(),
            &order.fabric,
            "布料單價",
            warnings,
        );
        let fabric_cost = (consumption * price_per_meter).round_dp(2);

        // 輔料
        let trim_items = match tables.trim_bill(&order.garment_type) {
            Some(items) => items,
            None => {
                warnings.push(PlanWarning::new(
                    order.garment_type.clone(),
                    format!("查無 {} 的輔料清單，套用基礎輔料", order.garment_type),
                    WarningSeverity::Warning,
                ));
                vec![TrimItem::new("basic-trims", defaults::trim_cost())]
            }
        };
        let trim_cost = trim_items
            .iter()
            .map(|t| t.unit_cost)
            .sum::<Decimal>()
            .round_dp(2);

        // 人工
        let smv = lookup(
            tables.smv_minutes(&order.garment_type),
            defaults::smv_minutes(),
            &order.garment_type,
            "標準工時",
            warnings,
        );
        let labor_rate = lookup(
            tables.labor_rate(&order.supplier),
            defaults::labor_rate(),
            &order.supplier,
            "每分鐘工資",
            warnings,
        );
        let labor_cost = (smv * labor_rate).round_dp(2);

        // 管銷與利潤（利潤以未捨入的小計計算）
        let direct_cost = fabric_cost + trim_cost + labor_cost;
        let overhead_rate = lookup(
            tables.overhead_rate(&order.supplier),
            defaults::overhead_rate(),
            &order.supplier,
            "管銷費率",
            warnings,
        );
        let profit_rate = lookup(
            tables.profit_rate(&order.supplier),
            defaults::profit_rate(),
            &order.supplier,
            "利潤率",
            warnings,
        );
        let overhead_exact = direct_cost * overhead_rate;
        let overhead = overhead_exact.round_dp(2);
        let factory_profit = ((direct_cost + overhead_exact) * profit_rate).round_dp(2);

        let fob = direct_cost + overhead + factory_profit;

        // 到岸成本
        let freight = lookup(
            tables.freight_per_unit(&order.supplier),
            defaults::freight_per_unit(),
            &order.supplier,
            "每件海運費",
            warnings,
        );
        let duty_rate = lookup(
            tables.duty_rate(&order.garment_type),
            defaults::duty_rate(),
            &order.garment_type,
            "關稅率",
            warnings,
        );
        let duty = (fob * duty_rate).round_dp(2);
        let customs_broker =
            (Decimal::from(CUSTOMS_BROKER_FLAT) / Decimal::from(order.units)).round_dp(2);
        let inspection = Decimal::new(INSPECTION_CENTS, 2);
        let receiving = Decimal::new(RECEIVING_CENTS, 2);

        let landed_cost = fob + freight + duty + customs_broker + inspection + receiving;

        let pricing = Self::pricing_tiers(landed_cost);

        Ok(CostBreakdown {
            garment_type: order.garment_type.clone(),
            size: order.size.as_str().to_string(),
            fabric: order.fabric.clone(),
            supplier: order.supplier.clone(),
            units: order.units,
            fabric_consumption_meters: consumption,
            fabric_cost,
            trim_items,
            trim_cost,
            labor_cost,
            overhead,
            factory_profit,
            fob,
            freight,
            duty,
            customs_broker,
            inspection,
            receiving,
            landed_cost,
            pricing,
        })
    }

    /// 三層定價建議（"X9" 尾數定價）
    pub fn pricing_tiers(landed_cost: Decimal) -> PricingTiers {
        PricingTiers {
            dtc: Self::price_tier(landed_cost, Decimal::new(28, 1)),
            wholesale: Self::price_tier(landed_cost, Decimal::new(22, 1)),
            premium: Self::price_tier(landed_cost, Decimal::new(35, 1)),
        }
    }

    fn price_tier(landed_cost: Decimal, multiplier: Decimal) -> PriceTier {
        let ten = Decimal::from(10);
        let price = (landed_cost * multiplier / ten).round() * ten - Decimal::ONE;

        let margin_pct = if price > Decimal::ZERO {
            ((price - landed_cost) / price * Decimal::from(100)).round_dp(1)
        } else {
            Decimal::ZERO
        };

        PriceTier { price, margin_pct }
    }
}

fn lookup(
    value: Option<Decimal>,
    fallback: Decimal,
    key: &str,
    what: &str,
    warnings: &mut Vec<PlanWarning>,
) -> Decimal {
    match value {
        Some(v) => v,
        None => {
            warnings.push(PlanWarning::new(
                key.to_string(),
                format!("查無 {} 的{}，套用預設值 {}", key, what, fallback),
                WarningSeverity::Warning,
            ));
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitch_core::order::SizeCode;
    use stitch_tables::StaticTables;

    fn hoodie_order() -> OrderSpec {
        OrderSpec::new(
            "hoodie-pullover",
            SizeCode::M,
            "cotton-jersey-180gsm",
            "EcoKnits-Tirupur",
            500,
        )
    }

    #[test]
    fn test_hoodie_m_full_chain() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let b = CostingCalculator::calculate(&hoodie_order(), &tables, &mut warnings).unwrap();

        // 2.2 / 0.78 × 1.03 × 1.15 = 3.3410... → 3.34
        assert_eq!(b.fabric_consumption_meters, Decimal::new(334, 2));
        assert_eq!(b.fabric_cost, Decimal::new(1937, 2));
        assert_eq!(b.trim_cost, Decimal::new(79, 2));
        assert_eq!(b.labor_cost, Decimal::new(2275, 2));
        assert_eq!(b.overhead, Decimal::new(687, 2));
        assert_eq!(b.factory_profit, Decimal::new(498, 2));
        assert_eq!(b.fob, Decimal::new(5476, 2));
        assert_eq!(b.duty, Decimal::new(876, 2));
        assert_eq!(b.customs_broker, Decimal::new(25, 2));
        assert_eq!(b.landed_cost, Decimal::new(6842, 2));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_hoodie_m_pricing() {
        let tiers = CostingCalculator::pricing_tiers(Decimal::new(6842, 2));

        // 68.42 × 2.8 = 191.576 → 190 − 1 = 189
        assert_eq!(tiers.dtc.price, Decimal::from(189));
        assert_eq!(tiers.dtc.margin_pct, Decimal::new(638, 1));
        // 68.42 × 2.2 = 150.524 → 149
        assert_eq!(tiers.wholesale.price, Decimal::from(149));
        assert_eq!(tiers.wholesale.margin_pct, Decimal::new(541, 1));
        // 68.42 × 3.5 = 239.47 → 239
        assert_eq!(tiers.premium.price, Decimal::from(239));
        assert_eq!(tiers.premium.margin_pct, Decimal::new(714, 1));
    }

    #[test]
    fn test_consumption_exceeds_base_meters() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let b = CostingCalculator::calculate(&hoodie_order(), &tables, &mut warnings).unwrap();

        // 效率、縮率、裁耗三個因子都 ≥ 1
        assert!(b.fabric_consumption_meters > Decimal::new(22, 1));
    }

    #[test]
    fn test_unknown_keys_default_with_warnings() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let order = OrderSpec::new("cargo-vest", SizeCode::M, "hemp-canvas", "NewMill-Izmir", 200);
        let b = CostingCalculator::calculate(&order, &tables, &mut warnings).unwrap();

        // 預設: 2.0 / 0.80 × 1.03 × 1.15 = 2.96125 → 2.96
        assert_eq!(b.fabric_consumption_meters, Decimal::new(296, 2));
        assert_eq!(b.trim_cost, Decimal::new(50, 2));
        assert!(!warnings.is_empty());
        assert!(b.landed_cost > b.fob);
    }

    #[test]
    fn test_zero_units_rejected() {
        let tables = StaticTables::new();
        let mut warnings = Vec::new();
        let mut order = hoodie_order();
        order.units = 0;
        assert!(CostingCalculator::calculate(&order, &tables, &mut warnings).is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        const GARMENTS: [&str; 5] = [
            "t-shirt-basic",
            "hoodie-pullover",
            "jogger-pants",
            "leggings-activewear",
            "jacket-bomber",
        ];
        const FABRICS: [&str; 5] = [
            "cotton-jersey-180gsm",
            "recycled-polyester-performance",
            "organic-cotton-twill",
            "merino-wool-blend",
            "tencel-lyocell-jersey",
        ];
        const SUPPLIERS: [&str; 6] = [
            "EcoKnits-Tirupur",
            "VietnamTex-HoChiMinh",
            "PortugalPremium-Porto",
            "ChinaScale-Guangzhou",
            "MakersRow-LosAngeles",
            "BangladeshValue-Dhaka",
        ];

        proptest! {
            // FOB 與到岸成本必須可由分項精確重建
            #[test]
            fn prop_breakdown_reconstructs_exactly(
                garment in 0usize..5,
                fabric in 0usize..5,
                supplier in 0usize..6,
                size in 0usize..6,
                units in 1u32..5000,
            ) {
                let tables = StaticTables::new();
                let mut warnings = Vec::new();
                let order = OrderSpec::new(
                    GARMENTS[garment],
                    SizeCode::ALL[size],
                    FABRICS[fabric],
                    SUPPLIERS[supplier],
                    units,
                );
                let b = CostingCalculator::calculate(&order, &tables, &mut warnings).unwrap();

                prop_assert_eq!(b.reconstructed_fob(), b.fob);
                prop_assert_eq!(b.reconstructed_landed(), b.landed_cost);
                prop_assert!(b.landed_cost > b.fob);
                prop_assert!(warnings.is_empty());
            }
        }
    }
}
