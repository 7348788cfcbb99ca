//! 生產規劃主計算器

use std::sync::Arc;

use stitch_core::tables::ReferenceTables;
use stitch_core::{PlanRequest, Result};

use crate::{
    AllocationCalculator, CashFlowCalculator, CostingCalculator, MoqCalculator, PlanWarning,
    ProductionPlan, TimelineCalculator,
};

/// 生產規劃計算器
///
/// 持有共享的參照表提供者；每個請求都是獨立的純計算，
/// 計算器本身無狀態，可跨執行緒併發使用。
pub struct PlanCalculator {
    /// 參照表提供者（唯讀共享）
    tables: Arc<dyn ReferenceTables>,
}

impl PlanCalculator {
    /// 創建新的規劃計算器
    pub fn new(tables: Arc<dyn ReferenceTables>) -> Self {
        Self { tables }
    }

    /// 主計算入口
    ///
    /// 成本鏈是唯一的資料相依：現金流需要成本結果，
    /// 庫存/時程/MOQ 彼此獨立，以 rayon 並行計算。
    pub fn calculate(&self, request: &PlanRequest) -> Result<ProductionPlan> {
        tracing::info!(
            "開始生產規劃計算：{} / {} 件 @ {}",
            request.order.garment_type,
            request.order.units,
            request.order.supplier
        );

        let start_time = std::time::Instant::now();
        let tables = self.tables.as_ref();

        // Step 1: 請求驗證
        tracing::debug!("Step 1: 請求驗證");
        request.order.validate()?;

        // Step 2: 成本鏈（下游階段的資料相依）
        tracing::debug!("Step 2: 成本鏈計算");
        let mut warnings: Vec<PlanWarning> = Vec::new();
        let cost = CostingCalculator::calculate(&request.order, tables, &mut warnings)?;
        tracing::debug!("到岸成本: {}", cost.landed_cost);

        // Step 3: 獨立下游階段並行計算
        tracing::debug!("Step 3: 現金流 / 庫存 / 時程 / MOQ");
        let ((cashflow, inventory_out), (timeline_out, moq_out)) = rayon::join(
            || {
                rayon::join(
                    || CashFlowCalculator::calculate(&request.order, &request.finance, &cost),
                    || {
                        let mut stage_warnings = Vec::new();
                        let plan = AllocationCalculator::calculate(
                            &request.order,
                            &request.inventory,
                            tables,
                            &mut stage_warnings,
                        );
                        (plan, stage_warnings)
                    },
                )
            },
            || {
                rayon::join(
                    || {
                        let mut stage_warnings = Vec::new();
                        let plan = TimelineCalculator::calculate(
                            &request.order,
                            &request.timeline,
                            tables,
                            &mut stage_warnings,
                        );
                        (plan, stage_warnings)
                    },
                    || {
                        request.moq.as_ref().map(|inputs| {
                            let mut stage_warnings = Vec::new();
                            let plan =
                                MoqCalculator::calculate(inputs, tables, &mut stage_warnings);
                            (plan, stage_warnings)
                        })
                    },
                )
            },
        );

        // Step 4: 彙整結果與警告
        tracing::debug!("Step 4: 彙整結果");
        let (inventory, inventory_warnings) = inventory_out;
        let (timeline, timeline_warnings) = timeline_out;
        warnings.extend(inventory_warnings);
        warnings.extend(timeline_warnings);

        let moq = moq_out.map(|(plan, moq_warnings)| {
            warnings.extend(moq_warnings);
            plan
        });

        let elapsed_ms = start_time.elapsed().as_millis();
        tracing::info!(
            "生產規劃計算完成：{} 個警告，耗時 {} ms",
            warnings.len(),
            elapsed_ms
        );

        Ok(ProductionPlan {
            request_id: request.id,
            cost,
            cashflow,
            inventory,
            timeline,
            moq,
            warnings,
            calculation_time_ms: Some(elapsed_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use stitch_core::{
        ColorStrategy, Complexity, FinanceInputs, InventoryInputs, MoqInputs, OrderSpec,
        PaymentFlexibility, SizeCode, TimelineInputs,
    };
    use stitch_tables::StaticTables;

    fn hoodie_request() -> PlanRequest {
        let order = OrderSpec::new(
            "hoodie-pullover",
            SizeCode::M,
            "cotton-jersey-180gsm",
            "EcoKnits-Tirupur",
            500,
        )
        .with_colors(vec!["black".to_string(), "heather-grey".to_string()]);
        let finance = FinanceInputs {
            initial_capital: Decimal::from(25_000),
            retail_price: None,
            expected_monthly_sales: vec![60, 80, 90, 90, 70, 60],
        };
        let inventory = InventoryInputs {
            category: "activewear".to_string(),
            fit_type: "standard".to_string(),
            target_demographic: "unisex".to_string(),
            color_strategy: ColorStrategy::NeutralHeavy,
            lead_time_weeks: 8,
            expected_weekly_sales: Decimal::from(25),
            selling_season_weeks: 26,
        };
        let timeline = TimelineInputs {
            order_month: 3,
            complexity: Complexity::Medium,
            today: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        };
        PlanRequest::new(order, finance, inventory, timeline)
    }

    #[test]
    fn test_full_plan_without_moq() {
        let calculator = PlanCalculator::new(Arc::new(StaticTables::new()));
        let plan = calculator.calculate(&hoodie_request()).unwrap();

        assert_eq!(plan.cost.landed_cost, Decimal::new(6842, 2));
        assert!(plan.cashflow.ledger_consistent());
        assert_eq!(plan.inventory.size_units_total(), 500);
        assert!(plan.timeline.phases_contiguous());
        assert!(plan.moq.is_none());
        assert!(plan.warnings.is_empty());
        assert!(plan.calculation_time_ms.is_some());
    }

    #[test]
    fn test_full_plan_with_moq() {
        let calculator = PlanCalculator::new(Arc::new(StaticTables::new()));
        let request = hoodie_request().with_moq(MoqInputs {
            num_styles: 3,
            order_month: 3,
            payment_flexibility: PaymentFlexibility::FiftyDeposit,
            target_units: 500,
            fabrics: vec!["cotton-jersey-180gsm".to_string()],
            colors: vec!["black".to_string(), "heather-grey".to_string()],
        });

        let plan = calculator.calculate(&request).unwrap();
        let moq = plan.moq.unwrap();
        assert!(moq.any_meets_target());
        assert!(!moq.strategies.is_empty());
    }

    #[test]
    fn test_invalid_request_fails_fast() {
        let calculator = PlanCalculator::new(Arc::new(StaticTables::new()));
        let mut request = hoodie_request();
        request.order.units = 0;

        assert!(calculator.calculate(&request).is_err());
    }

    #[test]
    fn test_unknown_keys_accumulate_warnings() {
        let calculator = PlanCalculator::new(Arc::new(StaticTables::new()));
        let mut request = hoodie_request();
        request.order.garment_type = "cargo-vest".to_string();
        request.order.fabric = "hemp-canvas".to_string();
        request.order.supplier = "NewMill-Izmir".to_string();

        let plan = calculator.calculate(&request).unwrap();
        assert!(!plan.warnings.is_empty());
        assert!(plan.cost.landed_cost > plan.cost.fob);
    }
}
