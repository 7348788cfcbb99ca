//! 現金流推演（付款排程 → 逐月帳本 → 資金/損益平衡/補單/風險）

use rust_decimal::Decimal;

use stitch_core::cashflow::{
    BreakevenAnalysis, CapitalAssessment, CashFlowPeriod, CashFlowTimeline, PaymentSchedule,
    PricingAdvice, PricingHealth, ReorderPlan, RiskScenario,
};
use stitch_core::{CostBreakdown, FinanceInputs, OrderSpec};

/// 打樣費
const SAMPLING_COST: i64 = 1500;
/// 工藝單開發費
const TECHPACK_COST: i64 = 500;
/// 上市前行銷
const MARKETING_PRELAUNCH: i64 = 3000;
/// 商品攝影
const PHOTOGRAPHY: i64 = 1200;
/// 網站建置
const WEBSITE_SETUP: i64 = 800;
/// 上市月固定開銷
const LAUNCH_MONTH_OPEX: i64 = 1000;
/// 銷售月固定開銷
const MONTHLY_FIXED_OPEX: i64 = 800;
/// 資金不足時的應急準備金
const CONTINGENCY: i64 = 2000;
/// 預測的銷售月數上限
const SALES_HORIZON_MONTHS: usize = 6;

/// 現金流計算器
pub struct CashFlowCalculator;

impl CashFlowCalculator {
    /// 推演完整現金流時間軸
    ///
    /// 零售價未指定時採用成本鏈的 DTC 建議價。
    pub fn calculate(
        order: &OrderSpec,
        finance: &FinanceInputs,
        cost: &CostBreakdown,
    ) -> CashFlowTimeline {
        let retail_price = finance.retail_price.unwrap_or(cost.pricing.dtc.price);

        tracing::debug!(
            "現金流推演: 資金 {}，零售價 {}，{} 個銷售月",
            finance.initial_capital,
            retail_price,
            finance.expected_monthly_sales.len().min(SALES_HORIZON_MONTHS)
        );

        let schedule = Self::payment_schedule(order, cost);
        let periods = Self::build_ledger(order, finance, &schedule, retail_price);

        let (lowest, lowest_month, final_cash) =
            ledger_extremes(finance.initial_capital, &periods);

        let capital = Self::assess_capital(finance.initial_capital, lowest, lowest_month);
        let breakeven = Self::find_breakeven(finance.initial_capital, &periods);
        let reorder = Self::plan_reorder(order, finance, cost, &periods);
        let risk_scenarios = Self::stress_scenarios(finance.initial_capital, &periods);
        let pricing_advice = Self::pricing_advice(cost.landed_cost, retail_price);

        CashFlowTimeline {
            initial_capital: finance.initial_capital,
            payment_schedule: schedule,
            periods,
            final_cash_position: final_cash,
            capital,
            breakeven,
            reorder,
            risk_scenarios,
            pricing_advice,
        }
    }

    /// 上市前固定支出節點
    fn payment_schedule(order: &OrderSpec, cost: &CostBreakdown) -> PaymentSchedule {
        let units = Decimal::from(order.units);
        let total_fob = cost.fob * units;
        let total_landed = cost.landed_cost * units;
        let hundred = Decimal::from(100);

        PaymentSchedule {
            deposit_amount: (total_fob * order.payment_terms.deposit_pct() / hundred).round_dp(2),
            balance_amount: (total_fob * order.payment_terms.balance_pct() / hundred).round_dp(2),
            freight_and_duties: (total_landed - total_fob).round_dp(2),
            sampling_cost: Decimal::from(SAMPLING_COST),
            techpack_cost: Decimal::from(TECHPACK_COST),
            marketing_prelaunch: Decimal::from(MARKETING_PRELAUNCH),
            photography: Decimal::from(PHOTOGRAPHY),
            website_setup: Decimal::from(WEBSITE_SETUP),
        }
    }

    /// 有序期間帳本（-4 → 0 → 銷售月）
    fn build_ledger(
        order: &OrderSpec,
        finance: &FinanceInputs,
        schedule: &PaymentSchedule,
        retail_price: Decimal,
    ) -> Vec<CashFlowPeriod> {
        let mut periods = Vec::new();

        periods.push(outflow_period(
            -4,
            "Sample Development",
            schedule.sampling_cost + schedule.techpack_cost,
        ));
        periods.push(outflow_period(-2, "Production Deposit", schedule.deposit_amount));
        periods.push(outflow_period(
            -1,
            "Balance Payment & Launch Prep",
            schedule.balance_amount
                + schedule.freight_and_duties
                + schedule.marketing_prelaunch
                + schedule.photography
                + schedule.website_setup,
        ));
        periods.push(outflow_period(
            0,
            "Launch Month - Inventory Receiving",
            Decimal::from(LAUNCH_MONTH_OPEX),
        ));

        let blended_cost = schedule.blended_unit_cost(order.units);
        let channel_pct = order.channel.fee_pct() / Decimal::from(100);
        let payment_pct = Decimal::new(29, 3); // 2.9%
        let fulfillment_each = Decimal::new(350, 2);

        for (idx, units_sold) in finance
            .expected_monthly_sales
            .iter()
            .take(SALES_HORIZON_MONTHS)
            .enumerate()
        {
            let month = (idx + 1) as i32;
            let sold = Decimal::from(*units_sold);

            let revenue = (sold * retail_price).round_dp(2);
            let cogs = (sold * blended_cost).round_dp(2);
            let channel_fees = (revenue * channel_pct).round_dp(2);
            let payment_fees = (revenue * payment_pct).round_dp(2);
            let fulfillment = (sold * fulfillment_each).round_dp(2);
            let operating_expenses =
                channel_fees + payment_fees + fulfillment + Decimal::from(MONTHLY_FIXED_OPEX);

            periods.push(CashFlowPeriod {
                month_number: month,
                label: format!("Sales Month {}", month),
                revenue,
                cogs,
                gross_profit: revenue - cogs,
                operating_expenses,
                channel_fees,
                fulfillment_costs: fulfillment,
                net_cashflow: revenue - cogs - operating_expenses,
                cumulative_cash: Decimal::ZERO, // 下方統一回填
            });
        }

        fill_cumulative(finance.initial_capital, &mut periods);
        periods
    }

    fn assess_capital(
        initial_capital: Decimal,
        lowest: Decimal,
        lowest_month: i32,
    ) -> CapitalAssessment {
        let sufficient = lowest >= Decimal::ZERO;
        let additional = if sufficient {
            Decimal::ZERO
        } else {
            -lowest + Decimal::from(CONTINGENCY)
        };

        let funding_options = if sufficient {
            Vec::new()
        } else {
            vec![
                "Personal savings or friends & family".to_string(),
                "Small business loan ($10K-50K)".to_string(),
                "Revenue-based financing (Clearco, Shopify Capital)".to_string(),
                "Crowdfunding (Kickstarter for pre-orders)".to_string(),
                "Angel investors or fashion accelerators".to_string(),
            ]
        };

        CapitalAssessment {
            initial_capital,
            lowest_cash_point: lowest,
            lowest_cash_month: lowest_month,
            additional_capital_needed: additional,
            total_capital_required: initial_capital + additional,
            capital_sufficient: sufficient,
            funding_options,
        }
    }

    fn find_breakeven(initial_capital: Decimal, periods: &[CashFlowPeriod]) -> BreakevenAnalysis {
        let breakeven_month = periods
            .iter()
            .find(|p| p.month_number > 0 && p.cumulative_cash >= initial_capital)
            .map(|p| p.month_number);

        let total_revenue: Decimal = periods.iter().map(|p| p.revenue).sum();
        let total_cogs: Decimal = periods.iter().map(|p| p.cogs).sum();
        let gross_margin_pct = if total_revenue > Decimal::ZERO {
            Some(
                ((total_revenue - total_cogs) / total_revenue * Decimal::from(100)).round_dp(1),
            )
        } else {
            None
        };

        BreakevenAnalysis {
            breakeven_achieved: breakeven_month.is_some(),
            breakeven_month,
            gross_margin_pct,
        }
    }

    /// 補單規劃：累計銷量達初始訂單 70%（剩餘 ≤ 30%）時觸發
    fn plan_reorder(
        order: &OrderSpec,
        finance: &FinanceInputs,
        cost: &CostBreakdown,
        periods: &[CashFlowPeriod],
    ) -> ReorderPlan {
        let initial_units = order.units;
        let trigger_pct = Decimal::from(30);

        let mut cumulative_sold: u32 = 0;
        let mut trigger_month = None;
        for (idx, sold) in finance
            .expected_monthly_sales
            .iter()
            .take(SALES_HORIZON_MONTHS)
            .enumerate()
        {
            cumulative_sold += sold;
            let remaining = Decimal::from(initial_units.saturating_sub(cumulative_sold))
                / Decimal::from(initial_units)
                * Decimal::from(100);
            if remaining <= trigger_pct {
                trigger_month = Some((idx + 1) as i32);
                break;
            }
        }

        let Some(month) = trigger_month else {
            return ReorderPlan {
                reorder_needed: false,
                trigger_month: None,
                reorder_units: 0,
                reorder_fob_total: Decimal::ZERO,
                reorder_deposit: Decimal::ZERO,
                cash_available: Decimal::ZERO,
                can_afford: false,
                shortfall: Decimal::ZERO,
            };
        };

        let reorder_units = initial_units * 6 / 10;
        let reorder_fob_total = (Decimal::from(reorder_units) * cost.fob).round_dp(2);
        let reorder_deposit = (reorder_fob_total * Decimal::new(40, 2)).round_dp(2);

        let cash_available = periods
            .iter()
            .find(|p| p.month_number == month)
            .map(|p| p.cumulative_cash)
            .unwrap_or(Decimal::ZERO);

        let can_afford = cash_available >= reorder_deposit;
        let shortfall = (reorder_deposit - cash_available).max(Decimal::ZERO);

        ReorderPlan {
            reorder_needed: true,
            trigger_month: Some(month),
            reorder_units,
            reorder_fob_total,
            reorder_deposit,
            cash_available,
            can_afford,
            shortfall,
        }
    }

    /// 確定性壓力測試（重算帳本，非機率抽樣）
    fn stress_scenarios(
        initial_capital: Decimal,
        periods: &[CashFlowPeriod],
    ) -> Vec<RiskScenario> {
        let mut scenarios = Vec::new();

        // 銷售低於預期 30%
        let factor = Decimal::new(70, 2);
        let mut slower: Vec<CashFlowPeriod> = periods
            .iter()
            .map(|p| {
                let mut adjusted = p.clone();
                if p.revenue > Decimal::ZERO {
                    adjusted.revenue = p.revenue * factor;
                    adjusted.cogs = p.cogs * factor;
                    adjusted.gross_profit = adjusted.revenue - adjusted.cogs;
                    adjusted.net_cashflow =
                        adjusted.revenue - adjusted.cogs - adjusted.operating_expenses;
                }
                adjusted
            })
            .collect();
        fill_cumulative(initial_capital, &mut slower);
        let (low, low_month, final_cash) = ledger_extremes(initial_capital, &slower);
        scenarios.push(RiskScenario {
            name: "Slower Sales (30% below forecast)".to_string(),
            probability: "Medium".to_string(),
            lowest_cash_point: Some(low),
            lowest_cash_month: Some(low_month),
            final_cash_position: Some(final_cash),
            impact: if low < Decimal::ZERO { "Negative" } else { "Manageable" }.to_string(),
            mitigation:
                "Reduce marketing spend, negotiate extended payment terms, plan earlier markdowns"
                    .to_string(),
        });

        // 營運支出高於預算 25%
        let surcharge = Decimal::new(125, 2);
        let mut pricier: Vec<CashFlowPeriod> = periods
            .iter()
            .map(|p| {
                let mut adjusted = p.clone();
                if p.operating_expenses > Decimal::ZERO {
                    adjusted.operating_expenses = p.operating_expenses * surcharge;
                    adjusted.net_cashflow =
                        adjusted.revenue - adjusted.cogs - adjusted.operating_expenses;
                }
                adjusted
            })
            .collect();
        fill_cumulative(initial_capital, &mut pricier);
        let (low, low_month, final_cash) = ledger_extremes(initial_capital, &pricier);
        scenarios.push(RiskScenario {
            name: "Higher Operating Costs (25% above budget)".to_string(),
            probability: "Medium".to_string(),
            lowest_cash_point: Some(low),
            lowest_cash_month: Some(low_month),
            final_cash_position: Some(final_cash),
            impact: if low < Decimal::ZERO { "Negative" } else { "Moderate" }.to_string(),
            mitigation: "Control marketing spend, negotiate better 3PL rates, reduce sampling iterations"
                .to_string(),
        });

        // 生產延誤（敘事型，不重算帳本）
        scenarios.push(RiskScenario {
            name: "Production Delay (1 month)".to_string(),
            probability: "Low-Medium".to_string(),
            lowest_cash_point: None,
            lowest_cash_month: None,
            final_cash_position: None,
            impact: "$3000-5000 in sunk marketing costs".to_string(),
            mitigation: "Choose reliable supplier, build timeline buffers, avoid peak season ordering"
                .to_string(),
        });

        scenarios
    }

    /// 定價診斷（DTC 標準帶 2.5–3.0 倍）
    fn pricing_advice(landed_cost: Decimal, retail_price: Decimal) -> PricingAdvice {
        let band_min = Decimal::new(25, 1);
        let band_max = Decimal::new(30, 1);

        let markup_multiplier = if landed_cost > Decimal::ZERO {
            Some((retail_price / landed_cost).round_dp(2))
        } else {
            None
        };
        let gross_margin_pct = if retail_price > Decimal::ZERO {
            Some(((retail_price - landed_cost) / retail_price * Decimal::from(100)).round_dp(1))
        } else {
            None
        };

        let markup = markup_multiplier.unwrap_or(Decimal::ZERO);
        let health = if markup < band_min {
            PricingHealth::Underpriced
        } else if markup > band_max {
            PricingHealth::Premium
        } else {
            PricingHealth::Optimal
        };

        let midpoint = landed_cost * (band_min + band_max) / Decimal::from(2);
        let recommended_price = round_to_99(midpoint);

        PricingAdvice {
            landed_cost,
            retail_price,
            markup_multiplier,
            gross_margin_pct,
            health,
            recommended_price,
            competitive_context: competitive_context(retail_price).to_string(),
        }
    }
}

fn outflow_period(month_number: i32, label: &str, outflow: Decimal) -> CashFlowPeriod {
    CashFlowPeriod {
        month_number,
        label: label.to_string(),
        revenue: Decimal::ZERO,
        cogs: Decimal::ZERO,
        gross_profit: Decimal::ZERO,
        operating_expenses: outflow,
        channel_fees: Decimal::ZERO,
        fulfillment_costs: Decimal::ZERO,
        net_cashflow: -outflow,
        cumulative_cash: Decimal::ZERO,
    }
}

/// 回填累計現金，維持帳本不變量
fn fill_cumulative(initial_capital: Decimal, periods: &mut [CashFlowPeriod]) {
    let mut running = initial_capital;
    for period in periods {
        running += period.net_cashflow;
        period.cumulative_cash = running;
    }
}

/// （最低點, 最低點月份, 期末現金）
fn ledger_extremes(initial_capital: Decimal, periods: &[CashFlowPeriod]) -> (Decimal, i32, Decimal) {
    let mut lowest = initial_capital;
    let mut lowest_month = 0;
    let mut final_cash = initial_capital;

    for period in periods {
        final_cash = period.cumulative_cash;
        if period.cumulative_cash < lowest {
            lowest = period.cumulative_cash;
            lowest_month = period.month_number;
        }
    }

    (lowest, lowest_month, final_cash)
}

/// "X9.99" 尾數定價（低價帶不取整）
fn round_to_99(price: Decimal) -> Decimal {
    if price > Decimal::from(20) {
        let base = (price / Decimal::from(10)).trunc() * Decimal::from(10);
        base + Decimal::new(999, 2)
    } else {
        price.round_dp(2)
    }
}

/// 市場梯隊對照
fn competitive_context(retail_price: Decimal) -> &'static str {
    if retail_price < Decimal::from(30) {
        "Budget/Fast Fashion tier (H&M, Uniqlo range)"
    } else if retail_price < Decimal::from(60) {
        "Mid-market tier (Everlane, Allbirds range)"
    } else if retail_price < Decimal::from(100) {
        "Premium Contemporary (Outdoor Voices, Girlfriend Collective)"
    } else if retail_price < Decimal::from(200) {
        "Premium/Designer tier (Lululemon, Alo Yoga)"
    } else {
        "Luxury tier (Veilance, Stone Island)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitch_core::order::SizeCode;
    use stitch_tables::StaticTables;

    use crate::costing::CostingCalculator;

    fn hoodie_plan() -> (OrderSpec, FinanceInputs, CostBreakdown) {
        let order = OrderSpec::new(
            "hoodie-pullover",
            SizeCode::M,
            "cotton-jersey-180gsm",
            "EcoKnits-Tirupur",
            500,
        );
        let finance = FinanceInputs::new(
            Decimal::from(40_000),
            vec![60, 80, 100, 90, 70, 50],
        );
        let mut warnings = Vec::new();
        let cost =
            CostingCalculator::calculate(&order, &StaticTables::new(), &mut warnings).unwrap();
        (order, finance, cost)
    }

    #[test]
    fn test_payment_schedule_standard_terms() {
        let (order, finance, cost) = hoodie_plan();
        let timeline = CashFlowCalculator::calculate(&order, &finance, &cost);
        let schedule = &timeline.payment_schedule;

        // FOB 總額 54.76 × 500 = 27,380；40/60 拆分
        assert_eq!(schedule.deposit_amount, Decimal::from(10_952));
        assert_eq!(schedule.balance_amount, Decimal::from(16_428));
        // 到岸 68.42 × 500 = 34,210；差額 6,830
        assert_eq!(schedule.freight_and_duties, Decimal::from(6_830));
    }

    #[test]
    fn test_ledger_structure_and_invariant() {
        let (order, finance, cost) = hoodie_plan();
        let timeline = CashFlowCalculator::calculate(&order, &finance, &cost);

        // -4, -2, -1, 0 + 六個銷售月
        assert_eq!(timeline.periods.len(), 10);
        assert_eq!(timeline.periods[0].month_number, -4);
        assert_eq!(timeline.periods[3].month_number, 0);
        assert_eq!(timeline.periods[9].month_number, 6);
        assert!(timeline.ledger_consistent());
    }

    #[test]
    fn test_sales_month_composition() {
        let (order, finance, cost) = hoodie_plan();
        let timeline = CashFlowCalculator::calculate(&order, &finance, &cost);
        let month1 = &timeline.periods[4];

        // 60 件 × $189
        assert_eq!(month1.revenue, Decimal::from(11_340));
        // 攤提成本 (10952+16428+6830)/500 = 68.42
        assert_eq!(month1.cogs, Decimal::new(410_520, 2));
        // 2.9% 通路費 + 2.9% 金流費 + 60×3.50 + 800
        let expected_opex = Decimal::new(32_886, 2)
            + Decimal::new(32_886, 2)
            + Decimal::from(210)
            + Decimal::from(800);
        assert_eq!(month1.operating_expenses, expected_opex);
    }

    #[test]
    fn test_reorder_triggers_at_70pct_sold() {
        let (order, finance, cost) = hoodie_plan();
        let timeline = CashFlowCalculator::calculate(&order, &finance, &cost);

        // 60+80+100+90 = 330 → 剩 34%；+70 = 400 → 剩 20% → 第 5 月觸發
        assert!(timeline.reorder.reorder_needed);
        assert_eq!(timeline.reorder.trigger_month, Some(5));
        assert_eq!(timeline.reorder.reorder_units, 300);
    }

    #[test]
    fn test_no_reorder_when_sales_slow() {
        let (order, mut finance, cost) = hoodie_plan();
        finance.expected_monthly_sales = vec![10, 10, 10, 10, 10, 10];
        let timeline = CashFlowCalculator::calculate(&order, &finance, &cost);

        assert!(!timeline.reorder.reorder_needed);
        assert_eq!(timeline.reorder.trigger_month, None);
    }

    #[test]
    fn test_stress_scenarios_shapes() {
        let (order, finance, cost) = hoodie_plan();
        let timeline = CashFlowCalculator::calculate(&order, &finance, &cost);

        assert_eq!(timeline.risk_scenarios.len(), 3);
        let slower = &timeline.risk_scenarios[0];
        assert!(slower.lowest_cash_point.is_some());
        // 銷售變慢，期末現金必定不高於基準
        assert!(slower.final_cash_position.unwrap() <= timeline.final_cash_position);
        // 敘事型情境沒有重算的帳本數字
        assert!(timeline.risk_scenarios[2].lowest_cash_point.is_none());
    }

    #[test]
    fn test_zero_sales_degenerates_without_breakeven() {
        let (order, mut finance, cost) = hoodie_plan();
        finance.expected_monthly_sales = vec![0, 0, 0, 0, 0, 0];
        let timeline = CashFlowCalculator::calculate(&order, &finance, &cost);

        assert!(!timeline.breakeven.breakeven_achieved);
        assert_eq!(timeline.breakeven.breakeven_month, None);
        assert_eq!(timeline.breakeven.gross_margin_pct, None);
        assert!(timeline.ledger_consistent());
    }

    #[test]
    fn test_pricing_advice_bands() {
        let advice = CashFlowCalculator::pricing_advice(Decimal::from(50), Decimal::from(100));
        assert_eq!(advice.health, PricingHealth::Underpriced);

        let advice = CashFlowCalculator::pricing_advice(Decimal::from(50), Decimal::from(140));
        assert_eq!(advice.health, PricingHealth::Optimal);

        let advice = CashFlowCalculator::pricing_advice(Decimal::from(50), Decimal::from(200));
        assert_eq!(advice.health, PricingHealth::Premium);
        // 中點 50 × 2.75 = 137.5 → 139.99
        assert_eq!(advice.recommended_price, Decimal::new(13_999, 2));
    }
}
