//! 現金流模型（逐月帳本、損益平衡、資金需求）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 付款排程（上市前的固定支出節點）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSchedule {
    /// 訂金（FOB 總額 × 訂金比例）
    pub deposit_amount: Decimal,

    /// 尾款
    pub balance_amount: Decimal,

    /// 海運與關稅（到岸總額 − FOB 總額）
    pub freight_and_duties: Decimal,

    /// 打樣費
    pub sampling_cost: Decimal,

    /// 工藝單開發費
    pub techpack_cost: Decimal,

    /// 上市前行銷
    pub marketing_prelaunch: Decimal,

    /// 商品攝影
    pub photography: Decimal,

    /// 網站建置
    pub website_setup: Decimal,
}

impl PaymentSchedule {
    /// 攤提後的每件生產成本（COGS 計算基準）
    pub fn blended_unit_cost(&self, units: u32) -> Decimal {
        (self.deposit_amount + self.balance_amount + self.freight_and_duties)
            / Decimal::from(units)
    }
}

/// 單一期間（月）的現金流
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowPeriod {
    /// 月序（-4 打樣、-2 訂金、-1 尾款、0 上市、1..N 銷售月）
    pub month_number: i32,

    /// 期間說明
    pub label: String,

    pub revenue: Decimal,
    pub cogs: Decimal,
    pub gross_profit: Decimal,

    /// 營運支出（含通路費、金流費、出貨費、固定開銷）
    pub operating_expenses: Decimal,

    pub channel_fees: Decimal,
    pub fulfillment_costs: Decimal,

    /// 當期淨現金流
    pub net_cashflow: Decimal,

    /// 累計現金（期初資金 + 歷期淨額）
    pub cumulative_cash: Decimal,
}

/// 資金需求評估
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalAssessment {
    pub initial_capital: Decimal,

    /// 現金最低點
    pub lowest_cash_point: Decimal,

    /// 現金最低點發生月
    pub lowest_cash_month: i32,

    /// 額外資金需求（最低點為負時補足 + 應急金）
    pub additional_capital_needed: Decimal,

    pub total_capital_required: Decimal,
    pub capital_sufficient: bool,

    /// 資金不足時的籌資選項
    pub funding_options: Vec<String>,
}

/// 損益平衡分析
///
/// 定義：累計現金回復到初始資金的第一個上市後月份。
/// 預測期內未達成時 `breakeven_month` 為 None。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakevenAnalysis {
    pub breakeven_achieved: bool,
    pub breakeven_month: Option<i32>,

    /// 整體毛利率（%）；無營收時為 None
    pub gross_margin_pct: Option<Decimal>,
}

/// 補單資金規劃
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderPlan {
    pub reorder_needed: bool,

    /// 觸發月（累計銷量達初始訂單 70%）
    pub trigger_month: Option<i32>,

    /// 補單數量（初始訂單的 60%）
    pub reorder_units: u32,

    /// 補單 FOB 總額
    pub reorder_fob_total: Decimal,

    /// 補單訂金（40%）
    pub reorder_deposit: Decimal,

    /// 觸發月的可用現金
    pub cash_available: Decimal,

    pub can_afford: bool,

    /// 資金缺口
    pub shortfall: Decimal,
}

/// 風險情境（確定性壓力測試，非機率抽樣）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScenario {
    pub name: String,
    pub probability: String,

    /// 重算後的現金最低點；敘事型情境為 None
    pub lowest_cash_point: Option<Decimal>,
    pub lowest_cash_month: Option<i32>,
    pub final_cash_position: Option<Decimal>,

    pub impact: String,
    pub mitigation: String,
}

/// 定價健康度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingHealth {
    /// 低於定位區間
    Underpriced,
    /// 落在定位區間內
    Optimal,
    /// 高於定位區間
    Premium,
}

/// 定價診斷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingAdvice {
    pub landed_cost: Decimal,
    pub retail_price: Decimal,

    /// 加成倍數（零售價 / 到岸成本）；到岸成本為零時為 None
    pub markup_multiplier: Option<Decimal>,

    /// 毛利率（%）；零售價為零時為 None
    pub gross_margin_pct: Option<Decimal>,

    pub health: PricingHealth,
    pub recommended_price: Decimal,

    /// 市場梯隊對照敘述
    pub competitive_context: String,
}

/// 現金流時間軸（完整計算結果）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowTimeline {
    pub initial_capital: Decimal,
    pub payment_schedule: PaymentSchedule,

    /// 有序期間（-4 → 上市 → 銷售月）
    pub periods: Vec<CashFlowPeriod>,

    pub final_cash_position: Decimal,
    pub capital: CapitalAssessment,
    pub breakeven: BreakevenAnalysis,
    pub reorder: ReorderPlan,
    pub risk_scenarios: Vec<RiskScenario>,
    pub pricing_advice: PricingAdvice,
}

impl CashFlowTimeline {
    /// 帳本不變量：cumulative[i] == initial + Σ net[0..=i]
    pub fn ledger_consistent(&self) -> bool {
        let mut running = self.initial_capital;
        for period in &self.periods {
            running += period.net_cashflow;
            if running != period.cumulative_cash {
                return false;
            }
        }
        true
    }
}
