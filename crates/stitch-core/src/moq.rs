//! MOQ 談判模型（供應商短名單、談判槓桿、合併下單）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tables::SupplierProfile;

/// 談判槓桿（單一可用的降低 MOQ 手段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiationLever {
    /// 槓桿名稱（例 "multi-style commitment"）
    pub name: String,

    /// MOQ 降低比例（0-1）
    pub reduction_pct: Decimal,

    /// 適用理由
    pub rationale: String,
}

/// 單一供應商的談判策略
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiationStrategy {
    pub supplier: String,
    pub standard_moq: u32,
    pub negotiable_floor: u32,

    /// 可用槓桿
    pub levers: Vec<NegotiationLever>,

    /// 槓桿總降低比例（已套用上限）
    pub combined_reduction_pct: Decimal,

    /// 談判後預估 MOQ（不低於可談判下限）
    pub estimated_moq: u32,

    /// 預估成功率（0-1，夾在 0.30-0.95）
    pub success_probability: Decimal,

    /// 是否達成目標訂量
    pub meets_target: bool,

    /// 建議開場與讓步順序
    pub talking_points: Vec<String>,
}

/// 合併下單機會（資訊性，不影響 MOQ 數值）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationOpportunity {
    /// 機會名稱（例 "fabric consolidation"）
    pub name: String,

    /// 潛在 MOQ 彈性（%）
    pub potential_pct: u32,

    pub description: String,
}

/// MOQ 談判計畫（完整計算結果）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoqPlan {
    pub target_units: u32,

    /// 短名單（可談判下限 ≤ 目標 × 1.5 的供應商）
    pub candidate_suppliers: Vec<SupplierProfile>,

    /// 各候選供應商的談判策略（依預估 MOQ 升冪）
    pub strategies: Vec<NegotiationStrategy>,

    pub consolidation_opportunities: Vec<ConsolidationOpportunity>,

    /// 整體建議
    pub recommendation: String,
}

impl MoqPlan {
    /// 最優策略（預估 MOQ 最低者）
    pub fn best_strategy(&self) -> Option<&NegotiationStrategy> {
        self.strategies.first()
    }

    /// 是否存在達成目標的策略
    pub fn any_meets_target(&self) -> bool {
        self.strategies.iter().any(|s| s.meets_target)
    }
}

/// 槓桿合計降低比例的上限
pub fn max_combined_reduction() -> Decimal {
    Decimal::new(65, 2) // 0.65
}
