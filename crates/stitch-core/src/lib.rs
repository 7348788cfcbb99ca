//! # Stitch Core
//!
//! 核心資料模型與類型定義

pub mod breakdown;
pub mod cashflow;
pub mod inventory;
pub mod moq;
pub mod order;
pub mod tables;
pub mod timeline;

// Re-export 主要類型
pub use breakdown::{CostBreakdown, PriceTier, PricingTiers};
pub use cashflow::{
    BreakevenAnalysis, CapitalAssessment, CashFlowPeriod, CashFlowTimeline, PaymentSchedule,
    PricingAdvice, PricingHealth, ReorderPlan, RiskScenario,
};
pub use inventory::{
    ColorAllocation, DeadStockRisk, InventoryPlan, ReorderTrigger, ReorderUrgency, SellThrough,
    SellThroughRating, SizeAllocation, Sku, StockRiskLevel,
};
pub use moq::{ConsolidationOpportunity, MoqPlan, NegotiationLever, NegotiationStrategy};
pub use order::{
    ColorStrategy, Complexity, FinanceInputs, InventoryInputs, MoqInputs, OrderSpec,
    PaymentFlexibility, PaymentTerms, PlanRequest, SellingChannel, SizeCode, TimelineInputs,
};
pub use tables::{ReferenceTables, SizeCurve, SupplierProfile, TrimItem};
pub use timeline::{
    ExpediteOption, Feasibility, Probability, QualityGate, RiskFactor, TimelinePhase, TimelinePlan,
};

/// 計算引擎錯誤類型
///
/// 只有致命的請求錯誤會走這裡；查無參照鍵與算術退化
/// 不是錯誤（前者套用預設值並附警告，後者回傳明確哨兵值）。
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("訂購數量必須為正數: {0}")]
    InvalidUnitCount(i64),

    #[error("款式類型不可為空")]
    EmptyGarmentType,

    #[error("無效的付款條件: {0}")]
    InvalidPaymentTerms(String),

    #[error("計算錯誤: {0}")]
    CalculationError(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
