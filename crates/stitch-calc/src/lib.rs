//! # Stitch Calculation Engine
//!
//! 服裝生產規劃計算引擎

pub mod allocation;
pub mod calculator;
pub mod cashflow;
pub mod costing;
pub mod defects;
pub mod moq;
pub mod timeline;

// Re-export 主要類型
pub use allocation::AllocationCalculator;
pub use calculator::PlanCalculator;
pub use cashflow::CashFlowCalculator;
pub use costing::CostingCalculator;
pub use defects::{IssueSeverity, QualityIssue, QualitySimulation, QualitySimulator};
pub use moq::MoqCalculator;
pub use timeline::TimelineCalculator;

use stitch_core::{CashFlowTimeline, CostBreakdown, InventoryPlan, MoqPlan, TimelinePlan};

/// 完整生產規劃結果
#[derive(Debug, Clone)]
pub struct ProductionPlan {
    /// 請求ID
    pub request_id: uuid::Uuid,

    /// 成本分解
    pub cost: CostBreakdown,

    /// 現金流時間軸
    pub cashflow: CashFlowTimeline,

    /// 庫存分配
    pub inventory: InventoryPlan,

    /// 生產時程
    pub timeline: TimelinePlan,

    /// MOQ 談判（請求附帶 MOQ 輸入時才有）
    pub moq: Option<MoqPlan>,

    /// 警告信息
    pub warnings: Vec<PlanWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl ProductionPlan {
    /// 添加警告
    pub fn add_warning(&mut self, warning: PlanWarning) {
        self.warnings.push(warning);
    }
}

/// 規劃警告
#[derive(Debug, Clone)]
pub struct PlanWarning {
    /// 相關鍵（款式/布料/供應商等）
    pub subject: String,

    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(subject: impl Into<String>, message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            severity,
        }
    }
}

/// 警告嚴重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
