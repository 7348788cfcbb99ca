//! 生產時程模型（階段、品管關卡、風險、可行性）

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 單一生產階段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePhase {
    /// 階段名稱（例 "sampling"）
    pub name: String,

    pub duration_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// 階段說明
    pub description: String,
}

/// 品管關卡
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityGate {
    /// 關卡名稱（例 "inline inspection"）
    pub name: String,

    pub date: NaiveDate,

    /// 檢驗範圍說明（AQL 抽樣數等）
    pub scope: String,

    /// 未通過時的處置
    pub on_failure: String,
}

/// 風險機率分級
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Probability {
    Low,
    Medium,
    MediumHigh,
    High,
}

/// 時程風險因子
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    /// 風險名稱（例 "chinese new year shutdown"）
    pub name: String,

    pub probability: Probability,

    /// 潛在延誤天數
    pub delay_days: u32,

    pub mitigation: String,
}

/// 上市可行性評估
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feasibility {
    pub target_launch: NaiveDate,

    /// 為趕上目標上市日而必須開始的日期
    pub required_start: NaiveDate,

    /// 必須開工日已到或已過（必須立即開工）
    pub achievable: bool,

    /// 緩衝天數（不可行時為 0）
    pub buffer_days: u32,

    pub assessment: String,
}

/// 壓縮時程選項
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpediteOption {
    /// 選項名稱（例 "rush production"）
    pub name: String,

    /// 可節省天數
    pub days_saved: u32,

    /// 額外成本敘述
    pub cost_impact: String,

    /// 附帶風險
    pub risk: String,
}

/// 生產時程計畫（完整計算結果）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePlan {
    pub supplier: String,
    pub order_date: NaiveDate,

    /// 有序階段（技術包 → 入倉）
    pub phases: Vec<TimelinePhase>,

    pub total_calendar_days: u32,
    pub estimated_completion: NaiveDate,

    pub quality_gates: Vec<QualityGate>,
    pub risk_factors: Vec<RiskFactor>,

    /// 關鍵路徑天數（主要階段 + 高風險延誤）
    pub critical_path_days: u32,

    /// 建議緩衝天數
    pub recommended_buffer_days: u32,

    /// AQL 抽樣檢驗數
    pub aql_sample_size: u32,

    /// 目標上市日評估；未指定上市日時為 None
    pub feasibility: Option<Feasibility>,

    pub expedite_options: Vec<ExpediteOption>,
}

impl TimelinePlan {
    /// 階段天數總和
    pub fn phase_days_total(&self) -> u32 {
        self.phases.iter().map(|p| p.duration_days).sum()
    }

    /// 階段是否首尾相接且依序排列
    pub fn phases_contiguous(&self) -> bool {
        self.phases
            .windows(2)
            .all(|w| w[1].start_date == w[0].end_date)
    }
}

/// 風險延誤加權（高風險才計入關鍵路徑）
pub fn counts_toward_critical_path(probability: Probability) -> bool {
    matches!(probability, Probability::High | Probability::MediumHigh)
}

/// 歷史瑕疵率偏高時的修樣輪次門檻（%）
pub fn high_defect_threshold() -> Decimal {
    Decimal::new(25, 1) // 2.5
}
