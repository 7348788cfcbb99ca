//! 樣品瑕疵模擬（可注入種子的隨機性，測試可重現）

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 任一輪樣品檢驗出現瑕疵的機率
const ISSUE_PROBABILITY: f64 = 0.3;

/// 瑕疵嚴重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSeverity {
    Low,
    Medium,
    High,
}

/// 單一品質瑕疵與其處理成本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    /// 瑕疵代碼（例 "sizing_incorrect"）
    pub name: String,

    pub severity: IssueSeverity,

    /// 修復成本（美元，整批）
    pub fix_cost: Decimal,

    /// 造成的時程延誤（天）
    pub delay_days: u32,

    /// 是否需要設計端簽核才能續產
    pub requires_approval: bool,

    pub description: String,
}

/// 一輪樣品檢驗的模擬結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualitySimulation {
    pub issues: Vec<QualityIssue>,
}

impl QualitySimulation {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    /// 全部瑕疵的修復成本合計
    pub fn total_fix_cost(&self) -> Decimal {
        self.issues.iter().map(|i| i.fix_cost).sum()
    }

    /// 全部瑕疵的延誤天數合計
    pub fn total_delay_days(&self) -> u32 {
        self.issues.iter().map(|i| i.delay_days).sum()
    }

    /// 任一瑕疵需要簽核即整輪需要簽核
    pub fn requires_approval(&self) -> bool {
        self.issues.iter().any(|i| i.requires_approval)
    }
}

/// 樣品瑕疵模擬器
///
/// 隨機性由建構時注入的種子決定，同一種子恆產出同一序列。
pub struct QualitySimulator {
    rng: StdRng,
}

impl QualitySimulator {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// 模擬一輪樣品檢驗：30% 機率抽出 1-2 個相異瑕疵
    pub fn simulate_sample(&mut self) -> QualitySimulation {
        let issues = if self.rng.gen::<f64>() < ISSUE_PROBABILITY {
            let count = self.rng.gen_range(1..=2);
            issue_catalog()
                .choose_multiple(&mut self.rng, count)
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        QualitySimulation { issues }
    }
}

/// 固定瑕疵型錄
pub fn issue_catalog() -> Vec<QualityIssue> {
    vec![
        QualityIssue {
            name: "sizing_incorrect".to_string(),
            severity: IssueSeverity::High,
            fix_cost: Decimal::from(200),
            delay_days: 5,
            requires_approval: true,
            description: "Garment measurements off by more than 0.5 inches".to_string(),
        },
        QualityIssue {
            name: "color_mismatch".to_string(),
            severity: IssueSeverity::Medium,
            fix_cost: Decimal::from(150),
            delay_days: 4,
            requires_approval: true,
            description: "Color not matching approved PMS standard".to_string(),
        },
        QualityIssue {
            name: "loose_stitching".to_string(),
            severity: IssueSeverity::Low,
            fix_cost: Decimal::from(50),
            delay_days: 1,
            requires_approval: false,
            description: "Inconsistent stitch tension in seams".to_string(),
        },
        QualityIssue {
            name: "fabric_defect".to_string(),
            severity: IssueSeverity::Medium,
            fix_cost: Decimal::from(300),
            delay_days: 3,
            requires_approval: true,
            description: "Fabric pilling or irregularities detected".to_string(),
        },
    ]
}
