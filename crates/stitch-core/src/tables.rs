//! 參照表契約
//!
//! 計算器唯一的共享資源：唯讀的鍵值查詢。所有方法回傳
//! `Option`，查無鍵時由計算器套用文件化預設值並附警告，
//! 因此任何實作都不需要「完整」的資料集。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::SizeCode;

/// 輔料項目（拉鍊、織標、吊牌等）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimItem {
    pub name: String,
    pub unit_cost: Decimal,
}

impl TrimItem {
    pub fn new(name: impl Into<String>, unit_cost: Decimal) -> Self {
        Self {
            name: name.into(),
            unit_cost,
        }
    }
}

/// 尺碼曲線（六個尺碼的百分比分配，總和必為 100）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeCurve {
    /// 曲線名稱（例 "athletic-fit"）
    pub name: String,

    /// 各尺碼百分比（XS, S, M, L, XL, XXL 順序）
    pub percentages: [Decimal; 6],

    /// 適用情境說明
    pub reasoning: String,
}

impl SizeCurve {
    pub fn new(name: impl Into<String>, percentages: [Decimal; 6], reasoning: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            percentages,
            reasoning: reasoning.into(),
        }
    }

    /// 指定尺碼的百分比
    pub fn pct(&self, size: SizeCode) -> Decimal {
        let idx = SizeCode::ALL.iter().position(|s| *s == size).unwrap_or(2);
        self.percentages[idx]
    }

    /// 百分比總和（不變量檢查用）
    pub fn total_pct(&self) -> Decimal {
        self.percentages.iter().copied().sum()
    }
}

/// 供應商檔案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierProfile {
    /// 供應商名稱
    pub name: String,

    /// 所在地（例 "India"）
    pub location: String,

    /// 打樣前置時間（天）
    pub lead_time_sampling_days: u32,

    /// 大貨前置時間（天）
    pub lead_time_bulk_days: u32,

    /// 加急大貨前置時間（天）；None 表示不提供加急
    pub lead_time_rush_days: Option<u32>,

    /// 加急費率（%）
    pub rush_premium_pct: Decimal,

    /// 歷史瑕疵率（%）
    pub quality_defect_rate: Decimal,

    /// 回覆時間（小時）
    pub response_time_hours: u32,

    /// 標準 MOQ
    pub moq_standard: u32,

    /// 可談判下限 MOQ
    pub moq_negotiable: u32,

    /// 談判基礎成功率（0-1）
    pub negotiation_success_rate: Decimal,

    /// 每分鐘工資（SMV 計價）
    pub labor_rate_per_minute: Decimal,
}

impl SupplierProfile {
    /// 是否提供加急生產
    pub fn supports_rush(&self) -> bool {
        self.lead_time_rush_days.is_some()
    }
}

/// 參照表提供者
///
/// 唯讀、可被多執行緒無鎖並行存取。實作可以是程式內建表、
/// 事實庫（S-expression）或測試夾具。
pub trait ReferenceTables: Send + Sync {
    /// 款式+尺碼的基礎用布量（公尺）
    fn base_meters(&self, garment: &str, size: SizeCode) -> Option<Decimal>;

    /// 款式的排版效率（0-1）
    fn pattern_efficiency(&self, garment: &str) -> Option<Decimal>;

    /// 布料縮率（0-1）
    fn shrinkage(&self, fabric: &str) -> Option<Decimal>;

    /// 布料裁耗率（0-1）
    fn waste(&self, fabric: &str) -> Option<Decimal>;

    /// 布料單價（每公尺）
    fn fabric_price(&self, fabric: &str) -> Option<Decimal>;

    /// 款式的輔料清單
    fn trim_bill(&self, garment: &str) -> Option<Vec<TrimItem>>;

    /// 款式的標準工時（SMV，分鐘）
    fn smv_minutes(&self, garment: &str) -> Option<Decimal>;

    /// 款式的關稅率（0-1）
    fn duty_rate(&self, garment: &str) -> Option<Decimal>;

    /// 供應商每分鐘工資
    fn labor_rate(&self, supplier: &str) -> Option<Decimal>;

    /// 供應商管銷費率（0-1）
    fn overhead_rate(&self, supplier: &str) -> Option<Decimal>;

    /// 供應商利潤率（0-1）
    fn profit_rate(&self, supplier: &str) -> Option<Decimal>;

    /// 供應商每件海運費
    fn freight_per_unit(&self, supplier: &str) -> Option<Decimal>;

    /// 供應商完整檔案（時程與 MOQ 談判用）
    fn supplier_profile(&self, supplier: &str) -> Option<SupplierProfile>;

    /// 已知供應商清單（MOQ 談判掃描用）
    fn suppliers(&self) -> Vec<String>;

    /// 依鍵查詢尺碼曲線
    fn size_curve(&self, key: &str) -> Option<SizeCurve>;

    /// 產地的海運天數
    fn shipping_days(&self, location: &str) -> Option<u32>;
}

/// 文件化預設值（查無鍵時的解析結果）
///
/// 數值取自生產資料集的保守中位值。
pub mod defaults {
    use rust_decimal::Decimal;

    pub fn base_meters() -> Decimal {
        Decimal::from(2)
    }

    pub fn pattern_efficiency() -> Decimal {
        Decimal::new(80, 2) // 0.80
    }

    pub fn shrinkage() -> Decimal {
        Decimal::new(3, 2) // 0.03
    }

    pub fn waste() -> Decimal {
        Decimal::new(15, 2) // 0.15
    }

    pub fn fabric_price() -> Decimal {
        Decimal::from(6)
    }

    pub fn trim_cost() -> Decimal {
        Decimal::new(50, 2) // 0.50
    }

    pub fn smv_minutes() -> Decimal {
        Decimal::from(20)
    }

    pub fn labor_rate() -> Decimal {
        Decimal::new(70, 2) // 0.70
    }

    pub fn overhead_rate() -> Decimal {
        Decimal::new(16, 2) // 0.16
    }

    pub fn profit_rate() -> Decimal {
        Decimal::new(10, 2) // 0.10
    }

    pub fn freight_per_unit() -> Decimal {
        Decimal::new(350, 2) // 3.50
    }

    pub fn duty_rate() -> Decimal {
        Decimal::new(16, 2) // 0.16
    }

    pub fn shipping_days() -> u32 {
        18
    }

    /// 預設尺碼曲線鍵
    pub const SIZE_CURVE_KEY: &str = "activewear-standard";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_curve_pct() {
        let curve = SizeCurve::new(
            "test",
            [
                Decimal::from(4),
                Decimal::from(18),
                Decimal::from(32),
                Decimal::from(28),
                Decimal::from(14),
                Decimal::from(4),
            ],
            "test curve",
        );

        assert_eq!(curve.pct(SizeCode::M), Decimal::from(32));
        assert_eq!(curve.pct(SizeCode::Xxl), Decimal::from(4));
        assert_eq!(curve.total_pct(), Decimal::from(100));
    }

    #[test]
    fn test_supplier_rush_support() {
        let mut profile = SupplierProfile {
            name: "TEST".to_string(),
            location: "India".to_string(),
            lead_time_sampling_days: 14,
            lead_time_bulk_days: 35,
            lead_time_rush_days: Some(25),
            rush_premium_pct: Decimal::from(10),
            quality_defect_rate: Decimal::new(18, 1),
            response_time_hours: 6,
            moq_standard: 300,
            moq_negotiable: 150,
            negotiation_success_rate: Decimal::new(75, 2),
            labor_rate_per_minute: Decimal::new(65, 2),
        };

        assert!(profile.supports_rush());
        profile.lead_time_rush_days = None;
        assert!(!profile.supports_rush());
    }
}
