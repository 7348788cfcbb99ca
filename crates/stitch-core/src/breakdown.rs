//! 成本分解模型（BOM → FOB → Landed Cost → 定價）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tables::TrimItem;

/// 定價層（單一通路定位）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTier {
    /// 建議零售價（"X9" 尾數定價）
    pub price: Decimal,

    /// 毛利率（%）
    pub margin_pct: Decimal,
}

/// 三層定價建議
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTiers {
    /// DTC（2.8 倍）
    pub dtc: PriceTier,

    /// 批發（2.2 倍）
    pub wholesale: PriceTier,

    /// 高端定位（3.5 倍）
    pub premium: PriceTier,
}

/// 單件成本分解
///
/// 不變量：
/// - `fob == fabric_cost + trim_cost + labor_cost + overhead + factory_profit`
/// - `landed_cost == fob + freight + duty + customs_broker + inspection + receiving`
/// - `landed_cost >= fob`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// 款式類型
    pub garment_type: String,

    /// 計價尺碼
    pub size: String,

    /// 布料
    pub fabric: String,

    /// 供應商
    pub supplier: String,

    /// 訂購數量
    pub units: u32,

    /// 用布量（公尺，含效率/縮率/裁耗）
    pub fabric_consumption_meters: Decimal,

    /// 布料成本
    pub fabric_cost: Decimal,

    /// 輔料明細
    pub trim_items: Vec<TrimItem>,

    /// 輔料小計
    pub trim_cost: Decimal,

    /// 人工成本（SMV × 工資）
    pub labor_cost: Decimal,

    /// 工廠管銷
    pub overhead: Decimal,

    /// 工廠利潤
    pub factory_profit: Decimal,

    /// FOB 出廠價
    pub fob: Decimal,

    /// 每件海運費
    pub freight: Decimal,

    /// 關稅
    pub duty: Decimal,

    /// 報關行攤提（固定費用 / 數量）
    pub customs_broker: Decimal,

    /// 驗貨費
    pub inspection: Decimal,

    /// 入倉費
    pub receiving: Decimal,

    /// 到岸成本
    pub landed_cost: Decimal,

    /// 定價建議
    pub pricing: PricingTiers,
}

impl CostBreakdown {
    /// 直接成本（布料 + 輔料 + 人工）
    pub fn direct_cost(&self) -> Decimal {
        self.fabric_cost + self.trim_cost + self.labor_cost
    }

    /// 整單 FOB 總值
    pub fn total_fob_value(&self) -> Decimal {
        self.fob * Decimal::from(self.units)
    }

    /// 整單到岸總值
    pub fn total_landed_value(&self) -> Decimal {
        self.landed_cost * Decimal::from(self.units)
    }

    /// 由回傳欄位重建 FOB（不變量檢查）
    pub fn reconstructed_fob(&self) -> Decimal {
        self.direct_cost() + self.overhead + self.factory_profit
    }

    /// 由回傳欄位重建到岸成本（不變量檢查）
    pub fn reconstructed_landed(&self) -> Decimal {
        self.fob + self.freight + self.duty + self.customs_broker + self.inspection + self.receiving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_breakdown() -> CostBreakdown {
        CostBreakdown {
            garment_type: "hoodie-pullover".to_string(),
            size: "M".to_string(),
            fabric: "cotton-jersey-180gsm".to_string(),
            supplier: "EcoKnits-Tirupur".to_string(),
            units: 500,
            fabric_consumption_meters: Decimal::new(334, 2),
            fabric_cost: Decimal::new(1937, 2),
            trim_items: vec![TrimItem::new("thread", Decimal::new(8, 2))],
            trim_cost: Decimal::new(79, 2),
            labor_cost: Decimal::new(2275, 2),
            overhead: Decimal::new(687, 2),
            factory_profit: Decimal::new(498, 2),
            fob: Decimal::new(5476, 2),
            freight: Decimal::new(360, 2),
            duty: Decimal::new(876, 2),
            customs_broker: Decimal::new(25, 2),
            inspection: Decimal::new(40, 2),
            receiving: Decimal::new(65, 2),
            landed_cost: Decimal::new(6842, 2),
            pricing: PricingTiers {
                dtc: PriceTier {
                    price: Decimal::from(189),
                    margin_pct: Decimal::new(638, 1),
                },
                wholesale: PriceTier {
                    price: Decimal::from(149),
                    margin_pct: Decimal::new(541, 1),
                },
                premium: PriceTier {
                    price: Decimal::from(239),
                    margin_pct: Decimal::new(714, 1),
                },
            },
        }
    }

    #[test]
    fn test_fob_reconstruction() {
        let b = sample_breakdown();
        assert_eq!(b.reconstructed_fob(), b.fob);
    }

    #[test]
    fn test_landed_at_least_fob() {
        let b = sample_breakdown();
        assert!(b.landed_cost >= b.fob);
    }

    #[test]
    fn test_total_values() {
        let b = sample_breakdown();
        assert_eq!(b.total_fob_value(), Decimal::new(5476, 2) * Decimal::from(500));
    }
}
