//! 庫存分配模型（尺碼曲線、配色、SKU 矩陣、補貨與滯銷）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::SizeCode;

/// 單一尺碼的分配
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeAllocation {
    pub size: SizeCode,
    pub percentage: Decimal,
    pub units: u32,
}

/// 單一配色的分配
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorAllocation {
    pub color: String,
    pub percentage: Decimal,
    pub units: u32,
}

/// SKU（配色 × 尺碼）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sku {
    /// SKU 代碼（例 "HOO-BLA-M"）
    pub code: String,

    pub color: String,
    pub size: SizeCode,
    pub units: u32,
}

/// 補貨急迫度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReorderUrgency {
    High,
    Medium,
    Low,
}

/// 單一 SKU 的補貨觸發點
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderTrigger {
    pub sku_code: String,
    pub initial_stock: u32,

    /// 預期每週銷量（含尺碼速度加權）
    pub expected_weekly_sales: Decimal,

    /// 補貨點 = 前置期需求 + 安全庫存需求
    pub reorder_point: u32,
    pub reorder_quantity: u32,
    pub lead_time_weeks: u32,
    pub safety_stock_units: u32,

    /// 庫存週數；週銷量為零時為 None（無法定義）
    pub weeks_of_inventory: Option<Decimal>,

    pub urgency: ReorderUrgency,
}

/// 滯銷風險等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockRiskLevel {
    /// 預估 20 週以上才能售罄
    High,
    /// 預估 12-20 週售罄
    Medium,
}

/// 滯銷風險標記
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadStockRisk {
    pub sku_code: String,
    pub units: u32,

    /// 預估售罄週數；週銷量為零時為 None
    pub estimated_weeks_to_sell: Option<Decimal>,

    pub risk_level: StockRiskLevel,
    pub recommendation: String,
    pub markdown_timing: String,
    pub markdown_percentage: String,
}

/// 售罄表現評級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellThroughRating {
    /// ≥ 85%
    Excellent,
    /// ≥ 70%
    Good,
    /// ≥ 50%
    Moderate,
    /// < 50%
    Poor,
}

/// 單月售罄進度
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySellThrough {
    pub month: u32,
    pub units_sold: u32,
    pub cumulative_sold: u32,
    pub remaining_inventory: u32,

    /// 剩餘庫存週數；週銷量為零時為 None
    pub inventory_weeks_remaining: Option<Decimal>,
}

/// 售罄預測
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellThrough {
    pub total_units: u32,
    pub expected_total_sales: u32,

    /// 預期售罄率（%）
    pub expected_sell_through_pct: Decimal,

    /// 售罄所需週數；週銷量為零時為 None
    pub weeks_to_sell_out: Option<Decimal>,

    pub rating: SellThroughRating,
    pub risk_assessment: String,
    pub monthly_breakdown: Vec<MonthlySellThrough>,
}

/// 庫存分配計畫（完整計算結果）
///
/// 不變量：尺碼分配與配色分配的單位總和都精確等於
/// 總量（捨入差額已歸入指定桶），絕不因捨入短少。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryPlan {
    pub product_name: String,
    pub total_units: u32,

    /// 套用的尺碼曲線名稱
    pub size_curve_applied: String,

    pub size_allocation: Vec<SizeAllocation>,
    pub color_allocation: Vec<ColorAllocation>,
    pub sku_matrix: Vec<Sku>,
    pub reorder_triggers: Vec<ReorderTrigger>,
    pub dead_stock_risks: Vec<DeadStockRisk>,
    pub sell_through: SellThrough,
    pub recommendations: Vec<String>,
}

impl InventoryPlan {
    /// 尺碼分配總和
    pub fn size_units_total(&self) -> u32 {
        self.size_allocation.iter().map(|a| a.units).sum()
    }

    /// 配色分配總和
    pub fn color_units_total(&self) -> u32 {
        self.color_allocation.iter().map(|a| a.units).sum()
    }

    /// SKU 總數
    pub fn sku_count(&self) -> usize {
        self.sku_matrix.len()
    }
}

/// 尺碼銷售速度乘數（M/L 最快，XS/XXL 最慢）
pub fn size_velocity_multiplier(size: SizeCode) -> Decimal {
    match size {
        SizeCode::Xs => Decimal::new(5, 1),  // 0.5
        SizeCode::S => Decimal::new(9, 1),   // 0.9
        SizeCode::M => Decimal::new(13, 1),  // 1.3
        SizeCode::L => Decimal::new(11, 1),  // 1.1
        SizeCode::Xl => Decimal::new(8, 1),  // 0.8
        SizeCode::Xxl => Decimal::new(5, 1), // 0.5
    }
}
