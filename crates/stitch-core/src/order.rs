//! 生產訂單模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PlanError, Result};

/// 尺碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeCode {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl SizeCode {
    /// 全部尺碼（由小到大）
    pub const ALL: [SizeCode; 6] = [
        SizeCode::Xs,
        SizeCode::S,
        SizeCode::M,
        SizeCode::L,
        SizeCode::Xl,
        SizeCode::Xxl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeCode::Xs => "XS",
            SizeCode::S => "S",
            SizeCode::M => "M",
            SizeCode::L => "L",
            SizeCode::Xl => "XL",
            SizeCode::Xxl => "XXL",
        }
    }

    /// 從文字解析（不分大小寫），無法識別時回傳 None
    pub fn parse(text: &str) -> Option<SizeCode> {
        match text.trim().to_ascii_lowercase().as_str() {
            "xs" => Some(SizeCode::Xs),
            "s" => Some(SizeCode::S),
            "m" => Some(SizeCode::M),
            "l" => Some(SizeCode::L),
            "xl" => Some(SizeCode::Xl),
            "xxl" => Some(SizeCode::Xxl),
            _ => None,
        }
    }
}

/// 付款條件（訂金/尾款比例）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTerms {
    /// 標準 40/60
    Standard,
    /// 100% 預付
    Prepayment,
    /// 50/50
    FiftyFifty,
    /// 30/70
    ThirtySeventy,
}

impl PaymentTerms {
    /// 訂金比例（%）
    pub fn deposit_pct(&self) -> Decimal {
        match self {
            PaymentTerms::Standard => Decimal::from(40),
            PaymentTerms::Prepayment => Decimal::from(100),
            PaymentTerms::FiftyFifty => Decimal::from(50),
            PaymentTerms::ThirtySeventy => Decimal::from(30),
        }
    }

    /// 尾款比例（%）
    pub fn balance_pct(&self) -> Decimal {
        Decimal::from(100) - self.deposit_pct()
    }

    /// 從文字解析，無法識別的付款條件屬於致命請求錯誤
    pub fn parse(text: &str) -> Result<PaymentTerms> {
        match text.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(PaymentTerms::Standard),
            "prepayment" => Ok(PaymentTerms::Prepayment),
            "50-50" => Ok(PaymentTerms::FiftyFifty),
            "30-70" => Ok(PaymentTerms::ThirtySeventy),
            other => Err(PlanError::InvalidPaymentTerms(other.to_string())),
        }
    }
}

/// 銷售通路
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellingChannel {
    /// DTC（Shopify）
    DtcShopify,
    /// DTC（自建站）
    DtcOwn,
    Amazon,
    Wholesale,
    Marketplace,
    Hybrid,
}

impl SellingChannel {
    /// 通路費率（%）
    pub fn fee_pct(&self) -> Decimal {
        match self {
            SellingChannel::DtcShopify => Decimal::new(29, 1), // 2.9
            SellingChannel::DtcOwn => Decimal::ZERO,
            SellingChannel::Amazon => Decimal::from(15),
            SellingChannel::Wholesale => Decimal::ZERO,
            SellingChannel::Marketplace => Decimal::from(12),
            SellingChannel::Hybrid => Decimal::from(8),
        }
    }
}

/// 配色策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorStrategy {
    /// 中性色為主（固定權重分配）
    NeutralHeavy,
    /// 平均分配
    Balanced,
    /// 中性色 + 一個 25% 流行強調色
    TrendAccent,
}

/// 工藝複雜度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// 付款彈性（MOQ 談判籌碼）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFlexibility {
    /// 無額外彈性
    None,
    /// 100% 預付
    FullPrepayment,
    /// 50% 訂金（高於一般 30-40%）
    FiftyDeposit,
}

/// 生產訂單（不可變請求）
///
/// 未知的款式/布料/供應商鍵是合法輸入，
/// 計算時以文件化的預設值解析並附上警告。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSpec {
    /// 款式類型（例 "hoodie-pullover"）
    pub garment_type: String,

    /// 樣品尺碼（成本計算基準）
    pub size: SizeCode,

    /// 布料（例 "cotton-jersey-180gsm"）
    pub fabric: String,

    /// 供應商（例 "EcoKnits-Tirupur"）
    pub supplier: String,

    /// 訂購數量（必須 > 0）
    pub units: u32,

    /// 配色清單
    pub colors: Vec<String>,

    /// 銷售通路
    pub channel: SellingChannel,

    /// 付款條件
    pub payment_terms: PaymentTerms,

    /// 目標上市日期
    pub target_launch: Option<NaiveDate>,
}

impl OrderSpec {
    /// 創建新的訂單
    pub fn new(
        garment_type: impl Into<String>,
        size: SizeCode,
        fabric: impl Into<String>,
        supplier: impl Into<String>,
        units: u32,
    ) -> Self {
        Self {
            garment_type: garment_type.into(),
            size,
            fabric: fabric.into(),
            supplier: supplier.into(),
            units,
            colors: Vec::new(),
            channel: SellingChannel::DtcShopify,
            payment_terms: PaymentTerms::Standard,
            target_launch: None,
        }
    }

    /// 建構器模式：設置配色
    pub fn with_colors(mut self, colors: Vec<String>) -> Self {
        self.colors = colors;
        self
    }

    /// 建構器模式：設置銷售通路
    pub fn with_channel(mut self, channel: SellingChannel) -> Self {
        self.channel = channel;
        self
    }

    /// 建構器模式：設置付款條件
    pub fn with_payment_terms(mut self, terms: PaymentTerms) -> Self {
        self.payment_terms = terms;
        self
    }

    /// 建構器模式：設置目標上市日期
    pub fn with_target_launch(mut self, date: NaiveDate) -> Self {
        self.target_launch = Some(date);
        self
    }

    /// 驗證致命約束（數量、款式類型）
    pub fn validate(&self) -> Result<()> {
        if self.units == 0 {
            return Err(PlanError::InvalidUnitCount(0));
        }
        if self.garment_type.trim().is_empty() {
            return Err(PlanError::EmptyGarmentType);
        }
        Ok(())
    }
}

/// 現金流計算輸入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceInputs {
    /// 初始資金
    pub initial_capital: Decimal,

    /// 零售價；None 時採用成本鏈建議的 DTC 定價
    pub retail_price: Option<Decimal>,

    /// 上市後各月預期銷量（最多取 6 個月）
    pub expected_monthly_sales: Vec<u32>,
}

impl FinanceInputs {
    pub fn new(initial_capital: Decimal, expected_monthly_sales: Vec<u32>) -> Self {
        Self {
            initial_capital,
            retail_price: None,
            expected_monthly_sales,
        }
    }

    /// 建構器模式：指定零售價
    pub fn with_retail_price(mut self, price: Decimal) -> Self {
        self.retail_price = Some(price);
        self
    }
}

/// 庫存分配計算輸入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryInputs {
    /// 品類（例 "activewear"）
    pub category: String,

    /// 版型（例 "athletic"、"relaxed"）
    pub fit_type: String,

    /// 目標客群（例 "womens"）
    pub target_demographic: String,

    /// 配色策略
    pub color_strategy: ColorStrategy,

    /// 補貨前置時間（週）
    pub lead_time_weeks: u32,

    /// 預期每週總銷量
    pub expected_weekly_sales: Decimal,

    /// 銷售季長度（週）
    pub selling_season_weeks: u32,
}

/// 生產時程計算輸入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineInputs {
    /// 下單月份（1-12）
    pub order_month: u32,

    /// 工藝複雜度
    pub complexity: Complexity,

    /// 計算基準日（注入時鐘，確保相同輸入產生相同結果）
    pub today: NaiveDate,
}

/// MOQ 談判計算輸入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoqInputs {
    /// 系列款式數
    pub num_styles: u32,

    /// 下單月份（1-12）
    pub order_month: u32,

    /// 付款彈性
    pub payment_flexibility: PaymentFlexibility,

    /// 目標總量（每款）
    pub target_units: u32,

    /// 系列使用的布料
    pub fabrics: Vec<String>,

    /// 系列配色
    pub colors: Vec<String>,
}

/// 完整規劃請求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    /// 請求ID
    pub id: Uuid,

    pub order: OrderSpec,
    pub finance: FinanceInputs,
    pub inventory: InventoryInputs,
    pub timeline: TimelineInputs,

    /// MOQ 談判為可選分析
    pub moq: Option<MoqInputs>,
}

impl PlanRequest {
    pub fn new(
        order: OrderSpec,
        finance: FinanceInputs,
        inventory: InventoryInputs,
        timeline: TimelineInputs,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order,
            finance,
            inventory,
            timeline,
            moq: None,
        }
    }

    /// 建構器模式：附加 MOQ 談判分析
    pub fn with_moq(mut self, moq: MoqInputs) -> Self {
        self.moq = Some(moq);
        self
    }
}
