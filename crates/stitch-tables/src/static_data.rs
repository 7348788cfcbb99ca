//! 內建生產資料集
//!
//! 五種款式 × 六個尺碼的用布量、五種布料、六家供應商、
//! 六條尺碼曲線。`Default` 即完整資料集；測試可另建夾具。

use rust_decimal::Decimal;
use stitch_core::order::SizeCode;
use stitch_core::tables::{ReferenceTables, SizeCurve, SupplierProfile, TrimItem};

/// 程式內建的參照表
#[derive(Debug, Clone, Default)]
pub struct StaticTables;

impl StaticTables {
    pub fn new() -> Self {
        Self
    }
}

fn d(mantissa: i64, scale: u32) -> Decimal {
    Decimal::new(mantissa, scale)
}

fn size_index(size: SizeCode) -> usize {
    match size {
        SizeCode::Xs => 0,
        SizeCode::S => 1,
        SizeCode::M => 2,
        SizeCode::L => 3,
        SizeCode::Xl => 4,
        SizeCode::Xxl => 5,
    }
}

impl ReferenceTables for StaticTables {
    fn base_meters(&self, garment: &str, size: SizeCode) -> Option<Decimal> {
        // 單位：公尺 × 10
        let grid: [i64; 6] = match garment {
            "t-shirt-basic" => [10, 12, 13, 14, 15, 17],
            "hoodie-pullover" => [18, 20, 22, 24, 26, 29],
            "jogger-pants" => [16, 18, 20, 22, 24, 27],
            "leggings-activewear" => [14, 15, 17, 19, 21, 23],
            "jacket-bomber" => [22, 24, 26, 28, 31, 34],
            _ => return None,
        };
        Some(d(grid[size_index(size)], 1))
    }

    fn pattern_efficiency(&self, garment: &str) -> Option<Decimal> {
        let pct = match garment {
            "t-shirt-basic" => 85,
            "hoodie-pullover" => 78,
            "jogger-pants" => 76,
            "leggings-activewear" => 82,
            "jacket-bomber" => 72,
            _ => return None,
        };
        Some(d(pct, 2))
    }

    fn shrinkage(&self, fabric: &str) -> Option<Decimal> {
        let pct = match fabric {
            "cotton-jersey-180gsm" => 3,
            "recycled-polyester-performance" => 2,
            "organic-cotton-twill" => 4,
            "merino-wool-blend" => 5,
            "tencel-lyocell-jersey" => 3,
            _ => return None,
        };
        Some(d(pct, 2))
    }

    fn waste(&self, fabric: &str) -> Option<Decimal> {
        let pct = match fabric {
            "cotton-jersey-180gsm" => 15,
            "recycled-polyester-performance" => 12,
            "organic-cotton-twill" => 18,
            "merino-wool-blend" => 14,
            "tencel-lyocell-jersey" => 13,
            _ => return None,
        };
        Some(d(pct, 2))
    }

    fn fabric_price(&self, fabric: &str) -> Option<Decimal> {
        let cents = match fabric {
            "cotton-jersey-180gsm" => 580,
            "recycled-polyester-performance" => 720,
            "organic-cotton-twill" => 950,
            "merino-wool-blend" => 1850,
            "tencel-lyocell-jersey" => 1080,
            _ => return None,
        };
        Some(d(cents, 2))
    }

    fn trim_bill(&self, garment: &str) -> Option<Vec<TrimItem>> {
        let items: &[(&str, i64)] = match garment {
            "t-shirt-basic" => &[
                ("label-main-neck", 15),
                ("label-care-side", 8),
                ("hangtag", 12),
                ("polybag", 8),
                ("thread", 5),
            ],
            "hoodie-pullover" => &[
                ("drawcord-5mm-1.2m", 18),
                ("cord-locks-2", 10),
                ("label-main-neck", 15),
                ("label-care-side", 8),
                ("hangtag", 12),
                ("polybag", 8),
                ("thread", 8),
            ],
            "jogger-pants" => &[
                ("elastic-waistband-40mm", 11),
                ("drawcord-5mm-1.4m", 21),
                ("cord-locks-2", 10),
                ("elastic-ankle-25mm", 5),
                ("zipper-pocket-18cm-2", 240),
                ("label-main", 15),
                ("label-care", 8),
                ("hangtag", 12),
                ("polybag", 10),
                ("thread", 6),
            ],
            "leggings-activewear" => &[
                ("elastic-waistband-60mm", 13),
                ("gusset-mesh", 15),
                ("label-main", 15),
                ("label-care", 8),
                ("hangtag", 12),
                ("polybag", 8),
                ("thread-stretch", 8),
            ],
            "jacket-bomber" => &[
                ("zipper-front-60cm", 210),
                ("zipper-pocket-18cm-2", 240),
                ("snap-button-3", 75),
                ("ribbing-cuff", 18),
                ("ribbing-hem", 27),
                ("ribbing-collar", 15),
                ("label-main", 15),
                ("label-care", 8),
                ("hangtag", 12),
                ("polybag", 10),
                ("thread", 10),
            ],
            _ => return None,
        };
        Some(
            items
                .iter()
                .map(|(name, cents)| TrimItem::new(*name, d(*cents, 2)))
                .collect(),
        )
    }

    fn smv_minutes(&self, garment: &str) -> Option<Decimal> {
        let minutes = match garment {
            "t-shirt-basic" => 10,
            "hoodie-pullover" => 35,
            "jogger-pants" => 31,
            "leggings-activewear" => 25,
            "jacket-bomber" => 57,
            _ => return None,
        };
        Some(Decimal::from(minutes))
    }

    fn duty_rate(&self, garment: &str) -> Option<Decimal> {
        let per_mille = match garment {
            "t-shirt-basic" => 160,
            "hoodie-pullover" => 160,
            "jogger-pants" => 165,
            "leggings-activewear" => 160,
            "jacket-bomber" => 165,
            _ => return None,
        };
        Some(d(per_mille, 3))
    }

    fn labor_rate(&self, supplier: &str) -> Option<Decimal> {
        let cents = match supplier {
            "EcoKnits-Tirupur" => 65,
            "VietnamTex-HoChiMinh" => 75,
            "PortugalPremium-Porto" => 220,
            "ChinaScale-Guangzhou" => 45,
            "MakersRow-LosAngeles" => 350,
            "BangladeshValue-Dhaka" => 35,
            _ => return None,
        };
        Some(d(cents, 2))
    }

    fn overhead_rate(&self, supplier: &str) -> Option<Decimal> {
        let pct = match supplier {
            "EcoKnits-Tirupur" => 16,
            "VietnamTex-HoChiMinh" => 15,
            "PortugalPremium-Porto" => 18,
            "ChinaScale-Guangzhou" => 14,
            "MakersRow-LosAngeles" => 22,
            "BangladeshValue-Dhaka" => 12,
            _ => return None,
        };
        Some(d(pct, 2))
    }

    fn profit_rate(&self, supplier: &str) -> Option<Decimal> {
        let pct = match supplier {
            "EcoKnits-Tirupur" => 10,
            "VietnamTex-HoChiMinh" => 12,
            "PortugalPremium-Porto" => 15,
            "ChinaScale-Guangzhou" => 8,
            "MakersRow-LosAngeles" => 18,
            "BangladeshValue-Dhaka" => 7,
            _ => return None,
        };
        Some(d(pct, 2))
    }

    fn freight_per_unit(&self, supplier: &str) -> Option<Decimal> {
        let cents = match supplier {
            "EcoKnits-Tirupur" => 360,
            "VietnamTex-HoChiMinh" => 340,
            "PortugalPremium-Porto" => 850,
            "ChinaScale-Guangzhou" => 315,
            "MakersRow-LosAngeles" => 120,
            "BangladeshValue-Dhaka" => 335,
            _ => return None,
        };
        Some(d(cents, 2))
    }

    fn supplier_profile(&self, supplier: &str) -> Option<SupplierProfile> {
        let profile = match supplier {
            "EcoKnits-Tirupur" => SupplierProfile {
                name: "EcoKnits-Tirupur".to_string(),
                location: "India".to_string(),
                lead_time_sampling_days: 14,
                lead_time_bulk_days: 35,
                lead_time_rush_days: Some(25),
                rush_premium_pct: Decimal::from(10),
                quality_defect_rate: d(18, 1),
                response_time_hours: 6,
                moq_standard: 300,
                moq_negotiable: 150,
                negotiation_success_rate: d(75, 2),
                labor_rate_per_minute: d(65, 2),
            },
            "VietnamTex-HoChiMinh" => SupplierProfile {
                name: "VietnamTex-HoChiMinh".to_string(),
                location: "Vietnam".to_string(),
                lead_time_sampling_days: 18,
                lead_time_bulk_days: 42,
                lead_time_rush_days: Some(32),
                rush_premium_pct: Decimal::from(15),
                quality_defect_rate: d(12, 1),
                response_time_hours: 12,
                moq_standard: 500,
                moq_negotiable: 250,
                negotiation_success_rate: d(65, 2),
                labor_rate_per_minute: d(75, 2),
            },
            "PortugalPremium-Porto" => SupplierProfile {
                name: "PortugalPremium-Porto".to_string(),
                location: "Portugal".to_string(),
                lead_time_sampling_days: 10,
                lead_time_bulk_days: 28,
                lead_time_rush_days: None,
                rush_premium_pct: Decimal::ZERO,
                quality_defect_rate: d(6, 1),
                response_time_hours: 24,
                moq_standard: 200,
                moq_negotiable: 100,
                negotiation_success_rate: d(85, 2),
                labor_rate_per_minute: d(220, 2),
            },
            "ChinaScale-Guangzhou" => SupplierProfile {
                name: "ChinaScale-Guangzhou".to_string(),
                location: "China".to_string(),
                lead_time_sampling_days: 16,
                lead_time_bulk_days: 30,
                lead_time_rush_days: Some(22),
                rush_premium_pct: Decimal::from(8),
                quality_defect_rate: d(25, 1),
                response_time_hours: 8,
                moq_standard: 1000,
                moq_negotiable: 600,
                negotiation_success_rate: d(55, 2),
                labor_rate_per_minute: d(45, 2),
            },
            "MakersRow-LosAngeles" => SupplierProfile {
                name: "MakersRow-LosAngeles".to_string(),
                location: "USA".to_string(),
                lead_time_sampling_days: 7,
                lead_time_bulk_days: 21,
                lead_time_rush_days: Some(14),
                rush_premium_pct: Decimal::from(20),
                quality_defect_rate: d(10, 1),
                response_time_hours: 4,
                moq_standard: 100,
                moq_negotiable: 50,
                negotiation_success_rate: d(90, 2),
                labor_rate_per_minute: d(350, 2),
            },
            "BangladeshValue-Dhaka" => SupplierProfile {
                name: "BangladeshValue-Dhaka".to_string(),
                location: "Bangladesh".to_string(),
                lead_time_sampling_days: 20,
                lead_time_bulk_days: 45,
                lead_time_rush_days: None,
                rush_premium_pct: Decimal::ZERO,
                quality_defect_rate: d(32, 1),
                response_time_hours: 24,
                moq_standard: 1500,
                moq_negotiable: 1000,
                negotiation_success_rate: d(45, 2),
                labor_rate_per_minute: d(35, 2),
            },
            _ => return None,
        };
        Some(profile)
    }

    fn suppliers(&self) -> Vec<String> {
        [
            "EcoKnits-Tirupur",
            "VietnamTex-HoChiMinh",
            "PortugalPremium-Porto",
            "ChinaScale-Guangzhou",
            "MakersRow-LosAngeles",
            "BangladeshValue-Dhaka",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn size_curve(&self, key: &str) -> Option<SizeCurve> {
        let (name, pcts, reasoning): (&str, [i64; 6], &str) = match key {
            "activewear-standard" => (
                "Activewear Standard Fit",
                [4, 18, 32, 28, 14, 4],
                "Athletic demographic, M/L bias",
            ),
            "athletic-fit" => (
                "Athletic Fit (M/L Bias)",
                [3, 16, 34, 30, 13, 4],
                "Performance-focused consumers, muscular builds",
            ),
            "relaxed-fit" => (
                "Relaxed Fit (Broader Distribution)",
                [5, 20, 30, 25, 15, 5],
                "Comfort-focused, less size concentration",
            ),
            "plus-inclusive" => (
                "Plus-Inclusive Sizing",
                [6, 18, 26, 24, 16, 10],
                "Inclusive sizing strategy, stronger XL/XXL",
            ),
            "streetwear" => (
                "Streetwear Oversized",
                [2, 15, 35, 32, 12, 4],
                "Trend toward larger sizes, drop shoulder fits",
            ),
            "womens-fashion" => (
                "Women's Fashion Standard",
                [8, 24, 32, 22, 10, 4],
                "Traditional women's sizing, S/M peak",
            ),
            _ => return None,
        };
        Some(SizeCurve::new(
            name,
            pcts.map(Decimal::from),
            reasoning,
        ))
    }

    fn shipping_days(&self, location: &str) -> Option<u32> {
        let days = match location {
            "China" => 15,
            "Vietnam" => 17,
            "India" => 20,
            "Bangladesh" => 23,
            "Portugal" => 12,
            "USA" => 0,
            _ => return None,
        };
        Some(days)
    }
}
