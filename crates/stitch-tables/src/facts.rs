//! 事實庫提供者
//!
//! 把 S-expression 事實檔載入成鍵值存儲，再以 [`FactTables`]
//! 提供 `ReferenceTables` 查詢。查無鍵一律回傳 `None`，
//! 由計算器套用文件化預設值，因此事實檔可以只涵蓋部分資料。
//!
//! 支援的事實形式：
//!
//! ```text
//! (base-meters hoodie-pullover m 2.2)
//! (pattern-efficiency hoodie-pullover 0.78)
//! (shrinkage cotton-jersey-180gsm 0.03)
//! (waste cotton-jersey-180gsm 0.15)
//! (fabric-price cotton-jersey-180gsm 5.80)
//! (trim hoodie-pullover thread 0.08)
//! (smv hoodie-pullover 35)
//! (duty-rate hoodie-pullover 0.16)
//! (labor-rate EcoKnits-Tirupur 0.65)
//! (overhead-rate EcoKnits-Tirupur 0.16)
//! (profit-rate EcoKnits-Tirupur 0.10)
//! (freight EcoKnits-Tirupur 3.60)
//! (supplier EcoKnits-Tirupur India 14 35 25 10 1.8 6 300 150 0.75 0.65)
//! (size-curve athletic-fit 3 16 34 30 13 4)
//! (shipping-days India 20)
//! ```
//!
//! `supplier` 的加急欄位寫 `none` 表示不提供加急。

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;

use stitch_core::order::SizeCode;
use stitch_core::tables::{ReferenceTables, SizeCurve, SupplierProfile, TrimItem};

use crate::sexpr::{parse_document, ParseError, Sexpr};

/// 事實檔載入錯誤
#[derive(Debug, Error)]
pub enum FactError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("事實 {head} 欄位數錯誤: 預期 {expected}, 實得 {got}")]
    Arity {
        head: String,
        expected: usize,
        got: usize,
    },

    #[error("無效的數值: {0}")]
    InvalidNumber(String),

    #[error("無效的尺碼: {0}")]
    InvalidSize(String),

    #[error("未知的事實類型: {0}")]
    UnknownFact(String),

    #[error("事實必須是括號列表")]
    NotAList,
}

/// 已載入的事實集合
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    base_meters: HashMap<(String, SizeCode), Decimal>,
    pattern_efficiency: HashMap<String, Decimal>,
    shrinkage: HashMap<String, Decimal>,
    waste: HashMap<String, Decimal>,
    fabric_price: HashMap<String, Decimal>,
    trims: HashMap<String, Vec<TrimItem>>,
    smv: HashMap<String, Decimal>,
    duty_rate: HashMap<String, Decimal>,
    labor_rate: HashMap<String, Decimal>,
    overhead_rate: HashMap<String, Decimal>,
    profit_rate: HashMap<String, Decimal>,
    freight: HashMap<String, Decimal>,
    suppliers: Vec<SupplierProfile>,
    size_curves: HashMap<String, SizeCurve>,
    shipping_days: HashMap<String, u32>,
}

impl FactStore {
    /// 解析事實檔內容
    pub fn from_text(input: &str) -> Result<Self, FactError> {
        let mut store = Self::default();
        for form in parse_document(input)? {
            store.insert(&form)?;
        }
        Ok(store)
    }

    fn insert(&mut self, form: &Sexpr) -> Result<(), FactError> {
        let items = form.as_list().ok_or(FactError::NotAList)?;
        let atoms: Vec<&str> = items.iter().filter_map(|i| i.as_atom()).collect();
        if atoms.len() != items.len() || atoms.is_empty() {
            return Err(FactError::NotAList);
        }

        let head = atoms[0];
        let args = &atoms[1..];
        match head {
            "base-meters" => {
                expect_arity(head, args, 3)?;
                let size = parse_size(args[1])?;
                self.base_meters
                    .insert((args[0].to_string(), size), parse_decimal(args[2])?);
            }
            "pattern-efficiency" => {
                expect_arity(head, args, 2)?;
                self.pattern_efficiency
                    .insert(args[0].to_string(), parse_decimal(args[1])?);
            }
            "shrinkage" => {
                expect_arity(head, args, 2)?;
                self.shrinkage
                    .insert(args[0].to_string(), parse_decimal(args[1])?);
            }
            "waste" => {
                expect_arity(head, args, 2)?;
                self.waste
                    .insert(args[0].to_string(), parse_decimal(args[1])?);
            }
            "fabric-price" => {
                expect_arity(head, args, 2)?;
                self.fabric_price
                    .insert(args[0].to_string(), parse_decimal(args[1])?);
            }
            "trim" => {
                expect_arity(head, args, 3)?;
                self.trims
                    .entry(args[0].to_string())
                    .or_default()
                    .push(TrimItem::new(args[1], parse_decimal(args[2])?));
            }
            "smv" => {
                expect_arity(head, args, 2)?;
                self.smv
                    .insert(args[0].to_string(), parse_decimal(args[1])?);
            }
            "duty-rate" => {
                expect_arity(head, args, 2)?;
                self.duty_rate
                    .insert(args[0].to_string(), parse_decimal(args[1])?);
            }
            "labor-rate" => {
                expect_arity(head, args, 2)?;
                self.labor_rate
                    .insert(args[0].to_string(), parse_decimal(args[1])?);
            }
            "overhead-rate" => {
                expect_arity(head, args, 2)?;
                self.overhead_rate
                    .insert(args[0].to_string(), parse_decimal(args[1])?);
            }
            "profit-rate" => {
                expect_arity(head, args, 2)?;
                self.profit_rate
                    .insert(args[0].to_string(), parse_decimal(args[1])?);
            }
            "freight" => {
                expect_arity(head, args, 2)?;
                self.freight
                    .insert(args[0].to_string(), parse_decimal(args[1])?);
            }
            "supplier" => {
                expect_arity(head, args, 12)?;
                let rush = if args[4] == "none" {
                    None
                } else {
                    Some(parse_u32(args[4])?)
                };
                self.suppliers.push(SupplierProfile {
                    name: args[0].to_string(),
                    location: args[1].to_string(),
                    lead_time_sampling_days: parse_u32(args[2])?,
                    lead_time_bulk_days: parse_u32(args[3])?,
                    lead_time_rush_days: rush,
                    rush_premium_pct: parse_decimal(args[5])?,
                    quality_defect_rate: parse_decimal(args[6])?,
                    response_time_hours: parse_u32(args[7])?,
                    moq_standard: parse_u32(args[8])?,
                    moq_negotiable: parse_u32(args[9])?,
                    negotiation_success_rate: parse_decimal(args[10])?,
                    labor_rate_per_minute: parse_decimal(args[11])?,
                });
            }
            "size-curve" => {
                expect_arity(head, args, 7)?;
                let mut pcts = [Decimal::ZERO; 6];
                for (slot, raw) in pcts.iter_mut().zip(&args[1..7]) {
                    *slot = parse_decimal(raw)?;
                }
                self.size_curves
                    .insert(args[0].to_string(), SizeCurve::new(args[0], pcts, ""));
            }
            "shipping-days" => {
                expect_arity(head, args, 2)?;
                self.shipping_days
                    .insert(args[0].to_string(), parse_u32(args[1])?);
            }
            other => return Err(FactError::UnknownFact(other.to_string())),
        }

        Ok(())
    }
}

fn expect_arity(head: &str, args: &[&str], expected: usize) -> Result<(), FactError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(FactError::Arity {
            head: head.to_string(),
            expected,
            got: args.len(),
        })
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal, FactError> {
    raw.parse()
        .map_err(|_| FactError::InvalidNumber(raw.to_string()))
}

fn parse_u32(raw: &str) -> Result<u32, FactError> {
    raw.parse()
        .map_err(|_| FactError::InvalidNumber(raw.to_string()))
}

fn parse_size(raw: &str) -> Result<SizeCode, FactError> {
    SizeCode::parse(raw).ok_or_else(|| FactError::InvalidSize(raw.to_string()))
}

/// 事實庫參照表
#[derive(Debug, Clone, Default)]
pub struct FactTables {
    store: FactStore,
}

impl FactTables {
    pub fn new(store: FactStore) -> Self {
        Self { store }
    }

    /// 直接由事實檔內容建表
    pub fn from_text(input: &str) -> Result<Self, FactError> {
        Ok(Self::new(FactStore::from_text(input)?))
    }
}

impl ReferenceTables for FactTables {
    fn base_meters(&self, garment: &str, size: SizeCode) -> Option<Decimal> {
        self.store
            .base_meters
            .get(&(garment.to_string(), size))
            .copied()
    }

    fn pattern_efficiency(&self, garment: &str) -> Option<Decimal> {
        self.store.pattern_efficiency.get(garment).copied()
    }

    fn shrinkage(&self, fabric: &str) -> Option<Decimal> {
        self.store.shrinkage.get(fabric).copied()
    }

    fn waste(&self, fabric: &str) -> Option<Decimal> {
        self.store.waste.get(fabric).copied()
    }

    fn fabric_price(&self, fabric: &str) -> Option<Decimal> {
        self.store.fabric_price.get(fabric).copied()
    }

    fn trim_bill(&self, garment: &str) -> Option<Vec<TrimItem>> {
        self.store.trims.get(garment).cloned()
    }

    fn smv_minutes(&self, garment: &str) -> Option<Decimal> {
        self.store.smv.get(garment).copied()
    }

    fn duty_rate(&self, garment: &str) -> Option<Decimal> {
        self.store.duty_rate.get(garment).copied()
    }

    fn labor_rate(&self, supplier: &str) -> Option<Decimal> {
        self.store.labor_rate.get(supplier).copied()
    }

    fn overhead_rate(&self, supplier: &str) -> Option<Decimal> {
        self.store.overhead_rate.get(supplier).copied()
    }

    fn profit_rate(&self, supplier: &str) -> Option<Decimal> {
        self.store.profit_rate.get(supplier).copied()
    }

    fn freight_per_unit(&self, supplier: &str) -> Option<Decimal> {
        self.store.freight.get(supplier).copied()
    }

    fn supplier_profile(&self, supplier: &str) -> Option<SupplierProfile> {
        self.store
            .suppliers
            .iter()
            .find(|p| p.name == supplier)
            .cloned()
    }

    fn suppliers(&self) -> Vec<String> {
        self.store.suppliers.iter().map(|p| p.name.clone()).collect()
    }

    fn size_curve(&self, key: &str) -> Option<SizeCurve> {
        self.store.size_curves.get(key).cloned()
    }

    fn shipping_days(&self, location: &str) -> Option<u32> {
        self.store.shipping_days.get(location).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
; 測試事實集
(fabric-price cotton-jersey-180gsm 5.80)
(shrinkage cotton-jersey-180gsm 0.03)
(base-meters hoodie-pullover m 2.2)
(trim hoodie-pullover drawcord-5mm-1.2m 0.18)
(trim hoodie-pullover thread 0.08)
(supplier EcoKnits-Tirupur India 14 35 25 10 1.8 6 300 150 0.75 0.65)
(supplier PortugalPremium-Porto Portugal 10 28 none 0 0.6 24 200 100 0.85 2.20)
(size-curve athletic-fit 3 16 34 30 13 4)
(shipping-days India 20)
"#;

    #[test]
    fn test_load_and_lookup() {
        let tables = FactTables::from_text(SAMPLE).unwrap();

        assert_eq!(
            tables.fabric_price("cotton-jersey-180gsm"),
            Some(Decimal::new(580, 2))
        );
        assert_eq!(
            tables.base_meters("hoodie-pullover", SizeCode::M),
            Some(Decimal::new(22, 1))
        );
        assert_eq!(tables.trim_bill("hoodie-pullover").unwrap().len(), 2);
        assert_eq!(tables.shipping_days("India"), Some(20));
    }

    #[test]
    fn test_rush_none_sentinel() {
        let tables = FactTables::from_text(SAMPLE).unwrap();
        let porto = tables.supplier_profile("PortugalPremium-Porto").unwrap();
        assert!(!porto.supports_rush());
        let eco = tables.supplier_profile("EcoKnits-Tirupur").unwrap();
        assert_eq!(eco.lead_time_rush_days, Some(25));
    }

    #[test]
    fn test_missing_key_falls_through_to_none() {
        let tables = FactTables::from_text(SAMPLE).unwrap();
        assert_eq!(tables.fabric_price("merino-wool-blend"), None);
        assert_eq!(tables.smv_minutes("hoodie-pullover"), None);
    }

    #[test]
    fn test_malformed_fact_rejected() {
        assert!(matches!(
            FactStore::from_text("(fabric-price cotton)"),
            Err(FactError::Arity { .. })
        ));
        assert!(matches!(
            FactStore::from_text("(made-up-fact a b)"),
            Err(FactError::UnknownFact(_))
        ));
    }
}
