//! # Stitch Tables
//!
//! 參照表提供者實作：
//! - [`StaticTables`]：內建生產資料集（預設）
//! - [`FactTables`]：由 S-expression 事實檔載入的資料集

pub mod facts;
pub mod sexpr;
pub mod static_data;

pub use facts::{FactStore, FactTables};
pub use sexpr::{parse_document, ParseError, Sexpr};
pub use static_data::StaticTables;
