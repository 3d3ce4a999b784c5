//! sheetzip - Convert an uploaded multi-sheet workbook into a ZIP of per-sheet CSV files
//!
//! アップロードされたワークブック（XLSX / XLS など）を解析し、シートごとのCSVを
//! 1つのZIPアーカイブにまとめて返します。
//!
//! - シート名はアーカイブ内で安全な名前に正規化され、重複には`_2`, `_3`…が付与されます
//! - 1枚のシートが壊れていても他のシートの変換は継続し、失敗したシートは
//!   `ERROR_<name>.txt`としてアーカイブに含まれます
//! - CSVはBOM付きUTF-8で出力されます（表計算ソフトでの文字化け対策）
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sheetzip::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_max_payload_size(12 * 1024 * 1024)
//!         .with_accepted_extensions([".xlsx", ".xls"])
//!         .build()?;
//!
//!     let bytes = std::fs::read("sales.xlsx")?;
//!     let archive = converter.convert(&bytes, "sales.xlsx")?;
//!
//!     // archive.filename == "sales_sheets.zip"
//!     std::fs::write(&archive.filename, &archive.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use sheetzip::{ConverterBuilder, StatusClass};
//!
//! # fn main() -> Result<(), sheetzip::ConversionError> {
//! let converter = ConverterBuilder::new()
//!     .with_max_payload_size(200 * 1024)
//!     .with_accepted_extensions([".xlsx"])
//!     .build()?;
//!
//! if let Err(e) = converter.convert(&[0u8; 300 * 1024], "big.xlsx") {
//!     assert_eq!(e.status(), StatusClass::PayloadTooLarge);
//!     eprintln!("{} {}", e.status().code(), e);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod archive;
mod builder;
mod error;
mod formatter;
mod naming;
mod output;
mod parser;
mod pipeline;
mod types;
mod validation;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod wasm;

// 公開API
pub use api::DateFormat;
pub use builder::{Converter, ConverterBuilder};
pub use error::{ConversionError, ErrorKind, SheetError, StatusClass};
pub use naming::{sanitize_name, NameRegistry};
pub use types::{ConversionOutcome, ConvertedArchive, ZIP_CONTENT_TYPE};
