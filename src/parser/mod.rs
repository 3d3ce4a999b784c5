//! Parser Module
//!
//! calamineを使用したワークブック解析。
//! シート一覧はファイル内の順序で保持し、行データはシートごとに要求時に変換します。

mod workbook;

pub(crate) use workbook::{SheetSource, WorkbookReader};
