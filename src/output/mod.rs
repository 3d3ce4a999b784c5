//! Output Module
//!
//! シート1枚分の行データをCSVペイロードに変換するモジュール。
//! 行の読み出しや書き出しで発生したエラーはこのシートだけを中断させ、
//! 呼び出し元には`ConversionOutcome::Failed`として返します。

mod csv_writer;

use csv_writer::CsvFormatter;

use crate::error::SheetError;
use crate::formatter::CellFormatter;
use crate::types::{ConversionOutcome, Row};

/// シートコンバーター
///
/// パニックやエラーの伝播を行わず、結果は必ず`ConversionOutcome`で返します。
#[derive(Debug, Clone)]
pub(crate) struct SheetConverter {
    formatter: CellFormatter,
    csv: CsvFormatter,
}

impl SheetConverter {
    pub fn new(formatter: CellFormatter, delimiter: u8) -> Self {
        Self {
            formatter,
            csv: CsvFormatter::new(delimiter),
        }
    }

    /// シートを変換する
    ///
    /// # 引数
    ///
    /// * `sheet_name` - エラーメッセージに含めるシート名（正規化前）
    /// * `rows` - 行データ。取得自体の失敗は`Err`で渡す
    ///
    /// # 戻り値
    ///
    /// * `Converted(bytes)` - BOM付きUTF-8のCSV
    /// * `Failed(message)` - 最初に発生したエラーのメッセージ
    pub fn convert<I>(&self, sheet_name: &str, rows: Result<I, SheetError>) -> ConversionOutcome
    where
        I: IntoIterator<Item = Result<Row, SheetError>>,
    {
        let result = rows.and_then(|rows| self.csv.render(rows, &self.formatter));

        match result {
            Ok(bytes) => ConversionOutcome::Converted(bytes),
            Err(e) => {
                log::warn!("sheet {:?} could not be converted: {}", sheet_name, e);
                ConversionOutcome::Failed(format!("Failed to read sheet \"{}\": {}", sheet_name, e))
            }
        }
    }
}
