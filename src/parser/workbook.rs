//! Workbook Reader
//!
//! calamineを使用したワークブック読み込みの実装。
//! シート名はファイル内の順序で取得し、行データはシートごとに要求時に生成します。

use calamine::{
    open_workbook_auto_from_rs, open_workbook_from_rs, Data, Ods, Range, Reader, Sheets, Xls,
    Xlsb, Xlsx,
};
use std::io::Cursor;

use crate::error::{ConversionError, SheetError};
use crate::types::{CellValue, Row};

/// シートの行データを提供するソース
///
/// 変換パイプラインはこのトレイト越しにワークブックを参照します。
pub(crate) trait SheetSource {
    /// 行イテレータの型
    type Rows: Iterator<Item = Result<Row, SheetError>>;

    /// シート名（ファイル内の順序）
    fn sheet_names(&self) -> &[String];

    /// 指定インデックスのシートの行を取得する
    fn sheet_rows(&mut self, index: usize) -> Result<Self::Rows, SheetError>;
}

/// ワークブックリーダー
///
/// calamineのラッパーとして、メモリ上のバイト列からワークブックを開きます。
pub(crate) struct WorkbookReader<'a> {
    /// calamineのワークブック
    workbook: Sheets<Cursor<&'a [u8]>>,
    /// シート名（ファイル内の順序）
    sheet_names: Vec<String>,
}

impl<'a> WorkbookReader<'a> {
    /// ワークブックを開く
    ///
    /// # 引数
    ///
    /// * `bytes` - 検証済みのファイル内容
    /// * `extension` - 小文字化済みの拡張子（`.xlsx`など）。形式の選択に使用します
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookReader)` - 読み込みに成功し、シートが1枚以上ある場合
    /// * `Err(ConversionError::UnparsableWorkbook)` - 形式が不正な場合
    /// * `Err(ConversionError::EmptyWorkbook)` - シートが1枚もない場合
    pub fn open(bytes: &'a [u8], extension: &str) -> Result<Self, ConversionError> {
        let cursor = Cursor::new(bytes);

        let workbook = match extension {
            ".xlsx" | ".xlsm" | ".xlam" => open_workbook_from_rs::<Xlsx<_>, _>(cursor)
                .map(Sheets::Xlsx)
                .map_err(|e| e.to_string()),
            ".xls" | ".xla" => open_workbook_from_rs::<Xls<_>, _>(cursor)
                .map(Sheets::Xls)
                .map_err(|e| e.to_string()),
            ".xlsb" => open_workbook_from_rs::<Xlsb<_>, _>(cursor)
                .map(Sheets::Xlsb)
                .map_err(|e| e.to_string()),
            ".ods" => open_workbook_from_rs::<Ods<_>, _>(cursor)
                .map(Sheets::Ods)
                .map_err(|e| e.to_string()),
            // 既知の拡張子以外は内容から形式を推定する
            _ => open_workbook_auto_from_rs(cursor).map_err(|e| e.to_string()),
        }
        .map_err(ConversionError::UnparsableWorkbook)?;

        let sheet_names = workbook.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Err(ConversionError::EmptyWorkbook);
        }

        Ok(Self {
            workbook,
            sheet_names,
        })
    }
}

impl SheetSource for WorkbookReader<'_> {
    type Rows = RangeRows;

    fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    fn sheet_rows(&mut self, index: usize) -> Result<RangeRows, SheetError> {
        let name = self
            .sheet_names
            .get(index)
            .ok_or_else(|| SheetError::Read(format!("Sheet index {} is out of range", index)))?;

        let range = self.workbook.worksheet_range(name)?;
        Ok(RangeRows::new(range))
    }
}

/// calamineのセル範囲を1行ずつセル値に変換するイテレータ
///
/// 行はインデックスで直接参照するため、1行あたりのコストは列数に比例します。
pub(crate) struct RangeRows {
    range: Range<Data>,
    /// 範囲の左上セルの絶対座標（0始まり）
    origin: (u32, u32),
    /// 範囲の行数・列数
    size: (usize, usize),
    /// 次に返す行（範囲内の相対インデックス）
    next_row: usize,
}

impl RangeRows {
    fn new(range: Range<Data>) -> Self {
        let origin = range.start().unwrap_or((0, 0));
        let size = range.get_size();
        Self {
            range,
            origin,
            size,
            next_row: 0,
        }
    }
}

impl Iterator for RangeRows {
    type Item = Result<Row, SheetError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (height, width) = self.size;
        let row_idx = self.next_row;
        if row_idx >= height {
            return None;
        }
        self.next_row += 1;

        let origin = self.origin;
        let row = (0..width)
            .map(|col_idx| match self.range.get((row_idx, col_idx)) {
                Some(cell) => convert_cell(cell).map_err(|message| SheetError::Cell {
                    row: origin.0 as usize + row_idx + 1,
                    col: origin.1 as usize + col_idx + 1,
                    message,
                }),
                None => Ok(CellValue::Empty),
            })
            .collect();
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size.0.saturating_sub(self.next_row);
        (remaining, Some(remaining))
    }
}

/// calamineのセル値を`CellValue`に変換する
///
/// 表現できない日付シリアル値などは`Err`（メッセージ）を返します。
fn convert_cell(cell: &Data) -> Result<CellValue, String> {
    let value = match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => {
            let duration = dt
                .as_duration()
                .ok_or_else(|| format!("duration value {} is out of range", dt.as_f64()))?;
            CellValue::Text(format_duration(duration.num_seconds()))
        }
        Data::DateTime(dt) => {
            let datetime = dt
                .as_datetime()
                .ok_or_else(|| format!("date value {} is out of range", dt.as_f64()))?;
            CellValue::DateTime(datetime)
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
        #[allow(unreachable_patterns)]
        _ => CellValue::Empty,
    };
    Ok(value)
}

/// 経過時間を`[h]:mm:ss`形式の文字列にする
fn format_duration(total_seconds: i64) -> String {
    let sign = if total_seconds < 0 { "-" } else { "" };
    let secs = total_seconds.unsigned_abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}


// 実ファイルを使った読み込みのテストは統合テスト（tests/）で実装します。
