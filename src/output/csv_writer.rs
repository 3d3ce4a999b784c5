//! CSV形式のフォーマッター

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::SheetError;
use crate::formatter::CellFormatter;
use crate::types::Row;

/// UTF-8のバイトオーダーマーク
///
/// 表計算ソフトがUTF-8として認識し、非ASCII文字が文字化けしないように先頭へ付与します。
pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV形式のフォーマッター
///
/// 区切り文字・引用符・改行を含む値のみダブルクォートで囲み、
/// 内部のダブルクォートは2つにエスケープします。
#[derive(Debug, Clone, Copy)]
pub(crate) struct CsvFormatter {
    delimiter: u8,
}

impl CsvFormatter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// 行データをBOM付きCSVのバイト列に変換する
    ///
    /// 最初に`Err`となった行で処理を打ち切り、そのエラーを返します。
    pub fn render<I>(&self, rows: I, formatter: &CellFormatter) -> Result<Vec<u8>, SheetError>
    where
        I: IntoIterator<Item = Result<Row, SheetError>>,
    {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(UTF8_BOM.to_vec());

        for (row_idx, row) in rows.into_iter().enumerate() {
            let row = row?;
            let record = row
                .iter()
                .enumerate()
                .map(|(col_idx, cell)| {
                    // 位置は出力CSV上の行・列（1始まり）
                    formatter
                        .format_cell(cell)
                        .map_err(|message| SheetError::Cell {
                            row: row_idx + 1,
                            col: col_idx + 1,
                            message,
                        })
                })
                .collect::<Result<Vec<String>, SheetError>>()?;
            writer.write_record(&record)?;
        }

        writer
            .into_inner()
            .map_err(|e| SheetError::Write(csv::Error::from(e.into_error())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DateFormat;
    use crate::types::CellValue;

    fn render(rows: Vec<Row>, delimiter: u8) -> String {
        let formatter = CellFormatter::new(DateFormat::Iso8601);
        let bytes = CsvFormatter::new(delimiter)
            .render(rows.into_iter().map(Ok), &formatter)
            .unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_quotes_only_when_needed() {
        let csv = render(
            vec![vec![text("plain"), text("a,b"), text("say \"hi\""), text("two\nlines")]],
            b',',
        );
        assert_eq!(csv, "plain,\"a,b\",\"say \"\"hi\"\"\",\"two\nlines\"\n");
    }

    #[test]
    fn test_custom_delimiter() {
        let csv = render(vec![vec![text("a;b"), text("c,d")]], b';');
        assert_eq!(csv, "\"a;b\";c,d\n");
    }

    #[test]
    fn test_empty_cells_are_blank_fields() {
        let csv = render(
            vec![vec![CellValue::Empty, CellValue::Number(1.0), CellValue::Empty]],
            b',',
        );
        assert_eq!(csv, ",1,\n");
        assert!(!csv.contains("null"));
        assert!(!csv.contains("None"));
    }

    #[test]
    fn test_non_ascii_is_utf8() {
        let csv = render(vec![vec![text("매출"), text("売上")]], b',');
        assert_eq!(csv, "매출,売上\n");
    }

    #[test]
    fn test_ragged_rows_are_accepted() {
        let csv = render(vec![vec![text("a"), text("b")], vec![text("c")]], b',');
        assert_eq!(csv, "a,b\nc\n");
    }

    #[test]
    fn test_unrenderable_date_reports_cell_position() {
        let formatter = CellFormatter::new(DateFormat::Custom("%d.%m.%Y %Z".to_string()));
        let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let rows: Vec<Result<Row, SheetError>> = vec![
            Ok(vec![text("header"), text("when")]),
            Ok(vec![text("leap day"), CellValue::DateTime(date)]),
        ];

        match CsvFormatter::new(b',').render(rows, &formatter) {
            Err(SheetError::Cell { row, col, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(col, 2);
            }
            other => panic!("expected cell error, got {:?}", other.map(|b| b.len())),
        }
    }
}
