//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use chrono::NaiveDateTime;

/// セルの値を表す列挙型
///
/// 数式・書式は扱わず、値のみを保持します。
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    /// 数値（整数セルもf64として保持）
    Number(f64),

    /// 文字列
    Text(String),

    /// 日付・時刻
    DateTime(NaiveDateTime),

    /// 論理値
    Bool(bool),

    /// 空セル
    Empty,
}

/// 1行分のセル値（列順）
pub(crate) type Row = Vec<CellValue>;

/// シート1枚分の変換結果
///
/// 成功時はCSVのバイト列、失敗時はエラーメッセージのどちらか一方のみを持ちます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// BOM付きUTF-8のCSVペイロード
    Converted(Vec<u8>),

    /// シートの変換を中断させたエラーのメッセージ
    Failed(String),
}

impl ConversionOutcome {
    /// 変換に失敗したかどうか
    pub fn is_failed(&self) -> bool {
        matches!(self, ConversionOutcome::Failed(_))
    }
}

/// アーカイブ内の1エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArchiveEntry {
    /// エントリ名（アーカイブ内で一意）
    pub name: String,

    /// ペイロード
    pub payload: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: String, payload: Vec<u8>) -> Self {
        Self { name, payload }
    }
}

/// 変換済みアーカイブ
///
/// `Converter::convert()`の成功時の戻り値です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedArchive {
    /// ZIPアーカイブのバイト列
    pub bytes: Vec<u8>,

    /// 推奨ダウンロードファイル名（`<stem>_sheets.zip`）
    pub filename: String,

    /// コンテンツタイプ（常に`application/zip`）
    pub content_type: &'static str,
}

/// ZIPアーカイブのコンテンツタイプ
pub const ZIP_CONTENT_TYPE: &str = "application/zip";
