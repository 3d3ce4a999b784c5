//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! リクエスト単位で致命的な`ConversionError`と、シート単位で回収される`SheetError`の
//! 二層構造になっている。

use thiserror::Error;

/// リクエスト単位のエラー型
///
/// このエラーが返された場合、アーカイブは生成されません。
/// 個々のシートの失敗はこの型では表現せず、`SheetError`としてアーカイブ内の
/// `ERROR_<name>.txt`に記録されます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetzip::{ConverterBuilder, ConversionError};
///
/// # fn main() -> Result<(), ConversionError> {
/// let converter = ConverterBuilder::new()
///     .with_max_payload_size(200 * 1024)
///     .with_accepted_extensions([".xlsx"])
///     .build()?;
///
/// match converter.convert(b"not a workbook", "report.xlsx") {
///     Err(e) => println!("{} {}", e.status().code(), e),
///     Ok(archive) => println!("{}", archive.filename),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum ConversionError {
    /// アップロードされたファイル名が空
    #[error("Filename is empty")]
    EmptyFilename,

    /// 拡張子が受け入れ対象外
    #[error("Unsupported file extension '{extension}' (accepted: {})", .accepted.join(", "))]
    UnsupportedExtension {
        /// 検出された拡張子（拡張子がない場合は空文字列）
        extension: String,
        /// 設定された受け入れ拡張子
        accepted: Vec<String>,
    },

    /// ペイロードが設定された上限を超えている
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    OversizedPayload {
        /// 実際のサイズ
        size: u64,
        /// 設定された上限
        max: u64,
    },

    /// ワークブックとして解析できない
    ///
    /// calamine由来のエラーメッセージを保持します。
    #[error("Failed to open workbook: {0}")]
    UnparsableWorkbook(String),

    /// 解析には成功したがシートが1枚もない
    #[error("Workbook contains no sheets")]
    EmptyWorkbook,

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// ZIPアーカイブの組み立てに失敗した
    #[error("ZIP archive error: {0}")]
    Archive(String),
}

impl From<zip::result::ZipError> for ConversionError {
    fn from(e: zip::result::ZipError) -> Self {
        ConversionError::Archive(e.to_string())
    }
}

impl From<std::io::Error> for ConversionError {
    fn from(e: std::io::Error) -> Self {
        ConversionError::Archive(e.to_string())
    }
}

/// エラー種別（呼び出し側での分岐用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    EmptyFilename,
    UnsupportedExtension,
    OversizedPayload,
    UnparsableWorkbook,
    EmptyWorkbook,
    Config,
    Archive,
}

/// HTTP層に提示するステータス分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 400相当
    BadRequest,
    /// 413相当
    PayloadTooLarge,
    /// 500相当
    Internal,
}

impl StatusClass {
    /// 対応するHTTPステータスコード
    pub fn code(self) -> u16 {
        match self {
            StatusClass::BadRequest => 400,
            StatusClass::PayloadTooLarge => 413,
            StatusClass::Internal => 500,
        }
    }
}

impl ConversionError {
    /// エラー種別を取得
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::EmptyFilename => ErrorKind::EmptyFilename,
            ConversionError::UnsupportedExtension { .. } => ErrorKind::UnsupportedExtension,
            ConversionError::OversizedPayload { .. } => ErrorKind::OversizedPayload,
            ConversionError::UnparsableWorkbook(_) => ErrorKind::UnparsableWorkbook,
            ConversionError::EmptyWorkbook => ErrorKind::EmptyWorkbook,
            ConversionError::Config(_) => ErrorKind::Config,
            ConversionError::Archive(_) => ErrorKind::Archive,
        }
    }

    /// 推奨ステータス分類を取得
    ///
    /// 呼び出し側の入力に起因するエラーは400、サイズ超過は413、
    /// それ以外（設定・アーカイブ組み立て）は500に分類されます。
    pub fn status(&self) -> StatusClass {
        match self.kind() {
            ErrorKind::EmptyFilename
            | ErrorKind::UnsupportedExtension
            | ErrorKind::UnparsableWorkbook
            | ErrorKind::EmptyWorkbook => StatusClass::BadRequest,
            ErrorKind::OversizedPayload => StatusClass::PayloadTooLarge,
            ErrorKind::Config | ErrorKind::Archive => StatusClass::Internal,
        }
    }
}

/// シート単位のエラー型
///
/// 変換中に1枚のシートだけを中断させるエラーです。
/// `SheetConverter`が捕捉し、`ConversionOutcome::Failed`のメッセージに変換します。
#[derive(Error, Debug)]
pub enum SheetError {
    /// ワークブックからシートを読み出せなかった
    #[error("{0}")]
    Read(String),

    /// セル値を文字列化できなかった
    #[error("invalid cell at row {row}, column {col}: {message}")]
    Cell {
        row: usize,
        col: usize,
        message: String,
    },

    /// CSV書き出し中のエラー
    #[error("CSV write error: {0}")]
    Write(#[from] csv::Error),
}

impl From<calamine::Error> for SheetError {
    fn from(e: calamine::Error) -> Self {
        SheetError::Read(e.to_string())
    }
}
