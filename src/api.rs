//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 日付の出力形式
///
/// 日付・時刻セルをCSVに書き出す際の形式を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DateFormat {
    /// ISO 8601形式
    ///
    /// 時刻部分が0時0分0秒の場合は`2025-11-20`、
    /// それ以外は`2025-11-20 13:45:00`のように出力します。
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// # フォーマット指定子（主要なもの）
    ///
    /// - `%Y`: 4桁の年（例: 2025）
    /// - `%m`: 2桁の月（01-12）
    /// - `%d`: 2桁の日（01-31）
    /// - `%H`: 24時間形式の時（00-23）
    /// - `%M`: 分（00-59）
    /// - `%S`: 秒（00-59）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use sheetzip::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), sheetzip::ConversionError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_max_payload_size(12 * 1024 * 1024)
    ///     .with_accepted_extensions([".xlsx"])
    ///     .with_date_format(DateFormat::Custom("%Y/%m/%d".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

impl DateFormat {
    /// 設定文字列から日付形式を生成
    ///
    /// `"iso8601"`（大文字小文字を区別しない）は`Iso8601`、それ以外は`Custom`になります。
    pub fn from_setting(value: &str) -> Self {
        if value.eq_ignore_ascii_case("iso8601") {
            DateFormat::Iso8601
        } else {
            DateFormat::Custom(value.to_string())
        }
    }
}
