//! Formatter Module
//!
//! セル値を型に応じた文字列へ変換するモジュール。
//! ロケール依存の桁区切りは一切使用しません。

use chrono::{NaiveDateTime, Timelike};
use std::fmt::{self, Write};

use crate::api::DateFormat;
use crate::types::CellValue;

/// 小数部を持たない形で出力する数値の上限（絶対値）
const MAX_INTEGRAL_RENDER: f64 = 1e15;

/// セルフォーマッター
///
/// セル値のフォーマット処理のファサードとして機能します。
#[derive(Debug, Clone)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new(date_format: DateFormat) -> Self {
        Self {
            date_formatter: DateFormatter::new(date_format),
        }
    }

    /// セル値をフォーマット
    ///
    /// 空セルは常に空文字列になります（`null`や`None`といった文字列は出力しません）。
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - フォーマット済みの文字列
    /// * `Err(message)` - 日付形式を適用できなかった場合
    pub fn format_cell(&self, value: &CellValue) -> Result<String, String> {
        let text = match value {
            CellValue::Number(n) => NumberFormatter::format(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::DateTime(dt) => self
                .date_formatter
                .format(dt)
                .map_err(|_| format!("date format cannot be applied to {}", dt))?,
            CellValue::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            CellValue::Empty => String::new(),
        };
        Ok(text)
    }
}

/// 日付フォーマッター
#[derive(Debug, Clone)]
pub(crate) struct DateFormatter {
    format: DateFormat,
}

impl DateFormatter {
    pub fn new(format: DateFormat) -> Self {
        Self { format }
    }

    /// 日時値をフォーマット
    ///
    /// タイムゾーン指定（`%z`など）のように日時値へ適用できない形式は`fmt::Error`になります。
    pub fn format(&self, value: &NaiveDateTime) -> Result<String, fmt::Error> {
        let pattern = match &self.format {
            DateFormat::Iso8601 => {
                if value.num_seconds_from_midnight() == 0 && value.nanosecond() == 0 {
                    "%Y-%m-%d"
                } else {
                    "%Y-%m-%d %H:%M:%S"
                }
            }
            DateFormat::Custom(format_str) => format_str.as_str(),
        };

        let mut out = String::new();
        write!(out, "{}", value.format(pattern))?;
        Ok(out)
    }
}

/// 数値フォーマッター
#[derive(Debug, Clone, Copy)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    /// 数値をフォーマット
    ///
    /// 整数値は小数部なし（`3.0` → `3`）、それ以外はRust標準の最短表現で出力します。
    pub fn format(value: f64) -> String {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_INTEGRAL_RENDER {
            // -0.0も"0"として出力する
            format!("{}", value as i64)
        } else {
            value.to_string()
        }
    }
}
