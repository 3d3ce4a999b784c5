//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::DateFormat;
use crate::error::ConversionError;
use crate::formatter::{CellFormatter, DateFormatter};
use crate::output::SheetConverter;
use crate::types::ConvertedArchive;

/// 変換処理の設定を保持する内部構造体
///
/// `build()`で検証済みの値のみが格納されます。
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// 受け入れる最大バイト数
    pub max_payload_size: u64,

    /// 受け入れる拡張子（小文字、先頭の`.`を含む）
    pub accepted_extensions: Vec<String>,

    /// 日付形式
    pub date_format: DateFormat,

    /// CSVの区切り文字
    pub delimiter: u8,

    /// シートを並列に変換するか
    pub parallel: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_payload_size: 0,
            accepted_extensions: Vec::new(),
            date_format: DateFormat::Iso8601,
            delimiter: b',',
            parallel: false,
        }
    }
}

/// JSONから読み込む設定値
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConverterSettings {
    max_payload_size: Option<u64>,
    accepted_extensions: Option<Vec<String>>,
    date_format: Option<String>,
    delimiter: Option<char>,
    parallel: Option<bool>,
}

/// Fluent Builder APIを提供する構造体
///
/// 最大サイズと受け入れ拡張子には製品ごとに異なる値が使われているため、
/// デフォルト値を持たず、明示的な指定を必須としています。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetzip::ConverterBuilder;
///
/// # fn main() -> Result<(), sheetzip::ConversionError> {
/// let converter = ConverterBuilder::new()
///     .with_max_payload_size(200 * 1024)
///     .with_accepted_extensions([".xlsx", ".xls"])
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,

    /// 最大サイズ（未指定の場合は`build()`が失敗する）
    max_payload_size: Option<u64>,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// ビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 日付形式: ISO 8601
    /// - 区切り文字: `,`
    /// - 並列変換: 無効
    ///
    /// 最大サイズと受け入れ拡張子は未設定です。
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
            max_payload_size: None,
        }
    }

    /// JSON形式の設定からビルダーを生成する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use sheetzip::ConverterBuilder;
    ///
    /// # fn main() -> Result<(), sheetzip::ConversionError> {
    /// let converter = ConverterBuilder::from_json(
    ///     r#"{"max_payload_size": 12582912, "accepted_extensions": [".xlsx", ".xls"]}"#,
    /// )?
    /// .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        let settings: ConverterSettings = serde_json::from_str(json)
            .map_err(|e| ConversionError::Config(format!("Invalid settings: {}", e)))?;

        let mut builder = Self::new();
        if let Some(max) = settings.max_payload_size {
            builder = builder.with_max_payload_size(max);
        }
        if let Some(extensions) = settings.accepted_extensions {
            builder = builder.with_accepted_extensions(extensions);
        }
        if let Some(format) = settings.date_format {
            builder = builder.with_date_format(DateFormat::from_setting(&format));
        }
        if let Some(delimiter) = settings.delimiter {
            if !delimiter.is_ascii() {
                return Err(ConversionError::Config(format!(
                    "Delimiter must be an ASCII character: {:?}",
                    delimiter
                )));
            }
            builder = builder.with_delimiter(delimiter as u8);
        }
        if let Some(parallel) = settings.parallel {
            builder = builder.with_parallel(parallel);
        }
        Ok(builder)
    }

    /// 受け入れる最大バイト数を指定する（この値ちょうどは受け入れる）
    pub fn with_max_payload_size(mut self, max: u64) -> Self {
        self.max_payload_size = Some(max);
        self
    }

    /// 受け入れる拡張子を指定する
    ///
    /// 先頭の`.`を含めて指定します（例: `".xlsx"`）。大文字小文字は区別しません。
    pub fn with_accepted_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.accepted_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// 日付の出力形式を指定する
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// CSVの区切り文字を指定する
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// シートを並列に変換するかを指定する
    ///
    /// 有効にしても、エントリ名の割り当てとアーカイブへの追加はシート順に行われます。
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// 設定を検証して`Converter`を構築する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)` - 設定が有効な場合
    /// * `Err(ConversionError::Config)` - 設定が無効な場合
    pub fn build(mut self) -> Result<Converter, ConversionError> {
        // 1. 最大サイズ
        let max = self.max_payload_size.ok_or_else(|| {
            ConversionError::Config("Maximum payload size must be configured".to_string())
        })?;
        if max == 0 {
            return Err(ConversionError::Config(
                "Maximum payload size must be greater than zero".to_string(),
            ));
        }
        self.config.max_payload_size = max;

        // 2. 拡張子
        if self.config.accepted_extensions.is_empty() {
            return Err(ConversionError::Config(
                "At least one accepted extension must be configured".to_string(),
            ));
        }
        let mut extensions = Vec::with_capacity(self.config.accepted_extensions.len());
        for ext in &self.config.accepted_extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(ConversionError::Config(format!(
                    "Invalid extension '{}': must start with '.'",
                    ext
                )));
            }
            let ext = ext.to_lowercase();
            if !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        self.config.accepted_extensions = extensions;

        // 3. 区切り文字
        let delimiter = self.config.delimiter;
        if !delimiter.is_ascii() || matches!(delimiter, b'"' | b'\r' | b'\n') {
            return Err(ConversionError::Config(format!(
                "Invalid delimiter: {:?}",
                delimiter as char
            )));
        }

        // 4. カスタム日付形式
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            // 構文上は有効でも日時値に適用できない形式（`%z`など）はここで拒否する
            let sample = NaiveDate::from_ymd_opt(2000, 12, 31).and_then(|d| d.and_hms_opt(23, 59, 59));
            let renders = sample.map_or(false, |dt| {
                DateFormatter::new(self.config.date_format.clone())
                    .format(&dt)
                    .map_or(false, |rendered| !rendered.is_empty())
            });
            let invalid = format_str.is_empty()
                || StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
                || !renders;
            if invalid {
                return Err(ConversionError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// アップロードされたワークブックを、シートごとのCSVを含むZIPアーカイブに変換します。
/// 内部に可変状態を持たないため、複数スレッドから同時に呼び出せます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetzip::ConverterBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let converter = ConverterBuilder::new()
///     .with_max_payload_size(12 * 1024 * 1024)
///     .with_accepted_extensions([".xlsx"])
///     .build()?;
///
/// let bytes = std::fs::read("report.xlsx")?;
/// let archive = converter.convert(&bytes, "report.xlsx")?;
/// std::fs::write(&archive.filename, &archive.bytes)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// シートコンバーター
    sheet_converter: SheetConverter,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        let formatter = CellFormatter::new(config.date_format.clone());
        Self {
            sheet_converter: SheetConverter::new(formatter, config.delimiter),
            config,
        }
    }

    /// アップロードされたワークブックを変換する
    ///
    /// # 引数
    ///
    /// * `bytes` - アップロードされたファイルの内容
    /// * `filename` - 宣言されたファイル名（拡張子の判定とダウンロード名の生成に使用）
    ///
    /// # 戻り値
    ///
    /// * `Ok(ConvertedArchive)` - アーカイブとダウンロードファイル名。
    ///   一部（または全部）のシートの変換に失敗した場合も成功として返し、
    ///   失敗したシートは`ERROR_<name>.txt`として含まれます
    /// * `Err(ConversionError)` - 入力検証またはワークブックの解析に失敗した場合
    ///
    /// # 処理フロー
    ///
    /// 1. ファイル名・拡張子・サイズの検証
    /// 2. ワークブックの解析
    /// 3. 各シートの変換（失敗はシート単位で記録）
    /// 4. エントリ名の割り当てとアーカイブの確定
    pub fn convert(&self, bytes: &[u8], filename: &str) -> Result<ConvertedArchive, ConversionError> {
        crate::pipeline::run(bytes, filename, &self.config, &self.sheet_converter)
    }

    /// 受け入れる最大バイト数
    pub fn max_payload_size(&self) -> u64 {
        self.config.max_payload_size
    }

    /// 受け入れる拡張子（小文字、先頭の`.`を含む）
    pub fn accepted_extensions(&self) -> &[String] {
        &self.config.accepted_extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_builder() -> ConverterBuilder {
        ConverterBuilder::new()
            .with_max_payload_size(1024)
            .with_accepted_extensions([".xlsx"])
    }

    fn config_error(result: Result<Converter, ConversionError>) -> String {
        match result {
            Err(ConversionError::Config(msg)) => msg,
            Err(e) => panic!("Expected Config error, got {:?}", e),
            Ok(_) => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_converter_builder_new() {
        let builder = ConverterBuilder::new();
        assert!(builder.max_payload_size.is_none());
        assert!(builder.config.accepted_extensions.is_empty());
        assert_eq!(builder.config.date_format, DateFormat::Iso8601);
        assert_eq!(builder.config.delimiter, b',');
        assert!(!builder.config.parallel);
    }

    #[test]
    fn test_build_success() {
        let converter = valid_builder().build().unwrap();
        assert_eq!(converter.max_payload_size(), 1024);
        assert_eq!(converter.accepted_extensions(), &[".xlsx".to_string()]);
    }

    #[test]
    fn test_build_requires_max_size() {
        let msg = config_error(
            ConverterBuilder::new()
                .with_accepted_extensions([".xlsx"])
                .build(),
        );
        assert!(msg.contains("Maximum payload size"));
    }

    #[test]
    fn test_build_rejects_zero_max_size() {
        let msg = config_error(valid_builder().with_max_payload_size(0).build());
        assert!(msg.contains("greater than zero"));
    }

    #[test]
    fn test_build_requires_extensions() {
        let msg = config_error(ConverterBuilder::new().with_max_payload_size(10).build());
        assert!(msg.contains("extension"));
    }

    #[test]
    fn test_build_rejects_extension_without_dot() {
        let msg = config_error(valid_builder().with_accepted_extensions(["xlsx"]).build());
        assert!(msg.contains("'xlsx'"));

        let msg = config_error(valid_builder().with_accepted_extensions(["."]).build());
        assert!(msg.contains("'.'"));
    }

    #[test]
    fn test_build_normalizes_extensions() {
        let converter = valid_builder()
            .with_accepted_extensions([".XLSX", ".xlsx", ".Xls"])
            .build()
            .unwrap();
        assert_eq!(
            converter.accepted_extensions(),
            &[".xlsx".to_string(), ".xls".to_string()]
        );
    }

    #[test]
    fn test_build_rejects_quote_delimiter() {
        let msg = config_error(valid_builder().with_delimiter(b'"').build());
        assert!(msg.contains("delimiter"));
    }

    #[test]
    fn test_build_with_valid_custom_date_format() {
        let result = valid_builder()
            .with_date_format(DateFormat::Custom("%Y-%m-%d".to_string()))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_with_invalid_custom_date_format() {
        let msg = config_error(
            valid_builder()
                .with_date_format(DateFormat::Custom(String::new()))
                .build(),
        );
        assert!(msg.contains("Invalid date format"));

        let msg = config_error(
            valid_builder()
                .with_date_format(DateFormat::Custom("%Q".to_string()))
                .build(),
        );
        assert!(msg.contains("%Q"));
    }

    #[test]
    fn test_build_rejects_timezone_date_format() {
        for format in ["%Y %z", "%Y-%m-%d %Z", "%H:%M%:z"] {
            let msg = config_error(
                valid_builder()
                    .with_date_format(DateFormat::Custom(format.to_string()))
                    .build(),
            );
            assert!(msg.contains(format), "format {:?}", format);
        }
    }

    #[test]
    fn test_from_json() {
        let builder = ConverterBuilder::from_json(
            r#"{
                "max_payload_size": 204800,
                "accepted_extensions": [".xlsx", ".xls"],
                "date_format": "%Y/%m/%d",
                "delimiter": ";",
                "parallel": true
            }"#,
        )
        .unwrap();
        assert_eq!(builder.max_payload_size, Some(204_800));
        assert_eq!(builder.config.accepted_extensions, vec![".xlsx", ".xls"]);
        assert_eq!(
            builder.config.date_format,
            DateFormat::Custom("%Y/%m/%d".to_string())
        );
        assert_eq!(builder.config.delimiter, b';');
        assert!(builder.config.parallel);
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let result = ConverterBuilder::from_json(r#"{"max_size": 10}"#);
        assert!(matches!(result, Err(ConversionError::Config(_))));
    }

    #[test]
    fn test_from_json_rejects_non_ascii_delimiter() {
        let result = ConverterBuilder::from_json(r#"{"delimiter": "、"}"#);
        assert!(matches!(result, Err(ConversionError::Config(_))));
    }

    #[test]
    fn test_from_json_partial_still_validated_on_build() {
        let builder = ConverterBuilder::from_json(r#"{"accepted_extensions": [".xlsx"]}"#).unwrap();
        assert!(matches!(builder.build(), Err(ConversionError::Config(_))));
    }

    #[test]
    fn test_converter_convert_with_invalid_input() {
        let converter = valid_builder().build().unwrap();
        let result = converter.convert(b"", "book.xlsx");
        assert!(matches!(
            result,
            Err(ConversionError::UnparsableWorkbook(_))
        ));
    }
}
