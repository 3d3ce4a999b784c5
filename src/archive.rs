//! Archive Module
//!
//! シートごとの変換結果をZIPアーカイブに組み立てるモジュール。

use std::io::{Cursor, Write};

use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::ConversionError;
use crate::naming::{sanitize_name, NameRegistry};
use crate::types::{ArchiveEntry, ConversionOutcome};

/// 変換結果CSVの拡張子
const TABLE_EXTENSION: &str = ".csv";

/// エラーエントリの接頭辞
const ERROR_PREFIX: &str = "ERROR_";

/// エラーエントリの拡張子
const ERROR_EXTENSION: &str = ".txt";

/// アーカイブビルダー
///
/// シートの処理順にエントリを蓄積し、`finish()`で一度だけZIPとして確定します。
/// 変換リクエストごとに生成し、他のリクエストと共有してはいけません。
#[derive(Debug, Default)]
pub(crate) struct ArchiveBuilder {
    /// 追加済みエントリ（シート処理順）
    entries: Vec<ArchiveEntry>,

    /// CSVエントリ名のレジストリ
    table_names: NameRegistry,

    /// エラーエントリ名のレジストリ（CSV側の連番には影響しない）
    error_names: NameRegistry,

    /// 失敗したシートの数
    failed: usize,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// シート1枚分の変換結果を追加する
    ///
    /// # 戻り値
    ///
    /// 追加したエントリ名
    pub fn add_outcome(&mut self, sheet_name: &str, outcome: ConversionOutcome) -> &str {
        let safe_name = sanitize_name(sheet_name);

        let entry = match outcome {
            ConversionOutcome::Converted(bytes) => {
                let base = self.table_names.register(&safe_name);
                ArchiveEntry::new(format!("{}{}", base, TABLE_EXTENSION), bytes)
            }
            ConversionOutcome::Failed(message) => {
                self.failed += 1;
                let base = self.error_names.register(&safe_name);
                ArchiveEntry::new(
                    format!("{}{}{}", ERROR_PREFIX, base, ERROR_EXTENSION),
                    message.into_bytes(),
                )
            }
        };

        log::debug!("archive entry {:?} ({} bytes)", entry.name, entry.payload.len());
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1].name
    }

    /// 追加済みエントリ数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 失敗したシートの数
    pub fn failed_count(&self) -> usize {
        self.failed
    }

    /// ZIPアーカイブとして確定する
    ///
    /// すべてのエントリをDeflate圧縮で書き込みます。
    pub fn finish(self) -> Result<Vec<u8>, ConversionError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.payload)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}
