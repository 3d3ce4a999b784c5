//! Pipeline Module
//!
//! 変換リクエスト1件分の処理を駆動する。
//!
//! 受信 → 検証 → 解析 → シートごとの変換 → 組み立て の順に進み、
//! 検証失敗と解析失敗のみがリクエスト全体を終了させます。
//! シート単位の失敗は変換ループ内で吸収され、アーカイブは必ず組み立てられます。

use rayon::prelude::*;

use crate::archive::ArchiveBuilder;
use crate::builder::ConversionConfig;
use crate::error::{ConversionError, SheetError};
use crate::naming::sanitize_with_fallback;
use crate::output::SheetConverter;
use crate::parser::{SheetSource, WorkbookReader};
use crate::types::{ConversionOutcome, ConvertedArchive, ZIP_CONTENT_TYPE};
use crate::validation::{split_extension, validate_upload};

/// アップロードファイル名の語幹が空になった場合の名前
const DEFAULT_ARCHIVE_STEM: &str = "excel";

/// 変換リクエストを1件処理する
///
/// レジストリとアーカイブビルダーはこの呼び出しの中で生成・破棄されます。
pub(crate) fn run(
    bytes: &[u8],
    filename: &str,
    config: &ConversionConfig,
    converter: &SheetConverter,
) -> Result<ConvertedArchive, ConversionError> {
    log::debug!("received {:?} ({} bytes)", filename, bytes.len());

    if let Err(e) = validate_upload(bytes, filename, config) {
        log::warn!("rejected {:?}: {}", filename, e);
        return Err(e);
    }
    log::debug!("validated {:?}", filename);

    let (stem, extension) = split_extension(filename);
    let extension = extension.to_lowercase();

    let mut reader = match WorkbookReader::open(bytes, &extension) {
        Ok(reader) => reader,
        Err(e) => {
            log::warn!("unreadable workbook {:?}: {}", filename, e);
            return Err(e);
        }
    };
    let sheet_names = reader.sheet_names().to_vec();
    log::debug!("parsed {:?}: {} sheet(s)", filename, sheet_names.len());

    let outcomes = if config.parallel {
        convert_parallel(
            &sheet_names,
            || {
                WorkbookReader::open(bytes, &extension).map_err(|e| SheetError::Read(e.to_string()))
            },
            converter,
        )
    } else {
        convert_sequential(&mut reader, converter)
    };

    let archive = assemble(&sheet_names, outcomes)?;

    Ok(ConvertedArchive {
        bytes: archive,
        filename: suggested_filename(stem),
        content_type: ZIP_CONTENT_TYPE,
    })
}

/// ダウンロードファイル名を生成する（`<正規化した語幹>_sheets.zip`）
pub(crate) fn suggested_filename(stem: &str) -> String {
    format!(
        "{}_sheets.zip",
        sanitize_with_fallback(stem, DEFAULT_ARCHIVE_STEM)
    )
}

/// シートを順番に変換する
pub(crate) fn convert_sequential<S: SheetSource>(
    source: &mut S,
    converter: &SheetConverter,
) -> Vec<ConversionOutcome> {
    let count = source.sheet_names().len();
    let mut outcomes = Vec::with_capacity(count);

    for index in 0..count {
        log::debug!("converting sheet {}/{}", index + 1, count);
        let rows = source.sheet_rows(index);
        let name = &source.sheet_names()[index];
        outcomes.push(converter.convert(name, rows));
    }

    outcomes
}

/// シートを並列に変換する
///
/// 各ワーカーは`open`でワークブックを開き直します。
/// 結果はシート順に並んだ状態で返されるため、名前の登録は呼び出し側で順番に行えます。
pub(crate) fn convert_parallel<S, F>(
    sheet_names: &[String],
    open: F,
    converter: &SheetConverter,
) -> Vec<ConversionOutcome>
where
    S: SheetSource,
    F: Fn() -> Result<S, SheetError> + Sync,
{
    sheet_names
        .par_iter()
        .enumerate()
        .map(|(index, name)| {
            log::debug!("converting sheet {}/{} (parallel)", index + 1, sheet_names.len());
            let rows = open().and_then(|mut source| source.sheet_rows(index));
            converter.convert(name, rows)
        })
        .collect()
}

/// 変換結果をシート順にアーカイブへ追加し、確定する
pub(crate) fn assemble(
    sheet_names: &[String],
    outcomes: Vec<ConversionOutcome>,
) -> Result<Vec<u8>, ConversionError> {
    let mut builder = ArchiveBuilder::new();
    for (name, outcome) in sheet_names.iter().zip(outcomes) {
        builder.add_outcome(name, outcome);
    }

    let entries = builder.len();
    let failed = builder.failed_count();
    let bytes = builder.finish()?;
    log::info!(
        "assembled archive: {} entries, {} failed sheet(s), {} bytes",
        entries,
        failed,
        bytes.len()
    );
    Ok(bytes)
}
