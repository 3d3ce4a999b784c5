//! Validation Module
//!
//! アップロードされたファイルの入力検証を行うモジュール。
//! ファイル名・拡張子・サイズを順に検査し、最初に違反した項目でエラーを返します。

use crate::builder::ConversionConfig;
use crate::error::ConversionError;

/// アップロードパスからファイル名部分を取り出す
///
/// ブラウザによってはクライアント側のフルパス（`C:\Users\...\book.xlsx`）を
/// 送ってくるため、`/`と`\`の両方を区切りとして扱います。
pub(crate) fn basename(filename: &str) -> &str {
    filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
}

/// ファイル名を語幹と拡張子（先頭の`.`を含む）に分割する
///
/// ファイル名先頭のドットは拡張子の区切りとみなしません（`.xlsx` → 語幹`.xlsx`、拡張子なし）。
///
/// # 戻り値
///
/// `(語幹, 拡張子)`。拡張子がない場合は空文字列
pub(crate) fn split_extension(filename: &str) -> (&str, &str) {
    let name = basename(filename);
    let leading_dots = name.len() - name.trim_start_matches('.').len();

    match name.rfind('.') {
        Some(pos) if pos >= leading_dots => (&name[..pos], &name[pos..]),
        _ => (name, ""),
    }
}

/// アップロード入力を検証する
///
/// # 検査順序
///
/// 1. ファイル名が空でないこと → `EmptyFilename`
/// 2. 拡張子（大文字小文字を区別しない）が受け入れ対象であること → `UnsupportedExtension`
/// 3. サイズが上限以下であること → `OversizedPayload`
///
/// 副作用はありません。
pub(crate) fn validate_upload(
    bytes: &[u8],
    filename: &str,
    config: &ConversionConfig,
) -> Result<(), ConversionError> {
    if filename.is_empty() {
        return Err(ConversionError::EmptyFilename);
    }

    let (_, extension) = split_extension(filename);
    let extension = extension.to_lowercase();
    if !config.accepted_extensions.contains(&extension) {
        return Err(ConversionError::UnsupportedExtension {
            extension,
            accepted: config.accepted_extensions.clone(),
        });
    }

    let size = bytes.len() as u64;
    if size > config.max_payload_size {
        return Err(ConversionError::OversizedPayload {
            size,
            max: config.max_payload_size,
        });
    }

    Ok(())
}
