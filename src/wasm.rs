//! WASM bindings
//!
//! ブラウザのアップロード画面から直接変換を呼び出すためのバインディング。

use wasm_bindgen::prelude::*;

use crate::ConverterBuilder;

/// ワークブックをZIPアーカイブに変換する
///
/// # 引数
///
/// * `bytes` - アップロードされたファイルの内容（JavaScriptの`Uint8Array`）
/// * `filename` - ファイル名
/// * `max_payload_size` - 受け入れる最大バイト数
/// * `accepted_extensions` - 受け入れる拡張子（例: `[".xlsx", ".xls"]`）
///
/// # 戻り値
///
/// * 成功: ZIPアーカイブのバイト列
/// * 失敗: `"<status> <message>"`形式のエラー文字列
#[wasm_bindgen]
pub fn convert_workbook(
    bytes: &[u8],
    filename: &str,
    max_payload_size: u32,
    accepted_extensions: Vec<String>,
) -> Result<Vec<u8>, String> {
    let converter = ConverterBuilder::new()
        .with_max_payload_size(u64::from(max_payload_size))
        .with_accepted_extensions(accepted_extensions)
        .build()
        .map_err(|e| format!("{} {}", e.status().code(), e))?;

    converter
        .convert(bytes, filename)
        .map(|archive| archive.bytes)
        .map_err(|e| format!("{} {}", e.status().code(), e))
}

/// 変換結果のダウンロードファイル名を取得する
#[wasm_bindgen]
pub fn suggested_filename(filename: &str) -> String {
    let (stem, _) = crate::validation::split_extension(filename);
    crate::pipeline::suggested_filename(stem)
}
