//! Naming Module
//!
//! シート名・ファイル名をアーカイブ内で安全に使える名前へ正規化し、
//! 同名シートに連番を付与するモジュール。

use std::collections::{HashMap, HashSet};

/// 正規化結果が空になった場合のシート名
pub(crate) const DEFAULT_SHEET_NAME: &str = "sheet";

/// 空白として扱う文字かどうか
///
/// Unicodeの`White_Space`に加え、情報分離文字（U+001C〜U+001F）も空白とみなします。
fn is_space(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{1C}'..='\u{1F}')
}

/// 許可される文字かどうか
///
/// 英数字（Unicodeの`Alphabetic`・`Numeric`）、アンダースコア、ハイフン、
/// ハングル字母・音節を許可します。
fn is_allowed(c: char) -> bool {
    c.is_alphanumeric()
        || c == '_'
        || c == '-'
        || matches!(c, '\u{1100}'..='\u{11FF}' | '\u{3131}'..='\u{318E}' | '\u{AC00}'..='\u{D7A3}')
}

/// 名前を正規化する（空の場合は`fallback`を返す）
///
/// 1. 許可されない文字を`_`に置換
/// 2. 連続する空白を半角スペース1つにまとめる
/// 3. 前後の空白を除去
pub(crate) fn sanitize_with_fallback(name: &str, fallback: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut pending_space = false;

    for c in name.chars() {
        if is_space(c) {
            pending_space = true;
            continue;
        }
        if pending_space {
            if !result.is_empty() {
                result.push(' ');
            }
            pending_space = false;
        }
        result.push(if is_allowed(c) { c } else { '_' });
    }

    if result.is_empty() {
        fallback.to_string()
    } else {
        result
    }
}

/// シート名をアーカイブ内で安全な名前に正規化する
///
/// 結果が空になる場合は`"sheet"`を返します。この関数は冪等です。
///
/// 文字の分類:
///
/// - 残す文字: Unicodeの`Alphabetic`または`Numeric`に属する文字、`_`、`-`、
///   ハングル字母（U+1100〜U+11FF, U+3131〜U+318E）、ハングル音節（U+AC00〜U+D7A3）。
///   `Alphabetic`に含まれる結合文字（デーヴァナーガリーの母音記号など）も残ります
/// - 空白とみなす文字: Unicodeの`White_Space`と情報分離文字（U+001C〜U+001F）
/// - それ以外（`Alphabetic`でない結合文字を含む）は`_`に置換
///
/// # 使用例
///
/// ```rust
/// use sheetzip::sanitize_name;
///
/// assert_eq!(sanitize_name("売上/2024"), "売上_2024");
/// assert_eq!(sanitize_name("  Q1\t\tdata "), "Q1 data");
/// assert_eq!(sanitize_name("???"), "___");
/// assert_eq!(sanitize_name("   "), "sheet");
/// ```
pub fn sanitize_name(name: &str) -> String {
    sanitize_with_fallback(name, DEFAULT_SHEET_NAME)
}

/// 正規化済みの名前に連番を割り当てるレジストリ
///
/// 1回目は名前そのもの、2回目は`_2`、3回目は`_3`…を付与します。
/// 変換リクエストごとに新しく生成し、リクエスト間で共有してはいけません。
///
/// 発行済みの名前と衝突する候補（例: シート名が元から`Q1_2`の場合）は
/// 空きが見つかるまで番号を進めるため、発行される名前は常に一意です。
#[derive(Debug, Default)]
pub struct NameRegistry {
    /// 正規化名 -> これまでに追加で割り当てた回数
    counts: HashMap<String, usize>,

    /// 発行済みの名前
    issued: HashSet<String>,
}

impl NameRegistry {
    /// 空のレジストリを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 名前の使用を登録し、一意なベース名を返す
    pub fn register(&mut self, safe_name: &str) -> String {
        let first_use = !self.counts.contains_key(safe_name);
        let candidate = if first_use && !self.issued.contains(safe_name) {
            self.counts.insert(safe_name.to_string(), 0);
            safe_name.to_string()
        } else {
            self.next_suffixed(safe_name)
        };

        self.issued.insert(candidate.clone());
        candidate
    }

    /// 未発行の`<name>_<n>`が見つかるまでカウンタを進める
    fn next_suffixed(&mut self, safe_name: &str) -> String {
        let count = self.counts.entry(safe_name.to_string()).or_insert(0);
        loop {
            *count += 1;
            let candidate = format!("{}_{}", safe_name, *count + 1);
            if !self.issued.contains(&candidate) {
                return candidate;
            }
        }
    }
}
