//! 成分テキスト正規化モジュール
//!
//! スクレイピングした生テキストを、重複のない成分トークン列に変換する。
//!
//! ## 処理フロー
//! 1. camelCase連結の分割
//! 2. 括弧内の注記を除去
//! 3. パーセント表記を除去
//! 4. 空白の正規化
//! 5. 見出しラベル（"Ingredients:" 等）を区切りに置換
//! 6. 記号の除去（カンマ・ピリオド・ハイフンは残す）
//! 7. "may contain" 以降を切り捨て
//! 8. カンマ・ピリオドで分割し、小文字化・重複除去

use regex::Regex;
use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref CAMEL_CASE_RE: Regex = Regex::new(r"([a-z])([A-Z])").unwrap();
    static ref PARENTHETICAL_RE: Regex = Regex::new(r"\([^)]*\)").unwrap();
    static ref PERCENTAGE_RE: Regex = Regex::new(r"\d+%").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref SECTION_HEADER_RE: Regex = Regex::new(
        r"(?i)\b(?:full ingredients list|ingredients list|key ingredients|active ingredients|ingredients|composition|what[’']?s in it|contains|made with|formulated with)\s*:"
    ).unwrap();
    static ref SPECIAL_CHARS_RE: Regex = Regex::new(r"[^\w\s,.-]").unwrap();
    static ref MAY_CONTAIN_RE: Regex = Regex::new(r"(?i)may contain.*$").unwrap();
    static ref SEGMENT_SPLIT_RE: Regex = Regex::new(r"[,.]").unwrap();
}

/// 正規化ルール（名前付きの純関数）
#[derive(Clone, Copy)]
pub struct NormalizationRule {
    /// ルール名（ログ・テスト用）
    pub name: &'static str,
    /// 適用関数
    pub apply: fn(&str) -> String,
}

impl std::fmt::Debug for NormalizationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizationRule")
            .field("name", &self.name)
            .finish()
    }
}

/// 適用順に並べたクリーニングルール
///
/// 後段のルールは前段の結果を前提にしているため、順序を変えてはならない。
pub const RULES: &[NormalizationRule] = &[
    NormalizationRule { name: "split_camel_case", apply: split_camel_case },
    NormalizationRule { name: "strip_parentheticals", apply: strip_parentheticals },
    NormalizationRule { name: "strip_percentages", apply: strip_percentages },
    NormalizationRule { name: "collapse_whitespace", apply: collapse_whitespace },
    NormalizationRule { name: "strip_section_headers", apply: strip_section_headers },
    NormalizationRule { name: "strip_special_chars", apply: strip_special_chars },
    NormalizationRule { name: "truncate_may_contain", apply: truncate_may_contain },
];

/// 小文字→大文字の境界に区切りを挿入（"WaterGlycerin" → "Water, Glycerin"）
pub fn split_camel_case(text: &str) -> String {
    CAMEL_CASE_RE.replace_all(text, "$1, $2").into_owned()
}

/// 括弧とその中身を除去
pub fn strip_parentheticals(text: &str) -> String {
    PARENTHETICAL_RE.replace_all(text, "").into_owned()
}

/// "2%" のようなパーセント表記を除去
pub fn strip_percentages(text: &str) -> String {
    PERCENTAGE_RE.replace_all(text, "").into_owned()
}

/// 連続する空白を1つのスペースに
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// 照合に使う語の正規形（内部の連続空白も1つにまとめて小文字化）
///
/// トークン・アレルゲン・データベースの表記はすべてこの形で比較する。
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// "Ingredients:" などの見出しラベルを区切り文字に置換
pub fn strip_section_headers(text: &str) -> String {
    SECTION_HEADER_RE.replace_all(text, ",").into_owned()
}

/// 単語文字・空白・カンマ・ピリオド・ハイフン以外を除去
pub fn strip_special_chars(text: &str) -> String {
    SPECIAL_CHARS_RE.replace_all(text, "").into_owned()
}

/// "may contain" 以降（注意書き）を切り捨て
pub fn truncate_may_contain(text: &str) -> String {
    MAY_CONTAIN_RE.replace(text, "").into_owned()
}

/// クリーニングルールを順に適用する
pub fn clean_text(text: &str) -> String {
    RULES
        .iter()
        .fold(text.to_string(), |acc, rule| (rule.apply)(&acc))
        .trim()
        .to_string()
}

/// クリーニング済みテキストをトークンに分割
///
/// 1文字以下のセグメントはDOM由来のゴミとして捨てる。
pub fn split_segments(cleaned: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    SEGMENT_SPLIT_RE
        .split(cleaned)
        .map(normalize_term)
        .filter(|segment| segment.chars().count() > 1)
        .filter(|segment| seen.insert(segment.clone()))
        .collect()
}

/// 生テキストを成分トークン列に変換する
///
/// 同じ入力に対しては常に同じ結果を返す。空文字列は空のVecになる。
///
/// # Examples
/// ```
/// use allergen_scan_common::tokenize;
///
/// let tokens = tokenize("Glycerin, glycerin, GLYCERIN.");
/// assert_eq!(tokens, vec!["glycerin"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    split_segments(&clean_text(text))
}

/// 複数セクションを個別に正規化し、出現順を保って統合する
pub fn tokenize_sections<S: AsRef<str>>(sections: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    sections
        .iter()
        .flat_map(|section| tokenize(section.as_ref()))
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
