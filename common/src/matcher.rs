//! アレルゲン照合モジュール
//!
//! トークンとアレルゲンの組ごとに、以下の順で判定し最初に決まった結果を採用する。
//! 1. 完全一致
//! 2. データベースの別表記（variations）
//! 3. データベースの安全表記（safeVariations）→ 不一致で確定
//! 4. 単語境界つき部分一致
//!
//! 1トークンに複数のアレルゲンが一致しうる場合は、ユーザーのリスト順で
//! 最初に一致したものを採用する（以降のアレルゲンは見ない）。

use crate::database::IngredientDatabase;
use crate::normalizer::normalize_term;
use crate::types::MatchResult;
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashSet;

/// この数未満のトークンは逐次処理する
const PARALLEL_THRESHOLD: usize = 256;

/// 判定に使われたルール
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    Exact,
    Alias,
    SafeExclusion,
    WordBoundary,
    NoMatch,
}

impl MatchDecision {
    pub fn is_match(self) -> bool {
        matches!(
            self,
            MatchDecision::Exact | MatchDecision::Alias | MatchDecision::WordBoundary
        )
    }
}

impl std::fmt::Display for MatchDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchDecision::Exact => write!(f, "exact"),
            MatchDecision::Alias => write!(f, "alias"),
            MatchDecision::SafeExclusion => write!(f, "safe-exclusion"),
            MatchDecision::WordBoundary => write!(f, "word-boundary"),
            MatchDecision::NoMatch => write!(f, "no-match"),
        }
    }
}

/// 照合用に前処理したアレルゲン
///
/// 正規化した名前と単語境界パターンを保持する。パターンは生成時に一度だけ
/// コンパイルし、トークンごとの照合では使い回す。
#[derive(Debug, Clone)]
pub struct AllergenPattern {
    name: String,
    boundary: Option<Regex>,
}

impl AllergenPattern {
    /// 空のアレルゲンは None
    pub fn new(allergen: &str) -> Option<Self> {
        let name = normalize_term(allergen);
        if name.is_empty() {
            return None;
        }
        let boundary = match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&name))) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(allergen = %name, error = %e, "word-boundary pattern failed to compile");
                None
            }
        };
        Some(Self { name, boundary })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// コンパイル済みの単語境界パターン
    pub fn boundary(&self) -> Option<&Regex> {
        self.boundary.as_ref()
    }

    /// アレルゲンを単語として含むか判定
    ///
    /// "oil" は "mineral oil" に一致し、"foil" や "boiler" には一致しない。
    pub fn contains_word(&self, token: &str) -> bool {
        self.boundary.as_ref().is_some_and(|p| p.is_match(token))
    }

    /// トークンを判定する
    pub fn decide(&self, token: &str, db: &IngredientDatabase) -> MatchDecision {
        let token = normalize_term(token);

        if token == self.name {
            return MatchDecision::Exact;
        }

        if let Some(record) = db.get(&self.name) {
            if record.is_variation(&token) {
                return MatchDecision::Alias;
            }
            if record.is_safe_variation(&token) {
                return MatchDecision::SafeExclusion;
            }
        }

        if self.contains_word(&token) {
            MatchDecision::WordBoundary
        } else {
            MatchDecision::NoMatch
        }
    }
}

/// アレルゲンを単語として含むか判定（単発用）
pub fn contains_word(token: &str, allergen: &str) -> bool {
    AllergenPattern::new(allergen).is_some_and(|p| p.contains_word(token))
}

/// トークンとアレルゲンの組を判定する（単発用）
///
/// 繰り返し照合する場合は `Matcher` か `AllergenPattern` を使う。
pub fn decide(token: &str, allergen: &str, db: &IngredientDatabase) -> MatchDecision {
    match AllergenPattern::new(allergen) {
        Some(pattern) => pattern.decide(token, db),
        None => MatchDecision::NoMatch,
    }
}

/// トークンがアレルゲンに該当するか
pub fn is_ingredient_match(token: &str, allergen: &str, db: &IngredientDatabase) -> bool {
    decide(token, allergen, db).is_match()
}

/// アレルゲンリストとデータベースを束ねた照合器
#[derive(Debug, Clone)]
pub struct Matcher<'a> {
    db: &'a IngredientDatabase,
    patterns: Vec<AllergenPattern>,
}

impl<'a> Matcher<'a> {
    pub fn new<S: AsRef<str>>(db: &'a IngredientDatabase, allergens: &[S]) -> Self {
        let patterns = allergens
            .iter()
            .filter_map(|a| AllergenPattern::new(a.as_ref()))
            .collect();
        Self { db, patterns }
    }

    pub fn patterns(&self) -> &[AllergenPattern] {
        &self.patterns
    }

    pub fn allergens(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.name())
    }

    /// 最初に一致したアレルゲンと判定ルールを返す
    pub fn first_match(&self, token: &str) -> Option<(&str, MatchDecision)> {
        self.patterns.iter().find_map(|pattern| {
            let decision = pattern.decide(token, self.db);
            if decision.is_match() {
                tracing::debug!(token = %token, allergen = %pattern.name(), rule = %decision, "allergen matched");
                Some((pattern.name(), decision))
            } else {
                None
            }
        })
    }

    /// トークン1件を照合
    pub fn match_token(&self, token: &str) -> MatchResult {
        MatchResult {
            token: token.to_string(),
            allergen: self.first_match(token).map(|(a, _)| a.to_string()),
        }
    }

    /// トークン列を照合する
    ///
    /// 重複トークンは初出のみ処理し、出現順を保つ。
    pub fn match_tokens<S: AsRef<str> + Sync>(&self, tokens: &[S]) -> Vec<MatchResult> {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = tokens
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| seen.insert(*t))
            .collect();

        if unique.len() < PARALLEL_THRESHOLD {
            unique.iter().map(|t| self.match_token(t)).collect()
        } else {
            unique.par_iter().map(|t| self.match_token(t)).collect()
        }
    }

    /// 該当トークンのみを出現順で返す
    pub fn flagged<S: AsRef<str> + Sync>(&self, tokens: &[S]) -> Vec<String> {
        self.match_tokens(tokens)
            .into_iter()
            .filter(|r| r.is_flagged())
            .map(|r| r.token)
            .collect()
    }
}
