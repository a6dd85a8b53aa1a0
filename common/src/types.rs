//! 照合結果の型定義
//!
//! CLIと呼び出し側（ストレージ・通知）で共有される型:
//! - MatchResult: トークン1件の照合結果
//! - SimilarFlag: 類似度フォールバックで見つかった候補
//! - ScanReport: 1回のスキャン結果（保存・表示用）

use serde::{Deserialize, Serialize};

/// トークン1件の照合結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub token: String,
    /// 一致したアレルゲン（なければNone）
    #[serde(default)]
    pub allergen: Option<String>,
}

impl MatchResult {
    pub fn is_flagged(&self) -> bool {
        self.allergen.is_some()
    }
}

/// 類似度による候補
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarFlag {
    pub token: String,
    /// 最も近い既知成分
    pub ingredient: String,
    /// その成分が該当したアレルゲン
    pub allergen: String,
    pub score: f32,
}

/// スキャン結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanReport {
    /// 抽出した全トークン（重複なし・出現順）
    pub extracted_ingredients: Vec<String>,
    /// 該当トークン
    pub flagged: Vec<String>,
    /// 該当トークンとアレルゲンの対応
    pub matches: Vec<MatchResult>,
    /// 類似度フォールバックの候補
    pub similar: Vec<SimilarFlag>,
}

impl ScanReport {
    pub fn from_matches(results: Vec<MatchResult>) -> Self {
        let extracted_ingredients = results.iter().map(|r| r.token.clone()).collect();
        let matches: Vec<MatchResult> = results.into_iter().filter(|r| r.is_flagged()).collect();
        let flagged = matches.iter().map(|r| r.token.clone()).collect();
        Self {
            extracted_ingredients,
            flagged,
            matches,
            similar: Vec::new(),
        }
    }

    pub fn has_alerts(&self) -> bool {
        !self.flagged.is_empty() || !self.similar.is_empty()
    }

    /// 通知用の一行サマリ
    pub fn summary(&self) -> String {
        if self.extracted_ingredients.is_empty() {
            return "No ingredients found".to_string();
        }
        let n = self.flagged.len();
        if n > 0 {
            format!(
                "Found {} potential allergen{}: {}",
                n,
                if n > 1 { "s" } else { "" },
                self.flagged.join(", ")
            )
        } else if !self.similar.is_empty() {
            let names: Vec<&str> = self.similar.iter().map(|s| s.token.as_str()).collect();
            format!("No exact allergens; possible matches: {}", names.join(", "))
        } else {
            "No allergens detected in this product".to_string()
        }
    }
}
