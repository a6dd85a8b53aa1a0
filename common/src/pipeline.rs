//! スキャン処理（正規化 → 照合 → 類似度フォールバック）

use crate::database::IngredientDatabase;
use crate::matcher::Matcher;
use crate::normalizer::tokenize;
use crate::similarity::{EmbeddingProvider, SimilarityResolver};
use crate::types::{ScanReport, SimilarFlag};
use std::collections::BTreeMap;

/// テキストをスキャンしてレポートを返す
///
/// # Arguments
/// * `text` - ページから抽出したテキスト
/// * `allergens` - ユーザーのアレルゲン（リスト順で優先）
/// * `db` - 成分データベース
pub fn scan<S: AsRef<str>>(text: &str, allergens: &[S], db: &IngredientDatabase) -> ScanReport {
    let tokens = tokenize(text);
    let matcher = Matcher::new(db, allergens);
    let report = ScanReport::from_matches(matcher.match_tokens(&tokens));
    tracing::debug!(
        tokens = report.extracted_ingredients.len(),
        flagged = report.flagged.len(),
        "scan finished"
    );
    report
}

/// 類似度フォールバック付きスキャン
///
/// 文字列照合で該当しなかったトークンを既知成分に寄せ、その成分名が
/// アレルゲンに該当する場合のみ候補として報告する。
pub async fn scan_with_similarity<S, P>(
    text: &str,
    allergens: &[S],
    db: &IngredientDatabase,
    resolver: &SimilarityResolver<P>,
    ingredient_embeddings: &BTreeMap<String, Vec<f32>>,
) -> ScanReport
where
    S: AsRef<str>,
    P: EmbeddingProvider,
{
    let mut report = scan(text, allergens, db);
    let matcher = Matcher::new(db, allergens);

    let unflagged: Vec<String> = report
        .extracted_ingredients
        .iter()
        .filter(|t| !report.flagged.contains(t))
        .cloned()
        .collect();

    for token in unflagged {
        let Some(found) = resolver.resolve(&token, ingredient_embeddings).await else {
            continue;
        };
        if let Some((allergen, _)) = matcher.first_match(&found.name) {
            report.similar.push(SimilarFlag {
                token,
                allergen: allergen.to_string(),
                ingredient: found.name,
                score: found.score,
            });
        }
    }

    report
}
