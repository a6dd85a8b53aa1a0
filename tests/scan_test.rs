//! スキャン処理の結合テスト
//!
//! 正規化→照合→類似度フォールバックの一連の動作を検証

use allergen_scan_common::{
    is_ingredient_match, scan, scan_with_similarity, tokenize, EmbeddingProvider,
    IngredientDatabase, IngredientRecord, Result, SimilarityResolver,
};
use support::ScoreProvider;
use std::collections::BTreeMap;

/// ラベル全体から "may contain" 注記を除いて照合
#[test]
fn test_fragrance_label() {
    let db = IngredientDatabase::builtin();
    let text = "Ingredients: Water, Glycerin, Octyldodecanol, Fragrance (may contain trace nuts)";
    let report = scan(text, &["fragrance"], &db);

    assert_eq!(report.flagged, vec!["fragrance"]);
    assert_eq!(
        report.extracted_ingredients,
        vec!["water", "glycerin", "octyldodecanol", "fragrance"]
    );
}

/// 安全表記は単語境界で一致しても除外される
#[test]
fn test_hydrogenated_octyldodecanol_is_safe() {
    let db = IngredientDatabase::builtin();
    let report = scan("Hydrogenated Octyldodecanol, Water", &["octyldodecanol"], &db);

    assert!(report.flagged.is_empty());
    assert_eq!(
        report.extracted_ingredients,
        vec!["hydrogenated octyldodecanol", "water"]
    );
}

/// 別表記はデータベース経由で一致する
#[test]
fn test_octyldodecanol_variation() {
    let db = IngredientDatabase::builtin();
    let report = scan("2-Octyldodecanol, Water", &["octyldodecanol"], &db);
    assert_eq!(report.flagged, vec!["2-octyldodecanol"]);
}

/// 同じ成分の重複は1件にまとまる
#[test]
fn test_duplicate_tokens() {
    assert_eq!(tokenize("Glycerin, glycerin, GLYCERIN."), vec!["glycerin"]);
}

/// 単語の一部には一致しない
#[test]
fn test_word_boundary_property() {
    let db = IngredientDatabase::default();
    for token in ["foil", "boiler", "toilet water"] {
        assert!(!is_ingredient_match(token, "oil", &db), "{} should not match", token);
    }
    for token in ["mineral oil", "oil", "jojoba seed oil"] {
        assert!(is_ingredient_match(token, "oil", &db), "{} should match", token);
    }
}

/// 安全表記はどのトークンでも部分一致より優先
#[test]
fn test_safe_variation_always_wins() {
    let mut db = IngredientDatabase::default();
    db.insert(
        "oil",
        IngredientRecord::new(&[], &["mineral oil", "castor oil"], "test"),
    );
    for safe in ["mineral oil", "castor oil", " Mineral Oil "] {
        assert!(!is_ingredient_match(safe, "oil", &db));
    }
    assert!(is_ingredient_match("olive oil", "oil", &db));
}

/// 完全一致は大文字小文字・空白を無視
#[test]
fn test_exact_match_reflexive() {
    let db = IngredientDatabase::builtin();
    for name in ["water", "Hydrogenated Octyldodecanol", "  sls "] {
        assert!(is_ingredient_match(name, &name.to_uppercase(), &db));
    }
}

/// アレルゲン側の連続空白は1つにまとめて照合
#[test]
fn test_allergen_with_inner_whitespace() {
    let db = IngredientDatabase::builtin();
    let report = scan("Mineral Oil, Water", &["mineral  oil"], &db);
    assert_eq!(report.flagged, vec!["mineral oil"]);
    assert_eq!(report.matches[0].allergen.as_deref(), Some("mineral oil"));

    let report = scan("Light Mineral Oil", &["Mineral\tOil"], &db);
    assert_eq!(report.flagged, vec!["light mineral oil"]);
}

/// 正規化結果を再度正規化しても変わらない
#[test]
fn test_normalization_idempotent() {
    let text = "AQUA/WATER, Cetearyl Alcohol (and) Ceteareth-20, Tocopherol 0.5%,\n\
                Parfum, Linalool. May Contain: CI 77891";
    let once = tokenize(text);
    let twice = tokenize(&once.join(", "));
    assert_eq!(once, twice);
    assert!(!once.iter().any(|t| t.contains("ci 77891")));
}

/// 照合対象外のデータベースでも最初のアレルゲンが採用される
#[test]
fn test_first_allergen_wins_in_report() {
    let db = IngredientDatabase::builtin();
    let report = scan("Mineral Oil, Water", &["oil", "mineral oil"], &db);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].allergen.as_deref(), Some("oil"));
}

/// カスタムデータベースのマージ
#[test]
fn test_custom_database_merge() {
    let mut db = IngredientDatabase::builtin();
    let custom = IngredientDatabase::from_json(
        r#"{"nuts": {"variations": ["prunus amygdalus dulcis oil"], "safeVariations": ["nutmeg"]}}"#,
    )
    .unwrap();
    db.merge(&custom);

    let report = scan("Prunus Amygdalus Dulcis Oil, Nutmeg", &["nuts"], &db);
    assert_eq!(report.flagged, vec!["prunus amygdalus dulcis oil"]);
}

/// 類似度 0.9 なら報告し、0.5 なら報告しない
#[tokio::test]
async fn test_similarity_fallback_threshold() {
    let mut known = BTreeMap::new();
    known.insert("octyldodecanol".to_string(), vec![1.0, 0.0]);

    let resolver = SimilarityResolver::new(ScoreProvider::new(0.9));
    let found = resolver.resolve("octildodecanol", &known).await.unwrap();
    assert_eq!(found.name, "octyldodecanol");
    assert!((found.score - 0.9).abs() < 1e-4);

    let resolver = SimilarityResolver::new(ScoreProvider::new(0.5));
    assert!(resolver.resolve("octildodecanol", &known).await.is_none());
}

/// 既知成分が空なら常に None
#[tokio::test]
async fn test_similarity_empty_known() {
    let resolver = SimilarityResolver::new(ScoreProvider::new(0.99));
    assert!(resolver.resolve("octildodecanol", &BTreeMap::new()).await.is_none());
}

/// 類似度候補はアレルゲンに該当する成分のみ
#[tokio::test]
async fn test_scan_with_similarity_reports_candidate() {
    let db = IngredientDatabase::builtin();
    let mut known = BTreeMap::new();
    known.insert("octyldodecanol".to_string(), vec![1.0, 0.0]);
    let resolver = SimilarityResolver::new(ScoreProvider::new(0.9));

    let report = scan_with_similarity(
        "Octildodecanol",
        &["octyldodecanol"],
        &db,
        &resolver,
        &known,
    )
    .await;
    assert!(report.flagged.is_empty());
    assert_eq!(report.similar.len(), 1);
    assert!(report.has_alerts());

    // 既に一致したトークンは類似度にかけない
    let report = scan_with_similarity("Octyldodecanol", &["octyldodecanol"], &db, &resolver, &known).await;
    assert_eq!(report.flagged, vec!["octyldodecanol"]);
    assert!(report.similar.is_empty());
}

mod support {
    use super::*;

    /// どの入力にも、[1, 0] とのコサインが固定値になるベクトルを返す
    pub struct ScoreProvider {
        score: f32,
    }

    impl ScoreProvider {
        pub fn new(score: f32) -> Self {
            Self { score }
        }
    }

    #[allergen_scan_common::async_trait]
    impl EmbeddingProvider for ScoreProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![self.score, (1.0 - self.score * self.score).sqrt()])
        }
    }
}
