//! 成分シノニムデータベース
//!
//! 正規名ごとに表記ゆれ（variations）と、正規名を含むが別物質である
//! 安全な表記（safeVariations）を保持する。読み込み時に一度だけ検証し、
//! 照合中は読み取り専用で使う。

use crate::error::{Error, Result};
use crate::normalizer::normalize_term;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 成分レコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRecord {
    /// 同一とみなす別表記
    #[serde(default)]
    pub variations: Vec<String>,
    /// 正規名を含むが一致させてはいけない表記
    #[serde(default)]
    pub safe_variations: Vec<String>,
    /// 分類（照合には使わない）
    #[serde(default)]
    pub category: String,
}

impl IngredientRecord {
    pub fn new(variations: &[&str], safe_variations: &[&str], category: &str) -> Self {
        Self {
            variations: variations.iter().map(|v| v.to_string()).collect(),
            safe_variations: safe_variations.iter().map(|v| v.to_string()).collect(),
            category: category.to_string(),
        }
    }

    pub fn is_variation(&self, token: &str) -> bool {
        self.variations.iter().any(|v| v == token)
    }

    pub fn is_safe_variation(&self, token: &str) -> bool {
        self.safe_variations.iter().any(|v| v == token)
    }

    /// 小文字化・トリム・重複除去し、両リストに現れる表記を除外側に寄せる
    ///
    /// 戻り値は variations から取り除いた表記。
    fn normalize(&mut self) -> Vec<String> {
        self.variations = normalize_list(&self.variations);
        self.safe_variations = normalize_list(&self.safe_variations);
        self.category = self.category.trim().to_string();

        let safe = &self.safe_variations;
        let (conflicts, kept): (Vec<String>, Vec<String>) = std::mem::take(&mut self.variations)
            .into_iter()
            .partition(|v| safe.contains(v));
        self.variations = kept;
        conflicts
    }
}

fn normalize_list(values: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = normalize_term(value);
        if !value.is_empty() && !result.contains(&value) {
            result.push(value);
        }
    }
    result
}

/// variations と safeVariations の両方に現れた表記
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConflict {
    pub ingredient: String,
    pub value: String,
}

/// 成分データベース
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, IngredientRecord>", into = "BTreeMap<String, IngredientRecord>")]
pub struct IngredientDatabase {
    records: BTreeMap<String, IngredientRecord>,
    conflicts: Vec<RecordConflict>,
}

impl From<BTreeMap<String, IngredientRecord>> for IngredientDatabase {
    fn from(records: BTreeMap<String, IngredientRecord>) -> Self {
        let mut db = Self::default();
        for (name, record) in records {
            db.insert(&name, record);
        }
        db
    }
}

impl From<IngredientDatabase> for BTreeMap<String, IngredientRecord> {
    fn from(db: IngredientDatabase) -> Self {
        db.records
    }
}

impl IngredientDatabase {
    /// 組み込みデータベース
    pub fn builtin() -> Self {
        let mut db = Self::default();

        db.insert(
            "octyldodecanol",
            IngredientRecord::new(
                &["octyl dodecanol", "2-octyldodecanol"],
                &["hydrogenated octyldodecanol"],
                "emollient",
            ),
        );
        db.insert(
            "fragrance",
            IngredientRecord::new(
                &["parfum", "perfume", "aroma", "fragrance parfum", "parfum fragrance"],
                &["fragrance-free", "fragrance free"],
                "fragrance",
            ),
        );
        db.insert(
            "sodium lauryl sulfate",
            IngredientRecord::new(&["sls", "sodium dodecyl sulfate"], &[], "surfactant"),
        );
        db.insert(
            "parabens",
            IngredientRecord::new(
                &["methylparaben", "ethylparaben", "propylparaben", "butylparaben"],
                &[],
                "preservative",
            ),
        );
        db.insert(
            "methylisothiazolinone",
            IngredientRecord::new(&["mit", "mi"], &["methylchloroisothiazolinone"], "preservative"),
        );
        db.insert(
            "tocopherol",
            IngredientRecord::new(
                &["vitamin e", "tocopheryl acetate", "d-alpha tocopherol"],
                &[],
                "antioxidant",
            ),
        );
        db.insert(
            "petrolatum",
            IngredientRecord::new(&["petroleum jelly", "white petrolatum", "vaseline"], &[], "occlusive"),
        );
        db.insert(
            "mineral oil",
            IngredientRecord::new(&["paraffinum liquidum", "liquid paraffin"], &[], "emollient"),
        );
        db.insert(
            "lanolin",
            IngredientRecord::new(&["lanolin alcohol", "wool wax", "wool fat"], &["lanolin-free"], "emollient"),
        );

        db
    }

    /// JSON文字列から読み込み
    ///
    /// トップレベルは `{ "正規名": { variations, safeVariations, category } }` の形でなければならない。
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(Error::InvalidDatabase(
                "top-level value must be an object keyed by ingredient name".into(),
            ));
        }
        let records: BTreeMap<String, IngredientRecord> = serde_json::from_value(value)
            .map_err(|e| Error::InvalidDatabase(e.to_string()))?;
        Ok(Self::from(records))
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// レコードを追加（同名は置き換え）
    pub fn insert(&mut self, name: &str, mut record: IngredientRecord) {
        let name = normalize_term(name);
        if name.is_empty() {
            tracing::warn!("skipping ingredient record with empty name");
            return;
        }

        self.conflicts.retain(|c| c.ingredient != name);
        for value in record.normalize() {
            tracing::warn!(
                ingredient = %name,
                value = %value,
                "listed as both variation and safe variation; treating as safe"
            );
            self.conflicts.push(RecordConflict {
                ingredient: name.clone(),
                value,
            });
        }
        self.records.insert(name, record);
    }

    /// 設定をマージ（後から追加したレコードが優先）
    pub fn merge(&mut self, other: &IngredientDatabase) {
        for (name, record) in &other.records {
            self.insert(name, record.clone());
        }
        for conflict in &other.conflicts {
            if !self.conflicts.contains(conflict) {
                self.conflicts.push(conflict.clone());
            }
        }
    }

    /// 正規名でレコードを取得（大文字小文字・空白の違いは無視）
    pub fn get(&self, name: &str) -> Option<&IngredientRecord> {
        match self.records.get(name) {
            Some(record) => Some(record),
            None => self.records.get(&normalize_term(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// 正規名の一覧（昇順）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IngredientRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 読み込み時に検出した矛盾エントリ
    pub fn conflicts(&self) -> &[RecordConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_octyldodecanol() {
        let db = IngredientDatabase::builtin();
        let record = db.get("octyldodecanol").unwrap();
        assert!(record.is_variation("2-octyldodecanol"));
        assert!(record.is_safe_variation("hydrogenated octyldodecanol"));
        assert_eq!(record.category, "emollient");
    }

    #[test]
    fn test_builtin_has_no_conflicts() {
        let db = IngredientDatabase::builtin();
        assert!(db.conflicts().is_empty());
        for (_, record) in db.iter() {
            for v in &record.variations {
                assert!(!record.is_safe_variation(v));
            }
        }
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let db = IngredientDatabase::builtin();
        assert!(db.get("  Octyldodecanol ").is_some());
        assert!(db.get("water").is_none());
    }

    #[test]
    fn test_names_and_variations_collapse_whitespace() {
        let db = IngredientDatabase::from_json(
            r#"{"Mineral  Oil": {"variations": ["Paraffinum   Liquidum"], "safeVariations": []}}"#,
        )
        .unwrap();
        assert!(db.contains("mineral oil"));
        assert!(db.get("MINERAL \t OIL").is_some());
        assert!(db.get("mineral oil").unwrap().is_variation("paraffinum liquidum"));
    }

    #[test]
    fn test_from_json_defaults_missing_fields() {
        let db = IngredientDatabase::from_json(r#"{"Linalool": {"variations": ["Linalol"]}}"#).unwrap();
        let record = db.get("linalool").unwrap();
        assert_eq!(record.variations, vec!["linalol"]);
        assert!(record.safe_variations.is_empty());
        assert_eq!(record.category, "");
    }

    #[test]
    fn test_from_json_camel_case_fields() {
        let json = r#"{
            "octyldodecanol": {
                "variations": ["2-Octyldodecanol"],
                "safeVariations": ["Hydrogenated Octyldodecanol"],
                "category": "emollient"
            }
        }"#;
        let db = IngredientDatabase::from_json(json).unwrap();
        let record = db.get("octyldodecanol").unwrap();
        assert!(record.is_safe_variation("hydrogenated octyldodecanol"));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let result = IngredientDatabase::from_json(r#"["octyldodecanol"]"#);
        assert!(matches!(result, Err(Error::InvalidDatabase(_))));
    }

    #[test]
    fn test_from_json_rejects_wrong_field_type() {
        let result = IngredientDatabase::from_json(r#"{"talc": {"variations": "talcum"}}"#);
        assert!(matches!(result, Err(Error::InvalidDatabase(_))));
    }

    #[test]
    fn test_conflict_resolves_to_safe() {
        let json = r#"{"egg": {"variations": ["egg white", "eggshell"], "safeVariations": ["eggshell"]}}"#;
        let db = IngredientDatabase::from_json(json).unwrap();
        let record = db.get("egg").unwrap();
        assert_eq!(record.variations, vec!["egg white"]);
        assert!(record.is_safe_variation("eggshell"));
        assert_eq!(
            db.conflicts(),
            &[RecordConflict { ingredient: "egg".into(), value: "eggshell".into() }]
        );
    }

    #[test]
    fn test_merge_later_wins() {
        let mut db = IngredientDatabase::builtin();
        let custom = IngredientDatabase::from_json(
            r#"{"fragrance": {"variations": ["scent"]}, "linalool": {}}"#,
        )
        .unwrap();
        let before = db.len();
        db.merge(&custom);

        assert_eq!(db.len(), before + 1);
        assert_eq!(db.get("fragrance").unwrap().variations, vec!["scent"]);
        assert!(db.contains("linalool"));
    }

    #[test]
    fn test_serialize_round_trip_shape() {
        let db = IngredientDatabase::builtin();
        let json = serde_json::to_value(&db).unwrap();
        assert!(json["octyldodecanol"]["safeVariations"].is_array());
    }
}
