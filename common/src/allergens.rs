//! ユーザーのアレルゲンリスト
//!
//! `normalize_term` 済みの文字列を登録順に保持する。重複登録は無視する。

use crate::error::{Error, Result};
use crate::normalizer::normalize_term;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AllergenList {
    entries: Vec<String>,
}

impl From<Vec<String>> for AllergenList {
    fn from(values: Vec<String>) -> Self {
        values.into_iter().collect()
    }
}

impl From<AllergenList> for Vec<String> {
    fn from(list: AllergenList) -> Self {
        list.entries
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllergenList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::default();
        for value in iter {
            // 空文字は読み込み時には黙って捨てる
            let _ = list.add(value.as_ref());
        }
        list
    }
}

impl AllergenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// アレルゲンを追加
    ///
    /// 追加した場合は true、既に登録済みなら false。空文字はエラー。
    pub fn add(&mut self, value: &str) -> Result<bool> {
        let value = normalize_term(value);
        if value.is_empty() {
            return Err(Error::InvalidInput("allergen must not be empty".into()));
        }
        if self.entries.contains(&value) {
            return Ok(false);
        }
        self.entries.push(value);
        Ok(true)
    }

    /// アレルゲンを削除（削除した場合は true）
    pub fn remove(&mut self, value: &str) -> bool {
        let value = normalize_term(value);
        let before = self.entries.len();
        self.entries.retain(|e| e != &value);
        self.entries.len() != before
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.contains(&normalize_term(value))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_normalizes_and_dedups() {
        let mut list = AllergenList::new();
        assert!(list.add("  Fragrance ").unwrap());
        assert!(!list.add("FRAGRANCE").unwrap());
        assert!(list.add("Octyldodecanol").unwrap());
        assert_eq!(list.as_slice(), &["fragrance", "octyldodecanol"]);
    }

    #[test]
    fn test_add_collapses_inner_whitespace() {
        let mut list = AllergenList::new();
        assert!(list.add("Mineral  Oil").unwrap());
        assert!(!list.add("mineral\toil").unwrap());
        assert_eq!(list.as_slice(), &["mineral oil"]);
        assert!(list.contains("MINERAL   OIL"));
        assert!(list.remove(" mineral \n oil "));
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_empty_is_error() {
        let mut list = AllergenList::new();
        assert!(matches!(list.add("   "), Err(Error::InvalidInput(_))));
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut list: AllergenList = ["fragrance", "parabens"].into_iter().collect();
        assert!(list.remove(" Parabens"));
        assert!(!list.remove("parabens"));
        assert_eq!(list.len(), 1);
        assert!(list.contains("Fragrance"));
    }

    #[test]
    fn test_serde_as_array() {
        let list: AllergenList = serde_json::from_str(r#"["Fragrance", "", "fragrance", "SLS"]"#).unwrap();
        assert_eq!(list.as_slice(), &["fragrance", "sls"]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["fragrance","sls"]"#);
    }
}
