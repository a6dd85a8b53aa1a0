//! よく使われる化粧品成分の一覧（入力補完用）

use regex::Regex;

/// 成分名と説明
pub const COMMON_INGREDIENTS: &[(&str, &str)] = &[
    ("Dimethicone", "A silicone-based ingredient used for smoothing"),
    ("Octyldodecanol", "An emollient that helps soften skin"),
    ("Octyl Dodecanol", "Alternative name for Octyldodecanol"),
    ("2-Octyldodecanol", "Chemical name for Octyldodecanol"),
    ("Titanium Dioxide", "A natural mineral used as a sunscreen and colorant"),
    ("Glycerin", "A humectant that helps retain moisture"),
    ("Phenoxyethanol", "A preservative commonly used in cosmetics"),
    ("Tocopherol", "Vitamin E, an antioxidant"),
    ("Niacinamide", "Vitamin B3, helps with skin barrier function"),
    ("Hyaluronic Acid", "A powerful moisturizing ingredient"),
    ("Salicylic Acid", "A BHA exfoliant for acne-prone skin"),
    ("Retinol", "Vitamin A derivative for anti-aging"),
    ("Sodium Lauryl Sulfate", "A cleansing and foaming agent"),
    ("SLS", "Abbreviation for Sodium Lauryl Sulfate"),
    ("Parabens", "A family of preservatives"),
    ("Methylparaben", "A type of paraben preservative"),
    ("Propylparaben", "A type of paraben preservative"),
    ("Butylparaben", "A type of paraben preservative"),
    ("Fragrance", "Scent additives"),
    ("Parfum", "Alternative name for Fragrance"),
    ("Benzyl Alcohol", "A preservative and fragrance ingredient"),
    ("Propylene Glycol", "A moisture-carrying substance"),
    ("Cetyl Alcohol", "A fatty alcohol used as an emollient"),
    ("Stearyl Alcohol", "A fatty alcohol used as an emollient"),
    ("Lanolin", "A waxy substance derived from sheep's wool"),
    ("Mineral Oil", "A petroleum-based moisturizing agent"),
    ("Petrolatum", "Another name for petroleum jelly"),
    ("Isopropyl Myristate", "An emollient that can clog pores"),
    ("Benzophenone", "A sunscreen ingredient"),
    ("Oxybenzone", "A chemical sunscreen filter"),
    ("Methylisothiazolinone", "A preservative that can cause irritation"),
];

lazy_static::lazy_static! {
    static ref WORD_SPLIT_RE: Regex = Regex::new(r"[\s-]+").unwrap();
}

/// 成分名の説明を取得
pub fn describe(name: &str) -> Option<&'static str> {
    let name = name.trim();
    COMMON_INGREDIENTS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, d)| *d)
}

/// 入力途中の文字列から候補を返す
///
/// 部分一致する成分を返す。単語（空白・ハイフン区切り）の前方一致を先に並べる。
pub fn suggest(query: &str) -> Vec<(&'static str, &'static str)> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let (prefixed, rest): (Vec<_>, Vec<_>) = COMMON_INGREDIENTS
        .iter()
        .filter(|(name, _)| name.to_lowercase().contains(&query))
        .partition(|(name, _)| {
            WORD_SPLIT_RE
                .split(&name.to_lowercase())
                .any(|w| w.starts_with(&query))
        });

    prefixed.into_iter().chain(rest).copied().collect()
}

/// 類似度照合の対象にする成分名（小文字）
pub fn known_names() -> Vec<String> {
    COMMON_INGREDIENTS
        .iter()
        .map(|(name, _)| name.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_substring() {
        let names: Vec<&str> = suggest("paraben").iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["Parabens", "Methylparaben", "Propylparaben", "Butylparaben"]);
    }

    #[test]
    fn test_suggest_word_prefix() {
        let names: Vec<&str> = suggest("dodec").iter().map(|(n, _)| *n).collect();
        // 単語の前方一致が先頭
        assert_eq!(names, vec!["Octyl Dodecanol", "Octyldodecanol", "2-Octyldodecanol"]);
    }

    #[test]
    fn test_suggest_empty_query() {
        assert!(suggest("").is_empty());
        assert!(suggest("   ").is_empty());
        assert!(suggest("zzzz").is_empty());
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe("parfum"), Some("Alternative name for Fragrance"));
        assert_eq!(describe("water"), None);
    }
}
