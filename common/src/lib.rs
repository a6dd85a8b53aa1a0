//! Allergen Scan Common Library
//!
//! 成分テキストの正規化とアレルゲン照合のコア。CLIと拡張機能側の
//! 連携コードから共通で使う。

pub mod allergens;
pub mod catalog;
pub mod database;
pub mod error;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
pub mod similarity;
pub mod types;

pub use allergens::AllergenList;
pub use database::{IngredientDatabase, IngredientRecord, RecordConflict};
pub use error::{Error, Result};
pub use matcher::{decide, is_ingredient_match, AllergenPattern, MatchDecision, Matcher};
pub use normalizer::{clean_text, normalize_term, tokenize, tokenize_sections};
pub use pipeline::{scan, scan_with_similarity};
pub use similarity::{
    cosine_similarity, EmbeddingProvider, NgramEmbedder, SimilarMatch, SimilarityResolver,
    SIMILARITY_THRESHOLD,
};
pub use types::{MatchResult, ScanReport, SimilarFlag};

/// 埋め込みプロバイダ実装用
pub use async_trait::async_trait;
