//! 埋め込みベクトルによる類似成分の推定
//!
//! 文字列照合で該当しなかったトークンについて、既知成分との
//! コサイン類似度を計算し、閾値を超えた最も近い成分を返す。
//! 埋め込みモデル自体は外部から注入する。

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// この値を超えた場合のみ一致とみなす
pub const SIMILARITY_THRESHOLD: f32 = 0.75;

/// テキスト→ベクトル変換
///
/// 同じ入力には同じベクトルを返すこと。
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// 類似度の最も高い既知成分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarMatch {
    pub name: String,
    pub score: f32,
}

/// コサイン類似度
///
/// 空・ゼロベクトル・次元不一致の場合は 0.0 を返す。
/// 内部の積和は f64 で計算する（f32 だと大きい値はオーバーフロー、
/// 小さい値はアンダーフローする）。
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())) as f32
}

pub struct SimilarityResolver<P> {
    provider: P,
}

impl<P: EmbeddingProvider> SimilarityResolver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// トークンに最も近い既知成分を返す
    ///
    /// 最高スコアが閾値以下、既知成分が空、またはプロバイダが失敗した場合は None。
    /// 同点の場合はキー順で先の成分を採用する。NaN などのスコアは候補にしない。
    pub async fn resolve(
        &self,
        token: &str,
        ingredient_embeddings: &BTreeMap<String, Vec<f32>>,
    ) -> Option<SimilarMatch> {
        if ingredient_embeddings.is_empty() {
            return None;
        }

        let query = match self.provider.embed(token).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(token = %token, error = %e, "embedding provider failed; skipping similarity");
                return None;
            }
        };

        let mut best: Option<(&str, f32)> = None;
        for (name, embedding) in ingredient_embeddings {
            let score = cosine_similarity(&query, embedding);
            if !score.is_finite() {
                tracing::debug!(candidate = %name, "non-finite similarity; skipping");
                continue;
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((name.as_str(), score));
            }
        }

        let (name, score) = best?;
        tracing::debug!(token = %token, candidate = %name, score, "best similarity");
        if score > SIMILARITY_THRESHOLD {
            Some(SimilarMatch {
                name: name.to_string(),
                score,
            })
        } else {
            None
        }
    }

    /// 既知成分の埋め込みを事前計算する（失敗した成分は除外）
    pub async fn embed_all<S: AsRef<str>>(&self, names: &[S]) -> BTreeMap<String, Vec<f32>> {
        let mut embeddings = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            match self.provider.embed(name).await {
                Ok(v) => {
                    embeddings.insert(name.to_string(), v);
                }
                Err(e) => {
                    tracing::warn!(ingredient = %name, error = %e, "failed to embed known ingredient");
                }
            }
        }
        embeddings
    }
}

/// 文字トライグラムのハッシュによる決定的な埋め込み
///
/// 意味的なモデルではないが、綴りの揺れ（"octildodecanol" など）の検出には使える。
#[derive(Debug, Clone)]
pub struct NgramEmbedder {
    dimensions: usize,
}

impl Default for NgramEmbedder {
    fn default() -> Self {
        Self { dimensions: 512 }
    }
}

impl NgramEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        let padded: Vec<char> = format!("  {} ", text.trim().to_lowercase()).chars().collect();
        for window in padded.windows(3) {
            let bucket = (fnv1a(window) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for NgramEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }
}

fn fnv1a(chars: &[char]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for c in chars {
        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
    }
    hash
}
