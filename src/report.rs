//! スキャン結果の出力

use crate::error::Result;
use crate::scanner::ScanInput;
use allergen_scan_common::{pipeline, EmbeddingProvider, IngredientDatabase, ScanReport, SimilarityResolver};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 入力1件分のスキャン結果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub source: String,
    pub scanned_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: ScanReport,
}

impl FileReport {
    pub fn new(source: impl Into<String>, report: ScanReport) -> Self {
        Self {
            source: source.into(),
            scanned_at: Utc::now(),
            report,
        }
    }
}

/// 類似度フォールバックに使うリゾルバと既知成分の埋め込み
pub type Similarity<'a, P> = (&'a SimilarityResolver<P>, &'a BTreeMap<String, Vec<f32>>);

/// 入力ごとにスキャンしてレポートを作る
///
/// 空の入力もエラーにはせず、成分0件のレポートとして返す。
pub async fn scan_inputs<S, P>(
    inputs: &[ScanInput],
    allergens: &[S],
    db: &IngredientDatabase,
    similarity: Option<Similarity<'_, P>>,
    progress: Option<&ProgressBar>,
) -> Vec<FileReport>
where
    S: AsRef<str>,
    P: EmbeddingProvider,
{
    let mut reports = Vec::with_capacity(inputs.len());
    for input in inputs {
        if let Some(pb) = progress {
            pb.set_message(input.name.clone());
        }
        if input.text.trim().is_empty() {
            tracing::info!(source = %input.name, "input has no text");
        }
        let scan_report = match similarity {
            Some((resolver, known)) => {
                pipeline::scan_with_similarity(&input.text, allergens, db, resolver, known).await
            }
            None => pipeline::scan(&input.text, allergens, db),
        };
        reports.push(FileReport::new(input.name.clone(), scan_report));
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }
    reports
}

/// 人間向けの表示文字列を組み立てる
pub fn render_text(file_report: &FileReport) -> String {
    let report = &file_report.report;
    let mut lines = vec![format!("📄 {}", file_report.source)];

    lines.push(format!("  成分: {}件", report.extracted_ingredients.len()));

    for m in &report.matches {
        if let Some(allergen) = &m.allergen {
            if allergen == &m.token {
                lines.push(format!("  ⚠ {}", m.token));
            } else {
                lines.push(format!("  ⚠ {} (アレルゲン: {})", m.token, allergen));
            }
        }
    }

    for s in &report.similar {
        lines.push(format!(
            "  ? {} → {} (類似度 {:.2}, アレルゲン: {})",
            s.token, s.ingredient, s.score, s.allergen
        ));
    }

    let icon = if report.has_alerts() { "⚠️" } else { "✅" };
    lines.push(format!("  {} {}", icon, report.summary()));
    lines.join("\n")
}

/// 結果をJSONファイルに保存
pub fn save_json(reports: &[FileReport], output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(output, json)?;
    Ok(())
}
