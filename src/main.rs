use allergen_scan::{cli, config, error, logging, report, scanner};
use allergen_scan_common::{catalog, AllergenList, NgramEmbedder, SimilarityResolver};
use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use config::Config;
use error::{AllergenScanError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use report::FileReport;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::configure_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Scan { inputs, allergens, database, fuzzy, format, output, recursive } => {
            let allergens: AllergenList = if allergens.is_empty() {
                config.allergens.clone()
            } else {
                allergens.iter().collect()
            };
            if allergens.is_empty() {
                return Err(AllergenScanError::NoAllergens);
            }

            let db = config.load_database(database.as_deref())?;
            for conflict in db.conflicts() {
                eprintln!(
                    "警告: '{}' は variations と safeVariations の両方にあります（{}）。除外として扱います",
                    conflict.value, conflict.ingredient
                );
            }

            let texts = scanner::collect_inputs(&inputs, recursive)?;

            // 類似度用の既知成分はデータベースとカタログの成分名
            let resolver = SimilarityResolver::new(NgramEmbedder::default());
            let known = if fuzzy {
                let mut names: Vec<String> = db.names().map(|n| n.to_string()).collect();
                for name in catalog::known_names() {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
                resolver.embed_all(&names).await
            } else {
                Default::default()
            };

            let progress = if texts.len() > 1 && format == OutputFormat::Text {
                let pb = ProgressBar::new(texts.len() as u64);
                pb.set_style(
                    ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                Some(pb)
            } else {
                None
            };

            let similarity = fuzzy.then_some((&resolver, &known));
            let reports: Vec<FileReport> =
                report::scan_inputs(&texts, allergens.as_slice(), &db, similarity, progress.as_ref()).await;
            if let Some(pb) = progress {
                pb.finish_and_clear();
            }

            match format {
                OutputFormat::Text => {
                    println!("🔍 allergen-scan - 成分スキャン\n");
                    println!("アレルゲン: {}\n", allergens.as_slice().join(", "));
                    for file_report in &reports {
                        println!("{}\n", report::render_text(file_report));
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                }
            }

            if let Some(output) = output {
                report::save_json(&reports, &output)?;
                if format == OutputFormat::Text {
                    println!("✔ 結果を保存: {}", output.display());
                }
            }
        }

        Commands::Tokens { input } => {
            let texts = scanner::collect_inputs(&[input], false)?;
            let sections: Vec<&str> = texts.iter().map(|t| t.text.as_str()).collect();
            for token in allergen_scan_common::tokenize_sections(&sections) {
                println!("{}", token);
            }
        }

        Commands::Allergens { add, remove, list } => {
            let mut config = config;
            let mut changed = false;

            for value in &add {
                if config.allergens.add(value)? {
                    println!("✔ 追加: {}", value.trim().to_lowercase());
                    changed = true;
                } else {
                    println!("- 登録済み: {}", value.trim().to_lowercase());
                }
            }
            for value in &remove {
                if config.allergens.remove(value) {
                    println!("✔ 削除: {}", value.trim().to_lowercase());
                    changed = true;
                } else {
                    println!("- 未登録: {}", value.trim().to_lowercase());
                }
            }
            if changed {
                config.save()?;
            }

            if list || (add.is_empty() && remove.is_empty()) {
                if config.allergens.is_empty() {
                    println!("アレルゲンは登録されていません");
                } else {
                    println!("アレルゲン ({}件):", config.allergens.len());
                    for allergen in config.allergens.iter() {
                        println!("  {}", allergen);
                    }
                }
            }
        }

        Commands::Suggest { query } => {
            let matches = catalog::suggest(&query);
            if matches.is_empty() {
                println!("候補が見つかりません: {}", query);
            }
            for (name, description) in matches {
                println!("{:<24} {}", name, description);
            }
        }

        Commands::Config { show, set_database } => {
            let mut config = config;

            if let Some(path) = set_database {
                if !path.exists() {
                    return Err(AllergenScanError::FileNotFound(path.display().to_string()));
                }
                config.database = Some(path);
                config.save()?;
                println!("✔ 成分データベースを設定しました");
            }

            if show {
                let db = config.load_database(None)?;
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!("  アレルゲン: {}件", config.allergens.len());
                println!(
                    "  成分データベース: {}",
                    config
                        .database_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "組み込みのみ".to_string())
                );
                println!("  登録成分: {}件", db.len());
            }
        }
    }

    Ok(())
}
