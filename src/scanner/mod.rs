//! 入力テキストの収集
//!
//! ファイル・フォルダ・標準入力から、スキャン対象のテキストを読み込む。

use crate::error::{AllergenScanError, Result};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ScanInput {
    /// 表示名（ファイル名または "stdin"）
    pub name: String,
    pub path: Option<PathBuf>,
    pub text: String,
}

const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "html", "htm"];

/// html2text の折り返し幅（成分リストを途中で改行させない）
const HTML_TEXT_WIDTH: usize = 10_000;

fn is_text_extension(ext: &str) -> bool {
    TEXT_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .map(|e| {
            let e = e.to_string_lossy();
            e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm")
        })
        .unwrap_or(false)
}

/// HTMLをプレーンテキストに変換する（実体参照もデコード）
pub fn html_to_text(html: &str) -> String {
    html2text::from_read(Cursor::new(html.as_bytes()), HTML_TEXT_WIDTH).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "html2text failed; scanning raw markup");
        html.to_string()
    })
}

/// ファイル1件を読み込む
pub fn read_file(path: &Path) -> Result<ScanInput> {
    if !path.exists() {
        return Err(AllergenScanError::FileNotFound(path.display().to_string()));
    }

    let raw = std::fs::read_to_string(path)?;
    let text = if is_html(path) { html_to_text(&raw) } else { raw };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ScanInput {
        name,
        path: Some(path.to_path_buf()),
        text,
    })
}

/// 標準入力を読み込む
pub fn read_stdin() -> Result<ScanInput> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(ScanInput {
        name: "stdin".to_string(),
        path: None,
        text,
    })
}

/// フォルダ内のテキストファイルを収集（ファイル名順）
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ScanInput>> {
    if !folder.exists() {
        return Err(AllergenScanError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut paths = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension() {
            if is_text_extension(&ext.to_string_lossy()) {
                paths.push(path.to_path_buf());
            }
        }
    }

    paths.sort();
    paths.iter().map(|p| read_file(p)).collect()
}

/// コマンドライン引数の入力をまとめて読み込む
pub fn collect_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<ScanInput>> {
    let mut collected = Vec::new();

    for input in inputs {
        if input.as_os_str() == "-" {
            collected.push(read_stdin()?);
        } else if input.is_dir() {
            collected.extend(scan_folder(input, recursive)?);
        } else {
            collected.push(read_file(input)?);
        }
    }

    Ok(collected)
}
