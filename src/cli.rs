use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "allergen-scan")]
#[command(about = "化粧品成分リストのアレルゲン検出ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// テキスト・HTMLファイルをスキャンしてアレルゲンを検出
    Scan {
        /// 入力ファイル/フォルダ（`-` で標準入力）
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// アレルゲンを指定（複数可、設定ファイルより優先）
        #[arg(short, long = "allergen")]
        allergens: Vec<String>,

        /// 追加の成分データベースJSON
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// 綴り違いを類似度で検出
        #[arg(long)]
        fuzzy: bool,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// 結果JSONの保存先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 正規化した成分トークンを表示
    Tokens {
        /// 入力ファイル（`-` で標準入力）
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 登録アレルゲンを表示/編集
    Allergens {
        /// アレルゲンを追加
        #[arg(long)]
        add: Vec<String>,

        /// アレルゲンを削除
        #[arg(long)]
        remove: Vec<String>,

        /// 一覧を表示
        #[arg(long)]
        list: bool,
    },

    /// 成分名の入力候補を表示
    Suggest {
        /// 入力途中の成分名
        #[arg(required = true)]
        query: String,
    },

    /// 設定を表示
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 追加の成分データベースJSONを設定
        #[arg(long)]
        set_database: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
