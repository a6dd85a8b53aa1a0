use crate::error::{AllergenScanError, Result};
use allergen_scan_common::{AllergenList, IngredientDatabase};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 成分データベースのパスを上書きする環境変数
pub const DATABASE_ENV: &str = "ALLERGEN_SCAN_DATABASE";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub allergens: AllergenList,
    /// 追加の成分データベース（組み込みにマージ）
    #[serde(default)]
    pub database: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AllergenScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("allergen-scan").join("config.json"))
    }

    /// 使用する成分データベースのパス（環境変数を優先）
    pub fn database_path(&self) -> Option<PathBuf> {
        if let Ok(path) = std::env::var(DATABASE_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        self.database.clone()
    }

    /// 組み込みデータベースに追加データベースをマージして返す
    pub fn load_database(&self, override_path: Option<&std::path::Path>) -> Result<IngredientDatabase> {
        let mut db = IngredientDatabase::builtin();

        let path = override_path.map(|p| p.to_path_buf()).or_else(|| self.database_path());
        if let Some(path) = path {
            if !path.exists() {
                return Err(AllergenScanError::FileNotFound(path.display().to_string()));
            }
            let custom = IngredientDatabase::from_file(&path)
                .map_err(|e| AllergenScanError::InvalidDatabase(format!("{}: {}", path.display(), e)))?;
            tracing::debug!(path = %path.display(), records = custom.len(), "loaded custom ingredient database");
            db.merge(&custom);
        }

        Ok(db)
    }
}
