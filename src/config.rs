use crate::error::{AgencySplitError, Result};
use agency_split_common::{AliasConfig, DetectionOptions, ReportLayout};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionOptions,
    /// 既定のレイアウト名（corte1 / corte2）
    pub default_layout: String,
    /// 既定のエージェンシー別名
    pub aliases: AliasConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detection: DetectionOptions::default(),
            default_layout: "corte2".into(),
            aliases: AliasConfig::from_preset("lima").unwrap_or_default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AgencySplitError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("agency-split").join("config.json"))
    }

    /// 名前またはエイリアスからレイアウトを解決
    ///
    /// `.json` で終わる名前はユーザーレイアウトファイルとして読み込む。
    pub fn layout(&self, name: Option<&str>) -> Result<ReportLayout> {
        let name = name.unwrap_or(&self.default_layout);
        if is_layout_file(name) {
            return Ok(ReportLayout::from_file(std::path::Path::new(name))?);
        }
        ReportLayout::from_preset(name).ok_or_else(|| {
            AgencySplitError::Config(format!(
                "不明なレイアウト: {} (使用可能: {})",
                name,
                ReportLayout::preset_names().join(", ")
            ))
        })
    }

    pub fn set_max_rows(&mut self, rows: usize) -> Result<()> {
        if rows == 0 {
            return Err(AgencySplitError::Config("走査行数は1以上にしてください".into()));
        }
        self.detection.max_rows_scanned = rows;
        Ok(())
    }

    pub fn set_min_match(&mut self, threshold: usize) {
        self.detection.min_match_threshold = threshold;
    }

    pub fn set_default_layout(&mut self, name: &str) -> Result<()> {
        let layout = self.layout(Some(name))?;
        self.default_layout = if is_layout_file(name) { name.to_string() } else { layout.name };
        Ok(())
    }
}

fn is_layout_file(name: &str) -> bool {
    name.to_lowercase().ends_with(".json")
}
