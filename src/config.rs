use crate::error::{ListError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ROOM_ENV: &str = "SHARED_LIST_ROOM";
pub const DATA_DIR_ENV: &str = "SHARED_LIST_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 共有リストのルーム名
    pub room: String,
    /// ストアの保存先（None なら既定の場所）
    pub data_dir: Option<PathBuf>,
    /// watch 時の変更確認間隔
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            room: "default".into(),
            data_dir: None,
            poll_interval_ms: 1000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
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

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ListError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("shared-list").join("config.json"))
    }

    /// 使用するルーム名（--room > 環境変数 > 設定ファイル）
    pub fn resolve_room(&self, cli_room: Option<&str>) -> String {
        if let Some(room) = cli_room.map(str::trim).filter(|r| !r.is_empty()) {
            return room.to_string();
        }
        if let Ok(room) = std::env::var(ROOM_ENV) {
            let room = room.trim();
            if !room.is_empty() {
                return room.to_string();
            }
        }
        self.room.trim().to_string()
    }

    /// ストアの保存先（環境変数 > 設定ファイル > 既定）
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("shared-list"))
            .ok_or_else(|| ListError::Config("データディレクトリが見つかりません".into()))
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms.max(100))
    }
}
