use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageTypeTable {
    #[serde(rename = "IMAGE_FILE")]
    pub image_file: Vec<String>,
    #[serde(rename = "ANIMATION_FILE")]
    pub animation_file: Vec<String>,
}

impl ImageTypeTable {
    #[must_use]
    pub fn image_extensions_set(&self) -> HashSet<String> {
        self.image_file
            .iter()
            .chain(self.animation_file.iter())
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    #[must_use]
    pub fn is_image_file(&self, path: &Path) -> bool {
        let image_extensions = self.image_extensions_set();
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| image_extensions.contains(&format!(".{}", ext.to_lowercase())))
    }

    #[must_use]
    pub fn is_animation_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.animation_file
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(&format!(".{ext}")))
            })
    }
}

/// 介面語言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_locale(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::ZhTw
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_locale())
    }
}

/// 工作台預設值
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkshopSettings {
    pub default_rows: u32,
    pub default_cols: u32,
    pub default_fps: u32,
}

impl Default for WorkshopSettings {
    fn default() -> Self {
        Self {
            default_rows: 4,
            default_cols: 4,
            default_fps: 10,
        }
    }
}

/// 佈局顧問連線設定
///
/// API 金鑰只記錄環境變數名稱，金鑰本身不落地。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorSettings {
    pub api_url: String,
    pub model: String,
    pub api_key_env: String,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub recent_paths: Vec<String>,
    pub workshop: WorkshopSettings,
    pub advisor: AdvisorSettings,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub image_type_table: ImageTypeTable,
    pub settings: UserSettings,
}
