//! 網格佈局顧問
//!
//! 將精靈圖送交遠端多模態推論服務，取得建議的網格列數與欄數。
//! 純屬輔助功能：任何失敗都只回報「沒有建議」，不影響既有狀態。

use anyhow::{Context, Result, anyhow, bail};
use base64::Engine as _;
use log::{info, warn};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use uuid::Uuid;

/// 固定的分析指示
const ANALYSIS_PROMPT: &str = "Analyze this sprite sheet image. Count how many rows and columns \
     of distinct character sprites are arranged in the grid. Ignore empty padding if possible. \
     Return the result as a JSON object with integer fields \"rows\" and \"cols\".";

/// 遠端服務的請求逾時
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 回應文字中的第一個 JSON 物件（模型偶爾會包上 ``` 圍欄）
static REGEX_JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*?\}").expect("Invalid regex"));

/// 顧問建議的網格配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridSuggestion {
    pub rows: u32,
    pub cols: u32,
}

/// 佈局顧問介面
///
/// 失敗（網路錯誤、回應無法解析、建議值無效）一律以 None 表示，
/// 呼叫端不需要也不應該得知失敗原因以外的細節。
pub trait LayoutAdvisor {
    fn suggest_layout(&self, image_png: &[u8]) -> Option<GridSuggestion>;
}

/// 顧問服務的連線設定
#[derive(Debug, Clone)]
pub struct AdvisorEndpoint {
    pub api_url: String,
    pub model: String,
    pub api_key: String,
}

/// 透過 Gemini 風格 generateContent REST API 的顧問實作
pub struct GeminiLayoutAdvisor {
    endpoint: AdvisorEndpoint,
    agent: ureq::Agent,
}

impl GeminiLayoutAdvisor {
    #[must_use]
    pub fn new(endpoint: AdvisorEndpoint) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self { endpoint, agent }
    }

    /// 送出分析請求並解析建議
    fn request_analysis(&self, image_png: &[u8]) -> Result<GridSuggestion> {
        let request_id = Uuid::new_v4();
        let payload = base64::engine::general_purpose::STANDARD.encode(image_png);

        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": "image/png",
                            "data": payload,
                        }
                    },
                    { "text": ANALYSIS_PROMPT },
                ]
            }],
            "generationConfig": {
                "response_mime_type": "application/json",
            }
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.api_url.trim_end_matches('/'),
            self.endpoint.model
        );

        info!(
            "送出網格分析請求 [{}]: model={}, payload={} bytes",
            request_id,
            self.endpoint.model,
            image_png.len()
        );

        let response = self
            .agent
            .post(&url)
            .set("content-type", "application/json")
            .set("x-goog-api-key", &self.endpoint.api_key)
            .send_json(body)
            .with_context(|| format!("顧問服務請求失敗 [{request_id}]"))?;

        let reply: serde_json::Value = response
            .into_json()
            .with_context(|| format!("顧問服務回應不是有效的 JSON [{request_id}]"))?;

        let text = reply["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow!("顧問服務回應缺少文字內容 [{request_id}]"))?;

        let suggestion = parse_grid_suggestion(text)?;

        info!(
            "收到網格建議 [{}]: {} 列 x {} 欄",
            request_id, suggestion.rows, suggestion.cols
        );

        Ok(suggestion)
    }
}

impl LayoutAdvisor for GeminiLayoutAdvisor {
    fn suggest_layout(&self, image_png: &[u8]) -> Option<GridSuggestion> {
        match self.request_analysis(image_png) {
            Ok(suggestion) => Some(suggestion),
            Err(e) => {
                warn!("網格分析失敗，視為沒有建議: {e:#}");
                None
            }
        }
    }
}

/// 從模型回覆的文字中解析網格建議
///
/// 只採用 rows 與 cols 兩個整數欄位，其餘欄位一律忽略。
pub fn parse_grid_suggestion(text: &str) -> Result<GridSuggestion> {
    let json = REGEX_JSON_OBJECT
        .find(text)
        .ok_or_else(|| anyhow!("回應中找不到 JSON 物件"))?;

    let suggestion: GridSuggestion =
        serde_json::from_str(json.as_str()).context("無法解析網格建議")?;

    if suggestion.rows < 1 || suggestion.cols < 1 {
        bail!(
            "建議的網格無效: {} 列 x {} 欄",
            suggestion.rows,
            suggestion.cols
        );
    }

    Ok(suggestion)
}
