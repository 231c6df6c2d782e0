//! GIF 編碼轉接層
//!
//! 將準備好的幀序列編碼為無限循環的 GIF 位元組串。
//! 調色盤與 LZW 壓縮細節完全委託給 image crate 的 GIF 編碼器。

use anyhow::{Context, Result, bail};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::io::Cursor;

/// 輸出檔案的固定名稱
pub const OUTPUT_FILENAME: &str = "sprite-animation.gif";

/// 播放速率的允許範圍（每秒幀數）
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 60;

/// 量化取樣速度：1 最精準、30 最快
const ENCODER_SPEED: i32 = 10;

/// 將播放速率轉換為每幀延遲
///
/// 延遲固定為 1000/fps 毫秒，以有理數保存避免先行捨入。
#[must_use]
pub fn frame_delay(fps: u32) -> Delay {
    Delay::from_numer_denom_ms(1000, fps.clamp(MIN_FPS, MAX_FPS))
}

/// 將單一幀影像包裝為帶延遲的 GIF 幀
#[must_use]
pub fn build_frame(image: RgbaImage, fps: u32) -> Frame {
    Frame::from_parts(image, 0, 0, frame_delay(fps))
}

/// 將幀序列編碼為 GIF 位元組串
///
/// 幀必須依原始序號排序後傳入，編碼器會依呼叫順序寫出。
pub fn encode_animation(frames: Vec<Frame>) -> Result<Vec<u8>> {
    if frames.is_empty() {
        bail!("沒有可編碼的幀");
    }

    let mut buffer = Cursor::new(Vec::new());

    {
        let mut encoder = GifEncoder::new_with_speed(&mut buffer, ENCODER_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .context("無法設定 GIF 循環模式")?;

        for frame in frames {
            encoder.encode_frame(frame).context("GIF 幀編碼失敗")?;
        }
    }

    Ok(buffer.into_inner())
}

/// 便利函式：直接從影像序列編碼
pub fn encode_images(images: Vec<RgbaImage>, fps: u32) -> Result<Vec<u8>> {
    let frames = images
        .into_iter()
        .map(|image| build_frame(image, fps))
        .collect();
    encode_animation(frames)
}
