//! GIF 拆解元件
//!
//! 解碼動畫 GIF 並將幀依列優先順序合成單張精靈圖。

mod main;

pub use main::{GifSplitter, decode_gif_frames};
