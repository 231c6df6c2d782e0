//! 功能元件模組
//!
//! 每個子模組實現一個獨立的互動功能

pub mod gif_splitter;
pub mod sprite_workshop;

pub use gif_splitter::GifSplitter;
pub use sprite_workshop::SpriteWorkshop;
