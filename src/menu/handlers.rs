use crate::component::{GifSplitter, SpriteWorkshop};
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_sprite_workshop(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let mut workshop = SpriteWorkshop::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = workshop.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_gif_splitter(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let splitter = GifSplitter::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = splitter.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
