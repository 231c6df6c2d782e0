use crate::config::save::save_settings;
use crate::config::types::{Config, Language};
use crate::menu::handlers::{run_gif_splitter, run_sprite_workshop};
use crate::tools::{MAX_FPS, MIN_FPS};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_workshop"),
        t!("main_menu.opt_splitter"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_sprite_workshop(term, shutdown_signal)?;
            Ok(true)
        }
        Some(1) => {
            run_gif_splitter(term, shutdown_signal)?;
            Ok(true)
        }
        Some(2) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(3) | None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_workshop"),
            t!("settings.opt_advisor"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_workshop_defaults_menu(term, config)?,
            Some(1) => show_advisor_settings_menu(term, config)?,
            Some(2) => show_language_menu(term, config)?,
            Some(3) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 工作台預設值選單
fn show_workshop_defaults_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.workshop.title")).cyan().bold());

    let current = &config.settings.workshop;
    println!(
        "\n{} {} x {}, {} fps",
        style(t!("settings.workshop.current")).dim(),
        current.default_rows,
        current.default_cols,
        current.default_fps
    );
    println!();

    let rows: u32 = Input::new()
        .with_prompt(t!("settings.workshop.rows"))
        .default(current.default_rows)
        .interact_text()?;
    let cols: u32 = Input::new()
        .with_prompt(t!("settings.workshop.cols"))
        .default(current.default_cols)
        .interact_text()?;
    let fps: u32 = Input::new()
        .with_prompt(t!("settings.workshop.fps"))
        .default(current.default_fps)
        .interact_text()?;

    let rows = rows.max(1);
    let cols = cols.max(1);
    let fps = fps.clamp(MIN_FPS, MAX_FPS);

    let changed = rows != current.default_rows
        || cols != current.default_cols
        || fps != current.default_fps;

    if changed {
        config.settings.workshop.default_rows = rows;
        config.settings.workshop.default_cols = cols;
        config.settings.workshop.default_fps = fps;
        save_settings(&config.settings)?;
        println!(
            "\n{} {rows} x {cols}, {fps} fps",
            style(t!("settings.saved")).green()
        );
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}

/// 佈局顧問設定選單
fn show_advisor_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.advisor.title")).cyan().bold());
    println!();

    let current = &config.settings.advisor;

    let api_url: String = Input::new()
        .with_prompt(t!("settings.advisor.api_url"))
        .default(current.api_url.clone())
        .interact_text()?;
    let model: String = Input::new()
        .with_prompt(t!("settings.advisor.model"))
        .default(current.model.clone())
        .interact_text()?;
    let api_key_env: String = Input::new()
        .with_prompt(t!("settings.advisor.api_key_env"))
        .default(current.api_key_env.clone())
        .interact_text()?;

    let changed =
        api_url != current.api_url || model != current.model || api_key_env != current.api_key_env;

    if changed {
        config.settings.advisor.api_url = api_url;
        config.settings.advisor.model = model;
        config.settings.advisor.api_key_env = api_key_env;
        save_settings(&config.settings)?;
        println!("\n{}", style(t!("settings.saved")).green());
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}

/// 語言選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::ZhTw, Language::EnUs];
    let items: Vec<String> = vec![
        t!("settings.language.zh_tw").to_string(),
        t!("settings.language.en_us").to_string(),
    ];

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    let Some(selection) = selection else {
        return Ok(());
    };

    let selected = languages[selection];

    if selected != config.settings.language {
        config.settings.language = selected;
        rust_i18n::set_locale(selected.as_locale());
        save_settings(&config.settings)?;
        println!("\n{} {}", style(t!("settings.saved")).green(), selected);
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
