use super::render;
use crate::context::AppContext;
use crate::output::Output;
use crate::SettingsCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use streamx_models::{Collection, UserSettings};

pub fn run_profile(ctx: &AppContext, output: &Output) -> Result<()> {
    let counts = ctx.store.counts();
    let settings = ctx.store.load_settings();

    if !output.is_human() {
        return output.json(&json!({
            "counts": counts,
            "settings": settings,
        }));
    }

    let rows: Vec<(&str, String)> = Collection::ALL
        .iter()
        .map(|c| (c.label(), counts.get(*c).to_string()))
        .collect();
    output.info(render::detail_table("My Library", &rows).to_string());
    output.info(render::detail_table("Settings", &settings_rows(&settings)).to_string());
    Ok(())
}

pub fn run_settings(ctx: &AppContext, cmd: SettingsCommands, output: &Output) -> Result<()> {
    match cmd {
        SettingsCommands::Show => {
            let settings = ctx.store.load_settings();
            output.render(|| render::detail_table("Settings", &settings_rows(&settings)), &settings)
        }
        SettingsCommands::Set {
            notifications,
            autoplay,
            language,
            quality,
            volume,
        } => {
            let mut settings = ctx.store.load_settings();
            let changed = apply_changes(&mut settings, notifications, autoplay, language, quality, volume);
            if !changed {
                output.warn("No setting specified. Use --notifications, --autoplay, --language, --quality or --volume");
                return Ok(());
            }

            let saved = ctx
                .store
                .save_settings(&settings)
                .map_err(|e| eyre!("Failed to save settings: {}", e))?;
            if output.is_human() {
                output.success("Settings saved");
                Ok(())
            } else {
                output.json(&saved)
            }
        }
    }
}

fn apply_changes(
    settings: &mut UserSettings,
    notifications: Option<bool>,
    autoplay: Option<bool>,
    language: Option<String>,
    quality: Option<String>,
    volume: Option<u8>,
) -> bool {
    let mut changed = false;
    if let Some(notifications) = notifications {
        settings.notifications = notifications;
        changed = true;
    }
    if let Some(autoplay) = autoplay {
        settings.autoplay = autoplay;
        changed = true;
    }
    if let Some(language) = language {
        settings.language = language;
        changed = true;
    }
    if let Some(quality) = quality {
        settings.quality = quality;
        changed = true;
    }
    if let Some(volume) = volume {
        settings.volume = volume;
        changed = true;
    }
    changed
}

fn settings_rows(settings: &UserSettings) -> Vec<(&'static str, String)> {
    vec![
        ("Notifications", on_off(settings.notifications)),
        ("Autoplay", on_off(settings.autoplay)),
        ("Language", settings.language.clone()),
        ("Quality", settings.quality.clone()),
        ("Volume", format!("{}%", settings.volume)),
    ]
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_changes() {
        let mut settings = UserSettings::default();
        assert!(!apply_changes(&mut settings, None, None, None, None, None));
        assert_eq!(settings, UserSettings::default());

        assert!(apply_changes(&mut settings, None, Some(false), None, Some("1080p".to_string()), Some(30)));
        assert!(!settings.autoplay);
        assert!(settings.notifications);
        assert_eq!(settings.quality, "1080p");
        assert_eq!(settings.volume, 30);
    }
}
