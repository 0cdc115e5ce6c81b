use super::prompts;
use crate::context::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs;

pub fn run_clear(ctx: &AppContext, yes: bool, credentials: bool, output: &Output) -> Result<()> {
    if !yes {
        if !prompts::can_prompt() {
            output.warn("Refusing to clear without confirmation. Pass --yes to clear non-interactively.");
            return Ok(());
        }
        let counts = ctx.store.counts();
        let total = counts.watchlist + counts.continue_watching + counts.downloads + counts.recently_watched;
        let confirmed = prompts::prompt_yes_no(
            &format!("Sign out and delete {} stored movie(s) and your settings?", total),
            Some(false),
        )?;
        if !confirmed {
            output.info("Nothing cleared");
            return Ok(());
        }
    }

    ctx.store
        .clear_all()
        .map_err(|e| eyre!("Failed to clear stored data: {}", e))?;
    output.success("Cleared watchlist, continue watching, downloads, history and settings");

    if credentials {
        clear_credentials(ctx, output)?;
    }

    Ok(())
}

fn clear_credentials(ctx: &AppContext, output: &Output) -> Result<()> {
    let credentials_file = ctx.paths.credentials_file();

    if credentials_file.exists() {
        fs::remove_file(&credentials_file).map_err(|e| {
            eyre!("Failed to remove credentials file at {}: {}", credentials_file.display(), e)
        })?;
        output.success(format!("Cleared credentials: {}", credentials_file.display()));
    } else {
        output.info("No credentials file found to clear");
    }

    Ok(())
}
