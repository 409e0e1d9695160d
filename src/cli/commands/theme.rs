use clap::{Args, Subcommand};

use super::super::{render, Ctx};
use crate::core::Theme;
use crate::ui;
use crate::{Error, Result};

#[derive(Subcommand, Debug)]
pub enum ThemeCmd {
    /// Print the CSS projection of the current preferences.
    Show,
    /// Change visual preferences (values are clamped/validated here).
    Set(ThemeSetArgs),
}

#[derive(Args, Debug)]
pub struct ThemeSetArgs {
    /// Accent color, `#rgb` or `#rrggbb`.
    #[arg(long)]
    pub accent: Option<String>,

    /// Corner radius in pixels.
    #[arg(long)]
    pub radius: Option<i64>,

    /// Glow intensity, clamped to [0, 1].
    #[arg(long)]
    pub glow: Option<f64>,

    /// One of: dark, light, contrast.
    #[arg(long)]
    pub theme: Option<String>,
}

pub(crate) fn handle(ctx: &Ctx, cmd: ThemeCmd) -> Result<()> {
    let mut manager = ctx.manager()?;
    match cmd {
        ThemeCmd::Show => {
            let doc = manager.load_or_baseline();
            if ctx.json {
                render::print_json(&doc.ui)
            } else {
                println!("data-theme=\"{}\"", ui::theme_attr(&doc.ui));
                println!("{}", ui::render_root_block(&doc.ui));
                Ok(())
            }
        }
        ThemeCmd::Set(args) => {
            // Validate everything at the boundary before touching the store.
            let accent = args
                .accent
                .as_deref()
                .map(|raw| {
                    ui::normalize_accent(raw).ok_or_else(|| Error::Validation {
                        field: "accent".to_string(),
                        reason: format!("`{raw}` is not a hex color"),
                    })
                })
                .transpose()?;
            let theme = args
                .theme
                .as_deref()
                .map(parse_theme)
                .transpose()?;
            let radius = args.radius.map(ui::clamp_radius);
            let glow = args.glow.map(ui::clamp_glow);

            let doc = manager.with_doc(|doc| {
                if let Some(accent) = accent {
                    doc.ui.accent = accent;
                }
                if let Some(radius) = radius {
                    doc.ui.radius = radius;
                }
                if let Some(glow) = glow {
                    doc.ui.glow = glow;
                }
                if let Some(theme) = theme {
                    doc.ui.theme = theme;
                }
            })?;

            if ctx.json {
                render::print_json(&doc.ui)
            } else {
                if !ctx.quiet {
                    println!("{}", ui::render_root_block(&doc.ui));
                }
                Ok(())
            }
        }
    }
}

fn parse_theme(raw: &str) -> Result<Theme> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "dark" => Ok(Theme::Dark),
        "light" => Ok(Theme::Light),
        "contrast" => Ok(Theme::Contrast),
        _ => Err(Error::Validation {
            field: "theme".to_string(),
            reason: format!("`{raw}` is not a theme (dark, light, contrast)"),
        }),
    }
}
