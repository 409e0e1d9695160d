//! Projection of UI preferences onto visual state.
//!
//! Pure: preferences in, CSS custom properties and a theme attribute out.
//! Clamping/validation lives here at the input boundary; the projection
//! itself trusts stored values.

use crate::core::UiPrefs;

pub const MAX_RADIUS_PX: u32 = 64;

/// CSS custom properties for the current preferences, in declaration order.
pub fn css_vars(ui: &UiPrefs) -> Vec<(&'static str, String)> {
    vec![
        ("--accent", ui.accent.clone()),
        ("--radius", format!("{}px", ui.radius)),
        ("--glow", format!("{:.2}", ui.glow)),
    ]
}

/// Value for the `data-theme` attribute.
pub fn theme_attr(ui: &UiPrefs) -> &'static str {
    ui.theme.as_str()
}

/// Render the projection as a `:root` block for embedding.
pub fn render_root_block(ui: &UiPrefs) -> String {
    let mut out = String::from(":root {\n");
    for (name, value) in css_vars(ui) {
        out.push_str(&format!("  {name}: {value};\n"));
    }
    out.push('}');
    out
}

/// Boundary clamp for glow intensity: [0, 1], non-finite input pinned to 0.
pub fn clamp_glow(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    raw.clamp(0.0, 1.0)
}

/// Boundary clamp for corner radius: [0, MAX_RADIUS_PX] pixels.
pub fn clamp_radius(raw: i64) -> u32 {
    raw.clamp(0, i64::from(MAX_RADIUS_PX)) as u32
}

/// Boundary validation for accent colors: `#rgb` or `#rrggbb`, lowercased.
/// Anything else is rejected.
pub fn normalize_accent(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix('#')?;
    if hex.len() != 3 && hex.len() != 6 {
        return None;
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", hex.to_ascii_lowercase()))
}
