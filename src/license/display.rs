use comfy_table::Color;

/// Short license name together with the color the table report uses for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseDisplay {
    pub name: String,
    pub color: Color,
}

impl LicenseDisplay {
    fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

const FALLBACK_COLOR: Color = Color::DarkYellow;

/// Map a GitHub license key (`mit`, `apache-2.0`, ...) to its display form.
///
/// Keys outside the table keep their raw spelling.
pub fn from_github_key(key: &str) -> LicenseDisplay {
    let known = match key {
        "other" => Some(("Other", Color::DarkBlue)),
        "mit" => Some(("MIT", Color::DarkGreen)),
        "lgpl-3.0" => Some(("LGPL-3.0", Color::DarkCyan)),
        "mpl-2.0" => Some(("MPL-2.0", Color::Blue)),
        "agpl-3.0" => Some(("AGPL-3.0", Color::Cyan)),
        "unlicense" => Some(("Unlicense", Color::Red)),
        "apache-2.0" => Some(("Apache-2.0", Color::Green)),
        "gpl-3.0" => Some(("GPL-3.0", Color::Magenta)),
        _ => None,
    };

    match known {
        Some((name, color)) => LicenseDisplay::new(name, color),
        None => LicenseDisplay::new(key, FALLBACK_COLOR),
    }
}

/// Color a license name scraped from pkg.go.dev. Matching is case-insensitive
/// and the name itself is kept as displayed on the page.
pub fn from_page_name(name: &str) -> LicenseDisplay {
    let color = match name.trim().to_lowercase().as_str() {
        "mit" => Color::DarkGreen,
        "apache-2.0" => Color::Green,
        "gpl-2.0" => Color::DarkMagenta,
        "gpl-3.0" => Color::Magenta,
        "lgpl-2.1" => Color::DarkCyan,
        "lgpl-3.0" | "agpl-3.0" => Color::Cyan,
        "mpl-2.0" => Color::Blue,
        "bsd-2-clause" => Color::DarkYellow,
        "bsd-3-clause" => Color::Yellow,
        "epl-2.0" => Color::DarkRed,
        "artistic-2.0" | "unlicense" => Color::Red,
        "bsl-1.0" | "other" => Color::DarkBlue,
        "cc0-1.0" => Color::White,
        _ => FALLBACK_COLOR,
    };
    LicenseDisplay::new(name.trim(), color)
}
