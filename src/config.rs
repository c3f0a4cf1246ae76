use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Error;

/// Page size and margins in points. Coordinates handed to renderers are
/// top-down (y = 0 at the top edge of the page).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // US Letter with 50pt margins all round
        Self {
            width: 612.0,
            height: 792.0,
            margin_top: 50.0,
            margin_bottom: 50.0,
            margin_left: 50.0,
            margin_right: 50.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        (self.width - self.margin_left - self.margin_right).max(0.0)
    }

    /// Height available between the top and bottom margins.
    pub fn usable_height(&self) -> f32 {
        (self.height - self.margin_top - self.margin_bottom).max(0.0)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub page: PageGeometry,
    pub row_height: f32,
    pub body_font_size: f32,
    pub heading_font_size: f32,
    pub title_font_size: f32,
    pub footer_font_size: f32,
    pub bar_max_width: f32,
    /// Rows beyond this many are left out of the table (still counted upstream).
    pub table_row_cap: usize,
    /// Requests with more records than this are rejected outright.
    pub record_cap: usize,
    /// Repeat the table header row at the top of continuation pages.
    pub repeat_table_header: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::default(),
            row_height: 20.0,
            body_font_size: 9.0,
            heading_font_size: 14.0,
            title_font_size: 20.0,
            footer_font_size: 8.0,
            bar_max_width: 300.0,
            table_row_cap: 1000,
            record_cap: 10_000,
            repeat_table_header: false,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            log::warn!("Ignoring {name}={other:?}: expected a boolean");
            None
        }
    }
}

fn env_usize(name: &str) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    match val.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            log::warn!("Ignoring {name}={val:?}: expected a non-negative integer");
            None
        }
    }
}

impl ReportConfig {
    pub fn from_json(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `TALLY_PDF_*` environment overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_flag("TALLY_PDF_REPEAT_HEADER") {
            self.repeat_table_header = v;
        }
        if let Some(v) = env_usize("TALLY_PDF_TABLE_ROW_CAP") {
            self.table_row_cap = v;
        }
        if let Some(v) = env_usize("TALLY_PDF_RECORD_CAP") {
            self.record_cap = v;
        }
        self
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }
}

/// Where to find the three faces of the report's font set.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Extra directories searched before the platform font directories.
    pub font_dirs: Vec<PathBuf>,
    /// Family names tried in order for the Latin regular and bold faces.
    pub latin_families: Vec<String>,
    /// Family names tried in order for the Arabic face.
    pub arabic_families: Vec<String>,
    pub regular_path: Option<PathBuf>,
    pub bold_path: Option<PathBuf>,
    pub arabic_path: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            font_dirs: Vec::new(),
            latin_families: owned(&["Inter", "Noto Sans", "DejaVu Sans", "Liberation Sans", "Arial"]),
            arabic_families: owned(&[
                "Rubik",
                "Noto Sans Arabic",
                "Noto Naskh Arabic",
                "DejaVu Sans",
                "Arial",
            ]),
            regular_path: None,
            bold_path: None,
            arabic_path: None,
        }
    }
}

impl FontConfig {
    /// Defaults plus `TALLY_PDF_FONTS` (a path list, `:`-separated, `;` on
    /// Windows) and the per-face `TALLY_PDF_{REGULAR,BOLD,ARABIC}_FONT` files.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(val) = std::env::var("TALLY_PDF_FONTS") {
            let sep = if cfg!(windows) { ';' } else { ':' };
            cfg.font_dirs.extend(
                val.split(sep)
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from),
            );
        }
        let path_var = |name: &str| std::env::var_os(name).map(PathBuf::from);
        cfg.regular_path = path_var("TALLY_PDF_REGULAR_FONT");
        cfg.bold_path = path_var("TALLY_PDF_BOLD_FONT");
        cfg.arabic_path = path_var("TALLY_PDF_ARABIC_FONT");
        cfg
    }
}
