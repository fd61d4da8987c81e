use std::path::PathBuf;

use clap::Parser;

/// scanglyph: image to ASCII art, colored glyphs and plain text from one scan.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source: PNG, JPEG, BMP, or GIF.
    #[arg(long)]
    pub image: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Sampling stride in pixels (overrides the config).
    #[arg(long)]
    pub stride: Option<u32>,

    /// Maximum sampled cells per scan (overrides the config).
    #[arg(long)]
    pub max_cells: Option<u64>,

    /// Maximum display size before scanning, as WIDTHxHEIGHT (e.g. 800x600).
    #[arg(long, value_parser = parse_size)]
    pub max_size: Option<(u32, u32)>,

    /// Write the export text to this file.
    #[arg(long)]
    pub export_text: Option<PathBuf>,

    /// Write the glyph list as JSON to this file.
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Paint the glyphs into a PNG file.
    #[arg(long)]
    pub export_png: Option<PathBuf>,

    /// TTF/OTF font for --export-png. Without it glyphs are painted as blocks.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Run without the terminal viewer; print the text to stdout unless exported.
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Whether any file export was requested.
    #[must_use]
    pub fn has_exports(&self) -> bool {
        self.export_text.is_some() || self.export_json.is_some() || self.export_png.is_some()
    }
}

/// Parse `WIDTHxHEIGHT`, both positive.
fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be positive, got {w}x{h}"));
    }
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("800x600"), Ok((800, 600)));
        assert_eq!(parse_size("64X32"), Ok((64, 32)));
        assert!(parse_size("800").is_err());
        assert!(parse_size("0x10").is_err());
    }

    #[test]
    fn parses_full_command_line() {
        let cli = Cli::try_parse_from([
            "scanglyph",
            "--image",
            "cat.png",
            "--stride",
            "4",
            "--max-size",
            "320x200",
            "--export-text",
            "cat.txt",
            "--headless",
        ])
        .unwrap();
        assert_eq!(cli.stride, Some(4));
        assert_eq!(cli.max_size, Some((320, 200)));
        assert!(cli.headless);
        assert!(cli.has_exports());
    }

    #[test]
    fn image_is_required() {
        assert!(Cli::try_parse_from(["scanglyph"]).is_err());
    }
}
