use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sg_ascii::result::ScanResult;
use sg_core::frame::Glyph;

/// Écrit le texte d'export tel quel, sans rognage ni saut de ligne final ajouté.
///
/// # Errors
/// Returns an error if the file cannot be written.
///
/// # Example
/// ```no_run
/// use sg_export::text::write_text;
/// use std::path::Path;
/// write_text(Path::new("art.txt"), "@@\n@@").unwrap();
/// ```
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("cannot write {}", path.display()))?;
    log::info!("text exported to {} ({} bytes)", path.display(), text.len());
    Ok(())
}

/// JSON document for the draw path of one scan.
#[derive(Serialize)]
struct GlyphDocument<'a> {
    stride: u32,
    columns: u32,
    rows: u32,
    glyphs: &'a [Glyph],
}

/// Sérialise les glyphes d'un balayage en JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn glyphs_to_json(scan: &ScanResult) -> Result<String> {
    serde_json::to_string_pretty(&document(scan)).context("glyph serialization failed")
}

/// Écrit les glyphes d'un balayage dans un fichier JSON.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_glyphs_json(path: &Path, scan: &ScanResult) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document(scan))
        .with_context(|| format!("cannot write {}", path.display()))?;
    writer.flush()?;
    log::info!(
        "{} glyphs exported to {}",
        scan.glyphs().len(),
        path.display()
    );
    Ok(())
}

fn document(scan: &ScanResult) -> GlyphDocument<'_> {
    GlyphDocument {
        stride: scan.stride().get(),
        columns: scan.columns(),
        rows: scan.row_count(),
        glyphs: scan.glyphs(),
    }
}

#[cfg(test)]
mod tests {
    use sg_ascii::sampler::scan;
    use sg_core::frame::FrameBuffer;
    use sg_core::stride::SampleStride;

    use super::*;

    #[test]
    fn text_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.txt");
        write_text(&path, "  @\n@  ").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "  @\n@  ");
    }

    #[test]
    fn json_carries_positions_and_colors() {
        let fb = FrameBuffer::filled(2, 1, [255, 255, 255, 255]);
        let result = scan(&fb.view().unwrap(), SampleStride::ONE);
        let json: serde_json::Value = serde_json::from_str(&glyphs_to_json(&result).unwrap()).unwrap();
        assert_eq!(json["stride"], 1);
        assert_eq!(json["columns"], 2);
        assert_eq!(json["glyphs"][1]["x"], 1);
        assert_eq!(json["glyphs"][1]["symbol"], "@");
        assert_eq!(json["glyphs"][1]["color"]["g"], 255);
    }

    #[test]
    fn json_file_round_trips_glyphs() {
        let fb = FrameBuffer::filled(3, 3, [90, 90, 90, 255]);
        let result = scan(&fb.view().unwrap(), SampleStride::new(2).unwrap());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyphs.json");
        write_glyphs_json(&path, &result).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let glyphs: Vec<Glyph> = serde_json::from_value(json["glyphs"].clone()).unwrap();
        assert_eq!(glyphs, result.glyphs());
    }
}
