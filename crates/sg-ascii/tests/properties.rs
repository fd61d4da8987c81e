use sg_ascii::renderer::Renderer;
use sg_ascii::sampler::{Quantizer, scan};
use sg_core::frame::FrameBuffer;
use sg_core::stride::SampleStride;

/// Gradient déterministe avec zones transparentes, pour les propriétés globales.
fn gradient(width: u32, height: u32) -> FrameBuffer {
    let mut fb = FrameBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            let b = ((x * 7 + y * 13) % 256) as u8;
            let a = if (x / 5 + y / 3) % 4 == 0 { 100 } else { 255 };
            fb.set_pixel(x, y, [r, g, b, a]);
        }
    }
    fb
}

#[test]
fn scan_is_deterministic() {
    let fb = gradient(61, 37);
    let view = fb.view().unwrap();
    for step in [1, 2, 3, 7] {
        let stride = SampleStride::new(step).unwrap();
        assert_eq!(scan(&view, stride), scan(&view, stride));
    }
}

#[test]
fn text_and_glyphs_agree_cell_for_cell() {
    let fb = gradient(53, 29);
    let view = fb.view().unwrap();
    for step in [1, 2, 4, 9, 60] {
        let stride = SampleStride::new(step).unwrap();
        let result = scan(&view, stride);

        let mut from_text = Vec::new();
        for (r, row) in result.rows().iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                if ch != ' ' {
                    from_text.push((c as u32 * step, r as u32 * step, ch));
                }
            }
        }
        let from_glyphs: Vec<(u32, u32, char)> =
            result.glyphs().iter().map(|g| (g.x, g.y, g.symbol)).collect();

        assert_eq!(from_text, from_glyphs, "stride {step}");
    }
}

#[test]
fn glyphs_are_in_row_major_order() {
    let fb = gradient(40, 40);
    let result = scan(&fb.view().unwrap(), SampleStride::new(3).unwrap());
    let keys: Vec<(u32, u32)> = result.glyphs().iter().map(|g| (g.y, g.x)).collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
}

#[test]
fn cell_count_matches_ceiling_formula_and_shrinks() {
    let (w, h) = (45, 31);
    let fb = gradient(w, h);
    let view = fb.view().unwrap();
    let mut prev = u64::MAX;
    for step in 1..=50 {
        let stride = SampleStride::new(step).unwrap();
        let result = scan(&view, stride);
        let expected = u64::from(h.div_ceil(step)) * u64::from(w.div_ceil(step));
        assert_eq!(result.cell_count(), expected, "stride {step}");
        assert_eq!(stride.cells(w, h), expected);
        assert!(result.rows().iter().all(|r| r.chars().count() == w.div_ceil(step) as usize));
        assert!(expected <= prev);
        prev = expected;
    }
}

#[test]
fn white_opaque_square() {
    let fb = FrameBuffer::filled(4, 4, [255, 255, 255, 255]);
    let rendered = Renderer::default().render(&fb.view().unwrap(), SampleStride::ONE);
    assert_eq!(rendered.text(), "@@@@\n@@@@\n@@@@\n@@@@");
    assert_eq!(rendered.glyphs().len(), 16);
    assert!(rendered.glyphs().iter().all(|g| g.symbol == '@'));
}

#[test]
fn fully_transparent_square() {
    let fb = FrameBuffer::filled(4, 4, [255, 255, 255, 0]);
    let rendered = Renderer::default().render(&fb.view().unwrap(), SampleStride::ONE);
    assert_eq!(rendered.text(), "    \n    \n    \n    ");
    assert!(rendered.glyphs().is_empty());
}

#[test]
fn every_band_of_the_table() {
    let q = Quantizer::default();
    let cases = [
        (255, '@'),
        (250, '@'),
        (245, '*'),
        (240, '*'),
        (230, '+'),
        (200, '#'),
        (190, '&'),
        (170, '%'),
        // '_' et non '%' : la bande [140, 160) de la table prime sur le scénario 2×2.
        (150, '_'),
        (130, ':'),
        (110, '$'),
        (90, '/'),
        (70, '-'),
        (50, 'X'),
        (20, 'W'),
    ];
    for (v, expected) in cases {
        assert_eq!(q.classify([v, v, v, 255]), Some(expected), "gray {v}");
    }
    assert_eq!(q.classify([19, 19, 19, 255]), None);
}

#[test]
fn budget_clamp_feeds_scan() {
    let (w, h) = (1600, 1200);
    let stride = SampleStride::bounded(SampleStride::ONE, w, h, 100_000);
    assert_eq!(stride.get(), 5);
    let fb = FrameBuffer::filled(w, h, [128, 128, 128, 255]);
    let result = scan(&fb.view().unwrap(), stride);
    assert!(result.cell_count() <= 100_000);
    assert_eq!(result.cell_count(), 320 * 240);
}
