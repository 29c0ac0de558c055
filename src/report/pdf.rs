use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::models::{AnalysisReport, ClassificationResult, ExtractionPath, SafetyLabel};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const COVER_HDR_H: f32 = 72.0;
const T_END: f32 = PAGE_W - MARGIN;

// ── Palette ───────────────────────────────────────────────────────────────────
const BG:           (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL_ALT:    (f32, f32, f32) = (0.96, 0.97, 0.95);
const PANEL_BORDER: (f32, f32, f32) = (0.85, 0.88, 0.84);
const ACCENT_GRN:   (f32, f32, f32) = (0.16, 0.58, 0.36);
const ACCENT_TEAL:  (f32, f32, f32) = (0.10, 0.48, 0.62);
const TEXT_PRI:     (f32, f32, f32) = (0.07, 0.08, 0.10);
const TEXT_SEC:     (f32, f32, f32) = (0.36, 0.40, 0.42);
const TEXT_MUT:     (f32, f32, f32) = (0.58, 0.62, 0.64);
const WHITE:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const WHITE_DIM:    (f32, f32, f32) = (0.86, 0.96, 0.92);

const SAFE_BG: (f32, f32, f32) = (0.90, 0.98, 0.92);
const SAFE_FG: (f32, f32, f32) = (0.07, 0.52, 0.22);
const CONT_BG: (f32, f32, f32) = (1.00, 0.95, 0.87);
const CONT_FG: (f32, f32, f32) = (0.70, 0.40, 0.02);
const HARM_BG: (f32, f32, f32) = (1.00, 0.91, 0.91);
const HARM_FG: (f32, f32, f32) = (0.76, 0.09, 0.13);

const R_BADGE: f32 = 1.5;

/// Render a PDF report: cover page with stat cards, then the results table.
pub fn render(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let doc = PdfDocument::empty("Ingredient Safety Report");

    add_cover_page(&doc, report)?;
    add_table_pages(&doc, &report.results)?;

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    eprintln!("PDF report written to: {}", output_path.display());
    Ok(())
}

// ── Cover page ────────────────────────────────────────────────────────────────

fn add_cover_page(doc: &PdfDocumentReference, report: &AnalysisReport) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let stats = &report.stats;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(&layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H, ACCENT_GRN, ACCENT_TEAL, 28);

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("riskread v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 30.0), Mm(PAGE_H - 10.5), &font_r,
    );

    set_color(&layer, WHITE);
    layer.use_text("Ingredient Safety", 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), &font_b);
    set_color(&layer, WHITE_DIM);
    layer.use_text("Report", 28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), &font_b);

    // Source chip
    let chip_y = hdr_bot - 18.0;
    let chip_h = 12.0f32;
    let chip_w = 106.0f32;
    fill_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL);
    stroke_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(&layer, MARGIN, chip_y, 2.5, chip_h, ACCENT_GRN);

    set_color(&layer, TEXT_MUT);
    layer.use_text("SOURCE", 6.0, Mm(MARGIN + 5.0), Mm(chip_y + chip_h - 3.8), &font_b);
    set_color(&layer, TEXT_PRI);
    layer.use_text(
        source_caption(report),
        9.5, Mm(MARGIN + 5.0), Mm(chip_y + 2.8), &font_b,
    );

    set_color(&layer, TEXT_SEC);
    layer.use_text(
        format!("Analyzed  {}", today()),
        9.0, Mm(MARGIN), Mm(chip_y - 8.0), &font_r,
    );

    let rule_y = chip_y - 16.5;
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, rule_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), &font_b);

    let card_y  = rule_y - 42.0;
    let card_h  = 26.0f32;
    let gap     = 4.0f32;
    let card_w  = (T_END - MARGIN - gap * 3.0) / 4.0;

    let cards: [(&str, String, (f32, f32, f32)); 4] = [
        ("TOTAL",         stats.total.to_string(),         ACCENT_TEAL),
        ("SAFE",          stats.safe.to_string(),          SAFE_FG),
        ("CONTROVERSIAL", stats.controversial.to_string(), CONT_FG),
        ("HARMFUL",       stats.harmful.to_string(),       HARM_FG),
    ];

    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        draw_stat_card(&layer, cx, card_y, card_w, card_h, label, value, *accent,
                       &font_r, &font_b);
    }

    // Harmful ingredients called out by name
    let section_y = card_y - 13.0;
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, section_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("TO AVOID", 6.5, Mm(MARGIN), Mm(section_y - 7.5), &font_b);

    let harmful: Vec<&str> = report
        .results
        .iter()
        .filter(|r| r.label == SafetyLabel::Harmful)
        .map(|r| r.ingredient.as_str())
        .collect();
    let lines = if harmful.is_empty() {
        vec!["No harmful ingredients found".to_string()]
    } else {
        wrap_text(&harmful.join(", "), 80)
    };
    for (j, line) in lines.iter().take(8).enumerate() {
        let iy = section_y - 15.0 - j as f32 * 5.5;
        set_color(&layer, if harmful.is_empty() { SAFE_FG } else { HARM_FG });
        layer.use_text(line.as_str(), 9.0, Mm(MARGIN), Mm(iy), &font_r);
    }

    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, 22.0, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by riskread v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), &font_r,
    );
    layer.use_text(today(), 7.5, Mm(PAGE_W - MARGIN - 22.0), Mm(15.0), &font_r);

    Ok(())
}

fn source_caption(report: &AnalysisReport) -> String {
    let how = match report.extraction {
        ExtractionPath::Pipeline => "full extraction",
        ExtractionPath::Emergency => "comma split fallback",
        ExtractionPath::Direct => "names given directly",
    };
    format!("{} text, {}", report.source, how)
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: &str,
    accent: (f32, f32, f32),
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);
    fill_rect(layer, x, y + h - 2.0, w, 2.0, accent);

    set_color(layer, accent);
    layer.use_text(value, 20.0, Mm(x + 5.0), Mm(y + h * 0.38), font_b);

    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 5.0), Mm(y + 3.5), font_r);
}

// ── Results table pages ───────────────────────────────────────────────────────

fn add_table_pages(doc: &PdfDocumentReference, results: &[ClassificationResult]) -> Result<()> {
    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    const BASE_ROW_H: f32 = 7.0;
    const EXTRA_LINE_H: f32 = 3.5;
    const HDR_Y: f32 = 268.5;
    const FIRST_Y: f32 = 259.5;
    const BOT_MARGIN: f32 = 25.0;
    const EXPLANATION_WRAP: usize = 44;

    //  #      INGREDIENT   LABEL       EXPLANATION   DECIDED BY
    //  18…26  26…76        76…106      106…172       172…192  (mm)
    let col_x = [MARGIN, MARGIN + 8.0, MARGIN + 58.0, MARGIN + 88.0, MARGIN + 154.0];
    let headers = ["#", "INGREDIENT", "LABEL", "EXPLANATION", "BY"];

    let mut cur_y = FIRST_Y;
    let mut layer: Option<PdfLayerReference> = None;
    let mut page_num: u32 = 0;

    for (row_idx, result) in results.iter().enumerate() {
        let explanation_lines = wrap_text(&result.explanation, EXPLANATION_WRAP);
        let row_h = BASE_ROW_H + explanation_lines.len().saturating_sub(1) as f32 * EXTRA_LINE_H;

        let page = match layer.take() {
            Some(page) if cur_y - row_h >= BOT_MARGIN => page,
            _ => {
                page_num += 1;
                cur_y = FIRST_Y;
                new_table_page(doc, page_num, &col_x, &headers, HDR_Y, &font_r, &font_b)
            }
        };

        let (label_str, label_fg, label_bg) = match result.label {
            SafetyLabel::NotHarmful    => ("SAFE",          SAFE_FG, SAFE_BG),
            SafetyLabel::Controversial => ("CONTROVERSIAL", CONT_FG, CONT_BG),
            SafetyLabel::Harmful       => ("HARMFUL",       HARM_FG, HARM_BG),
        };

        if row_idx % 2 == 0 {
            fill_rect(&page, MARGIN, cur_y - row_h + 1.5, PAGE_W - 2.0 * MARGIN, row_h, PANEL_ALT);
        }

        let text_y = cur_y - 4.0;

        set_color(&page, TEXT_MUT);
        page.use_text((row_idx + 1).to_string(), 8.0, Mm(col_x[0] + 1.5), Mm(text_y), &font_r);
        set_color(&page, TEXT_PRI);
        page.use_text(truncate(&result.ingredient, 30), 8.0, Mm(col_x[1] + 1.5), Mm(text_y), &font_r);

        let badge_x = col_x[2] + 1.5;
        let badge_y = cur_y - row_h + 2.2;
        fill_rounded_rect(&page, badge_x, badge_y, 26.0, 4.8, R_BADGE, label_bg);
        set_color(&page, label_fg);
        page.use_text(label_str, 6.5, Mm(badge_x + 2.0), Mm(badge_y + 1.2), &font_b);

        set_color(&page, TEXT_SEC);
        for (j, line) in explanation_lines.iter().enumerate() {
            let line_y = text_y - j as f32 * EXTRA_LINE_H;
            page.use_text(line.as_str(), 8.0, Mm(col_x[3] + 1.5), Mm(line_y), &font_r);
        }

        set_color(&page, TEXT_MUT);
        page.use_text(
            truncate(&result.source.to_string(), 12),
            6.5, Mm(col_x[4] + 1.5), Mm(text_y), &font_r,
        );

        draw_hline(&page, MARGIN, T_END, cur_y - row_h + 1.5, PANEL_BORDER);

        cur_y -= row_h;
        layer = Some(page);
    }

    Ok(())
}

fn new_table_page(
    doc: &PdfDocumentReference,
    page_num: u32,
    col_x: &[f32; 5],
    headers: &[&str; 5],
    hdr_y: f32,
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) -> PdfLayerReference {
    let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Ingredients");
    let layer = doc.get_page(pi).get_layer(li);

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_GRN, ACCENT_TEAL, 21);

    set_color(&layer, TEXT_PRI);
    layer.use_text("All Ingredients", 14.0, Mm(MARGIN), Mm(282.5), font_b);
    set_color(&layer, TEXT_MUT);
    layer.use_text(
        format!("Page {}", page_num),
        8.0, Mm(PAGE_W - MARGIN - 14.0), Mm(283.0), font_r,
    );
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, 277.5, PANEL_BORDER);

    fill_rounded_rect(&layer, MARGIN, hdr_y - 7.5, PAGE_W - 2.0 * MARGIN, 9.5, R_BADGE, PANEL);
    stroke_rounded_rect(&layer, MARGIN, hdr_y - 7.5, PAGE_W - 2.0 * MARGIN, 9.5, R_BADGE, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    for (x, h) in col_x.iter().zip(headers) {
        layer.use_text(*h, 7.0, Mm(x + 1.5), Mm(hdr_y - 4.0), font_b);
    }

    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, 22.0, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text(
        format!("riskread v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), font_r,
    );

    layer
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
}

fn fill_polygon(layer: &PdfLayerReference, ring: Vec<(Point, bool)>, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
             color: (f32, f32, f32)) {
    let ring = vec![
        (Point::new(Mm(x),     Mm(y)),     false),
        (Point::new(Mm(x + w), Mm(y)),     false),
        (Point::new(Mm(x + w), Mm(y + h)), false),
        (Point::new(Mm(x),     Mm(y + h)), false),
    ];
    fill_polygon(layer, ring, color);
}

/// Clockwise ring approximating a rounded rectangle, 8 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 8;
    let corners = [
        (x + w - r, y + r,     270.0f32),
        (x + w - r, y + h - r, 0.0f32),
        (x + r,     y + h - r, 90.0f32),
        (x + r,     y + r,     180.0f32),
    ];

    corners
        .iter()
        .flat_map(|&(cx, cy, start)| {
            (0..=SEGS).map(move |i| {
                let angle = (start + 90.0 * i as f32 / SEGS as f32).to_radians();
                (Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())), false)
            })
        })
        .collect()
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                     r: f32, color: (f32, f32, f32)) {
    fill_polygon(layer, rounded_rect_ring(x, y, w, h, r), color);
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                       r: f32, color: (f32, f32, f32)) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: (f32, f32, f32)) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

/// Left-to-right gradient drawn as `steps` slightly overlapping strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    from: (f32, f32, f32),
    to: (f32, f32, f32),
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    } else {
        s.to_string()
    }
}

/// Greedy word wrap by character count; a single overlong word keeps its own line.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// ── Date helper ───────────────────────────────────────────────────────────────

/// Today's UTC date as `YYYY-MM-DD`.
fn today() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let (y, m, d) = civil_from_days((secs / 86_400) as i64);
    format!("{:04}-{:02}-{:02}", y, m, d)
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregateStats, DecisionSource, SourceKind};
    use tempfile::TempDir;

    fn sample_report(rows: usize) -> AnalysisReport {
        let results: Vec<ClassificationResult> = (0..rows)
            .map(|i| ClassificationResult {
                ingredient: format!("ingredient {i}"),
                label: if i % 3 == 0 { SafetyLabel::Harmful } else { SafetyLabel::NotHarmful },
                explanation: "Contains something - potential health risk for a long while".into(),
                source: DecisionSource::HarmfulKeyword,
            })
            .collect();
        let stats = AggregateStats::from_results(&results);
        AnalysisReport {
            source: SourceKind::Image,
            extraction: ExtractionPath::Pipeline,
            results,
            stats,
        }
    }

    #[test]
    fn test_render_writes_pdf() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.pdf");
        // Enough rows to spill onto a second table page.
        render(&sample_report(80), &out).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_wrap_and_truncate() {
        assert_eq!(wrap_text("a bb ccc dddd", 6), vec!["a bb", "ccc", "dddd"]);
        assert_eq!(wrap_text("", 6), vec![""]);
        assert_eq!(truncate("hydrogenated", 6), "hydro…");
        assert_eq!(truncate("oats", 6), "oats");
    }

    #[test]
    fn test_civil_from_days() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(19_723), (2024, 1, 1));
        assert_eq!(civil_from_days(19_782), (2024, 2, 29));
    }
}
