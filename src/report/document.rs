//! A printable PDF rendition of a report.
//!
//! The document only uses the standard Helvetica fonts that every PDF reader
//! provides, so no font data is embedded and text is limited to the WinAnsi
//! character set.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use crate::{
    locale::format_rupiah,
    report::rows::{REPORT_COLUMNS, ReportRow, ReportSummary},
};

const POINTS_PER_MM: f64 = 72.0 / 25.4;

// A4 portrait.
const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;

const MARGIN_MM: f64 = 14.0;
const TABLE_START_MM: f64 = 50.0;
const ROW_HEIGHT_MM: f64 = 7.0;
const CELL_PADDING_MM: f64 = 1.0;
const TEXT_BASELINE_MM: f64 = 4.8;

const TITLE_FONT_SIZE: f64 = 18.0;
const SUMMARY_FONT_SIZE: f64 = 11.0;
const TABLE_FONT_SIZE: f64 = 10.0;

/// Column widths in millimetres, in the order of [REPORT_COLUMNS].
const COLUMN_WIDTHS_MM: [f64; 7] = [20.0, 24.0, 32.0, 30.0, 24.0, 24.0, 28.0];

const HEADER_FILL: Rgb = Rgb(22, 163, 74);
const STRIPE_FILL: Rgb = Rgb(245, 245, 245);
const SUMMARY_GREY: Rgb = Rgb(100, 100, 100);
const BODY_TEXT: Rgb = Rgb(40, 40, 40);

#[derive(Debug, Clone, Copy)]
struct Rgb(u8, u8, u8);

impl Rgb {
    fn components(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"F1"),
            Font::Bold => Name(b"F2"),
        }
    }
}

fn mm(value: f64) -> f32 {
    (value * POINTS_PER_MM) as f32
}

/// PDF coordinates start at the bottom of the page, the layout starts at the top.
fn y_from_top(top_mm: f64) -> f32 {
    mm(PAGE_HEIGHT_MM - top_mm)
}

/// Map a character to its byte in the WinAnsi encoding, or '?' if it has none.
///
/// A no-break space is drawn as a plain space so amounts stay literal strings.
fn win_ansi_byte(character: char) -> u8 {
    match character {
        '\u{a0}' => b' ',
        ' '..='~' => character as u8,
        '\u{a1}'..='\u{ff}' => character as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '\u{2014}' => 0x97,
        _ => b'?',
    }
}

/// Glyph widths of Helvetica for the printable ASCII characters, in
/// thousandths of the font size.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' to '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0' to '?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@' to 'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P' to '_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`' to 'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p' to '~'
];

fn glyph_width(byte: u8) -> f64 {
    let width = match byte {
        b' '..=b'~' => HELVETICA_WIDTHS[usize::from(byte - b' ')],
        _ => 556,
    };

    f64::from(width) / 1000.0
}

fn text_width(bytes: &[u8], font_size: f64) -> f64 {
    bytes.iter().map(|byte| glyph_width(*byte)).sum::<f64>() * font_size
}

/// Encode `text` for the page and cut it so it fits in `max_width` points.
fn fit_text(text: &str, font_size: f64, max_width: f64) -> Vec<u8> {
    let mut bytes = text.chars().map(win_ansi_byte).collect::<Vec<_>>();

    if text_width(&bytes, font_size) <= max_width {
        return bytes;
    }

    let ellipsis_width = text_width(b"...", font_size);
    while !bytes.is_empty() && text_width(&bytes, font_size) + ellipsis_width > max_width {
        bytes.pop();
    }
    bytes.extend_from_slice(b"...");

    bytes
}

/// The drawing instructions of a single page.
struct PageContent {
    content: Content,
}

impl PageContent {
    fn new() -> Self {
        Self {
            content: Content::new(),
        }
    }

    fn fill_rect(&mut self, color: Rgb, left_mm: f64, top_mm: f64, width_mm: f64, height_mm: f64) {
        let (red, green, blue) = color.components();
        self.content
            .set_fill_rgb(red, green, blue)
            .rect(
                mm(left_mm),
                y_from_top(top_mm + height_mm),
                mm(width_mm),
                mm(height_mm),
            )
            .fill_nonzero();
    }

    /// Draw already encoded `text` with its baseline `baseline_mm` from the top of the page.
    fn text(
        &mut self,
        font: Font,
        size: f64,
        color: Rgb,
        left_mm: f64,
        baseline_mm: f64,
        text: &[u8],
    ) {
        let (red, green, blue) = color.components();
        self.content
            .begin_text()
            .set_font(font.resource_name(), size as f32)
            .set_fill_rgb(red, green, blue)
            .next_line(mm(left_mm), y_from_top(baseline_mm))
            .show(Str(text))
            .end_text();
    }

    fn table_row(&mut self, cells: [&str; 7], font: Font, color: Rgb, top_mm: f64) {
        let mut left_mm = MARGIN_MM;

        for (cell, width_mm) in cells.into_iter().zip(COLUMN_WIDTHS_MM) {
            let max_width = f64::from(mm(width_mm - 2.0 * CELL_PADDING_MM));
            let text = fit_text(cell, TABLE_FONT_SIZE, max_width);
            self.text(
                font,
                TABLE_FONT_SIZE,
                color,
                left_mm + CELL_PADDING_MM,
                top_mm + TEXT_BASELINE_MM,
                &text,
            );
            left_mm += width_mm;
        }
    }

    fn table_header(&mut self, top_mm: f64) {
        let table_width: f64 = COLUMN_WIDTHS_MM.iter().sum();
        self.fill_rect(HEADER_FILL, MARGIN_MM, top_mm, table_width, ROW_HEIGHT_MM);
        self.table_row(REPORT_COLUMNS, Font::Bold, Rgb(255, 255, 255), top_mm);
    }
}

fn layout_pages(rows: &[ReportRow], title: &str, summary: &ReportSummary) -> Vec<PageContent> {
    let table_width: f64 = COLUMN_WIDTHS_MM.iter().sum();
    let page_bottom = PAGE_HEIGHT_MM - MARGIN_MM;

    let mut first_page = PageContent::new();
    first_page.text(
        Font::Regular,
        TITLE_FONT_SIZE,
        Rgb(0, 0, 0),
        MARGIN_MM,
        22.0,
        &fit_text(
            title,
            TITLE_FONT_SIZE,
            f64::from(mm(PAGE_WIDTH_MM - 2.0 * MARGIN_MM)),
        ),
    );

    let summary_lines = [
        format!("Total Pemasukan: {}", format_rupiah(summary.totals.income)),
        format!("Total Pengeluaran: {}", format_rupiah(summary.totals.expense)),
        format!("Saldo Akhir: {}", format_rupiah(summary.totals.balance)),
    ];
    for (line, baseline) in summary_lines.iter().zip([32.0, 38.0, 44.0]) {
        let text = line.chars().map(win_ansi_byte).collect::<Vec<_>>();
        first_page.text(Font::Regular, SUMMARY_FONT_SIZE, SUMMARY_GREY, MARGIN_MM, baseline, &text);
    }

    first_page.table_header(TABLE_START_MM);

    let mut pages = vec![first_page];
    let mut top_mm = TABLE_START_MM + ROW_HEIGHT_MM;

    for (index, row) in rows.iter().enumerate() {
        if top_mm + ROW_HEIGHT_MM > page_bottom {
            let mut page = PageContent::new();
            page.table_header(MARGIN_MM);
            pages.push(page);
            top_mm = MARGIN_MM + ROW_HEIGHT_MM;
        }

        let Some(page) = pages.last_mut() else {
            break;
        };

        if index % 2 == 1 {
            page.fill_rect(STRIPE_FILL, MARGIN_MM, top_mm, table_width, ROW_HEIGHT_MM);
        }
        page.table_row(row.cells(), Font::Regular, BODY_TEXT, top_mm);
        top_mm += ROW_HEIGHT_MM;
    }

    pages
}

/// Render a report as an A4 PDF: the title, the income, expense and balance
/// totals, then a table of `rows` that continues onto new pages as needed.
pub fn render_document(rows: &[ReportRow], title: &str, summary: &ReportSummary) -> Vec<u8> {
    let pages = layout_pages(rows, title, summary);

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let regular_font_id = Ref::new(3);
    let bold_font_id = Ref::new(4);
    // Each page takes two objects, the page itself and its content stream.
    let page_ids = (0..pages.len())
        .map(|index| Ref::new(5 + 2 * index as i32))
        .collect::<Vec<_>>();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);
    pdf.type1_font(regular_font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_font_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let media_box = Rect::new(0.0, 0.0, mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM));
    for (page, page_id) in pages.into_iter().zip(page_ids) {
        let content_id = Ref::new(page_id.get() + 1);

        let mut page_writer = pdf.page(page_id);
        page_writer
            .parent(page_tree_id)
            .media_box(media_box)
            .contents(content_id);
        page_writer
            .resources()
            .fonts()
            .pair(Font::Regular.resource_name(), regular_font_id)
            .pair(Font::Bold.resource_name(), bold_font_id);
        page_writer.finish();

        pdf.stream(content_id, &page.content.finish());
    }

    pdf.finish()
}
