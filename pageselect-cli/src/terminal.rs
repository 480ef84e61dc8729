//! Plain-text render surface.

use std::io::Write;

use pageselect_lib::error::FetchFailure;
use pageselect_lib::surface::PageView;
use pageselect_lib::surface::RenderSurface;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// A table column: field name, header and display width.
struct Column {
    field: &'static str,
    header: &'static str,
    width: usize,
}

const COLUMNS: &[Column] = &[
    Column { field: "title", header: "Title", width: 28 },
    Column { field: "place_of_origin", header: "Place of Origin", width: 16 },
    Column { field: "artist_display", header: "Artist", width: 24 },
    Column { field: "inscriptions", header: "Inscriptions", width: 16 },
    Column { field: "date_start", header: "Start", width: 6 },
    Column { field: "date_end", header: "End", width: 6 },
];

const ID_WIDTH: usize = 8;

/// Draws pages as a text table with a checkbox column.
///
/// Write errors are logged and otherwise ignored; a broken terminal is not a
/// reason to lose the selection.
pub struct TextSurface<W: Write> {
    out: W,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_view(&mut self, view: &PageView<'_>) -> std::io::Result<()> {
        let header_box = if view.all_checked() { "[x]" } else { "[ ]" };
        let mut header = format!("{} {:>4} {}", header_box, "#", fit("Id", ID_WIDTH));
        for column in COLUMNS {
            header.push(' ');
            header.push_str(&fit(column.header, column.width));
        }
        writeln!(self.out, "{}", header.trim_end())?;
        writeln!(self.out, "{}", "-".repeat(UnicodeWidthStr::width(header.trim_end())))?;

        for row in &view.rows {
            let checkbox = if row.checked { "[x]" } else { "[ ]" };
            let mut line = format!(
                "{} {:>4} {}",
                checkbox,
                row.position,
                fit(row.entity.identity_key(), ID_WIDTH)
            );
            for column in COLUMNS {
                let text = row.entity.get_text(column.field).unwrap_or_default();
                line.push(' ');
                line.push_str(&fit(&single_line(&text), column.width));
            }
            writeln!(self.out, "{}", line.trim_end())?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "{}", view.page_line())?;
        writeln!(self.out, "{}", view.status_line())?;
        if let Some(index) = view.loading {
            writeln!(self.out, "loading page {}...", index)?;
        }
        if let Some(failure) = view.failure {
            writeln!(self.out, "error: {}", failure)?;
        }
        self.out.flush()
    }
}

impl<W: Write> RenderSurface for TextSurface<W> {
    fn render(&mut self, view: &PageView<'_>) {
        if let Err(e) = self.write_view(view) {
            log::warn!("failed to draw page {}: {}", view.index, e);
        }
    }

    fn render_unloaded(&mut self, failure: Option<&FetchFailure>) {
        let result = match failure {
            Some(failure) => writeln!(self.out, "error: {}", failure),
            None => writeln!(self.out, "loading..."),
        };
        if let Err(e) = result {
            log::warn!("failed to draw: {}", e);
        }
    }
}

/// Collapses line breaks so one row stays on one line.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pads or truncates `text` to exactly `width` display columns.
fn fit(text: &str, width: usize) -> String {
    let text_width = UnicodeWidthStr::width(text);
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
