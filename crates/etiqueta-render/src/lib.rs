//! Renders a [`LayoutGrid`] into a printable `.docx` label sheet.
//!
//! The sheet is one fixed-layout table: label column, spacer column, label
//! column, every row exactly one label tall, on an A4 page with the margins
//! the label stock expects. All physical dimensions come from the grid's
//! [`LabelGeometry`](etiqueta_core::LabelGeometry); conversion from
//! centimeters to twips happens in one place here.

use docx_rs::{
    AlignmentType, Docx, HeightRule, LineSpacing, PageMargin, Paragraph, Run, RunFonts, Table,
    TableCell, TableLayoutType, TableRow, VAlignType, WidthType,
};
use etiqueta_core::{CellAlignment, CellStyle, EtiquetaError, LabelCell, LayoutGrid, Result};
use std::fs::File;
use std::path::Path;

/// Twentieths of a point per centimeter.
const TWIPS_PER_CM: f64 = 1440.0 / 2.54;

/// Single line spacing, in 240ths of a line.
const SINGLE_LINE: u32 = 240;

fn cm_to_twips(cm: f64) -> u32 {
    (cm * TWIPS_PER_CM).round() as u32
}

/// Render the grid and write it to `path`.
///
/// # Errors
/// Returns [`EtiquetaError::Io`] when the destination cannot be created and
/// [`EtiquetaError::Render`] when the document cannot be packed.
pub fn render_to_file(grid: &LayoutGrid, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    build_docx(grid)
        .build()
        .pack(file)
        .map_err(|e| EtiquetaError::Render(format!("cannot write {}: {e}", path.display())))?;
    log::info!(
        "label sheet with {} label(s) written to {}",
        grid.label_count(),
        path.display()
    );
    Ok(())
}

/// Assemble the document in memory.
#[must_use]
pub fn build_docx(grid: &LayoutGrid) -> Docx {
    let geometry = &grid.geometry;
    let label_width = cm_to_twips(geometry.label_width_cm);
    let spacer_width = cm_to_twips(geometry.spacer_width_cm);
    let row_height = cm_to_twips(geometry.label_height_cm);

    let mut rows = Vec::with_capacity(grid.rows.len());
    for row in &grid.rows {
        let left = label_cell(&row.left, &grid.style, label_width);
        let spacer = empty_cell(spacer_width);
        let right = match &row.right {
            Some(cell) => label_cell(cell, &grid.style, label_width),
            None => empty_cell(label_width),
        };
        rows.push(
            TableRow::new(vec![left, spacer, right])
                .row_height(row_height as f32)
                .height_rule(HeightRule::Exact),
        );
    }

    let table = Table::new(rows)
        .set_grid(vec![
            label_width as usize,
            spacer_width as usize,
            label_width as usize,
        ])
        .width((2 * label_width + spacer_width) as usize, WidthType::Dxa)
        .layout(TableLayoutType::Fixed);

    let page = &geometry.page;
    Docx::new()
        .page_size(cm_to_twips(page.width_cm), cm_to_twips(page.height_cm))
        .page_margin(
            PageMargin::new()
                .top(cm_to_twips(page.margin_top_cm) as i32)
                .bottom(cm_to_twips(page.margin_bottom_cm) as i32)
                .left(cm_to_twips(page.margin_left_cm) as i32)
                .right(cm_to_twips(page.margin_right_cm) as i32),
        )
        .add_table(table)
}

fn empty_cell(width: u32) -> TableCell {
    TableCell::new()
        .width(width as usize, WidthType::Dxa)
        .add_paragraph(Paragraph::new())
}

/// One label: a vertically centered cell with one styled paragraph per
/// label line.
fn label_cell(cell: &LabelCell, style: &CellStyle, width: u32) -> TableCell {
    let mut table_cell = TableCell::new()
        .width(width as usize, WidthType::Dxa)
        .vertical_align(VAlignType::Center);
    for line in &cell.lines {
        table_cell = table_cell.add_paragraph(styled_paragraph(line, style));
    }
    if cell.lines.is_empty() {
        // A table cell must carry at least one paragraph.
        table_cell = table_cell.add_paragraph(Paragraph::new());
    }
    table_cell
}

fn styled_paragraph(line: &str, style: &CellStyle) -> Paragraph {
    let run = Run::new()
        .add_text(line)
        // docx font sizes are half-points.
        .size(style.font_size_pt as usize * 2)
        .fonts(RunFonts::new().ascii(&style.font_family));
    let mut spacing = LineSpacing::new()
        .before(style.space_before_pt * 20)
        .after(style.space_after_pt * 20);
    if style.single_spacing {
        spacing = spacing.line(SINGLE_LINE as i32);
    }
    Paragraph::new()
        .align(alignment_type(style.alignment))
        .line_spacing(spacing)
        .add_run(run)
}

const fn alignment_type(alignment: CellAlignment) -> AlignmentType {
    match alignment {
        CellAlignment::Left => AlignmentType::Left,
        CellAlignment::Center => AlignmentType::Center,
        CellAlignment::Right => AlignmentType::Right,
    }
}
