use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use qap_cli::pipeline::{RecordStatus, RunReport};

pub fn print_summary(report: &RunReport) {
    println!("Results: {}", report.source.display());
    println!("Schema: {}", report.schema);
    if report.dry_run {
        println!("Dry run: no documents were sent");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Assessment"),
        header_cell("Status"),
        header_cell("Detail"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for outcome in &report.outcomes {
        let label = match &outcome.label {
            Some(label) => Cell::new(label),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(outcome.row),
            label,
            status_cell(&outcome.status),
            detail_cell(&outcome.status),
        ]);
    }
    let failed = report.failed();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} records", report.outcomes.len())).add_attribute(Attribute::Bold),
        count_cell(report.outcomes.len() - failed, Color::Green),
        count_cell(failed, Color::Red),
    ]);
    println!("{table}");
}

fn status_cell(status: &RecordStatus) -> Cell {
    match status {
        RecordStatus::Submitted(_) => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        RecordStatus::Rendered => Cell::new("built").fg(Color::Blue),
        RecordStatus::Exists => Cell::new("EXISTS").fg(Color::Yellow),
        RecordStatus::Failed(_) => Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn detail_cell(status: &RecordStatus) -> Cell {
    match status {
        RecordStatus::Submitted(id) => Cell::new(id),
        RecordStatus::Rendered => dim_cell("-"),
        RecordStatus::Exists => dim_cell("skipped, not overwritten"),
        RecordStatus::Failed(message) => Cell::new(message).fg(Color::Red),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
