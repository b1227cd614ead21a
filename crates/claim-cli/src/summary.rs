use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use claim_model::Dollars;

use crate::types::{BatchResult, FormOutcome};

pub fn print_summary(result: &BatchResult) {
    println!("Output: {}", result.output_dir.display());
    println!("Seed: {}", result.seed);
    println!("Aggregate: {}", result.aggregate.display());
    println!("{}", summary_table(result));
    let degraded = result.degraded_count();
    if degraded > 0 {
        println!("{degraded} of {} forms were degraded; see the log for details", result.forms.len());
    }
    for failure in &result.failed {
        eprintln!("form {} failed: {}", failure.form_number, failure.error);
    }
}

pub fn summary_table(result: &BatchResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Form"),
        header_cell("Patient"),
        header_cell("Coverage"),
        header_cell("Dx"),
        header_cell("Lines"),
        header_cell("Total"),
        header_cell("Flatten"),
        header_cell("Preview"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Center);
    align_column(&mut table, 7, CellAlignment::Center);

    let mut total_diagnoses = 0usize;
    let mut total_lines = 0usize;
    for form in &result.forms {
        total_diagnoses += form.diagnoses;
        total_lines += form.procedures;
        table.add_row(vec![
            Cell::new(form.form_number),
            Cell::new(&form.patient_name),
            Cell::new(&form.coverage),
            Cell::new(form.diagnoses),
            Cell::new(form.procedures),
            Cell::new(form.total_charge),
            flatten_cell(form),
            preview_cell(form),
        ]);
    }
    let total_charge: Dollars = result.forms.iter().map(|form| form.total_charge).sum();
    table.add_row(vec![
        total_cell(result.forms.len()),
        total_cell("TOTAL"),
        dim_cell("-"),
        total_cell(total_diagnoses),
        total_cell(total_lines),
        total_cell(total_charge),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
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

fn total_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn flatten_cell(form: &FormOutcome) -> Cell {
    if form.flatten.is_flattened() {
        Cell::new(form.flatten.label()).fg(Color::Green)
    } else {
        Cell::new(form.flatten.label()).fg(Color::Yellow)
    }
}

fn preview_cell(form: &FormOutcome) -> Cell {
    match form.preview {
        Some(_) => Cell::new("yes").fg(Color::Green),
        None => dim_cell("no"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
