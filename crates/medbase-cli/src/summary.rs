use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use medbase_cli::pipeline::RunSummary;

pub fn print_summary(summary: &RunSummary) {
    let mut stages = Table::new();
    stages.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    apply_table_style(&mut stages);
    stages.add_row(vec![
        Cell::new("Registry rows read"),
        count_cell(summary.merge.registry_total),
    ]);
    stages.add_row(vec![
        Cell::new("Accepted status"),
        count_cell(summary.merge.status_kept),
    ]);
    stages.add_row(vec![
        Cell::new("Unique by canonical key"),
        count_cell(summary.merge.registry_unique),
    ]);
    stages.add_row(vec![
        Cell::new("Dropped: missing registration"),
        warn_cell(summary.merge.missing_key_drops),
    ]);
    stages.add_row(vec![
        Cell::new("Pricing rows read"),
        count_cell(summary.merge.pricing_total),
    ]);
    stages.add_row(vec![
        Cell::new("Pricing unique by canonical key"),
        count_cell(summary.merge.pricing_unique),
    ]);
    stages.add_row(vec![
        Cell::new("Merged with dose"),
        count_cell(summary.merge.dose_matches),
    ]);
    stages.add_row(vec![
        Cell::new("Merged with form"),
        count_cell(summary.merge.form_matches),
    ]);
    stages.add_row(vec![
        Cell::new("Malformed company text"),
        warn_cell(summary.normalize.malformed_company),
    ]);
    stages.add_row(vec![
        Cell::new("Unresolved ingredient fragments"),
        warn_cell(summary.normalize.unresolved_fragments),
    ]);
    println!("{stages}");

    let mut entities = Table::new();
    entities.set_header(vec![
        header_cell("Entity"),
        header_cell("This run"),
        header_cell("In store"),
    ]);
    apply_table_style(&mut entities);
    let totals = summary.store_totals;
    entities.add_row(vec![
        Cell::new("Companies"),
        count_cell(summary.produced.companies),
        total_cell(totals.map(|t| t.companies)),
    ]);
    entities.add_row(vec![
        Cell::new("Active ingredients"),
        count_cell(summary.produced.ingredients),
        total_cell(totals.map(|t| t.ingredients)),
    ]);
    entities.add_row(vec![
        Cell::new("Products"),
        count_cell(summary.produced.products),
        total_cell(totals.map(|t| t.products)),
    ]);
    entities.add_row(vec![
        Cell::new("Product-ingredient links"),
        count_cell(summary.produced.links),
        total_cell(totals.map(|t| t.links)),
    ]);
    println!("{entities}");

    if summary.store_totals.is_none() {
        println!("Dry run: nothing was written to the store.");
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for index in 1..table.column_count() {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(value: usize) -> Cell {
    Cell::new(value)
}

fn warn_cell(value: usize) -> Cell {
    if value > 0 {
        Cell::new(value).fg(Color::Yellow)
    } else {
        Cell::new(value).fg(Color::DarkGrey)
    }
}

fn total_cell(value: Option<usize>) -> Cell {
    match value {
        Some(value) => Cell::new(value).add_attribute(Attribute::Bold),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}
