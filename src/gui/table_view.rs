//! Table View Widget
//! Renders the pivoted table as a striped grid, years as columns.

use crate::data::PivotedTable;
use egui::{RichText, ScrollArea};

/// Draws the wide-form case-count table exactly as pivoted.
pub struct TableView;

impl TableView {
    pub fn show(ui: &mut egui::Ui, table: &PivotedTable) {
        if table.years.is_empty() {
            ui.label(RichText::new("No data for the current selection").size(13.0));
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::both()
                    .id_salt("pivot_table_scroll")
                    .auto_shrink([false, true])
                    .max_height(280.0)
                    .show(ui, |ui| {
                        egui::Grid::new("pivot_table")
                            .striped(true)
                            .min_col_width(70.0)
                            .spacing([10.0, 4.0])
                            .show(ui, |ui| {
                                ui.label(
                                    RichText::new(&table.index_name).strong().size(12.0),
                                );
                                for year in &table.years {
                                    ui.label(
                                        RichText::new(year.to_string()).strong().size(12.0),
                                    );
                                }
                                ui.end_row();

                                for (label, row) in
                                    table.row_labels.iter().zip(table.rows.iter())
                                {
                                    ui.label(RichText::new(label).size(12.0));
                                    for value in row {
                                        ui.label(RichText::new(value.to_string()).size(12.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
