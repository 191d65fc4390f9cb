//! Influenza Dashboard Main Application
//! Single window: view controls on top, pivoted table and area chart below.

use crate::charts::{AreaChart, ChartData};
use crate::data::{Aggregator, DataLoader, PivotedTable, DEFAULT_DATA_PATH};
use crate::gui::{ControlPanel, ControlPanelAction, TableView};
use egui::{CentralPanel, Color32, RichText, ScrollArea};

/// The single user-facing message for any load failure.
const LOAD_ERROR_MESSAGE: &str = "Failed to load data. Please check the data file and try again.";

/// Output of one aggregate/reshape run.
struct ViewOutput {
    pivoted: PivotedTable,
    chart: ChartData,
}

/// Main application window.
pub struct DashboardApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    view: Option<ViewOutput>,
    error: Option<String>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            view: None,
            error: None,
        };
        app.load_data(DEFAULT_DATA_PATH);
        app
    }

    /// Load and clean the source file, then run the pipeline once.
    /// On failure every downstream stage is skipped and the single generic
    /// message is shown instead.
    fn load_data(&mut self, path: &str) {
        self.view = None;
        match self.loader.load_and_clean(path) {
            Ok(_) => {
                self.error = None;
                self.refresh_filter_options();
                self.run_pipeline();
            }
            Err(_) => {
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// Offer exactly the distinct values of the active dimension's column
    /// in the cleaned table as filter options.
    fn refresh_filter_options(&mut self) {
        let options = match self.control_panel.settings.dimension.column() {
            Some(column) => self.loader.get_unique_values(column),
            None => Vec::new(),
        };
        self.control_panel.update_options(options);
    }

    /// Re-run group -> pivot -> chart extraction for the current settings.
    fn run_pipeline(&mut self) {
        let Some(df) = self.loader.get_dataframe() else {
            return;
        };

        let settings = &self.control_panel.settings;
        let result = Aggregator::aggregate(df, settings.dimension, &settings.filter)
            .and_then(|(grouped, pivoted)| {
                let chart = ChartData::from_grouped(&grouped, settings.dimension)?;
                Ok(ViewOutput { pivoted, chart })
            });

        match result {
            Ok(view) => {
                self.view = Some(view);
                self.error = None;
            }
            Err(e) => {
                self.view = None;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Let the user point the loader at a different FluNet export.
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.load_data(&path.to_string_lossy());
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .id_salt("dashboard_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("🦠 Influenza A Data Dashboard")
                            .size(22.0)
                            .color(Color32::from_rgb(100, 149, 237)),
                    );
                    if let Some(path) = self.loader.get_file_path() {
                        if self.error.is_none() {
                            ui.label(
                                RichText::new(format!(
                                    "{} — {} rows",
                                    path.display(),
                                    self.loader.get_row_count()
                                ))
                                .size(11.0)
                                .color(Color32::GRAY),
                            );
                        }
                    }
                    ui.add_space(8.0);
                    ui.separator();
                    ui.add_space(8.0);

                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::DimensionChanged => {
                            self.refresh_filter_options();
                            self.run_pipeline();
                        }
                        ControlPanelAction::FilterChanged => self.run_pipeline(),
                        ControlPanelAction::None => {}
                    }

                    ui.add_space(10.0);

                    if let Some(error) = &self.error {
                        ui.label(
                            RichText::new(error)
                                .size(14.0)
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    } else if let Some(view) = &self.view {
                        ui.label(
                            RichText::new("Influenza A Cases by Year")
                                .size(16.0)
                                .strong(),
                        );
                        ui.add_space(5.0);
                        TableView::show(ui, &view.pivoted);

                        ui.add_space(12.0);
                        AreaChart::show(ui, &view.chart);
                    }

                    ui.add_space(12.0);
                    ui.separator();
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("Data source:").size(11.0));
                        ui.hyperlink_to("WHO FluNet", "https://www.who.int/tools/flunet");
                    });
                    ui.label(
                        RichText::new(
                            "Note: Data might not be complete for some years in some \
                             regions/countries.",
                        )
                        .size(11.0)
                        .color(Color32::GRAY),
                    );
                });
        });
    }
}
