//! Control Panel Widget
//! View dimension selector and category multi-select for the current run.

use crate::data::ViewDimension;
use egui::{ComboBox, RichText, ScrollArea};

/// User view settings for one pipeline run.
#[derive(Default, Clone)]
pub struct ViewSettings {
    pub dimension: ViewDimension,
    /// Selected category values; empty means no restriction.
    pub filter: Vec<String>,
}

/// Dimension selector plus the category filter checkboxes.
pub struct ControlPanel {
    pub settings: ViewSettings,
    pub options: Vec<String>,
    pub selected_options: Vec<bool>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: ViewSettings::default(),
            options: Vec::new(),
            selected_options: Vec::new(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selectable category values (distinct values of the active
    /// dimension's column in the cleaned table). Clears the selection.
    pub fn update_options(&mut self, options: Vec<String>) {
        self.selected_options = vec![false; options.len()];
        self.options = options;
        self.settings.filter.clear();
    }

    /// Get the currently checked category values.
    pub fn get_selected_filter(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(self.selected_options.iter())
            .filter(|(_, &selected)| selected)
            .map(|(value, _)| value.clone())
            .collect()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.horizontal(|ui| {
            ui.label(RichText::new("View data by:").size(13.0));
            ComboBox::from_id_salt("view_dimension")
                .width(220.0)
                .selected_text(self.settings.dimension.label())
                .show_ui(ui, |ui| {
                    for dim in ViewDimension::ALL {
                        if ui
                            .selectable_label(self.settings.dimension == dim, dim.label())
                            .clicked()
                            && self.settings.dimension != dim
                        {
                            self.settings.dimension = dim;
                            action = ControlPanelAction::DimensionChanged;
                        }
                    }
                });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("📂 Browse").clicked() {
                    action = ControlPanelAction::BrowseCsv;
                }
            });
        });

        // The filter only applies to the non-total views.
        if self.settings.dimension != ViewDimension::Total {
            ui.add_space(8.0);

            let option_text = match self.settings.dimension {
                ViewDimension::ByRegion => "WHO Region(s)",
                _ => "Country/Area/Territory",
            };
            ui.label(
                RichText::new(format!("Select specific {} to view:", option_text)).size(13.0),
            );

            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("filter_options")
                        .max_height(120.0)
                        .show(ui, |ui| {
                            for (i, value) in self.options.iter().enumerate() {
                                if i < self.selected_options.len()
                                    && ui
                                        .checkbox(&mut self.selected_options[i], value)
                                        .changed()
                                {
                                    action = ControlPanelAction::FilterChanged;
                                }
                            }
                        });
                });

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.small_button("Select All").clicked() {
                    self.selected_options.iter_mut().for_each(|v| *v = true);
                    action = ControlPanelAction::FilterChanged;
                }
                if ui.small_button("Clear All").clicked() {
                    self.selected_options.iter_mut().for_each(|v| *v = false);
                    action = ControlPanelAction::FilterChanged;
                }
            });
        }

        if action == ControlPanelAction::FilterChanged {
            self.settings.filter = self.get_selected_filter();
        }

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    DimensionChanged,
    FilterChanged,
}
