//! Control Panel Widget
//! Top bar with tab selection, reload and export controls, and load status.

use egui::{Color32, RichText};

/// Dashboard tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Favourites,
    Country,
    Raw,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Favourites, Tab::Country, Tab::Raw];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Favourites => "Favourites",
            Tab::Country => "Country",
            Tab::Raw => "Raw",
        }
    }
}

/// Top control bar.
pub struct ControlPanel {
    pub tab: Tab,
    pub status: String,
    pub is_error: bool,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            tab: Tab::default(),
            status: "Ready".to_string(),
            is_error: false,
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.is_error = false;
    }

    pub fn set_error(&mut self, error: &str) {
        self.status = format!("Error: {error}");
        self.is_error = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, is_loading: bool) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.horizontal(|ui| {
            ui.label(
                RichText::new("Eurovision Votes")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.add_space(20.0);

            for tab in Tab::ALL {
                ui.selectable_value(&mut self.tab, tab, RichText::new(tab.title()).size(14.0));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let export = ui.add_enabled(self.export_enabled, egui::Button::new("Export CSV"));
                if export.clicked() {
                    action = ControlPanelAction::ExportCsv;
                }

                let reload = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                if reload.clicked() {
                    action = ControlPanelAction::Reload;
                }

                if is_loading {
                    ui.spinner();
                }
                let color = if self.is_error {
                    Color32::from_rgb(220, 53, 69)
                } else {
                    Color32::GRAY
                };
                ui.label(RichText::new(&self.status).size(12.0).color(color));
            });
        });

        action
    }
}

/// Actions that can be triggered from the control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    Reload,
    ExportCsv,
}
