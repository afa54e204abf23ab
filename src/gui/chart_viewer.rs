//! Chart Viewer Widget
//! Central panel showing the favourites scatter, the country time series
//! with its selection menu, or the raw votes table.

use crate::charts::{ChartPlotter, FavouriteScatter};
use crate::gui::control_panel::Tab;
use egui::{ComboBox, RichText, ScrollArea};
use eurovision_dash::data::{CountryYearTotal, ProcessorError, VoteProcessor, VoteTables};
use polars::prelude::*;

const ROW_HEIGHT: f32 = 18.0;

/// Per-view state derived from the current tables.
#[derive(Default)]
pub struct ChartViewer {
    scatter: FavouriteScatter,
    selected_country: String,
    country_frame: Option<DataFrame>,
    country_rows: Vec<CountryYearTotal>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every view from freshly loaded tables, keeping the selected
    /// country when it still exists.
    pub fn set_tables(&mut self, tables: &VoteTables) -> Result<(), ProcessorError> {
        let favourites = VoteProcessor::favourite_rows(&tables.favourites)?;
        self.scatter = FavouriteScatter::new(&favourites);

        let country = if tables.countries.contains(&self.selected_country) {
            self.selected_country.clone()
        } else {
            tables.default_country().unwrap_or_default().to_string()
        };
        self.select_country(tables, &country)
    }

    pub fn select_country(
        &mut self,
        tables: &VoteTables,
        country: &str,
    ) -> Result<(), ProcessorError> {
        let frame = tables.country_totals(country)?;
        self.country_rows = VoteProcessor::country_total_rows(&frame)?;
        self.country_frame = Some(frame);
        self.selected_country = country.to_string();
        Ok(())
    }

    /// Table behind `tab`, for export.
    pub fn frame_for<'a>(&'a self, tab: Tab, tables: &'a VoteTables) -> Option<&'a DataFrame> {
        match tab {
            Tab::Favourites => Some(&tables.favourites),
            Tab::Country => self.country_frame.as_ref(),
            Tab::Raw => Some(&tables.votes),
        }
    }

    /// Draw the active tab. Returns the newly chosen country, if the menu
    /// selection changed.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        tab: Tab,
        tables: Option<&VoteTables>,
    ) -> Option<String> {
        let Some(tables) = tables else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return None;
        };

        match tab {
            Tab::Favourites => {
                ChartPlotter::draw_favourites_chart(ui, &self.scatter);
                None
            }
            Tab::Country => self.show_country(ui, tables),
            Tab::Raw => {
                Self::show_table(ui, &tables.votes);
                None
            }
        }
    }

    fn show_country(&mut self, ui: &mut egui::Ui, tables: &VoteTables) -> Option<String> {
        let mut choice = self.selected_country.clone();

        ComboBox::from_label("Choose a country")
            .selected_text(choice.as_str())
            .show_ui(ui, |ui| {
                for country in &tables.countries {
                    ui.selectable_value(&mut choice, country.clone(), country.as_str());
                }
            });
        ui.add_space(8.0);

        ui.columns(2, |columns| {
            ChartPlotter::draw_country_chart(
                &mut columns[0],
                &self.selected_country,
                &self.country_rows,
            );
            if let Some(frame) = &self.country_frame {
                Self::show_table(&mut columns[1], frame);
            }
        });

        (choice != self.selected_country).then_some(choice)
    }

    /// Scrollable grid of a frame, rendering only visible rows.
    fn show_table(ui: &mut egui::Ui, df: &DataFrame) {
        let columns = df.get_columns();
        if df.height() == 0 {
            ui.label(RichText::new("No rows").size(14.0));
        }

        ScrollArea::both()
            .auto_shrink([false, false])
            .show_rows(ui, ROW_HEIGHT, df.height() + 1, |ui, row_range| {
                egui::Grid::new(ui.make_persistent_id("votes_table"))
                    .striped(true)
                    .min_col_width(70.0)
                    .show(ui, |ui| {
                        for row in row_range {
                            if row == 0 {
                                for column in columns {
                                    ui.label(RichText::new(column.name().as_str()).strong());
                                }
                            } else {
                                for column in columns {
                                    ui.label(cell_text(column, row - 1));
                                }
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

/// Display text of one cell; nulls are blank.
pub fn cell_text(column: &Column, row: usize) -> String {
    match column.get(row) {
        Ok(value) if !value.is_null() => value.to_string().trim_matches('"').to_string(),
        _ => String::new(),
    }
}
