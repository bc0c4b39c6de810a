use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::table::table_grid;
use crate::state::{AppState, Tab};

/// Rows shown under the table list after a table is selected.
const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        if ui
            .selectable_label(state.tab == Tab::Menu, "Main Menu")
            .clicked()
        {
            state.tab = Tab::Menu;
        }

        ui.separator();

        match (state.session.table_name(), state.session.table()) {
            (Some(name), Some(table)) => {
                ui.label(format!(
                    "{name}: {} rows, {} columns",
                    table.len(),
                    table.columns().len()
                ));
            }
            _ => {
                ui.label("No table loaded");
            }
        }

        ui.separator();

        let theme_label = if state.dark_mode { "Light theme" } else { "Dark theme" };
        if ui.button(theme_label).clicked() {
            state.dark_mode = !state.dark_mode;
        }

        if state.is_loading() {
            ui.spinner();
        }

        if let Some(status) = &state.status {
            let color = if status.is_error { Color32::RED } else { ui.visuals().text_color() };
            ui.label(RichText::new(&status.message).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Main menu
// ---------------------------------------------------------------------------

pub fn main_menu(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        ui.heading("Main Menu");
        ui.add_space(20.0);

        if ui.button("Load Data").clicked() {
            state.tab = Tab::Load;
        }
        ui.add_space(10.0);
        if ui.button("Select Data").clicked() {
            state.refresh_cache_files();
            state.tab = Tab::Select;
        }
        ui.add_space(10.0);
        if ui.button("Generate Report").clicked() {
            state.tab = Tab::Report;
        }
    });
}

// ---------------------------------------------------------------------------
// Load Data – convert a spreadsheet into cache files
// ---------------------------------------------------------------------------

pub fn load_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Load Data");
    ui.label("Every sheet except the first is saved as a cached table.");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Spreadsheet:");
        ui.text_edit_singleline(&mut state.workbook_input);
        if ui.button("Browse…").clicked() {
            open_workbook_dialog(state);
        }
    });

    ui.label(format!("Cache directory: {}", state.config.data_dir.display()));

    let idle = !state.is_loading();
    if ui
        .add_enabled(idle, egui::Button::new("Convert to cache"))
        .clicked()
    {
        state.start_conversion();
    }
}

fn open_workbook_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open spreadsheet")
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .pick_file();

    if let Some(path) = file {
        state.workbook_input = path.display().to_string();
    }
}

// ---------------------------------------------------------------------------
// Select Data – pick one cached table
// ---------------------------------------------------------------------------

pub fn select_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Select Data");
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Cached tables in {}", state.config.data_dir.display()));
        if ui.small_button("Refresh").clicked() {
            state.refresh_cache_files();
        }
    });
    ui.separator();

    if state.cache_files.is_empty() {
        ui.label("No cached tables. Use Load Data first.");
        return;
    }

    let current = state.session.table_name();
    let mut chosen = None;
    ScrollArea::vertical()
        .id_salt("cache_files")
        .max_height(200.0)
        .show(ui, |ui: &mut Ui| {
            for (name, path) in &state.cache_files {
                let selected = current.as_deref() == Some(name.as_str());
                if ui.selectable_label(selected, name).clicked() {
                    chosen = Some(path.clone());
                }
            }
        });

    if let Some(path) = chosen {
        state.select_table(&path);
    }

    if let Some(table) = state.session.table() {
        ui.separator();
        ui.strong("First rows");
        let rows: Vec<usize> = (0..table.len().min(PREVIEW_ROWS)).collect();
        if let Ok(head) = table.select(&rows, &table.column_names()) {
            table_grid(ui, "preview", &head);
        }
    }
}
