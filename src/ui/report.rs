use eframe::egui::{self, ScrollArea, TextEdit, Ui};

use super::plot::{distribution_chart, scatter_plot};
use super::table::table_grid;
use crate::data::chart::ChartKind;
use crate::data::model::Table;
use crate::data::pivot::Aggregation;
use crate::state::{AppState, ReportForm, ReportOutput};

// ---------------------------------------------------------------------------
// Generate Report tab
// ---------------------------------------------------------------------------

/// Left column: selections and buttons. Right: the last output.
pub fn report_tab(ui: &mut Ui, state: &mut AppState) {
    if state.session.table().is_none() {
        ui.label("No table loaded. Use Select Data first.");
        return;
    }

    ui.columns(2, |cols| {
        ScrollArea::vertical()
            .id_salt("report_selections")
            .show(&mut cols[0], |ui: &mut Ui| {
                selections(ui, state);
                ui.separator();
                buttons(ui, state);
            });
        output(&mut cols[1], state);
    });

    if state.form.is_some() {
        form_window(ui.ctx(), state);
    }
}

fn selections(ui: &mut Ui, state: &mut AppState) {
    let columns = state.column_names();

    ui.strong("Filter columns");
    for col in &columns {
        let mut checked = state.filter_columns.contains(col);
        if ui.checkbox(&mut checked, col).changed() {
            state.toggle_filter_column(col);
        }
    }

    // Value choice per filter column, in the order the columns were picked.
    for col in state.filter_columns.clone() {
        let choices = state.filter_choices(&col);
        let current = state.filter_values.get(&col).cloned().unwrap_or_default();
        ui.horizontal(|ui: &mut Ui| {
            ui.label(format!("Value for {col}:"));
            egui::ComboBox::from_id_salt(("filter_value", &col))
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for choice in &choices {
                        if ui.selectable_label(*choice == current, choice).clicked() {
                            state.set_filter_value(&col, choice.clone());
                        }
                    }
                });
        });
    }

    ui.separator();
    ui.strong("Display columns");
    for col in &columns {
        let mut checked = state.display_columns.contains(col);
        if ui.checkbox(&mut checked, col).changed() {
            state.toggle_display_column(col);
        }
    }
}

fn buttons(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        if ui.button("Text Report").clicked() {
            state.run_text_report();
        }
        for kind in [ChartKind::Scatter, ChartKind::Pie, ChartKind::Bar] {
            if ui.button(kind.title()).clicked() {
                state.form = Some(ReportForm::chart(kind));
            }
        }
        if ui.button("Pivot Table").clicked() {
            state.form = Some(ReportForm::pivot());
        }
        let can_export = state
            .output
            .as_ref()
            .and_then(ReportOutput::table)
            .is_some();
        if ui
            .add_enabled(can_export, egui::Button::new("Export CSV"))
            .clicked()
        {
            export_dialog(state);
        }
    });
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export report")
        .add_filter("CSV", &["csv"])
        .set_file_name("report.csv")
        .save_file();

    if let Some(path) = file {
        state.export_output(&path);
    }
}

fn output(ui: &mut Ui, state: &AppState) {
    let Some(out) = &state.output else {
        ui.label("Choose filters and display columns, then pick a report.");
        return;
    };

    match out {
        ReportOutput::Text { table, text } => {
            ui.heading("Report");
            if table.is_empty() {
                ui.label(text.as_str());
            } else {
                text_and_grid(ui, "text_report", table, text);
            }
        }
        ReportOutput::Pivot { pivot, table, text } => {
            ui.heading(format!(
                "Pivot: {} × {}",
                pivot.index_name, pivot.columns_name
            ));
            text_and_grid(ui, "pivot_report", table, text);
        }
        ReportOutput::Scatter(data) => scatter_plot(ui, data),
        ReportOutput::Distribution { kind, data } => distribution_chart(ui, *kind, data),
    }
}

fn text_and_grid(ui: &mut Ui, id: &str, table: &Table, text: &str) {
    egui::CollapsingHeader::new("Text")
        .id_salt((id, "text"))
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ScrollArea::both()
                .id_salt((id, "scroll"))
                .max_height(240.0)
                .show(ui, |ui: &mut Ui| {
                    ui.add(TextEdit::multiline(&mut &*text).code_editor());
                });
        });
    table_grid(ui, id, table);
}

// ---------------------------------------------------------------------------
// Selection forms
// ---------------------------------------------------------------------------

fn column_combo(ui: &mut Ui, id: &str, label: &str, columns: &[String], value: &mut String) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(value.as_str())
            .show_ui(ui, |ui: &mut Ui| {
                for col in columns {
                    ui.selectable_value(value, col.clone(), col);
                }
            });
    });
}

fn form_window(ctx: &egui::Context, state: &mut AppState) {
    let columns = state.column_names();
    let Some(form) = state.form.as_mut() else {
        return;
    };

    let title = match form {
        ReportForm::Chart { kind, .. } => kind.title(),
        ReportForm::Pivot { .. } => "Pivot Table",
    };

    let mut submit = false;
    let mut cancel = false;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui: &mut Ui| {
            match form {
                ReportForm::Chart { kind, columns: chosen } => {
                    let labels: &[&str] = match kind {
                        ChartKind::Scatter => &["X column:", "Y column:"],
                        _ => &["Column:"],
                    };
                    for (i, (label, value)) in labels.iter().zip(chosen.iter_mut()).enumerate() {
                        column_combo(ui, &format!("chart_col_{i}"), label, &columns, value);
                    }
                }
                ReportForm::Pivot {
                    index,
                    columns: column_axis,
                    values,
                    aggregation,
                } => {
                    column_combo(ui, "pivot_index", "Rows (index):", &columns, index);
                    column_combo(ui, "pivot_columns", "Columns:", &columns, column_axis);

                    let mut use_values = values.is_some();
                    if ui.checkbox(&mut use_values, "Aggregate a values column").changed() {
                        *values = use_values.then(String::new);
                    }
                    if let Some(v) = values {
                        column_combo(ui, "pivot_values", "Values:", &columns, v);
                    }

                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("Aggregation:");
                        ui.text_edit_singleline(aggregation);
                    });
                    let names: Vec<&str> = Aggregation::ALL.iter().map(|a| a.name()).collect();
                    ui.small(format!("One of: {}", names.join(", ")));
                }
            }

            ui.horizontal(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    submit = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    if cancel {
        state.form = None;
    } else if submit {
        state.submit_form();
    }
}
