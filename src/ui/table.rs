use eframe::egui::Ui;
use egui_extras::{Column as GridColumn, TableBuilder};

use crate::data::model::Table;

/// Render a table as a scrollable grid. Cells show their textual form.
pub fn table_grid(ui: &mut Ui, id: &str, table: &Table) {
    let columns = table.columns();
    if columns.is_empty() {
        ui.label("(no columns)");
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(GridColumn::auto().at_least(60.0), columns.len())
            .header(20.0, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(&col.name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.len(), |mut row| {
                    let r = row.index();
                    for col in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(col.values[r].to_string());
                        });
                    }
                });
            });
    });
}
