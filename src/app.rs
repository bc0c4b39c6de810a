use std::time::Duration;

use eframe::egui;

use crate::config::AppConfig;
use crate::state::{AppState, Tab};
use crate::ui::{panels, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SheetReportApp {
    pub state: AppState,
}

impl SheetReportApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for SheetReportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.state.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        // ---- Background conversion ----
        if self.state.is_loading() {
            self.state.poll_conversion();
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: current tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Menu => panels::main_menu(ui, &mut self.state),
            Tab::Load => panels::load_tab(ui, &mut self.state),
            Tab::Select => panels::select_tab(ui, &mut self.state),
            Tab::Report => report::report_tab(ui, &mut self.state),
        });
    }
}
