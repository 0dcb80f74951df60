use egui::{CentralPanel, Frame, ScrollArea, Ui};
use flume::Receiver;
use qrcraft_business::RenderSnapshot;

use crate::state::State;
use crate::widgets::{self, PreviewAction};

pub struct QrCraftApp {
    pub state: State,
    updates: Receiver<RenderSnapshot>,
    /// Latest published render state; the preview draws only from this.
    snapshot: RenderSnapshot,
    waker_installed: bool,
}

impl QrCraftApp {
    /// Called once before the first frame.
    pub fn new(mut state: State) -> Self {
        let updates = state.session.subscribe();
        let snapshot = state.session.snapshot();
        Self {
            state,
            updates,
            snapshot,
            waker_installed: false,
        }
    }

    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }

    /// Keeps the newest of the queued snapshots. Returns whether one arrived.
    fn drain_updates(&mut self) -> bool {
        match self.updates.try_iter().last() {
            Some(latest) => {
                self.snapshot = latest;
                true
            }
            None => false,
        }
    }

    /// Renders one frame. Split from `eframe::App::update` so tests can drive it.
    pub fn ui(&mut self, ctx: &egui::Context) {
        if !self.waker_installed {
            let repaint = ctx.clone();
            self.state.session.set_waker(move || repaint.request_repaint());
            self.waker_installed = true;
        }

        // Apply finished encodes, copies and saves before drawing.
        self.state.session.sync();
        self.drain_updates();

        CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                header(ui);
                ui.add_space(16.0);

                ui.columns(2, |columns| {
                    section(&mut columns[0], "Settings", |ui| {
                        widgets::category_select(&mut self.state.session, ui);
                        ui.add_space(8.0);
                        widgets::content_input(&mut self.state.session, ui);
                    });
                    section(&mut columns[1], "Preview", |ui| {
                        let action =
                            widgets::qr_preview(&self.snapshot, &mut self.state.preview, ui);
                        match action {
                            Some(PreviewAction::Download) => self.state.session.download(),
                            Some(PreviewAction::Copy) => self.state.session.copy_to_clipboard(),
                            None => {}
                        }
                    });
                });
            });
        });

        widgets::toasts(ctx, &self.state.toasts);

        // Input and category changes publish during this frame.
        if self.drain_updates() {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for QrCraftApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}

fn header(ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.heading("QR Code Generator");
        ui.label(
            "Create QR codes for text, links, e-mail addresses, phone numbers and WiFi networks.",
        );
    });
}

fn section(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.strong(title);
        ui.separator();
        add_contents(ui);
    });
}
