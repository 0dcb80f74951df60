//! Transient notifications shown in the bottom-right corner.
//!
//! [`ToastQueue`] is the session's [`NotificationSink`]; [`toasts`] renders
//! whatever is queued. A toast's lifetime starts the first frame it is drawn.

use std::collections::VecDeque;
use std::sync::Mutex;

use egui::{Align2, Context, Frame, Id, RichText};
use qrcraft_business::{Notification, NotificationSink};

use crate::utils::colors::COLOR_RED;

/// Seconds a toast stays visible once shown.
pub const TOAST_LIFETIME: f64 = 5.0;

/// Older toasts are dropped beyond this many.
pub const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
    shown_at: Option<f64>,
}

#[derive(Debug, Default)]
struct ToastList {
    next_id: u64,
    toasts: VecDeque<Toast>,
}

#[derive(Debug, Default)]
pub struct ToastQueue {
    inner: Mutex<ToastList>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notification: Notification) {
        let Ok(mut list) = self.inner.lock() else {
            return;
        };
        let id = list.next_id;
        list.next_id += 1;
        list.toasts.push_back(Toast {
            id,
            notification,
            shown_at: None,
        });
        while list.toasts.len() > MAX_TOASTS {
            list.toasts.pop_front();
        }
    }

    pub fn dismiss(&self, id: u64) {
        if let Ok(mut list) = self.inner.lock() {
            list.toasts.retain(|toast| toast.id != id);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|list| list.toasts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queued notifications, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .map(|list| {
                list.toasts
                    .iter()
                    .map(|toast| toast.notification.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Drops expired toasts and stamps new ones with `now`.
    ///
    /// Returns the toasts to draw and the seconds until the next one expires.
    pub fn visible(&self, now: f64) -> (Vec<Toast>, Option<f64>) {
        let Ok(mut list) = self.inner.lock() else {
            return (Vec::new(), None);
        };

        list.toasts
            .retain(|toast| toast.shown_at.is_none_or(|at| now - at < TOAST_LIFETIME));

        let mut next_expiry: Option<f64> = None;
        for toast in list.toasts.iter_mut() {
            let shown_at = *toast.shown_at.get_or_insert(now);
            let remaining = TOAST_LIFETIME - (now - shown_at);
            next_expiry = Some(next_expiry.map_or(remaining, |t| t.min(remaining)));
        }

        (list.toasts.iter().cloned().collect(), next_expiry)
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&self, notification: Notification) {
        log::debug!("Toast: {}", notification.title);
        self.push(notification);
    }
}

/// Draws the queued toasts and schedules a repaint for the next expiry.
pub fn toasts(ctx: &Context, queue: &ToastQueue) {
    let now = ctx.input(|i| i.time);
    let (visible, next_expiry) = queue.visible(now);
    if visible.is_empty() {
        return;
    }

    egui::Area::new(Id::new("toasts"))
        .anchor(Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for toast in &visible {
                let fill = if toast.notification.is_destructive() {
                    COLOR_RED
                } else {
                    ui.visuals().window_fill
                };
                let text_color = toast
                    .notification
                    .is_destructive()
                    .then_some(egui::Color32::WHITE);

                Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                    ui.set_max_width(280.0);
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            let mut title = RichText::new(&toast.notification.title).strong();
                            let mut description = RichText::new(&toast.notification.description);
                            if let Some(color) = text_color {
                                title = title.color(color);
                                description = description.color(color);
                            }
                            ui.label(title);
                            ui.label(description);
                        });
                        if ui.small_button("✕").clicked() {
                            queue.dismiss(toast.id);
                        }
                    });
                });
                ui.add_space(8.0);
            }
        });

    if let Some(seconds) = next_expiry {
        ctx.request_repaint_after(std::time::Duration::from_secs_f64(seconds.max(0.0)));
    }
}
