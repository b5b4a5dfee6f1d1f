use client::{NoticeLevel, Notifications};
use shared_ui::{ToastOptions, Toasts};

use crate::auth::AuthState;

/// Show every pending notice as a toast, and end the session if a request
/// came back 401.
pub fn settle(auth: AuthState, toast: Toasts, pending: &mut Notifications) {
    if pending.session_expired() {
        auth.expire();
    }
    for notice in pending.drain() {
        match notice.level {
            NoticeLevel::Success => toast.success(notice.message, ToastOptions::new()),
            NoticeLevel::Info => toast.info(notice.message, ToastOptions::new()),
            NoticeLevel::Error => toast.error(notice.message, ToastOptions::new()),
        }
    }
}
