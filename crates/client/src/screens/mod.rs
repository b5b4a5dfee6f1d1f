//! Per-screen state and the requests that fill it.
//!
//! A failed request leaves the previous state in place and raises exactly
//! one notice.
//!
//! Requests run on a snapshot of the view. `merge` folds the finished snapshot
//! back into the live view: lists and busy flags come from the request, while
//! any field the user changed in the meantime keeps the user's value.

pub mod dashboard;
pub mod documents;
pub mod meetings;
pub mod messages;

pub use dashboard::{load_dashboard, DashboardView};
pub use documents::{DocumentsView, SelectedFile, UploadForm};
pub use meetings::{
    local_input_value, offset_from_minutes, parse_meeting_time, MeetingForm, MeetingsView,
};
pub use messages::{ComposeForm, MessagesView};

/// Take `after` unless the live value moved away from `before`.
pub(crate) fn keep_edits<T: PartialEq>(live: &mut T, before: &T, after: T) {
    if live == before {
        *live = after;
    }
}
