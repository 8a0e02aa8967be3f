pub mod notification;

pub use notification::{format_notification, render_hunk, NO_NEWLINE_MARKER};
