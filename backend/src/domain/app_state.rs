//! # Application State
//!
//! Presentation state of the tracker (active tab, history filter, add-modal
//! visibility, pending notification) as one explicit object. Front ends hold
//! a single `AppState` and change it only through the transition methods
//! below; the stored data is never touched from here.

use shared::TimeFilter;

/// Top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    History,
    Budget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A dismissable message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    active_tab: Tab,
    time_filter: TimeFilter,
    show_add_modal: bool,
    notification: Option<Notification>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn time_filter(&self) -> TimeFilter {
        self.time_filter
    }

    pub fn is_add_modal_open(&self) -> bool {
        self.show_add_modal
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Change the history filter. The filter survives tab switches.
    pub fn select_time_filter(&mut self, filter: TimeFilter) {
        self.time_filter = filter;
    }

    pub fn open_add_modal(&mut self) {
        self.show_add_modal = true;
    }

    pub fn close_add_modal(&mut self) {
        self.show_add_modal = false;
    }

    /// A transaction was stored: the add modal closes
    pub fn transaction_added(&mut self) {
        self.show_add_modal = false;
    }

    /// Show `message`, replacing any notification still on screen
    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notification = Some(Notification {
            level,
            message: message.into(),
        });
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }
}
