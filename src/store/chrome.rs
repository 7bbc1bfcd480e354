use chrono::{Datelike, Local};
use serde::Serialize;

/// Footer and navigation state. Nothing here depends on the menu data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageChrome {
    pub year: i32,
    pub mobile_menu_open: bool,
}

impl PageChrome {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            mobile_menu_open: false,
        }
    }

    /// Stamps the footer with the current local year.
    pub fn current() -> Self {
        Self::new(Local::now().year())
    }

    /// Menu button: opens or closes the mobile menu and its overlay together.
    pub fn toggle_mobile_menu(&mut self) {
        self.mobile_menu_open = !self.mobile_menu_open;
    }

    /// Overlay click.
    pub fn close_mobile_menu(&mut self) {
        self.mobile_menu_open = false;
    }
}
