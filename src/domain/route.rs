//! URL path to page mapping.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    About,
    Forecasting,
}

impl Page {
    /// `/forecasting` selects the forecasting page; every other path,
    /// including unknown ones, falls back to About.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/forecasting" => Page::Forecasting,
            _ => Page::About,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::About => "About",
            Page::Forecasting => "Forecasting",
        }
    }
}
