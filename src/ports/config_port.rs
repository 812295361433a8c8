//! Configuration access port trait.

use chrono::NaiveDate;

/// Sectioned key/value settings, as read from an INI file.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// `YYYY-MM-DD` value. `None` when missing or unparseable.
    fn get_date(&self, section: &str, key: &str) -> Option<NaiveDate> {
        self.get_string(section, key)
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
    }

    /// Keys present in `section`, in no particular order.
    fn keys(&self, section: &str) -> Vec<String>;
}
