//! Building filter state driving occupancy re-aggregation.
//!
//! The filter is a checkbox map the browser mirrors: one boolean per
//! building code, seeded all-off from the first successful building-names
//! fetch. Its active list is what gets sent upstream as the `buildings`
//! query parameter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Synthetic key the upstream building directory uses for its "select all"
/// row. Never a real building code and never sent upstream.
pub const SELECT_ALL_KEY: &str = "";

/// Checkbox state for the building filter, insertion-ordered to match the
/// upstream directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingFilter {
    selected: IndexMap<String, bool>,
}

impl BuildingFilter {
    /// Seed an all-off filter from the directory's building codes.
    ///
    /// The select-all sentinel and the policy-excluded code (the off-campus
    /// building, supplied via configuration) are dropped from the selectable
    /// set entirely.
    pub fn from_codes<I, S>(codes: I, excluded: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selected = codes
            .into_iter()
            .map(Into::into)
            .filter(|code| code != SELECT_ALL_KEY && Some(code.as_str()) != excluded)
            .map(|code| (code, false))
            .collect();
        Self { selected }
    }

    /// Flip exactly one building's checkbox; every other key is untouched.
    /// Unknown codes are ignored.
    pub fn toggle(&mut self, code: &str) {
        if let Some(on) = self.selected.get_mut(code) {
            *on = !*on;
        }
    }

    /// Bulk toggle: if anything is selected, clear everything; otherwise
    /// select everything. Two consecutive calls with no toggles in between
    /// land back on the original all-on or all-off state.
    pub fn toggle_select_all(&mut self) {
        let any_on = self.selected.values().any(|&on| on);
        for on in self.selected.values_mut() {
            *on = !any_on;
        }
    }

    /// Currently selected codes in directory order, ready to use verbatim as
    /// the upstream filter parameter.
    pub fn active_list(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter(|&(_, &on)| on)
            .map(|(code, _)| code.clone())
            .collect()
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.get(code).copied().unwrap_or(false)
    }

    /// All selectable codes in directory order, regardless of state.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.selected.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campus_filter() -> BuildingFilter {
        BuildingFilter::from_codes(
            ["", "CENG", "FSCT", "OCON", "OFCP", "SIMP"],
            Some("OFCP"),
        )
    }

    #[test]
    fn sentinel_and_excluded_codes_are_not_selectable() {
        let mut filter = campus_filter();
        filter.toggle(SELECT_ALL_KEY);
        filter.toggle("OFCP");
        assert!(filter.active_list().is_empty());

        filter.toggle_select_all();
        assert_eq!(filter.active_list(), ["CENG", "FSCT", "OCON", "SIMP"]);
    }

    #[test]
    fn toggle_flips_exactly_one_key() {
        let mut filter = campus_filter();
        filter.toggle("FSCT");
        assert_eq!(filter.active_list(), ["FSCT"]);
        filter.toggle("FSCT");
        assert!(filter.active_list().is_empty());
    }

    #[test]
    fn select_all_clears_when_anything_is_on() {
        let mut filter = campus_filter();
        filter.toggle("CENG");
        filter.toggle_select_all();
        assert!(filter.active_list().is_empty());
    }

    #[test]
    fn double_select_all_is_deterministic() {
        let mut filter = campus_filter();
        filter.toggle_select_all();
        let all_on = filter.clone();
        filter.toggle_select_all();
        filter.toggle_select_all();
        assert_eq!(filter, all_on);

        let mut filter = campus_filter();
        let all_off = filter.clone();
        filter.toggle_select_all();
        filter.toggle_select_all();
        assert_ne!(filter, all_on);
        assert_eq!(filter.active_list(), all_off.active_list());
    }

    #[test]
    fn active_list_preserves_directory_order() {
        let mut filter = campus_filter();
        filter.toggle("SIMP");
        filter.toggle("CENG");
        assert_eq!(filter.active_list(), ["CENG", "SIMP"]);
    }
}
