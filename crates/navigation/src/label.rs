use catalog::Catalog;

use crate::selection::{ActiveSelection, SelectionSource};

/// Content of the always-visible campus label control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampusLabel {
    pub text: String,
    /// Whether the "open details" affordance is enabled.
    pub can_open_detail: bool,
}

impl CampusLabel {
    pub fn from_selection(selection: &ActiveSelection, catalog: &Catalog) -> Self {
        match selection.selected_name(catalog) {
            Some(name) => {
                let prefix = match selection.source() {
                    Some(SelectionSource::Proximity) => "Nearest",
                    _ => "Selected",
                };
                Self {
                    text: format!("{prefix}: {name}"),
                    can_open_detail: true,
                }
            }
            None => Self {
                text: "Explore the campuses".to_string(),
                can_open_detail: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CampusLabel;
    use crate::selection::{ActiveSelection, SelectionSource};
    use catalog::{CampusRecord, Catalog};

    #[test]
    fn label_follows_selection_source() {
        let c = Catalog::from_records(vec![CampusRecord::new("A", 0.0, 0.0)]).unwrap();
        let mut sel = ActiveSelection::new();
        assert!(!CampusLabel::from_selection(&sel, &c).can_open_detail);

        let a = c.find_by_name("A").unwrap();
        sel.set(a, SelectionSource::Proximity);
        assert_eq!(CampusLabel::from_selection(&sel, &c).text, "Nearest: A");

        sel.set(a, SelectionSource::Marker);
        let label = CampusLabel::from_selection(&sel, &c);
        assert_eq!(label.text, "Selected: A");
        assert!(label.can_open_detail);
    }
}
