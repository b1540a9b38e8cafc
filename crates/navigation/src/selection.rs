use catalog::{CampusId, CampusRecord, Catalog};

/// How the active campus was chosen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectionSource {
    Search,
    Marker,
    Proximity,
}

impl SelectionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionSource::Search => "search",
            SelectionSource::Marker => "marker",
            SelectionSource::Proximity => "proximity",
        }
    }
}

/// The campus currently considered "focused", shared by navigation and
/// presentation.
///
/// Holds a [`CampusId`] rather than a name, so it can only point at a record
/// that exists in the catalog it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSelection {
    selected: Option<CampusId>,
    source: Option<SelectionSource>,
    revision: u64,
}

impl ActiveSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the active campus. Always bumps the revision, even when `id` is
    /// already selected.
    ///
    /// Returns `true` if the selected campus changed.
    pub fn set(&mut self, id: CampusId, source: SelectionSource) -> bool {
        let changed = self.selected != Some(id);
        self.selected = Some(id);
        self.source = Some(source);
        self.revision += 1;
        changed
    }

    pub fn selected(&self) -> Option<CampusId> {
        self.selected
    }

    pub fn source(&self) -> Option<SelectionSource> {
        self.source
    }

    /// Number of updates applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn record<'a>(&self, catalog: &'a Catalog) -> Option<&'a CampusRecord> {
        self.selected.and_then(|id| catalog.get(id))
    }

    pub fn selected_name<'a>(&self, catalog: &'a Catalog) -> Option<&'a str> {
        self.record(catalog).map(|r| r.name.as_str())
    }
}
