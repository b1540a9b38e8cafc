//! Read-only campus dataset.
//!
//! A [`Catalog`] is validated once at load time and never mutated afterwards:
//! names are unique and non-empty, coordinates are finite and in range.
//! Iteration always follows dataset order.

use std::collections::HashMap;
use std::path::Path;

use foundation::bounds::LngLatBounds;
use tracing::debug;

mod error;
mod record;

pub use error::CatalogError;
pub use record::{CampusId, CampusRecord};

/// Dataset compiled into every binary.
pub const BUNDLED_CAMPUSES_JSON: &str = include_str!("../data/campuses.json");

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<CampusRecord>,
    by_name: HashMap<String, CampusId>,
}

impl Catalog {
    pub fn from_records(records: Vec<CampusRecord>) -> Result<Self, CatalogError> {
        if records.len() > u32::MAX as usize {
            return Err(CatalogError::TooLarge(records.len()));
        }

        let mut by_name = HashMap::with_capacity(records.len());
        for (index, rec) in records.iter().enumerate() {
            if rec.name.trim().is_empty() {
                return Err(CatalogError::EmptyName { index });
            }
            if !rec.position().is_valid() {
                return Err(CatalogError::InvalidCoordinate {
                    name: rec.name.clone(),
                    longitude: rec.longitude,
                    latitude: rec.latitude,
                });
            }
            if let Some(first) = by_name.insert(rec.name.clone(), CampusId(index as u32)) {
                return Err(CatalogError::DuplicateName {
                    name: rec.name.clone(),
                    first: first.index(),
                    second: index,
                });
            }
        }

        debug!(count = records.len(), "campus catalog loaded");
        Ok(Self { records, by_name })
    }

    /// Parses a JSON array of campus records.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let records: Vec<CampusRecord> = serde_json::from_str(raw)?;
        Self::from_records(records)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_CAMPUSES_JSON)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by id. Ids from another catalog may return `None`.
    pub fn get(&self, id: CampusId) -> Option<&CampusRecord> {
        self.records.get(id.index())
    }

    /// Exact, case-sensitive name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<CampusId> {
        self.by_name.get(name).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = CampusId> + '_ {
        (0..self.records.len()).map(|i| CampusId(i as u32))
    }

    /// Iterates records in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (CampusId, &CampusRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (CampusId(i as u32), r))
    }

    pub fn records(&self) -> &[CampusRecord] {
        &self.records
    }

    pub fn bounds(&self) -> Option<LngLatBounds> {
        LngLatBounds::from_points(self.records.iter().map(CampusRecord::position))
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, CampusRecord};
    use foundation::math::LngLat;
    use pretty_assertions::assert_eq;

    #[test]
    fn bundled_dataset_is_valid() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.len(), 8);
        let main = catalog
            .find_by_name(
                "SRM Institute of Science and Technology (Main Campus - Kattankulathur, Chennai)",
            )
            .unwrap();
        assert_eq!(main.index(), 0);
        assert_eq!(
            catalog.get(main).unwrap().position(),
            LngLat::new(80.0439, 12.8239)
        );
    }

    #[test]
    fn preserves_dataset_order() {
        let catalog = Catalog::from_records(vec![
            CampusRecord::new("B", 1.0, 1.0),
            CampusRecord::new("A", 0.0, 0.0),
        ])
        .unwrap();
        let names: Vec<&str> = catalog.iter().map(|(_, r)| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        let ids: Vec<usize> = catalog.ids().map(|id| id.index()).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Catalog::from_records(vec![
            CampusRecord::new("A", 0.0, 0.0),
            CampusRecord::new("B", 1.0, 1.0),
            CampusRecord::new("A", 2.0, 2.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateName {
                name: "A".to_string(),
                first: 0,
                second: 2,
            }
        );
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let err = Catalog::from_records(vec![CampusRecord::new("Far", 181.0, 0.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCoordinate { .. }));

        let err = Catalog::from_records(vec![CampusRecord::new("Pole", 0.0, 91.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCoordinate { .. }));
    }

    #[test]
    fn rejects_blank_names() {
        let err = Catalog::from_records(vec![
            CampusRecord::new("ok", 0.0, 0.0),
            CampusRecord::new("  ", 0.0, 0.0),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::EmptyName { index: 1 });
    }

    #[test]
    fn reports_parse_errors() {
        let err = Catalog::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));

        let err = Catalog::from_json_str(r#"[{"name": "A"}]"#).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn name_lookup_is_exact() {
        let catalog = Catalog::from_records(vec![CampusRecord::new("Alpha", 0.0, 0.0)]).unwrap();
        assert!(catalog.find_by_name("Alpha").is_some());
        assert!(catalog.find_by_name("alpha").is_none());
        assert!(catalog.find_by_name("Alph").is_none());
    }

    #[test]
    fn empty_catalog_has_no_bounds() {
        let catalog = Catalog::from_json_str("[]").unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.bounds().is_none());
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campuses.json");
        std::fs::write(&path, r#"[{"name":"A","latitude":1.0,"longitude":2.0}]"#).unwrap();
        let catalog = Catalog::from_path(&path).unwrap();
        assert_eq!(catalog.len(), 1);

        let err = Catalog::from_path(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
