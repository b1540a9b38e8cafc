use catalog::{CampusId, Catalog};
use serde::Serialize;
use tracing::debug;

/// Where the detail panel's picture comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "camelCase")]
pub enum ImageSource {
    Url(String),
    /// The record has no image, or loading it failed.
    Placeholder(String),
}

impl ImageSource {
    pub fn url(&self) -> &str {
        match self {
            ImageSource::Url(u) | ImageSource::Placeholder(u) => u,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageSource::Placeholder(_))
    }
}

/// Everything the detail panel renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailView {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub image: ImageSource,
}

/// Dismissible panel presenting one campus.
///
/// Dismissing hides the panel but keeps the stored campus, so a later
/// [`DetailPanel::reopen`] shows the same content.
#[derive(Debug, Clone)]
pub struct DetailPanel {
    shown: Option<CampusId>,
    visible: bool,
    image_failed: bool,
    placeholder: String,
}

impl DetailPanel {
    pub fn new(placeholder_image_url: impl Into<String>) -> Self {
        Self {
            shown: None,
            visible: false,
            image_failed: false,
            placeholder: placeholder_image_url.into(),
        }
    }

    pub fn show_detail(&mut self, id: CampusId) {
        self.shown = Some(id);
        self.visible = true;
        self.image_failed = false;
    }

    /// Swaps in the placeholder until the next [`DetailPanel::show_detail`].
    pub fn on_image_load_failure(&mut self) {
        if self.shown.is_some() && !self.image_failed {
            debug!(placeholder = self.placeholder.as_str(), "detail image failed; using placeholder");
            self.image_failed = true;
        }
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Shows the stored campus again. Returns `false` if nothing was stored.
    pub fn reopen(&mut self) -> bool {
        if self.shown.is_none() {
            return false;
        }
        self.visible = true;
        true
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn shown(&self) -> Option<CampusId> {
        self.shown
    }

    pub fn image_failed(&self) -> bool {
        self.image_failed
    }

    /// Renders the stored campus regardless of visibility.
    pub fn view(&self, catalog: &Catalog) -> Option<DetailView> {
        let rec = catalog.get(self.shown?)?;
        let image = match (&rec.image_url, self.image_failed) {
            (Some(url), false) => ImageSource::Url(url.clone()),
            _ => ImageSource::Placeholder(self.placeholder.clone()),
        };
        Some(DetailView {
            name: rec.name.clone(),
            longitude: rec.longitude,
            latitude: rec.latitude,
            address: rec.address.clone(),
            contact_number: rec.contact_number.clone(),
            link: rec.link.clone(),
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DetailPanel, ImageSource};
    use catalog::{CampusRecord, Catalog};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            CampusRecord::new("A", 0.0, 0.0).with_image_url("a.jpg"),
            CampusRecord::new("B", 1.0, 1.0).with_address("1 Road"),
        ])
        .unwrap()
    }

    #[test]
    fn image_failure_sticks_until_next_show() {
        let c = catalog();
        let a = c.find_by_name("A").unwrap();
        let mut panel = DetailPanel::new("ph.svg");

        panel.show_detail(a);
        assert_eq!(panel.view(&c).unwrap().image, ImageSource::Url("a.jpg".into()));

        panel.on_image_load_failure();
        assert_eq!(
            panel.view(&c).unwrap().image,
            ImageSource::Placeholder("ph.svg".into())
        );

        panel.show_detail(a);
        assert!(!panel.image_failed());
        assert_eq!(panel.view(&c).unwrap().image.url(), "a.jpg");
    }

    #[test]
    fn missing_image_uses_placeholder() {
        let c = catalog();
        let mut panel = DetailPanel::new("ph.svg");
        panel.show_detail(c.find_by_name("B").unwrap());
        assert!(panel.view(&c).unwrap().image.is_placeholder());
    }

    #[test]
    fn dismiss_keeps_content() {
        let c = catalog();
        let mut panel = DetailPanel::new("ph.svg");
        assert!(!panel.reopen());

        panel.show_detail(c.find_by_name("B").unwrap());
        panel.dismiss();
        assert!(!panel.is_visible());
        assert_eq!(panel.view(&c).unwrap().name, "B");

        assert!(panel.reopen());
        assert!(panel.is_visible());
    }

    #[test]
    fn view_serializes_camel_case() {
        let c = catalog();
        let mut panel = DetailPanel::new("ph.svg");
        panel.show_detail(c.find_by_name("B").unwrap());
        let v = serde_json::to_value(panel.view(&c).unwrap()).unwrap();
        assert_eq!(
            v,
            json!({
                "name": "B",
                "longitude": 1.0,
                "latitude": 1.0,
                "address": "1 Road",
                "image": { "kind": "placeholder", "url": "ph.svg" },
            })
        );
    }
}
