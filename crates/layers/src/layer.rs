#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub String);

impl LayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A style layer that can be appended to the engine's style after it loads.
pub trait StyleLayer {
    fn id(&self) -> LayerId;

    /// Layer object in Mapbox style-spec form.
    fn to_style_json(&self) -> serde_json::Value;
}
