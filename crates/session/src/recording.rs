//! In-process engine double that records every call.
//!
//! Used by unit tests and by the headless `campus replay` command. Camera
//! moves are applied instantly, so `center()` reflects the last fly-to.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use foundation::math::LngLat;
use layers::{ControlSpec, LayerId, MarkerHandle, MarkerSpec, PopupSpec, StyleLayer};

use crate::camera::FlyTo;
use crate::engine::{EngineError, EngineFactory, MapEngine, MapOptions, MountPoint};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Create { mount: String, center: LngLat, zoom: f64 },
    AddLayer(String),
    AddControl(&'static str),
    AddMarker { title: String, position: LngLat },
    FlyTo(FlyTo),
    Resize,
    ShowPopup(LngLat),
    Teardown,
}

/// Shared, clonable call log.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<EngineCall>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: EngineCall) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.0.borrow().clone()
    }

    pub fn fly_tos(&self) -> Vec<FlyTo> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                EngineCall::FlyTo(f) => Some(*f),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&EngineCall) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

#[derive(Debug)]
pub struct RecordingEngine {
    log: CallLog,
    center: LngLat,
    layers: BTreeSet<LayerId>,
    next_marker: u32,
}

impl RecordingEngine {
    /// Simulates the user panning the map without an animation.
    pub fn set_center(&mut self, center: LngLat) {
        self.center = center;
    }

    /// Simulates a style reload, which drops every custom layer.
    pub fn reload_style(&mut self) {
        self.layers.clear();
    }

    pub fn layer_ids(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.0.clone()).collect()
    }
}

impl MapEngine for RecordingEngine {
    fn add_layer(&mut self, layer: &dyn StyleLayer) -> Result<(), EngineError> {
        let id = layer.id();
        if !self.layers.insert(id.clone()) {
            return Err(EngineError::Rejected {
                what: format!("layer {id}"),
                reason: "already exists".to_string(),
            });
        }
        self.log.push(EngineCall::AddLayer(id.0));
        Ok(())
    }

    fn has_layer(&self, id: &LayerId) -> bool {
        self.layers.contains(id)
    }

    fn add_control(&mut self, control: &ControlSpec) -> Result<(), EngineError> {
        self.log.push(EngineCall::AddControl(control.kind()));
        Ok(())
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<MarkerHandle, EngineError> {
        let handle = MarkerHandle(self.next_marker);
        self.next_marker += 1;
        self.log.push(EngineCall::AddMarker {
            title: marker.title.clone(),
            position: marker.position,
        });
        Ok(handle)
    }

    fn fly_to(&mut self, command: &FlyTo) {
        self.center = command.center;
        self.log.push(EngineCall::FlyTo(*command));
    }

    fn center(&self) -> LngLat {
        self.center
    }

    fn resize(&mut self) {
        self.log.push(EngineCall::Resize);
    }

    fn show_popup(&mut self, popup: &PopupSpec) -> Result<(), EngineError> {
        self.log.push(EngineCall::ShowPopup(popup.position));
        Ok(())
    }

    fn teardown(&mut self) {
        self.layers.clear();
        self.log.push(EngineCall::Teardown);
    }
}

/// Factory for [`RecordingEngine`]s sharing one [`CallLog`].
#[derive(Debug, Default)]
pub struct RecordingFactory {
    log: CallLog,
    fail_next: Option<String>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Makes the next `create` fail with `reason`.
    pub fn fail_next(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }
}

impl EngineFactory for RecordingFactory {
    type Engine = RecordingEngine;

    fn create(
        &mut self,
        mount: &MountPoint,
        options: &MapOptions,
    ) -> Result<RecordingEngine, EngineError> {
        if let Some(reason) = self.fail_next.take() {
            return Err(EngineError::Init(reason));
        }
        self.log.push(EngineCall::Create {
            mount: mount.0.clone(),
            center: options.center,
            zoom: options.zoom,
        });
        Ok(RecordingEngine {
            log: self.log.clone(),
            center: options.center,
            layers: BTreeSet::new(),
            next_marker: 0,
        })
    }
}
