//! Drives a [`CampusViewer`] against the recording engine from a script.
//!
//! Time only advances on `wait`, so a replay is fully deterministic: the
//! same script and dataset always produce the same event trail.

use catalog::Catalog;
use navigation::{CampusViewer, NavigationError};
use runtime::event_bus::Event;
use session::{RecordingFactory, ViewerConfig};
use tracing::debug;

use crate::script::{ScriptCommand, ScriptStep};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("viewer failed to start: {0}")]
    Start(#[source] NavigationError),
    #[error("line {line}: {source}")]
    Step {
        line: usize,
        #[source]
        source: NavigationError,
    },
}

pub struct Replay {
    viewer: CampusViewer<RecordingFactory>,
    clock_ms: f64,
}

impl Replay {
    /// Starts the viewer and delivers the first style load.
    pub fn start(catalog: Catalog, config: ViewerConfig) -> Result<Self, ReplayError> {
        let mut viewer = CampusViewer::new(catalog, RecordingFactory::new(), config);
        viewer.start().map_err(ReplayError::Start)?;
        let load = viewer.on_style_loaded().map_err(ReplayError::Start)?;
        if load.resize_after_ms.is_some() {
            viewer.resize();
        }
        Ok(Self {
            viewer,
            clock_ms: 0.0,
        })
    }

    pub fn viewer(&self) -> &CampusViewer<RecordingFactory> {
        &self.viewer
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Applies one step. A rejected submit is part of the trail, not an error.
    pub fn step(&mut self, step: &ScriptStep) -> Result<(), ReplayError> {
        let fail = |source| ReplayError::Step {
            line: step.line,
            source,
        };
        debug!(line = step.line, command = ?step.command, "replay step");
        match &step.command {
            ScriptCommand::Focus => self.viewer.on_focus(),
            ScriptCommand::Blur => {
                self.viewer.on_blur(self.clock_ms);
            }
            ScriptCommand::Type(text) => self.viewer.on_query_change(text),
            ScriptCommand::Click(name) => {
                self.viewer.confirm_by_name(name).map_err(fail)?;
            }
            ScriptCommand::Submit => match self.viewer.submit_query() {
                Ok(_) | Err(NavigationError::InvalidSearch { .. }) => {}
                Err(e) => return Err(fail(e)),
            },
            ScriptCommand::Move(center) => {
                if let Some(engine) = self.viewer.session_mut().engine_mut() {
                    engine.set_center(*center);
                }
                self.viewer.on_move_end();
            }
            ScriptCommand::Marker(name) => {
                let unknown = || NavigationError::UnknownCampus(name.clone());
                let id = self
                    .viewer
                    .catalog()
                    .find_by_name(name)
                    .ok_or_else(unknown)
                    .map_err(fail)?;
                let handle = self.viewer.marker_for(id).ok_or_else(unknown).map_err(fail)?;
                self.viewer.on_marker_click(handle).map_err(fail)?;
            }
            ScriptCommand::Wait(ms) => {
                self.clock_ms += ms;
                self.viewer.poll_timers(self.clock_ms, false);
            }
        }
        Ok(())
    }

    /// Runs every step and returns the recorded trail. The viewer's bus is
    /// drained after each step so long scripts lose nothing to eviction.
    pub fn run(mut self, steps: &[ScriptStep]) -> Result<Vec<Event>, ReplayError> {
        let mut trail = self.viewer.drain_events();
        for step in steps {
            self.step(step)?;
            trail.extend(self.viewer.drain_events());
        }
        Ok(trail)
    }
}

#[cfg(test)]
mod tests {
    use super::{Replay, ReplayError};
    use crate::script::parse_script;
    use catalog::{CampusRecord, Catalog};
    use pretty_assertions::assert_eq;
    use session::ViewerConfig;

    fn ab() -> Catalog {
        Catalog::from_records(vec![
            CampusRecord::new("A", 0.0, 0.0),
            CampusRecord::new("B", 1.0, 1.0),
        ])
        .unwrap()
    }

    fn kinds(script: &str) -> Vec<&'static str> {
        let steps = parse_script(script).unwrap();
        let replay = Replay::start(ab(), ViewerConfig::default()).unwrap();
        replay.run(&steps).unwrap().iter().map(|e| e.kind).collect()
    }

    #[test]
    fn click_beats_blur_timer() {
        let steps = parse_script("focus\nblur\nclick B\nwait 500").unwrap();
        let mut replay = Replay::start(ab(), ViewerConfig::default()).unwrap();
        for s in &steps {
            replay.step(s).unwrap();
        }
        assert_eq!(replay.viewer().selected_name(), Some("B"));
        assert!(!replay.viewer().search().is_open());
        assert_eq!(replay.clock_ms(), 500.0);
    }

    #[test]
    fn trail_is_deterministic() {
        let script = "type z\nsubmit\nmove 0.9 0.9\nmarker A\nfocus\nblur\nwait 100";
        let first = kinds(script);
        assert_eq!(first, kinds(script));
        assert_eq!(
            first,
            vec![
                "session", "style", "query", "invalid-search", "nearest", "marker", "focus",
                "blur",
            ]
        );
    }

    #[test]
    fn unknown_click_reports_line() {
        let steps = parse_script("focus\nclick Nowhere").unwrap();
        let replay = Replay::start(ab(), ViewerConfig::default()).unwrap();
        match replay.run(&steps) {
            Err(ReplayError::Step { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
