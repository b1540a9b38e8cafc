//! Custom on-map controls.
//!
//! A control is anything the host mounts into a node it owns (a DOM element,
//! a terminal pane, a test buffer). Mounting returns a handle; the same handle
//! is required to unmount, so a control can never be removed twice.

use crate::engine::EngineError;

pub trait MountedControl {
    type Host: ?Sized;
    type Handle;

    fn mount(&mut self, host: &Self::Host) -> Result<Self::Handle, EngineError>;

    fn unmount(&mut self, handle: Self::Handle);
}

/// Owns a mounted control and unmounts it on drop.
pub struct ControlSlot<C: MountedControl> {
    control: C,
    handle: Option<C::Handle>,
}

impl<C: MountedControl> ControlSlot<C> {
    pub fn mount(mut control: C, host: &C::Host) -> Result<Self, EngineError> {
        let handle = control.mount(host)?;
        Ok(Self {
            control,
            handle: Some(handle),
        })
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut C {
        &mut self.control
    }

    pub fn handle(&self) -> Option<&C::Handle> {
        self.handle.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_some()
    }

    pub fn unmount(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.control.unmount(handle);
        }
    }
}

impl<C: MountedControl> Drop for ControlSlot<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlSlot, MountedControl};
    use crate::engine::EngineError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Host {
        nodes: RefCell<Vec<String>>,
    }

    struct Label {
        text: String,
        log: std::rc::Rc<RefCell<Vec<String>>>,
    }

    impl MountedControl for Label {
        type Host = Host;
        type Handle = usize;

        fn mount(&mut self, host: &Host) -> Result<usize, EngineError> {
            let mut nodes = host.nodes.borrow_mut();
            nodes.push(self.text.clone());
            self.log.borrow_mut().push(format!("mount {}", self.text));
            Ok(nodes.len() - 1)
        }

        fn unmount(&mut self, handle: usize) {
            self.log.borrow_mut().push(format!("unmount {handle}"));
        }
    }

    #[test]
    fn unmounts_once_on_explicit_call_and_drop() {
        let host = Host::default();
        let log = std::rc::Rc::new(RefCell::new(Vec::new()));
        let mut slot = ControlSlot::mount(
            Label {
                text: "nearest".to_string(),
                log: log.clone(),
            },
            &host,
        )
        .unwrap();
        assert!(slot.is_mounted());
        assert_eq!(slot.handle(), Some(&0));

        slot.unmount();
        assert!(!slot.is_mounted());
        drop(slot);

        assert_eq!(*log.borrow(), vec!["mount nearest", "unmount 0"]);
    }

    #[test]
    fn drop_unmounts() {
        let host = Host::default();
        let log = std::rc::Rc::new(RefCell::new(Vec::new()));
        {
            let _slot = ControlSlot::mount(
                Label {
                    text: "a".to_string(),
                    log: log.clone(),
                },
                &host,
            )
            .unwrap();
        }
        assert_eq!(*log.borrow(), vec!["mount a", "unmount 0"]);
    }

    struct Failing;

    impl MountedControl for Failing {
        type Host = Host;
        type Handle = ();

        fn mount(&mut self, _host: &Host) -> Result<(), EngineError> {
            Err(EngineError::MountPointMissing("label".to_string()))
        }

        fn unmount(&mut self, _handle: ()) {
            panic!("never mounted");
        }
    }

    #[test]
    fn failed_mount_yields_no_slot() {
        let host = Host::default();
        assert!(ControlSlot::mount(Failing, &host).is_err());
    }
}
