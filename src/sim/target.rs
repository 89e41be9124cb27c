//! Current target reference
//!
//! Set and cleared by the external picking collaborator. Whether the target is
//! still alive or in range is checked by the ability system on every cast.

use super::unit::UnitId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetSelector {
    current: Option<UnitId>,
}

impl TargetSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, target: UnitId) {
        if self.current != Some(target) {
            log::debug!("Target selected: {target}");
        }
        self.current = Some(target);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<UnitId> {
        self.current
    }
}
