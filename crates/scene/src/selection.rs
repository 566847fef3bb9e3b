use crate::feature::SceneFeature;

/// The feature whose detail panel is open, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    selected: Option<SceneFeature>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SceneFeature> {
        self.selected.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    /// Returns `true` if the selection changed.
    pub fn select(&mut self, feature: SceneFeature) -> bool {
        if self.selected.as_ref().is_some_and(|s| s.id == feature.id) {
            return false;
        }
        self.selected = Some(feature);
        true
    }

    /// Clears the selection. Returns the previous feature, or `None` when
    /// nothing was selected (a no-op).
    pub fn dismiss(&mut self) -> Option<SceneFeature> {
        self.selected.take()
    }
}
