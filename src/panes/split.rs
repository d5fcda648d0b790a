//! Pane-boundary resizing.

/// Smallest folder pane extent, in cells, a drag may produce.
pub const MIN_PANE_EXTENT: u16 = 4;
/// Largest folder pane share of the container, in percent.
pub const MAX_PANE_PERCENT: u32 = 80;

/// Size of the folder pane along the active axis and the drag state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaneSplit {
    /// `None` until the user drags; the panes then split evenly.
    folder_extent: Option<u16>,
    dragging: bool,
}

impl PaneSplit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folder pane extent inside a container of `container` cells. A dragged
    /// extent never exceeds the maximum share of the current container.
    pub fn folder_extent(&self, container: u16) -> u16 {
        match self.folder_extent {
            Some(extent) => extent.min(max_extent(container)),
            None => container / 2,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Move the boundary to `offset` cells from the container start.
    ///
    /// Positions outside `[MIN_PANE_EXTENT, 80% of container]` are ignored
    /// and the previous extent kept. Returns whether the extent changed.
    pub fn drag_to(&mut self, offset: u16, container: u16) -> bool {
        if !self.dragging {
            return false;
        }
        if offset < MIN_PANE_EXTENT || offset > max_extent(container) {
            return false;
        }
        let changed = self.folder_extent != Some(offset);
        self.folder_extent = Some(offset);
        changed
    }

    /// Stop resizing. Safe to call whether or not a drag is in progress.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }
}

fn max_extent(container: u16) -> u16 {
    (u32::from(container) * MAX_PANE_PERCENT / 100) as u16
}
