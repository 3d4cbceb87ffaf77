/// Measured sizes of the picker, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutInfo {
    #[default]
    Unmeasured,
    Measured {
        item_extent: i32,
        gap_extent: i32,
    },
}

impl LayoutInfo {
    pub fn measured(item_extent: i32, gap_extent: i32) -> Self {
        LayoutInfo::Measured {
            item_extent,
            gap_extent,
        }
    }

    /// Distance between the starts of two adjacent items.
    ///
    /// `None` until measured, and for a degenerate zero-sized layout.
    pub fn interval_extent(&self) -> Option<f32> {
        match *self {
            LayoutInfo::Unmeasured => None,
            LayoutInfo::Measured {
                item_extent,
                gap_extent,
            } => {
                let interval = item_extent + gap_extent;
                (interval > 0).then_some(interval as f32)
            }
        }
    }

    /// Measured with a positive interval. A zero-sized layout cannot place
    /// items and counts as unmeasured.
    pub fn is_measured(&self) -> bool {
        self.interval_extent().is_some()
    }
}
