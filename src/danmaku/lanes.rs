use crate::danmaku::config::VerticalBand;
use rand::Rng;

/// Lane height as a multiple of the configured font size. The extra room
/// keeps stroke-outlined text from touching the neighbouring lane.
pub const LANE_HEIGHT_FACTOR: f32 = 1.6;
/// A lane is clear once its trailing item has moved this far in from the
/// right edge.
pub const SAFE_MARGIN_PX: f32 = 80.0;
/// Baseline used when no lanes fit on the surface.
pub const FALLBACK_Y: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

/// Which lane an item was assigned, in which lane-set generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneRef {
    pub generation: u64,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub y: f32,
    pub trailing_edge_x: f32,
    /// Item whose right edge `trailing_edge_x` currently follows.
    pub occupant: Option<ItemId>,
}

impl Lane {
    fn new(y: f32) -> Self {
        Self {
            y,
            trailing_edge_x: 0.0,
            occupant: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// The lane had cleared the safety margin.
    Clear(usize),
    /// Nothing was clear; the lane closest to clearing was taken anyway.
    Forced(usize),
}

impl Allocation {
    pub fn index(self) -> usize {
        match self {
            Self::Clear(index) | Self::Forced(index) => index,
        }
    }

    pub fn is_forced(self) -> bool {
        matches!(self, Self::Forced(_))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LaneSet {
    generation: u64,
    lane_height: f32,
    lanes: Vec<Lane>,
}

impl LaneSet {
    /// Build the lanes for a surface of `surface_height` pixels.
    ///
    /// The count is `floor(usable / lane_height) - 1`; the dropped lane keeps
    /// the bottom row from being clipped. A non-positive count yields an
    /// empty set.
    pub fn compute(
        surface_height: f32,
        band: VerticalBand,
        font_size: f32,
        generation: u64,
    ) -> Self {
        let lane_height = font_size * LANE_HEIGHT_FACTOR;
        let (top, bottom) = band.range(surface_height.max(0.0));
        let mut lanes = Vec::new();
        if lane_height > 0.0 && lane_height.is_finite() {
            let count = ((bottom - top) / lane_height).floor() as i64 - 1;
            for i in 0..count.max(0) {
                lanes.push(Lane::new(top + (i + 1) as f32 * lane_height));
            }
        }
        Self {
            generation,
            lane_height,
            lanes,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn lane_height(&self) -> f32 {
        self.lane_height
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn get(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Vertical positions of every lane, top to bottom.
    pub fn geometry(&self) -> Vec<f32> {
        self.lanes.iter().map(|lane| lane.y).collect()
    }

    /// Pick a lane for a new item on a surface `surface_width` wide.
    ///
    /// Any lane whose trailing edge is left of `surface_width - SAFE_MARGIN_PX`
    /// is a candidate and one is chosen uniformly. Otherwise the lane with the
    /// smallest trailing edge wins, first one on ties. Returns `None` only
    /// when the set is empty.
    pub fn find_best_lane<R: Rng>(
        &self,
        surface_width: f32,
        rng: &mut R,
    ) -> Option<Allocation> {
        if self.lanes.is_empty() {
            return None;
        }
        let limit = surface_width - SAFE_MARGIN_PX;
        let candidates: Vec<usize> = self
            .lanes
            .iter()
            .enumerate()
            .filter(|(_, lane)| lane.trailing_edge_x < limit)
            .map(|(index, _)| index)
            .collect();
        if !candidates.is_empty() {
            let pick = candidates[rng.gen_range(0..candidates.len())];
            return Some(Allocation::Clear(pick));
        }

        let mut best = 0;
        for (index, lane) in self.lanes.iter().enumerate().skip(1) {
            if lane.trailing_edge_x < self.lanes[best].trailing_edge_x {
                best = index;
            }
        }
        Some(Allocation::Forced(best))
    }

    /// Make `item` the occupant of lane `index` with the given right edge.
    pub fn claim(&mut self, index: usize, item: ItemId, right_edge: f32) -> Option<LaneRef> {
        let lane = self.lanes.get_mut(index)?;
        lane.occupant = Some(item);
        lane.trailing_edge_x = right_edge;
        Some(LaneRef {
            generation: self.generation,
            index,
        })
    }

    /// Update the trailing edge if `item` is still the occupant of the lane
    /// it was assigned. Stale lane references from an earlier generation
    /// are ignored.
    pub fn follow(&mut self, lane: LaneRef, item: ItemId, right_edge: f32) -> bool {
        if lane.generation != self.generation {
            return false;
        }
        match self.lanes.get_mut(lane.index) {
            Some(entry) if entry.occupant == Some(item) => {
                entry.trailing_edge_x = right_edge;
                true
            }
            _ => false,
        }
    }

    /// Y position for an allocation, or the fallback baseline.
    pub fn y_for(&self, lane: Option<LaneRef>) -> f32 {
        lane.and_then(|lane| self.lanes.get(lane.index))
            .map(|lane| lane.y)
            .unwrap_or(FALLBACK_Y)
    }
}
