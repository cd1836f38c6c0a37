//! Per-dial cache of rasterized static layers.
//!
//! Each entry remembers the key it was drawn for. A lookup compares the
//! current key with the stored one and repaints only on a mismatch, so a
//! frame where only an arrow moved never touches ticks, labels or the
//! collision resolver.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::angle::DivisionScheme;
use crate::error::DialError;
use crate::face::StaticPainter;
use crate::layout::{Dial, DialId, Point};
use crate::markers::MarkerSet;
use crate::raster::Layer;

/// Everything a static layer depends on.
#[derive(Debug, Clone, PartialEq)]
struct LayerKey {
    width: usize,
    height: usize,
    center: Point,
    radius: f64,
    scheme: DivisionScheme,
    /// Only the primary dial draws markers, so only it tracks them.
    marker_revision: Option<u64>,
}

impl LayerKey {
    fn new(dial: &Dial, markers: &MarkerSet) -> Self {
        Self {
            width: dial.slot.width,
            height: dial.slot.height,
            center: dial.local_center(),
            radius: dial.radius,
            scheme: dial.scheme,
            marker_revision: dial.id.is_primary().then(|| markers.revision()),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    key: LayerKey,
    layer: Layer,
}

#[derive(Debug, Default)]
pub struct StaticLayerCache {
    entries: HashMap<DialId, CacheEntry>,
    builds: u64,
}

impl StaticLayerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the layer for `dial`, repainting it first when the dial's
    /// geometry or the marker set changed since the last build.
    pub fn get_or_build(
        &mut self,
        dial: &Dial,
        markers: &MarkerSet,
        painter: &dyn StaticPainter,
    ) -> Result<&Layer, DialError> {
        let key = LayerKey::new(dial, markers);
        match self.entries.entry(dial.id) {
            Entry::Occupied(slot) if slot.get().key == key => Ok(&slot.into_mut().layer),
            Entry::Occupied(mut slot) => {
                let layer = build_layer(dial, markers, painter)?;
                self.builds += 1;
                slot.insert(CacheEntry { key, layer });
                Ok(&slot.into_mut().layer)
            }
            Entry::Vacant(slot) => {
                let layer = build_layer(dial, markers, painter)?;
                self.builds += 1;
                Ok(&slot.insert(CacheEntry { key, layer }).layer)
            }
        }
    }

    pub fn is_fresh(&self, dial: &Dial, markers: &MarkerSet) -> bool {
        self.entries
            .get(&dial.id)
            .is_some_and(|entry| entry.key == LayerKey::new(dial, markers))
    }

    /// Drops layers for dials that no longer exist.
    pub fn retain_dials(&mut self, count: usize) {
        self.entries.retain(|id, _| id.0 < count);
    }

    /// Number of layers painted since creation.
    pub fn build_count(&self) -> u64 {
        self.builds
    }
}

fn build_layer(
    dial: &Dial,
    markers: &MarkerSet,
    painter: &dyn StaticPainter,
) -> Result<Layer, DialError> {
    let mut layer = Layer::new(dial.slot.width, dial.slot.height, painter.background())?;
    painter.paint(dial, markers, &mut layer.canvas());
    log::debug!(
        "Rebuilt static layer for dial {} at {}x{}",
        dial.id,
        dial.slot.width,
        dial.slot.height
    );
    Ok(layer)
}
