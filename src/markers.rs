//! Markers supplied by the caller and their collision-resolved placements.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::DialError;

/// Smallest gap in dial degrees between two neighbouring marker symbols.
pub const MIN_SEPARATION: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerId(String);

impl MarkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    /// Text drawn with the symbol font.
    pub symbol: String,
    /// Position in degrees. Zero means "not set" and is not plotted.
    pub value: f64,
}

impl Marker {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, value: f64) -> Self {
        Self {
            id: MarkerId::new(id),
            symbol: symbol.into(),
            value,
        }
    }

    /// The fifteen bodies of the planetary glyph font, keyed `a` to `o`,
    /// with the first five placed ten degrees apart.
    pub fn default_set() -> Vec<Marker> {
        const BODIES: [(&str, &str, f64); 15] = [
            ("Su", "a", 10.0),
            ("Mo", "b", 20.0),
            ("Me", "c", 30.0),
            ("Ve", "d", 40.0),
            ("Ma", "e", 50.0),
            ("Ju", "f", 0.0),
            ("Sa", "g", 0.0),
            ("Ur", "h", 0.0),
            ("Ne", "i", 0.0),
            ("Pl", "j", 0.0),
            ("Ce", "k", 0.0),
            ("Jn", "l", 0.0),
            ("Pa", "m", 0.0),
            ("Vs", "n", 0.0),
            ("Ch", "o", 0.0),
        ];
        BODIES
            .iter()
            .map(|&(id, symbol, value)| Marker::new(id, symbol, value))
            .collect()
    }

    fn validate(&self) -> Result<(), DialError> {
        if self.value.is_finite() && (0.0..360.0).contains(&self.value) {
            Ok(())
        } else {
            Err(DialError::ValueOutOfRange {
                id: self.id.clone(),
                value: self.value,
            })
        }
    }
}

/// Parses `ID SYMBOL VALUE`, e.g. `Su a 10.5`. Range checks happen when
/// the marker joins a [`MarkerSet`].
impl FromStr for Marker {
    type Err = DialError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || DialError::MalformedMarker(line.to_string());
        let mut fields = line.split_whitespace();
        let (Some(id), Some(symbol), Some(value), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed());
        };
        let value = value.parse::<f64>().map_err(|_| malformed())?;
        Ok(Marker::new(id, symbol, value))
    }
}

/// Validated, ordered marker collection. Every accepted change bumps the
/// revision so cached layers can tell the set apart from the one they were
/// drawn with.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
    revision: u64,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_markers(markers: Vec<Marker>) -> Result<Self, DialError> {
        let mut set = Self::new();
        set.replace(markers)?;
        Ok(set)
    }

    /// Swaps in a whole batch. A rejected batch leaves the set unchanged.
    pub fn replace(&mut self, markers: Vec<Marker>) -> Result<(), DialError> {
        let mut seen = HashSet::with_capacity(markers.len());
        for marker in &markers {
            marker.validate()?;
            if !seen.insert(&marker.id) {
                return Err(DialError::DuplicateMarker(marker.id.clone()));
            }
        }
        self.markers = markers;
        self.revision += 1;
        Ok(())
    }

    pub fn push(&mut self, marker: Marker) -> Result<(), DialError> {
        marker.validate()?;
        if self.markers.iter().any(|m| m.id == marker.id) {
            return Err(DialError::DuplicateMarker(marker.id));
        }
        self.markers.push(marker);
        self.revision += 1;
        Ok(())
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn as_slice(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// How the resolver treats the 0°/360° seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SeamPolicy {
    /// Resolve along the line from the lowest value upward. Markers on
    /// either side of the seam are not separated.
    #[default]
    Open,
    /// Treat the ring as closed: the walk starts after the widest gap, so
    /// the seam is only crossed where there is the most room. The marker
    /// the walk starts from stays put; that is usually not the lowest
    /// value, and symbols pushed past 360° are drawn past the seam.
    Circular,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPlacement {
    pub id: MarkerId,
    pub symbol: String,
    /// Where the marker really is; anchors the dot and connector.
    pub original: f64,
    /// Where the symbol is drawn.
    pub adjusted: f64,
}

/// Nudges markers forward until neighbours are at least
/// [`MIN_SEPARATION`] apart. Placements come back sorted by original value,
/// ties in input order.
pub fn resolve(markers: &[Marker], seam: SeamPolicy) -> Vec<MarkerPlacement> {
    let mut placements: Vec<MarkerPlacement> = markers
        .iter()
        .filter(|m| m.value > 0.0)
        .map(|m| MarkerPlacement {
            id: m.id.clone(),
            symbol: m.symbol.clone(),
            original: m.value,
            adjusted: m.value,
        })
        .collect();
    placements.sort_by(|a, b| a.original.total_cmp(&b.original));

    match seam {
        SeamPolicy::Open => spread_forward(placements.iter_mut()),
        SeamPolicy::Circular => spread_circular(&mut placements),
    }
    placements
}

fn spread_forward<'a>(placements: impl Iterator<Item = &'a mut MarkerPlacement>) {
    let mut previous: Option<f64> = None;
    for placement in placements {
        if let Some(prev) = previous {
            if placement.adjusted - prev < MIN_SEPARATION {
                placement.adjusted = prev + MIN_SEPARATION;
            }
        }
        previous = Some(placement.adjusted);
    }
}

fn spread_circular(placements: &mut [MarkerPlacement]) {
    let count = placements.len();
    if count < 2 {
        return;
    }

    // the widest gap, including the one across the seam, ends at `start`
    let start = (0..count)
        .max_by(|&a, &b| gap_before(placements, a).total_cmp(&gap_before(placements, b)))
        .unwrap_or(0);

    // walk on unwrapped positions so values past the seam form one
    // increasing run; only the push is carried back onto `adjusted`
    let mut previous: Option<f64> = None;
    for index in (start..count).chain(0..start) {
        let placement = &mut placements[index];
        let unwrapped = if index < start {
            placement.original + 360.0
        } else {
            placement.original
        };
        let walked = match previous {
            Some(prev) if unwrapped - prev < MIN_SEPARATION => prev + MIN_SEPARATION,
            _ => unwrapped,
        };
        if walked > unwrapped {
            placement.adjusted = placement.original + (walked - unwrapped);
        }
        previous = Some(walked);
    }
}

fn gap_before(placements: &[MarkerPlacement], index: usize) -> f64 {
    match index {
        0 => placements[0].original + 360.0 - placements[placements.len() - 1].original,
        i => placements[i].original - placements[i - 1].original,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn adjusted_of(placements: &[MarkerPlacement], id: &str) -> f64 {
        placements
            .iter()
            .find(|p| p.id.as_str() == id)
            .map(|p| p.adjusted)
            .unwrap()
    }

    #[test]
    fn close_neighbour_is_nudged() {
        let markers = vec![
            Marker::new("Su", "a", 10.0),
            Marker::new("Mo", "b", 20.0),
            Marker::new("Me", "c", 21.0),
        ];
        let placements = resolve(&markers, SeamPolicy::Open);
        assert_eq!(adjusted_of(&placements, "Su"), 10.0);
        assert_eq!(adjusted_of(&placements, "Mo"), 20.0);
        assert_eq!(adjusted_of(&placements, "Me"), 21.5);
        assert_eq!(placements[2].original, 21.0);
    }

    #[test]
    fn pushes_chain_through_a_cluster() {
        let markers = vec![
            Marker::new("A", "a", 5.0),
            Marker::new("B", "b", 5.2),
            Marker::new("C", "c", 5.4),
            Marker::new("D", "d", 7.0),
        ];
        let placements = resolve(&markers, SeamPolicy::Open);
        let adjusted: Vec<f64> = placements.iter().map(|p| p.adjusted).collect();
        assert_eq!(adjusted, vec![5.0, 6.5, 8.0, 9.5]);
    }

    #[test]
    fn unset_markers_are_skipped() {
        let placements = resolve(&Marker::default_set(), SeamPolicy::Open);
        assert_eq!(placements.len(), 5);
        assert!(placements.iter().all(|p| p.original == p.adjusted));
    }

    #[test]
    fn ties_keep_input_order() {
        let markers = vec![
            Marker::new("Late", "x", 30.0),
            Marker::new("First", "y", 12.0),
            Marker::new("Second", "z", 12.0),
        ];
        let placements = resolve(&markers, SeamPolicy::Open);
        let ids: Vec<&str> = placements.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["First", "Second", "Late"]);
        assert_eq!(placements[1].adjusted, 13.5);
    }

    #[test]
    fn random_sets_hold_the_separation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let count = rng.random_range(1..20);
            let markers: Vec<Marker> = (0..count)
                .map(|i| Marker::new(format!("m{i}"), "x", rng.random_range(0.0..40.0)))
                .collect();
            let placements = resolve(&markers, SeamPolicy::Open);
            if let Some(first) = placements.first() {
                assert_eq!(first.adjusted, first.original);
            }
            for pair in placements.windows(2) {
                assert!(pair[0].original <= pair[1].original);
                assert!(pair[1].adjusted - pair[0].adjusted >= MIN_SEPARATION - 1e-9);
            }
            assert!(placements.iter().all(|p| p.adjusted >= p.original));
        }
    }

    #[test]
    fn random_seam_clusters_separate_without_drift() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2000 {
            let count = rng.random_range(2..16);
            let markers: Vec<Marker> = (0..count)
                .map(|i| {
                    let value = if rng.random_bool(0.5) {
                        rng.random_range(340.0..360.0)
                    } else {
                        rng.random_range(0.001..20.0)
                    };
                    Marker::new(format!("m{i}"), "x", value)
                })
                .collect();
            let placements = resolve(&markers, SeamPolicy::Circular);

            for p in &placements {
                assert!(p.adjusted >= p.original, "{} < {}", p.adjusted, p.original);
                // untouched markers keep their exact value, pushed ones move visibly
                assert!(p.adjusted == p.original || p.adjusted - p.original > 1e-9);
            }
            // the walk starts somewhere and leaves that marker in place
            assert!(placements.iter().any(|p| p.adjusted == p.original));

            let mut around: Vec<f64> = placements
                .iter()
                .map(|p| p.adjusted.rem_euclid(360.0))
                .collect();
            around.sort_by(f64::total_cmp);
            for pair in around.windows(2) {
                assert!(pair[1] - pair[0] >= MIN_SEPARATION - 1e-9);
            }
            let across = around[0] + 360.0 - around[around.len() - 1];
            assert!(across >= MIN_SEPARATION - 1e-9, "seam gap {across}");
        }
    }

    #[test]
    fn open_seam_leaves_wrap_pair_alone() {
        let markers = vec![Marker::new("A", "a", 359.0), Marker::new("B", "b", 0.5)];
        let placements = resolve(&markers, SeamPolicy::Open);
        assert_eq!(adjusted_of(&placements, "A"), 359.0);
        assert_eq!(adjusted_of(&placements, "B"), 0.5);
    }

    #[test]
    fn circular_seam_separates_wrap_pair() {
        let markers = vec![
            Marker::new("A", "a", 359.0),
            Marker::new("B", "b", 0.5),
            Marker::new("C", "c", 180.0),
        ];
        let placements = resolve(&markers, SeamPolicy::Circular);
        // 0.5 is already a full separation past 359 across the seam
        assert_eq!(adjusted_of(&placements, "A"), 359.0);
        assert!((adjusted_of(&placements, "B") - 0.5).abs() < 1e-9);
        assert_eq!(adjusted_of(&placements, "C"), 180.0);

        let markers = vec![Marker::new("A", "a", 359.5), Marker::new("B", "b", 0.5)];
        let placements = resolve(&markers, SeamPolicy::Circular);
        assert_eq!(adjusted_of(&placements, "A"), 359.5);
        assert!((adjusted_of(&placements, "B") - 1.0).abs() < 1e-9);
        assert!(placements.iter().all(|p| p.adjusted >= p.original));
    }

    #[test]
    fn set_rejects_out_of_range_and_duplicates() {
        let mut set = MarkerSet::from_markers(vec![Marker::new("Su", "a", 10.0)]).unwrap();
        let revision = set.revision();

        let err = set.replace(vec![Marker::new("Mo", "b", 360.0)]).unwrap_err();
        assert!(matches!(err, DialError::ValueOutOfRange { .. }));
        let err = set.replace(vec![Marker::new("Mo", "b", f64::NAN)]).unwrap_err();
        assert!(matches!(err, DialError::ValueOutOfRange { .. }));
        let err = set
            .replace(vec![Marker::new("Mo", "b", 1.0), Marker::new("Mo", "c", 2.0)])
            .unwrap_err();
        assert!(matches!(err, DialError::DuplicateMarker(_)));
        let err = set.push(Marker::new("Su", "z", 3.0)).unwrap_err();
        assert!(matches!(err, DialError::DuplicateMarker(_)));

        assert_eq!(set.revision(), revision);
        assert_eq!(set.as_slice()[0].id.as_str(), "Su");

        set.push(Marker::new("Mo", "b", 20.0)).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.revision() > revision);
    }

    #[test]
    fn parses_marker_lines() {
        let marker: Marker = "  Su  a 10.5 ".parse().unwrap();
        assert_eq!(marker, Marker::new("Su", "a", 10.5));

        for line in ["Su a", "Su a ten", "Su a 1 extra", ""] {
            let err = line.parse::<Marker>().unwrap_err();
            assert!(matches!(err, DialError::MalformedMarker(_)), "{line:?}");
        }
        // range is checked by the set, not the parser
        assert!("Su a 400".parse::<Marker>().is_ok());
    }
}
