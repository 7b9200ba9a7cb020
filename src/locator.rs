//! Screen-space hit-testing against the display projection.
//!
//! The engine owns no rendering. Callers pass a [`Projector`] that maps
//! geographic points to the same pixel space as the pointer position, and
//! tolerances are expressed in those pixels.

use geo::Coord;

use crate::downsample::DisplayProjection;
use crate::TrackPoint;

/// A position in screen/layer pixels.
pub type ScreenPoint = Coord<f64>;

/// Geographic to screen projection supplied by the rendering layer.
pub trait Projector {
    fn project(&self, point: &TrackPoint) -> ScreenPoint;
}

impl<F> Projector for F
where
    F: Fn(&TrackPoint) -> ScreenPoint,
{
    fn project(&self, point: &TrackPoint) -> ScreenPoint {
        self(point)
    }
}

/// Web Mercator pixel projection with 256 px tiles.
///
/// `origin` is subtracted from world pixel coordinates so results are
/// relative to the visible layer's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorProjector {
    pub zoom: f64,
    pub origin: ScreenPoint,
}

/// Maximum latitude that can be represented in Web Mercator
const MAX_LATITUDE: f64 = 85.05112878;

const TILE_SIZE: f64 = 256.0;

impl MercatorProjector {
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            origin: Coord { x: 0.0, y: 0.0 },
        }
    }

    /// Projector whose origin puts `center` at the middle of a viewport.
    pub fn centered_on(center: &TrackPoint, zoom: f64, width: f64, height: f64) -> Self {
        let world = Self::new(zoom).project(center);
        Self {
            zoom,
            origin: Coord {
                x: world.x - width / 2.0,
                y: world.y - height / 2.0,
            },
        }
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }
}

impl Projector for MercatorProjector {
    fn project(&self, point: &TrackPoint) -> ScreenPoint {
        let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let size = self.world_size();
        let x = (point.lng + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * size;
        Coord {
            x: x - self.origin.x,
            y: y - self.origin.y,
        }
    }
}

/// Euclidean distance between two screen points.
pub fn screen_distance(a: ScreenPoint, b: ScreenPoint) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Distance from `p` to the segment `a`-`b`.
///
/// Falls back to point distance when the segment has zero length.
pub fn point_segment_distance(p: ScreenPoint, a: ScreenPoint, b: ScreenPoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return screen_distance(p, a);
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let closest = Coord {
        x: a.x + t * dx,
        y: a.y + t * dy,
    };
    screen_distance(p, closest)
}

/// Find the display segment closest to `query`.
///
/// Returns display indices `(a, a + 1)` when the closest segment lies
/// strictly within `tolerance_px`. Projections with fewer than 2 points have
/// no segments. Map back to canonical indices with
/// [`DisplayProjection::original_index`].
pub fn nearest_segment<P: Projector + ?Sized>(
    projection: &DisplayProjection,
    query: ScreenPoint,
    projector: &P,
    tolerance_px: f64,
) -> Option<(usize, usize)> {
    if projection.len() < 2 {
        return None;
    }

    let screen: Vec<ScreenPoint> = projection
        .points()
        .iter()
        .map(|p| projector.project(&p.point))
        .collect();

    let (index, distance) = screen
        .windows(2)
        .map(|w| point_segment_distance(query, w[0], w[1]))
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, d)| {
            if d < best.1 {
                (i, d)
            } else {
                best
            }
        });

    if distance < tolerance_px {
        Some((index, index + 1))
    } else {
        None
    }
}

/// Find the displayed point closest to `query` within `tolerance_px`.
pub fn nearest_point<P: Projector + ?Sized>(
    projection: &DisplayProjection,
    query: ScreenPoint,
    projector: &P,
    tolerance_px: f64,
) -> Option<usize> {
    projection
        .points()
        .iter()
        .map(|p| screen_distance(query, projector.project(&p.point)))
        .enumerate()
        .filter(|(_, d)| *d < tolerance_px)
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((i, d)),
        })
        .map(|(i, _)| i)
}
