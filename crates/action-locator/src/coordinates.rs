//! Viewport-independent coordinates on a 0-1000 scale

use action_primitives::Viewport;
use waymark_core_types::{BoundingBox, CoordinateInfo};

/// Full extent of the normalized scale.
pub const NORMALIZED_SCALE: f64 = 1000.0;

/// `round(absolute / dimension * 1000)`; zero when the dimension is unknown.
pub fn normalize(absolute: i32, dimension: u32) -> i32 {
    if dimension == 0 {
        return 0;
    }
    (absolute as f64 / dimension as f64 * NORMALIZED_SCALE).round() as i32
}

/// `round(normalized * dimension / 1000)`
pub fn denormalize(normalized: i32, dimension: u32) -> i32 {
    (normalized as f64 * dimension as f64 / NORMALIZED_SCALE).round() as i32
}

/// Coordinate record for a point observed at recording time.
pub fn coordinate_info(
    x: i32,
    y: i32,
    screen: Viewport,
    bounding_box: Option<BoundingBox>,
) -> CoordinateInfo {
    CoordinateInfo {
        x: Some(x),
        y: Some(y),
        normalized_x: Some(normalize(x, screen.width)),
        normalized_y: Some(normalize(y, screen.height)),
        screen_width: Some(screen.width),
        screen_height: Some(screen.height),
        bounding_box,
    }
}

/// Absolute point to act on in the current viewport.
///
/// Absolute coordinates win when both are present; otherwise normalized ones
/// are mapped onto `viewport`. Negative results are rejected.
pub fn absolute_point(info: &CoordinateInfo, viewport: Option<Viewport>) -> Option<(i32, i32)> {
    let point = match (info.x, info.y) {
        (Some(x), Some(y)) => (x, y),
        _ => {
            let (nx, ny) = (info.normalized_x?, info.normalized_y?);
            let viewport = viewport?;
            (denormalize(nx, viewport.width), denormalize(ny, viewport.height))
        }
    };
    (point.0 >= 0 && point.1 >= 0).then_some(point)
}
