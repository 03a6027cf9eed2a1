use crate::{
    foundation::core::{Point, Rect, Vec2},
    geometry::placement::{ContainerContext, CropRegion},
};

/// Corner grabbed by a resize gesture. The opposite corner stays put.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Handle {
    pub const ALL: [Handle; 4] = [Handle::Nw, Handle::Ne, Handle::Sw, Handle::Se];
}

/// New top-left for a move gesture, kept inside `[0, container - size]` on each axis.
pub(crate) fn move_rect(rect: Rect, pointer: Point, grab: Vec2, container: ContainerContext) -> Rect {
    let target = pointer - grab;
    let max_x = container.width() - rect.width();
    let max_y = container.height() - rect.height();
    let x = target.x.min(max_x).max(0.0);
    let y = target.y.min(max_y).max(0.0);
    Rect::from_origin_size(Point::new(x, y), rect.size())
}

/// Region rectangle after dragging `handle` to `pointer`, all in container pixels.
///
/// Edges that follow the pointer never cross 0 and never come closer than `min` to the anchored
/// edge. Right/bottom edges are additionally bounded by the container, with the size floor
/// taking precedence. A region that starts partly off the container may have its anchor pushed
/// out to `min` past a moving edge stuck at 0. The floor is never below one pixel.
pub(crate) fn resize_rect(
    handle: Handle,
    rect: Rect,
    pointer: Point,
    container: ContainerContext,
    min: f64,
) -> Rect {
    let min = min.max(1.0);
    let (cw, ch) = (container.width(), container.height());
    match handle {
        Handle::Se => {
            let (x1, y1) = (grow(pointer.x, rect.x0, cw, min), grow(pointer.y, rect.y0, ch, min));
            Rect::new(rect.x0, rect.y0, x1, y1)
        }
        Handle::Sw => {
            let (x0, x1) = pull(pointer.x, rect.x1, min);
            Rect::new(x0, rect.y0, x1, grow(pointer.y, rect.y0, ch, min))
        }
        Handle::Ne => {
            let (y0, y1) = pull(pointer.y, rect.y1, min);
            Rect::new(rect.x0, y0, grow(pointer.x, rect.x0, cw, min), y1)
        }
        Handle::Nw => {
            let (x0, x1) = pull(pointer.x, rect.x1, min);
            let (y0, y1) = pull(pointer.y, rect.y1, min);
            Rect::new(x0, y0, x1, y1)
        }
    }
}

/// Far edge following `p` from the fixed near edge `start`.
fn grow(p: f64, start: f64, bound: f64, min: f64) -> f64 {
    start + (p - start).min(bound - start).max(min)
}

/// Near edge following `p` towards 0, and the far edge `anchor` it pairs with.
fn pull(p: f64, anchor: f64, min: f64) -> (f64, f64) {
    let edge = p.min(anchor - min).max(0.0);
    (edge, anchor.max(edge + min))
}

/// Crop after moving it so its top-left follows `pointer_pct - grab_pct`.
pub(crate) fn move_crop(crop: CropRegion, pointer_pct: Point, grab_pct: Vec2) -> CropRegion {
    let target = pointer_pct - grab_pct;
    CropRegion {
        x: target.x.max(0.0).min(100.0 - crop.width),
        y: target.y.max(0.0).min(100.0 - crop.height),
        ..crop
    }
}

/// Crop after dragging `handle` to `pointer_pct` (percent of the foreground box).
///
/// Containment in `[0, 100]` wins over the `min_pct` floor so the region is valid after every
/// step, not only at commit.
pub(crate) fn resize_crop(handle: Handle, crop: CropRegion, pointer_pct: Point, min_pct: f64) -> CropRegion {
    let right = crop.right();
    let bottom = crop.bottom();

    let grow_right = |p: f64| (p - crop.x).max(min_pct).min(100.0 - crop.x);
    let grow_down = |p: f64| (p - crop.y).max(min_pct).min(100.0 - crop.y);
    let pull_left = |p: f64| p.min(right - min_pct).max(0.0);
    let pull_up = |p: f64| p.min(bottom - min_pct).max(0.0);

    match handle {
        Handle::Se => CropRegion {
            width: grow_right(pointer_pct.x),
            height: grow_down(pointer_pct.y),
            ..crop
        },
        Handle::Sw => {
            let x = pull_left(pointer_pct.x);
            CropRegion {
                x,
                width: right - x,
                height: grow_down(pointer_pct.y),
                ..crop
            }
        }
        Handle::Ne => {
            let y = pull_up(pointer_pct.y);
            CropRegion {
                y,
                width: grow_right(pointer_pct.x),
                height: bottom - y,
                ..crop
            }
        }
        Handle::Nw => {
            let x = pull_left(pointer_pct.x);
            let y = pull_up(pointer_pct.y);
            CropRegion {
                x,
                y,
                width: right - x,
                height: bottom - y,
            }
        }
    }
}

/// Pointer in container pixels mapped to percent of the region `rect`.
pub(crate) fn to_region_percent(pointer: Point, rect: Rect) -> Point {
    Point::new(
        (pointer.x - rect.x0) / rect.width() * 100.0,
        (pointer.y - rect.y0) / rect.height() * 100.0,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/editor/gesture.rs"]
mod tests;
