//! Interactive placement editing over one foreground region.
//!
//! The session is a small state machine:
//!
//! ```text
//! Viewing --start_editing--> Editing { crop_mode, gesture } --save--> Saved
//!    ^                           |                                     |
//!    +-------stop_editing--------+<-----------start_editing------------+
//! ```
//!
//! At most one gesture (move, resize, crop move, crop resize) is active at a time; `begin_*`
//! calls made while another gesture runs are refused. Every mutation replaces the current
//! [`Placement`] / [`CropRegion`] with a new value. Pointer input is always clamped, never
//! rejected, and non-finite coordinates are ignored.

use crate::{
    config::settings::{EditorSettings, Settings},
    editor::gesture::{self, Handle},
    foundation::core::{Point, Vec2},
    foundation::error::TemplatrResult,
    geometry::placement::{
        AbsolutePosition, ContainerContext, CropRegion, NaturalSize, Placement, SavedLayout,
    },
    layout::autofit::compute_auto_fit_placement,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Dragging the region; `grab` is pointer minus region origin at pointer-down.
    Move { grab: Vec2 },
    Resize { handle: Handle },
    /// Dragging the crop; `grab` is in percent of the region.
    CropMove { grab: Vec2 },
    CropResize { handle: Handle },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionState {
    Viewing,
    Editing {
        crop_mode: bool,
        gesture: Option<Gesture>,
    },
    Saved,
}

#[derive(Clone, Debug)]
pub struct EditorSession {
    container: ContainerContext,
    settings: EditorSettings,
    default_placement: Placement,
    placement: Placement,
    crop: Option<CropRegion>,
    state: SessionState,
    baseline: (Placement, Option<CropRegion>),
}

impl EditorSession {
    /// Opens a session showing `default_placement` (the value Reset returns to).
    pub fn new(
        default_placement: Placement,
        initial_crop: Option<CropRegion>,
        container: ContainerContext,
        settings: EditorSettings,
    ) -> TemplatrResult<Self> {
        default_placement.validate()?;
        let crop = initial_crop.map(|c| {
            CropRegion::clamped(c.x, c.y, c.width, c.height, settings.min_crop_pct)
        });
        Ok(Self {
            container,
            settings,
            default_placement,
            placement: default_placement,
            crop,
            state: SessionState::Viewing,
            baseline: (default_placement, crop),
        })
    }

    /// Session for a freshly chosen foreground, starting at its auto-fit default.
    pub fn auto_fit(natural: NaturalSize, settings: &Settings) -> TemplatrResult<Self> {
        let container = settings.editor.container()?;
        let default_placement = compute_auto_fit_placement(natural, container, &settings.auto_fit);
        Self::new(default_placement, None, container, settings.editor)
    }

    /// Reopens a previously saved layout. The saved placement is rebased onto this session's
    /// container if it was produced on a different one.
    pub fn resume(
        default_placement: Placement,
        saved: &SavedLayout,
        container: ContainerContext,
        settings: EditorSettings,
    ) -> TemplatrResult<Self> {
        saved.validate()?;
        let mut session = Self::new(default_placement, saved.crop, container, settings)?;
        let placement = if saved.container == container {
            saved.placement
        } else {
            saved.placement.rebased(saved.container, container)
        };
        session.placement = placement;
        session.baseline = (placement, session.crop);
        Ok(session)
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn crop(&self) -> Option<CropRegion> {
        self.crop
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn container(&self) -> ContainerContext {
        self.container
    }

    pub fn default_placement(&self) -> Placement {
        self.default_placement
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, SessionState::Editing { .. })
    }

    pub fn crop_mode(&self) -> bool {
        matches!(self.state, SessionState::Editing { crop_mode: true, .. })
    }

    pub fn active_gesture(&self) -> Option<Gesture> {
        match self.state {
            SessionState::Editing { gesture, .. } => gesture,
            _ => None,
        }
    }

    /// Whether the current values differ from the last saved (or initial) ones.
    pub fn has_unsaved_changes(&self) -> bool {
        (self.placement, self.crop) != self.baseline
    }

    /// Current values as a layout, regardless of state.
    pub fn layout(&self) -> SavedLayout {
        SavedLayout {
            placement: self.placement,
            container: self.container,
            crop: self.crop,
        }
    }

    pub fn start_editing(&mut self) {
        if !self.is_editing() {
            self.state = SessionState::Editing {
                crop_mode: false,
                gesture: None,
            };
        }
    }

    /// Leaves editing without saving. Values are kept; crop mode and any gesture end.
    pub fn stop_editing(&mut self) {
        if self.is_editing() {
            self.state = SessionState::Viewing;
        }
    }

    /// Enters or leaves crop mode. Entering proposes the default crop; leaving discards the crop.
    pub fn toggle_crop(&mut self) -> bool {
        let SessionState::Editing {
            crop_mode,
            gesture: None,
        } = self.state
        else {
            return false;
        };
        self.crop = if crop_mode {
            None
        } else {
            Some(self.settings.default_crop)
        };
        self.state = SessionState::Editing {
            crop_mode: !crop_mode,
            gesture: None,
        };
        true
    }

    pub fn begin_move(&mut self, pointer: Point) -> bool {
        if !is_finite_point(pointer) {
            return false;
        }
        let grab = pointer - self.placement.origin();
        self.begin(Gesture::Move { grab }, |_| true)
    }

    pub fn begin_resize(&mut self, handle: Handle) -> bool {
        self.begin(Gesture::Resize { handle }, |crop_mode| !crop_mode)
    }

    pub fn begin_crop_move(&mut self, pointer: Point) -> bool {
        let Some(crop) = self.crop else {
            return false;
        };
        if !is_finite_point(pointer) {
            return false;
        }
        let local = gesture::to_region_percent(pointer, self.placement.to_pixel_rect(self.container));
        let grab = local - Point::new(crop.x, crop.y);
        self.begin(Gesture::CropMove { grab }, |crop_mode| crop_mode)
    }

    pub fn begin_crop_resize(&mut self, handle: Handle) -> bool {
        if self.crop.is_none() {
            return false;
        }
        self.begin(Gesture::CropResize { handle }, |crop_mode| crop_mode)
    }

    fn begin(&mut self, next: Gesture, allowed_in: impl Fn(bool) -> bool) -> bool {
        match self.state {
            SessionState::Editing {
                crop_mode,
                gesture: None,
            } if allowed_in(crop_mode) => {
                self.state = SessionState::Editing {
                    crop_mode,
                    gesture: Some(next),
                };
                true
            }
            _ => false,
        }
    }

    /// Feeds a pointer position (container pixels) to the active gesture.
    ///
    /// Returns `true` when the placement or crop changed.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let Some(active) = self.active_gesture() else {
            return false;
        };
        if !is_finite_point(pointer) {
            return false;
        }

        let rect = self.placement.to_pixel_rect(self.container);
        match active {
            Gesture::Move { grab } => {
                let next = gesture::move_rect(rect, pointer, grab, self.container);
                self.replace_placement(Placement {
                    position: AbsolutePosition {
                        x_px: next.x0,
                        y_px: next.y0,
                    },
                    ..self.placement
                })
            }
            Gesture::Resize { handle } => {
                let next = gesture::resize_rect(
                    handle,
                    rect,
                    pointer,
                    self.container,
                    self.settings.min_size_px,
                );
                self.replace_placement(Placement::from_pixel_rect(next, self.container))
            }
            Gesture::CropMove { grab } => {
                let Some(crop) = self.crop else {
                    return false;
                };
                let local = gesture::to_region_percent(pointer, rect);
                self.replace_crop(gesture::move_crop(crop, local, grab))
            }
            Gesture::CropResize { handle } => {
                let Some(crop) = self.crop else {
                    return false;
                };
                let local = gesture::to_region_percent(pointer, rect);
                self.replace_crop(gesture::resize_crop(
                    handle,
                    crop,
                    local,
                    self.settings.min_crop_pct,
                ))
            }
        }
    }

    /// Ends the active gesture, if any.
    pub fn pointer_up(&mut self) {
        if let SessionState::Editing { crop_mode, .. } = self.state {
            self.state = SessionState::Editing {
                crop_mode,
                gesture: None,
            };
        }
    }

    /// Back to the auto-fit default with no crop. Editing, if active, continues outside crop mode;
    /// reset never returns the session to Viewing, only [`Self::stop_editing`] does.
    pub fn reset(&mut self) {
        self.placement = self.default_placement;
        self.crop = None;
        if self.is_editing() {
            self.state = SessionState::Editing {
                crop_mode: false,
                gesture: None,
            };
        }
    }

    /// Commits the current values and leaves editing.
    ///
    /// No-op (`None`) outside editing or when nothing changed since the last save.
    pub fn save(&mut self) -> Option<SavedLayout> {
        if !self.is_editing() || !self.has_unsaved_changes() {
            return None;
        }
        self.baseline = (self.placement, self.crop);
        self.state = SessionState::Saved;
        tracing::debug!(placement = ?self.placement, crop = ?self.crop, "layout saved");
        Some(self.layout())
    }

    fn replace_placement(&mut self, next: Placement) -> bool {
        if next == self.placement {
            return false;
        }
        self.placement = next;
        true
    }

    fn replace_crop(&mut self, next: CropRegion) -> bool {
        if Some(next) == self.crop {
            return false;
        }
        self.crop = Some(next);
        true
    }
}

fn is_finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
