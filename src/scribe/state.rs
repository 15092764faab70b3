//! Saved engine states.
//!
//! A [`SaveHandle`] names one captured [`GraphicsStateFrame`]. Restoring a handle applies
//! exactly that frame and forgets it, whatever other handles are outstanding, so an
//! inner scope that never restores cannot make an outer restore apply the wrong frame.

use std::ops::{Deref, DerefMut};

use super::Scribe;
use crate::error::{Error, Result};
use crate::geometry::{Margins, Point};
use crate::layout::{PictureAlignment, TextAlignment};
use crate::style::{Color, Font, LineStyle};
use crate::units::ScaleMode;

/// Every tracked engine attribute at one moment.
///
/// Position and margins are in points.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsStateFrame {
    pub scale_mode: ScaleMode,
    pub position: Point,
    pub font: Font,
    pub fore_color: Color,
    pub fill_color: Color,
    pub line_style: LineStyle,
    pub picture_alignment: PictureAlignment,
    pub text_alignment: TextAlignment,
    pub margins: Margins,
}

/// Ticket for a saved state; pass it to [`Scribe::restore_state`].
#[must_use = "a saved state is only applied when its handle is restored"]
#[derive(Debug, PartialEq, Eq)]
pub struct SaveHandle(u64);

/// Outstanding frames keyed by handle id.
#[derive(Debug, Default)]
pub(crate) struct GraphicsStateStack {
    frames: Vec<(u64, GraphicsStateFrame)>,
    next_id: u64,
}

impl GraphicsStateStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store a frame.
    pub(crate) fn push(&mut self, frame: GraphicsStateFrame) -> SaveHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.frames.push((id, frame));
        SaveHandle(id)
    }

    /// Remove and return the frame belonging to `handle`, wherever it sits.
    pub(crate) fn take(&mut self, handle: &SaveHandle) -> Option<GraphicsStateFrame> {
        let index = self.frames.iter().rposition(|(id, _)| *id == handle.0)?;
        Some(self.frames.remove(index).1)
    }

    /// Number of outstanding frames.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// Restores its saved state when dropped.
///
/// Dereferences to the [`Scribe`], so drawing continues through the guard:
///
/// ```
/// use pdf_scribe::{Color, PageKind, Margins, Scribe};
///
/// # fn main() -> pdf_scribe::Result<()> {
/// let mut scribe = Scribe::new();
/// scribe.new_page(PageKind::Letter, false, Margins::default())?;
/// {
///     let mut scoped = scribe.scoped_state();
///     scoped.set_fore_color(Color::rgb(200, 0, 0));
///     scoped.rectangle(100.0, 50.0, 0.0, false, true)?;
/// }
/// assert_eq!(scribe.fore_color(), Color::black());
/// # Ok(())
/// # }
/// ```
pub struct StateGuard<'a> {
    scribe: &'a mut Scribe,
    handle: Option<SaveHandle>,
}

impl StateGuard<'_> {
    /// Restore now and report the outcome instead of leaving it to `Drop`.
    pub fn restore(mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => self.scribe.restore_state(handle),
            None => Ok(()),
        }
    }
}

impl Deref for StateGuard<'_> {
    type Target = Scribe;

    fn deref(&self) -> &Scribe {
        self.scribe
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut Scribe {
        self.scribe
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.scribe.restore_state(handle) {
                log::warn!("failed to restore saved state: {}", e);
            }
        }
    }
}

impl Scribe {
    /// Capture every tracked attribute.
    pub fn snapshot(&self) -> GraphicsStateFrame {
        GraphicsStateFrame {
            scale_mode: self.scale_mode,
            position: self.position,
            font: self.font.clone(),
            fore_color: self.fore_color,
            fill_color: self.fill_color,
            line_style: self.line_style.clone(),
            picture_alignment: self.picture_alignment,
            text_alignment: self.text_alignment,
            margins: self.margins,
        }
    }

    /// Save the current state.
    pub fn save_state(&mut self) -> SaveHandle {
        let frame = self.snapshot();
        self.states.push(frame)
    }

    /// Apply the state captured by `handle` and discard it.
    ///
    /// Handles are independent: restoring one never disturbs the others.
    pub fn restore_state(&mut self, handle: SaveHandle) -> Result<()> {
        let frame = self.states.take(&handle).ok_or_else(|| {
            Error::InvalidState(format!("saved state {} is not outstanding", handle.0))
        })?;
        self.apply_frame(frame);
        Ok(())
    }

    /// Save now, restore when the returned guard goes out of scope.
    pub fn scoped_state(&mut self) -> StateGuard<'_> {
        let handle = self.save_state();
        StateGuard {
            scribe: self,
            handle: Some(handle),
        }
    }

    /// Run `f` and restore the saved state afterwards, even when `f` fails.
    pub fn with_saved_state<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Scribe) -> Result<T>,
    {
        let handle = self.save_state();
        let outcome = f(self);
        self.restore_state(handle)?;
        outcome
    }

    /// Number of saved states not yet restored.
    pub fn saved_state_count(&self) -> usize {
        self.states.depth()
    }

    fn apply_frame(&mut self, frame: GraphicsStateFrame) {
        self.finish_line();
        self.scale_mode = frame.scale_mode;
        self.position = frame.position;
        self.font = frame.font;
        if self.fore_color != frame.fore_color {
            self.set_fore_color(frame.fore_color);
        }
        if self.fill_color != frame.fill_color {
            self.set_fill_color(frame.fill_color);
        }
        self.line_style = frame.line_style;
        self.picture_alignment = frame.picture_alignment;
        self.text_alignment = frame.text_alignment;
        self.move_margin_origin(frame.margins);
    }
}
