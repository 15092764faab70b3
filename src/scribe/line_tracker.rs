//! Emits only the stroke attributes that changed since the last path.

use crate::style::{LineCapStyle, LineJoinStyle, LineStyle};
use crate::units::ScaleMode;
use crate::writer::{ContentStreamBuilder, LineCap, LineJoin};

/// Backend constant for a cap style.
fn cap_operand(cap: LineCapStyle) -> LineCap {
    match cap {
        LineCapStyle::None => LineCap::Butt,
        LineCapStyle::Round => LineCap::Round,
        LineCapStyle::Square => LineCap::Square,
    }
}

/// Backend constant for a join style.
fn join_operand(join: LineJoinStyle) -> LineJoin {
    match join {
        LineJoinStyle::Miter => LineJoin::Miter,
        LineJoinStyle::Round => LineJoin::Round,
        LineJoinStyle::Bevel => LineJoin::Bevel,
    }
}

/// Remembers the stroke attributes in effect on the current page.
#[derive(Debug, Clone, Default)]
pub(crate) struct LineStyleDiffer {
    last: Option<(LineStyle, ScaleMode)>,
}

impl LineStyleDiffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Forget what was emitted; the next [`apply`](Self::apply) writes everything.
    pub(crate) fn reset(&mut self) {
        self.last = None;
    }

    /// Bring the page's stroke attributes in line with `desired`.
    ///
    /// Width goes out before the dash because dash lengths are scaled by it.
    pub(crate) fn apply(
        &mut self,
        desired: &LineStyle,
        mode: ScaleMode,
        content: &mut ContentStreamBuilder,
    ) {
        let width = desired.native_width(mode);
        match &self.last {
            Some((last, last_mode)) if *last_mode == mode => {
                if last == desired {
                    return;
                }
                let width_changed = last.native_width(mode) != width;
                if last.cap() != desired.cap() {
                    content.set_line_cap(cap_operand(desired.cap()));
                }
                if last.join() != desired.join() {
                    content.set_line_join(join_operand(desired.join()));
                }
                if width_changed {
                    content.set_line_width(width);
                }
                if last.dash() != desired.dash() || (width_changed && !desired.dash().is_solid())
                {
                    let (pattern, phase) = desired.dash().scaled(width);
                    content.set_dash_pattern(pattern, phase);
                }
                log::trace!("line style updated to {:?}", desired);
            },
            _ => {
                log::trace!("line style emitted in full ({:?}, {})", desired, mode);
                let (pattern, phase) = desired.dash().scaled(width);
                content
                    .set_line_cap(cap_operand(desired.cap()))
                    .set_line_join(join_operand(desired.join()))
                    .set_line_width(width)
                    .set_dash_pattern(pattern, phase);
            },
        }
        self.last = Some((desired.clone(), mode));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::LineDashStyle;
    use crate::writer::ContentStreamOp;

    fn ops(differ: &mut LineStyleDiffer, style: &LineStyle, mode: ScaleMode) -> Vec<ContentStreamOp> {
        let mut content = ContentStreamBuilder::new();
        differ.apply(style, mode, &mut content);
        content.operations().to_vec()
    }

    #[test]
    fn test_first_apply_is_full_and_ordered() {
        let mut differ = LineStyleDiffer::new();
        let style = LineStyle::new().with_width(2.0).unwrap().with_dash(LineDashStyle::dot());
        let emitted = ops(&mut differ, &style, ScaleMode::Points);
        assert_eq!(
            emitted,
            vec![
                ContentStreamOp::SetLineCap(LineCap::Butt),
                ContentStreamOp::SetLineJoin(LineJoin::Miter),
                ContentStreamOp::SetLineWidth(2.0),
                ContentStreamOp::SetDashPattern(vec![4.0, 6.0], 0.0),
            ]
        );
    }

    #[test]
    fn test_unchanged_style_emits_nothing() {
        let mut differ = LineStyleDiffer::new();
        let style = LineStyle::new();
        ops(&mut differ, &style, ScaleMode::Points);
        assert!(ops(&mut differ, &style, ScaleMode::Points).is_empty());
    }

    #[test]
    fn test_only_changed_attribute_emitted() {
        let mut differ = LineStyleDiffer::new();
        ops(&mut differ, &LineStyle::new(), ScaleMode::Points);
        let round = LineStyle::new().with_cap(LineCapStyle::Round);
        assert_eq!(
            ops(&mut differ, &round, ScaleMode::Points),
            vec![ContentStreamOp::SetLineCap(LineCap::Round)]
        );
    }

    #[test]
    fn test_width_change_rescales_dash() {
        let mut differ = LineStyleDiffer::new();
        let thin = LineStyle::new().with_width(1.0).unwrap().with_dash(LineDashStyle::dash());
        ops(&mut differ, &thin, ScaleMode::Points);
        let thick = thin.clone().with_width(2.0).unwrap();
        assert_eq!(
            ops(&mut differ, &thick, ScaleMode::Points),
            vec![
                ContentStreamOp::SetLineWidth(2.0),
                ContentStreamOp::SetDashPattern(vec![12.0, 12.0], 6.0),
            ]
        );
    }

    #[test]
    fn test_mode_change_forces_full_emission() {
        let mut differ = LineStyleDiffer::new();
        let style = LineStyle::new();
        ops(&mut differ, &style, ScaleMode::Points);
        assert_eq!(ops(&mut differ, &style, ScaleMode::Inches).len(), 4);
    }

    #[test]
    fn test_reset_forces_full_emission() {
        let mut differ = LineStyleDiffer::new();
        let style = LineStyle::new();
        ops(&mut differ, &style, ScaleMode::Points);
        differ.reset();
        assert_eq!(ops(&mut differ, &style, ScaleMode::Points).len(), 4);
    }
}
