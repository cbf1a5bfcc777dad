/// The 2D drawing surface the renderer draws on, and a recording double
use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

/// Path-based vector drawing with a save/restore state stack
///
/// Coordinates are in the current user space; `translate` and `rotate`
/// compose onto the current transform until the matching `restore`.
/// Colours are CSS colour strings.
pub trait Surface {
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn close_path(&mut self);
    fn stroke(&mut self);
    fn fill(&mut self);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);

    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, color: &str);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_line_width(&mut self, width: f32);
}

/// Saves the surface state on creation and restores it when dropped, so a
/// scope is released on every path out of the code that opened it.
pub struct SurfaceScope<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> SurfaceScope<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for SurfaceScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SurfaceScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SurfaceScope<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// One call made against a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    ClosePath,
    Stroke,
    Fill,
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    StrokeStyle(String),
    FillStyle(String),
    LineCap(LineCap),
    LineJoin(LineJoin),
    LineWidth(f32),
}

/// A surface that only records what it was asked to draw
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    depth: usize,
    max_depth: usize,
    unbalanced_restores: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of `save` calls not yet matched by a `restore`
    pub fn save_depth(&self) -> usize {
        self.depth
    }

    pub fn max_save_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of `restore` calls made with nothing saved
    pub fn unbalanced_restores(&self) -> usize {
        self.unbalanced_restores
    }

    pub fn count(&self, command: &DrawCommand) -> usize {
        self.commands.iter().filter(|c| *c == command).count()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Surface for RecordingSurface {
    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn save(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if self.depth == 0 {
            log::warn!("restore without a matching save");
            self.unbalanced_restores += 1;
        } else {
            self.depth -= 1;
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.commands.push(DrawCommand::Rotate(angle));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::StrokeStyle(color.to_string()));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::FillStyle(color.to_string()));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.commands.push(DrawCommand::LineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.commands.push(DrawCommand::LineJoin(join));
    }

    fn set_line_width(&mut self, width: f32) {
        self.commands.push(DrawCommand::LineWidth(width));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_in_scope(surface: &mut dyn Surface, bail: bool) -> Option<()> {
        let mut scope = SurfaceScope::new(surface);
        scope.translate(1.0, 2.0);
        if bail {
            return None;
        }
        scope.begin_path();
        Some(())
    }

    #[test]
    fn test_scope_restores_on_every_path() {
        let mut surface = RecordingSurface::new();
        assert!(draw_in_scope(&mut surface, false).is_some());
        assert!(draw_in_scope(&mut surface, true).is_none());
        assert_eq!(surface.save_depth(), 0);
        assert_eq!(surface.count(&DrawCommand::Save), 2);
        assert_eq!(surface.count(&DrawCommand::Restore), 2);
        assert_eq!(surface.commands().last(), Some(&DrawCommand::Restore));
    }

    #[test]
    fn test_nested_scopes() {
        let mut surface = RecordingSurface::new();
        {
            let mut outer = SurfaceScope::new(&mut surface);
            {
                let mut inner = SurfaceScope::new(&mut *outer);
                inner.rotate(0.5);
            }
            outer.translate(3.0, 4.0);
        }
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Save,
                DrawCommand::Save,
                DrawCommand::Rotate(0.5),
                DrawCommand::Restore,
                DrawCommand::Translate(3.0, 4.0),
                DrawCommand::Restore,
            ]
        );
        assert_eq!(surface.max_save_depth(), 2);
    }

    #[test_log::test]
    fn test_unbalanced_restore_is_counted() {
        let mut surface = RecordingSurface::new();
        surface.restore();
        assert_eq!(surface.unbalanced_restores(), 1);
        assert_eq!(surface.save_depth(), 0);

        surface.clear();
        assert_eq!(surface.unbalanced_restores(), 0);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_style_names() {
        assert_eq!(LineCap::Round.as_str(), "round");
        assert_eq!(LineJoin::Bevel.as_str(), "bevel");
    }
}
