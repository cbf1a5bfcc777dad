/// ASCII rasterizer implementing the drawing surface for terminal output
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use isocube_core::{LineCap, LineJoin, Surface};
use nalgebra::{Matrix3, Point2, Vector2};
use std::io::Write;

/// Character luminosity ramp for fills (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Map a CSS colour to a terminal colour and a luminance in `[0, 1]`
pub fn parse_color(css: &str) -> (Color, f32) {
    let css = css.trim().to_ascii_lowercase();
    let named = match css.as_str() {
        // The terminal's own foreground reads as "ink" on any theme
        "black" => Some((Color::Reset, 0.0)),
        "white" => Some((Color::White, 1.0)),
        "grey" | "gray" => Some((Color::Grey, 0.5)),
        "red" => Some((Color::Red, 0.3)),
        "green" => Some((Color::Green, 0.6)),
        "blue" => Some((Color::Blue, 0.1)),
        "yellow" => Some((Color::Yellow, 0.9)),
        "cyan" => Some((Color::Cyan, 0.7)),
        "magenta" => Some((Color::Magenta, 0.4)),
        _ => None,
    };
    if let Some(found) = named {
        return found;
    }
    if let Some((r, g, b)) = parse_hex(&css) {
        let lum = (0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32) / 255.0;
        return (Color::Rgb { r, g, b }, lum);
    }
    log::debug!("unrecognised colour '{}', using terminal default", css);
    (Color::Reset, 0.0)
}

fn parse_hex(css: &str) -> Option<(u8, u8, u8)> {
    let hex = css.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut it = hex.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
            Some((it.next()??, it.next()??, it.next()??))
        }
        6 => Some((
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        _ => None,
    }
}

/// Pick a stroke glyph from a segment's direction in cell space
fn stroke_glyph(dx: f32, dy: f32) -> char {
    if dx.abs() > 2.0 * dy.abs() {
        '-'
    } else if dy.abs() > 2.0 * dx.abs() {
        '|'
    } else if dx * dy > 0.0 {
        '\\'
    } else {
        '/'
    }
}

/// Clip a segment to the canvas plus a one-cell margin (Liang-Barsky)
///
/// Clipped ends are snapped onto the boundary they were cut by.
fn clip_segment(
    a: Point2<f32>,
    b: Point2<f32>,
    width: f32,
    height: f32,
) -> Option<(Point2<f32>, Point2<f32>)> {
    let d = b - a;
    let bounds = [
        (-d.x, a.x + 1.0),
        (d.x, width + 1.0 - a.x),
        (-d.y, a.y + 1.0),
        (d.y, height + 1.0 - a.y),
    ];
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    let (mut enter, mut exit) = (None, None);
    for (k, (p, q)) in bounds.into_iter().enumerate() {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 && t > t0 {
            t0 = t;
            enter = Some(k);
        } else if p > 0.0 && t < t1 {
            t1 = t;
            exit = Some(k);
        }
    }
    if t0 > t1 {
        return None;
    }
    let snap = |mut point: Point2<f32>, side: Option<usize>| {
        match side {
            Some(0) => point.x = -1.0,
            Some(1) => point.x = width + 1.0,
            Some(2) => point.y = -1.0,
            Some(3) => point.y = height + 1.0,
            _ => {}
        }
        point
    };
    let start = match enter {
        Some(_) => snap(a + d * t0, enter),
        None => a,
    };
    let end = match exit {
        Some(_) => snap(a + d * t1, exit),
        None => b,
    };
    Some((start, end))
}

#[derive(Debug, Clone)]
struct DrawState {
    transform: Matrix3<f32>,
    stroke: Color,
    fill: Color,
    fill_glyph: char,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Matrix3::identity(),
            stroke: Color::Reset,
            fill: Color::Reset,
            fill_glyph: LUMINOSITY_RAMP[1],
        }
    }
}

#[derive(Debug, Clone, Default)]
struct SubPath {
    points: Vec<Point2<f32>>,
    closed: bool,
}

/// Character-cell canvas that rasterizes paths as the scene draws them
pub struct AsciiCanvas {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    view: Matrix3<f32>,
    state: DrawState,
    stack: Vec<DrawState>,
    path: Vec<SubPath>,
}

impl AsciiCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
            view: Matrix3::identity(),
            state: DrawState::default(),
            stack: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        let view = self.view;
        *self = Self::new(width, height);
        self.view = view;
    }

    /// Place the world origin at the canvas centre with `scale` cells per
    /// unit horizontally and half that vertically, since cells are tall.
    pub fn set_view(&mut self, scale: f32) {
        let centre = Vector2::new(self.width as f32 / 2.0, self.height as f32 / 2.0);
        self.view = Matrix3::new_translation(&centre)
            * Matrix3::new_nonuniform_scaling(&Vector2::new(scale, scale / 2.0));
    }

    /// Blank the cells and reset the drawing state for a new frame
    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
        self.stack.clear();
        self.path.clear();
        self.state = DrawState {
            transform: self.view,
            ..DrawState::default()
        };
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Number of non-blank cells
    pub fn ink(&self) -> usize {
        self.char_buffer.iter().filter(|c| **c != ' ').count()
    }

    fn plot(&mut self, x: i32, y: i32, glyph: char, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.char_buffer[idx] = glyph;
        self.color_buffer[idx] = color;
    }

    fn draw_segment(&mut self, a: Point2<f32>, b: Point2<f32>) {
        let glyph = stroke_glyph(b.x - a.x, b.y - a.y);
        let Some((a, b)) = clip_segment(a, b, self.width as f32, self.height as f32) else {
            return;
        };
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let x = (a.x + dx * i as f32 / steps as f32).floor() as i32;
            let y = (a.y + dy * i as f32 / steps as f32).floor() as i32;
            self.plot(x, y, glyph, self.state.stroke);
        }
    }

    fn device(&self, x: f32, y: f32) -> Point2<f32> {
        self.state.transform.transform_point(&Point2::new(x, y))
    }
}

impl Surface for AsciiCanvas {
    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.device(x, y);
        self.path.push(SubPath {
            points: vec![p],
            closed: false,
        });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.device(x, y);
        match self.path.last_mut() {
            Some(sub) if !sub.closed => sub.points.push(p),
            _ => self.path.push(SubPath {
                points: vec![p],
                closed: false,
            }),
        }
    }

    fn close_path(&mut self) {
        if let Some(sub) = self.path.last_mut() {
            sub.closed = true;
        }
    }

    fn stroke(&mut self) {
        let path = std::mem::take(&mut self.path);
        for sub in &path {
            for pair in sub.points.windows(2) {
                self.draw_segment(pair[0], pair[1]);
            }
            if sub.closed && sub.points.len() > 2 {
                self.draw_segment(sub.points[sub.points.len() - 1], sub.points[0]);
            }
        }
        self.path = path;
    }

    /// Even-odd scanline fill, every subpath treated as closed
    fn fill(&mut self) {
        let path = std::mem::take(&mut self.path);
        for row in 0..self.height {
            let y = row as f32 + 0.5;
            let mut crossings: Vec<f32> = Vec::new();
            for sub in &path {
                let n = sub.points.len();
                for i in 0..n {
                    let (a, b) = (sub.points[i], sub.points[(i + 1) % n]);
                    if (a.y <= y) != (b.y <= y) {
                        crossings.push(a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x));
                    }
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                let start = ((span[0] - 0.5).ceil() as i32).max(0);
                let end = ((span[1] - 0.5).floor() as i32).min(self.width as i32 - 1);
                for x in start..=end {
                    self.plot(x, row as i32, self.state.fill_glyph, self.state.fill);
                }
            }
        }
        self.path = path;
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => log::warn!("restore without a matching save"),
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform *= Matrix3::new_translation(&Vector2::new(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.state.transform *= Matrix3::new_rotation(angle);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.state.stroke = parse_color(color).0;
    }

    fn set_fill_style(&mut self, color: &str) {
        let (fill, lum) = parse_color(color);
        // Keep fills in the light half of the ramp so strokes stay readable
        let idx = 1 + (lum.clamp(0.0, 1.0) * 3.0).round() as usize;
        self.state.fill = fill;
        self.state.fill_glyph = LUMINOSITY_RAMP[idx];
    }

    fn set_line_cap(&mut self, _cap: LineCap) {}

    fn set_line_join(&mut self, _join: LineJoin) {}

    fn set_line_width(&mut self, _width: f32) {}
}

impl AsciiCanvas {
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<Color> = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> AsciiCanvas {
        let mut c = AsciiCanvas::new(40, 20);
        c.clear();
        c
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("black").0, Color::Reset);
        assert_eq!(parse_color("White").0, Color::White);
        assert_eq!(
            parse_color("#ff8000").0,
            Color::Rgb {
                r: 255,
                g: 128,
                b: 0
            }
        );
        assert_eq!(
            parse_color("#fff").0,
            Color::Rgb {
                r: 255,
                g: 255,
                b: 255
            }
        );
        assert_eq!(parse_color("chartreuse").0, Color::Reset);
    }

    #[test]
    fn test_horizontal_stroke() {
        let mut c = canvas();
        c.begin_path();
        c.move_to(2.0, 5.5);
        c.line_to(10.0, 5.5);
        c.stroke();
        for x in 2..=10 {
            assert_eq!(c.cell(x, 5), Some('-'), "x={}", x);
        }
        assert_eq!(c.cell(11, 5), Some(' '));
    }

    #[test]
    fn test_fill_square() {
        let mut c = canvas();
        c.set_fill_style("white");
        c.begin_path();
        c.move_to(2.0, 2.0);
        c.line_to(6.0, 2.0);
        c.line_to(6.0, 6.0);
        c.line_to(2.0, 6.0);
        c.close_path();
        c.fill();
        assert_eq!(c.ink(), 16);
        assert_eq!(c.cell(2, 2), Some(LUMINOSITY_RAMP[4]));
    }

    #[test]
    fn test_translate_is_scoped() {
        let mut c = canvas();
        c.save();
        c.translate(20.0, 0.0);
        c.begin_path();
        c.move_to(0.0, 1.5);
        c.line_to(3.0, 1.5);
        c.stroke();
        c.restore();
        c.begin_path();
        c.move_to(0.0, 3.5);
        c.line_to(3.0, 3.5);
        c.stroke();
        assert_eq!(c.cell(20, 1), Some('-'));
        assert_eq!(c.cell(0, 1), Some(' '));
        assert_eq!(c.cell(0, 3), Some('-'));
    }

    #[test]
    fn test_view_centres_origin() {
        let mut c = AsciiCanvas::new(40, 20);
        c.set_view(2.0);
        c.clear();
        let p = c.device(0.0, 0.0);
        assert_eq!(p, Point2::new(20.0, 10.0));
        let q = c.device(1.0, 2.0);
        assert_eq!(q, Point2::new(22.0, 12.0));
    }

    #[test]
    fn test_fill_wider_than_canvas() {
        let mut c = canvas();
        c.set_fill_style("white");
        c.begin_path();
        c.move_to(-1e9, 2.0);
        c.line_to(1e9, 2.0);
        c.line_to(1e9, 5.0);
        c.line_to(-1e9, 5.0);
        c.close_path();
        c.fill();
        assert_eq!(c.ink(), 3 * 40);
        assert_eq!(c.cell(0, 2), Some(LUMINOSITY_RAMP[4]));
        assert_eq!(c.cell(39, 4), Some(LUMINOSITY_RAMP[4]));
        assert_eq!(c.cell(0, 5), Some(' '));
    }

    #[test]
    fn test_stroke_clipped_to_canvas() {
        let mut c = canvas();
        c.begin_path();
        c.move_to(-1e9, 7.5);
        c.line_to(1e9, 7.5);
        c.stroke();
        assert_eq!(c.ink(), 40);
        assert_eq!(c.cell(0, 7), Some('-'));
        assert_eq!(c.cell(39, 7), Some('-'));

        // Entirely off to one side
        c.clear();
        c.begin_path();
        c.move_to(-1e9, -1e9);
        c.line_to(-5e8, 1e9);
        c.stroke();
        assert_eq!(c.ink(), 0);
    }

    #[test]
    fn test_clip_keeps_inner_segment() {
        let (a, b) = (Point2::new(2.0, 3.0), Point2::new(9.0, 4.0));
        assert_eq!(clip_segment(a, b, 40.0, 20.0), Some((a, b)));
        assert_eq!(
            clip_segment(Point2::new(50.0, 3.0), Point2::new(60.0, 3.0), 40.0, 20.0),
            None
        );
    }

    #[test_log::test]
    fn test_unbalanced_restore_keeps_state() {
        let mut c = canvas();
        c.translate(1.0, 1.0);
        c.restore();
        assert_eq!(c.device(0.0, 0.0), Point2::new(1.0, 1.0));
    }

    #[test]
    fn test_stroke_glyphs() {
        assert_eq!(stroke_glyph(4.0, 0.5), '-');
        assert_eq!(stroke_glyph(0.2, 3.0), '|');
        assert_eq!(stroke_glyph(2.0, 2.0), '\\');
        assert_eq!(stroke_glyph(-2.0, 2.0), '/');
    }
}
