/// Terminal front end: drives a scene onto an ASCII canvas
use anyhow::Context;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use isocube_core::Scene;
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiCanvas;

/// Half extents of everything a scene can draw, in world units
pub fn scene_extent(scene: &Scene) -> (f32, f32) {
    // No projected vertex lies farther out than the cube's half diagonal
    let reach = scene.cube().size() * 3.0f32.sqrt();
    let (mut half_w, mut half_h) = (0.0f32, 0.0f32);
    if let Some(layout) = scene.layout() {
        for offset in layout.offsets() {
            half_w = half_w.max(offset.x.abs());
            half_h = half_h.max(offset.y.abs());
        }
    }
    (half_w + reach, half_h + reach)
}

/// Cells per world unit that fit the scene into a `width x height` grid,
/// given that cells are about twice as tall as they are wide
pub fn fit_scale(scene: &Scene, width: usize, height: usize) -> f32 {
    let (half_w, half_h) = scene_extent(scene);
    (width as f32 / (2.0 * half_w)).min(height as f32 / half_h)
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: Scene,
    title: String,
    canvas: AsciiCanvas,
    running: bool,
    last_tick: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, title: impl Into<String>) -> anyhow::Result<Self> {
        let (width, height) = terminal::size().context("failed to query terminal size")?;
        let mut canvas = AsciiCanvas::new(width as usize, height as usize);
        canvas.set_view(fit_scale(&scene, width as usize, height as usize));

        Ok(Self {
            scene,
            title: title.into(),
            canvas,
            running: true,
            last_tick: Instant::now(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        self.last_tick = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            let dt = frame_start.duration_since(self.last_tick).as_secs_f32();
            self.last_tick = frame_start;
            self.scene.update(dt)?;

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> anyhow::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }) => {
                self.running = false;
            }
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {}x{}", width, height);
                self.canvas.resize(width as usize, height as usize);
                self.canvas
                    .set_view(fit_scale(&self.scene, width as usize, height as usize));
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&mut self) -> anyhow::Result<()> {
        self.canvas.clear();
        self.scene.render(&mut self.canvas);

        let mut stdout = stdout();
        self.canvas.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Isocube | {} | loop {:.0}% | FPS: {:.1} | Q=Quit",
                self.title,
                self.scene.state().anim_amt() * 100.0,
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isocube_core::SceneConfig;

    fn scene(preset: &str) -> Scene {
        Scene::new(SceneConfig::preset(preset).unwrap()).unwrap()
    }

    #[test]
    fn test_single_cube_extent() {
        let s = scene("wireframe");
        let (w, h) = scene_extent(&s);
        let reach = 100.0 * 3.0f32.sqrt();
        assert!((w - reach).abs() < 1e-3);
        assert!((h - reach).abs() < 1e-3);
    }

    #[test]
    fn test_field_extent_grows() {
        let single = scene_extent(&scene("silhouette"));
        let field = scene_extent(&scene("hex-field"));
        assert!(field.0 > single.0);
        assert!(field.1 > single.1);
    }

    #[test]
    fn test_scene_fits_canvas() {
        for preset in isocube_core::config::PRESETS {
            let mut s = scene(preset);
            let (width, height) = (120, 40);
            let mut canvas = AsciiCanvas::new(width, height);
            canvas.set_view(fit_scale(&s, width, height));
            for _ in 0..8 {
                s.update(0.41).unwrap();
                canvas.clear();
                s.render(&mut canvas);
                assert!(canvas.ink() > 0, "{} drew nothing", preset);
            }
        }
    }

    #[test]
    fn test_faces_fill_the_centre() {
        // The front faces are painted over the origin
        let mut s = scene("faces");
        s.seek(0.5);
        let mut canvas = AsciiCanvas::new(80, 40);
        canvas.set_view(fit_scale(&s, 80, 40));
        canvas.clear();
        s.render(&mut canvas);
        let centre = canvas.cell(40, 20).unwrap();
        assert_ne!(centre, ' ');
    }
}
