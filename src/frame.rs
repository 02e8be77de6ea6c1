use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::graphics::{Color, Flip, Graphics, Image, RenderBackend};
use crate::input::{EventSource, InputEvent};
use crate::text::{BottomCentered, TextObject, TextStyle};
use crate::world::{CellPicker, Rect, RectGrid, create_rect_grid};

/// Text shown before the first key press.
pub const DEBUG_PROMPT: &str = "Press a key to show keyevent";
pub const HELLO_TEXT: &str = "Kitty cat is testing your application";

const DEBUG_COLOR: Color = Color::rgba8(0, 0, 0, 120);
/// Distance of the debug text's top edge from the bottom of the screen.
const DEBUG_OFFSET: u32 = 80;
/// Distance of the hello text's top edge from the bottom of the screen.
const HELLO_OFFSET: u32 = 100;
/// Top edge of the rotating cat.
const CAT_Y: i32 = 60;

/// Frame loop state. `Stopped` is terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// The demo scene and its per-frame state.
pub struct Demo {
    grid: RectGrid,
    picker: CellPicker,
    icon: Image,
    cat: Image,
    hello: TextObject<BottomCentered>,
    debug: TextObject<BottomCentered>,
    /// Cat rotation in degrees, `[0, 360)`.
    angle: f64,
    screen_width: u32,
    screen_height: u32,
    state: LoopState,
}

impl Demo {
    /// Load the scene's images and text. The cell picker is seeded from
    /// the clock.
    pub fn new<B: RenderBackend>(gfx: &mut Graphics<B>, config: &AppConfig) -> AppResult<Self> {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::with_seed(gfx, config, seed)
    }

    pub fn with_seed<B: RenderBackend>(
        gfx: &mut Graphics<B>,
        config: &AppConfig,
        seed: u64,
    ) -> AppResult<Self> {
        let icon = gfx.load_image(config.image_dir.join("icon.png"))?;
        let cat = gfx.load_image(config.image_dir.join("cat.png"))?;

        // Screen geometry comes from the renderer, not the config, so the
        // scene follows whatever size the window actually got.
        let (screen_width, screen_height) = gfx.renderer.output_size();

        let hello = TextObject::new(
            gfx,
            TextStyle { font: config.font_name.clone(), font_size: config.font_size, color: Color::RED },
            HELLO_TEXT,
            BottomCentered { screen_width, screen_height, offset: HELLO_OFFSET },
        )?;

        let debug = TextObject::new(
            gfx,
            TextStyle { font: config.font_name.clone(), font_size: config.font_size, color: DEBUG_COLOR },
            DEBUG_PROMPT,
            BottomCentered { screen_width, screen_height, offset: DEBUG_OFFSET },
        )?;

        Ok(Self {
            grid: create_rect_grid(),
            picker: CellPicker::new(seed),
            icon,
            cat,
            hello,
            debug,
            angle: 0.0,
            screen_width,
            screen_height,
            state: LoopState::Running,
        })
    }

    pub fn state(&self) -> LoopState { self.state }
    pub fn angle(&self) -> f64 { self.angle }
    pub fn debug_text(&self) -> &TextObject<BottomCentered> { &self.debug }
    pub fn hello_text(&self) -> &TextObject<BottomCentered> { &self.hello }
    pub fn screen_size(&self) -> (u32, u32) { (self.screen_width, self.screen_height) }

    /// One loop iteration: draw, present, then drain and dispatch every
    /// pending event. Returns the state after the events were handled.
    pub fn frame<B: RenderBackend, E: EventSource>(
        &mut self,
        gfx: &mut Graphics<B>,
        events: &mut E,
    ) -> AppResult<LoopState> {
        self.draw(&mut gfx.renderer);
        gfx.renderer.present();
        self.drain_events(gfx, events)
    }

    /// Dispatch every pending event without drawing. Used on its own when
    /// the window must react (e.g. to a close request) while no frame is
    /// being drawn.
    pub fn drain_events<B: RenderBackend, E: EventSource>(
        &mut self,
        gfx: &mut Graphics<B>,
        events: &mut E,
    ) -> AppResult<LoopState> {
        while let Some(event) = events.poll_event() {
            self.handle_event(gfx, event)?;
        }
        Ok(self.state)
    }

    fn draw<B: RenderBackend>(&mut self, renderer: &mut B) {
        self.angle += 1.0;
        if self.angle >= 360.0 {
            self.angle = 0.0;
        }

        renderer.set_draw_color(Color::WHITE);
        renderer.clear();

        renderer.set_draw_color(Color::BLACK);
        let (row, col) = self.picker.pick();
        renderer.fill_rect(self.grid[row][col]);

        let icon_dst = Rect::new(
            self.screen_width as i32 - self.icon.width as i32,
            0,
            self.icon.width,
            self.icon.height,
        );
        renderer.copy(self.icon.texture, icon_dst);

        let cat_dst = Rect::new(
            (self.screen_width as i32 - self.cat.width as i32) / 2,
            CAT_Y,
            self.cat.width,
            self.cat.height,
        );
        renderer.copy_ex(self.cat.texture, cat_dst, self.angle, Flip::Horizontal);

        self.hello.draw(renderer);
        self.debug.draw(renderer);
    }

    /// React to one event. Key events update the debug overlay; mouse
    /// events are only logged.
    pub fn handle_event<B: RenderBackend>(&mut self, gfx: &mut Graphics<B>, event: InputEvent) -> AppResult<()> {
        match event {
            InputEvent::Quit => {
                log::debug!("quit requested");
                self.state = LoopState::Stopped;
            }
            InputEvent::Key(key) => {
                let msg = key.describe(self.screen_width);
                self.debug.set_text(gfx, &msg)?;
                log::info!("{msg}");
            }
            InputEvent::MouseButton(button) => {
                log::info!("{}", button.describe());
            }
        }
        Ok(())
    }

    /// Tear the scene down together with the graphics context, releasing
    /// every image exactly once. Returns the renderer so the caller decides
    /// when the window goes away.
    pub fn shutdown<B: RenderBackend>(self, gfx: Graphics<B>) -> B {
        gfx.destroy()
    }
}
