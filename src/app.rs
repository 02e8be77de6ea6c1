use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::frame::{Demo, LoopState};
use crate::graphics::Graphics;
use crate::graphics::gpu::WgpuBackend;
use crate::input::{
    ClickCounter, InputEvent, KeyEventKind, KeyboardEvent, MouseButtonEvent, MouseEventKind,
};

/// Open the window and run the demo until it is closed.
///
/// Any start-up or resource error ends the loop and is returned here, after
/// whatever was already loaded has been torn down.
pub fn run(config: AppConfig) -> AppResult<()> {
    let event_loop = EventLoop::new().map_err(|e| AppError::Init(e.to_string()))?;
    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| AppError::Init(e.to_string()))?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct Session {
    gfx: Graphics<WgpuBackend>,
    demo: Demo,
}

struct App {
    config: AppConfig,
    session: Option<Session>,
    /// Events gathered since the last frame; drained by `Demo::frame`.
    pending: VecDeque<InputEvent>,
    modifiers: ModifiersState,
    cursor: [f64; 2],
    clicks: ClickCounter,
    started: Instant,
    next_frame: Instant,
    error: Option<AppError>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let now = Instant::now();
        Self {
            config,
            session: None,
            pending: VecDeque::new(),
            modifiers: ModifiersState::empty(),
            cursor: [0.0, 0.0],
            clicks: ClickCounter::new(),
            started: now,
            next_frame: now,
            error: None,
        }
    }

    fn timestamp_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> AppResult<Session> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(&self.config.title)
                    .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
                    .with_resizable(false),
            )
            .map_err(|e| AppError::Window(e.to_string()))?;

        let renderer = pollster::block_on(WgpuBackend::new(
            Arc::new(window),
            self.config.smooth_scaling,
        ))?;

        let mut gfx = Graphics::new(renderer, self.config.font_dir.clone());
        match Demo::new(&mut gfx, &self.config) {
            Ok(demo) => Ok(Session { gfx, demo }),
            Err(err) => {
                gfx.destroy();
                Err(err)
            }
        }
    }

    /// Tear down the scene (if any) and leave the event loop.
    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(Session { gfx, demo }) = self.session.take() {
            let renderer = demo.shutdown(gfx);
            drop(renderer);
            log::debug!("shutdown complete");
        }
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_mut() else { return };
        let outcome = session.demo.frame(&mut session.gfx, &mut self.pending);
        self.settle(event_loop, outcome);
    }

    /// Queue the quit and handle it now rather than on the next redraw,
    /// which a hidden or minimised window may never get.
    fn close_requested(&mut self, event_loop: &ActiveEventLoop) {
        self.pending.push_back(InputEvent::Quit);
        let Some(session) = self.session.as_mut() else {
            event_loop.exit();
            return;
        };
        let outcome = session.demo.drain_events(&mut session.gfx, &mut self.pending);
        self.settle(event_loop, outcome);
    }

    fn settle(&mut self, event_loop: &ActiveEventLoop, outcome: AppResult<LoopState>) {
        match outcome {
            Ok(LoopState::Running) => {}
            Ok(LoopState::Stopped) => self.stop(event_loop),
            Err(err) => {
                self.stop(event_loop);
                self.error = Some(err);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(session) => {
                self.session = Some(session);
                self.next_frame = Instant::now();
            }
            Err(err) => {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_ref() else { return };

        let now = Instant::now();
        if now >= self.next_frame {
            session.gfx.renderer.window.request_redraw();
            self.next_frame = now + self.config.frame_delay;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested(event_loop),

            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = [position.x, position.y];
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        repeat,
                        ref text,
                        ..
                    },
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                self.pending.push_back(InputEvent::Key(KeyboardEvent {
                    timestamp_ms: self.timestamp_ms(),
                    kind: if pressed { KeyEventKind::KeyDown } else { KeyEventKind::KeyUp },
                    key: physical_key,
                    text: text
                        .as_ref()
                        .and_then(|t| t.chars().next())
                        .filter(|ch| !ch.is_control()),
                    modifiers: self.modifiers,
                    pressed,
                    repeat,
                }));
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                let timestamp_ms = self.timestamp_ms();
                let (x, y) = (self.cursor[0] as i32, self.cursor[1] as i32);
                let clicks = if pressed {
                    self.clicks.press(button, timestamp_ms, x, y)
                } else {
                    self.clicks.release(button)
                };
                self.pending.push_back(InputEvent::MouseButton(MouseButtonEvent {
                    timestamp_ms,
                    window_id: u64::from(window_id),
                    kind: if pressed { MouseEventKind::ButtonDown } else { MouseEventKind::ButtonUp },
                    button,
                    pressed,
                    clicks,
                    x,
                    y,
                }));
            }

            WindowEvent::Resized(size) => {
                if let Some(session) = self.session.as_mut() {
                    session.gfx.renderer.resize(size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        // Closed by the platform rather than through the frame loop.
        if self.session.is_some() {
            self.stop(event_loop);
        }
    }
}
