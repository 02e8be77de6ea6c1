mod common;

use std::collections::VecDeque;

use common::{Assets, CAT_SIZE, Call, ICON_SIZE, RecordingBackend};
use rectgrid::AppConfig;
use rectgrid::frame::{DEBUG_PROMPT, Demo, HELLO_TEXT, LoopState};
use rectgrid::graphics::{Color, Flip, Graphics};
use rectgrid::input::{
    InputEvent, KeyCode, KeyEventKind, KeyboardEvent, ModifiersState, MouseButton,
    MouseButtonEvent, MouseEventKind, NativeKeyCode, PhysicalKey,
};
use rectgrid::world::{CELL_SIZE, GRID_COLS, GRID_ROWS};

// ── helpers ───────────────────────────────────────────────────────────────────

fn config(assets: &Assets) -> AppConfig {
    AppConfig::default().with_asset_root(&assets.root).with_font("block", 8.0)
}

fn setup(assets: &Assets) -> (Graphics<RecordingBackend>, Demo) {
    let cfg = config(assets);
    let mut gfx = Graphics::new(RecordingBackend::new(cfg.width, cfg.height), cfg.font_dir.clone());
    let demo = Demo::with_seed(&mut gfx, &cfg, 7).unwrap();
    (gfx, demo)
}

fn key_down(ch: char) -> InputEvent {
    InputEvent::Key(KeyboardEvent {
        timestamp_ms: 250,
        kind: KeyEventKind::KeyDown,
        key: PhysicalKey::Code(KeyCode::KeyA),
        text: Some(ch),
        modifiers: ModifiersState::empty(),
        pressed: true,
        repeat: false,
    })
}

fn mouse_up() -> InputEvent {
    InputEvent::MouseButton(MouseButtonEvent {
        timestamp_ms: 300,
        window_id: 1,
        kind: MouseEventKind::ButtonUp,
        button: MouseButton::Left,
        pressed: false,
        clicks: 1,
        x: 5,
        y: 6,
    })
}

// ── Start-up ──────────────────────────────────────────────────────────────────

#[test]
fn new_loads_two_images_and_two_texts() {
    let assets = Assets::new();
    let (gfx, demo) = setup(&assets);
    assert_eq!(gfx.images().len(), 4);
    assert_eq!(demo.state(), LoopState::Running);
    assert_eq!(demo.hello_text().text(), HELLO_TEXT);
    assert_eq!(demo.debug_text().text(), DEBUG_PROMPT);
    assert_eq!(demo.screen_size(), (640, 480));
}

#[test]
fn missing_image_is_an_image_load_error() {
    let assets = Assets::new();
    std::fs::remove_file(assets.image_dir().join("cat.png")).unwrap();
    let cfg = config(&assets);
    let mut gfx = Graphics::new(RecordingBackend::new(640, 480), cfg.font_dir.clone());

    let err = Demo::with_seed(&mut gfx, &cfg, 1).err().unwrap();
    assert_eq!(err.exit_code(), 4);

    // The icon was loaded before the failure; teardown still frees it.
    let renderer = gfx.destroy();
    assert!(renderer.live.is_empty());
}

#[test]
fn missing_font_is_a_font_error() {
    let assets = Assets::new();
    let cfg = config(&assets).with_font("absent", 8.0);
    let mut gfx = Graphics::new(RecordingBackend::new(640, 480), cfg.font_dir.clone());
    let err = Demo::with_seed(&mut gfx, &cfg, 1).err().unwrap();
    assert_eq!(err.exit_code(), 5);
}

// ── Drawing ───────────────────────────────────────────────────────────────────

#[test]
fn frame_draws_scene_in_order() {
    let assets = Assets::new();
    let (mut gfx, mut demo) = setup(&assets);
    let mut events = VecDeque::new();

    assert_eq!(demo.frame(&mut gfx, &mut events).unwrap(), LoopState::Running);

    let calls = gfx.renderer.last_frame().to_vec();
    assert_eq!(calls.len(), 8, "{calls:?}");
    assert_eq!(calls[0], Call::SetDrawColor(Color::WHITE));
    assert_eq!(calls[1], Call::Clear);
    assert_eq!(calls[2], Call::SetDrawColor(Color::BLACK));

    let Call::FillRect(cell) = calls[3] else { panic!("expected a cell fill, got {:?}", calls[3]) };
    assert_eq!((cell.w, cell.h), (CELL_SIZE, CELL_SIZE));
    assert_eq!(cell.x % CELL_SIZE as i32, 0);
    assert_eq!(cell.y % CELL_SIZE as i32, 0);
    assert!(cell.x < (GRID_COLS as u32 * CELL_SIZE) as i32);
    assert!(cell.y < (GRID_ROWS as u32 * CELL_SIZE) as i32);

    let Call::Copy { dst: icon, angle, .. } = calls[4] else { panic!("expected icon copy") };
    assert_eq!((icon.x, icon.y), (640 - ICON_SIZE.0 as i32, 0));
    assert_eq!(angle, 0.0);

    let Call::Copy { dst: cat, angle, flip, .. } = calls[5] else { panic!("expected cat copy") };
    assert_eq!((cat.x, cat.y, cat.w, cat.h), ((640 - CAT_SIZE.0 as i32) / 2, 60, CAT_SIZE.0, CAT_SIZE.1));
    assert_eq!(angle, 1.0);
    assert_eq!(flip, Flip::Horizontal);

    assert!(matches!(calls[6], Call::Copy { texture, .. } if texture == demo.hello_text().image().texture));
    assert!(matches!(calls[7], Call::Copy { texture, .. } if texture == demo.debug_text().image().texture));
}

#[test]
fn angle_advances_and_wraps() {
    let assets = Assets::new();
    let (mut gfx, mut demo) = setup(&assets);
    let mut events = VecDeque::new();

    for _ in 0..359 {
        demo.frame(&mut gfx, &mut events).unwrap();
    }
    assert_eq!(demo.angle(), 359.0);
    demo.frame(&mut gfx, &mut events).unwrap();
    assert_eq!(demo.angle(), 0.0);
    demo.frame(&mut gfx, &mut events).unwrap();
    assert_eq!(demo.angle(), 1.0);
}

#[test]
fn same_seed_fills_same_cells() {
    let assets = Assets::new();
    let fills = |seed: u64| {
        let cfg = config(&assets);
        let mut gfx = Graphics::new(RecordingBackend::new(640, 480), cfg.font_dir.clone());
        let mut demo = Demo::with_seed(&mut gfx, &cfg, seed).unwrap();
        let mut events = VecDeque::new();
        for _ in 0..20 {
            demo.frame(&mut gfx, &mut events).unwrap();
        }
        gfx.renderer
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::FillRect(r) => Some(*r),
                _ => None,
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(fills(99), fills(99));
}

// ── Events ────────────────────────────────────────────────────────────────────

#[test]
fn key_event_updates_debug_text() {
    let assets = Assets::new();
    let (mut gfx, mut demo) = setup(&assets);
    let mut events = VecDeque::from(vec![key_down('q')]);

    demo.frame(&mut gfx, &mut events).unwrap();

    assert_eq!(
        demo.debug_text().text(),
        "[250 ms] screen_width:640 Keyboard, type:KeyDown, sym:q, modifiers:0, state:1, repeat:0"
    );
    assert_eq!(gfx.images().len(), 4);
    assert!(events.is_empty());
}

#[test]
fn mouse_event_leaves_scene_untouched() {
    let assets = Assets::new();
    let (mut gfx, mut demo) = setup(&assets);
    let mut events = VecDeque::from(vec![mouse_up()]);

    assert_eq!(demo.frame(&mut gfx, &mut events).unwrap(), LoopState::Running);
    assert_eq!(demo.debug_text().text(), DEBUG_PROMPT);
}

#[test]
fn scripted_session_stops_on_quit() {
    let assets = Assets::new();
    let (mut gfx, mut demo) = setup(&assets);
    let mut events = VecDeque::from(vec![key_down('a'), mouse_up(), InputEvent::Quit, key_down('b')]);

    // Events are drained after drawing, so the quit is seen in this frame
    // and everything queued behind it is still handled.
    assert_eq!(demo.frame(&mut gfx, &mut events).unwrap(), LoopState::Stopped);
    assert!(events.is_empty());
    assert!(demo.debug_text().text().contains("sym:b"));
    assert_eq!(gfx.renderer.calls.iter().filter(|c| **c == Call::Present).count(), 1);
}

#[test]
fn unidentified_key_still_reaches_debug_text() {
    let assets = Assets::new();
    let (mut gfx, mut demo) = setup(&assets);
    let mut events = VecDeque::from(vec![InputEvent::Key(KeyboardEvent {
        timestamp_ms: 10,
        kind: KeyEventKind::KeyUp,
        key: PhysicalKey::Unidentified(NativeKeyCode::Xkb(200)),
        text: None,
        modifiers: ModifiersState::empty(),
        pressed: false,
        repeat: false,
    })]);

    demo.frame(&mut gfx, &mut events).unwrap();
    let text = demo.debug_text().text();
    assert!(text.contains("type:KeyUp, sym:Xkb("), "{text}");
}

#[test]
fn close_is_handled_without_drawing() {
    let assets = Assets::new();
    let (mut gfx, mut demo) = setup(&assets);
    let mut events = VecDeque::from(vec![key_down('z'), InputEvent::Quit]);

    assert_eq!(demo.drain_events(&mut gfx, &mut events).unwrap(), LoopState::Stopped);
    assert!(events.is_empty());
    assert!(gfx.renderer.calls.is_empty());
    assert!(demo.debug_text().text().contains("sym:z"));

    let renderer = demo.shutdown(gfx);
    assert!(renderer.live.is_empty());
}

#[test]
fn shutdown_destroys_every_texture_once() {
    let assets = Assets::new();
    let (mut gfx, mut demo) = setup(&assets);
    let mut events = VecDeque::from(vec![key_down('a'), key_down('b'), InputEvent::Quit]);
    demo.frame(&mut gfx, &mut events).unwrap();

    let renderer = demo.shutdown(gfx);
    assert!(renderer.live.is_empty());
    assert_eq!(renderer.destroyed.len(), renderer.uploads.len());
    assert!(renderer.destroyed.values().all(|&n| n == 1));
}

#[test]
fn scene_loads_with_truetype_font() {
    let assets = Assets::new();
    let cfg = config(&assets).with_font("mono", 12.0);
    let mut gfx = Graphics::new(RecordingBackend::new(640, 480), cfg.font_dir.clone());
    let demo = Demo::with_seed(&mut gfx, &cfg, 5).unwrap();

    let hello = demo.hello_text().image();
    assert!(hello.width > 200 && hello.width < 320, "{}", hello.width);
    assert_eq!(demo.hello_text().rect().x, (640 - hello.width as i32) / 2);
}
