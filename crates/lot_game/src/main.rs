//! Parking Servis -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Keyboard chords and
//! clicks are applied to the lot the moment they arrive. The shell keys
//! (Escape, F3) are read from the edge-triggered input set once per event
//! batch in `about_to_wait`. Everything time-based runs once per
//! `RedrawRequested`:
//!
//!   1. `begin_frame()` -- measure the wall-clock delta since the last frame
//!   2. tick the lot (expiry audit records, blinking) and the title banner
//!   3. compose the frame into the renderer's draw list
//!   4. encode the lot pass, composite the egui overlay, present
//!
//! Between frames the loop sleeps until the clock's next deadline, which caps
//! the frame rate at the configured target.

mod audio;
mod config;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use audio::{Cue, CuePlayer};
use config::{load_config_or_default, GameConfig};
use lot_core::dispatch::{dispatch_click, dispatch_keys};
use lot_core::input::{InputState, Key};
use lot_core::layout::LotLayout;
use lot_core::view::{draw_frame, LotScene};
use lot_core::{FrameClock, LotTextures, ParkingLot, SpotEvent, SpotEventKind, TitleBanner};
use lot_devtools::{DebugOverlay, OverlayStats};
use lot_render::{load_font, GpuContext, Renderer};

const CONFIG_PATH: &str = "assets/config/parking.json";
const STEP_DT: f32 = 1.0 / 60.0;

/// All mutable application state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
struct LotState {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: Renderer,
    textures: LotTextures,
    debug_overlay: DebugOverlay,
    clock: FrameClock,
    input: InputState,
    layout: LotLayout,
    lot: ParkingLot,
    banner: TitleBanner,
    rng: StdRng,
    cues: Box<dyn CuePlayer>,
    credit: String,
    minimized: bool,
    paused: bool,
    single_step_requested: bool,
}

impl LotState {
    fn new(window: Arc<Window>, config: &GameConfig) -> Self {
        let gpu = GpuContext::new(window.clone())
            .unwrap_or_else(|err| panic!("Failed to initialise GPU: {err}"));
        let (glyphs, glyph_atlas) = load_font(&config.font.path, config.font.pixel_size)
            .unwrap_or_else(|err| {
                panic!("Failed to load font: {err}. The font is required, see assets/README.md")
            });

        let mut renderer = Renderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.surface_format,
            gpu.size,
            glyphs,
            &glyph_atlas,
        )
        .unwrap_or_else(|err| panic!("Failed to build renderer: {err}"));
        let textures = LotTextures {
            background: renderer.load_texture(&gpu.device, &gpu.queue, &config.textures.background),
            spot: renderer.load_texture(&gpu.device, &gpu.queue, &config.textures.spot),
            car: renderer.load_texture(&gpu.device, &gpu.queue, &config.textures.car),
        };

        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);
        let rng = match config.seed {
            Some(seed) => {
                log::info!("Using fixed RNG seed {seed}");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        let cues = audio::open_player(&config.sounds);
        let layout = LotLayout::new(gpu.size.0, gpu.size.1);

        Self {
            window,
            gpu,
            renderer,
            textures,
            debug_overlay,
            clock: FrameClock::new(config.target_fps),
            input: InputState::new(),
            layout,
            lot: ParkingLot::new(),
            banner: TitleBanner::new(),
            rng,
            cues,
            credit: config.credit.clone(),
            minimized: false,
            paused: false,
            single_step_requested: false,
        }
    }

    fn on_spot_event(&mut self, event: SpotEvent) {
        let spot = self.lot.spot(event.spot);
        match event.kind {
            SpotEventKind::Parked => {
                log::info!(
                    "Spot {} parked: {} ({})",
                    event.spot,
                    spot.license_plate,
                    spot.driver_name
                );
                self.cues.play(Cue::Park);
            }
            SpotEventKind::Renewed => log::info!("Spot {} renewed", event.spot),
            SpotEventKind::Left => {
                log::info!("Spot {} left", event.spot);
                self.cues.play(Cue::Leave);
            }
            SpotEventKind::InfoToggled => {
                log::debug!("Spot {} info: {}", event.spot, spot.show_info);
            }
        }
    }

    fn handle_chord(&mut self) {
        if let Some(event) = dispatch_keys(&mut self.lot, &self.input, &mut self.rng) {
            self.on_spot_event(event);
        }
    }

    /// Returns false when the app should exit.
    fn handle_shell_keys(&mut self) -> bool {
        let requests = ShellRequests::from_input(&self.input);
        self.input.end_frame();
        if requests.toggle_overlay {
            self.debug_overlay.toggle();
        }
        !requests.exit
    }

    fn update(&mut self, dt: f32) {
        let dt = if self.paused {
            if !self.single_step_requested {
                return;
            }
            self.single_step_requested = false;
            STEP_DT
        } else {
            dt
        };

        let now = chrono::Local::now().time();
        for record in self.lot.tick(dt, now) {
            log::info!(target: "audit", "{record}");
            self.cues.play(Cue::Indicator);
        }
        self.banner.tick(dt, &mut self.rng);
    }

    fn overlay_stats(&self) -> OverlayStats {
        let frame = self.renderer.stats();
        OverlayStats {
            draw_calls: frame.draw_calls,
            vertices: frame.vertices,
            memory_estimate_mb: self.renderer.estimate_memory_mb(),
            occupied_spots: self.lot.occupied_count() as u32,
            blinking_spots: self.lot.blinking_count() as u32,
            banner_label: self.banner.current_text.label(),
            banner_progress: self.banner.transition_progress,
            paused: self.paused,
        }
    }

    fn redraw(&mut self) {
        if self.minimized {
            return;
        }

        let dt = self.clock.begin_frame();
        self.update(dt);

        self.renderer.begin_frame();
        draw_frame(
            &mut self.renderer,
            &LotScene {
                lot: &self.lot,
                banner: &self.banner,
                layout: &self.layout,
                textures: self.textures,
                credit: &self.credit,
            },
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.overlay_stats();
        let (egui_primitives, egui_textures_delta, overlay_actions) =
            self.debug_overlay
                .prepare(&self.window, &self.clock, &stats);
        if overlay_actions.toggle_pause {
            self.paused = !self.paused;
            log::info!(
                "Simulation {}",
                if self.paused { "PAUSED" } else { "RESUMED" }
            );
        }
        if overlay_actions.single_step {
            self.single_step_requested = true;
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer
            .render(&self.gpu.device, &self.gpu.queue, &mut encoder, &view);

        self.debug_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.debug_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.debug_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Shell actions requested by keys pressed since the last event batch.
#[derive(Debug, Default, PartialEq, Eq)]
struct ShellRequests {
    exit: bool,
    toggle_overlay: bool,
}

impl ShellRequests {
    fn from_input(input: &InputState) -> Self {
        Self {
            exit: input.is_just_pressed(Key::Escape),
            toggle_overlay: input.is_just_pressed(Key::F3),
        }
    }
}

fn is_shell_key(key: Key) -> bool {
    matches!(key, Key::Escape | Key::F3)
}

/// A zero-sized surface cannot be configured; winit reports one while the
/// window is minimized.
fn is_drawable(width: u32, height: u32) -> bool {
    width > 0 && height > 0
}

struct App {
    config: GameConfig,
    state: Option<LotState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let platform = self.config.platform_config();
        let window = lot_platform::create_window(event_loop, &platform)
            .unwrap_or_else(|err| panic!("{err}"));
        log::info!("Window created: {}x{}", platform.width, platform.height);
        install_cursor(event_loop, &window, &self.config.cursor);
        self.state = Some(LotState::new(window, &self.config));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            if !state.handle_shell_keys() {
                log::info!("Escape pressed, exiting.");
                event_loop.exit();
                return;
            }
            let deadline = state.clock.next_frame_deadline();
            if Instant::now() >= deadline {
                state.window.request_redraw();
            }
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                state.minimized = !is_drawable(w, h);
                if state.minimized {
                    log::debug!("Window minimized, rendering suspended");
                } else if state.gpu.resize(w, h) {
                    state.renderer.set_viewport(w, h);
                    state.layout = LotLayout::new(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => state.input.release_all(),

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => {
                                if state.input.key_down(key) && !is_shell_key(key) {
                                    state.handle_chord();
                                }
                            }
                            ElementState::Released => state.input.key_up(key),
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.mouse_position = (position.x, position.y);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } if !egui_consumed => {
                let cursor = state.input.mouse_position;
                if let Some(event) = dispatch_click(&mut state.lot, &state.layout, cursor) {
                    state.on_spot_event(event);
                }
            }

            WindowEvent::RedrawRequested => state.redraw(),

            _ => {}
        }
    }
}

/// Swap the OS pointer for the configured image, hotspot at its top-left.
/// Failure keeps the default pointer.
fn install_cursor(event_loop: &ActiveEventLoop, window: &Window, path: &Path) {
    let cursor = image::open(path)
        .map_err(|e| format!("Failed to load cursor '{}': {e}", path.display()))
        .and_then(|img| {
            let rgba = img.to_rgba8();
            let (w, h) = rgba.dimensions();
            let width = u16::try_from(w).map_err(|_| format!("Cursor too wide: {w}"))?;
            let height = u16::try_from(h).map_err(|_| format!("Cursor too tall: {h}"))?;
            lot_platform::create_cursor(event_loop, rgba.into_raw(), width, height, 0, 0)
        });
    match cursor {
        Ok(cursor) => window.set_cursor(cursor),
        Err(err) => log::warn!("{err}. Keeping the system cursor."),
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyB => Some(Key::B),
        KeyCode::Digit1 | KeyCode::Numpad1 => Some(Key::Digit1),
        KeyCode::Digit2 | KeyCode::Numpad2 => Some(Key::Digit2),
        KeyCode::Digit3 | KeyCode::Numpad3 => Some(Key::Digit3),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Key::Shift),
        KeyCode::ControlLeft | KeyCode::ControlRight => Some(Key::Control),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Parking Servis starting...");

    let config = load_config_or_default(Path::new(CONFIG_PATH));

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
