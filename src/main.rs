//! Backdrop FX entry point
//!
//! In the browser: attaches one canvas per effect to the page container and
//! drives the stage from requestAnimationFrame, along with section reveals
//! and pointer-driven element transforms. Natively: runs the stage
//! headless on software surfaces and logs what each effect produced.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, MouseEvent, PointerEvent};

    use backdrop_fx::renderer::Surface;
    use backdrop_fx::web::{self, CanvasSurface};
    use backdrop_fx::{DeviceProfile, InputEvent, Stage, Viewport};

    /// Elements whose hover triggers a sparkle burst
    const INTERACTIVE: &str = "a, button, [data-magnetic]";

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("Backdrop FX starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(container) = web::container(&document) else {
            return;
        };

        let settings = web::load_settings(&container);
        let signals = web::probe_capabilities(&window);
        let profile = DeviceProfile::detect(&signals);
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let dims = web::window_size(&window);
        let dpr = window.device_pixel_ratio();

        log::info!(
            "Viewport {}x{}, {} device, seed {}",
            dims.width,
            dims.height,
            profile.as_str(),
            seed
        );

        let mut stage = Stage::new(
            &settings,
            profile,
            Viewport::new(dims.width, dims.height),
            seed,
            |kind, dims| {
                CanvasSurface::attach(&document, &container, kind, dims, dpr)
                    .map(|surface| Box::new(surface) as Box<dyn Surface>)
            },
        );
        stage.viewport_mut().on_resize(|dims| {
            log::debug!("Viewport resized to {}x{}", dims.width, dims.height);
        });

        let stage = Rc::new(RefCell::new(stage));
        setup_input_handlers(&window, stage.clone());
        request_animation_frame(stage);

        log::info!("Backdrop FX running!");
    }

    fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        event: &str,
        stage: &Rc<RefCell<Stage>>,
        mut map: impl FnMut(E) -> Option<InputEvent> + 'static,
    ) {
        let stage = stage.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |e: E| {
            if let Some(input) = map(e) {
                stage.borrow_mut().handle(input);
            }
        });
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(window: &web_sys::Window, stage: Rc<RefCell<Stage>>) {
        let target: &web_sys::EventTarget = window.as_ref();

        listen(target, "pointermove", &stage, |e: PointerEvent| {
            Some(InputEvent::PointerMove {
                x: e.client_x() as f32,
                y: e.client_y() as f32,
            })
        });
        listen(target, "pointerdown", &stage, |_: PointerEvent| {
            Some(InputEvent::PointerDown)
        });
        listen(target, "pointerup", &stage, |_: PointerEvent| {
            Some(InputEvent::PointerUp)
        });
        listen(target, "click", &stage, |e: MouseEvent| {
            Some(InputEvent::Click {
                x: e.client_x() as f32,
                y: e.client_y() as f32,
            })
        });

        // Hover enters on interactive elements
        listen(target, "pointerover", &stage, |e: PointerEvent| {
            let element = e.target()?.dyn_into::<Element>().ok()?;
            element
                .closest(INTERACTIVE)
                .ok()
                .flatten()
                .map(|_| InputEvent::HoverEnter)
        });

        {
            let window = window.clone();
            listen(target, "resize", &stage, move |_: web_sys::Event| {
                let dims = web::window_size(&window);
                Some(InputEvent::Resize {
                    width: dims.width,
                    height: dims.height,
                })
            });
        }
        {
            let window = window.clone();
            listen(target, "scroll", &stage, move |_: web_sys::Event| {
                Some(InputEvent::Scroll {
                    offset: window.scroll_y().unwrap_or(0.0) as f32,
                })
            });
        }

        // Release every canvas when the page goes away
        {
            let stage = stage.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                stage.borrow_mut().teardown_all();
            });
            let _ =
                target.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(stage: Rc<RefCell<Stage>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(stage, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(stage: Rc<RefCell<Stage>>, time: f64) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        {
            let mut s = stage.borrow_mut();
            if s.effects().is_empty() {
                log::info!("No effects left, stopping frame loop");
                return;
            }
            let viewport = s.viewport().current_size();
            for event in web::poll_sections(&document, viewport) {
                s.handle(event);
            }
            s.frame(time);
            for cue in s.due_reveals() {
                web::apply_reveal(&document, &cue);
            }
            web::apply_element_transforms(&document, &s);
        }

        request_animation_frame(stage);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_host::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use backdrop_fx::consts::TICK_MS;
    use backdrop_fx::renderer::{PixelSurface, Surface};
    use backdrop_fx::scheduler::{Clock, ManualClock};
    use backdrop_fx::{DeviceProfile, InputEvent, Settings, Stage, Viewport, ViewportDimensions};

    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;
    const DEFAULT_FRAMES: u32 = 600;
    const DEFAULT_SEED: u64 = 42;

    /// Pointer position for a frame of the scripted path (a slow Lissajous loop)
    fn pointer_path(frame: u32, dims: ViewportDimensions) -> Vec2 {
        let t = frame as f32 * 0.02;
        dims.center() + Vec2::new(t.sin() * dims.width * 0.35, (t * 1.5).cos() * dims.height * 0.3)
    }

    /// Scripted host events for one frame
    fn script(frame: u32, dims: ViewportDimensions) -> Vec<InputEvent> {
        let pos = pointer_path(frame, dims);
        let mut events = vec![InputEvent::PointerMove { x: pos.x, y: pos.y }];
        match frame % 120 {
            0 => events.push(InputEvent::PointerDown),
            6 => {
                events.push(InputEvent::PointerUp);
                events.push(InputEvent::Click { x: pos.x, y: pos.y });
            }
            60 => events.push(InputEvent::HoverEnter),
            _ => {}
        }
        events
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let config = args.next().and_then(|path| match std::fs::read_to_string(&path) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Cannot read {}: {}", path, e);
                None
            }
        });
        let frames = args
            .next()
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(DEFAULT_FRAMES);

        let settings = Settings::load_or_default(config.as_deref());
        let seed = settings.seed.unwrap_or(DEFAULT_SEED);
        let mut stage = Stage::new(
            &settings,
            DeviceProfile::Full,
            Viewport::new(WIDTH, HEIGHT),
            seed,
            |_, dims| Some(Box::new(PixelSurface::new(dims)) as Box<dyn Surface>),
        );
        stage.viewport_mut().on_resize(|dims| {
            log::debug!("Viewport resized to {}x{}", dims.width, dims.height);
        });

        let clock = ManualClock::new(0.0);
        let mut ticks = 0u64;
        for frame in 0..frames {
            let dims = stage.viewport().current_size();
            for event in script(frame, dims) {
                stage.handle(event);
            }
            stage.handle(InputEvent::Scroll {
                offset: frame as f32,
            });
            ticks += stage.frame(clock.now_ms()) as u64;
            clock.advance(TICK_MS);
        }

        log::info!(
            "Ran {} frames ({} effect ticks) at {}x{}, seed {}",
            frames,
            ticks,
            WIDTH,
            HEIGHT,
            seed
        );
        for fx in stage.effects() {
            let coverage = fx.surface().and_then(|s| s.coverage()).unwrap_or(0.0);
            log::info!(
                "{:>18}: {:>4} live / {:>4} capacity, {:>5.1}% painted",
                fx.kind().as_str(),
                fx.pool().len(),
                fx.pool().capacity(),
                coverage * 100.0
            );
        }

        stage.teardown_all();
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Backdrop FX (native) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
