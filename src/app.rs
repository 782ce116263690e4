//! Application shell: window, event plumbing and the redraw-driven loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::config;
use crate::error::{FrameError, InitError, SandglassError};
use crate::sim::FrameScheduler;
use crate::stats::RuntimeStatistics;

/// State shared between the event callbacks and the frame loop.
///
/// Written only by event delivery, read and cleared only by the scheduler
/// side. Atomics because event delivery is not guaranteed to happen on the
/// scheduler's thread.
#[derive(Default)]
pub struct SharedFlags {
    exit: AtomicBool,
    resize_pending: AtomicBool,
}

impl SharedFlags {
    pub fn request_exit(&self) {
        self.exit.store(true, Ordering::Relaxed);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit.load(Ordering::Relaxed)
    }

    pub fn notify_resized(&self) {
        self.resize_pending.store(true, Ordering::Relaxed);
    }

    /// Reads and clears the resize notification.
    pub fn take_resize_pending(&self) -> bool {
        self.resize_pending.swap(false, Ordering::Relaxed)
    }
}

pub struct SandglassApp {
    event_loop: EventLoop<()>,
    state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    scheduler: Option<FrameScheduler>,
    flags: Arc<SharedFlags>,
    stats: RuntimeStatistics,
    init_error: Option<InitError>,
    frame_error: Option<FrameError>,
}

impl SandglassApp {
    pub fn new() -> Result<Self, InitError> {
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop,
            state: AppState {
                window: None,
                scheduler: None,
                flags: Arc::new(SharedFlags::default()),
                stats: RuntimeStatistics::new(),
                init_error: None,
                frame_error: None,
            },
        })
    }

    /// Runs the application until exit is requested or a fatal error occurs.
    pub fn run(mut self) -> Result<(), SandglassError> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.state)?;

        if let Some(err) = self.state.init_error {
            return Err(err.into());
        }
        if let Some(err) = self.state.frame_error {
            return Err(err.into());
        }
        Ok(())
    }
}

impl AppState {
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        // Exit is only sampled here, at the top of an iteration; in-flight
        // work always drains before teardown.
        if self.flags.exit_requested() {
            if let Some(scheduler) = &self.scheduler {
                scheduler.wait_idle();
            }
            self.stats.log_results();
            event_loop.exit();
            return;
        }

        let (Some(window), Some(scheduler)) = (self.window.as_ref(), self.scheduler.as_mut())
        else {
            return;
        };

        self.stats.notify_frame_begin();

        let size = window.inner_size();
        match scheduler.render_frame(&self.flags, (size.width, size.height)) {
            Ok(_) => {}
            Err(err) => {
                log::error!("fatal device error while rendering: {err}");
                scheduler.wait_idle();
                self.frame_error = Some(err);
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(config::WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(
                config::WINDOW_WIDTH,
                config::WINDOW_HEIGHT,
            ));

        let result = event_loop
            .create_window(attributes)
            .map_err(InitError::from)
            .and_then(|window| {
                let window = Arc::new(window);
                let scheduler = pollster::block_on(FrameScheduler::new(window.clone()))?;
                Ok((window, scheduler))
            });

        match result {
            Ok((window, scheduler)) => {
                self.window = Some(window);
                self.scheduler = Some(scheduler);
            }
            Err(err) => {
                log::error!("initialization failed: {err}");
                self.init_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.flags.request_exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.flags.request_exit(),
            WindowEvent::Resized(_) => self.flags.notify_resized(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_flag_is_cleared_by_take() {
        let flags = SharedFlags::default();
        assert!(!flags.take_resize_pending());

        flags.notify_resized();
        assert!(flags.take_resize_pending());
        assert!(!flags.take_resize_pending());
    }

    #[test]
    fn exit_flag_is_sticky() {
        let flags = SharedFlags::default();
        flags.request_exit();
        assert!(flags.exit_requested());
        assert!(flags.exit_requested());
    }
}
