use pixels::{Pixels, SurfaceTexture};
use std::collections::HashSet;
use std::time::Instant;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use crate::core::frame_limiter::FrameLimiter;
use crate::error::AppError;
use crate::pendulum::params::PendulumParams;
use crate::pendulum::simulation::{RunPhase, Simulation};

/// Process exit code used when the domain guard halts the run.
pub const HALT_EXIT_CODE: i32 = 2;

#[derive(Default)]
struct RawInputState {
    held_keys: HashSet<VirtualKeyCode>,
    pressed_keys_this_frame: HashSet<VirtualKeyCode>,
}

impl RawInputState {
    fn observe_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { input, .. } => {
                if let Some(keycode) = input.virtual_keycode {
                    match input.state {
                        ElementState::Pressed => self.press(keycode),
                        ElementState::Released => self.release(keycode),
                    }
                }
            }
            WindowEvent::Focused(false) => {
                self.held_keys.clear();
                self.pressed_keys_this_frame.clear();
            }
            _ => {}
        }
    }

    fn press(&mut self, key: VirtualKeyCode) {
        self.held_keys.insert(key);
        self.pressed_keys_this_frame.insert(key);
    }

    fn release(&mut self, key: VirtualKeyCode) {
        self.held_keys.remove(&key);
    }

    fn key_held(&self, key: VirtualKeyCode) -> bool {
        self.held_keys.contains(&key)
    }

    fn key_pressed_this_frame(&self, key: VirtualKeyCode) -> bool {
        self.pressed_keys_this_frame.contains(&key)
    }

    fn end_frame(&mut self) {
        self.pressed_keys_this_frame.clear();
    }
}

/// What the event loop should do after looking at the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserCommand {
    Quit,
    Start,
    Nothing,
}

fn user_command(raw: &RawInputState, phase: RunPhase) -> UserCommand {
    if raw.key_pressed_this_frame(VirtualKeyCode::Escape) || raw.key_held(VirtualKeyCode::Escape) {
        UserCommand::Quit
    } else if phase == RunPhase::Idle
        && (raw.key_held(VirtualKeyCode::Space)
            || raw.key_pressed_this_frame(VirtualKeyCode::Space))
    {
        UserCommand::Start
    } else {
        UserCommand::Nothing
    }
}

/**
 * Opens a window showing the pendulum and runs it in real time.
 * -- hold Space to start the simulation
 * -- Escape or closing the window quits
 *
 * Only setup failures are returned; once the event loop is running the process
 * exits from inside it, with `HALT_EXIT_CODE` if the domain guard halts the run.
 */
pub fn explore_pendulum(params: &PendulumParams) -> Result<(), AppError> {
    let mut simulation = Simulation::new(params)?;
    let resolution = params.display.resolution;

    let event_loop = EventLoop::new();
    let mut raw_input = RawInputState::default();

    let window = {
        let logical_size = LogicalSize::new(resolution[0] as f64, resolution[1] as f64);
        WindowBuilder::new()
            .with_title("Double Pendulum")
            .with_inner_size(logical_size)
            .with_min_inner_size(logical_size)
            .build(&event_loop)?
    };

    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(resolution[0], resolution[1], surface_texture)?
    };

    let mut frame_limiter = FrameLimiter::new(params.display.frame_rate, Instant::now());
    log::info!(
        "window open at {}x{}, {} Hz; hold Space to start",
        resolution[0],
        resolution[1],
        params.display.frame_rate
    );

    // GUI application main loop:
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::WaitUntil(frame_limiter.deadline());

        if let Event::WindowEvent { event, .. } = &event {
            raw_input.observe_window_event(event);

            match event {
                WindowEvent::CloseRequested => {
                    simulation.quit();
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                WindowEvent::Resized(size) => {
                    if let Err(error) = pixels.resize_surface(size.width, size.height) {
                        log::error!("unable to resize surface: {}", error);
                        *control_flow = ControlFlow::ExitWithCode(1);
                        return;
                    }
                }
                _ => {}
            }
        }

        if let Event::RedrawRequested(_) = event {
            simulation.compose().write_rgba_frame(pixels.frame_mut());
            if let Err(error) = pixels.render() {
                log::error!("unable to render pixels: {}", error);
                *control_flow = ControlFlow::ExitWithCode(1);
                return;
            }
        }

        if let Event::MainEventsCleared = event {
            match user_command(&raw_input, simulation.phase()) {
                UserCommand::Quit => {
                    simulation.quit();
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                UserCommand::Start => simulation.start(),
                UserCommand::Nothing => {}
            }
            raw_input.end_frame();

            let now = Instant::now();
            if !frame_limiter.is_due(now) {
                return;
            }
            frame_limiter.advance(now);
            *control_flow = ControlFlow::WaitUntil(frame_limiter.deadline());

            match simulation.step_frame() {
                Ok(Some(_)) => window.request_redraw(),
                Ok(None) => {}
                // Already reported by the domain guard.
                Err(_) => *control_flow = ControlFlow::ExitWithCode(HALT_EXIT_CODE),
            }
        }
    });
}
