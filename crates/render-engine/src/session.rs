//! The compositor session: render loop, state, and control surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use duocast_common::clock::{FramePacer, SessionClock};
use duocast_common::config::AppConfig;
use duocast_common::error::DuocastResult;
use duocast_compositor_core::crop::{CropRegionManager, CropState, CropTarget};
use duocast_compositor_core::layout::{LayoutConfig, LayoutEngine};
use duocast_scene_model::rect::{ScreenRect, SourceRect};
use duocast_scene_model::source::{SharedSource, SourceSlot};
use duocast_scene_model::state::{CompositionState, FitMode, LayoutMode};
use serde::Serialize;

use crate::stream::StreamPublisher;
use crate::surface::RenderSurface;

/// Configuration for creating a compositor session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Initial output surface width (height follows the aspect ratio).
    pub surface_width: u32,

    /// Output aspect ratio, width component.
    pub aspect_width: u32,

    /// Output aspect ratio, height component.
    pub aspect_height: u32,

    /// Target composed frame rate.
    pub fps: u32,

    /// Opaque background the surface is cleared to each tick.
    pub background_rgba: [u8; 4],

    /// Layout geometry fractions.
    pub layout: LayoutConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            surface_width: 1280,
            aspect_width: 16,
            aspect_height: 9,
            fps: 30,
            background_rgba: [0, 0, 0, 255],
            layout: LayoutConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Derive a session configuration from the application config.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            surface_width: config.output.surface_width,
            aspect_width: config.output.aspect_width,
            aspect_height: config.output.aspect_height,
            fps: config.output.fps,
            background_rgba: config.output.background_rgba,
            layout: LayoutConfig {
                pip_width_frac: config.layout.pip_width_frac,
                pip_margin_frac: config.layout.pip_margin_frac,
                gutter_frac: config.layout.gutter_frac,
            },
        }
    }
}

/// State of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not composing; no sources are attached.
    Stopped,
    /// Composing a frame per tick.
    Running,
}

/// What a single tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was composed and published.
    Rendered {
        /// Number of draw commands issued.
        commands: usize,
    },
    /// Nothing to do; the loop is stopped.
    Idle,
}

/// Counters accumulated over a session.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RenderStats {
    /// Frames composed and published.
    pub frames_rendered: u64,

    /// Draw commands executed successfully.
    pub commands_drawn: u64,

    /// Draw commands that failed and were skipped.
    pub commands_skipped: u64,

    /// Times the surface contents were published to the output stream.
    pub publishes: u64,
}

impl RenderStats {
    /// Skipped commands as a percentage of all commands issued.
    pub fn skip_rate(&self) -> f64 {
        let total = self.commands_drawn + self.commands_skipped;
        if total == 0 {
            return 0.0;
        }
        self.commands_skipped as f64 / total as f64 * 100.0
    }
}

/// A live compositing session.
///
/// Owns the render surface and the output stream; sinks only read. All
/// mutation entry points are meant to be called between ticks from the
/// same thread that drives the loop.
pub struct CompositorSession<S: RenderSurface, T> {
    state: CompositionState,
    layout: LayoutEngine,
    crop: CropRegionManager,
    primary: Option<SharedSource>,
    secondary: Option<SharedSource>,
    surface: S,
    publisher: StreamPublisher<T>,
    loop_state: LoopState,
    background: [u8; 4],
    clock: SessionClock,
    pacer: FramePacer,
    stats: RenderStats,
}

impl<S: RenderSurface, T> CompositorSession<S, T> {
    /// Create a session drawing into `surface` and publishing streams
    /// created by `stream_factory`.
    pub fn new(
        config: SessionConfig,
        mut surface: S,
        stream_factory: impl FnMut() -> T + Send + 'static,
    ) -> Self {
        let state = CompositionState::new(
            config.surface_width,
            config.aspect_width,
            config.aspect_height,
        );
        surface.resize(state.output_width(), state.output_height());

        let clock = SessionClock::start();
        tracing::info!(
            epoch_wall = %clock.epoch_wall(),
            width = state.output_width(),
            height = state.output_height(),
            fps = config.fps,
            "Compositor session created"
        );

        Self {
            state,
            layout: LayoutEngine::new(config.layout),
            crop: CropRegionManager::new(),
            primary: None,
            secondary: None,
            surface,
            publisher: StreamPublisher::new(stream_factory),
            loop_state: LoopState::Stopped,
            background: config.background_rgba,
            pacer: FramePacer::new(config.fps),
            clock,
            stats: RenderStats::default(),
        }
    }

    // Source management

    /// Attach the camera source and wake the render loop.
    pub fn attach_primary(&mut self, source: SharedSource) {
        tracing::info!(
            width = source.width(),
            height = source.height(),
            ready = source.is_ready(),
            "Camera source attached"
        );
        self.primary = Some(source);
        self.ensure_running();
    }

    /// Attach the display source and wake the render loop.
    pub fn attach_secondary(&mut self, source: SharedSource) {
        tracing::info!(
            width = source.width(),
            height = source.height(),
            ready = source.is_ready(),
            "Display source attached"
        );
        self.secondary = Some(source);
        self.ensure_running();
    }

    /// Drop the camera source. The loop stops on its next tick if no
    /// sources remain.
    pub fn detach_primary(&mut self) {
        if self.primary.take().is_some() {
            tracing::info!("Camera source detached");
        }
    }

    /// Drop the display source. Any crop bound to it is cleared.
    pub fn detach_secondary(&mut self) {
        if self.secondary.take().is_some() {
            tracing::info!("Display source detached");
        }
        self.crop.on_source_detached();
        self.state.clear_crop_region();
    }

    /// A capture ended on its own (e.g. the user stopped sharing from the
    /// browser chrome). Routed through the same path as an explicit
    /// detach.
    pub fn on_source_terminated(&mut self, slot: SourceSlot) {
        tracing::info!(slot = slot.label(), "Source terminated by its capture");
        match slot {
            SourceSlot::Primary => self.detach_primary(),
            SourceSlot::Secondary => self.detach_secondary(),
        }
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    // Composition controls

    pub fn composition(&self) -> &CompositionState {
        &self.state
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.state.set_layout_mode(mode);
    }

    pub fn set_fit_mode(&mut self, mode: FitMode) {
        self.state.set_fit_mode(mode);
    }

    /// Exchange main and overlay roles. Returns the new value.
    pub fn toggle_swap(&mut self) -> bool {
        self.state.toggle_swap()
    }

    /// Toggle camera mirroring. Returns the new value.
    pub fn toggle_mirror(&mut self) -> bool {
        self.state.toggle_mirror()
    }

    /// The hosting container resized. Takes effect on the next tick.
    pub fn resize_output(&mut self, new_width: u32, new_height: u32) {
        self.state.on_container_resized(new_width, new_height);
        self.surface
            .resize(self.state.output_width(), self.state.output_height());
        tracing::debug!(
            width = self.state.output_width(),
            height = self.state.output_height(),
            "Output surface resized"
        );
    }

    // Crop controls

    pub fn crop_state(&self) -> CropState {
        self.crop.state()
    }

    /// Start a crop interaction over the display source, which must be
    /// attached and ready. `display_rect` is where the source preview is
    /// rendered on screen.
    pub fn begin_crop(&mut self, display_rect: ScreenRect) -> DuocastResult<ScreenRect> {
        let target = self
            .secondary
            .as_ref()
            .filter(|s| s.is_ready())
            .map(|s| CropTarget {
                display_rect,
                source_width: s.width(),
                source_height: s.height(),
            });
        self.crop.begin(target)
    }

    /// Update the in-progress crop rectangle.
    pub fn adjust_crop(&mut self, rect: ScreenRect) -> DuocastResult<ScreenRect> {
        self.crop.adjust(rect)
    }

    /// Confirm the crop; the next tick samples only the cropped region.
    pub fn confirm_crop(&mut self) -> DuocastResult<SourceRect> {
        let region = self.crop.confirm()?;
        self.state.set_crop_region(region);
        Ok(region)
    }

    /// Abandon the in-progress rectangle, keeping any confirmed region.
    pub fn cancel_crop(&mut self) -> DuocastResult<()> {
        self.crop.cancel()
    }

    /// Clear the confirmed crop region.
    pub fn undo_crop(&mut self) -> DuocastResult<()> {
        self.crop.undo()?;
        self.state.clear_crop_region();
        Ok(())
    }

    // Render loop

    /// Whether the loop is composing frames.
    pub fn is_running(&self) -> bool {
        self.loop_state == LoopState::Running
    }

    /// Stop the loop. Idempotent; attaching a source starts it again.
    pub fn stop(&mut self) {
        if self.loop_state == LoopState::Running {
            tracing::info!(
                elapsed_secs = self.clock.elapsed_secs(),
                frames = self.stats.frames_rendered,
                "Render loop stopped"
            );
            self.loop_state = LoopState::Stopped;
        }
    }

    /// Compose and publish one frame.
    ///
    /// Clears the surface, executes the layout engine's commands, and
    /// republishes the output stream. A failing command is logged and
    /// skipped; it never prevents the other source from drawing.
    pub fn tick(&mut self) -> TickOutcome {
        if self.primary.is_none() && self.secondary.is_none() {
            if self.loop_state == LoopState::Running {
                tracing::info!("No sources remain, render loop stopping");
            }
            self.loop_state = LoopState::Stopped;
            return TickOutcome::Idle;
        }
        self.ensure_running();

        self.surface.clear(self.background);
        let commands =
            self.layout
                .compose(&self.state, self.primary.as_ref(), self.secondary.as_ref());
        for command in &commands {
            match self.surface.draw(command) {
                Ok(()) => self.stats.commands_drawn += 1,
                Err(e) => {
                    self.stats.commands_skipped += 1;
                    tracing::warn!(
                        slot = command.slot.label(),
                        error = %e,
                        "Draw command failed, skipping"
                    );
                }
            }
        }
        self.publisher.publish();
        self.stats.frames_rendered += 1;

        TickOutcome::Rendered {
            commands: commands.len(),
        }
    }

    /// Tick gate for hosts whose display callback outpaces the target
    /// frame rate: composes a frame only when the pacer says it is due.
    pub fn maybe_tick(&mut self) -> Option<TickOutcome> {
        let now_ns = self.clock.elapsed_ns();
        if self.pacer.should_tick(now_ns) {
            Some(self.tick())
        } else {
            None
        }
    }

    /// Session counters so far.
    pub fn stats(&self) -> RenderStats {
        RenderStats {
            publishes: self.publisher.publishes(),
            ..self.stats
        }
    }

    /// The render surface, for inspection.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The published output stream, if it exists yet.
    pub fn stream(&self) -> Option<&T> {
        self.publisher.stream()
    }

    fn ensure_running(&mut self) {
        if self.loop_state == LoopState::Stopped {
            tracing::info!("Render loop starting");
            self.loop_state = LoopState::Running;
        }
    }
}

/// Drive a session from a tokio interval until the stop flag is raised,
/// the loop stops itself, or `max_frames` frames have been composed.
///
/// `refresh_hz` models the host display callback rate; the session's own
/// pacer throttles composition down to the configured fps.
pub async fn drive<S: RenderSurface, T>(
    session: &mut CompositorSession<S, T>,
    refresh_hz: u32,
    stop: Arc<AtomicBool>,
    max_frames: Option<u64>,
) -> RenderStats {
    let period = Duration::from_nanos(1_000_000_000 / refresh_hz.max(1) as u64);
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        if stop.load(Ordering::SeqCst) {
            session.stop();
            break;
        }
        match session.maybe_tick() {
            Some(TickOutcome::Idle) => {
                if !session.is_running() {
                    break;
                }
            }
            Some(TickOutcome::Rendered { .. }) => {
                if let Some(max) = max_frames {
                    if session.stats().frames_rendered >= max {
                        session.stop();
                        break;
                    }
                }
            }
            None => {}
        }
    }

    session.stats()
}
