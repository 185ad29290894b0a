// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deciding when a view re-renders, and where.
//!
//! Each [`StyledView`] is either unrendered or rendered at some bounds. A
//! bounds change to the same bounds is a no-op; this is what keeps layout
//! passes that re-announce unchanged geometry from re-rasterizing.
//! Zero-size bounds never rasterize.
//!
//! Styles that opt into asynchronous rendering are rasterized on a single
//! background thread that runs one job at a time in submission order. The
//! results come back through [`RenderScheduler::drain_completed`] (or
//! [`RenderScheduler::wait_completed`]) on the UI thread, which hands each
//! one to its view with [`StyledView::apply`].
//!
//! Every render and every rebinding bumps the view's generation, and a
//! completion is applied only if it carries the current generation. A
//! background render overtaken by a newer bounds change or a new style is
//! therefore discarded instead of overwriting the fresher content.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use std::{fmt, thread};

use dynstyle_surface::{Raster, Rasterizer};
use kurbo::{BezPath, Rect};
use tracing::{debug, trace, warn};

use crate::compositor::{
    RasterOverlay, RenderedContent, ResolvedStyle, compose, rasterize_rendering,
};
use crate::config::RenderConfig;
use crate::context::{LayerShadow, Rendering};
use crate::name::StyleName;
use crate::registry::{Catalog, StyleRegistry};
use crate::resolve::{resolve_button_style, resolve_view_style};
use crate::style::{ButtonState, ButtonStyle, ViewStyle};
use crate::text::TextAttributes;

/// What the style engine needs from a host view.
///
/// The host reports its bounds and accepts the results of a render. It is
/// responsible for telling the scheduler when its bounds change.
pub trait ViewHost {
    /// Current bounds in the view's own coordinate space.
    fn bounds(&self) -> Rect;

    /// Show `contents` as the view's display content.
    fn set_contents(&mut self, contents: Option<Arc<Raster>>);

    /// Clip the view's backing layer to `mask`.
    fn set_shape_mask(&mut self, mask: Option<BezPath>);

    /// Cast `shadow` from the view's backing layer.
    fn set_shadow(&mut self, shadow: Option<LayerShadow>);

    /// Show `overlay` above the view, tracking its geometry and never taking
    /// hit testing.
    fn set_overlay(&mut self, overlay: Option<RasterOverlay>);

    /// Draw the view's title with `attributes`.
    ///
    /// Only views bound to a button style with a title style receive
    /// attributes; everything else gets `None`. Hosts without a title can
    /// ignore this.
    fn set_title_attributes(&mut self, attributes: Option<TextAttributes>) {
        let _ = attributes;
    }
}

/// Process-unique identity of a [`StyledView`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Which style decorates a view.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleBinding {
    /// The registered view style with this name.
    Named(StyleName),
    /// A style value, resolved against the registry when saved.
    Inline(ViewStyle),
    /// The registered drawing style with this name.
    Drawing(StyleName),
    /// A button style in an interaction state.
    Button {
        /// The button style.
        style: ButtonStyle,
        /// Current state.
        state: ButtonState,
    },
}

impl StyleBinding {
    /// Resolve against `catalog`. `None` means there is nothing to draw.
    pub fn resolve(&self, catalog: &Catalog) -> Option<ResolvedStyle> {
        match self {
            Self::Named(name) => Some(ResolvedStyle::View(resolve_view_style(
                &ViewStyle::saved(name.clone()),
                catalog,
            ))),
            Self::Inline(style) => Some(ResolvedStyle::View(resolve_view_style(style, catalog))),
            Self::Drawing(name) => {
                let style = catalog.find_drawing_style(name);
                if style.is_none() {
                    trace!(%name, "drawing style not registered");
                }
                style.cloned().map(ResolvedStyle::Drawing)
            }
            Self::Button { style, state } => resolve_button_style(style, catalog)
                .view_style_for(*state)
                .cloned()
                .map(ResolvedStyle::View),
        }
    }
}

/// Render state of a view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RenderState {
    /// Nothing rendered since the style was set.
    #[default]
    Unrendered,
    /// Rendered for `last_bounds`.
    Rendered {
        /// Bounds of the latest render.
        last_bounds: Rect,
    },
}

/// A host view together with its style and render bookkeeping.
pub struct StyledView<H> {
    id: ViewId,
    host: H,
    binding: Option<StyleBinding>,
    state: RenderState,
    generation: u64,
    render_count: u64,
}

impl<H> fmt::Debug for StyledView<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyledView")
            .field("id", &self.id)
            .field("binding", &self.binding)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("render_count", &self.render_count)
            .finish_non_exhaustive()
    }
}

impl<H: ViewHost> StyledView<H> {
    /// Wrap `host`, initially without a style.
    pub fn new(host: H) -> Self {
        Self {
            id: ViewId::next(),
            host,
            binding: None,
            state: RenderState::Unrendered,
            generation: 0,
            render_count: 0,
        }
    }

    /// This view's identity.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// The host view.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host view, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Unwrap the host view.
    pub fn into_host(self) -> H {
        self.host
    }

    /// The current style binding.
    pub fn binding(&self) -> Option<&StyleBinding> {
        self.binding.as_ref()
    }

    /// The current render state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Current generation, bumped by every render and every rebinding.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of rasterizations performed or submitted for this view.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Hand a completed render to the host, unless it is stale.
    ///
    /// Returns `true` if the render was applied.
    pub fn apply(&mut self, completed: CompletedRender) -> bool {
        if completed.view != self.id {
            return false;
        }
        if completed.generation != self.generation {
            debug!(
                view = self.id.get(),
                generation = completed.generation,
                current = self.generation,
                "discarding stale render"
            );
            return false;
        }
        let RenderedContent {
            contents,
            overlay,
            mask,
            shadow,
        } = completed.content;
        self.host.set_contents(Some(contents));
        self.host.set_overlay(overlay);
        self.host.set_shape_mask(mask);
        self.host.set_shadow(shadow);
        true
    }

    fn clear_host(&mut self) {
        self.host.set_contents(None);
        self.host.set_overlay(None);
        self.host.set_shape_mask(None);
        self.host.set_shadow(None);
    }
}

/// A finished render on its way back to its view.
#[derive(Clone, Debug)]
pub struct CompletedRender {
    /// The view it was rendered for.
    pub view: ViewId,
    /// The view generation it was issued at.
    pub generation: u64,
    /// The bounds it was rendered for.
    pub bounds: Rect,
    /// What to show.
    pub content: RenderedContent,
}

/// Why a bounds change did not render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The view has no style, or its style names nothing drawable.
    NoStyle,
    /// The bounds have no area.
    ZeroSize,
    /// The bounds equal those of the last render.
    Unchanged,
}

/// What a scheduler call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderOutcome {
    /// Nothing was rendered.
    Skipped(SkipReason),
    /// Rendered and applied on the calling thread.
    Rendered,
    /// Queued for background rasterization.
    Submitted,
}

struct Job {
    view: ViewId,
    generation: u64,
    bounds: Rect,
    rendering: Rendering,
    scale: f64,
}

/// The serial background rasterization queue.
struct RenderQueue {
    jobs: Option<Sender<Job>>,
    completed: Receiver<CompletedRender>,
    pending: Arc<AtomicUsize>,
    worker: Option<JoinHandle<()>>,
}

impl RenderQueue {
    fn spawn(name: &str, rasterizer: Arc<dyn Rasterizer>) -> std::io::Result<Self> {
        let (jobs, job_rx) = mpsc::channel::<Job>();
        let (done_tx, completed) = mpsc::channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let worker_pending = Arc::clone(&pending);
        let worker = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                for job in job_rx {
                    let content = rasterize_rendering(&job.rendering, &*rasterizer, job.scale);
                    worker_pending.fetch_sub(1, Ordering::AcqRel);
                    let done = CompletedRender {
                        view: job.view,
                        generation: job.generation,
                        bounds: job.bounds,
                        content,
                    };
                    if done_tx.send(done).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            jobs: Some(jobs),
            completed,
            pending,
            worker: Some(worker),
        })
    }

    /// Queue `job`, handing it back if the worker is gone.
    fn submit(&self, job: Job) -> Result<(), Job> {
        let Some(jobs) = &self.jobs else {
            return Err(job);
        };
        self.pending.fetch_add(1, Ordering::AcqRel);
        jobs.send(job).map_err(|err| {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            err.0
        })
    }
}

impl Drop for RenderQueue {
    fn drop(&mut self) {
        let pending = self.pending.load(Ordering::Acquire);
        if pending > 0 {
            warn!(pending, "render queue shutting down with pending jobs");
        }
        // Closing the job channel ends the worker loop once it drains.
        self.jobs = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("render worker panicked");
            }
        }
    }
}

/// Renders styled views, synchronously or on the background queue.
pub struct RenderScheduler {
    registry: Arc<StyleRegistry>,
    rasterizer: Arc<dyn Rasterizer>,
    config: RenderConfig,
    queue: Option<RenderQueue>,
}

impl fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("config", &self.config)
            .field("queue_started", &self.queue.is_some())
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

impl RenderScheduler {
    /// A scheduler resolving against `registry` and rasterizing with
    /// `rasterizer`, with default settings.
    pub fn new(registry: Arc<StyleRegistry>, rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self::with_config(registry, rasterizer, RenderConfig::default())
    }

    /// A scheduler with explicit settings.
    pub fn with_config(
        registry: Arc<StyleRegistry>,
        rasterizer: Arc<dyn Rasterizer>,
        config: RenderConfig,
    ) -> Self {
        Self {
            registry,
            rasterizer,
            config,
            queue: None,
        }
    }

    /// The registry styles resolve against.
    pub fn registry(&self) -> &Arc<StyleRegistry> {
        &self.registry
    }

    /// The scheduler's settings.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Background jobs submitted but not yet rasterized.
    pub fn pending(&self) -> usize {
        self.queue
            .as_ref()
            .map_or(0, |queue| queue.pending.load(Ordering::Acquire))
    }

    /// Bind `binding` to `view` and render it at the host's current bounds.
    ///
    /// Renders still in flight for the previous binding are invalidated. If
    /// the new binding does not render right away, the host is cleared
    /// rather than left showing the previous style.
    pub fn set_style<H: ViewHost>(
        &mut self,
        view: &mut StyledView<H>,
        binding: Option<StyleBinding>,
    ) -> RenderOutcome {
        view.binding = binding;
        view.state = RenderState::Unrendered;
        view.generation += 1;
        self.deliver_title(view);
        let bounds = view.host.bounds();
        let outcome = self.bounds_changed(view, bounds);
        if matches!(outcome, RenderOutcome::Skipped(_)) {
            view.clear_host();
        }
        outcome
    }

    /// Change a button's interaction state and re-render it.
    ///
    /// Views not bound to a button style are left alone.
    pub fn set_button_state<H: ViewHost>(
        &mut self,
        view: &mut StyledView<H>,
        new_state: ButtonState,
    ) -> RenderOutcome {
        match &mut view.binding {
            Some(StyleBinding::Button { state, .. }) => *state = new_state,
            _ => return RenderOutcome::Skipped(SkipReason::NoStyle),
        }
        self.force_rerender(view)
    }

    /// Forget the last rendered bounds and render at the host's current bounds.
    ///
    /// Renders still in flight are invalidated. The host is cleared if the
    /// binding no longer resolves to anything drawable.
    pub fn force_rerender<H: ViewHost>(&mut self, view: &mut StyledView<H>) -> RenderOutcome {
        view.state = RenderState::Unrendered;
        view.generation += 1;
        self.deliver_title(view);
        let bounds = view.host.bounds();
        let outcome = self.bounds_changed(view, bounds);
        if outcome == RenderOutcome::Skipped(SkipReason::NoStyle) {
            view.clear_host();
        }
        outcome
    }

    fn deliver_title<H: ViewHost>(&self, view: &mut StyledView<H>) {
        let title = match &view.binding {
            Some(StyleBinding::Button { style, state }) => {
                let catalog = self.registry.snapshot();
                resolve_button_style(style, &catalog).title_attributes(*state, &*catalog)
            }
            _ => None,
        };
        view.host.set_title_attributes(title);
    }

    /// React to `view` now having `bounds`.
    pub fn bounds_changed<H: ViewHost>(
        &mut self,
        view: &mut StyledView<H>,
        bounds: Rect,
    ) -> RenderOutcome {
        let id = view.id.get();
        let Some(binding) = &view.binding else {
            return RenderOutcome::Skipped(SkipReason::NoStyle);
        };
        if let RenderState::Rendered { last_bounds } = view.state {
            if last_bounds == bounds {
                debug!(view = id, ?bounds, "bounds unchanged, skipping render");
                return RenderOutcome::Skipped(SkipReason::Unchanged);
            }
        }
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            debug!(view = id, ?bounds, "zero-size bounds, skipping render");
            return RenderOutcome::Skipped(SkipReason::ZeroSize);
        }

        let catalog = self.registry.snapshot();
        let Some(style) = binding.resolve(&catalog) else {
            debug!(view = id, "style resolves to nothing drawable");
            return RenderOutcome::Skipped(SkipReason::NoStyle);
        };

        view.state = RenderState::Rendered {
            last_bounds: bounds,
        };
        view.generation += 1;
        view.render_count += 1;
        let generation = view.generation;
        let rendering = compose(&style, bounds.size(), &*catalog);

        if style.render_asynchronously() {
            let job = Job {
                view: view.id,
                generation,
                bounds,
                rendering,
                scale: self.config.scale,
            };
            match self.submit(job) {
                Ok(()) => {
                    debug!(view = id, generation, "render submitted to background queue");
                    return RenderOutcome::Submitted;
                }
                Err(job) => {
                    warn!(view = id, "background queue unavailable, rendering synchronously");
                    self.render_now(view, job.rendering, bounds, generation);
                    return RenderOutcome::Rendered;
                }
            }
        }

        debug!(view = id, generation, "rendering synchronously");
        self.render_now(view, rendering, bounds, generation);
        RenderOutcome::Rendered
    }

    fn render_now<H: ViewHost>(
        &self,
        view: &mut StyledView<H>,
        rendering: Rendering,
        bounds: Rect,
        generation: u64,
    ) {
        let content = rasterize_rendering(&rendering, &*self.rasterizer, self.config.scale);
        view.apply(CompletedRender {
            view: view.id,
            generation,
            bounds,
            content,
        });
    }

    fn submit(&mut self, job: Job) -> Result<(), Job> {
        if self.queue.is_none() {
            match RenderQueue::spawn(&self.config.queue_name, Arc::clone(&self.rasterizer)) {
                Ok(queue) => self.queue = Some(queue),
                Err(err) => {
                    warn!(error = %err, "failed to start render queue");
                    return Err(job);
                }
            }
        }
        match &self.queue {
            Some(queue) => queue.submit(job),
            None => Err(job),
        }
    }

    /// Background renders that have finished since the last call.
    pub fn drain_completed(&self) -> Vec<CompletedRender> {
        self.queue
            .as_ref()
            .map(|queue| queue.completed.try_iter().collect())
            .unwrap_or_default()
    }

    /// Block until the next background render finishes, or `timeout` passes.
    pub fn wait_completed(&self, timeout: Duration) -> Option<CompletedRender> {
        let queue = self.queue.as_ref()?;
        match queue.completed.recv_timeout(timeout) {
            Ok(done) => Some(done),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::{Border, BorderType};
    use crate::color::Color;
    use crate::compositor::DrawingStyle;
    use crate::style::Style;
    use crate::text::TextStyle;
    use dynstyle_surface::{Recording, device_size};
    use std::sync::{Mutex, PoisonError};

    #[derive(Default)]
    struct CountingRasterizer {
        calls: AtomicUsize,
    }

    impl Rasterizer for CountingRasterizer {
        fn rasterize(&self, recording: &Recording, scale: f64) -> Raster {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (w, h) = device_size(recording.size(), scale);
            Raster::transparent(u32::from(w), u32::from(h))
        }
    }

    #[derive(Default)]
    struct FakeHost {
        bounds: Rect,
        contents: Option<Arc<Raster>>,
        overlay: Option<RasterOverlay>,
        mask: Option<BezPath>,
        shadow: Option<LayerShadow>,
        title: Option<TextAttributes>,
        applied: usize,
    }

    impl ViewHost for FakeHost {
        fn bounds(&self) -> Rect {
            self.bounds
        }
        fn set_contents(&mut self, contents: Option<Arc<Raster>>) {
            if contents.is_some() {
                self.applied += 1;
            }
            self.contents = contents;
        }
        fn set_shape_mask(&mut self, mask: Option<BezPath>) {
            self.mask = mask;
        }
        fn set_shadow(&mut self, shadow: Option<LayerShadow>) {
            self.shadow = shadow;
        }
        fn set_overlay(&mut self, overlay: Option<RasterOverlay>) {
            self.overlay = overlay;
        }
        fn set_title_attributes(&mut self, attributes: Option<TextAttributes>) {
            self.title = attributes;
        }
    }

    fn host(w: f64, h: f64) -> FakeHost {
        FakeHost {
            bounds: Rect::new(0.0, 0.0, w, h),
            ..FakeHost::default()
        }
    }

    fn setup(styles: Vec<Style>) -> (RenderScheduler, Arc<CountingRasterizer>) {
        let registry = Arc::new(StyleRegistry::new());
        registry.register(styles);
        let rasterizer = Arc::new(CountingRasterizer::default());
        let scheduler = RenderScheduler::new(registry, rasterizer.clone());
        (scheduler, rasterizer)
    }

    fn card() -> Style {
        ViewStyle::new("Card")
            .with_corner_radius(4.0)
            .with_background(Color::rgba8(255, 0, 0, 255))
            .into()
    }

    #[test]
    fn identical_bounds_render_once() {
        let (mut scheduler, rasterizer) = setup(vec![card()]);
        let mut view = StyledView::new(host(100.0, 50.0));
        let binding = Some(StyleBinding::Named(StyleName::new("Card")));
        assert_eq!(scheduler.set_style(&mut view, binding), RenderOutcome::Rendered);
        let same = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(
            scheduler.bounds_changed(&mut view, same),
            RenderOutcome::Skipped(SkipReason::Unchanged)
        );
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 1);
        let bigger = Rect::new(0.0, 0.0, 120.0, 50.0);
        assert_eq!(scheduler.bounds_changed(&mut view, bigger), RenderOutcome::Rendered);
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 2);
        assert_eq!(view.render_count(), 2);
        assert_eq!(view.host().contents.as_ref().map(|c| c.width()), Some(120));
    }

    #[test]
    fn zero_size_never_rasterizes() {
        let (mut scheduler, rasterizer) = setup(vec![card()]);
        let mut view = StyledView::new(host(0.0, 50.0));
        let outcome = scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Card"))));
        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::ZeroSize));
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(view.state(), RenderState::Unrendered);
    }

    #[test]
    fn unstyled_view_is_skipped() {
        let (mut scheduler, _) = setup(vec![]);
        let mut view = StyledView::new(host(10.0, 10.0));
        assert_eq!(
            scheduler.bounds_changed(&mut view, Rect::new(0.0, 0.0, 10.0, 10.0)),
            RenderOutcome::Skipped(SkipReason::NoStyle)
        );
    }

    #[test]
    fn force_rerender_ignores_cached_bounds() {
        let (mut scheduler, rasterizer) = setup(vec![card()]);
        let mut view = StyledView::new(host(10.0, 10.0));
        scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Card"))));
        assert_eq!(scheduler.force_rerender(&mut view), RenderOutcome::Rendered);
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn outer_stroke_produces_overlay() {
        let style = ViewStyle::new("Outlined").with_border(Border::new(
            3.0,
            Color::rgba8(0, 0, 255, 255),
            BorderType::OuterStroke,
        ));
        let (mut scheduler, rasterizer) = setup(vec![]);
        let mut view = StyledView::new(host(20.0, 20.0));
        scheduler.set_style(&mut view, Some(StyleBinding::Inline(style)));
        let overlay = view.host().overlay.clone().unwrap();
        assert_eq!(overlay.frame, Rect::new(-3.0, -3.0, 23.0, 23.0));
        assert_eq!(overlay.raster.width(), 26);
        assert!(view.host().shadow.is_none());
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 2, "content and overlay");
    }

    #[test]
    fn clearing_style_clears_host() {
        let (mut scheduler, _) = setup(vec![card()]);
        let mut view = StyledView::new(host(10.0, 10.0));
        scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Card"))));
        assert!(view.host().contents.is_some());
        scheduler.set_style(&mut view, None);
        assert!(view.host().contents.is_none());
        assert!(view.binding().is_none());
    }

    #[test]
    fn button_state_change_rerenders_with_state_style() {
        let button = ButtonStyle::new("Primary")
            .with_view_style(ViewStyle::new("Up").with_mask(false))
            .with_highlighted_view_style(ViewStyle::new("Down").with_mask(true));
        let (mut scheduler, rasterizer) = setup(vec![]);
        let mut view = StyledView::new(host(30.0, 10.0));
        scheduler.set_style(
            &mut view,
            Some(StyleBinding::Button {
                style: button,
                state: ButtonState::Normal,
            }),
        );
        assert!(view.host().mask.is_none());
        let outcome = scheduler.set_button_state(&mut view, ButtonState::Highlighted);
        assert_eq!(outcome, RenderOutcome::Rendered);
        assert!(view.host().mask.is_some());
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_drawing_style_is_no_style() {
        let (mut scheduler, _) = setup(vec![]);
        scheduler
            .registry()
            .register_drawing_styles([DrawingStyle::new("Known")]);
        let mut view = StyledView::new(host(10.0, 10.0));
        let outcome = scheduler.set_style(&mut view, Some(StyleBinding::Drawing(StyleName::new("Unknown"))));
        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::NoStyle));
        let outcome = scheduler.set_style(&mut view, Some(StyleBinding::Drawing(StyleName::new("Known"))));
        assert_eq!(outcome, RenderOutcome::Rendered);
    }

    #[test]
    fn async_render_arrives_through_queue() {
        let async_card = ViewStyle::new("Card")
            .with_background(Color::rgba8(255, 0, 0, 255))
            .with_render_asynchronously(true);
        let (mut scheduler, _) = setup(vec![async_card.into()]);
        let mut view = StyledView::new(host(10.0, 10.0));
        let outcome = scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Card"))));
        assert_eq!(outcome, RenderOutcome::Submitted);
        assert!(view.host().contents.is_none(), "nothing applied before completion");
        let done = scheduler.wait_completed(Duration::from_secs(10)).unwrap();
        assert!(view.apply(done));
        assert!(view.host().contents.is_some());
    }

    #[test]
    fn stale_async_completion_is_discarded() {
        // Gate the worker so both jobs complete after the second submission.
        struct GatedRasterizer {
            gate: Mutex<()>,
        }
        impl Rasterizer for GatedRasterizer {
            fn rasterize(&self, recording: &Recording, scale: f64) -> Raster {
                let _open = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
                let (w, h) = device_size(recording.size(), scale);
                Raster::transparent(u32::from(w), u32::from(h))
            }
        }

        let registry = Arc::new(StyleRegistry::new());
        registry.register([ViewStyle::new("Card").with_render_asynchronously(true)]);
        let rasterizer = Arc::new(GatedRasterizer { gate: Mutex::new(()) });
        let mut scheduler = RenderScheduler::new(registry, rasterizer.clone());
        let mut view = StyledView::new(host(10.0, 10.0));

        let gate = rasterizer.gate.lock().unwrap();
        scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Card"))));
        scheduler.bounds_changed(&mut view, Rect::new(0.0, 0.0, 20.0, 20.0));
        drop(gate);

        let first = scheduler.wait_completed(Duration::from_secs(10)).unwrap();
        let second = scheduler.wait_completed(Duration::from_secs(10)).unwrap();
        assert!(first.generation < second.generation, "queue is FIFO");
        assert!(!view.apply(first), "older generation must be discarded");
        assert!(view.apply(second));
        assert_eq!(view.host().applied, 1);
        assert_eq!(view.host().contents.as_ref().map(|c| c.width()), Some(20));
    }

    #[test]
    fn rebinding_invalidates_in_flight_render() {
        let async_card = ViewStyle::new("Card")
            .with_background(Color::rgba8(255, 0, 0, 255))
            .with_render_asynchronously(true);
        let (mut scheduler, _) = setup(vec![async_card.into()]);
        let mut view = StyledView::new(host(10.0, 10.0));
        let outcome = scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Card"))));
        assert_eq!(outcome, RenderOutcome::Submitted);

        let outcome = scheduler.set_style(&mut view, Some(StyleBinding::Drawing(StyleName::new("Gone"))));
        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::NoStyle));
        let done = scheduler.wait_completed(Duration::from_secs(10)).unwrap();
        assert!(!view.apply(done), "render for the old binding must be discarded");
        assert!(view.host().contents.is_none());
    }

    #[test]
    fn rebinding_at_zero_size_clears_previous_style() {
        let (mut scheduler, _) = setup(vec![card()]);
        let mut view = StyledView::new(host(10.0, 10.0));
        scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Card"))));
        assert!(view.host().contents.is_some());

        view.host_mut().bounds = Rect::ZERO;
        let outcome = scheduler.set_style(&mut view, Some(StyleBinding::Inline(ViewStyle::new("Other"))));
        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::ZeroSize));
        assert!(view.host().contents.is_none());
    }

    #[test]
    fn button_title_attributes_follow_state() {
        let button = ButtonStyle::new("Primary")
            .with_view_style(ViewStyle::new("Up"))
            .with_text_style(
                TextStyle::new("Title")
                    .with_color(Color::rgba8(255, 0, 0, 255))
                    .with_highlighted_text_color(Color::rgba8(0, 0, 255, 255)),
            );
        let (mut scheduler, _) = setup(vec![]);
        let mut view = StyledView::new(host(30.0, 10.0));
        scheduler.set_style(
            &mut view,
            Some(StyleBinding::Button {
                style: button,
                state: ButtonState::Normal,
            }),
        );
        let foreground = |view: &StyledView<FakeHost>| {
            view.host()
                .title
                .as_ref()
                .map(|title| title.foreground.to_rgba8().to_u8_array())
        };
        assert_eq!(foreground(&view), Some([255, 0, 0, 255]));

        scheduler.set_button_state(&mut view, ButtonState::Highlighted);
        assert_eq!(foreground(&view), Some([0, 0, 255, 255]));

        scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Card"))));
        assert!(view.host().title.is_none(), "non-button bindings have no title");
    }
}
