// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end rendering through `dynstyle_surface_vello_cpu`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dynstyle::{
    Border, BorderType, Color, LayerShadow, RasterOverlay, RenderConfig, RenderOutcome,
    RenderScheduler, SkipReason, StyleBinding, StyleName, StyleRegistry, StyledView, ViewHost,
    ViewStyle,
};
use dynstyle_surface::{Raster, Rasterizer, Recording};
use dynstyle_surface_vello_cpu::VelloCpuRasterizer;
use kurbo::{BezPath, Rect};

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

#[derive(Default)]
struct TestHost {
    bounds: Rect,
    contents: Option<Arc<Raster>>,
    overlay: Option<RasterOverlay>,
    mask: Option<BezPath>,
    shadow: Option<LayerShadow>,
}

impl TestHost {
    fn sized(width: f64, height: f64) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, width, height),
            ..Self::default()
        }
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.contents
            .as_ref()
            .and_then(|raster| raster.pixel(x, y))
            .expect("content pixel in range")
    }
}

impl ViewHost for TestHost {
    fn bounds(&self) -> Rect {
        self.bounds
    }
    fn set_contents(&mut self, contents: Option<Arc<Raster>>) {
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
}

#[derive(Default)]
struct CountingRasterizer {
    inner: VelloCpuRasterizer,
    calls: AtomicUsize,
}

impl Rasterizer for CountingRasterizer {
    fn rasterize(&self, recording: &Recording, scale: f64) -> Raster {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.rasterize(recording, scale)
    }
}

fn card_registry() -> Arc<StyleRegistry> {
    let registry = StyleRegistry::new();
    registry.register_colors([Color::rgba8(255, 0, 0, 255).named("red")]);
    registry.register([ViewStyle::new("Card")
        .with_corner_radius(4.0)
        .with_background(Color::reference("red"))
        .with_border(Border::new(
            8.0,
            Color::rgba8(0, 0, 255, 255),
            BorderType::OuterStroke,
        ))]);
    Arc::new(registry)
}

#[test]
fn card_renders_content_and_outer_stroke_overlay() {
    let mut scheduler = RenderScheduler::new(card_registry(), Arc::new(VelloCpuRasterizer));
    let mut view = StyledView::new(TestHost::sized(400.0, 400.0));
    let outcome = scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Card"))));
    assert_eq!(outcome, RenderOutcome::Rendered);

    let host = view.host();
    let contents = host.contents.as_ref().expect("contents applied");
    assert_eq!((contents.width(), contents.height()), (400, 400));
    assert_eq!(host.pixel(200, 200), RED, "interior is the background");
    assert_eq!(host.pixel(0, 0), CLEAR, "rounded corner is cut away");
    assert_eq!(host.pixel(399, 399), CLEAR, "rounded corner is cut away");
    assert_eq!(host.pixel(200, 0), RED, "outer stroke leaves the edge alone");
    assert!(host.mask.is_none() && host.shadow.is_none());

    let overlay = host.overlay.as_ref().expect("outer stroke needs an overlay");
    assert_eq!(overlay.frame, Rect::new(-8.0, -8.0, 408.0, 408.0));
    assert_eq!((overlay.raster.width(), overlay.raster.height()), (416, 416));
    // Overlay pixel (4, 208) is view point (-4, 200), inside the stroke band.
    assert_eq!(overlay.raster.pixel(4, 208), Some(BLUE));
    assert_eq!(overlay.raster.pixel(208, 208), Some(CLEAR), "stroke stays outside");
}

#[test]
fn rerendering_same_bounds_is_idempotent() {
    let rasterizer = Arc::new(CountingRasterizer::default());
    let mut scheduler = RenderScheduler::new(card_registry(), rasterizer.clone());
    let mut view = StyledView::new(TestHost::sized(40.0, 30.0));
    scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Card"))));
    let after_first = rasterizer.calls.load(Ordering::SeqCst);
    assert_eq!(after_first, 2, "content and overlay");

    for _ in 0..3 {
        let outcome = scheduler.bounds_changed(&mut view, Rect::new(0.0, 0.0, 40.0, 30.0));
        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::Unchanged));
    }
    assert_eq!(rasterizer.calls.load(Ordering::SeqCst), after_first);
    assert_eq!(view.render_count(), 1);
}

#[test]
fn inner_stroke_draws_inside_the_edge() {
    let registry = Arc::new(StyleRegistry::new());
    let style = ViewStyle::new("Framed")
        .with_background(Color::rgba8(255, 0, 0, 255))
        .with_border(Border::new(
            4.0,
            Color::rgba8(0, 0, 255, 255),
            BorderType::InnerStroke,
        ));
    let mut scheduler = RenderScheduler::new(registry, Arc::new(VelloCpuRasterizer));
    let mut view = StyledView::new(TestHost::sized(20.0, 20.0));
    scheduler.set_style(&mut view, Some(StyleBinding::Inline(style)));
    let host = view.host();
    assert_eq!(host.pixel(1, 10), BLUE);
    assert_eq!(host.pixel(10, 10), RED);
    assert!(host.overlay.is_none());
}

#[test]
fn scale_multiplies_raster_size() {
    let config = RenderConfig::new().with_scale(2.0);
    let mut scheduler =
        RenderScheduler::with_config(card_registry(), Arc::new(VelloCpuRasterizer), config);
    let mut view = StyledView::new(TestHost::sized(10.0, 5.0));
    scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Card"))));
    let contents = view.host().contents.as_ref().expect("contents applied");
    assert_eq!((contents.width(), contents.height()), (20, 10));
}

#[test]
fn asynchronous_style_renders_off_thread() {
    let registry = StyleRegistry::new();
    registry.register([ViewStyle::new("Slow")
        .with_background(Color::rgba8(255, 0, 0, 255))
        .with_render_asynchronously(true)]);
    let mut scheduler = RenderScheduler::new(Arc::new(registry), Arc::new(VelloCpuRasterizer));
    let mut view = StyledView::new(TestHost::sized(16.0, 16.0));

    let outcome = scheduler.set_style(&mut view, Some(StyleBinding::Named(StyleName::new("Slow"))));
    assert_eq!(outcome, RenderOutcome::Submitted);
    let resized = scheduler.bounds_changed(&mut view, Rect::new(0.0, 0.0, 32.0, 32.0));
    assert_eq!(resized, RenderOutcome::Submitted);

    let completions: Vec<_> = (0..2)
        .map(|_| {
            scheduler
                .wait_completed(Duration::from_secs(10))
                .expect("render completes")
        })
        .collect();
    let applied = completions
        .into_iter()
        .map(|done| view.apply(done))
        .filter(|&applied| applied)
        .count();
    assert_eq!(applied, 1, "only the newest render lands");
    let contents = view.host().contents.as_ref().expect("contents applied");
    assert_eq!(contents.width(), 32);
    assert_eq!(view.host().pixel(16, 16), RED);
}
