//! The animation-loop driver.
//!
//! `GlobeScene` owns the rotation, the last frame's projected points and the
//! selection. Ticks and input events arrive one at a time from the host, so
//! the points used for hit-testing are always the ones from the most recent
//! completed draw.

use field::{DecorFeature, FieldCache, Star, obtain_field, scatter_stars};
use foundation::math::{GeoPoint, Projection, Vec2, Viewport};
use rand::SeedableRng;
use rand::rngs::StdRng;
use render::DrawSurface;
use runtime::{EventBus, Frame, FrameClock, TickHandle, TickScheduler};
use scene::{
    BalloonPlatform, OutlineState, ProjectedPoint, RotationState, SceneFeature, SelectionState,
    StationNetwork, balloon_baselines, graticule_lines, pick_nearest, project_features,
    uv_coverage,
};
use tracing::{debug, info};

use crate::config::GlobeConfig;
use crate::draw;
use crate::input::Gesture;
use crate::layout::SceneLayout;

/// What the scene tells its host.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Selected(SceneFeature),
    Dismissed,
}

pub type SceneListener = Box<dyn FnMut(&SceneEvent)>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, not yet mounted.
    Idle,
    Running,
    /// Host page hidden; no tick is armed.
    Paused,
    /// Torn down. Terminal.
    Unmounted,
}

pub struct GlobeScene<S: TickScheduler, C: FieldCache> {
    config: GlobeConfig,
    network: StationNetwork,
    balloon: Option<BalloonPlatform>,
    rotation: RotationState,
    clock: FrameClock,
    scheduler: S,
    pending: Option<TickHandle>,
    cache: C,
    rng: StdRng,
    state: LoopState,
    layout: Option<SceneLayout>,
    stars: Vec<Star>,
    field: Vec<DecorFeature>,
    graticule: Vec<Vec<GeoPoint>>,
    uv_samples: Vec<Vec2>,
    outlines: OutlineState,
    points: Vec<ProjectedPoint>,
    balloon_at: Option<Projection>,
    last_frame: Option<Frame>,
    gesture: Option<Gesture>,
    pointer: Option<Vec2>,
    selection: SelectionState,
    events: EventBus<SceneEvent>,
    listeners: Vec<(ListenerId, SceneListener)>,
    next_listener: u64,
}

impl<S: TickScheduler, C: FieldCache> GlobeScene<S, C> {
    /// A scene over `features` with no baselines between them.
    pub fn new(config: GlobeConfig, features: Vec<SceneFeature>, scheduler: S, cache: C) -> Self {
        Self::with_network(config, StationNetwork::new(features, Vec::new()), scheduler, cache)
    }

    pub fn with_network(config: GlobeConfig, network: StationNetwork, scheduler: S, cache: C) -> Self {
        let rng = match config.field.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rotation: RotationState::new(&config.rotation),
            clock: FrameClock::new(config.clock),
            balloon: config.balloon.map(BalloonPlatform::new),
            graticule: graticule_lines(config.graticule_step_deg),
            uv_samples: config
                .uv_overlay
                .map_or_else(Vec::new, |uv| uv_coverage(uv.samples)),
            config,
            network,
            scheduler,
            pending: None,
            cache,
            rng,
            state: LoopState::Idle,
            layout: None,
            stars: Vec::new(),
            field: Vec::new(),
            outlines: OutlineState::default(),
            points: Vec::new(),
            balloon_at: None,
            last_frame: None,
            gesture: None,
            pointer: None,
            selection: SelectionState::new(),
            events: EventBus::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn set_outlines(&mut self, outlines: OutlineState) {
        self.outlines = outlines;
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&SceneEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn features(&self) -> &[SceneFeature] {
        &self.network.stations
    }

    pub fn layout(&self) -> Option<SceneLayout> {
        self.layout
    }

    /// Points from the most recent completed draw.
    pub fn points(&self) -> &[ProjectedPoint] {
        &self.points
    }

    pub fn field(&self) -> &[DecorFeature] {
        &self.field
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn selected(&self) -> Option<&SceneFeature> {
        self.selection.selected()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.last_frame
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn mount(&mut self, viewport: Viewport) {
        if self.state != LoopState::Idle {
            debug!(state = ?self.state, "mount ignored");
            return;
        }
        self.state = LoopState::Running;
        self.resize(viewport);
        self.arm();
        info!(
            features = self.network.stations.len(),
            width = viewport.width,
            height = viewport.height,
            "globe scene mounted"
        );
    }

    /// Re-derives every screen-space quantity for the new size and swaps in
    /// the backdrop for the new size bucket, cached when available.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.state == LoopState::Unmounted {
            return;
        }
        self.layout = Some(SceneLayout::new(&self.config.layout, viewport));
        self.stars = scatter_stars(&self.config.stars, viewport, &mut self.rng);
        self.field = if viewport.is_drawable() {
            let zones = self.config.field.zones_for(viewport);
            obtain_field(&mut self.cache, &self.config.field, viewport, &zones, &mut self.rng)
        } else {
            Vec::new()
        };
    }

    /// Visibility changes from the host page. Hiding pauses the loop; showing
    /// resumes it with a fresh clock so the first delta is not a catch-up.
    pub fn set_visible(&mut self, visible: bool) {
        match (self.state, visible) {
            (LoopState::Running, false) => {
                self.disarm();
                self.state = LoopState::Paused;
                debug!("globe scene paused");
            }
            (LoopState::Paused, true) => {
                self.clock.reset();
                self.state = LoopState::Running;
                self.arm();
                debug!("globe scene resumed");
            }
            _ => {}
        }
    }

    /// Cancels the pending tick and drops every listener. Nothing runs after
    /// this returns.
    pub fn unmount(&mut self) {
        if self.state == LoopState::Unmounted {
            return;
        }
        self.disarm();
        self.listeners.clear();
        self.events.clear();
        self.gesture = None;
        self.pointer = None;
        self.state = LoopState::Unmounted;
        debug!("globe scene unmounted");
    }

    /// Runs one tick if the scheduler has one due.
    pub fn pump<D: DrawSurface + ?Sized>(&mut self, surface: &mut D) -> bool {
        match self.scheduler.poll() {
            Some((handle, now_ms)) => self.on_tick(handle, now_ms, surface),
            None => false,
        }
    }

    /// Frame body. Ticks that are stale, or arrive while not running, are
    /// ignored. Returns `true` if a frame was drawn.
    pub fn on_tick<D: DrawSurface + ?Sized>(
        &mut self,
        handle: TickHandle,
        now_ms: f64,
        surface: &mut D,
    ) -> bool {
        if self.state != LoopState::Running || self.pending != Some(handle) {
            debug!(?handle, state = ?self.state, "ignoring stale tick");
            return false;
        }
        self.pending = None;

        let frame = self.clock.advance(now_ms);
        if self.gesture.is_none() {
            self.rotation.advance(frame.dt_ms);
        }
        if let Some(balloon) = self.balloon.as_mut() {
            balloon.advance(frame.dt_ms);
        }
        self.last_frame = Some(frame);

        self.draw(surface, now_ms);
        self.deliver();
        self.arm();
        true
    }

    pub fn pointer_down(&mut self, at: Vec2) {
        if !self.accepts_input() || !self.selection.is_empty() || !is_finite(at) {
            return;
        }
        let Some(layout) = self.layout else {
            return;
        };
        if !layout.hits_globe(at, self.config.input.hit_slack) {
            return;
        }
        self.gesture = Some(Gesture::begin(at, self.rotation.drag_origin()));
    }

    pub fn pointer_move(&mut self, at: Vec2) {
        if !self.accepts_input() || !is_finite(at) {
            return;
        }
        self.pointer = Some(at);
        if !self.selection.is_empty() {
            return;
        }
        if let Some(gesture) = self.gesture.as_mut() {
            let offset = gesture.move_to(at);
            self.rotation.drag_from(gesture.origin(), offset.x, offset.y);
        }
    }

    pub fn pointer_up(&mut self, at: Vec2) {
        if !self.accepts_input() || !self.selection.is_empty() {
            return;
        }
        let Some(mut gesture) = self.gesture.take() else {
            return;
        };
        if !is_finite(at) {
            return;
        }
        gesture.move_to(at);
        if !gesture.is_click(self.config.input.click_slop_px) {
            return;
        }
        let on_globe = self
            .layout
            .is_some_and(|l| l.hits_globe(at, self.config.input.hit_slack));
        if on_globe {
            self.try_select(at);
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = None;
    }

    /// DOM-style key names; only `"Escape"` does anything.
    pub fn key_down(&mut self, key: &str) {
        if key == "Escape" {
            self.dismiss();
        }
    }

    /// Closes the open selection. A no-op, without an event, when nothing is
    /// selected.
    pub fn dismiss(&mut self) {
        if self.state == LoopState::Unmounted {
            return;
        }
        if self.selection.dismiss().is_some() {
            self.events.emit_at(self.frame_index(), SceneEvent::Dismissed);
            self.deliver();
        }
    }

    /// Label of the nearest front-facing feature under the resting pointer.
    pub fn hovered(&self) -> Option<&SceneFeature> {
        if self.gesture.is_some() {
            return None;
        }
        let at = self.pointer?;
        let hit = pick_nearest(&self.points, at, self.config.input.pick_radius_px)?;
        self.network.stations.get(hit.feature)
    }

    fn try_select(&mut self, at: Vec2) {
        let Some(hit) = pick_nearest(&self.points, at, self.config.input.pick_radius_px) else {
            return;
        };
        let Some(feature) = self.network.stations.get(hit.feature).cloned() else {
            return;
        };
        debug!(id = %feature.id, distance = hit.distance, "feature picked");
        if self.selection.select(feature.clone()) {
            self.events.emit_at(self.frame_index(), SceneEvent::Selected(feature));
            self.deliver();
        }
    }

    fn accepts_input(&self) -> bool {
        matches!(self.state, LoopState::Running | LoopState::Paused)
    }

    fn frame_index(&self) -> u64 {
        self.last_frame.map_or(0, |f| f.index)
    }

    fn arm(&mut self) {
        self.pending = Some(self.scheduler.schedule_next_tick());
    }

    fn disarm(&mut self) {
        if self.pending.take().is_some() {
            self.scheduler.cancel();
        }
    }

    fn deliver(&mut self) {
        for event in self.events.drain() {
            for (_, listener) in self.listeners.iter_mut() {
                listener(&event.payload);
            }
        }
    }

    fn draw<D: DrawSurface + ?Sized>(&mut self, surface: &mut D, now_ms: f64) {
        draw::background(surface);
        let Some(layout) = self.layout else {
            self.points.clear();
            return;
        };
        let disc = layout.disc;
        let yaw = self.rotation.yaw;
        let pitch = self.rotation.view_pitch();
        let parallax = &self.config.parallax;
        let (dx, dy) = parallax.drift(now_ms);

        draw::stars(
            surface,
            &self.stars,
            Vec2::new(dx, dy).scale(parallax.star_factor),
        );
        draw::decor_field(
            surface,
            &self.field,
            Vec2::new(dx, dy).scale(parallax.field_factor),
        );
        draw::globe_disc(surface, disc);
        draw::graticule(surface, &self.graticule, yaw, pitch, disc);

        if let Some(set) = self.outlines.outlines() {
            let highlight = self.selection.selected().map(|f| f.position);
            draw::outlines(surface, set, highlight, yaw, pitch, disc);
        }

        self.points = project_features(&self.network.stations, &self.rotation, disc);

        if self.config.network {
            draw::baselines(surface, &self.network.visible_baselines(&self.points));
        }
        self.balloon_at = self.balloon.as_ref().map(|b| b.project(yaw, pitch, disc));
        if let Some(at) = self.balloon_at {
            draw::balloon_links(surface, &balloon_baselines(at, &self.points));
        }

        let selected = self.selection.selected().and_then(|s| {
            self.network
                .stations
                .iter()
                .position(|f| f.id == s.id)
        });
        draw::markers(surface, &self.points, selected);
        if let Some(at) = self.balloon_at {
            draw::balloon(surface, at, disc);
        }
        if let Some(uv) = self.config.uv_overlay {
            draw::uv_coverage(surface, &self.uv_samples, uv.disc(layout.viewport));
        }

        if let (Some(at), Some(feature)) = (self.pointer, self.hovered()) {
            let anchor = pick_nearest(&self.points, at, self.config.input.pick_radius_px)
                .map_or(at, |hit| hit.screen);
            draw::hover_label(surface, anchor, &feature.label);
        }
    }
}

fn is_finite(p: Vec2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::{GlobeScene, LoopState, SceneEvent};
    use crate::config::{GlobeConfig, UvOverlayConfig};
    use field::InMemoryFieldCache;
    use foundation::math::{GeoPoint, Vec2, Viewport};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use render::{DrawCommand, NullSurface, RecordingSurface};
    use runtime::{ManualScheduler, TickHandle, TickScheduler};
    use scene::{
        BalloonConfig, Outline, OutlineError, OutlineSet, OutlineShape, OutlineState,
        SceneFeature, StationNetwork,
    };
    use std::cell::RefCell;
    use std::f64::consts::FRAC_PI_2;
    use std::rc::Rc;

    type TestScene = GlobeScene<ManualScheduler, InMemoryFieldCache>;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }

    fn config() -> GlobeConfig {
        let mut cfg = GlobeConfig::default();
        cfg.field.seed = Some(11);
        cfg
    }

    fn features() -> Vec<SceneFeature> {
        [
            ("nyc", 40.7, -74.0),
            ("lon", 51.5, -0.1),
            ("tok", 35.7, 139.7),
            ("syd", -33.9, 151.2),
            ("rio", -22.9, -43.2),
            ("cai", 30.0, 31.2),
        ]
        .into_iter()
        .map(|(id, lat, lon)| SceneFeature::new(id, id.to_uppercase(), GeoPoint::new(lat, lon)))
        .collect()
    }

    fn mounted(cfg: GlobeConfig) -> TestScene {
        let mut scene = GlobeScene::new(
            cfg,
            features(),
            ManualScheduler::new(0.0),
            InMemoryFieldCache::new(),
        );
        scene.mount(Viewport::new(800.0, 600.0));
        scene.scheduler_mut().advance(16.0);
        assert!(scene.pump(&mut NullSurface));
        scene
    }

    fn recorder(scene: &mut TestScene) -> Rc<RefCell<Vec<SceneEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        scene.add_listener(move |e| sink.borrow_mut().push(e.clone()));
        seen
    }

    /// A front-facing point that sits on the globe, with its feature id.
    fn clickable(scene: &TestScene) -> (Vec2, String) {
        let layout = scene.layout().unwrap();
        let p = scene
            .points()
            .iter()
            .find(|p| p.front && layout.hits_globe(p.screen, 1.0))
            .expect("some feature faces the viewer");
        (p.screen, scene.features()[p.feature].id.to_string())
    }

    #[test]
    fn click_on_feature_selects_it() {
        let mut scene = mounted(config());
        let seen = recorder(&mut scene);
        let (at, id) = clickable(&scene);

        scene.pointer_down(at);
        scene.pointer_up(at);

        assert_eq!(scene.selected().map(|f| f.id.to_string()), Some(id.clone()));
        let events = seen.borrow();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], SceneEvent::Selected(f) if f.id.as_str() == id));
    }

    #[test]
    fn drag_rotates_and_never_selects() {
        let mut scene = mounted(config());
        let seen = recorder(&mut scene);
        let center = scene.layout().unwrap().disc.center;
        let yaw0 = scene.rotation().yaw;

        scene.pointer_down(center);
        assert!(scene.is_dragging());
        scene.pointer_move(center + Vec2::new(25.0, 0.0));
        scene.pointer_move(center + Vec2::new(50.0, 0.0));
        assert_close(scene.rotation().yaw, yaw0 - 50.0 * 0.005);
        scene.pointer_up(center + Vec2::new(50.0, 0.0));

        assert!(!scene.is_dragging());
        assert!(seen.borrow().is_empty());
        assert!(scene.selected().is_none());
    }

    #[test]
    fn jitter_below_slop_still_clicks_but_a_round_trip_does_not() {
        let mut scene = mounted(config());
        let seen = recorder(&mut scene);
        let (at, _) = clickable(&scene);

        // Back and forth by 2px: displacement 0, path 4px.
        scene.pointer_down(at);
        scene.pointer_move(at + Vec2::new(2.0, 0.0));
        scene.pointer_up(at);
        assert!(seen.borrow().is_empty());

        // 1px out and back: path 2px.
        scene.pointer_down(at);
        scene.pointer_move(at + Vec2::new(1.0, 0.0));
        scene.pointer_up(at);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn press_outside_the_globe_is_ignored() {
        let mut scene = mounted(config());
        let seen = recorder(&mut scene);
        let yaw0 = scene.rotation().yaw;

        scene.pointer_down(Vec2::new(2.0, 2.0));
        assert!(!scene.is_dragging());
        scene.pointer_move(Vec2::new(80.0, 2.0));
        scene.pointer_up(Vec2::new(80.0, 2.0));

        assert_eq!(scene.rotation().yaw, yaw0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn open_selection_locks_input_until_escape() {
        let mut scene = mounted(config());
        let seen = recorder(&mut scene);
        let (at, _) = clickable(&scene);
        scene.pointer_down(at);
        scene.pointer_up(at);
        assert!(scene.selected().is_some());

        scene.pointer_down(at);
        assert!(!scene.is_dragging());

        scene.key_down("Enter");
        assert!(scene.selected().is_some());
        scene.key_down("Escape");
        assert!(scene.selected().is_none());

        scene.pointer_down(at);
        assert!(scene.is_dragging());
        assert_eq!(seen.borrow().last(), Some(&SceneEvent::Dismissed));
    }

    #[test]
    fn dismiss_without_selection_is_silent() {
        let mut scene = mounted(config());
        let seen = recorder(&mut scene);
        scene.dismiss();
        scene.dismiss();
        assert!(seen.borrow().is_empty());

        let (at, _) = clickable(&scene);
        scene.pointer_down(at);
        scene.pointer_up(at);
        scene.dismiss();
        scene.dismiss();
        assert_eq!(
            seen.borrow()
                .iter()
                .filter(|e| **e == SceneEvent::Dismissed)
                .count(),
            1
        );
    }

    #[test]
    fn pitch_stays_inside_half_pi_under_random_drags() {
        let mut scene = mounted(config());
        let center = scene.layout().unwrap().disc.center;
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            scene.pointer_down(center);
            for _ in 0..10 {
                let d = Vec2::new(rng.gen_range(-5000.0..5000.0), rng.gen_range(-5000.0..5000.0));
                scene.pointer_move(center + d);
                let pitch = scene.rotation().pitch();
                assert!(pitch > -FRAC_PI_2 && pitch < FRAC_PI_2, "{pitch}");
            }
            scene.pointer_up(center);
        }
    }

    #[test]
    fn auto_rotation_uses_clamped_dt_and_pauses_while_dragging() {
        let mut scene = mounted(config());
        let vel = GlobeConfig::default().rotation.auto_rotate_velocity;

        let yaw0 = scene.rotation().yaw;
        scene.scheduler_mut().advance(5_000.0);
        scene.pump(&mut NullSurface);
        assert_close(scene.rotation().yaw, yaw0 + 64.0 * vel);

        let center = scene.layout().unwrap().disc.center;
        scene.pointer_down(center);
        let yaw1 = scene.rotation().yaw;
        scene.scheduler_mut().advance(16.0);
        scene.pump(&mut NullSurface);
        assert_eq!(scene.rotation().yaw, yaw1);
    }

    #[test]
    fn resume_resets_the_clock() {
        let mut scene = mounted(config());
        let vel = GlobeConfig::default().rotation.auto_rotate_velocity;

        scene.set_visible(false);
        assert_eq!(scene.state(), LoopState::Paused);
        assert!(!scene.scheduler().is_pending());
        scene.scheduler_mut().advance(30.0);
        assert!(!scene.pump(&mut NullSurface));

        scene.set_visible(true);
        let yaw0 = scene.rotation().yaw;
        scene.scheduler_mut().advance(30.0);
        assert!(scene.pump(&mut NullSurface));
        // First tick after a reset carries the minimum delta, not 30ms.
        assert_close(scene.rotation().yaw, yaw0 + vel);
    }

    #[test]
    fn stale_ticks_are_ignored() {
        let mut scene = mounted(config());
        let yaw0 = scene.rotation().yaw;
        assert!(!scene.on_tick(TickHandle(9_999), 100.0, &mut NullSurface));
        assert_eq!(scene.rotation().yaw, yaw0);
        assert!(scene.scheduler().is_pending());
    }

    #[test]
    fn unmount_cancels_ticks_and_listeners() {
        let mut scene = mounted(config());
        let seen = recorder(&mut scene);
        let (at, _) = clickable(&scene);
        let armed = scene.scheduler().armed_total();

        scene.unmount();
        assert_eq!(scene.state(), LoopState::Unmounted);
        assert!(!scene.scheduler().is_pending());

        scene.scheduler_mut().advance(16.0);
        assert!(!scene.pump(&mut NullSurface));
        scene.pointer_down(at);
        scene.pointer_up(at);
        scene.set_visible(true);
        assert!(seen.borrow().is_empty());
        assert_eq!(scene.scheduler().armed_total(), armed);
    }

    #[test]
    fn resize_reuses_the_cached_field_per_size_bucket() {
        let mut scene = mounted(config());
        let small = scene.field().to_vec();
        assert!(small.len() <= 6);

        scene.resize(Viewport::new(1600.0, 1200.0));
        let layout = scene.layout().unwrap();
        assert_eq!(layout.disc.center, Vec2::new(800.0, 720.0));
        assert!(scene.field().len() <= 6);
        assert_eq!(scene.cache().len(), 2);

        scene.resize(Viewport::new(850.0, 640.0));
        assert_eq!(scene.field(), small.as_slice());
        assert_eq!(scene.cache().len(), 2);

        scene.scheduler_mut().advance(16.0);
        assert!(scene.pump(&mut NullSurface));
    }

    #[test]
    fn degenerate_viewport_draws_without_panicking() {
        let mut scene = mounted(config());
        scene.resize(Viewport::new(0.0, 0.0));
        scene.scheduler_mut().advance(16.0);
        assert!(scene.pump(&mut RecordingSurface::new()));
        assert!(scene.field().is_empty());
    }

    #[test]
    fn frame_draws_background_first_and_markers_for_front_points() {
        let mut scene = mounted(config());
        let mut surface = RecordingSurface::new();
        scene.scheduler_mut().advance(16.0);
        scene.pump(&mut surface);

        assert!(matches!(surface.commands.first(), Some(DrawCommand::SetTransform(_))));
        assert!(matches!(surface.commands.get(1), Some(DrawCommand::Clear(_))));
        let front = scene.points().iter().filter(|p| p.front).count();
        assert!(front <= scene.features().len());
        // Three circles per marker on top of stars, galaxies and the disc.
        let marker_circles = surface
            .circles()
            .filter(|(_, r, _)| (*r - 12.0).abs() < 1e-9)
            .count();
        assert_eq!(marker_circles, front);
        assert!(surface.polyline_count() > 0);
    }

    #[test]
    fn hover_draws_the_nearest_label() {
        let mut scene = mounted(config());
        let (at, id) = clickable(&scene);
        scene.pointer_move(at + Vec2::new(3.0, 0.0));
        assert_eq!(scene.hovered().map(|f| f.id.to_string()), Some(id.clone()));

        let mut surface = RecordingSurface::new();
        scene.scheduler_mut().advance(1.0);
        scene.pump(&mut surface);
        assert_eq!(surface.labels(), vec![id.to_uppercase().as_str()]);

        surface.take();
        scene.pointer_leave();
        scene.scheduler_mut().advance(1.0);
        scene.pump(&mut surface);
        assert!(surface.labels().is_empty());
    }

    #[test]
    fn network_baselines_and_balloon_links_are_drawn() {
        let mut cfg = config();
        cfg.balloon = Some(BalloonConfig::default());
        let mut scene = GlobeScene::with_network(
            cfg,
            StationNetwork::eht(),
            ManualScheduler::new(0.0),
            InMemoryFieldCache::new(),
        );
        scene.mount(Viewport::new(1024.0, 768.0));
        let mut surface = RecordingSurface::new();
        scene.scheduler_mut().advance(16.0);
        scene.pump(&mut surface);

        let front = scene.points().iter().filter(|p| p.front).count();
        assert!(front > 0);
        // Galaxy jets are lines too; there are two per galaxy.
        let jets = scene.field().len() * 2;
        assert!(surface.line_count() > jets);
    }

    #[test]
    fn uv_overlay_draws_one_spoke_per_sample() {
        let spokes_from = |surface: &RecordingSurface, centre: Vec2| {
            surface
                .commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Line { from, .. } if *from == centre))
                .count()
        };
        let uv = UvOverlayConfig::default();
        let centre = uv.disc(Viewport::new(800.0, 600.0)).center;

        let mut cfg = config();
        cfg.uv_overlay = Some(uv);
        let mut scene = mounted(cfg);
        let mut surface = RecordingSurface::new();
        scene.scheduler_mut().advance(16.0);
        assert!(scene.pump(&mut surface));
        assert_eq!(spokes_from(&surface, centre), 240);

        let mut plain = mounted(config());
        let mut surface = RecordingSurface::new();
        plain.scheduler_mut().advance(16.0);
        assert!(plain.pump(&mut surface));
        assert_eq!(spokes_from(&surface, centre), 0);
    }

    #[test]
    fn outline_failure_still_renders() {
        let mut scene = mounted(config());
        scene.set_outlines(OutlineState::from_load(Err(OutlineError::MissingFeatures)));
        scene.scheduler_mut().advance(16.0);
        assert!(scene.pump(&mut RecordingSurface::new()));
    }

    #[test]
    fn selected_region_is_highlighted() {
        let mut scene = mounted(config());
        let (at, id) = clickable(&scene);
        let feature = scene
            .features()
            .iter()
            .find(|f| f.id.as_str() == id)
            .unwrap()
            .clone();
        let p = feature.position;
        // A small square around the feature, well inside the visible side.
        let ring = vec![
            GeoPoint::new(p.lat_deg - 1.0, p.lon_deg - 1.0),
            GeoPoint::new(p.lat_deg - 1.0, p.lon_deg + 1.0),
            GeoPoint::new(p.lat_deg + 1.0, p.lon_deg + 1.0),
            GeoPoint::new(p.lat_deg + 1.0, p.lon_deg - 1.0),
        ];
        scene.set_outlines(OutlineState::Loaded(OutlineSet {
            outlines: vec![Outline {
                name: Some("box".to_string()),
                shape: OutlineShape::Area(vec![vec![ring]]),
            }],
        }));

        scene.pointer_down(at);
        scene.pointer_up(at);
        let mut surface = RecordingSurface::new();
        scene.scheduler_mut().advance(1.0);
        scene.pump(&mut surface);

        let fills: Vec<_> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polygon { paint, .. } => Some(paint.color()),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 1);
        assert_eq!((fills[0].r, fills[0].g, fills[0].b), (255, 220, 0));
    }

    #[test]
    fn mount_is_once_only() {
        let mut scene = mounted(config());
        let armed = scene.scheduler().armed_total();
        scene.mount(Viewport::new(10.0, 10.0));
        assert_eq!(scene.scheduler().armed_total(), armed);
        assert_eq!(scene.layout().unwrap().viewport, Viewport::new(800.0, 600.0));
    }
}
