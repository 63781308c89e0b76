use hypr_showcase::layout::Placement;
use hypr_showcase::mask::{HighlightShape, OUTLINE_WIDTH};
use hypr_showcase::text::FixedMetrics;
use hypr_showcase::{
    Callbacks, Canvas, Color, HostLayout, IndexPath, MemoryRegistry, Overlay, OverlayContainer,
    OverlayState, Point, Rect, Scene, ShowEnv, ShowOutcome, Showcase, ShowcaseObserver,
    SingleShotRegistry,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const SCREEN: Rect = Rect::new(0.0, 0.0, 390.0, 844.0);

#[derive(Default)]
struct KeyWindow {
    overlay: Option<Overlay>,
    inserts: usize,
    removals: usize,
}

impl OverlayContainer for KeyWindow {
    fn bounds(&self) -> Rect {
        SCREEN
    }

    fn insert_overlay(&mut self, overlay: Overlay) {
        self.inserts += 1;
        self.overlay = Some(overlay);
    }

    fn remove_overlay(&mut self) -> Option<Overlay> {
        self.removals += 1;
        self.overlay.take()
    }
}

#[derive(Default)]
struct Recorder {
    shown: usize,
    dismissed: usize,
}

impl ShowcaseObserver for Recorder {
    fn on_shown(&mut self) {
        self.shown += 1;
    }

    fn on_dismissed(&mut self) {
        self.dismissed += 1;
    }
}

fn app_scene() -> Scene {
    let mut scene = Scene::new();
    scene
        .add_view("content", None, Rect::new(0.0, 88.0, 390.0, 756.0))
        .add_view("settings", Some("content"), Rect::new(20.0, 600.0, 120.0, 44.0))
        .add_view("list", Some("content"), Rect::new(0.0, 0.0, 390.0, 500.0))
        .add_table("list", vec![2, 4], 60.0)
        .add_view("compose-button", None, Rect::new(330.0, 44.0, 44.0, 44.0))
        .add_bar_item("compose", Some("compose-button"));
    scene
}

fn show(showcase: &mut Showcase, scene: &Scene, window: &mut KeyWindow, registry: &mut MemoryRegistry) -> ShowOutcome {
    showcase.show(ShowEnv {
        layout: scene,
        container: window,
        registry,
        measure: &FixedMetrics,
    })
}

#[test]
fn hex_colors_parse_with_or_without_prefix() {
    let a = Color::from_hex("1397C5").unwrap();
    let b = Color::from_hex("#1397C5").unwrap();
    assert_eq!(a, b);
    assert_eq!((a.r, a.g, a.b, a.a), (0x13, 0x97, 0xC5, 0xFF));
    assert!(Color::from_hex("zzzzzz").is_err());
    assert!(Color::from_hex("12").is_err());
}

#[test]
fn text_goes_to_the_roomier_side() {
    let showcase = Showcase::new();

    let low = showcase.compose(SCREEN, Rect::new(100.0, 700.0, 100.0, 40.0), &FixedMetrics);
    assert_eq!(low.text.placement, Placement::Above);

    let high = showcase.compose(SCREEN, Rect::new(100.0, 80.0, 100.0, 40.0), &FixedMetrics);
    assert_eq!(high.text.placement, Placement::Below);

    let full = showcase.compose(SCREEN, SCREEN, &FixedMetrics);
    assert_eq!(full.text.placement, Placement::Below);
}

#[test]
fn rectangle_mask_covers_all_but_inflated_target() {
    let target = Rect::new(100.0, 300.0, 120.0, 50.0);
    let overlay = Showcase::new().compose(SCREEN, target, &FixedMetrics);
    let hole = target.inflate(OUTLINE_WIDTH);

    for &(x, y) in &[(1.0, 1.0), (389.0, 843.0), (hole.left() - 1.0, 320.0), (160.0, hole.bottom() + 1.0)] {
        assert!(overlay.mask.contains(Point::new(x, y)), "({x}, {y}) should be dimmed");
    }
    for &(x, y) in &[(160.0, 325.0), (hole.left() + 0.5, hole.top() + 0.5), (target.right() + 2.0, 320.0)] {
        assert!(!overlay.mask.contains(Point::new(x, y)), "({x}, {y}) should be clear");
    }
}

#[test]
fn circle_mask_covers_all_but_the_circle() {
    let target = Rect::new(100.0, 300.0, 120.0, 50.0);
    let mut showcase = Showcase::new();
    showcase.set_shape(HighlightShape::Circle).set_radius(30.0);
    let overlay = showcase.compose(SCREEN, target, &FixedMetrics);
    let c = target.center();

    assert!(!overlay.mask.contains(c));
    assert!(!overlay.mask.contains(Point::new(c.x + 29.0, c.y)));
    assert!(overlay.mask.contains(Point::new(c.x + 31.0, c.y)));
    // target corners lie outside a 30px circle
    assert!(overlay.mask.contains(Point::new(target.left() + 1.0, target.top() + 1.0)));
}

#[test]
fn single_shot_is_presented_once() {
    let scene = app_scene();
    let mut registry = MemoryRegistry::new();

    let first_observer = Rc::new(RefCell::new(Recorder::default()));
    let mut window = KeyWindow::default();
    let mut first = Showcase::new();
    first
        .set_single_shot_id(9)
        .set_observer(first_observer.clone())
        .setup_for_view("settings", "Settings", "Change your preferences");
    assert_eq!(show(&mut first, &scene, &mut window, &mut registry), ShowOutcome::Shown);
    assert!(registry.is_recorded(9));
    assert_eq!(first_observer.borrow().shown, 1);

    let second_observer = Rc::new(RefCell::new(Recorder::default()));
    let mut other_window = KeyWindow::default();
    let mut second = Showcase::new();
    second
        .set_single_shot_id(9)
        .set_observer(second_observer.clone())
        .setup_for_view("settings", "Settings", "Change your preferences");
    assert_eq!(
        show(&mut second, &scene, &mut other_window, &mut registry),
        ShowOutcome::Skipped
    );
    assert_eq!(other_window.inserts, 0);
    assert!(other_window.overlay.is_none());
    assert_eq!(second_observer.borrow().shown, 0);
    assert!(!second.dismiss(&mut other_window));
    assert_eq!(second_observer.borrow().dismissed, 0);
}

#[test]
fn dismiss_fires_exactly_once_after_show() {
    let scene = app_scene();
    let mut registry = MemoryRegistry::new();
    let mut window = KeyWindow::default();
    let dismissed = Rc::new(Cell::new(0));
    let counter = dismissed.clone();

    let mut showcase = Showcase::new();
    showcase
        .set_observer(Callbacks::new().on_dismissed(move || counter.set(counter.get() + 1)))
        .setup_for_bar_button("compose", "Compose", "Write a new message");

    // Nothing to dismiss before show()
    assert!(!showcase.dismiss(&mut window));
    assert!(!showcase.handle_tap(Point::new(10.0, 10.0), &mut window));
    assert_eq!(dismissed.get(), 0);

    assert_eq!(show(&mut showcase, &scene, &mut window, &mut registry), ShowOutcome::Shown);
    assert_eq!(
        window.overlay.as_ref().unwrap().highlight,
        Rect::new(330.0, 44.0, 44.0, 44.0)
    );
    assert_eq!(dismissed.get(), 0);

    assert!(showcase.handle_tap(Point::new(10.0, 10.0), &mut window));
    assert!(!showcase.handle_tap(Point::new(10.0, 10.0), &mut window));
    assert!(!showcase.dismiss(&mut window));
    assert_eq!(dismissed.get(), 1);
    assert_eq!(window.removals, 1);
    assert_eq!(showcase.state(), OverlayState::Dismissed);
}

#[test]
fn table_cell_overloads_resolve_different_rows() {
    let scene = app_scene();
    let mut registry = MemoryRegistry::new();

    let mut window = KeyWindow::default();
    let mut specific = Showcase::new();
    specific.setup_for_table_row("list", 2, 1, "Pinned", "Your pinned chats");
    show(&mut specific, &scene, &mut window, &mut registry);
    let specific_rect = window.overlay.as_ref().unwrap().highlight;

    let mut window = KeyWindow::default();
    let mut first = Showcase::new();
    first.setup_for_table("list", "Chats", "All conversations");
    show(&mut first, &scene, &mut window, &mut registry);
    let first_rect = window.overlay.as_ref().unwrap().highlight;

    // list sits at y = 88 in the window; section 0 has two 60px rows
    assert_eq!(first_rect, Rect::new(0.0, 88.0, 390.0, 60.0));
    assert_eq!(specific_rect, Rect::new(0.0, 88.0 + 120.0 + 120.0, 390.0, 60.0));
    assert_eq!(
        scene.table_row_rect(&"list".into(), IndexPath::new(2, 1)),
        Some(specific_rect)
    );
}

#[test]
fn rendered_overlay_dims_outside_and_clears_inside() {
    let scene = app_scene();
    let mut registry = MemoryRegistry::new();
    let mut window = KeyWindow::default();
    let mut showcase = Showcase::new();
    showcase.setup_for_view("settings", "Settings", "Change your preferences");
    show(&mut showcase, &scene, &mut window, &mut registry);
    let overlay = window.overlay.as_ref().unwrap();

    let (w, h) = (SCREEN.width as u32, SCREEN.height as u32);
    let mut pixels = vec![0u8; (w * h * 4) as usize];
    let mut canvas = Canvas::new(&mut pixels, w, h);
    canvas.draw_overlay(overlay, &FixedMetrics);

    // settings view: window rect (20, 688, 120, 44)
    assert_eq!(canvas.pixel(80, 710), Some([0, 0, 0, 0]));
    let dimmed = Color::BLACK.with_opacity(0.75).to_argb8888();
    assert_eq!(canvas.pixel(380, 5), Some(dimmed));
}
