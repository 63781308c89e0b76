// filepath: src/app.rs
//! Main application logic for hypr-showcase

use hypr_showcase::draw::Canvas;
use hypr_showcase::text::FontText;
use hypr_showcase::{
    Color, FileRegistry, Overlay, OverlayContainer, Point, Rect, Scene, ShowEnv, ShowOutcome,
    Showcase,
};
use log::{debug, info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState,
    compositor::Region,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::{
        wlr_layer::{Anchor, KeyboardInteractivity, LayerSurface},
        WaylandSurface,
    },
    shm::{slot::SlotPool, Shm},
};
use wayland_client::protocol::{wl_pointer, wl_shm};
use wayland_client::Proxy;

/// The layer surface seen as an overlay container: it covers the whole
/// output and holds at most one overlay.
#[derive(Debug, Default)]
pub struct OverlaySurface {
    width: u32,
    height: u32,
    overlay: Option<Overlay>,
}

impl OverlaySurface {
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }
}

impl OverlayContainer for OverlaySurface {
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    fn insert_overlay(&mut self, overlay: Overlay) {
        self.overlay = Some(overlay);
    }

    fn remove_overlay(&mut self) -> Option<Overlay> {
        self.overlay.take()
    }
}

pub struct AppData {
    registry_state: RegistryState,
    output_state: OutputState,
    seat_state: SeatState,
    compositor_state: CompositorState,
    shm_state: Shm,
    layer_surface: Option<LayerSurface>,
    pool: SlotPool,
    surface: OverlaySurface,
    configured: bool,
    presented: bool,
    pointer: Option<wl_pointer::WlPointer>,
    input_region: Option<Region>,
    showcase: Showcase,
    scene: Scene,
    single_shot: FileRegistry,
    text: FontText,
    pub(crate) exit: bool,
}

/// Host-side pieces the showcase needs
pub struct ShowcaseParts {
    pub showcase: Showcase,
    pub scene: Scene,
    pub single_shot: FileRegistry,
    pub text: FontText,
}

impl AppData {
    pub fn new(
        registry_state: RegistryState,
        output_state: OutputState,
        seat_state: SeatState,
        compositor_state: CompositorState,
        shm_state: Shm,
        layer_surface: LayerSurface,
        pool: SlotPool,
        parts: ShowcaseParts,
    ) -> Self {
        info!("Configuring full-screen overlay surface");
        layer_surface.set_anchor(Anchor::TOP | Anchor::BOTTOM | Anchor::LEFT | Anchor::RIGHT);
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::None);
        // Zero size lets the compositor stretch us across the anchors
        layer_surface.set_size(0, 0);
        layer_surface.set_exclusive_zone(-1);
        layer_surface.set_margin(0, 0, 0, 0);
        layer_surface.wl_surface().commit();

        Self {
            registry_state,
            output_state,
            seat_state,
            compositor_state,
            shm_state,
            layer_surface: Some(layer_surface),
            pool,
            surface: OverlaySurface::default(),
            configured: false,
            presented: false,
            pointer: None,
            input_region: None,
            showcase: parts.showcase,
            scene: parts.scene,
            single_shot: parts.single_shot,
            text: parts.text,
            exit: false,
        }
    }

    /// Handle a compositor configure with the size it gave us
    pub fn handle_configure(&mut self, width: u32, height: u32) {
        if width != 0 {
            self.surface.width = width;
        }
        if height != 0 {
            self.surface.height = height;
        }
        self.configured = true;
        info!(
            "Surface configured with size: {}x{}",
            self.surface.width, self.surface.height
        );

        if !self.presented {
            self.presented = true;
            self.present();
        } else if self
            .showcase
            .relayout(&self.scene, &mut self.surface, &self.text)
        {
            self.set_full_input_region();
            if let Err(e) = self.draw() {
                warn!("Redraw after configure failed: {e}");
            }
        }
    }

    /// Show the showcase on this surface. The surface is sized by now,
    /// which is when target geometry becomes meaningful.
    fn present(&mut self) {
        let outcome = self.showcase.show(ShowEnv {
            layout: &self.scene,
            container: &mut self.surface,
            registry: &mut self.single_shot,
            measure: &self.text,
        });

        match outcome {
            ShowOutcome::Shown => {
                self.set_full_input_region();
                if let Err(e) = self.draw() {
                    warn!("Failed to draw showcase: {e}");
                    self.exit = true;
                }
            }
            ShowOutcome::Skipped | ShowOutcome::Ignored => {
                info!("Nothing to present ({:?}), exiting", outcome);
                self.exit = true;
            }
        }
    }

    pub fn draw(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.configured {
            debug!("draw() called before surface is configured, skipping");
            return Ok(());
        }
        let Some(layer_surface) = &self.layer_surface else {
            return Ok(());
        };

        let width = self.surface.width;
        let height = self.surface.height;
        let stride = width * 4;
        info!("Drawing overlay {}x{}", width, height);

        let (buffer, pixels) = self.pool.create_buffer(
            width as i32,
            height as i32,
            stride as i32,
            wl_shm::Format::Argb8888,
        )?;

        let mut canvas = Canvas::new(pixels, width, height);
        match self.surface.overlay() {
            Some(overlay) => canvas.draw_overlay(overlay, &self.text),
            None => canvas.clear(Color::TRANSPARENT),
        }

        buffer.attach_to(layer_surface.wl_surface())?;
        layer_surface
            .wl_surface()
            .damage_buffer(0, 0, width as i32, height as i32);
        layer_surface.wl_surface().commit();

        Ok(())
    }

    /// A tap dismisses the showcase and ends the session
    pub fn tap(&mut self, x: f64, y: f64) {
        let point = Point::new(x as f32, y as f32);
        if self.showcase.handle_tap(point, &mut self.surface) {
            self.close_layer_surface();
            self.exit = true;
        }
    }

    pub fn set_full_input_region(&mut self) {
        if let Some(layer_surface) = &self.layer_surface {
            let surface = layer_surface.wl_surface();
            match Region::new(&self.compositor_state) {
                Ok(region) => {
                    region.add(0, 0, self.surface.width as i32, self.surface.height as i32);
                    surface.set_input_region(Some(region.wl_region()));
                    self.input_region = Some(region);
                    debug!(
                        "Input region (0, 0, {}, {}) on {:?}",
                        self.surface.width,
                        self.surface.height,
                        surface.id()
                    );
                }
                Err(e) => {
                    warn!("Failed to create input region for overlay surface: {e}");
                }
            }
        } else {
            warn!("set_full_input_region called but no layer_surface present");
        }
    }

    pub fn registry_state(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    pub fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    pub fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    pub fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm_state
    }

    pub fn set_pointer(&mut self, pointer: Option<wl_pointer::WlPointer>) {
        self.pointer = pointer;
        info!("Pointer set: {:?}", self.pointer.is_some());
    }

    /// Drop the layer surface; the compositor unmaps it
    pub fn close_layer_surface(&mut self) {
        self.input_region = None;
        self.layer_surface = None;
        info!("Layer surface closed");
    }

    /// The compositor closed our surface: dismiss without a tap
    pub fn surface_closed(&mut self) {
        self.showcase.dismiss(&mut self.surface);
        self.close_layer_surface();
        self.exit = true;
    }
}
