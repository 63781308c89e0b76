// filepath: src/pointer.rs
//! Pointer (mouse) event handling for hypr-showcase

use crate::app::AppData;
use log::debug;
use smithay_client_toolkit::seat::pointer::{PointerEvent, PointerEventKind};

pub fn handle_pointer_events(events: &[PointerEvent], app: &mut AppData) {
    for event in events {
        match event.kind {
            PointerEventKind::Press { button, .. } => {
                debug!(
                    "Button {:#x} pressed at ({:.2}, {:.2})",
                    button, event.position.0, event.position.1
                );
                app.tap(event.position.0, event.position.1);
            }
            PointerEventKind::Enter { .. } => {
                debug!(
                    "Pointer entered overlay at ({:.2}, {:.2})",
                    event.position.0, event.position.1
                );
            }
            _ => {}
        }
        if app.exit {
            break;
        }
    }
}
