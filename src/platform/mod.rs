//! Platform abstraction layer
//!
//! Clock access on both targets, plus scoped DOM event listeners on the web.

/// Monotonic milliseconds, suitable for the game loop
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Wall-clock milliseconds since the Unix epoch, for timestamps and seeds
#[cfg(target_arch = "wasm32")]
pub fn unix_time_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn unix_time_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub use web::EventSubscription;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::EventTarget;

    /// A DOM event listener that is removed when dropped
    pub struct EventSubscription {
        target: EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl EventSubscription {
        pub fn new<E, F>(target: &EventTarget, event: &'static str, mut handler: F) -> Self
        where
            E: JsCast,
            F: FnMut(E) + 'static,
        {
            let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |e: web_sys::Event| {
                if let Ok(e) = e.dyn_into::<E>() {
                    handler(e);
                }
            });
            if target
                .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
                .is_err()
            {
                log::warn!("Failed to add '{}' listener", event);
            }
            Self {
                target: target.clone(),
                event,
                callback,
            }
        }
    }

    impl Drop for EventSubscription {
        fn drop(&mut self) {
            let _ = self.target.remove_event_listener_with_callback(
                self.event,
                self.callback.as_ref().unchecked_ref(),
            );
        }
    }
}
