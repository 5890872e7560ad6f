//! Host platform probing and the browser XR bridge.
//!
//! In the browser the WebXR API is asked whether `immersive-vr` sessions are
//! possible, an enter-VR button is placed on the page when they are, and the
//! session's trigger squeezes are queued for the VR input systems. Native
//! builds have no WebXR and report `Unsupported` at once.

use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use crate::events::SelectPhase;
use crate::resources::{BowlingConfig, VrSupport};
use crate::types::{Hand, InputScheme, VrCapability};

/// Slot the asynchronous probe writes its answer into.
#[derive(Resource, Clone, Default)]
pub struct VrProbe(Arc<Mutex<Option<VrCapability>>>);

impl VrProbe {
    fn store(&self, capability: VrCapability) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(capability);
        }
    }

    fn take(&self) -> Option<VrCapability> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// Trigger squeezes reported by the browser's XR session, oldest first.
///
/// Filled from JavaScript callbacks and drained once per frame by
/// [`crate::systems::vr::forward_xr_selects`].
#[derive(Resource, Clone, Default)]
pub struct XrSelectQueue(Arc<Mutex<Vec<(Hand, SelectPhase)>>>);

impl XrSelectQueue {
    pub fn push(&self, hand: Hand, phase: SelectPhase) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push((hand, phase));
        }
    }

    pub fn drain(&self) -> Vec<(Hand, SelectPhase)> {
        self.0
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

/// Whether the enter-VR button made it onto the page.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnterVrButton {
    /// Waiting for the capability probe
    #[default]
    Pending,
    Shown,
    /// No immersive sessions, or the page could not take the button
    Unavailable,
}

/// Kick off the VR capability probe.
pub fn start_vr_probe(mut commands: Commands) {
    let probe = VrProbe::default();
    spawn_probe(probe.clone());
    commands.insert_resource(probe);
}

/// Move a finished probe result into [`VrSupport`].
pub fn poll_vr_probe(
    probe: Option<Res<VrProbe>>,
    config: Res<BowlingConfig>,
    mut support: ResMut<VrSupport>,
) {
    let Some(capability) = probe.and_then(|probe| probe.take()) else {
        return;
    };
    info!("VR capability: {:?}", capability);
    if config.input_scheme == InputScheme::Vr && capability != VrCapability::Supported {
        warn!("VR input selected but no immersive session is available");
    }
    support.capability = capability;
}

/// Place the enter-VR button once the probe says immersive sessions work.
///
/// Runs until the button is either shown or known to be unavailable; both
/// outcomes are logged.
pub fn offer_enter_vr(
    support: Res<VrSupport>,
    queue: Res<XrSelectQueue>,
    mut button: ResMut<EnterVrButton>,
) {
    if *button != EnterVrButton::Pending || support.capability == VrCapability::Probing {
        return;
    }
    if support.capability != VrCapability::Supported {
        warn!(
            "Enter-VR button unavailable: {}",
            support.capability.status_text()
        );
        *button = EnterVrButton::Unavailable;
        return;
    }
    match show_enter_vr_button(queue.clone()) {
        Ok(()) => {
            info!("Enter-VR button shown");
            *button = EnterVrButton::Shown;
        }
        Err(err) => {
            error!("Enter-VR button unavailable: {}", err);
            *button = EnterVrButton::Unavailable;
        }
    }
}

/// Whether the host asked for the VR variant.
///
/// On the web this is a `vr` key in the page query string (`?vr`).
#[cfg(target_arch = "wasm32")]
pub fn vr_requested() -> bool {
    web_sys::window()
        .and_then(|window| window.location().search().ok())
        .map(|search| {
            search
                .trim_start_matches('?')
                .split('&')
                .any(|pair| pair == "vr" || pair.starts_with("vr="))
        })
        .unwrap_or(false)
}

#[cfg(target_arch = "wasm32")]
fn spawn_probe(probe: VrProbe) {
    wasm_bindgen_futures::spawn_local(async move {
        let capability = probe_webxr().await;
        probe.store(capability);
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_probe(probe: VrProbe) {
    probe.store(VrCapability::Unsupported);
}

#[cfg(not(target_arch = "wasm32"))]
fn show_enter_vr_button(_queue: XrSelectQueue) -> Result<(), String> {
    Err("no browser page to place it on".to_string())
}

#[cfg(target_arch = "wasm32")]
const ENTER_VR_STYLE: &str = "position:absolute;bottom:20px;left:calc(50% - 50px);width:100px;\
padding:12px 6px;border:1px solid #fff;border-radius:4px;background:rgba(0,0,0,0.1);\
color:#fff;font:normal 13px sans-serif;text-align:center;cursor:pointer;z-index:999";

#[cfg(target_arch = "wasm32")]
fn show_enter_vr_button(queue: XrSelectQueue) -> Result<(), String> {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or("no document")?;
    let body = document.body().ok_or("document has no body")?;
    let button = document
        .create_element("button")
        .map_err(|err| format!("{err:?}"))?;
    button.set_text_content(Some("ENTER VR"));
    button
        .set_attribute("style", ENTER_VR_STYLE)
        .map_err(|err| format!("{err:?}"))?;

    // The session must be requested inside the click handler itself.
    let on_click = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        request_vr_session(queue.clone());
    });
    button
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(|err| format!("{err:?}"))?;
    on_click.forget();

    body.append_child(&button)
        .map_err(|err| format!("{err:?}"))?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn request_vr_session(queue: XrSelectQueue) {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    let promise = web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))
        .and_then(|window| js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("xr")))
        .and_then(|xr| {
            let request = js_sys::Reflect::get(&xr, &JsValue::from_str("requestSession"))?
                .dyn_into::<js_sys::Function>()?;
            request
                .call1(&xr, &JsValue::from_str("immersive-vr"))?
                .dyn_into::<js_sys::Promise>()
        });
    let promise = match promise {
        Ok(promise) => promise,
        Err(err) => {
            warn!("Could not request a VR session: {:?}", err);
            return;
        }
    };

    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(session) => {
                info!("Immersive VR session started");
                if let Err(err) = listen_for_selects(&session, queue) {
                    warn!("VR session has no select events: {:?}", err);
                }
            }
            Err(err) => warn!("VR session request rejected: {:?}", err),
        }
    });
}

#[cfg(target_arch = "wasm32")]
fn listen_for_selects(
    session: &wasm_bindgen::JsValue,
    queue: XrSelectQueue,
) -> Result<(), wasm_bindgen::JsValue> {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};

    let target = session
        .dyn_ref::<web_sys::EventTarget>()
        .ok_or_else(|| JsValue::from_str("session is not an event target"))?;

    for (name, phase) in [("selectstart", SelectPhase::Start), ("selectend", SelectPhase::End)] {
        let queue = queue.clone();
        let listener = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let handedness = js_sys::Reflect::get(&event, &JsValue::from_str("inputSource"))
                .and_then(|source| js_sys::Reflect::get(&source, &JsValue::from_str("handedness")))
                .ok()
                .and_then(|handedness| handedness.as_string())
                .unwrap_or_default();
            queue.push(Hand::from_handedness(&handedness), phase);
        });
        target.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        listener.forget();
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
async fn probe_webxr() -> VrCapability {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    let Some(window) = web_sys::window() else {
        return VrCapability::Unsupported;
    };
    let navigator = window.navigator();
    let xr = match js_sys::Reflect::get(&navigator, &JsValue::from_str("xr")) {
        Ok(xr) if !xr.is_undefined() && !xr.is_null() => xr,
        _ => return VrCapability::Unsupported,
    };

    let promise = js_sys::Reflect::get(&xr, &JsValue::from_str("isSessionSupported"))
        .and_then(|function| function.dyn_into::<js_sys::Function>())
        .and_then(|function| function.call1(&xr, &JsValue::from_str("immersive-vr")))
        .and_then(|promise| promise.dyn_into::<js_sys::Promise>());
    let promise = match promise {
        Ok(promise) => promise,
        Err(err) => {
            warn!("WebXR probe could not start: {:?}", err);
            return VrCapability::Unsupported;
        }
    };

    match JsFuture::from(promise).await {
        Ok(supported) if supported.as_bool() == Some(true) => VrCapability::Supported,
        Ok(_) => VrCapability::NoHeadset,
        Err(err) => {
            warn!("WebXR probe failed: {:?}", err);
            VrCapability::Unsupported
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_result_is_taken_once() {
        let probe = VrProbe::default();
        assert_eq!(probe.take(), None);

        probe.store(VrCapability::NoHeadset);
        assert_eq!(probe.take(), Some(VrCapability::NoHeadset));
        assert_eq!(probe.take(), None);
    }

    #[test]
    fn test_select_queue_drains_in_order() {
        let queue = XrSelectQueue::default();
        queue.push(Hand::Left, SelectPhase::Start);
        queue.clone().push(Hand::Left, SelectPhase::End);

        assert_eq!(
            queue.drain(),
            vec![(Hand::Left, SelectPhase::Start), (Hand::Left, SelectPhase::End)]
        );
        assert!(queue.drain().is_empty());
    }

    fn offer_app(capability: VrCapability) -> App {
        let mut app = App::new();
        app.insert_resource(VrSupport { capability })
            .init_resource::<XrSelectQueue>()
            .init_resource::<EnterVrButton>()
            .add_systems(Update, offer_enter_vr);
        app
    }

    #[test]
    fn test_enter_vr_waits_for_probe() {
        let mut app = offer_app(VrCapability::Probing);
        app.update();
        assert_eq!(*app.world().resource::<EnterVrButton>(), EnterVrButton::Pending);
    }

    #[test]
    fn test_enter_vr_unavailable_without_headset() {
        let mut app = offer_app(VrCapability::NoHeadset);
        app.update();
        assert_eq!(
            *app.world().resource::<EnterVrButton>(),
            EnterVrButton::Unavailable
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_enter_vr_needs_a_page() {
        let mut app = offer_app(VrCapability::Supported);
        app.update();
        assert_eq!(
            *app.world().resource::<EnterVrButton>(),
            EnterVrButton::Unavailable
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_probe_reports_unsupported() {
        let probe = VrProbe::default();
        spawn_probe(probe.clone());
        assert_eq!(probe.take(), Some(VrCapability::Unsupported));
    }
}
