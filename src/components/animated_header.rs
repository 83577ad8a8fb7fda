use gloo_timers::future::TimeoutFuture;
use leptos::{component, spawn_local, view, Children, IntoView};
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

const STAR_COUNT: usize = 200;

/// Page title that rewards a click with a burst of star particles.
#[component]
pub fn AnimatedHeader(children: Children) -> impl IntoView {
    view! {
        <h1 class="fun-header" style="cursor:pointer;user-select:none;" on:click=star_burst>
            {children()}
        </h1>
    }
}

// Particles are plain DOM nodes appended to the body; each removes itself
// after its animation window so nothing accumulates.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn star_burst(ev: MouseEvent) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };

    let click_x = f64::from(ev.client_x());
    let click_y = f64::from(ev.client_y());

    for _ in 0..STAR_COUNT {
        let Ok(element) = document.create_element("div") else {
            continue;
        };
        element.set_class_name("star");
        let Ok(star) = element.dyn_into::<web_sys::HtmlElement>() else {
            continue;
        };

        let angle = js_sys::Math::random() * std::f64::consts::TAU;
        let distance = js_sys::Math::random() * 600.0 + 200.0;
        let tx = angle.cos() * distance;
        let ty = angle.sin() * distance;
        let size = js_sys::Math::random() * 30.0 + 5.0;
        let hue = js_sys::Math::random() * 360.0;
        let saturation = js_sys::Math::random() * 15.0 + 85.0;
        let lightness = js_sys::Math::random() * 45.0 + 35.0;

        let style = star.style();
        let _ = style.set_property("width", &format!("{size}px"));
        let _ = style.set_property("height", &format!("{size}px"));
        let _ = style.set_property(
            "background",
            &format!("hsl({hue}, {saturation}%, {lightness}%)"),
        );
        let _ = style.set_property("--tx", &format!("{tx}px"));
        let _ = style.set_property("--ty", &format!("{ty}px"));
        let _ = style.set_property("left", &format!("{click_x}px"));
        let _ = style.set_property("top", &format!("{click_y}px"));

        if body.append_child(&star).is_err() {
            continue;
        }

        let lifetime_ms = (950.0 + js_sys::Math::random() * 450.0) as u32;
        spawn_local(async move {
            TimeoutFuture::new(lifetime_ms).await;
            star.remove();
        });
    }
}
