use crate::components::animated_header::AnimatedHeader;
use crate::components::bus_card::BusCard;
use crate::constants::BASE_PATH;
use crate::models::BusRoute;
use leptos::{component, view, CollectView, IntoView};
use std::rc::Rc;

/// Gallery page: the full catalogue as a grid of cards over the tiled
/// backdrop, with the link out to the big map.
#[component]
pub fn Gallery(routes: Rc<Vec<BusRoute>>) -> impl IntoView {
    let cards = routes
        .iter()
        .cloned()
        .map(|route| {
            view! {
                <div class="card-cell">
                    <BusCard route=route/>
                </div>
            }
        })
        .collect_view();

    view! {
        <div
            class="gallery-page"
            style="position:relative;min-height:100vh;width:100vw;overflow-x:hidden;\
                   padding:20px 0;"
        >
            <div
                class="gallery-backdrop"
                style=format!(
                    "position:fixed;inset:0;z-index:-10;background-repeat:repeat;\
                     background-size:400px;filter:grayscale(0.9) brightness(1.1);\
                     background-image:url({BASE_PATH}/images/background.jpg);"
                )
            ></div>
            <div
                class="gallery-panel"
                style="max-width:1280px;margin:0 auto;padding:16px 20px;\
                       background:rgba(255,255,255,0.9);border-radius:8px;"
            >
                <AnimatedHeader>"RUPERT'S BEST BUS WEBSITE EVER!"</AnimatedHeader>
                <a
                    class="big-map-link"
                    href=format!("{BASE_PATH}/maps")
                    style="display:inline-block;padding:8px 16px;margin-bottom:12px;\
                           background:#3b82f6;color:white;border-radius:4px;\
                           text-decoration:none;"
                >
                    "Go to Big Map"
                </a>
                <div
                    class="card-grid"
                    style="display:grid;gap:12px;\
                           grid-template-columns:repeat(auto-fill,minmax(320px,1fr));"
                >
                    {cards}
                </div>
            </div>
        </div>
    }
}
