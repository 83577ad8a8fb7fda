use crate::components::route_map::RouteMap;
use crate::constants::BASE_PATH;
use crate::models::{BusRoute, FilterMode};
use leptos::{component, create_signal, view, CollectView, IntoView, SignalGet, SignalSet};
use std::rc::Rc;

/// Full-screen map page: the three-way filter toolbar plus the interactive
/// map. The filter state lives here and only ever changes through the
/// buttons; the map receives it as a read signal.
#[component]
pub fn MapPage(routes: Rc<Vec<BusRoute>>) -> impl IntoView {
    let (filter_mode, set_filter_mode) = create_signal(FilterMode::default());

    view! {
        <div
            class="map-page"
            style="position:absolute;top:0;left:0;width:100vw;height:100vh;margin:0;padding:0;"
        >
            <div
                class="map-toolbar"
                style="position:absolute;top:10px;left:50%;transform:translateX(-50%);\
                       z-index:1200;display:flex;gap:8px;"
            >
                <a class="toolbar-button" href=BASE_PATH>"Back to Gallery"</a>
                {FilterMode::ALL_MODES
                    .iter()
                    .copied()
                    .map(|mode| {
                        view! {
                            <button
                                class=move || {
                                    if filter_mode.get() == mode {
                                        "toolbar-button active"
                                    } else {
                                        "toolbar-button"
                                    }
                                }
                                on:click=move |_| set_filter_mode.set(mode)
                            >
                                {mode.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <RouteMap routes=routes filter_mode=filter_mode/>
        </div>
    }
}
