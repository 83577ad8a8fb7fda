use crate::components::gallery::Gallery;
use crate::components::map_page::MapPage;
use crate::constants::BASE_PATH;
use crate::data;
use leptos::{component, view, IntoView};
use leptos_meta::{provide_meta_context, Stylesheet, Title};
use leptos_router::{Route, Router, Routes};
use std::rc::Rc;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // One-time load. The catalogue is immutable for the session and handed
    // to each page by ownership — no ambient lookup.
    let catalogue = Rc::new(data::load_catalogue());
    let gallery_routes = Rc::clone(&catalogue);
    let map_routes = catalogue;

    view! {
        <Stylesheet id="leptos" href=format!("{BASE_PATH}/pkg/bus_atlas.css")/>
        <Title text="Rupert's Best Bus Website Ever"/>

        <Router>
            <Routes>
                <Route
                    path=format!("{BASE_PATH}/maps")
                    view=move || view! { <MapPage routes=Rc::clone(&map_routes)/> }
                />
                <Route
                    path=BASE_PATH
                    view=move || view! { <Gallery routes=Rc::clone(&gallery_routes)/> }
                />
            </Routes>
        </Router>
    }
}
