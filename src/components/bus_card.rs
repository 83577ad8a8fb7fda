use crate::components::image_carousel::ImageCarousel;
use crate::constants::{DEFAULT_CARD_ZOOM, DEFAULT_CENTER};
use crate::geometry;
use crate::map::{MapViewport, MapWidget, OSM_TILES};
use crate::models::BusRoute;
use gloo_timers::future::TimeoutFuture;
use leptos::{
    component, create_effect, create_node_ref, create_signal, on_cleanup, spawn_local, view,
    IntoView, SignalGet, SignalSet, SignalUpdate,
};
use std::cell::RefCell;
use std::rc::Rc;

const MINI_MAP_FIT_PADDING_PX: f64 = 20.0;
const MINI_LINE_COLOR: &str = "blue";
const MINI_LINE_WEIGHT: f64 = 3.0;
const MINI_LINE_OPACITY: f64 = 0.7;

// The canvas is measured again once the card grid has settled its layout;
// the first effect run can see a container that is still resizing.
const LAYOUT_SETTLE_DELAY_MS: u32 = 100;

/// One gallery card: photo carousel, route details, ridden badge, and an
/// embedded mini map scoped to this route's geometry.
///
/// The mini map widget is acquired at most once per card and released in
/// `on_cleanup` — a card that changes geometry is a different card (keyed by
/// dataset id + service code), so unmount covers every teardown path.
#[component]
pub fn BusCard(route: BusRoute) -> impl IntoView {
    let canvas_ref = create_node_ref::<leptos::html::Canvas>();
    let widget: Rc<RefCell<Option<MapWidget>>> = Rc::new(RefCell::new(None));
    let geometry = Rc::new(route.geometry.clone());

    let (viewport, set_viewport) =
        create_signal(MapViewport::new(DEFAULT_CENTER, DEFAULT_CARD_ZOOM));
    let (redraw_epoch, set_redraw_epoch) = create_signal(0_u32);

    // Acquire the widget once the canvas exists. Geometry present: fit to its
    // bounds. Absent or unparseable: the default view stands.
    {
        let widget = Rc::clone(&widget);
        let geometry = Rc::clone(&geometry);
        create_effect(move |_| {
            let Some(canvas) = canvas_ref.get() else {
                return;
            };
            if widget.borrow().is_some() {
                return;
            }

            let canvas: &web_sys::HtmlCanvasElement = &canvas;
            let on_tiles = Rc::new(move || set_redraw_epoch.update(|epoch| *epoch += 1));
            match MapWidget::new(canvas.clone(), OSM_TILES, on_tiles) {
                Ok(map) => {
                    let size = map.sync_size();
                    if let Some(bounds) = geometry::geometry_bounds(&geometry) {
                        if size.0 > 0.0 && size.1 > 0.0 {
                            set_viewport.set(MapViewport::fitted_to(
                                bounds,
                                size,
                                MINI_MAP_FIT_PADDING_PX,
                            ));
                        }
                    }
                    *widget.borrow_mut() = Some(map);
                    set_redraw_epoch.update(|epoch| *epoch += 1);

                    let widget = Rc::clone(&widget);
                    let geometry = Rc::clone(&geometry);
                    spawn_local(async move {
                        TimeoutFuture::new(LAYOUT_SETTLE_DELAY_MS).await;
                        if let Some(map) = widget.borrow().as_ref() {
                            let size = map.sync_size();
                            if size.0 > 0.0 && size.1 > 0.0 {
                                if let Some(bounds) = geometry::geometry_bounds(&geometry) {
                                    let _ = set_viewport.try_set(MapViewport::fitted_to(
                                        bounds,
                                        size,
                                        MINI_MAP_FIT_PADDING_PX,
                                    ));
                                }
                            }
                        }
                        let _ = set_redraw_epoch.try_update(|epoch| *epoch += 1);
                    });
                }
                Err(err) => leptos::logging::warn!("Mini map unavailable: {err}"),
            }
        });
    }

    {
        let widget = Rc::clone(&widget);
        let geometry = Rc::clone(&geometry);
        create_effect(move |_| {
            let _ = redraw_epoch.get();
            let current_viewport = viewport.get();

            let mut borrow = widget.borrow_mut();
            let Some(map) = borrow.as_mut() else {
                return;
            };
            let size = map.sync_size();
            if size.0 <= 0.0 || size.1 <= 0.0 {
                return;
            }

            map.draw_basemap(current_viewport, size);
            map.draw_polyline(
                current_viewport,
                size,
                &geometry,
                MINI_LINE_COLOR,
                MINI_LINE_WEIGHT,
                MINI_LINE_OPACITY,
            );
        });
    }

    {
        let widget = Rc::clone(&widget);
        on_cleanup(move || {
            if let Some(map) = widget.borrow_mut().take() {
                map.release();
            }
        });
    }

    let badge = route.ridden.then(|| {
        let text = match route.ride_count {
            Some(count) => format!("Ridden \u{d7}{count}"),
            None => "Ridden".to_string(),
        };
        view! {
            <span
                class="ridden-badge"
                style="background:#16a34a;color:white;font-size:12px;border-radius:9999px;\
                       padding:2px 8px;margin-left:8px;vertical-align:middle;"
            >
                {text}
            </span>
        }
    });

    let carousel = (!route.images.is_empty()).then(|| {
        view! {
            <ImageCarousel
                images=route.images.clone()
                alt=format!("Bus {} (Dataset {})", route.bus_number, route.dataset_id)
            />
        }
    });

    view! {
        <div
            class="bus-card"
            style="max-width:345px;margin:8px;background:white;border-radius:8px;\
                   box-shadow:0 1px 4px rgba(0,0,0,0.2);overflow:hidden;"
        >
            {carousel}
            <div class="bus-card-body" style="padding:16px;">
                <h2 style="font-size:20px;font-weight:500;margin:0 0 8px 0;">
                    "Bus " {route.bus_number.clone()} {badge}
                </h2>
                <p style="color:#4b5563;font-size:14px;margin:0;">
                    {route.operator_name.clone()} " (Dataset " {route.dataset_id.clone()} ")"
                </p>
                <p style="color:#4b5563;font-size:14px;margin:0;">
                    {route.line_name.clone()} " (" {route.service_code.clone()} ")"
                </p>
                <div
                    class="mini-map"
                    style="height:200px;width:100%;margin-top:16px;border-radius:4px;\
                           position:relative;z-index:0;"
                >
                    <canvas node_ref=canvas_ref style="width:100%;height:100%;display:block;"/>
                </div>
            </div>
        </div>
    }
}
