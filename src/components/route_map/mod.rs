pub mod hit_detection;
pub mod renderer;

use crate::constants::{route_color, DEFAULT_CENTER, DEFAULT_MAP_ZOOM, FIT_BOUNDS_PADDING_PX};
use crate::geometry::{self, Bounds, LatLng, LineString};
use crate::map::{MapViewport, MapWidget, CARTO_LIGHT_TILES};
use crate::models::{BusRoute, FilterMode};
use leptos::{
    component, create_effect, create_memo, create_node_ref, create_signal, on_cleanup, view,
    CollectView, IntoView, Memo, ReadSignal, SignalGet, SignalGetUntracked, SignalSet,
    SignalUpdate, WriteSignal,
};
use leptos_use::{use_document, use_event_listener};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::{MouseEvent, WheelEvent};

/// Pointer interaction state of the map. One writer (the event handlers),
/// reset unconditionally on the global mouseup.
#[derive(Clone, Copy)]
struct InteractionSignals {
    hovered: ReadSignal<Option<usize>>,
    set_hovered: WriteSignal<Option<usize>>,
    dragging: ReadSignal<Option<usize>>,
    set_dragging: WriteSignal<Option<usize>>,
    is_panning: ReadSignal<bool>,
    set_is_panning: WriteSignal<bool>,
    last_mouse: ReadSignal<(f64, f64)>,
    set_last_mouse: WriteSignal<(f64, f64)>,
    set_popup: WriteSignal<Option<(usize, (f64, f64))>>,
}

fn union_bounds(routes: &[BusRoute], indices: &[usize]) -> Option<Bounds> {
    indices
        .iter()
        .filter_map(|&i| geometry::geometry_bounds(&routes[i].geometry))
        .reduce(Bounds::union)
}

fn label_seed_positions(routes: &[BusRoute], indices: &[usize]) -> Vec<Option<LatLng>> {
    indices
        .iter()
        .map(|&i| geometry::line_midpoint(&routes[i].geometry))
        .collect()
}

fn event_position(
    canvas_ref: leptos::NodeRef<leptos::html::Canvas>,
    ev: &MouseEvent,
) -> Option<(f64, f64)> {
    let canvas = canvas_ref.get()?;
    let canvas: &web_sys::HtmlCanvasElement = &canvas;
    let rect = canvas.get_bounding_client_rect();
    Some((
        f64::from(ev.client_x()) - rect.left(),
        f64::from(ev.client_y()) - rect.top(),
    ))
}

#[allow(clippy::too_many_arguments)]
fn handle_hover_detection(
    x: f64,
    y: f64,
    routes: &[BusRoute],
    indices: &[usize],
    viewport: MapViewport,
    container: (f64, f64),
    interaction: &InteractionSignals,
) {
    let geometries: Vec<&[LineString]> = indices
        .iter()
        .map(|&i| routes[i].geometry.as_slice())
        .collect();

    let hit = hit_detection::find_route_at_position(
        &geometries,
        |point| viewport.latlng_to_screen(container, point),
        x,
        y,
        hit_detection::ROUTE_HOVER_THRESHOLD,
    );

    match hit {
        Some(pos) => {
            if interaction.hovered.get() != Some(pos) {
                interaction.set_hovered.set(Some(pos));
            }
            // The popup follows the pointer along the line.
            interaction.set_popup.set(Some((pos, (x, y))));
        }
        None => {
            if interaction.hovered.get().is_some() {
                interaction.set_hovered.set(None);
                interaction.set_popup.set(None);
            }
        }
    }
}

/// Full-screen interactive map: all visible routes as colored polylines, a
/// draggable label per route, hover popups, pan and wheel zoom.
#[component]
pub fn RouteMap(
    routes: Rc<Vec<BusRoute>>,
    filter_mode: ReadSignal<FilterMode>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<leptos::html::Canvas>();
    let widget: Rc<RefCell<Option<MapWidget>>> = Rc::new(RefCell::new(None));

    let (viewport, set_viewport) =
        create_signal(MapViewport::new(DEFAULT_CENTER, DEFAULT_MAP_ZOOM));
    let (container, set_container) = create_signal((0.0_f64, 0.0_f64));
    let (redraw_epoch, set_redraw_epoch) = create_signal(0_u32);
    let (label_positions, set_label_positions) = create_signal(Vec::<Option<LatLng>>::new());
    let (popup, set_popup) = create_signal(None::<(usize, (f64, f64))>);

    let (hovered, set_hovered) = create_signal(None::<usize>);
    let (dragging, set_dragging) = create_signal(None::<usize>);
    let (is_panning, set_is_panning) = create_signal(false);
    let (last_mouse, set_last_mouse) = create_signal((0.0_f64, 0.0_f64));

    let interaction = InteractionSignals {
        hovered,
        set_hovered,
        dragging,
        set_dragging,
        is_panning,
        set_is_panning,
        last_mouse,
        set_last_mouse,
        set_popup,
    };

    // Post-filter view of the catalogue; the catalogue itself never changes.
    let visible: Memo<Vec<usize>> = {
        let routes = Rc::clone(&routes);
        create_memo(move |_| {
            let mode = filter_mode.get();
            routes
                .iter()
                .enumerate()
                .filter(|(_, route)| mode.matches(route))
                .map(|(index, _)| index)
                .collect()
        })
    };

    // Acquire the map widget once the canvas is in the DOM. Released in
    // on_cleanup below; the tile cache lives exactly as long as this
    // component.
    {
        let widget = Rc::clone(&widget);
        let routes = Rc::clone(&routes);
        create_effect(move |_| {
            let Some(canvas) = canvas_ref.get() else {
                return;
            };
            if widget.borrow().is_some() {
                return;
            }

            let canvas: &web_sys::HtmlCanvasElement = &canvas;
            let on_tiles = Rc::new(move || set_redraw_epoch.update(|epoch| *epoch += 1));
            match MapWidget::new(canvas.clone(), CARTO_LIGHT_TILES, on_tiles) {
                Ok(map) => {
                    // Initial fit to everything currently visible.
                    let size = map.sync_size();
                    if let Some(bounds) =
                        union_bounds(&routes, &visible.get_untracked())
                    {
                        if size.0 > 0.0 && size.1 > 0.0 {
                            set_viewport.set(MapViewport::fitted_to(
                                bounds,
                                size,
                                FIT_BOUNDS_PADDING_PX,
                            ));
                        }
                    }
                    *widget.borrow_mut() = Some(map);
                    set_redraw_epoch.update(|epoch| *epoch += 1);
                }
                Err(err) => leptos::logging::warn!("Map canvas unavailable: {err}"),
            }
        });
    }

    // Re-filtering: reset interaction state, reseed labels, refit the view to
    // the union of what is now visible (or leave it alone when nothing is).
    // Polylines and labels are rebuilt from scratch; the widget and its tile
    // cache stay.
    {
        let widget = Rc::clone(&widget);
        let routes = Rc::clone(&routes);
        create_effect(move |_| {
            let indices = visible.get();

            set_hovered.set(None);
            set_dragging.set(None);
            set_popup.set(None);
            set_label_positions.set(label_seed_positions(&routes, &indices));

            for &i in &indices {
                if routes[i].geometry.is_empty() {
                    leptos::logging::warn!(
                        "Route {} ({}) has no usable geometry, skipping",
                        routes[i].bus_number,
                        routes[i].service_code
                    );
                }
            }

            if let Some(bounds) = union_bounds(&routes, &indices) {
                if let Some(map) = widget.borrow().as_ref() {
                    let size = map.container_size();
                    if size.0 > 0.0 && size.1 > 0.0 {
                        set_viewport.set(MapViewport::fitted_to(
                            bounds,
                            size,
                            FIT_BOUNDS_PADDING_PX,
                        ));
                    }
                }
            }
        });
    }

    // Render effect: anything visual changed -> full canvas redraw.
    {
        let widget = Rc::clone(&widget);
        let routes = Rc::clone(&routes);
        create_effect(move |_| {
            let _ = redraw_epoch.get();
            let current_viewport = viewport.get();
            let indices = visible.get();
            let highlight = dragging.get().or_else(|| hovered.get());

            let mut borrow = widget.borrow_mut();
            let Some(map) = borrow.as_mut() else {
                return;
            };
            let size = map.sync_size();
            if size.0 <= 0.0 || size.1 <= 0.0 {
                return;
            }
            if container.get_untracked() != size {
                set_container.set(size);
            }

            let display: Vec<(&BusRoute, &'static str)> = indices
                .iter()
                .enumerate()
                .map(|(pos, &i)| (&routes[i], route_color(pos)))
                .collect();
            renderer::draw_map(map, current_viewport, size, &display, highlight);
        });
    }

    let handle_mouse_down = move |ev: MouseEvent| {
        if interaction.dragging.get().is_some() {
            return;
        }
        let Some((x, y)) = event_position(canvas_ref, &ev) else {
            return;
        };
        interaction.set_is_panning.set(true);
        interaction.set_last_mouse.set((x, y));
    };

    let handle_mouse_move = {
        let routes = Rc::clone(&routes);
        move |ev: MouseEvent| {
            let Some((x, y)) = event_position(canvas_ref, &ev) else {
                return;
            };
            let current_viewport = viewport.get();
            let size = container.get();

            if let Some(drag_pos) = interaction.dragging.get() {
                // The label is a slider along its route: snap to the nearest
                // point of the active geometry.
                let indices = visible.get();
                let Some(&route_index) = indices.get(drag_pos) else {
                    return;
                };
                let pointer = current_viewport.screen_to_latlng(size, (x, y));
                if let Some(nearest) = geometry::nearest_point_on_polyline(
                    pointer,
                    &routes[route_index].geometry,
                ) {
                    set_label_positions.update(|positions| {
                        if let Some(slot) = positions.get_mut(drag_pos) {
                            *slot = Some(nearest);
                        }
                    });
                }
            } else if interaction.is_panning.get() {
                let (last_x, last_y) = interaction.last_mouse.get();
                set_viewport.set(current_viewport.panned_by(x - last_x, y - last_y));
                interaction.set_last_mouse.set((x, y));
            } else {
                handle_hover_detection(
                    x,
                    y,
                    &routes,
                    &visible.get(),
                    current_viewport,
                    size,
                    &interaction,
                );
            }
        }
    };

    let handle_mouse_leave = move |_ev: MouseEvent| {
        interaction.set_is_panning.set(false);
        if interaction.dragging.get().is_none() {
            interaction.set_hovered.set(None);
            interaction.set_popup.set(None);
        }
    };

    let handle_wheel = move |ev: WheelEvent| {
        ev.prevent_default();
        let Some((x, y)) = event_position(canvas_ref, &ev) else {
            return;
        };
        let step: i8 = if ev.delta_y() < 0.0 { 1 } else { -1 };
        set_viewport.set(viewport.get().zoomed_around(step, (x, y), container.get()));
    };

    // Drag state is cleared wherever the pointer is released, even outside
    // the map container.
    let _ = use_event_listener(use_document(), leptos::ev::mouseup, move |_| {
        interaction.set_is_panning.set(false);
        interaction.set_dragging.set(None);
    });

    {
        let widget = Rc::clone(&widget);
        on_cleanup(move || {
            if let Some(map) = widget.borrow_mut().take() {
                map.release();
            }
        });
    }

    let labels = {
        let routes = Rc::clone(&routes);
        move || {
            let indices = visible.get();
            let positions = label_positions.get();
            let current_viewport = viewport.get();
            let size = container.get();

            indices
                .iter()
                .enumerate()
                .filter_map(|(pos, &route_index)| {
                    let latlng = positions.get(pos).copied().flatten()?;
                    let (x, y) = current_viewport.latlng_to_screen(size, latlng);
                    let color = route_color(pos);
                    let number = routes[route_index].bus_number.clone();
                    Some(view! {
                        <div
                            class="bus-label"
                            style=format!(
                                "position:absolute;left:{x}px;top:{y}px;\
                                 transform:translate(-15px,-15px);background-color:{color};\
                                 color:white;padding:5px 8px;border-radius:3px;\
                                 white-space:nowrap;display:inline-block;font-size:14px;\
                                 box-shadow:0 2px 4px rgba(0,0,0,0.2);z-index:1000;cursor:move;"
                            )
                            on:mousedown=move |ev: MouseEvent| {
                                ev.stop_propagation();
                                ev.prevent_default();
                                interaction.set_popup.set(None);
                                interaction.set_dragging.set(Some(pos));
                            }
                            on:mouseover=|ev: MouseEvent| ev.stop_propagation()
                        >
                            {number}
                        </div>
                    })
                })
                .collect_view()
        }
    };

    let popup_view = {
        let routes = Rc::clone(&routes);
        move || {
            let (pos, (x, y)) = popup.get()?;
            let indices = visible.get();
            let &route_index = indices.get(pos)?;
            let route = &routes[route_index];
            let color = route_color(pos);

            let cell = |value: &str| {
                if value.is_empty() {
                    "N/A".to_string()
                } else {
                    value.to_string()
                }
            };

            Some(view! {
                <div
                    class="route-popup"
                    style=format!(
                        "position:absolute;left:{x}px;top:{}px;\
                         transform:translate(-50%,-100%);pointer-events:none;\
                         background:white;border-radius:4px;\
                         box-shadow:0 2px 8px rgba(0,0,0,0.3);\
                         font-family:Arial,sans-serif;padding:5px;z-index:1100;",
                        y - 10.0
                    )
                >
                    <h3 style=format!("margin:0 0 8px 0;color:{color};")>
                        "Route " {route.bus_number.clone()}
                    </h3>
                    <table style="border-spacing:4px;">
                        <tr>
                            <td><strong>"Line Name:"</strong></td>
                            <td>{cell(&route.line_name)}</td>
                        </tr>
                        <tr>
                            <td><strong>"Operator:"</strong></td>
                            <td>{cell(&route.operator_name)}</td>
                        </tr>
                        <tr>
                            <td><strong>"Service Code:"</strong></td>
                            <td>{cell(&route.service_code)}</td>
                        </tr>
                        <tr>
                            <td><strong>"Dataset ID:"</strong></td>
                            <td>{cell(&route.dataset_id)}</td>
                        </tr>
                    </table>
                </div>
            })
        }
    };

    let cursor_style = move || {
        if is_panning.get() || dragging.get().is_some() {
            "width:100%;height:100%;display:block;cursor:grabbing;"
        } else if hovered.get().is_some() {
            "width:100%;height:100%;display:block;cursor:pointer;"
        } else {
            "width:100%;height:100%;display:block;cursor:grab;"
        }
    };

    view! {
        <div
            class="route-map"
            style="position:relative;width:100%;height:100%;overflow:hidden;"
        >
            <canvas
                node_ref=canvas_ref
                class="route-map-canvas"
                style=cursor_style
                on:mousedown=handle_mouse_down
                on:mousemove=handle_mouse_move
                on:mouseleave=handle_mouse_leave
                on:wheel=handle_wheel
                on:contextmenu=|ev| ev.prevent_default()
            />
            {labels}
            {popup_view}
        </div>
    }
}
