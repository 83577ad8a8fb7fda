use crate::constants::BASE_PATH;
use leptos::{
    component, create_signal, view, CollectView, IntoView, SignalGet, SignalSet, SignalUpdate,
};

/// Cycling photo strip for a card. Forward/back wrap around; the dots jump
/// straight to a photo. An image that fails to load hides itself and stays
/// hidden — there is no retry.
#[component]
pub fn ImageCarousel(images: Vec<String>, alt: String) -> impl IntoView {
    let count = images.len();
    let (current, set_current) = create_signal(0_usize);

    let slides = images
        .into_iter()
        .enumerate()
        .map(|(index, path)| {
            let (hidden, set_hidden) = create_signal(false);
            let src = format!("{BASE_PATH}/{path}");
            let alt = alt.clone();
            view! {
                <img
                    src=src
                    alt=alt
                    class="card-photo"
                    style=move || {
                        if current.get() == index && !hidden.get() {
                            "width:100%;height:240px;object-fit:cover;display:block;"
                        } else {
                            "display:none;"
                        }
                    }
                    on:error=move |_| set_hidden.set(true)
                />
            }
        })
        .collect_view();

    let controls = (count > 1).then(|| {
        let dots = (0..count)
            .map(|index| {
                view! {
                    <span
                        class=move || {
                            if current.get() == index {
                                "carousel-dot active"
                            } else {
                                "carousel-dot"
                            }
                        }
                        style=move || {
                            let color = if current.get() == index { "#fff" } else { "#ffffff80" };
                            format!(
                                "width:8px;height:8px;border-radius:50%;cursor:pointer;\
                                 display:inline-block;background:{color};"
                            )
                        }
                        on:click=move |_| set_current.set(index)
                    ></span>
                }
            })
            .collect_view();

        view! {
            <div
                class="carousel-controls"
                style="position:absolute;bottom:8px;left:0;right:0;display:flex;\
                       align-items:center;justify-content:center;gap:8px;z-index:1;"
            >
                <button
                    class="carousel-arrow"
                    on:click=move |_| set_current.update(|i| *i = (*i + count - 1) % count)
                >
                    "\u{2039}"
                </button>
                <div class="carousel-dots" style="display:flex;gap:6px;">{dots}</div>
                <button
                    class="carousel-arrow"
                    on:click=move |_| set_current.update(|i| *i = (*i + 1) % count)
                >
                    "\u{203a}"
                </button>
            </div>
        }
    });

    view! {
        <div class="image-carousel" style="position:relative;">
            {slides}
            {controls}
        </div>
    }
}
