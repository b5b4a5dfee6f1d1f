use dioxus::prelude::*;

/// Dashboard tile: a count with a caption and an optional icon.
#[component]
pub fn StatCard(
    label: String,
    value: String,
    #[props(default)] caption: Option<String>,
    #[props(default)] icon: Option<Element>,
) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "stat-card",
            div { class: "stat-card-top",
                span { class: "stat-card-label", "{label}" }
                if let Some(icon) = icon {
                    span { class: "stat-card-icon", {icon} }
                }
            }
            span { class: "stat-card-value", "{value}" }
            if let Some(caption) = caption {
                span { class: "stat-card-caption", "{caption}" }
            }
        }
    }
}

/// Responsive grid for `StatCard`s.
#[component]
pub fn StatGrid(children: Element) -> Element {
    rsx! {
        div { class: "stat-grid", {children} }
    }
}
