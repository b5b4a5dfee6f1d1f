use dioxus::prelude::*;
use shared_ui::{Button, ButtonVariant};

use crate::routes::Route;

#[component]
pub fn NotFound(route: Vec<String>) -> Element {
    let path = format!("/{}", route.join("/"));
    rsx! {
        div { class: "not-found",
            h1 { "Page not found" }
            p { "Nothing lives at {path}." }
            Link { to: Route::Dashboard {},
                Button { variant: ButtonVariant::Outline, "Back to dashboard" }
            }
        }
    }
}
