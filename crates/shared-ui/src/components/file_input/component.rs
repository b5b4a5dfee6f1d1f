use dioxus::prelude::*;

/// Single-file picker. The caller reads the file from the change event.
#[component]
pub fn FileInput(
    #[props(default)] label: String,
    /// Comma-separated extensions or MIME types.
    #[props(default)]
    accept: String,
    /// Name of the chosen file, shown under the picker.
    #[props(default)]
    selected: Option<String>,
    #[props(default = false)] disabled: bool,
    onchange: EventHandler<FormEvent>,
) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "file-input",
            if !label.is_empty() {
                label { class: "file-input-label", "{label}" }
            }
            input {
                r#type: "file",
                accept,
                multiple: false,
                disabled,
                onchange: move |evt| onchange.call(evt),
            }
            if let Some(name) = selected {
                span { class: "file-input-selected", "{name}" }
            } else {
                span { class: "file-input-hint", "No file selected" }
            }
        }
    }
}
