use client::screens::{DocumentsView, SelectedFile};
use client::Notifications;
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{LdDownload, LdUpload};
use dioxus_free_icons::Icon;
use shared_types::{human_file_size, DocumentType, DownloadedFile};
use shared_ui::{
    use_toast, Badge, BadgeVariant, Button, ButtonVariant, Card, CardContent, CardDescription,
    CardHeader, CardTitle, DataTable, DataTableBody, DataTableCell, DataTableColumn,
    DataTableEmpty, DataTableHeader, DataTableRow, FileInput, FormSelect, Input, PageActions,
    PageHeader, PageSubtitle, PageTitle, SkeletonList, Textarea, ToastOptions,
};
use uuid::Uuid;

use crate::auth::use_auth;
use crate::format::{document_type_variant, format_date};
use crate::notices;

const ACCEPTED_FILES: &str = ".pdf,.doc,.docx,.xls,.xlsx,.csv,.txt,.png,.jpg,.jpeg";

/// Hand a decoded download to the browser as a file save.
fn save_file(file: &DownloadedFile) {
    let href = serde_json::Value::String(file.to_data_url());
    let name = serde_json::Value::String(file.filename.clone());
    document::eval(&format!(
        "const a = document.createElement('a'); a.href = {href}; a.download = {name}; \
         document.body.appendChild(a); a.click(); a.remove();"
    ));
}

#[component]
pub fn Documents() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut view = use_signal(DocumentsView::default);

    let mut reload = move || {
        view.write().loading = true;
        spawn(async move {
            let api = auth.api();
            let before = view.peek().clone();
            let mut next = before.clone();
            let mut pending = Notifications::default();
            next.load_families(&api, &mut pending).await;
            next.load(&api, &mut pending).await;
            view.with_mut(|v| v.merge(&before, next));
            notices::settle(auth, toast, &mut pending);
        });
    };

    use_hook(move || reload());

    let handle_file = move |evt: FormEvent| async move {
        let files = evt.files();
        let Some(f) = files.first() else {
            view.write().upload.file = None;
            return;
        };
        let name = f.name();
        let content_type = f.content_type().unwrap_or_default();
        match f.read_bytes().await {
            Ok(bytes) => {
                view.write().upload.file = Some(SelectedFile {
                    name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, file = %name, "could not read selected file");
                toast.error(format!("Could not read {name}"), ToastOptions::new());
            }
        }
    };

    let handle_upload = move |_| {
        view.write().uploading = true;
        spawn(async move {
            let api = auth.api();
            let before = view.peek().clone();
            let mut next = before.clone();
            let mut pending = Notifications::default();
            next.submit_upload(&api, &mut pending).await;
            view.with_mut(|v| v.merge(&before, next));
            notices::settle(auth, toast, &mut pending);
        });
    };

    let handle_download = move |id: Uuid| {
        spawn(async move {
            let api = auth.api();
            let mut pending = Notifications::default();
            let file = DocumentsView::download(&api, &mut pending, id).await;
            if let Some(file) = file {
                save_file(&file);
            }
            notices::settle(auth, toast, &mut pending);
        });
    };

    let state = view.read();
    let visible: Vec<_> = state.visible().into_iter().cloned().collect();
    let selected_name = state.upload.file.as_ref().map(|f| f.name.clone());
    let family_value = state
        .upload
        .family_id
        .map(|id| id.to_string())
        .unwrap_or_default();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./documents.css") }

        PageHeader {
            div {
                PageTitle { "Documents" }
                PageSubtitle { "Statements, contracts and reports shared with your families" }
            }
            PageActions {
                Button {
                    variant: ButtonVariant::Outline,
                    loading: state.loading,
                    loading_label: "Refreshing...",
                    onclick: move |_| reload(),
                    "Refresh"
                }
            }
        }

        Card {
            CardHeader {
                CardTitle { "Upload Document" }
                CardDescription { "Files are stored against the selected family." }
            }
            CardContent {
                div { class: "documents-upload",
                    FileInput {
                        label: "File",
                        accept: ACCEPTED_FILES,
                        selected: selected_name,
                        disabled: state.uploading,
                        onchange: handle_file,
                    }
                    FormSelect {
                        label: "Type",
                        value: state.upload.document_type.as_str().to_string(),
                        onchange: move |e: Event<FormData>| {
                            if let Some(kind) = DocumentType::parse(&e.value()) {
                                view.write().upload.document_type = kind;
                            }
                        },
                        for kind in DocumentType::ALL {
                            option { value: kind.as_str(), "{kind.label()}" }
                        }
                    }
                    FormSelect {
                        label: "Family",
                        value: family_value,
                        onchange: move |e: Event<FormData>| {
                            view.write().upload.family_id = Uuid::parse_str(&e.value()).ok();
                        },
                        if state.families.is_empty() {
                            option { value: "", "No families available" }
                        }
                        for family in state.families.iter() {
                            option { key: "{family.id}", value: "{family.id}", "{family.name}" }
                        }
                    }
                    Input {
                        label: "Tags",
                        placeholder: "tax, 2024",
                        value: state.upload.tags.clone(),
                        on_input: move |e: FormEvent| view.write().upload.tags = e.value(),
                    }
                    div { class: "documents-upload-wide",
                        Textarea {
                            label: "Description",
                            rows: 2,
                            value: state.upload.description.clone(),
                            on_input: move |e: FormEvent| view.write().upload.description = e.value(),
                        }
                    }
                    div { class: "documents-upload-actions",
                        Button {
                            loading: state.uploading,
                            loading_label: "Uploading...",
                            onclick: handle_upload,
                            Icon::<LdUpload> { icon: LdUpload, width: 16, height: 16 }
                            "Upload"
                        }
                    }
                }
            }
        }

        div { class: "documents-filters",
            Input {
                placeholder: "Search by name or description",
                value: state.search.clone(),
                on_input: move |e: FormEvent| view.write().search = e.value(),
            }
            FormSelect {
                value: state.type_filter.clone(),
                onchange: move |e: Event<FormData>| view.write().type_filter = e.value(),
                option { value: "", "All types" }
                for kind in DocumentType::ALL {
                    option { value: kind.as_str(), "{kind.label()}" }
                }
            }
        }

        if state.loading && state.documents.is_empty() {
            SkeletonList { rows: 5 }
        } else {
            DataTable {
                DataTableHeader {
                    DataTableColumn { "Name" }
                    DataTableColumn { "Type" }
                    DataTableColumn { "Size" }
                    DataTableColumn { "Uploaded" }
                    DataTableColumn { "Tags" }
                    DataTableColumn { "" }
                }
                DataTableBody {
                    if visible.is_empty() {
                        DataTableEmpty { columns: 6, message: "No documents match." }
                    }
                    for doc in visible {
                        DataTableRow { key: "{doc.id}",
                            DataTableCell {
                                div { class: "documents-name", "{doc.original_filename}" }
                                if let Some(description) = doc.description.clone() {
                                    div { class: "documents-description", "{description}" }
                                }
                            }
                            DataTableCell {
                                Badge { variant: document_type_variant(doc.document_type), "{doc.document_type.label()}" }
                            }
                            DataTableCell { "{human_file_size(doc.file_size)}" }
                            DataTableCell { "{format_date(doc.uploaded_at)}" }
                            DataTableCell {
                                div { class: "documents-tags",
                                    for tag in doc.tags.iter() {
                                        Badge { key: "{tag}", variant: BadgeVariant::Outline, "{tag}" }
                                    }
                                }
                            }
                            DataTableCell {
                                Button {
                                    variant: ButtonVariant::Ghost,
                                    onclick: move |_| handle_download(doc.id),
                                    Icon::<LdDownload> { icon: LdDownload, width: 16, height: 16 }
                                    "Download"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
