use chrono::Utc;
use client::screens::DashboardView;
use client::Notifications;
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{LdCalendar, LdFileText, LdMessageSquare, LdUsers};
use dioxus_free_icons::Icon;
use shared_types::DashboardSummary;
use shared_ui::{
    use_toast, Badge, Button, ButtonVariant, Card, CardContent, CardHeader, CardTitle,
    PageActions, PageHeader, PageSubtitle, PageTitle, SkeletonList, StatCard, StatGrid,
};

use crate::auth::use_auth;
use crate::format::{
    document_type_variant, format_date, format_datetime, meeting_status_variant, preview,
    short_id,
};
use crate::notices;

#[component]
pub fn Dashboard() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut view = use_signal(DashboardView::default);

    let mut reload = move || {
        view.write().loading = true;
        spawn(async move {
            let api = auth.api();
            let mut next = view.peek().clone();
            let mut pending = Notifications::default();
            // The failure is already a notice.
            let _ = next.load(&api, &mut pending, Utc::now()).await;
            view.set(next);
            notices::settle(auth, toast, &mut pending);
        });
    };

    use_hook(move || reload());

    let greeting = auth
        .current_user()
        .map(|u| format!("Welcome back, {} ({})", u.first_name, u.role.label()))
        .unwrap_or_default();
    let state = view.read().clone();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./dashboard.css") }

        PageHeader {
            div {
                PageTitle { "Dashboard" }
                PageSubtitle { "{greeting}" }
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

        if let Some(summary) = state.summary {
            DashboardBody { summary }
        } else if state.loading {
            SkeletonList { rows: 6 }
        } else {
            p { class: "dashboard-empty", "Dashboard data is unavailable right now." }
        }
    }
}

#[component]
fn DashboardBody(summary: DashboardSummary) -> Element {
    rsx! {
        StatGrid {
            StatCard {
                label: "Families",
                value: "{summary.family_count}",
                icon: rsx! { Icon::<LdUsers> { icon: LdUsers, width: 18, height: 18 } },
            }
            StatCard {
                label: "Documents",
                value: "{summary.document_count}",
                icon: rsx! { Icon::<LdFileText> { icon: LdFileText, width: 18, height: 18 } },
            }
            StatCard {
                label: "Meetings",
                value: "{summary.meeting_count}",
                caption: format!("{} upcoming", summary.upcoming_meeting_count),
                icon: rsx! { Icon::<LdCalendar> { icon: LdCalendar, width: 18, height: 18 } },
            }
            StatCard {
                label: "Messages",
                value: "{summary.message_count}",
                icon: rsx! { Icon::<LdMessageSquare> { icon: LdMessageSquare, width: 18, height: 18 } },
            }
        }

        div { class: "dashboard-grid",
            Card {
                CardHeader { CardTitle { "Recent Documents" } }
                CardContent {
                    if summary.recent_documents.is_empty() {
                        p { class: "dashboard-none", "No documents yet." }
                    }
                    ul { class: "dashboard-list",
                        for doc in summary.recent_documents.iter() {
                            li { key: "{doc.id}",
                                span { class: "dashboard-item-title", "{doc.original_filename}" }
                                Badge { variant: document_type_variant(doc.document_type), "{doc.document_type.label()}" }
                                span { class: "dashboard-item-meta", "{format_date(doc.uploaded_at)}" }
                            }
                        }
                    }
                }
            }

            Card {
                CardHeader { CardTitle { "Meetings" } }
                CardContent {
                    if summary.recent_meetings.is_empty() {
                        p { class: "dashboard-none", "No meetings scheduled." }
                    }
                    ul { class: "dashboard-list",
                        for meeting in summary.recent_meetings.iter() {
                            li { key: "{meeting.id}",
                                span { class: "dashboard-item-title", "{meeting.title}" }
                                Badge { variant: meeting_status_variant(meeting.status), "{meeting.status.label()}" }
                                span { class: "dashboard-item-meta", "{format_datetime(meeting.start_time)}" }
                            }
                        }
                    }
                }
            }

            Card {
                CardHeader { CardTitle { "Recent Messages" } }
                CardContent {
                    if summary.recent_messages.is_empty() {
                        p { class: "dashboard-none", "No messages yet." }
                    }
                    ul { class: "dashboard-list",
                        for message in summary.recent_messages.iter() {
                            li { key: "{message.id}",
                                span { class: "dashboard-item-title", "{preview(&message.content, 60)}" }
                                span { class: "dashboard-item-meta",
                                    "from {short_id(message.sender_id)} · {format_datetime(message.created_at)}"
                                }
                            }
                        }
                    }
                }
            }

            Card {
                CardHeader { CardTitle { "Families" } }
                CardContent {
                    if summary.recent_families.is_empty() {
                        p { class: "dashboard-none", "No families in scope." }
                    }
                    ul { class: "dashboard-list",
                        for family in summary.recent_families.iter() {
                            li { key: "{family.id}",
                                span { class: "dashboard-item-title", "{family.name}" }
                                span { class: "dashboard-item-meta", "since {format_date(family.created_at)}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
