use chrono::{Duration, DurationRound, Utc};
use client::screens::{local_input_value, MeetingsView};
use client::{Notifications, PortalApi};
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{LdCalendarPlus, LdExternalLink};
use dioxus_free_icons::Icon;
use shared_types::{Family, Meeting};
use shared_ui::{
    use_toast, Badge, Button, ButtonVariant, Card, CardContent, CardDescription, CardHeader,
    CardTitle, DataTable, DataTableBody, DataTableCell, DataTableColumn, DataTableEmpty,
    DataTableHeader, DataTableRow, FormSelect, Input, PageActions, PageHeader, PageSubtitle,
    PageTitle, SkeletonList, Textarea,
};
use uuid::Uuid;

use crate::auth::use_auth;
use crate::format::{format_datetime, meeting_status_variant, short_id};
use crate::notices;

#[component]
pub fn Meetings() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut view = use_signal(MeetingsView::default);
    let mut families = use_signal(Vec::<Family>::new);

    // Form times are typed in the browser's zone.
    use_hook(move || {
        spawn(async move {
            match document::eval("return -new Date().getTimezoneOffset();")
                .join::<i32>()
                .await
            {
                Ok(minutes) => view.write().form.utc_offset_minutes = minutes,
                Err(e) => tracing::warn!(error = ?e, "could not read browser time zone"),
            }
        });
    });

    let mut reload = move || {
        view.write().loading = true;
        spawn(async move {
            let api = auth.api();
            let before = view.peek().clone();
            let mut next = before.clone();
            let mut pending = Notifications::default();
            match api.list_families().await {
                Ok(list) => {
                    if next.form.family_id.is_none() {
                        next.form.family_id = list.first().map(|f| f.id);
                    }
                    families.set(list);
                }
                Err(err) => pending.failure("Failed to load families", &err),
            }
            if next.form.advisor_id.is_empty() {
                if let Some(user) = auth.current_user() {
                    next.form.advisor_id = user.id.to_string();
                }
            }
            next.load(&api, &mut pending).await;
            view.with_mut(|v| v.merge(&before, next));
            notices::settle(auth, toast, &mut pending);
        });
    };

    use_hook(move || reload());

    let toggle_form = move |_| {
        let mut state = view.write();
        state.show_form = !state.show_form;
        if state.show_form && state.form.start.is_empty() {
            // Next full hour, one hour long.
            let start = Utc::now()
                .duration_trunc(Duration::hours(1))
                .map(|t| t + Duration::hours(1))
                .unwrap_or_else(|_| Utc::now());
            let offset = state.form.offset();
            state.form.start = local_input_value(start, offset);
            state.form.end = local_input_value(start + Duration::hours(1), offset);
        }
    };

    let handle_schedule = move |_| {
        view.write().scheduling = true;
        spawn(async move {
            let api = auth.api();
            let before = view.peek().clone();
            let mut next = before.clone();
            let mut pending = Notifications::default();
            next.schedule(&api, &mut pending).await;
            view.with_mut(|v| v.merge(&before, next));
            notices::settle(auth, toast, &mut pending);
        });
    };

    let state = view.read();
    let partition = state.partition(Utc::now());
    let family_value = state
        .form
        .family_id
        .map(|id| id.to_string())
        .unwrap_or_default();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./meetings.css") }

        PageHeader {
            div {
                PageTitle { "Meetings" }
                PageSubtitle { "Reviews and planning sessions with your advisors" }
            }
            PageActions {
                Button {
                    variant: ButtonVariant::Outline,
                    loading: state.loading,
                    loading_label: "Refreshing...",
                    onclick: move |_| reload(),
                    "Refresh"
                }
                Button {
                    variant: if state.show_form { ButtonVariant::Secondary } else { ButtonVariant::Primary },
                    onclick: toggle_form,
                    Icon::<LdCalendarPlus> { icon: LdCalendarPlus, width: 16, height: 16 }
                    if state.show_form { "Close" } else { "Schedule Meeting" }
                }
            }
        }

        if state.show_form {
            Card {
                CardHeader {
                    CardTitle { "Schedule Meeting" }
                    CardDescription { "Times are entered in your local time zone." }
                }
                CardContent {
                    div { class: "meetings-form",
                        div { class: "meetings-form-wide",
                            Input {
                                label: "Title",
                                required: true,
                                value: state.form.title.clone(),
                                on_input: move |e: FormEvent| view.write().form.title = e.value(),
                            }
                        }
                        Input {
                            label: "Start",
                            input_type: "datetime-local",
                            value: state.form.start.clone(),
                            on_input: move |e: FormEvent| view.write().form.start = e.value(),
                        }
                        Input {
                            label: "End",
                            input_type: "datetime-local",
                            value: state.form.end.clone(),
                            on_input: move |e: FormEvent| view.write().form.end = e.value(),
                        }
                        FormSelect {
                            label: "Family",
                            value: family_value,
                            onchange: move |e: Event<FormData>| {
                                view.write().form.family_id = Uuid::parse_str(&e.value()).ok();
                            },
                            if families.read().is_empty() {
                                option { value: "", "No families available" }
                            }
                            for family in families.read().iter() {
                                option { key: "{family.id}", value: "{family.id}", "{family.name}" }
                            }
                        }
                        Input {
                            label: "Advisor ID",
                            value: state.form.advisor_id.clone(),
                            on_input: move |e: FormEvent| view.write().form.advisor_id = e.value(),
                        }
                        div { class: "meetings-form-wide",
                            Input {
                                label: "Meeting Link",
                                placeholder: "https://",
                                value: state.form.meeting_link.clone(),
                                on_input: move |e: FormEvent| view.write().form.meeting_link = e.value(),
                            }
                        }
                        div { class: "meetings-form-wide",
                            Textarea {
                                label: "Description",
                                value: state.form.description.clone(),
                                on_input: move |e: FormEvent| view.write().form.description = e.value(),
                            }
                        }
                        div { class: "meetings-form-actions",
                            Button {
                                loading: state.scheduling,
                                loading_label: "Scheduling...",
                                onclick: handle_schedule,
                                "Schedule"
                            }
                        }
                    }
                }
            }
        }

        if state.loading && state.meetings.is_empty() {
            SkeletonList { rows: 5 }
        } else {
            section { class: "meetings-section",
                h2 { class: "meetings-heading", "Upcoming" }
                MeetingTable { meetings: partition.upcoming, empty: "No upcoming meetings." }
            }
            section { class: "meetings-section",
                h2 { class: "meetings-heading", "Past" }
                MeetingTable { meetings: partition.past, empty: "No past meetings." }
            }
        }
    }
}

#[component]
fn MeetingTable(meetings: Vec<Meeting>, empty: String) -> Element {
    rsx! {
        DataTable {
            DataTableHeader {
                DataTableColumn { "Title" }
                DataTableColumn { "When" }
                DataTableColumn { "Advisor" }
                DataTableColumn { "Status" }
                DataTableColumn { "" }
            }
            DataTableBody {
                if meetings.is_empty() {
                    DataTableEmpty { columns: 5, message: empty }
                }
                for meeting in meetings {
                    DataTableRow { key: "{meeting.id}",
                        DataTableCell {
                            div { class: "meetings-title", "{meeting.title}" }
                            if let Some(description) = meeting.description.clone() {
                                div { class: "meetings-description", "{description}" }
                            }
                        }
                        DataTableCell {
                            div { "{format_datetime(meeting.start_time)}" }
                            div { class: "meetings-until", "until {format_datetime(meeting.end_time)}" }
                        }
                        DataTableCell { "{short_id(meeting.advisor_id)}" }
                        DataTableCell {
                            Badge { variant: meeting_status_variant(meeting.status), "{meeting.status.label()}" }
                        }
                        DataTableCell {
                            if let Some(link) = meeting.meeting_link.clone() {
                                a {
                                    class: "meetings-link",
                                    href: "{link}",
                                    target: "_blank",
                                    rel: "noopener noreferrer",
                                    Icon::<LdExternalLink> { icon: LdExternalLink, width: 14, height: 14 }
                                    "Join"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
