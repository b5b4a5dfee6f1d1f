use client::screens::MessagesView;
use client::{Notifications, PortalApi};
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::LdSend;
use dioxus_free_icons::Icon;
use shared_types::{ConversationSummary, Family, Message};
use shared_ui::{
    use_toast, Badge, BadgeVariant, Button, ButtonVariant, Card, CardContent, CardHeader,
    CardTitle, FormSelect, Input, PageActions, PageHeader, PageSubtitle, PageTitle, SkeletonList,
    Textarea,
};
use uuid::Uuid;

use crate::auth::use_auth;
use crate::format::{format_datetime, preview, short_id};
use crate::notices;

#[component]
pub fn Messages() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut view = use_signal(MessagesView::default);
    let mut families = use_signal(Vec::<Family>::new);

    let mut reload = move || {
        view.write().loading = true;
        spawn(async move {
            let api = auth.api();
            let before = view.peek().clone();
            let mut next = before.clone();
            let mut pending = Notifications::default();
            match api.list_families().await {
                Ok(list) => {
                    if next.compose.family_id.is_none() {
                        next.compose.family_id = list.first().map(|f| f.id);
                    }
                    families.set(list);
                }
                Err(err) => pending.failure("Failed to load families", &err),
            }
            next.load(&api, &mut pending).await;
            view.with_mut(|v| v.merge(&before, next));
            notices::settle(auth, toast, &mut pending);
        });
    };

    use_hook(move || reload());

    let handle_send = move |_| {
        view.write().sending = true;
        spawn(async move {
            let api = auth.api();
            let before = view.peek().clone();
            let mut next = before.clone();
            let mut pending = Notifications::default();
            next.send(&api, &mut pending).await;
            view.with_mut(|v| v.merge(&before, next));
            notices::settle(auth, toast, &mut pending);
        });
    };

    let me = auth.current_user().map(|u| u.id).unwrap_or_default();
    let state = view.read();
    let conversations = state.conversations(me);
    let thread: Vec<Message> = state.thread().into_iter().cloned().collect();
    let family_value = state
        .compose
        .family_id
        .map(|id| id.to_string())
        .unwrap_or_default();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./messages.css") }

        PageHeader {
            div {
                PageTitle { "Messages" }
                PageSubtitle { "Secure conversations with your advisors and family members" }
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

        div { class: "messages-layout",
            Card {
                CardHeader { CardTitle { "Inbox" } }
                CardContent {
                    if state.loading && state.messages.is_empty() {
                        SkeletonList { rows: 4 }
                    } else if conversations.is_empty() {
                        p { class: "messages-none", "No conversations yet." }
                    }
                    ul { class: "messages-inbox",
                        for summary in conversations {
                            ConversationRow {
                                key: "{summary.key}",
                                selected: state.selected == Some(summary.key),
                                summary: summary.clone(),
                                onselect: move |s: ConversationSummary| view.write().select(&s),
                            }
                        }
                    }
                }
            }

            div { class: "messages-main",
                Card {
                    CardHeader { CardTitle { "Conversation" } }
                    CardContent {
                        if thread.is_empty() {
                            p { class: "messages-none", "Select a conversation or start a new one." }
                        }
                        div { class: "messages-thread",
                            for message in thread {
                                div {
                                    key: "{message.id}",
                                    class: if message.sender_id == me { "messages-bubble mine" } else { "messages-bubble" },
                                    p { class: "messages-bubble-text", "{message.content}" }
                                    span { class: "messages-bubble-meta", "{format_datetime(message.created_at)}" }
                                }
                            }
                        }
                    }
                }

                Card {
                    CardHeader { CardTitle { "New Message" } }
                    CardContent {
                        div { class: "messages-compose",
                            Input {
                                label: "Recipient ID",
                                placeholder: "00000000-0000-0000-0000-000000000000",
                                value: state.compose.recipient_id.clone(),
                                on_input: move |e: FormEvent| view.write().compose.recipient_id = e.value(),
                            }
                            FormSelect {
                                label: "Family",
                                value: family_value,
                                onchange: move |e: Event<FormData>| {
                                    view.write().compose.family_id = Uuid::parse_str(&e.value()).ok();
                                },
                                if families.read().is_empty() {
                                    option { value: "", "No families available" }
                                }
                                for family in families.read().iter() {
                                    option { key: "{family.id}", value: "{family.id}", "{family.name}" }
                                }
                            }
                            Textarea {
                                label: "Message",
                                rows: 4,
                                placeholder: "Write a message...",
                                value: state.compose.content.clone(),
                                on_input: move |e: FormEvent| view.write().compose.content = e.value(),
                            }
                            div { class: "messages-compose-actions",
                                Button {
                                    loading: state.sending,
                                    loading_label: "Sending...",
                                    onclick: handle_send,
                                    Icon::<LdSend> { icon: LdSend, width: 16, height: 16 }
                                    "Send"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ConversationRow(
    summary: ConversationSummary,
    selected: bool,
    onselect: EventHandler<ConversationSummary>,
) -> Element {
    let row = summary.clone();
    let direction = if summary.sent_by_me { "You: " } else { "" };

    rsx! {
        li {
            class: if selected { "messages-inbox-row selected" } else { "messages-inbox-row" },
            onclick: move |_| onselect.call(row.clone()),
            div { class: "messages-inbox-top",
                span { class: "messages-inbox-who", "User {short_id(summary.counterpart)}" }
                if summary.unread {
                    Badge { variant: BadgeVariant::Primary, "New" }
                }
                span { class: "messages-inbox-count", "{summary.message_count}" }
            }
            p { class: "messages-inbox-preview",
                "{direction}{preview(&summary.latest.content, 80)}"
            }
            span { class: "messages-inbox-time", "{format_datetime(summary.latest.created_at)}" }
        }
    }
}
