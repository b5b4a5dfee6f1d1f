use client::guard::post_login_target;
use dioxus::prelude::*;
use shared_ui::{
    use_toast, Button, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    Input, ToastOptions,
};

use crate::auth::use_auth;
use crate::routes::Route;

fn go_to(target: String) {
    match target.parse::<Route>() {
        Ok(route) => {
            navigator().push(route);
        }
        Err(_) => {
            navigator().push(Route::Dashboard {});
        }
    }
}

/// Email and password sign-in. After login the user lands on `redirect`
/// when it names a protected page, otherwise on the dashboard.
#[component]
pub fn Login(redirect: Option<String>) -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let target = use_signal(move || post_login_target(redirect.as_deref()));

    if auth.is_authenticated() {
        go_to(target());
    }

    let handle_login = move |evt: FormEvent| async move {
        evt.prevent_default();
        loading.set(true);
        error_msg.set(None);

        match auth.login(email(), password()).await {
            Ok(user) => {
                toast.success(format!("Welcome back, {}", user.first_name), ToastOptions::new());
                go_to(target());
            }
            Err(err) => {
                tracing::warn!(error = %err, "login failed");
                error_msg.set(Some(err.user_message()));
            }
        }
        loading.set(false);
    };

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./login.css") }

        div { class: "auth-page",
            Card { class: "auth-card",
                CardHeader {
                    CardTitle { "Family Office Portal" }
                    CardDescription { "Sign in to view your documents, messages and meetings" }
                }

                CardContent {
                    if let Some(err) = error_msg() {
                        div { class: "auth-error", role: "alert", "{err}" }
                    }

                    form { class: "auth-form", onsubmit: handle_login,
                        Input {
                            label: "Email",
                            input_type: "email",
                            placeholder: "you@example.com",
                            required: true,
                            value: email(),
                            on_input: move |evt: FormEvent| email.set(evt.value()),
                        }
                        Input {
                            label: "Password",
                            input_type: "password",
                            required: true,
                            value: password(),
                            on_input: move |evt: FormEvent| password.set(evt.value()),
                        }
                        Button {
                            variant: ButtonVariant::Primary,
                            button_type: "submit",
                            loading: loading(),
                            loading_label: "Signing in...",
                            "Sign In"
                        }
                    }
                }
            }
        }
    }
}
