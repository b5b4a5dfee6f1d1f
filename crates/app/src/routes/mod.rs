pub mod dashboard;
pub mod documents;
pub mod login;
pub mod meetings;
pub mod messages;
pub mod not_found;

use client::{guard_route, GuardDecision};
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{
    LdCalendar, LdFolder, LdLayoutDashboard, LdLogOut, LdMessageSquare,
};
use dioxus_free_icons::Icon;
use shared_ui::{Badge, Button, ButtonVariant};

use crate::auth::use_auth;
use crate::format::role_variant;

use dashboard::Dashboard;
use documents::Documents;
use login::Login;
use meetings::Meetings;
use messages::Messages;
use not_found::NotFound;

#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/login?:redirect")]
    Login { redirect: Option<String> },
    #[layout(AuthGuard)]
    #[layout(AppLayout)]
    #[route("/")]
    Dashboard {},
    #[route("/documents")]
    Documents {},
    #[route("/messages")]
    Messages {},
    #[route("/meetings")]
    Meetings {},
    #[end_layout]
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

/// Holds protected routes until the session is known, then lets them
/// through or sends the user to login with the path they asked for.
#[component]
fn AuthGuard() -> Element {
    let auth = use_auth();
    let route: Route = use_route();

    // Effects only run in the browser, so hydration never fires during SSR.
    use_effect(move || {
        if !auth.session.peek().is_hydrated() {
            spawn(async move {
                auth.hydrate().await;
            });
        }
    });

    match guard_route(&route.to_string(), auth.is_hydrated(), auth.is_authenticated()) {
        GuardDecision::Proceed => rsx! { Outlet::<Route> {} },
        GuardDecision::Wait => rsx! {
            div { class: "auth-guard-loading",
                p { "Loading..." }
            }
        },
        GuardDecision::RedirectToLogin { redirect } => {
            navigator().replace(Route::Login {
                redirect: Some(redirect),
            });
            rsx! {
                div { class: "auth-guard-loading",
                    p { "Redirecting to login..." }
                }
            }
        }
    }
}

#[component]
fn AppLayout() -> Element {
    let auth = use_auth();
    let user = auth.current_user();

    let nav = [
        (Route::Dashboard {}, "Dashboard"),
        (Route::Documents {}, "Documents"),
        (Route::Messages {}, "Messages"),
        (Route::Meetings {}, "Meetings"),
    ];

    let sign_out = move |_| {
        spawn(async move {
            auth.logout().await;
            navigator().push(Route::Login { redirect: None });
        });
    };

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./layout.css") }

        div { class: "app-shell",
            header { class: "app-header",
                span { class: "app-brand", "Family Office Portal" }

                nav { class: "app-nav",
                    for (target, label) in nav {
                        Link {
                            key: "{label}",
                            class: "app-nav-link",
                            active_class: "active",
                            to: target.clone(),
                            {nav_icon(&target)}
                            span { "{label}" }
                        }
                    }
                }

                div { class: "app-header-spacer" }

                if let Some(user) = user {
                    div { class: "app-user",
                        span { class: "app-user-name", "{user.first_name} {user.last_name}" }
                        Badge { variant: role_variant(user.role), "{user.role.label()}" }
                    }
                }

                Button {
                    variant: ButtonVariant::Ghost,
                    onclick: sign_out,
                    Icon::<LdLogOut> { icon: LdLogOut, width: 16, height: 16 }
                    "Sign Out"
                }
            }

            main { class: "app-content",
                Outlet::<Route> {}
            }
        }
    }
}

fn nav_icon(route: &Route) -> Element {
    match route {
        Route::Documents {} => rsx! {
            Icon::<LdFolder> { icon: LdFolder, width: 16, height: 16 }
        },
        Route::Messages {} => rsx! {
            Icon::<LdMessageSquare> { icon: LdMessageSquare, width: 16, height: 16 }
        },
        Route::Meetings {} => rsx! {
            Icon::<LdCalendar> { icon: LdCalendar, width: 16, height: 16 }
        },
        _ => rsx! {
            Icon::<LdLayoutDashboard> { icon: LdLayoutDashboard, width: 16, height: 16 }
        },
    }
}
