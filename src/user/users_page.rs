//! Users listing page.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    endpoints::{self, format_endpoint},
    filter::filter_users,
    html::{
        BADGE_GRAY_STYLE, BADGE_GREEN_STYLE, BADGE_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        edit_delete_action_links, link,
    },
    locale::format_short_date,
    navigation::NavBar,
    timezone::get_local_offset,
    user::{
        UserState,
        core::{Role, User, get_all_users},
    },
};

/// The query parameters for the users page.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub search: Option<String>,
}

/// Render the users whose name, username or email match the search term.
pub async fn get_users_page(
    State(state): State<UserState>,
    Query(query): Query<UsersQuery>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let users = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_users(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve users: {error}"))?
    };

    let search_term = query.search.unwrap_or_default();
    let users = filter_users(&users, &search_term)
        .into_iter()
        .map(|user| {
            let created_on = user.created_at.to_offset(local_offset).date();
            (user, format_short_date(Some(created_on)))
        })
        .collect::<Vec<_>>();

    Ok(users_view(&users, &search_term).into_response())
}

fn role_badge(role: Role) -> Markup {
    let color = match role {
        Role::Admin => BADGE_GREEN_STYLE,
        Role::User => BADGE_GRAY_STYLE,
    };

    html!(span class={(BADGE_STYLE) " " (color)} { (role.label()) })
}

fn user_row(user: &User, created_on: &str) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_USER_VIEW, user.id.as_i64());
    let delete_url = format_endpoint(endpoints::USER, user.id.as_i64());
    let confirm_message = format!("Yakin ingin menghapus pengguna \"{}\"?", user.full_name);

    html!(
        tr class=(TABLE_ROW_STYLE) data-user-row=(user.username)
        {
            td class=(TABLE_CELL_STYLE) { (user.full_name) }
            td class=(TABLE_CELL_STYLE) { "@" (user.username) }
            td class=(TABLE_CELL_STYLE) { (user.email) }
            td class=(TABLE_CELL_STYLE) { (user.phone_number) }
            td class=(TABLE_CELL_STYLE) { (role_badge(user.role)) }
            td class=(TABLE_CELL_STYLE) { (created_on) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    // Admins can only be edited.
                    @if user.role == Role::Admin {
                        (link(&edit_url, "Edit"))
                    } @else {
                        (edit_delete_action_links(&edit_url, &delete_url, &confirm_message))
                    }
                }
            }
        }
    )
}

fn users_view(users: &[(User, String)], search_term: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::USERS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Kelola Pengguna" }
                        p class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            "Tambah dan kelola pengguna sistem"
                        }
                    }

                    a href=(endpoints::NEW_USER_VIEW) class=(LINK_STYLE) { "Tambah Pengguna" }
                }

                form method="get" action=(endpoints::USERS_VIEW) class="max-w-md"
                {
                    input
                        type="search"
                        name="search"
                        placeholder="Cari pengguna..."
                        aria-label="Cari pengguna"
                        value=(search_term)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                @for heading in ["Nama", "Username", "Email", "No. Telepon", "Role", "Dibuat", "Aksi"] {
                                    th scope="col" class=(TABLE_CELL_STYLE) { (heading) }
                                }
                            }
                        }

                        tbody
                        {
                            @for (user, created_on) in users {
                                (user_row(user, created_on))
                            }

                            @if users.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "Tidak ada pengguna ditemukan"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Pengguna", &[], &content)
}
