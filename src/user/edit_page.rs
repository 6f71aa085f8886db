use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    user::{
        UserState,
        core::{User, UserID, get_user_by_id},
        form::{UserFormDefaults, user_form_fields},
    },
};

fn edit_user_view(user: &User) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_USER_VIEW).into_html();
    let spinner = loading_spinner();
    let update_url = format_endpoint(endpoints::USER, user.id.as_i64());
    let fields = user_form_fields(&UserFormDefaults {
        full_name: &user.full_name,
        username: &user.username,
        email: &user.email,
        phone_number: &user.phone_number,
        role: user.role,
        is_edit: true,
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Pengguna" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (spinner) }
                    " Perbarui Pengguna"
                }

                a href=(endpoints::USERS_VIEW)
                {
                    div class=(BUTTON_SECONDARY_STYLE) { "Batal" }
                }
            }
        }
    };

    base("Edit Pengguna", &[], &content)
}

/// Renders the page for editing a user.
pub async fn get_edit_user_page(
    State(state): State<UserState>,
    Path(user_id): Path<i64>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(UserID::new(user_id), &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve user {user_id}: {error}");
        }
    })?;

    Ok(edit_user_view(&user).into_response())
}
