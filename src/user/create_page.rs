use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    user::form::{UserFormDefaults, user_form_fields},
};

fn create_user_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_USER_VIEW).into_html();
    let spinner = loading_spinner();
    let fields = user_form_fields(&UserFormDefaults::default());

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::USERS_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Tambah Pengguna" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (spinner) }
                    " Tambah Pengguna"
                }
            }
        }
    };

    base("Tambah Pengguna", &[], &content)
}

/// Renders the page for creating a user.
pub async fn get_create_user_page() -> Response {
    create_user_view().into_response()
}

#[cfg(test)]
mod tests {
    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_status_ok, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::get_create_user_page;

    #[tokio::test]
    async fn renders_create_form() {
        let response = get_create_user_page().await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::USERS_API, "hx-post");
        assert_form_input(&form, "full_name", "text");
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "phone_number", "tel");
        assert_form_input(&form, "password", "password");
        assert_form_submit_button_with_text(&form, "Tambah Pengguna");
    }
}
