//! The form shared by the create and edit user pages.

use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    user::{
        PasswordHash, ValidatedPassword,
        core::{Role, UserChanges},
        password::MIN_PASSWORD_LENGTH,
    },
};

/// The form data for creating or updating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub password: Option<String>,
}

fn required(value: Option<String>, field_name: &str) -> Result<String, Error> {
    let value = value.unwrap_or_default().trim().to_owned();

    if value.is_empty() {
        Err(Error::MissingRequiredField(field_name.to_owned()))
    } else {
        Ok(value)
    }
}

impl UserForm {
    /// Check the form of a new user and hash its password with `cost`.
    ///
    /// # Errors
    /// Returns [Error::MissingRequiredField] for blank fields, or
    /// [Error::PasswordTooShort] if the password is too short.
    pub fn validate_new(self, cost: u32) -> Result<UserChanges, Error> {
        let password = self.password.clone().unwrap_or_default();
        let mut changes = self.validate_profile()?;
        let password = ValidatedPassword::new(&password)?;
        changes.password_hash = Some(PasswordHash::new(password, cost)?);

        Ok(changes)
    }

    /// Check the form of an existing user.
    ///
    /// A blank password keeps the current one. A new password is not held
    /// to the minimum length.
    ///
    /// # Errors
    /// Returns [Error::MissingRequiredField] for blank profile fields.
    pub fn validate_edit(self, cost: u32) -> Result<UserChanges, Error> {
        let password = self.password.clone().unwrap_or_default();
        let mut changes = self.validate_profile()?;

        if !password.is_empty() {
            let password = ValidatedPassword::new_unchecked(&password);
            changes.password_hash = Some(PasswordHash::new(password, cost)?);
        }

        Ok(changes)
    }

    fn validate_profile(self) -> Result<UserChanges, Error> {
        Ok(UserChanges {
            full_name: required(self.full_name, "Nama Lengkap")?,
            username: required(self.username, "Username")?,
            email: required(self.email, "Email")?,
            phone_number: required(self.phone_number, "No. Telepon")?,
            role: self.role,
            password_hash: None,
        })
    }
}

pub struct UserFormDefaults<'a> {
    pub full_name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub role: Role,
    /// Whether the form edits an existing user, where the password is optional.
    pub is_edit: bool,
}

impl Default for UserFormDefaults<'_> {
    fn default() -> Self {
        Self {
            full_name: "",
            username: "",
            email: "",
            phone_number: "",
            role: Role::User,
            is_edit: false,
        }
    }
}

fn text_input(name: &str, label: &str, input_type: &str, value: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                name=(name)
                id=(name)
                type=(input_type)
                value=(value)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

pub fn user_form_fields(defaults: &UserFormDefaults<'_>) -> Markup {
    let password_label = if defaults.is_edit {
        "Password Baru (opsional)"
    } else {
        "Password"
    };

    html! {
        (text_input("full_name", "Nama Lengkap", "text", defaults.full_name))
        (text_input("username", "Username", "text", defaults.username))
        (text_input("email", "Email", "email", defaults.email))
        (text_input("phone_number", "No. Telepon", "tel", defaults.phone_number))

        div
        {
            label for="role" class=(FORM_LABEL_STYLE) { "Role" }

            select name="role" id="role" class=(FORM_TEXT_INPUT_STYLE)
            {
                @for role in [Role::User, Role::Admin] {
                    option value=(role.key()) selected[role == defaults.role] { (role.label()) }
                }
            }
        }

        div
        {
            label for="password" class=(FORM_LABEL_STYLE) { (password_label) }

            input
                name="password"
                id="password"
                type="password"
                placeholder="Masukkan password"
                required[!defaults.is_edit]
                minlength=[(!defaults.is_edit).then_some(MIN_PASSWORD_LENGTH)]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
