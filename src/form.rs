//! The create/edit form shared by both flows.
//!
//! A [`UserForm`] is created in one of two modes. Create mode starts blank
//! apart from a generated username; edit mode is seeded from an existing
//! record. Submitting validates first and only then talks to the remote
//! service.

use crate::api::UserApi;
use crate::model::{Address, Company, User, UserDraft};
use crate::validate::{self, Field, FieldErrors, FormFields};
use anyhow::{anyhow, Result};

const USERNAME_PREFIX: &str = "USER-";
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(User),
}

/// Outcome of a submit that reached a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submit {
    /// Validation failed; no request was sent.
    Invalid(FieldErrors),
    /// The server accepted the record and returned it.
    Saved(User),
}

/// Generate a `USER-xxx` token from three random base36 characters.
/// No uniqueness check is made against existing usernames.
pub fn generate_username() -> String {
    let mut n = uuid::Uuid::new_v4().as_u128();
    let mut token = String::with_capacity(USERNAME_PREFIX.len() + 3);
    token.push_str(USERNAME_PREFIX);
    for _ in 0..3 {
        token.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    token
}

#[derive(Debug, Clone)]
pub struct UserForm {
    mode: FormMode,
    fields: FormFields,
    errors: FieldErrors,
}

impl UserForm {
    pub fn create() -> Self {
        let fields = FormFields {
            username: generate_username(),
            ..Default::default()
        };
        Self {
            mode: FormMode::Create,
            fields,
            errors: FieldErrors::default(),
        }
    }

    pub fn edit(user: &User) -> Self {
        let fields = FormFields {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            username: user.username.clone(),
            street: user.address.street.clone(),
            city: user.address.city.clone(),
            company: user.company.name.clone(),
            website: user.website.clone(),
        };
        Self {
            mode: FormMode::Edit(user.clone()),
            fields,
            errors: FieldErrors::default(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit() {
            "Edit User"
        } else {
            "Create User"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            "Update"
        } else {
            "Create"
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Change a field value. The username is read-only in both modes.
    pub fn set(&mut self, field: Field, value: &str) -> Result<()> {
        if !field.editable() {
            return Err(anyhow!("{} is not editable", field.label()));
        }
        *self.fields.get_mut(field) = value.to_string();
        Ok(())
    }

    /// Apply `key=value` assignments, e.g. from the command line.
    pub fn apply_assignments<S: AsRef<str>>(&mut self, assignments: &[S]) -> Result<()> {
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (key, value) = assignment
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected field=value, got '{}'", assignment))?;
            let field =
                Field::from_key(key.trim()).ok_or_else(|| anyhow!("Unknown field: {}", key))?;
            self.set(field, value)?;
        }
        Ok(())
    }

    /// Run every rule, remember the result and report whether submission may proceed.
    pub fn validate(&mut self) -> bool {
        self.errors = validate::validate(&self.fields);
        self.errors.is_empty()
    }

    /// Request body built from the raw field values; company is nested back under `company.name`.
    pub fn draft(&self) -> UserDraft {
        let f = &self.fields;
        UserDraft {
            name: f.name.clone(),
            email: f.email.clone(),
            phone: f.phone.clone(),
            username: f.username.clone(),
            address: Address {
                street: f.street.clone(),
                city: f.city.clone(),
            },
            company: Company {
                name: f.company.clone(),
            },
            website: f.website.clone(),
        }
    }

    /// Validate, then create or update against the remote service.
    ///
    /// A transport failure is returned as `Err` and leaves the field values
    /// untouched so the user can retry.
    pub fn submit(&mut self, api: &dyn UserApi) -> Result<Submit> {
        if !self.validate() {
            return Ok(Submit::Invalid(self.errors.clone()));
        }
        let draft = self.draft();
        let saved = match &self.mode {
            FormMode::Edit(user) => api.update_user(user.id, &draft)?,
            FormMode::Create => api.create_user(&draft)?,
        };
        Ok(Submit::Saved(saved))
    }

    /// Plain-text rendering with each error beside its field.
    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.title());
        for field in Field::ALL {
            let marker = if field.required() { "*" } else { "" };
            let note = if field.editable() { "" } else { " (read-only)" };
            out.push_str(&format!(
                "  {:<14} {}{}\n",
                format!("{}{}:", field.label(), marker),
                self.fields.get(field),
                note
            ));
            if let Some(message) = self.errors.get(field) {
                out.push_str(&format!("  {:<14} ! {}\n", "", message));
            }
        }
        out
    }
}
