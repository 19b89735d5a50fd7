//! The list page: owns the in-memory user collection.

use crate::api::UserApi;
use crate::model::User;
use crate::prompt::Confirm;
use anyhow::{anyhow, bail, Result};

pub const FETCH_FAILED: &str = "Failed to fetch users.";
pub const DELETE_FAILED: &str = "Failed to delete user.";
pub const DELETE_QUESTION: &str = "Are you sure you want to delete this user?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

#[derive(Debug, Default)]
pub struct ListView {
    users: Vec<User>,
    error: Option<String>,
    create_open: bool,
    editing: Option<u64>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Fetch the whole collection. On failure the list is left empty and the
    /// error is kept for display; the cause is returned for logging.
    pub fn mount(&mut self, api: &dyn UserApi) -> Result<usize> {
        match api.list_users() {
            Ok(users) => {
                self.users = users;
                self.error = None;
                Ok(self.users.len())
            }
            Err(e) => {
                self.users.clear();
                self.error = Some(FETCH_FAILED.to_string());
                Err(e)
            }
        }
    }

    pub fn is_create_open(&self) -> bool {
        self.create_open
    }

    /// Id of the row whose edit form is open.
    pub fn editing(&self) -> Option<u64> {
        self.editing
    }

    fn ensure_no_form(&self) -> Result<()> {
        if self.create_open {
            bail!("The create form is already open");
        }
        if let Some(id) = self.editing {
            bail!("The edit form for user {} is already open", id);
        }
        Ok(())
    }

    /// Host the create form. Only one form is open at a time.
    pub fn open_create(&mut self) -> Result<()> {
        self.ensure_no_form()?;
        self.create_open = true;
        Ok(())
    }

    pub fn close_create(&mut self) {
        self.create_open = false;
    }

    /// Select a row for editing and return a copy of it for the form.
    pub fn open_edit(&mut self, id: u64) -> Result<User> {
        self.ensure_no_form()?;
        let user = self
            .find(id)
            .cloned()
            .ok_or_else(|| anyhow!("User {} is not in the list", id))?;
        self.editing = Some(id);
        Ok(user)
    }

    pub fn close_edit(&mut self) {
        self.editing = None;
    }

    pub fn apply_created(&mut self, user: User) {
        self.users.insert(0, user);
        self.create_open = false;
    }

    pub fn apply_updated(&mut self, user: User) {
        for existing in self.users.iter_mut().filter(|u| u.id == user.id) {
            *existing = user.clone();
        }
        self.editing = None;
    }

    pub fn apply_deleted(&mut self, id: u64) {
        self.users.retain(|u| u.id != id);
    }

    /// Ask first; only a confirmed delete reaches the remote service.
    pub fn delete(
        &mut self,
        api: &dyn UserApi,
        id: u64,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome> {
        if !confirm.confirm(DELETE_QUESTION) {
            return Ok(DeleteOutcome::Cancelled);
        }
        match api.delete_user(id) {
            Ok(()) => {
                self.apply_deleted(id);
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                self.error = Some(DELETE_FAILED.to_string());
                Err(e)
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("User Management\n");
        if let Some(error) = &self.error {
            out.push_str(&format!("! {}\n", error));
        }
        if self.users.is_empty() {
            out.push_str("(no users)\n");
            return out;
        }

        let name_w = column_width(self.users.iter().map(|u| u.name.as_str()), "Name");
        let email_w = column_width(self.users.iter().map(|u| u.email.as_str()), "Email");
        out.push_str(&format!(
            "{:>5}  {:<name_w$}  {:<email_w$}  {}\n",
            "Id", "Name", "Email", "Phone"
        ));
        for user in &self.users {
            out.push_str(&format!(
                "{:>5}  {:<name_w$}  {:<email_w$}  {}\n",
                user.id, user.name, user.email, user.phone
            ));
        }
        out
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}
