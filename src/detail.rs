//! Read-only profile of a single user.

use crate::api::UserApi;
use crate::model::User;
use anyhow::Result;

pub const FETCH_FAILED: &str = "Failed to fetch user details.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Failed(String),
    Loaded(User),
}

#[derive(Debug)]
pub struct DetailView {
    id: String,
    state: DetailState,
}

impl DetailView {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            state: DetailState::Loading,
        }
    }

    /// One read for this view's id. Any failure, including a 404 or an
    /// unparseable body, lands in `Failed`.
    pub fn mount(&mut self, api: &dyn UserApi) -> Result<()> {
        self.state = DetailState::Loading;
        match api.get_user(&self.id) {
            Ok(user) => {
                self.state = DetailState::Loaded(user);
                Ok(())
            }
            Err(e) => {
                self.state = DetailState::Failed(FETCH_FAILED.to_string());
                Err(e)
            }
        }
    }

    pub fn render(&self) -> String {
        match &self.state {
            DetailState::Loading => "Loading user details...\n".to_string(),
            DetailState::Failed(message) => format!("! {}\n", message),
            DetailState::Loaded(user) => render_profile(user),
        }
    }
}

fn render_profile(user: &User) -> String {
    let website = if user.website.is_empty() || user.website.contains("://") {
        user.website.clone()
    } else {
        format!("http://{}", user.website)
    };
    let mut out = String::from("<- back\n");
    out.push_str(&format!("{}'s Details\n", user.name));
    out.push_str(&format!("  Name:     {}\n", user.name));
    out.push_str(&format!("  Username: {}\n", user.username));
    out.push_str(&format!("  Email:    {}\n", user.email));
    out.push_str(&format!("  Phone:    {}\n", user.phone));
    out.push_str(&format!("  Website:  {}\n", website));
    out.push_str(&format!(
        "  Address:  {}, {}\n",
        user.address.street, user.address.city
    ));
    out.push_str(&format!("  Company:  {}\n", user.company.name));
    out
}
