use folio_models::contact::ContactForm;
use serde::Deserialize;

/// Missing fields are treated as empty and reported by validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiContactForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl From<ApiContactForm> for ContactForm {
    fn from(value: ApiContactForm) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            message: value.message,
        }
    }
}
