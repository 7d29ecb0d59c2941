use folio_models::contact::ContactSubmission;
use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

pub trait Template: Serialize {
    /// Template name. Names ending in `.html` are rendered with HTML
    /// autoescaping.
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

pub const BASE_TEMPLATE: &str = include_str!("../templates/base.html");

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $path;
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    ContactMessageTemplate("contact_message.html"),
}

/// Body of the email the site owner receives for a contact submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessageTemplate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl From<&ContactSubmission> for ContactMessageTemplate {
    fn from(value: &ContactSubmission) -> Self {
        Self {
            name: value.name.to_string(),
            email: value.email.to_string(),
            phone: value.phone.clone(),
            message: value.message.to_string(),
        }
    }
}
