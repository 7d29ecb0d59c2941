use std::sync::Arc;

use anyhow::Context;
use folio_templates_contracts::{Template, TemplateService, BASE_TEMPLATE, TEMPLATES};
use tera::Tera;

#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    tera: Arc<Tera>,
}

impl TemplateServiceImpl {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template("base.html", BASE_TEMPLATE)
            .context("Failed to load base template")?;

        for &(name, template) in TEMPLATES {
            tera.add_raw_template(name, template)
                .with_context(|| format!("Failed to load template {name}"))?;
        }

        Ok(Self { tera: tera.into() })
    }
}

impl TemplateService for TemplateServiceImpl {
    #[tracing::instrument(level = "trace", skip_all, fields(template = T::NAME))]
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;
        self.tera.render(T::NAME, &context).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use folio_templates_contracts::ContactMessageTemplate;

    use super::*;

    fn render(template: ContactMessageTemplate) -> String {
        // Arrange
        let sut = TemplateServiceImpl::new().unwrap();

        // Act
        let result = sut.render(&template);

        // Assert
        result.unwrap()
    }

    #[test]
    fn contact_message() {
        let html = render(ContactMessageTemplate {
            name: "Max Mustermann".into(),
            email: "max.mustermann@example.de".into(),
            phone: Some("+49 123 456".into()),
            message: "Hello World!\nHow are you?".into(),
        });

        assert!(html.contains("<h2>New Contact Form Submission</h2>"));
        assert!(html.contains("<strong>Name:</strong> Max Mustermann"));
        assert!(html.contains("<strong>Email:</strong> max.mustermann@example.de"));
        assert!(html.contains("<strong>Phone:</strong> +49 123 456"));
        assert!(html.contains("Hello World!<br>How are you?"));
    }

    #[test]
    fn contact_message_without_phone() {
        let html = render(ContactMessageTemplate {
            name: "Al".into(),
            email: "a@b.com".into(),
            phone: None,
            message: "Hello there, checking in".into(),
        });

        assert!(!html.contains("Phone:"));
        assert!(html.contains("<p>Hello there, checking in</p>"));
    }

    #[test]
    fn contact_message_escapes_user_input() {
        let html = render(ContactMessageTemplate {
            name: "<b>Mallory</b>".into(),
            email: "mallory@example.com".into(),
            phone: Some("<i>1</i>".into()),
            message: "<script>alert(1)</script>\nbye".into(),
        });

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>Mallory</b>"));
        assert!(!html.contains("<i>1</i>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;&#x2F;script&gt;<br>bye"));
    }
}
