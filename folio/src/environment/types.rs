use folio_core_contact_impl::{relay::ContactRelayServiceImpl, ContactFeatureServiceImpl};
use folio_email_impl::EmailServiceImpl;
use folio_shared_impl::{rate_limit::RateLimitServiceImpl, time::TimeServiceImpl};
use folio_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = folio_api_rest::RestServer<ContactFeature>;

// Core
pub type ContactFeature = ContactFeatureServiceImpl<RateLimit, ContactRelay>;
pub type ContactRelay = ContactRelayServiceImpl<Email, Template>;

// Shared
pub type RateLimit = RateLimitServiceImpl<Time>;
pub type Time = TimeServiceImpl;

// Email
pub type Email = EmailServiceImpl;

// Templates
pub type Template = TemplateServiceImpl;
