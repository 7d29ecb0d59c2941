pub mod commands;
pub mod environment;

mod email;

pub fn folio_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
