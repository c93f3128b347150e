pub mod auth;
pub mod helpers;
pub mod redirect;
pub mod routes;
pub mod settings;
pub mod site_files;
pub mod sites;
pub mod static_site;
pub mod urls;

pub use redirect::RedirectService;
pub use routes::{admin_routes, shortener_routes, site_routes};
