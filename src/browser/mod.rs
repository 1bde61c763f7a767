//! Browser module
//!
//! - `PageDriver` / `DriverLauncher`: the seam between the engine and a browser
//! - `DriverHandle`: a session's exclusively owned, release-once driver slot
//! - `ChromeLauncher`: headless Chromium over the DevTools protocol
//! - `Authenticator` / `FormLogin`: logging an account in through the page

mod auth;
mod chrome;
mod driver;

pub use auth::{Authenticator, FormLogin};
pub use chrome::{ChromeDriver, ChromeLauncher};
pub use driver::{DriverHandle, DriverLauncher, PageDriver};
