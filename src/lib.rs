use std::sync::Once;

static INIT: Once = Once::new();

pub fn setup_pretty_env_logger_default() {
    INIT.call_once(|| {
        pretty_env_logger::init();
    });
}

pub mod dyn_height;
pub mod formats;
pub mod interp;
pub mod oceanography;
pub mod profile;
pub mod settings;
