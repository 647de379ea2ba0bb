pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;
pub mod views;

pub mod crypto {
    pub mod csrf;
}

pub mod models {
    pub mod note;
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod memory;
    pub mod note;
    pub mod session;
    pub mod traits;
    pub mod user;

    pub use traits::{NoteRepository, SessionStore, UserRepository};
}

pub mod services {
    pub mod auth;
    pub mod flash;
    pub mod guard;
    pub mod notes;
    pub mod session;
    pub mod users;
}

pub mod handlers {
    pub mod auth;
    pub mod notes;
    pub mod users;
}

pub mod middleware_layer {
    pub mod session;
}

pub mod validation {
    pub mod auth;
    pub mod errors;
    pub mod notes;
}

pub use config::Config;
pub use routes::router;
pub use state::AppState;
