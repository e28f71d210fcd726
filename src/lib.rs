//! Role-gated web application for managing students, careers, faculties,
//! and skills, with skill-affinity analytics across career outcome cohorts.

pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod state;

pub mod crypto {
    pub mod password;
    pub mod token;
}

pub mod models {
    pub mod catalog;
    pub mod user;
}

pub mod repositories {
    pub mod catalog;
    pub mod user;
}

pub mod services {
    pub mod affinity;
    pub mod auth;
}

pub mod handlers {
    pub mod admin;
    pub mod affinity;
    pub mod auth;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
}
