pub mod ads;
pub mod auth;
pub mod catalog;
pub mod comments;
pub mod error;
pub mod extractors;
pub mod favorites;
pub mod forms;
pub mod hello;
pub mod home;
pub mod humanize;
pub mod middleware;
pub mod ownership;
pub mod pictures;
pub mod routes;
pub mod rows;
pub mod state;
