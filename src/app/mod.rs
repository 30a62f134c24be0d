pub mod controller;
pub mod entity;
pub mod graphql;
pub mod middleware;
pub mod response;
pub mod state;
