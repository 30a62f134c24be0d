pub mod auth;
pub mod controller;
pub mod db;
pub mod extract;
pub mod response;
