mod database;
mod env;
mod server;
mod tracing;

pub use database::connect_database;
pub use server::init_server;

pub fn init_base() {
    env::init_env();
    tracing::init_tracing();
}
