pub mod server;
pub mod strains;
pub mod user;
