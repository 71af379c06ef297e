mod movie;
mod user;

pub use movie::Movie;
pub use user::User;
