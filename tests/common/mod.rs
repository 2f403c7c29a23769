#[macro_use]
pub mod insta;
