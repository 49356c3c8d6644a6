pub mod form;
pub mod login;
