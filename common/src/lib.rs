pub mod account;
pub mod currency;
pub mod history;
pub mod product;
pub mod roles;
