pub mod pages;
pub mod upload;
