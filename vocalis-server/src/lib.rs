// HTTP layer for the vocalis pronunciation service

pub mod http;
pub mod static_files;
