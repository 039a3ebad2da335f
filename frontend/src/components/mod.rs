pub mod binding;
pub mod dom_view;
pub mod header;
pub mod upload_section;
