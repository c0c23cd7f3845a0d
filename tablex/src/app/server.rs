mod api;
mod dto;
mod form;
pub mod router;
