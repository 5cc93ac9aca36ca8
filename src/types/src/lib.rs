pub mod artifact;
pub mod catalog;
pub mod emqx;
