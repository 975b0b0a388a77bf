pub mod builds;
pub mod client;
pub mod gateway;
pub mod git;
pub mod models;
pub mod projects;
pub mod work_items;
