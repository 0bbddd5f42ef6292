mod api;
mod template;
mod utils;
