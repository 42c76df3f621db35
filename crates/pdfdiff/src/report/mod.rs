pub mod json;
pub mod terminal;

pub use self::json::Report;
