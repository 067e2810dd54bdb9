pub mod advisory;
pub mod field;
pub mod finance;
pub mod inventory;
pub mod market;
pub mod system;
pub mod task;
pub mod utils;
pub mod worker;
