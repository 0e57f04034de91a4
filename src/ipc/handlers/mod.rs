pub mod core;
pub mod grades;
pub mod initial;
pub mod risk;
pub mod sheet;
