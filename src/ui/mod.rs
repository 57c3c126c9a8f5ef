pub mod map;
pub mod panels;
pub mod plot;
pub mod range_slider;
pub mod table;
