pub mod align;
pub mod alphabet;
pub mod cluster;
pub mod output;
pub mod structs;
pub mod util;
