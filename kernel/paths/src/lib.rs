pub mod equiv;
pub mod finite;
pub mod funext;
pub mod hlevel;
pub mod path;
pub mod prod;
pub mod theory;
