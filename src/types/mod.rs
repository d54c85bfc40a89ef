pub mod crs;
pub mod date_arg;
pub mod ecv;
pub mod predicate;
pub mod scale;
pub mod station;
pub mod variable;
pub mod variable_id;
