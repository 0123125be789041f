pub mod newtypes;
