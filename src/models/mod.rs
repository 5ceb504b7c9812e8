pub mod contractmodel;
pub mod projectmodel;
pub mod studentmodel;
