pub mod cloud;
pub mod compression;
pub mod document;
pub mod fs;
pub mod glob;
pub mod split;
