pub mod clipboard;
pub mod colors;
pub mod file_saver;
pub mod image_data;
