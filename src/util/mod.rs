/// Contains wrappers for reading, writing, and downloading files
pub mod file_io;
