pub mod file_reader;
pub mod file_writer;

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFile;
