pub mod list_project_files;
pub mod read_file;
pub mod write_file;
