pub mod family;
pub mod json;
pub mod params;
pub mod table;

pub use family::{file_name, load_family_dir, method_dir, save_run, step_label};
pub use params::{parse_params, read_params_file};
