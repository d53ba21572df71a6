pub mod config_store;
pub mod label_matcher;

pub use config_store::{ConfigStore, IdGenerator};
pub use label_matcher::{parse_label_query, select_matching, LabelSet};
