pub mod flag;
pub mod matching;
pub mod providers;
pub mod safe_list;
pub mod scan;
