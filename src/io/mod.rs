/// Writing tables back to disk.
pub mod export;
