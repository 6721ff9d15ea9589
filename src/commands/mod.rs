pub mod create;
pub mod diff;
pub mod init;
pub mod qc;
pub mod reset;
pub mod stats;
pub mod studies;
pub mod submissions;
pub mod upload;
