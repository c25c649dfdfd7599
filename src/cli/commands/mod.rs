pub mod convert;
pub mod helper;
pub mod init;
pub mod list;
