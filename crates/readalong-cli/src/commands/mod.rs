pub mod compare;
pub mod init;
pub mod replay;
pub mod score;
pub mod select;
pub mod validate;
