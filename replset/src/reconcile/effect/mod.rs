use super::*;

pub mod add_member;
pub mod initiate;
pub mod remove_member;
