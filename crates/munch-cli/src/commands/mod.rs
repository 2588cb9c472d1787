pub mod close;
pub mod collection;
pub mod group;
pub mod group_decision;
pub mod init;
pub mod list;
pub mod resolve;
pub mod restaurant;
pub mod select;
pub mod show;
pub mod stats;
pub mod visit;
pub mod vote;
