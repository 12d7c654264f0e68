pub mod migrate;
pub mod serve;
pub mod slug;
pub mod token;
