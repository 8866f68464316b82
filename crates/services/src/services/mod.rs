pub mod generative_api;
pub mod insight;
pub mod reminder;
pub mod streak;
pub mod voice_command;
