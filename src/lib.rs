pub mod assemble;
pub mod cli;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod normalize;
pub mod postprocess;
pub mod report;
pub mod translator;
pub mod util;
