mod config;
mod git;
mod pipeline;
