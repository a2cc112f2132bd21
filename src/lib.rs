pub mod badge;
pub mod cli;
pub mod config;
pub mod error;
pub mod ignore;
pub mod measure;
pub mod model;
pub mod palette;
pub mod parsers;
pub mod patch;
pub mod pipeline;
pub mod process;
pub mod publish;
