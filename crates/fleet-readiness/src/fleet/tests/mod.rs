mod common;
mod monitoring;
