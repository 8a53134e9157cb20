pub mod pipeline_config;
pub mod run_manifest;
